//! Instruction bridge.
//!
//! A HOIL program may contain `$instruct` statements written in natural
//! language. The bridge turns each one into a short snippet of host opcodes:
//!
//! 1. **Submit**: the builder hands every statement to an [`InstructionTable`]
//!    and gets back an [`InstructionId`](hoil_ir::InstructionId).
//! 2. **Resolve**: once, before anything runs, the table is consumed. Cached
//!    statements are served from the [`SnippetCache`]; the rest go to a
//!    [`Translator`] in a single batch. The result is a frozen
//!    [`ResolvedInstructions`] map.
//! 3. **Run**: the runtime looks snippets up by id. A statement without a
//!    snippet is only an error if it is actually executed.

mod cache;
mod chat;
mod error;
mod http;
mod snippet;
mod table;
mod translator;

pub use cache::{default_cache_path, SnippetCache};
pub use chat::ChatTranslator;
pub use error::{BridgeError, SnippetError};
pub use http::HttpTranslator;
pub use snippet::parse_snippet;
pub use table::{FunctionSignature, InstructionTable, Resolution, ResolvedInstructions};
pub use translator::{
    StatementRequest, TranslatedStatement, TranslationRequest, TranslationResponse, Translator,
};

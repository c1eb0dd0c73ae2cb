//! Builder for HOIL bytecode.
//!
//! Turns the flat line stream into a [`Program`] tree in a single pass. One
//! cursor is shared by all nested builders: a region builder consumes the
//! lines of its body and returns at the closing keyword, leaving the cursor
//! on the line after it.
//!
//! Every expression is lexed here, so malformed expressions are reported with
//! their line number before anything runs.

mod builder;
mod error;
mod keyword;

use hoil_bridge::InstructionTable;
use hoil_ir::{Program, StringInterner};

pub use error::BuildError;
pub use keyword::Keyword;

/// State shared with the rest of the pipeline while building.
pub struct BuildContext<'a> {
    pub interner: &'a StringInterner,
    /// Receives every `$instruct` statement and every function signature.
    pub instructions: &'a mut InstructionTable,
}

/// Build a program from bytecode source.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build(source: &str, ctx: &mut BuildContext<'_>) -> Result<Program, BuildError> {
    builder::Builder::new(source, ctx).build_program()
}

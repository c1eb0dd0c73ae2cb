use std::path::PathBuf;

use hoil_lexer::LexError;
use thiserror::Error;

/// Failures of the resolve phase. All of them abort the run before any node
/// executes.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("translation request failed: {0}")]
    Transport(String),

    #[error("translation service returned an invalid response: {0}")]
    Protocol(String),

    #[error("instruction cache I/O error at {}: {source}", path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ureq::Error> for BridgeError {
    fn from(value: ureq::Error) -> Self {
        match value {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                BridgeError::Transport(format!("HTTP {code}: {}", body.trim()))
            }
            ureq::Error::Transport(transport) => BridgeError::Transport(transport.to_string()),
        }
    }
}

/// A snippet that does not parse into host opcodes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnippetError {
    #[error("line {line}: unknown opcode `{opcode}`")]
    UnknownOpcode { line: usize, opcode: String },

    #[error("line {line}: `{opcode}` is missing its {operand}")]
    MissingOperand {
        line: usize,
        opcode: &'static str,
        operand: &'static str,
    },

    #[error("line {line}: {source}")]
    Lex {
        line: usize,
        #[source]
        source: LexError,
    },

    #[error("snippet is empty")]
    Empty,
}

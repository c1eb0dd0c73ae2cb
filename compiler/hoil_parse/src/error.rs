use hoil_lexer::LexError;
use thiserror::Error;

use crate::Keyword;

/// Structural errors in the bytecode. Every variant carries the 1-based line
/// number it was found on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("line {line}: unrecognised statement `{text}`")]
    UnknownStatement { line: usize, text: String },

    #[error("line {line}: `{opened}` is never closed")]
    Unterminated { line: usize, opened: Keyword },

    #[error("line {line}: expected `{expected}`, found `{found}`")]
    MismatchedClose {
        line: usize,
        expected: Keyword,
        found: Keyword,
    },

    #[error("line {line}: `{found}` without a matching opener")]
    UnexpectedClose { line: usize, found: Keyword },

    #[error("line {line}: {reason}")]
    BranchArmOrder { line: usize, reason: &'static str },

    #[error("line {line}: `{keyword}` outside of a loop")]
    JumpOutsideLoop { line: usize, keyword: Keyword },

    #[error("line {line}: `$return` outside of a function")]
    ReturnOutsideFunction { line: usize },

    #[error("line {line}: `{keyword}` is missing its {operand}")]
    MissingOperand {
        line: usize,
        keyword: Keyword,
        operand: &'static str,
    },

    #[error("line {line}: unknown type hint `{hint}`")]
    UnknownTypeHint { line: usize, hint: String },

    #[error("line {line}: {source}")]
    Lex {
        line: usize,
        #[source]
        source: LexError,
    },
}

impl BuildError {
    pub fn line(&self) -> usize {
        match self {
            BuildError::UnknownStatement { line, .. }
            | BuildError::Unterminated { line, .. }
            | BuildError::MismatchedClose { line, .. }
            | BuildError::UnexpectedClose { line, .. }
            | BuildError::BranchArmOrder { line, .. }
            | BuildError::JumpOutsideLoop { line, .. }
            | BuildError::ReturnOutsideFunction { line }
            | BuildError::MissingOperand { line, .. }
            | BuildError::UnknownTypeHint { line, .. }
            | BuildError::Lex { line, .. } => *line,
        }
    }
}

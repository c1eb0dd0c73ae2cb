use thiserror::Error;

/// Errors produced while lexing an expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal in `{item}`")]
    UnterminatedString { item: String },

    #[error("unterminated call region in `{item}`")]
    UnterminatedCall { item: String },

    #[error("unterminated array index in `{item}`")]
    UnterminatedIndex { item: String },

    #[error("unbalanced `{found}` in `{item}`")]
    UnbalancedDelimiter { found: char, item: String },

    #[error("malformed variable reference `{item}`")]
    MalformedVariable { item: String },

    #[error("malformed call `{item}`: {reason}")]
    MalformedCall { item: String, reason: &'static str },

    #[error("malformed array index `{item}`: {reason}")]
    MalformedIndex { item: String, reason: &'static str },
}

//! Runtime error types.

use hoil_ir::{InstructionId, Op};
use hoil_lexer::LexError;
use thiserror::Error;

/// Expression-level failures.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },

    #[error("variable `{name}` was read before it was assigned")]
    UseBeforeAssignment { name: String },

    #[error("unknown operator `{spelling}`")]
    UnknownOperator { spelling: String },

    #[error("operator `{op}` needs {needed} operand(s) on the stack")]
    StackUnderflow { op: Op, needed: usize },

    #[error("malformed expression `{expr}`: {reason}")]
    MalformedExpression { expr: String, reason: &'static str },

    #[error("operator `{op}` cannot be applied to {left} and {right}")]
    TypeMismatch {
        op: Op,
        left: &'static str,
        right: &'static str,
    },

    #[error("operator `{op}` cannot be applied to {operand}")]
    InvalidOperand { op: Op, operand: &'static str },

    #[error("`{name}` is {found}, not an array")]
    NotAnArray { name: String, found: &'static str },

    #[error("array `{name}` has no element {index}")]
    IndexNotFound { name: String, index: usize },

    #[error("`{index}` is not a valid array index")]
    InvalidIndex { index: String },

    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },

    #[error("`{name}` takes {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {position} of `{name}` must be {expected}, got {found}")]
    ArgumentType {
        name: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot assign to fixed variable `{name}`")]
    ImmutableBinding { name: String },

    #[error("string interpolation nested too deeply while reading `{name}`")]
    InterpolationTooDeep { name: String },

    #[error(transparent)]
    Lex(#[from] LexError),
}

/// A failure reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Any failure that stops a running program.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("instruction {id} (`{statement}`) has no snippet: {reason}")]
    UnresolvedStatement {
        id: InstructionId,
        statement: String,
        reason: String,
    },

    #[error("host call `{capability}` failed: {source}")]
    Host {
        capability: &'static str,
        #[source]
        source: HostError,
    },

    /// `break`/`continue` reached a function boundary or the top level.
    #[error("`{keyword}` escaped {boundary}")]
    StrayJump {
        keyword: &'static str,
        boundary: &'static str,
    },
}

impl RuntimeError {
    /// The expression-level error, if that is what this is.
    pub fn as_eval(&self) -> Option<&EvalError> {
        match self {
            RuntimeError::Eval(err) => Some(err),
            _ => None,
        }
    }
}

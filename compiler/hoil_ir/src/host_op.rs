//! Host opcodes.
//!
//! A resolved natural-language statement is a short list of these opcodes.
//! The set is deliberately narrow: declare, assign, read and call. Anything a
//! translation service returns outside this set fails to parse and never
//! reaches the runtime.

use std::rc::Rc;

use crate::{Expr, Name};

/// Left-hand side of an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    Variable(Name),
    /// `#[array,index]`
    Element { array: Name, index: Expr },
}

impl Target {
    /// Name of the variable that is written.
    pub fn name(&self) -> Name {
        match self {
            Target::Variable(name) | Target::Element { array: name, .. } => *name,
        }
    }
}

/// One primitive operation of a translated snippet.
///
/// Snippets cannot branch or loop; anything beyond these four operations has
/// to be expressed as a call.
#[derive(Clone, Debug, PartialEq)]
pub enum HostOp {
    /// Declare in the current scope, optionally with a value.
    Declare { name: Name, value: Option<Expr> },
    /// Write a value to the nearest visible binding.
    Assign { target: Target, value: Expr },
    /// Read a variable; the value becomes the statement's result.
    Read { name: Name },
    /// Call a user function or host capability.
    Call { callee: Name, args: Vec<Expr> },
}

/// A parsed snippet for one instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct Snippet {
    source: Rc<str>,
    ops: Vec<HostOp>,
}

impl Snippet {
    pub fn new(source: impl Into<Rc<str>>, ops: Vec<HostOp>) -> Self {
        Snippet {
            source: source.into(),
            ops,
        }
    }

    /// Snippet text as returned by the translation service or the cache.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }
}

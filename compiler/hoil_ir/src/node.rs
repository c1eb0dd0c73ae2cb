//! Executable node tree.
//!
//! The builder turns the flat line stream into this tree once. Composite nodes
//! own their children: a [`Block`] is the ordered sibling list that the runtime
//! walks, and every region (branch arm, scope, loop body, function body) is a
//! nested `Block`.
//!
//! The only interior mutability is the "last produced value" recorded by
//! expression and instruct nodes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{Expr, Name, Target, Value};

/// An ordered list of sibling nodes.
pub type Block = Vec<Node>;

/// Identifier of a submitted natural-language statement.
///
/// Ids are handed out in submission order starting at zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstructionId(u32);

impl InstructionId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        InstructionId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstructionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value kind named by a type hint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Str,
    Bool,
    Array,
    Object,
    Any,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Number => "num",
            ValueKind::Str => "str",
            ValueKind::Bool => "bool",
            ValueKind::Array => "arr",
            ValueKind::Object => "obj",
            ValueKind::Any => "any",
        }
    }
}

/// Declared type hint: `num`, `arr`, `const:str`, ...
///
/// Hints are not checked against values. `arr` seeds an empty array and the
/// `const:` prefix makes the binding fixed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeHint {
    pub kind: ValueKind,
    pub fixed: bool,
}

impl TypeHint {
    pub const ANY: TypeHint = TypeHint {
        kind: ValueKind::Any,
        fixed: false,
    };

    pub fn parse(text: &str) -> Option<TypeHint> {
        let (fixed, kind) = match text.strip_prefix("const:") {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let kind = match kind {
            "num" => ValueKind::Number,
            "str" => ValueKind::Str,
            "bool" => ValueKind::Bool,
            "arr" => ValueKind::Array,
            "obj" => ValueKind::Object,
            "any" => ValueKind::Any,
            _ => return None,
        };
        Some(TypeHint { kind, fixed })
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fixed {
            f.write_str("const:")?;
        }
        f.write_str(self.kind.as_str())
    }
}

/// `$decl name hint [expr]`
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: Name,
    pub hint: TypeHint,
    pub init: Option<Expr>,
}

/// `$assign target expr`
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub target: Target,
    pub value: Expr,
}

/// A branch or loop condition; records the last value it produced so the
/// outcome can be inspected after the run.
#[derive(Debug)]
pub struct ExprNode {
    pub expr: Expr,
    last: RefCell<Option<Value>>,
}

impl ExprNode {
    pub fn new(expr: Expr) -> Self {
        ExprNode {
            expr,
            last: RefCell::new(None),
        }
    }

    pub fn record(&self, value: Value) {
        *self.last.borrow_mut() = Some(value);
    }

    pub fn last_value(&self) -> Option<Value> {
        self.last.borrow().clone()
    }
}

/// One guarded arm of a branch.
#[derive(Debug)]
pub struct Conditional {
    pub condition: ExprNode,
    pub body: Block,
}

/// `if`, any number of `elif`s, optional `else`.
#[derive(Debug)]
pub struct Branch {
    /// The `if` arm followed by the `elif` arms in source order.
    pub arms: Vec<Conditional>,
    pub otherwise: Option<Block>,
}

/// `$while cond` ... `$while_end`
#[derive(Debug)]
pub struct Loop {
    pub condition: ExprNode,
    pub body: Block,
}

/// Function parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub hint: TypeHint,
}

/// `$func_decl name [hint] $param ...` ... `$func_decl_end`
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Name,
    pub return_hint: Option<TypeHint>,
    pub params: Vec<Param>,
    pub body: Block,
}

/// `$call name args`
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub callee: Name,
    pub args: Vec<Expr>,
}

/// A natural-language statement, resolved through the instruction bridge.
#[derive(Debug)]
pub struct InstructNode {
    pub id: InstructionId,
    pub statement: Rc<str>,
    last: RefCell<Option<Value>>,
}

impl InstructNode {
    pub fn new(id: InstructionId, statement: impl Into<Rc<str>>) -> Self {
        InstructNode {
            id,
            statement: statement.into(),
            last: RefCell::new(None),
        }
    }

    pub fn record(&self, value: Value) {
        *self.last.borrow_mut() = Some(value);
    }

    pub fn last_value(&self) -> Option<Value> {
        self.last.borrow().clone()
    }
}

/// An executable node.
#[derive(Debug)]
pub enum Node {
    Declaration(Declaration),
    Assignment(Assignment),
    Branch(Branch),
    Scoped(Block),
    Loop(Loop),
    Break,
    Continue,
    Instruct(InstructNode),
    Function(FunctionDecl),
    Return(Option<Expr>),
    Call(Call),
}

impl Node {
    /// Short label for tracing.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Declaration(_) => "decl",
            Node::Assignment(_) => "assign",
            Node::Branch(_) => "branch",
            Node::Scoped(_) => "scope",
            Node::Loop(_) => "loop",
            Node::Break => "break",
            Node::Continue => "continue",
            Node::Instruct(_) => "instruct",
            Node::Function(_) => "func_decl",
            Node::Return(_) => "return",
            Node::Call(_) => "call",
        }
    }
}

/// A built program: the top-level sibling list.
#[derive(Debug, Default)]
pub struct Program {
    pub body: Block,
}

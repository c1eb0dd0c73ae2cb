//! Expression tokens.
//!
//! Expressions arrive in postfix order, so a token list is already an
//! evaluation order: the evaluator walks it once, left to right.

use std::fmt;
use std::rc::Rc;

use crate::{Name, Value};

/// Literal payload of a token.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    /// Contents without the surrounding quotes.
    Str(Rc<str>),
    Bool(bool),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(Rc::clone(s)),
            Literal::Bool(b) => Value::Bool(*b),
        }
    }
}

/// Known operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    /// `!`
    Not,
    /// `[`, arithmetic negation.
    Neg,
}

impl Op {
    pub fn from_spelling(spelling: &str) -> Option<Op> {
        Some(match spelling {
            "+" => Op::Add,
            "-" => Op::Sub,
            "*" => Op::Mul,
            "/" => Op::Div,
            "%" => Op::Mod,
            "&&" => Op::And,
            "||" => Op::Or,
            "==" => Op::Eq,
            "!=" => Op::NotEq,
            ">" => Op::Gt,
            ">=" => Op::GtEq,
            "<" => Op::Lt,
            "<=" => Op::LtEq,
            "!" => Op::Not,
            "[" => Op::Neg,
            _ => return None,
        })
    }

    /// Unary operators pop one operand, all others pop two.
    #[inline]
    pub fn is_unary(self) -> bool {
        matches!(self, Op::Not | Op::Neg)
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::And => "&&",
            Op::Or => "||",
            Op::Eq => "==",
            Op::NotEq => "!=",
            Op::Gt => ">",
            Op::GtEq => ">=",
            Op::Lt => "<",
            Op::LtEq => "<=",
            Op::Not => "!",
            Op::Neg => "[",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Classification of a lexed item.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Literal(Literal),
    Variable(Name),
    /// `None` when the spelling is not a known operator; that is reported
    /// when the token is evaluated, not when it is lexed.
    Operator(Option<Op>),
    /// `(callee,arg1,arg2,...)`
    NestedCall { callee: Name, args: Vec<Expr> },
    /// `#[array,index]`
    ArrayIndex { array: Name, index: Box<Expr> },
}

/// A single lexed expression item.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Raw text of the item as written.
    pub spelling: Rc<str>,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(spelling: impl Into<Rc<str>>, kind: TokenKind) -> Self {
        Token {
            spelling: spelling.into(),
            kind,
        }
    }
}

/// A pre-lexed postfix expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    source: Rc<str>,
    tokens: Vec<Token>,
}

impl Expr {
    pub fn new(source: impl Into<Rc<str>>, tokens: Vec<Token>) -> Self {
        Expr {
            source: source.into(),
            tokens,
        }
    }

    /// Expression text as written in the bytecode.
    pub fn source(&self) -> &Rc<str> {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests;

//! HOIL IR - Intermediate Representation Types
//!
//! This crate contains the core data structures shared by every phase of the
//! HOIL interpreter:
//! - Names for interned identifiers
//! - Runtime values
//! - Expression tokens and pre-lexed expressions
//! - The executable node tree produced by the builder
//! - Host opcodes produced by the instruction bridge
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers become `Name(u32)` once, at build time
//! - **Own the Tree**: composite nodes own their children; no back links
//! - **Freeze after Build**: nothing in the node tree is mutated structurally
//!   once the builder returns

mod host_op;
mod interner;
mod name;
pub mod node;
mod token;
mod value;

pub use host_op::{HostOp, Snippet, Target};
pub use interner::StringInterner;
pub use name::Name;
pub use node::{
    Assignment, Block, Branch, Call, Conditional, Declaration, ExprNode, FunctionDecl,
    InstructNode, InstructionId, Loop, Node, Param, Program, TypeHint, ValueKind,
};
pub use token::{Expr, Literal, Op, Token, TokenKind};
pub use value::{HostObject, Value};

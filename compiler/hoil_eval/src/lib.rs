//! HOIL runtime.
//!
//! - [`VariableTable`]: scope stack with shadowing and isolation
//! - [`evaluate`]: postfix expression stack machine
//! - [`Interpreter`]: walks the node tree built by `hoil_parse`
//! - [`Host`]: capability surface the program drives (robot arm, printer)
//!
//! Control flow is an explicit [`Flow`] value returned by every node; errors
//! travel on the `Err` side of the same `Result`.

mod environment;
mod errors;
mod eval;
pub mod host;
mod interpreter;
mod operators;
mod print_handler;
mod stack;

pub use environment::{
    AssignError, Binding, LocalScope, LookupError, Scope, ScopeStats, Variable, VariableTable,
};
pub use errors::{EvalError, HostError, RuntimeError};
pub use eval::{evaluate, evaluate_str, EvalContext};
pub use host::{Capability, Host, ObjectRef, SimulatedArm};
pub use interpreter::{Flow, Interpreter};
pub use operators::{apply_binary, apply_unary};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use stack::ensure_sufficient_stack;

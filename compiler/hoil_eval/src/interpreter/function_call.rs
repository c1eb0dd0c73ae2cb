//! User function registry and the call protocol.
//!
//! Running a `$func_decl` node registers it together with the scope chain
//! live at that point. A call evaluates its arguments in the caller, swaps in
//! a table built from the captured chain, binds the parameters by value in a
//! fresh scope and runs the body. The caller's table comes back when the
//! frame guard drops.

use std::ops::{Deref, DerefMut};

use hoil_ir::{FunctionDecl, Name, Value};

use super::{stray, Flow, Interpreter};
use crate::environment::{Variable, VariableTable};
use crate::eval::resolve_outgoing;
use crate::host::{self, Capability};
use crate::{ensure_sufficient_stack, EvalError, RuntimeError};

/// A registered user function.
pub(crate) struct FunctionEntry<'a> {
    decl: &'a FunctionDecl,
    /// Scopes visible where the declaration ran.
    captured: VariableTable,
}

/// Puts the caller's table and loop depth back on drop.
struct FrameGuard<'guard, 'a> {
    interpreter: &'guard mut Interpreter<'a>,
    caller_table: VariableTable,
    caller_loop_depth: usize,
}

impl Drop for FrameGuard<'_, '_> {
    fn drop(&mut self) {
        std::mem::swap(&mut self.interpreter.table, &mut self.caller_table);
        self.interpreter.loop_depth = self.caller_loop_depth;
    }
}

impl<'a> Deref for FrameGuard<'_, 'a> {
    type Target = Interpreter<'a>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for FrameGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    pub(crate) fn register_function(&mut self, decl: &'a FunctionDecl) {
        tracing::debug!(function = self.interner.lookup(decl.name), "registered");
        let captured = self.table.isolate();
        self.functions.insert(decl.name, FunctionEntry { decl, captured });
    }

    /// Call a user function, or a host capability if no user function has
    /// that name. String arguments bound for the host have their
    /// placeholders resolved in the caller's scope.
    pub(crate) fn call_function(
        &mut self,
        callee: Name,
        args: Vec<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        if let Some(entry) = self.functions.get(&callee) {
            let decl = entry.decl;
            let table = entry.captured.isolate();
            return ensure_sufficient_stack(|| self.invoke(decl, table, args));
        }

        let name = self.interner.lookup(callee);
        match Capability::from_name(name) {
            Some(capability) => {
                let args = args
                    .into_iter()
                    .map(|arg| resolve_outgoing(arg, &self.table, self.interner))
                    .collect::<Result<Vec<_>, _>>()?;
                host::dispatch(&mut *self.host, capability, &args)
            }
            None => Err(EvalError::UndefinedFunction {
                name: name.to_owned(),
            }
            .into()),
        }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(function = self.interner.lookup(decl.name), args = args.len())
    )]
    fn invoke(
        &mut self,
        decl: &'a FunctionDecl,
        table: VariableTable,
        args: Vec<Value>,
    ) -> Result<Option<Value>, RuntimeError> {
        if args.len() != decl.params.len() {
            return Err(EvalError::ArityMismatch {
                name: self.interner.lookup(decl.name).to_owned(),
                expected: decl.params.len(),
                found: args.len(),
            }
            .into());
        }

        let mut frame = self.enter_frame(table);
        let mut scoped = frame.scoped();
        for (param, arg) in decl.params.iter().zip(args) {
            scoped
                .table
                .define(param.name, Variable::new(Some(arg), None, param.hint.fixed));
        }
        match scoped.run_block(&decl.body)? {
            Flow::Return(value) => Ok(value),
            Flow::Next => Ok(None),
            Flow::Break => Err(stray("$break", "a function body")),
            Flow::Continue => Err(stray("$continue", "a function body")),
        }
    }

    fn enter_frame(&mut self, table: VariableTable) -> FrameGuard<'_, 'a> {
        let caller_table = std::mem::replace(&mut self.table, table);
        let caller_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        FrameGuard {
            interpreter: self,
            caller_table,
            caller_loop_depth,
        }
    }
}

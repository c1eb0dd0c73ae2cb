//! RAII guards over the interpreter.
//!
//! Each guard holds `&mut Interpreter` and derefs to it, so the guarded code
//! uses the interpreter as usual. The matching undo runs on drop, including
//! on unwinding.

use std::ops::{Deref, DerefMut};

use super::Interpreter;

/// Pops the scope pushed by [`Interpreter::scoped`].
pub(crate) struct ScopedInterpreter<'guard, 'a> {
    interpreter: &'guard mut Interpreter<'a>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.table.pop_scope();
    }
}

impl<'a> Deref for ScopedInterpreter<'_, 'a> {
    type Target = Interpreter<'a>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

/// Restores the loop depth saved by [`Interpreter::in_loop`].
pub(crate) struct LoopGuard<'guard, 'a> {
    interpreter: &'guard mut Interpreter<'a>,
    saved_depth: usize,
}

impl Drop for LoopGuard<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.loop_depth = self.saved_depth;
    }
}

impl<'a> Deref for LoopGuard<'_, 'a> {
    type Target = Interpreter<'a>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for LoopGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope that is popped when the guard drops.
    pub(crate) fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.table.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Count one more enclosing loop until the guard drops.
    pub(crate) fn in_loop(&mut self) -> LoopGuard<'_, 'a> {
        let saved_depth = self.loop_depth;
        self.loop_depth += 1;
        LoopGuard {
            interpreter: self,
            saved_depth,
        }
    }
}

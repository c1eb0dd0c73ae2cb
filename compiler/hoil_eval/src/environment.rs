//! Variable table: a stack of scopes.
//!
//! Reads walk from the innermost scope outwards; declarations always land in
//! the innermost scope, which is what gives shadowing. Scopes are shared
//! through [`LocalScope`], so [`VariableTable::isolate`] can hand a function
//! body a table that sees the scopes that were live at its declaration
//! without seeing anything pushed afterwards.

use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use hoil_ir::{Name, Value};

/// Error returned by [`VariableTable::get`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// Not declared in any visible scope.
    Undefined,
    /// Declared but never assigned.
    Unassigned,
}

/// Error returned by [`VariableTable::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The binding is fixed and already holds a value.
    Immutable,
    /// Not declared in any visible scope.
    Undefined,
}

/// Single-threaded shared scope, `Rc<RefCell<T>>` behind a factory.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Whether two handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A named storage cell.
///
/// A variable can exist without a value: `$decl x num` declares `x` but
/// leaves it unassigned, and reading it is an error until something is
/// stored. A fixed variable (`const:` hint) accepts exactly one value through
/// [`Variable::assign`]; [`Variable::inject`] ignores the flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    value: Option<Value>,
    /// Source of the expression that produced the current value.
    defining: Option<Rc<str>>,
    fixed: bool,
}

impl Variable {
    pub fn new(value: Option<Value>, defining: Option<Rc<str>>, fixed: bool) -> Self {
        Variable {
            value,
            defining,
            fixed,
        }
    }

    /// Declared, not fixed, no value yet.
    pub fn unassigned() -> Self {
        Variable::new(None, None, false)
    }

    pub fn with_value(value: Value) -> Self {
        Variable::new(Some(value), None, false)
    }

    /// The current value, or `None` if the variable was never assigned.
    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_assigned(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Source text of the expression that produced the current value.
    ///
    /// `None` for parameters, injected values and element writes.
    pub fn defining_expr(&self) -> Option<&str> {
        self.defining.as_deref()
    }

    /// Assign through the normal path; a fixed variable accepts only its
    /// first value.
    pub fn assign(&mut self, value: Value, defining: Option<Rc<str>>) -> Result<(), AssignError> {
        if self.fixed && self.is_assigned() {
            return Err(AssignError::Immutable);
        }
        self.value = Some(value);
        self.defining = defining;
        Ok(())
    }

    /// Store a value regardless of the fixed flag (host opcode writes).
    pub fn inject(&mut self, value: Value) {
        self.value = Some(value);
        self.defining = None;
    }
}

/// State of a binding, without its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    pub assigned: bool,
    pub fixed: bool,
}

/// A single scope.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Variable>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn define(&mut self, name: Name, variable: Variable) {
        self.bindings.insert(name, variable);
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&Variable> {
        self.bindings.get(&name)
    }

    #[inline]
    pub fn get_mut(&mut self, name: Name) -> Option<&mut Variable> {
        self.bindings.get_mut(&name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Push/pop counters shared by a table and every table isolated from it.
///
/// A run that finishes, by any path, with `pushes != pops` has leaked a
/// scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScopeStats {
    pub pushes: usize,
    pub pops: usize,
}

impl ScopeStats {
    pub fn is_balanced(self) -> bool {
        self.pushes == self.pops
    }
}

/// Scope stack for one activation.
///
/// The bottom scope is never popped. Isolated tables share their counters
/// with the table they were made from, so [`VariableTable::stats`] covers
/// function bodies too.
#[derive(Debug)]
pub struct VariableTable {
    scopes: Vec<LocalScope<Scope>>,
    stats: Rc<Cell<ScopeStats>>,
}

impl VariableTable {
    /// A table holding only the global scope.
    pub fn new() -> Self {
        VariableTable {
            scopes: vec![LocalScope::new(Scope::new())],
            stats: Rc::new(Cell::new(ScopeStats::default())),
        }
    }

    /// Number of scopes, including the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        self.scopes.push(LocalScope::new(Scope::new()));
        self.bump(|stats| stats.pushes += 1);
    }

    /// Pop the innermost scope. The global scope stays.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            self.bump(|stats| stats.pops += 1);
        }
    }

    fn bump(&self, f: impl FnOnce(&mut ScopeStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    pub fn stats(&self) -> ScopeStats {
        self.stats.get()
    }

    fn top(&self) -> &LocalScope<Scope> {
        // `scopes` always holds at least the global scope
        &self.scopes[self.scopes.len() - 1]
    }

    /// Define (or redefine) a variable in the innermost scope.
    pub fn define(&mut self, name: Name, variable: Variable) {
        self.top().borrow_mut().define(name, variable);
    }

    /// State of `name` in the innermost scope only.
    pub fn top_binding(&self, name: Name) -> Option<Binding> {
        self.top().borrow().get(name).map(|variable| Binding {
            assigned: variable.is_assigned(),
            fixed: variable.is_fixed(),
        })
    }

    /// Whether `name` is declared in any visible scope.
    pub fn is_defined(&self, name: Name) -> bool {
        self.scopes
            .iter()
            .rev()
            .any(|scope| scope.borrow().get(name).is_some())
    }

    /// Read the nearest visible binding of `name`.
    pub fn get(&self, name: Name) -> Result<Value, LookupError> {
        for scope in self.scopes.iter().rev() {
            if let Some(variable) = scope.borrow().get(name) {
                return variable.get().cloned().ok_or(LookupError::Unassigned);
            }
        }
        Err(LookupError::Undefined)
    }

    /// Assign to the nearest visible binding of `name`.
    pub fn assign(
        &mut self,
        name: Name,
        value: Value,
        defining: Option<Rc<str>>,
    ) -> Result<(), AssignError> {
        for scope in self.scopes.iter().rev() {
            if let Some(variable) = scope.borrow_mut().get_mut(name) {
                return variable.assign(value, defining);
            }
        }
        Err(AssignError::Undefined)
    }

    /// Write the nearest visible binding of `name`, ignoring the fixed flag.
    pub fn inject(&mut self, name: Name, value: Value) -> Result<(), LookupError> {
        for scope in self.scopes.iter().rev() {
            if let Some(variable) = scope.borrow_mut().get_mut(name) {
                variable.inject(value);
                return Ok(());
            }
        }
        Err(LookupError::Undefined)
    }

    /// A new table over the same scopes.
    ///
    /// Scopes pushed on either table afterwards are private to it; writes to
    /// the shared scopes are seen by both.
    #[must_use]
    pub fn isolate(&self) -> Self {
        VariableTable {
            scopes: self.scopes.clone(),
            stats: Rc::clone(&self.stats),
        }
    }
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

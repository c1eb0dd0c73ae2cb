//! Tree-walking interpreter for built HOIL programs.
//!
//! Every node returns a [`Flow`]: `Next` keeps the enclosing block going,
//! the jump variants unwind to their owner. Loops absorb `Break` and
//! `Continue`, calls absorb `Return`. Scopes and frames are restored by RAII
//! guards, so every exit path, including errors, leaves the table balanced.

mod function_call;
mod instruct;
mod scope_guard;

use rustc_hash::FxHashMap;
use std::rc::Rc;

use hoil_bridge::ResolvedInstructions;
use hoil_ir::{
    Assignment, Block, Branch, Declaration, Expr, Loop, Name, Node, Program, StringInterner,
    Target, Value, ValueKind,
};

use crate::environment::{AssignError, LookupError, ScopeStats, Variable, VariableTable};
use crate::eval::{array_key, evaluate, lookup_error, EvalContext};
use crate::host::Host;
use crate::{EvalError, RuntimeError};

pub(crate) use function_call::FunctionEntry;

const NO_LOOP: &str = "a body with no enclosing loop";

/// How control leaves a node.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    Next,
    Break,
    Continue,
    Return(Option<Value>),
}

/// Runs one program against a host.
pub struct Interpreter<'a> {
    table: VariableTable,
    interner: &'a StringInterner,
    instructions: &'a ResolvedInstructions,
    host: &'a mut dyn Host,
    functions: FxHashMap<Name, FunctionEntry<'a>>,
    /// Loops enclosing the node being run, within the current function.
    loop_depth: usize,
}

impl<'a> Interpreter<'a> {
    /// An interpreter with an empty global scope and no registered
    /// functions. `instructions` must come from the same build as the
    /// program passed to [`Interpreter::run_program`].
    pub fn new(
        interner: &'a StringInterner,
        instructions: &'a ResolvedInstructions,
        host: &'a mut dyn Host,
    ) -> Self {
        Interpreter {
            table: VariableTable::new(),
            interner,
            instructions,
            host,
            functions: FxHashMap::default(),
            loop_depth: 0,
        }
    }

    /// Run the top-level block to completion.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = program.body.len()))]
    pub fn run_program(&mut self, program: &'a Program) -> Result<(), RuntimeError> {
        match self.run_block(&program.body)? {
            Flow::Next | Flow::Return(_) => Ok(()),
            Flow::Break => Err(stray("$break", "the program")),
            Flow::Continue => Err(stray("$continue", "the program")),
        }
    }

    /// Current value of a variable visible at the top level, by name.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        let name = self.interner.get(name)?;
        self.table.get(name).ok()
    }

    /// Push/pop counts over the whole run, function bodies included.
    pub fn scope_stats(&self) -> ScopeStats {
        self.table.stats()
    }

    pub fn scope_depth(&self) -> usize {
        self.table.depth()
    }

    /// Run sibling nodes until one leaves with something other than `Next`.
    pub(crate) fn run_block(&mut self, block: &'a Block) -> Result<Flow, RuntimeError> {
        for node in block {
            match self.run_node(node)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    fn run_node(&mut self, node: &'a Node) -> Result<Flow, RuntimeError> {
        tracing::trace!(kind = node.kind(), "run");
        match node {
            Node::Declaration(decl) => self.declare(decl),
            Node::Assignment(assignment) => self.assign(assignment),
            Node::Branch(branch) => self.run_branch(branch),
            Node::Scoped(body) => self.scoped().run_block(body),
            Node::Loop(lp) => self.run_loop(lp),
            Node::Break if self.loop_depth == 0 => Err(stray("$break", NO_LOOP)),
            Node::Continue if self.loop_depth == 0 => Err(stray("$continue", NO_LOOP)),
            Node::Break => Ok(Flow::Break),
            Node::Continue => Ok(Flow::Continue),
            Node::Instruct(instruct) => self.run_instruct(instruct),
            Node::Function(decl) => {
                self.register_function(decl);
                Ok(Flow::Next)
            }
            Node::Return(expr) => {
                let value = expr.as_ref().map(|expr| self.eval(expr)).transpose()?;
                Ok(Flow::Return(value))
            }
            Node::Call(call) => {
                let args = self.eval_args(&call.args)?;
                self.call_function(call.callee, args)?;
                Ok(Flow::Next)
            }
        }
    }

    fn declare(&mut self, decl: &Declaration) -> Result<Flow, RuntimeError> {
        match self.table.top_binding(decl.name) {
            Some(binding) if binding.fixed && binding.assigned => {}
            Some(_) => {
                if let Some(init) = &decl.init {
                    let value = self.eval(init)?;
                    self.table
                        .assign(decl.name, value, Some(Rc::clone(init.source())))
                        .map_err(|err| self.assign_error(err, decl.name))?;
                }
            }
            None => {
                let value = match &decl.init {
                    Some(init) => Some(self.eval(init)?),
                    None if decl.hint.kind == ValueKind::Array => Some(Value::empty_array()),
                    None => None,
                };
                let defining = decl.init.as_ref().map(|init| Rc::clone(init.source()));
                self.table
                    .define(decl.name, Variable::new(value, defining, decl.hint.fixed));
            }
        }
        Ok(Flow::Next)
    }

    fn assign(&mut self, assignment: &Assignment) -> Result<Flow, RuntimeError> {
        let value = self.eval(&assignment.value)?;
        let defining = Some(Rc::clone(assignment.value.source()));
        self.store(&assignment.target, value, defining, false)?;
        Ok(Flow::Next)
    }

    /// Write `value` to `target`. `inject` bypasses the fixed flag.
    fn store(
        &mut self,
        target: &Target,
        value: Value,
        defining: Option<Rc<str>>,
        inject: bool,
    ) -> Result<(), RuntimeError> {
        let (name, value, defining) = match target {
            Target::Variable(name) => (*name, value, defining),
            Target::Element { array, index } => {
                let key = array_key(&self.eval(index)?)?;
                let current = self
                    .table
                    .get(*array)
                    .map_err(|err| lookup_error(err, self.interner, *array))?;
                let mut items = match current {
                    Value::Array(items) => items,
                    other => {
                        return Err(EvalError::NotAnArray {
                            name: self.interner.lookup(*array).to_owned(),
                            found: other.type_name(),
                        }
                        .into());
                    }
                };
                Rc::make_mut(&mut items).insert(key, value);
                (*array, Value::Array(items), None)
            }
        };

        if inject {
            self.table
                .inject(name, value)
                .map_err(|err| lookup_error(err, self.interner, name))?;
        } else {
            self.table
                .assign(name, value, defining)
                .map_err(|err| self.assign_error(err, name))?;
        }
        Ok(())
    }

    fn assign_error(&self, err: AssignError, name: Name) -> EvalError {
        let name = self.interner.lookup(name).to_owned();
        match err {
            AssignError::Immutable => EvalError::ImmutableBinding { name },
            AssignError::Undefined => EvalError::UndefinedVariable { name },
        }
    }

    /// The first arm whose condition holds runs; later conditions are not
    /// evaluated.
    fn run_branch(&mut self, branch: &'a Branch) -> Result<Flow, RuntimeError> {
        for arm in &branch.arms {
            let condition = self.eval(&arm.condition.expr)?;
            let taken = condition.is_truthy();
            arm.condition.record(condition);
            if taken {
                return self.run_block(&arm.body);
            }
        }
        match &branch.otherwise {
            Some(body) => self.run_block(body),
            None => Ok(Flow::Next),
        }
    }

    fn run_loop(&mut self, lp: &'a Loop) -> Result<Flow, RuntimeError> {
        let mut looping = self.in_loop();
        loop {
            let condition = looping.eval(&lp.condition.expr)?;
            let proceed = condition.is_truthy();
            lp.condition.record(condition);
            if !proceed {
                return Ok(Flow::Next);
            }
            match looping.run_block(&lp.body)? {
                Flow::Next | Flow::Continue => {}
                Flow::Break => return Ok(Flow::Next),
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }
    }

    pub(crate) fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        evaluate(expr, self)
    }

    pub(crate) fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }

    pub(crate) fn lookup_error(&self, err: LookupError, name: Name) -> EvalError {
        lookup_error(err, self.interner, name)
    }
}

impl EvalContext for Interpreter<'_> {
    fn table(&self) -> &VariableTable {
        &self.table
    }

    fn interner(&self) -> &StringInterner {
        self.interner
    }

    fn call(&mut self, callee: Name, args: Vec<Value>) -> Result<Option<Value>, RuntimeError> {
        self.call_function(callee, args)
    }
}

pub(crate) fn stray(keyword: &'static str, boundary: &'static str) -> RuntimeError {
    RuntimeError::StrayJump { keyword, boundary }
}

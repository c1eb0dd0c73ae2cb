//! Execution of resolved `$instruct` statements.

use hoil_bridge::Resolution;
use hoil_ir::{HostOp, InstructNode, Value};

use super::{Flow, Interpreter};
use crate::environment::Variable;
use crate::eval::read_variable;
use crate::RuntimeError;

impl Interpreter<'_> {
    /// Run the snippet resolved for `node`, in the current scope.
    ///
    /// `Declare` and `Assign` write directly, ignoring the fixed flag. The
    /// value of the last `Assign`, `Read` or value-returning `Call` is
    /// recorded on the node.
    pub(crate) fn run_instruct(&mut self, node: &InstructNode) -> Result<Flow, RuntimeError> {
        let instructions = self.instructions;
        let snippet = match instructions.get(node.id) {
            Some(Resolution::Resolved(snippet)) => snippet,
            Some(Resolution::Unresolved { reason }) => {
                return Err(unresolved(node, reason.clone()));
            }
            None => return Err(unresolved(node, "statement was never submitted".to_owned())),
        };
        tracing::debug!(id = %node.id, ops = snippet.ops().len(), "instruct");

        let mut last = Value::Unit;
        for op in snippet.ops() {
            match op {
                HostOp::Declare { name, value } => {
                    let value = value.as_ref().map(|expr| self.eval(expr)).transpose()?;
                    if self.table.top_binding(*name).is_some() {
                        if let Some(value) = value {
                            self.table
                                .inject(*name, value)
                                .map_err(|err| self.lookup_error(err, *name))?;
                        }
                    } else {
                        self.table.define(*name, Variable::new(value, None, false));
                    }
                }
                HostOp::Assign { target, value } => {
                    let value = self.eval(value)?;
                    self.store(target, value.clone(), None, true)?;
                    last = value;
                }
                HostOp::Read { name } => {
                    last = read_variable(&self.table, self.interner, *name)?;
                }
                HostOp::Call { callee, args } => {
                    let args = self.eval_args(args)?;
                    if let Some(value) = self.call_function(*callee, args)? {
                        last = value;
                    }
                }
            }
        }
        node.record(last);
        Ok(Flow::Next)
    }
}

fn unresolved(node: &InstructNode, reason: String) -> RuntimeError {
    RuntimeError::UnresolvedStatement {
        id: node.id,
        statement: node.statement.to_string(),
        reason,
    }
}

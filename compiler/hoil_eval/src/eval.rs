//! Postfix expression evaluator.
//!
//! A single left-to-right pass over the token list with an operand stack.
//! Binary operators pop the right operand first, so the operand pushed first
//! is always the left one. A well-formed expression leaves exactly one value.
//!
//! String literals are pushed as written. Their `{name}` placeholders resolve
//! when the string is read back from a variable or handed to the host.

use smallvec::SmallVec;
use std::rc::Rc;

use hoil_ir::{Expr, Name, StringInterner, TokenKind, Value};

use crate::environment::{LookupError, VariableTable};
use crate::operators::{apply_binary, apply_unary};
use crate::{EvalError, RuntimeError};

/// Placeholder resolution stops after this many nested string reads.
const MAX_INTERPOLATION_DEPTH: usize = 16;

/// Largest index representable exactly as an `f64`.
const MAX_INDEX: f64 = 9_007_199_254_740_992.0;

/// What the evaluator needs from its surroundings.
pub trait EvalContext {
    fn table(&self) -> &VariableTable;

    fn interner(&self) -> &StringInterner;

    /// Invoke a user function or host capability with evaluated arguments.
    fn call(&mut self, callee: Name, args: Vec<Value>) -> Result<Option<Value>, RuntimeError>;
}

/// Evaluate a pre-lexed expression.
pub fn evaluate<C: EvalContext + ?Sized>(expr: &Expr, ctx: &mut C) -> Result<Value, RuntimeError> {
    let mut stack: SmallVec<[Value; 8]> = SmallVec::new();

    for token in expr.tokens() {
        match &token.kind {
            TokenKind::Literal(literal) => stack.push(literal.to_value()),
            TokenKind::Variable(name) => {
                stack.push(read_variable(ctx.table(), ctx.interner(), *name)?);
            }
            TokenKind::NestedCall { callee, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(evaluate(arg, ctx)?);
                }
                if let Some(value) = ctx.call(*callee, values)? {
                    stack.push(value);
                }
            }
            TokenKind::ArrayIndex { array, index } => {
                let index = evaluate(index, ctx)?;
                stack.push(index_array(ctx.table(), ctx.interner(), *array, &index)?);
            }
            TokenKind::Operator(None) => {
                return Err(EvalError::UnknownOperator {
                    spelling: token.spelling.to_string(),
                }
                .into());
            }
            TokenKind::Operator(Some(op)) => {
                let op = *op;
                let underflow = EvalError::StackUnderflow {
                    op,
                    needed: if op.is_unary() { 1 } else { 2 },
                };
                let value = if op.is_unary() {
                    let operand = stack.pop().ok_or(underflow)?;
                    apply_unary(op, operand)?
                } else {
                    if stack.len() < 2 {
                        return Err(underflow.into());
                    }
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(underflow.into());
                    };
                    apply_binary(op, left, right)?
                };
                stack.push(value);
            }
        }
    }

    match stack.len() {
        1 => Ok(stack.pop().unwrap_or(Value::Unit)),
        0 => Err(malformed(expr, "expression produced no value")),
        _ => Err(malformed(expr, "expression left more than one value")),
    }
}

/// Lex and evaluate expression text.
pub fn evaluate_str<C: EvalContext + ?Sized>(source: &str, ctx: &mut C) -> Result<Value, RuntimeError> {
    let expr = hoil_lexer::lex_expr(source, ctx.interner()).map_err(EvalError::from)?;
    evaluate(&expr, ctx)
}

fn malformed(expr: &Expr, reason: &'static str) -> RuntimeError {
    EvalError::MalformedExpression {
        expr: expr.source().to_string(),
        reason,
    }
    .into()
}

/// Read a variable, resolving placeholders in string values.
pub(crate) fn read_variable(
    table: &VariableTable,
    interner: &StringInterner,
    name: Name,
) -> Result<Value, EvalError> {
    match table.get(name) {
        Ok(Value::Str(text)) => Ok(Value::Str(interpolate(&text, table, interner, 1)?)),
        Ok(value) => Ok(value),
        Err(err) => Err(lookup_error(err, interner, name)),
    }
}

/// Resolve placeholders in a string that is leaving the program, such as a
/// host call argument. Other values pass through.
pub(crate) fn resolve_outgoing(
    value: Value,
    table: &VariableTable,
    interner: &StringInterner,
) -> Result<Value, EvalError> {
    match value {
        Value::Str(text) => Ok(Value::Str(interpolate(&text, table, interner, 0)?)),
        other => Ok(other),
    }
}

pub(crate) fn lookup_error(err: LookupError, interner: &StringInterner, name: Name) -> EvalError {
    let name = interner.lookup(name).to_owned();
    match err {
        LookupError::Undefined => EvalError::UndefinedVariable { name },
        LookupError::Unassigned => EvalError::UseBeforeAssignment { name },
    }
}

/// Convert an evaluated index into an array key.
pub(crate) fn array_key(index: &Value) -> Result<usize, EvalError> {
    match index {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= MAX_INDEX => {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "range and integrality checked by the guard"
            )]
            let key = *n as usize;
            Ok(key)
        }
        other => Err(EvalError::InvalidIndex {
            index: other.to_string(),
        }),
    }
}

fn index_array(
    table: &VariableTable,
    interner: &StringInterner,
    array: Name,
    index: &Value,
) -> Result<Value, EvalError> {
    let key = array_key(index)?;
    match read_variable(table, interner, array)? {
        Value::Array(items) => items
            .get(&key)
            .cloned()
            .ok_or_else(|| EvalError::IndexNotFound {
                name: interner.lookup(array).to_owned(),
                index: key,
            }),
        other => Err(EvalError::NotAnArray {
            name: interner.lookup(array).to_owned(),
            found: other.type_name(),
        }),
    }
}

/// Resolve `{name}` placeholders.
///
/// Names that are not declared stay as written; declared but unassigned
/// names are an error. String values are themselves resolved, one level
/// deeper each time.
fn interpolate(
    text: &Rc<str>,
    table: &VariableTable,
    interner: &StringInterner,
    depth: usize,
) -> Result<Rc<str>, EvalError> {
    if !text.contains('{') {
        return Ok(Rc::clone(text));
    }

    let mut out = String::with_capacity(text.len());
    let mut rest: &str = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let ident = &after[..close];
        match placeholder(ident, table, interner, depth)? {
            Some(resolved) => out.push_str(&resolved),
            None => {
                out.push('{');
                out.push_str(ident);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(Rc::from(out))
}

fn placeholder(
    ident: &str,
    table: &VariableTable,
    interner: &StringInterner,
    depth: usize,
) -> Result<Option<Rc<str>>, EvalError> {
    let is_ident = !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_');
    if !is_ident {
        return Ok(None);
    }
    let Some(name) = interner.get(ident) else {
        return Ok(None);
    };
    match table.get(name) {
        Err(LookupError::Undefined) => Ok(None),
        Err(LookupError::Unassigned) => Err(EvalError::UseBeforeAssignment {
            name: ident.to_owned(),
        }),
        Ok(Value::Str(inner)) => {
            if depth >= MAX_INTERPOLATION_DEPTH {
                return Err(EvalError::InterpolationTooDeep {
                    name: ident.to_owned(),
                });
            }
            interpolate(&inner, table, interner, depth + 1).map(Some)
        }
        Ok(value) => Ok(Some(Rc::from(value.to_string()))),
    }
}

//! Runtime values.
//!
//! Values are cheap to clone: strings and arrays are reference counted and
//! arrays are copy-on-write through [`Rc::make_mut`].

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Handle to an object owned by the host (a scene object, a detected part).
///
/// The interpreter never looks inside; it only passes handles back to the
/// host capability that understands them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostObject {
    /// Host-assigned identity.
    pub id: u32,
    /// Human-readable label used for display and for host lookups.
    pub label: Rc<str>,
}

impl HostObject {
    pub fn new(id: u32, label: impl Into<Rc<str>>) -> Self {
        HostObject {
            id,
            label: label.into(),
        }
    }
}

/// A HOIL runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    /// String payload. `{name}` placeholders are resolved when the string is
    /// read, not when it is stored.
    Str(Rc<str>),
    /// Sparse ordered mapping from integer index to value.
    Array(Rc<BTreeMap<usize, Value>>),
    Opaque(HostObject),
    /// Result of a statement that produces nothing.
    Unit,
}

impl Value {
    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// An array with no elements.
    pub fn empty_array() -> Self {
        Value::Array(Rc::new(BTreeMap::new()))
    }

    /// Build a dense array indexed from zero.
    pub fn array_from(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(items.into_iter().enumerate().collect()))
    }

    /// Truthiness used by conditions and the logical operators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Opaque(_) => true,
            Value::Unit => false,
        }
    }

    /// Name of the value's kind, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Opaque(_) => "object",
            Value::Unit => "unit",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.values().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Opaque(obj) => write!(f, "<{}>", obj.label),
            Value::Unit => f.write_str("()"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
mod tests;

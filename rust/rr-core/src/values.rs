//! Tagged value representation for the RR interpreter.

use crate::types::TypeTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Runtime values in the RR interpreter.
///
/// Heap payloads (`Str`, `List`) are wrapped in `Rc` for cheap aliasing via
/// reference counting. An alias is an `Rc` clone; converting to exclusive
/// ownership uses copy-on-write — the payload is only cloned when the
/// reference count is greater than one. The sole owner's drop releases the
/// payload; an alias's drop never does.
///
/// `Pair`, `Set`, `Vec`, and `Map` exist in the type catalogue but have no
/// value variant; nothing in the core constructs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<String>),
    List(Rc<Vec<Value>>),
    Fn(Rc<FnValue>),
}

/// A function reference value: the callee identity plus its signature.
/// Resolution always goes back through the environment by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnValue {
    pub name: String,
    pub params: Vec<TypeTag>,
    pub ret: TypeTag,
}

impl Value {
    pub fn new_str(s: impl Into<String>) -> Self {
        Value::Str(Rc::new(s.into()))
    }

    pub fn new_list(v: Vec<Value>) -> Self {
        Value::List(Rc::new(v))
    }

    /// The catalogue tag of this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::None => TypeTag::None,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Fn(_) => TypeTag::Fn,
        }
    }

    /// A borrowed alias of this value: shares the heap payload without
    /// taking ownership of it.
    pub fn alias(&self) -> Value {
        self.clone()
    }

    /// Convert to exclusive ownership in place. Shared payloads are
    /// deep-cloned; already-exclusive payloads are untouched.
    pub fn make_exclusive(&mut self) {
        match self {
            Value::Str(s) => {
                if Rc::strong_count(s) > 1 {
                    *s = Rc::new((**s).clone());
                }
            }
            Value::List(l) => {
                let items = Rc::make_mut(l);
                for item in items.iter_mut() {
                    item.make_exclusive();
                }
            }
            _ => {}
        }
    }

    /// An exclusively-owned recursive copy.
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Str(s) => Value::Str(Rc::new((**s).clone())),
            Value::List(l) => Value::List(Rc::new(l.iter().map(Value::deep_clone).collect())),
            other => other.clone(),
        }
    }

    /// True iff every heap payload reachable from this value has exactly
    /// one owner. Function records are immutable and shared by design, so
    /// `Fn` is always exclusive.
    pub fn is_exclusive(&self) -> bool {
        match self {
            Value::Str(s) => Rc::strong_count(s) == 1,
            Value::List(l) => Rc::strong_count(l) == 1 && l.iter().all(Value::is_exclusive),
            _ => true,
        }
    }
}

fn format_float(f: f64) -> String {
    if f == f.floor() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "Bool: {}", b),
            Value::Int(n) => write!(f, "Int: {}", n),
            Value::Float(x) => write!(f, "Float: {}", format_float(*x)),
            Value::Str(s) => write!(f, "Str: {}", s),
            Value::List(items) => {
                write!(f, "List: [")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Fn(record) => write!(f, "Fn: {}", record.name),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Fn(a), Value::Fn(b)) => a == b,
            _ => false,
        }
    }
}

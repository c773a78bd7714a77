//! The shared environment: variables, overload sets, operator priorities.

use crate::types::{type_tuple, TypeTag};
use crate::values::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },
    #[error("unknown function {name}{args}")]
    UnknownFunction { name: String, args: String },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: TypeTag, found: TypeTag },
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("expression is not assignable")]
    InvalidAssignTarget,
    #[error("a borrowed payload would be stored as a value")]
    ReferenceStoredAsValue,
}

/// A native primitive: takes the evaluated arguments and the environment.
pub type NativeFn = fn(Vec<Value>, &mut Environment) -> Result<Value, RuntimeError>;

/// One overload: parameter signature, declared return tag, implementation.
/// The parameter sequence's length encodes the arity.
#[derive(Debug, Clone)]
pub struct FnRecord {
    pub params: Vec<TypeTag>,
    pub ret: TypeTag,
    pub body: NativeFn,
}

impl FnRecord {
    pub fn new(params: Vec<TypeTag>, ret: TypeTag, body: NativeFn) -> Self {
        Self { params, ret, body }
    }
}

/// Variable store, overload table, and operator priority table.
///
/// Presence in the priority table is what makes a symbol an operator; a
/// same-named overload set would be unreachable. Priorities range over
/// `0..=16`: 0 binds loosest, 15 is the tightest infix, 16 is unary.
#[derive(Default)]
pub struct Environment {
    vars: HashMap<String, Value>,
    funs: HashMap<String, Vec<FnRecord>>,
    op_priority: HashMap<String, u8>,
    /// Lines produced by `print`, also echoed to stdout.
    pub output: Vec<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// An alias of the stored value.
    pub fn get_var(&self, name: &str) -> Result<Value, RuntimeError> {
        self.vars
            .get(name)
            .map(Value::alias)
            .ok_or_else(|| RuntimeError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Mutable slot for `name`, inserting `None` if absent. The left-hand
    /// side of assignment.
    pub fn get_or_new_var_mut(&mut self, name: &str) -> &mut Value {
        self.vars.entry(name.to_string()).or_insert(Value::None)
    }

    /// Store `value` under `name` as the sole owner of its payload.
    pub fn assign(&mut self, name: &str, mut value: Value) -> Result<(), RuntimeError> {
        value.make_exclusive();
        if !value.is_exclusive() {
            return Err(RuntimeError::ReferenceStoredAsValue);
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// First registration-order overload of `name` whose signature is
    /// equivalent to `args` under the `Any` rule.
    pub fn resolve(&self, name: &str, args: &[TypeTag]) -> Result<&FnRecord, RuntimeError> {
        self.funs
            .get(name)
            .into_iter()
            .flatten()
            .find(|record| {
                record.params.len() == args.len()
                    && args
                        .iter()
                        .zip(&record.params)
                        .all(|(arg, param)| arg.equivalent_to(*param))
            })
            .ok_or_else(|| RuntimeError::UnknownFunction {
                name: name.to_string(),
                args: type_tuple(args),
            })
    }

    /// Register an overload. An existing record with the identical
    /// parameter signature is replaced in place; otherwise the record is
    /// appended, keeping registration order.
    pub fn register(&mut self, name: &str, record: FnRecord) {
        let overloads = self.funs.entry(name.to_string()).or_default();
        match overloads.iter_mut().find(|r| r.params == record.params) {
            Some(existing) => *existing = record,
            None => overloads.push(record),
        }
    }

    pub fn register_operator(&mut self, name: &str, priority: u8) {
        self.op_priority.insert(name.to_string(), priority);
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.funs.contains_key(name)
    }

    pub fn is_operator(&self, name: &str) -> bool {
        self.op_priority.contains_key(name)
    }

    pub fn priority_of(&self, name: &str) -> Option<u8> {
        self.op_priority.get(name).copied()
    }

    /// True iff `rhs` binds tighter than `lhs`.
    pub fn op_priority_higher(&self, lhs: &str, rhs: &str) -> bool {
        self.priority_of(rhs).unwrap_or(0) > self.priority_of(lhs).unwrap_or(0)
    }

    /// Variable names with their values, for inspection by tests and
    /// diagnostics.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

//! Built-in primitives and the default environment registrations.
//!
//! Resolution guarantees every primitive its declared signature, so the
//! fallback arms only fire on a dispatch bug. Overloads are checked in
//! registration order, which is why the specific `+` signatures come
//! before anything involving `Any`.

use rr_core::{Environment, FnRecord, RuntimeError, TypeTag, Value};

fn dispatch_mismatch(expected: TypeTag, args: &[Value]) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected,
        found: args.first().map_or(TypeTag::None, Value::type_tag),
    }
}

fn int_add_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a + b)),
        _ => Err(dispatch_mismatch(TypeTag::Int, &args)),
    }
}

fn float_add_float(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Float(a), Value::Float(b)] => Ok(Value::Float(a + b)),
        _ => Err(dispatch_mismatch(TypeTag::Float, &args)),
    }
}

fn float_add_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Float(a), Value::Int(b)] => Ok(Value::Float(a + *b as f64)),
        _ => Err(dispatch_mismatch(TypeTag::Float, &args)),
    }
}

fn int_add_float(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Int(a), Value::Float(b)] => Ok(Value::Float(*a as f64 + b)),
        _ => Err(dispatch_mismatch(TypeTag::Int, &args)),
    }
}

fn str_add_str(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Str(a), Value::Str(b)] => Ok(Value::new_str(format!("{}{}", a, b))),
        _ => Err(dispatch_mismatch(TypeTag::Str, &args)),
    }
}

fn str_add_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Str(a), Value::Int(b)] => Ok(Value::new_str(format!("{}{}", a, b))),
        _ => Err(dispatch_mismatch(TypeTag::Str, &args)),
    }
}

fn int_mul_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a * b)),
        _ => Err(dispatch_mismatch(TypeTag::Int, &args)),
    }
}

fn int_eq_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Int(a), Value::Int(b)] => Ok(Value::Bool(a == b)),
        _ => Err(dispatch_mismatch(TypeTag::Int, &args)),
    }
}

fn str_repeat_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Str(s), Value::Int(n)] => {
            let count = usize::try_from(*n).unwrap_or(0);
            Ok(Value::new_str(s.repeat(count)))
        }
        _ => Err(dispatch_mismatch(TypeTag::Str, &args)),
    }
}

/// Round to nearest, ties away from zero.
fn round_float(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Float(x)] => Ok(Value::Int(x.round() as i64)),
        _ => Err(dispatch_mismatch(TypeTag::Float, &args)),
    }
}

fn max_int_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::Int(a), Value::Int(b)] => Ok(Value::Int(*a.max(b))),
        _ => Err(dispatch_mismatch(TypeTag::Int, &args)),
    }
}

fn print_any(args: Vec<Value>, env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [value] => {
            let rendering = value.to_string();
            println!("{}", rendering);
            env.output.push(rendering);
            Ok(Value::None)
        }
        _ => Err(dispatch_mismatch(TypeTag::Any, &args)),
    }
}

/// Join list elements with the glue string. `Int` elements render as
/// decimal, `Str` elements verbatim; other element types are skipped.
fn concat_list_str(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::List(items), Value::Str(glue)] => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Int(n) => Some(n.to_string()),
                    Value::Str(s) => Some((**s).clone()),
                    _ => None,
                })
                .collect();
            Ok(Value::new_str(parts.join(glue.as_str())))
        }
        _ => Err(dispatch_mismatch(TypeTag::List, &args)),
    }
}

/// 0-based element access.
fn index_list_int(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::List(items), Value::Int(i)] => usize::try_from(*i)
            .ok()
            .and_then(|idx| items.get(idx))
            .map(Value::alias)
            .ok_or(RuntimeError::IndexOutOfRange {
                index: *i,
                len: items.len(),
            }),
        _ => Err(dispatch_mismatch(TypeTag::List, &args)),
    }
}

/// Gather: one element per `Int` in the index list, in order.
fn index_list_list(args: Vec<Value>, _env: &mut Environment) -> Result<Value, RuntimeError> {
    match args.as_slice() {
        [Value::List(items), Value::List(indices)] => {
            let mut gathered = Vec::with_capacity(indices.len());
            for index in indices.iter() {
                let i = match index {
                    Value::Int(i) => *i,
                    other => {
                        return Err(RuntimeError::TypeMismatch {
                            expected: TypeTag::Int,
                            found: other.type_tag(),
                        })
                    }
                };
                let element = usize::try_from(i).ok().and_then(|idx| items.get(idx)).ok_or(
                    RuntimeError::IndexOutOfRange {
                        index: i,
                        len: items.len(),
                    },
                )?;
                gathered.push(element.alias());
            }
            Ok(Value::new_list(gathered))
        }
        _ => Err(dispatch_mismatch(TypeTag::List, &args)),
    }
}

/// The default environment: operator priorities plus the built-in
/// overload table.
pub fn default_env() -> Environment {
    let mut env = Environment::new();

    env.register_operator("=", 0);
    env.register_operator("==", 2);
    env.register_operator("repeat", 3);
    env.register_operator("+", 10);
    env.register_operator("*", 11);
    env.register_operator("round", 16);

    env.register(
        "+",
        FnRecord::new(vec![TypeTag::Int, TypeTag::Int], TypeTag::Int, int_add_int),
    );
    env.register(
        "+",
        FnRecord::new(
            vec![TypeTag::Float, TypeTag::Float],
            TypeTag::Float,
            float_add_float,
        ),
    );
    env.register(
        "+",
        FnRecord::new(
            vec![TypeTag::Float, TypeTag::Int],
            TypeTag::Float,
            float_add_int,
        ),
    );
    env.register(
        "+",
        FnRecord::new(
            vec![TypeTag::Int, TypeTag::Float],
            TypeTag::Float,
            int_add_float,
        ),
    );
    env.register(
        "+",
        FnRecord::new(vec![TypeTag::Str, TypeTag::Str], TypeTag::Str, str_add_str),
    );
    env.register(
        "+",
        FnRecord::new(vec![TypeTag::Str, TypeTag::Int], TypeTag::Str, str_add_int),
    );
    env.register(
        "*",
        FnRecord::new(vec![TypeTag::Int, TypeTag::Int], TypeTag::Int, int_mul_int),
    );
    env.register(
        "==",
        FnRecord::new(vec![TypeTag::Int, TypeTag::Int], TypeTag::Bool, int_eq_int),
    );
    env.register(
        "repeat",
        FnRecord::new(
            vec![TypeTag::Str, TypeTag::Int],
            TypeTag::Str,
            str_repeat_int,
        ),
    );
    env.register(
        "round",
        FnRecord::new(vec![TypeTag::Float], TypeTag::Int, round_float),
    );
    env.register(
        "max",
        FnRecord::new(vec![TypeTag::Int, TypeTag::Int], TypeTag::Int, max_int_int),
    );
    env.register(
        "print",
        FnRecord::new(vec![TypeTag::Any], TypeTag::None, print_any),
    );
    env.register(
        "concat",
        FnRecord::new(
            vec![TypeTag::List, TypeTag::Str],
            TypeTag::Str,
            concat_list_str,
        ),
    );
    env.register(
        "index",
        FnRecord::new(
            vec![TypeTag::List, TypeTag::Int],
            TypeTag::Any,
            index_list_int,
        ),
    );
    env.register(
        "index",
        FnRecord::new(
            vec![TypeTag::List, TypeTag::List],
            TypeTag::Any,
            index_list_list,
        ),
    );

    env
}

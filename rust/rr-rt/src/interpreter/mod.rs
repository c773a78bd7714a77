//! Recursive tree walk over the AST.
//!
//! `eval` produces a value; `eval_mut` produces a mutable slot for the
//! left-hand side of assignment. Children evaluate strictly left to
//! right, and arguments are fully evaluated before overload resolution,
//! which needs their concrete type tags.

pub mod intrinsics;

use rr_compiler::compiler::ast::AstNode;
use rr_core::{Environment, RuntimeError, TypeTag, Value};
use std::rc::Rc;

pub fn eval(node: &AstNode, env: &mut Environment) -> Result<Value, RuntimeError> {
    match node {
        AstNode::Statement(children) => {
            let mut last = Value::None;
            for child in children {
                last = eval(child, env)?;
            }
            Ok(last)
        }
        AstNode::Literal(value) => Ok(value.deep_clone()),
        AstNode::Var(name) => env.get_var(name),
        // The callee identity travels as a string; the enclosing
        // Evaluate resolves it together with the argument types.
        AstNode::Fun(name) => Ok(Value::new_str(name.clone())),
        AstNode::Op { name, args } if args.is_empty() => Ok(Value::new_str(name.clone())),
        AstNode::Op { name, args } => {
            if name == "=" {
                if let [target, rhs] = args.as_slice() {
                    return eval_assign(target, rhs, env);
                }
            }
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(arg, env)?);
            }
            call(name, values, env)
        }
        AstNode::If {
            cond,
            then,
            or_else,
        } => match eval(cond, env)? {
            Value::Bool(true) => eval(then, env),
            Value::Bool(false) => eval(or_else, env),
            other => Err(RuntimeError::TypeMismatch {
                expected: TypeTag::Bool,
                found: other.type_tag(),
            }),
        },
        AstNode::Csv(children) => {
            let mut items = Vec::with_capacity(children.len());
            for child in children {
                items.push(eval(child, env)?);
            }
            Ok(Value::new_list(items))
        }
        AstNode::ListBuilder(csv) => eval(csv, env),
        AstNode::Evaluate { callee, args } => {
            let name = match eval(callee, env)? {
                Value::Str(s) => (*s).clone(),
                Value::Fn(record) => record.name.clone(),
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        expected: TypeTag::Str,
                        found: other.type_tag(),
                    })
                }
            };
            let values = match eval(args, env)? {
                Value::List(items) => Rc::try_unwrap(items).unwrap_or_else(|rc| (*rc).clone()),
                other => vec![other],
            };
            call(&name, values, env)
        }
        AstNode::Index { target, index } => {
            let collection = eval(target, env)?;
            let idx = eval(index, env)?;
            call("index", vec![collection, idx], env)
        }
    }
}

/// Resolve `name` against the argument tags and invoke the primitive.
fn call(name: &str, values: Vec<Value>, env: &mut Environment) -> Result<Value, RuntimeError> {
    let types: Vec<TypeTag> = values.iter().map(Value::type_tag).collect();
    let body = env.resolve(name, &types)?.body;
    body(values, env)
}

/// An assignment target whose addressing sub-expressions have already
/// been evaluated, so taking its mutable slot is side-effect free.
enum Place {
    Var(String),
    Element { target: Box<Place>, index: i64 },
}

/// `=`: the target's addressing evaluates first, then the right-hand
/// side, which becomes the sole owner of its payload before it is
/// stored; the result is an alias of the updated slot, which is what
/// makes chained assignment work.
fn eval_assign(
    target: &AstNode,
    rhs: &AstNode,
    env: &mut Environment,
) -> Result<Value, RuntimeError> {
    let place = resolve_place(target, env)?;
    let value = eval(rhs, env)?;
    match place {
        Place::Var(name) => {
            env.assign(&name, value)?;
            env.get_var(&name)
        }
        element => {
            let mut value = value;
            value.make_exclusive();
            if !value.is_exclusive() {
                return Err(RuntimeError::ReferenceStoredAsValue);
            }
            let slot = place_slot(&element, env)?;
            *slot = value;
            Ok(slot.alias())
        }
    }
}

/// Evaluate an assignment target's addressing. Legal targets are a
/// variable, a statement (the last child's place, after the other
/// children run), and an `Int`-indexed list element; anything else is
/// not a place. Children evaluate left to right: a nested target
/// resolves before its index expression runs.
fn resolve_place(node: &AstNode, env: &mut Environment) -> Result<Place, RuntimeError> {
    match node {
        AstNode::Var(name) => Ok(Place::Var(name.clone())),
        AstNode::Statement(children) => match children.split_last() {
            Some((last, init)) => {
                for child in init {
                    eval(child, env)?;
                }
                resolve_place(last, env)
            }
            None => Err(RuntimeError::InvalidAssignTarget),
        },
        AstNode::Index { target, index } => {
            let target = resolve_place(target, env)?;
            let index = match eval(index, env)? {
                Value::Int(i) => i,
                other => {
                    return Err(RuntimeError::TypeMismatch {
                        expected: TypeTag::Int,
                        found: other.type_tag(),
                    })
                }
            };
            Ok(Place::Element {
                target: Box::new(target),
                index,
            })
        }
        _ => Err(RuntimeError::InvalidAssignTarget),
    }
}

/// The mutable slot a resolved place names; list elements are reached
/// with copy-on-write.
fn place_slot<'e>(
    place: &Place,
    env: &'e mut Environment,
) -> Result<&'e mut Value, RuntimeError> {
    match place {
        Place::Var(name) => Ok(env.get_or_new_var_mut(name)),
        Place::Element { target, index } => match place_slot(target, env)? {
            Value::List(items) => {
                let len = items.len();
                usize::try_from(*index)
                    .ok()
                    .and_then(|i| Rc::make_mut(items).get_mut(i))
                    .ok_or(RuntimeError::IndexOutOfRange { index: *index, len })
            }
            other => Err(RuntimeError::TypeMismatch {
                expected: TypeTag::List,
                found: other.type_tag(),
            }),
        },
    }
}

/// A mutable slot for an assignment target: the target's addressing
/// evaluates, then the slot it names is borrowed.
pub fn eval_mut<'e>(
    node: &AstNode,
    env: &'e mut Environment,
) -> Result<&'e mut Value, RuntimeError> {
    let place = resolve_place(node, env)?;
    place_slot(&place, env)
}

#[cfg(test)]
mod tests {
    use super::intrinsics::default_env;
    use super::*;
    use rr_compiler::parse;

    fn run(src: &str) -> Result<Value, RuntimeError> {
        let mut env = default_env();
        let ast = parse(src, &env).expect("source should parse");
        eval(&ast, &mut env)
    }

    fn run_in(src: &str, env: &mut Environment) -> Result<Value, RuntimeError> {
        let ast = parse(src, env).expect("source should parse");
        eval(&ast, env)
    }

    #[test]
    fn test_empty_statement_is_none() {
        assert_eq!(run("").unwrap(), Value::None);
    }

    #[test]
    fn test_statement_returns_last_value() {
        assert_eq!(run("1; 2; 3").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_literal_evaluates_to_owned_clone() {
        let mut env = default_env();
        let ast = parse(r#"s = "hi""#, &env).expect("source should parse");
        eval(&ast, &mut env).unwrap();
        // The literal inside the AST still solely owns its payload.
        let AstNode::Statement(lines) = &ast else {
            panic!("expected statement root");
        };
        let AstNode::Op { args, .. } = &lines[0] else {
            panic!("expected assignment");
        };
        let AstNode::Literal(stored) = &args[1] else {
            panic!("expected literal rhs");
        };
        assert!(stored.is_exclusive());
    }

    #[test]
    fn test_var_lookup_and_unknown_var() {
        let mut env = default_env();
        run_in("x = 42", &mut env).unwrap();
        assert_eq!(run_in("x", &mut env).unwrap(), Value::Int(42));
        assert!(matches!(
            run_in("y", &mut env),
            Err(RuntimeError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_assignment_returns_assigned_value() {
        assert_eq!(run("a = 5").unwrap(), Value::Int(5));
    }

    #[test]
    fn test_chained_assignment() {
        let mut env = default_env();
        run_in("a = b = 1", &mut env).unwrap();
        assert_eq!(env.get_var("a").unwrap(), Value::Int(1));
        assert_eq!(env.get_var("b").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_env_values_stay_exclusive_after_statements() {
        let mut env = default_env();
        run_in("xs = [1, 2]; ys = xs; zs = ys", &mut env).unwrap();
        for (_, value) in env.vars() {
            assert!(value.is_exclusive());
        }
    }

    #[test]
    fn test_assignment_detaches_from_source_variable() {
        let mut env = default_env();
        run_in("xs = [1, 2]; ys = xs; ys[0] = 9", &mut env).unwrap();
        assert_eq!(
            env.get_var("xs").unwrap(),
            Value::new_list(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            env.get_var("ys").unwrap(),
            Value::new_list(vec![Value::Int(9), Value::Int(2)])
        );
    }

    #[test]
    fn test_index_assignment() {
        let mut env = default_env();
        run_in("xs = [10, 20]; xs[1] = 5", &mut env).unwrap();
        assert_eq!(
            env.get_var("xs").unwrap(),
            Value::new_list(vec![Value::Int(10), Value::Int(5)])
        );
    }

    #[test]
    fn test_index_assignment_out_of_range() {
        let mut env = default_env();
        assert!(matches!(
            run_in("xs = [1]; xs[3] = 0", &mut env),
            Err(RuntimeError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_literal_is_not_a_place() {
        assert!(matches!(
            run("1 = 2"),
            Err(RuntimeError::InvalidAssignTarget)
        ));
    }

    #[test]
    fn test_if_takes_the_right_branch() {
        assert_eq!(run("if true 1 else 2").unwrap(), Value::Int(1));
        assert_eq!(run("if false 1 else 2").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_if_condition_must_be_bool() {
        assert!(matches!(
            run("if 1 2 else 3"),
            Err(RuntimeError::TypeMismatch {
                expected: TypeTag::Bool,
                found: TypeTag::Int
            })
        ));
    }

    #[test]
    fn test_fun_node_evaluates_to_its_name() {
        assert_eq!(run("max").unwrap(), Value::new_str("max"));
    }

    #[test]
    fn test_operator_reference_called_through_evaluate() {
        assert_eq!(run("+(1, 2)").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_list_builder_produces_list() {
        assert_eq!(
            run("[1, 2.0, \"x\"]").unwrap(),
            Value::new_list(vec![
                Value::Int(1),
                Value::Float(2.0),
                Value::new_str("x")
            ])
        );
    }

    #[test]
    fn test_overload_miss_reports_signature() {
        let err = run(r#"1 + "x""#).unwrap_err();
        assert_eq!(err.to_string(), "unknown function +<Int,Str>");
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        let mut env = default_env();
        run_in(r#"order = """#, &mut env).unwrap();
        run_in(
            r#"max({order = order + "a"; 1}, {order = order + "b"; 2})"#,
            &mut env,
        )
        .unwrap();
        assert_eq!(env.get_var("order").unwrap(), Value::new_str("ab"));
    }
}

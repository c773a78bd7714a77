//! End-to-end tests: evaluate RR source and check the final value.

use rr_core::{RuntimeError, Value};
use rr_rt::{default_env, run_source, RrError};

/// Helper: evaluate a program against a fresh default environment.
fn run(source: &str) -> Value {
    let mut env = default_env();
    run_source(source, &mut env).expect("source should evaluate")
}

/// Helper: run and also capture printed output.
fn run_with_output(source: &str) -> (Value, Vec<String>) {
    let mut env = default_env();
    let value = run_source(source, &mut env).expect("source should evaluate");
    (value, env.output)
}

fn run_err(source: &str) -> RrError {
    let mut env = default_env();
    run_source(source, &mut env).expect_err("source should fail")
}

// ─── Arithmetic and precedence ───

#[test]
fn e2e_precedence() {
    assert_eq!(run("1 + 2 * 3"), Value::Int(7));
}

#[test]
fn e2e_final_rendering_of_precedence() {
    assert_eq!(run("1 + 2 * 3").to_string(), "Int: 7");
}

#[test]
fn e2e_grouping_overrides_precedence() {
    assert_eq!(run("(1 + 2) * 3"), Value::Int(9));
}

#[test]
fn e2e_float_addition() {
    assert_eq!(run("1.5 + 2.5"), Value::Float(4.0));
}

#[test]
fn e2e_mixed_addition_widens() {
    assert_eq!(run("1 + 0.5"), Value::Float(1.5));
    assert_eq!(run("0.5 + 1"), Value::Float(1.5));
}

// ─── Variables and assignment ───

#[test]
fn e2e_variables() {
    assert_eq!(run("a = 5; b = a * 2; b + 1"), Value::Int(11));
}

#[test]
fn e2e_assignment_result_is_the_value() {
    assert_eq!(run("a = 5"), Value::Int(5));
}

#[test]
fn e2e_chained_assignment() {
    assert_eq!(run("a = b = 1; a + b"), Value::Int(2));
}

#[test]
fn e2e_assignment_target_addressing_runs_before_rhs() {
    let (value, output) = run_with_output(
        r#"xs = [1, 2]; xs[{print("idx"); 0}] = {print("rhs"); 9}; xs[0]"#,
    );
    assert_eq!(value, Value::Int(9));
    assert_eq!(output, vec!["Str: idx".to_string(), "Str: rhs".to_string()]);
}

#[test]
fn e2e_reassignment_overwrites() {
    assert_eq!(run("a = 1; a = \"now a string\"; a"), Value::new_str("now a string"));
}

// ─── Strings ───

#[test]
fn e2e_repeat_operator() {
    assert_eq!(run(r#""ha" repeat 3"#), Value::new_str("hahaha"));
}

#[test]
fn e2e_string_concatenation() {
    assert_eq!(run(r#""foo" + "bar""#), Value::new_str("foobar"));
}

#[test]
fn e2e_string_plus_int() {
    assert_eq!(run(r#""n=" + 42"#), Value::new_str("n=42"));
}

// ─── Conditionals ───

#[test]
fn e2e_if_else() {
    assert_eq!(run(r#"if 1 == 1 "yes" else "no""#), Value::new_str("yes"));
    assert_eq!(run(r#"if 1 == 2 "yes" else "no""#), Value::new_str("no"));
}

#[test]
fn e2e_if_branches_on_variable() {
    assert_eq!(run("a = 3; if a == 3 a * 2 else 0"), Value::Int(6));
}

// ─── Lists and indexing ───

#[test]
fn e2e_index_single_element() {
    assert_eq!(run("xs = [10, 20, 30]; xs[1]"), Value::Int(20));
}

#[test]
fn e2e_index_gather() {
    let value = run("xs = [10, 20, 30]; xs[[0, 2]]");
    assert_eq!(
        value,
        Value::new_list(vec![Value::Int(10), Value::Int(30)])
    );
    assert_eq!(value.to_string(), "List: [Int: 10,Int: 30]");
}

#[test]
fn e2e_concat_call() {
    assert_eq!(
        run(r#"concat(["a", 1, "b"], "-")"#),
        Value::new_str("a-1-b")
    );
}

#[test]
fn e2e_heterogeneous_list() {
    assert_eq!(
        run(r#"[1, "two", 3.0]"#).to_string(),
        "List: [Int: 1,Str: two,Float: 3.0]"
    );
}

#[test]
fn e2e_index_list_element_assignment() {
    assert_eq!(run("xs = [1, 2]; xs[0] = 9; xs[0]"), Value::Int(9));
}

// ─── Calls ───

#[test]
fn e2e_round_call_plus_one() {
    assert_eq!(run("round(1.5) + 1"), Value::Int(3));
}

#[test]
fn e2e_round_prefix_form() {
    assert_eq!(run("round 1.5 + 1"), Value::Int(3));
}

#[test]
fn e2e_max_call() {
    assert_eq!(run("max(3, 9)"), Value::Int(9));
}

#[test]
fn e2e_operator_as_function() {
    assert_eq!(run("+(1, 2)"), Value::Int(3));
}

#[test]
fn e2e_print_writes_rendering() {
    let (value, output) = run_with_output(r#"print("hi"); print([1, 2]); 0"#);
    assert_eq!(value, Value::Int(0));
    assert_eq!(output, vec!["Str: hi".to_string(), "List: [Int: 1,Int: 2]".to_string()]);
}

// ─── Blocks ───

#[test]
fn e2e_block_returns_last_value() {
    assert_eq!(run("{ a = 1; a + 1 }"), Value::Int(2));
}

#[test]
fn e2e_block_shares_the_environment() {
    assert_eq!(run("{ a = 1 }; a"), Value::Int(1));
}

#[test]
fn e2e_empty_program_is_none() {
    assert_eq!(run(""), Value::None);
    assert_eq!(run("\n\n;\n"), Value::None);
}

// ─── Errors ───

#[test]
fn e2e_overload_miss_mentions_signature() {
    let err = run_err(r#"1 + "x""#);
    let RrError::Runtime(runtime) = err else {
        panic!("expected a runtime error");
    };
    assert!(matches!(runtime, RuntimeError::UnknownFunction { .. }));
    assert!(runtime.to_string().contains("+<Int,Str>"));
}

#[test]
fn e2e_unknown_variable() {
    assert!(matches!(
        run_err("nope + 1"),
        RrError::Runtime(RuntimeError::UnknownVariable { .. })
    ));
}

#[test]
fn e2e_index_out_of_range() {
    assert!(matches!(
        run_err("xs = [1]; xs[5]"),
        RrError::Runtime(RuntimeError::IndexOutOfRange { index: 5, len: 1 })
    ));
}

#[test]
fn e2e_if_requires_bool() {
    assert!(matches!(
        run_err("if 1 2 else 3"),
        RrError::Runtime(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn e2e_parse_error_surfaces() {
    assert!(matches!(run_err("1 2"), RrError::Parse(_)));
}

#[test]
fn e2e_lex_error_surfaces() {
    assert!(matches!(run_err(r#""open"#), RrError::Lex(_)));
}

// ─── Ownership discipline ───

#[test]
fn e2e_environment_values_stay_exclusively_owned() {
    let mut env = default_env();
    run_source(
        "xs = [1, [2, 3], \"s\"]; ys = xs; zs = ys[[1]]; xs[0] = 4",
        &mut env,
    )
    .expect("source should evaluate");
    for (name, value) in env.vars() {
        assert!(value.is_exclusive(), "variable '{}' shares its payload", name);
    }
}

#[test]
fn e2e_copy_semantics_between_variables() {
    assert_eq!(
        run("xs = [1, 2]; ys = xs; ys[0] = 9; xs[0] + ys[0]"),
        Value::Int(10)
    );
}

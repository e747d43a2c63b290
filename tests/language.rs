use std::time::Duration;

use keycalc::{
    AngleMode, Environment, ErrorKind, EvaluationContext, Value, evaluate_expression,
    format_value,
    interpreter::{environment::ANSWER, value::complex::ComplexNumber},
    register_variable,
};
use pretty_assertions::assert_eq;

fn eval(src: &str) -> Result<Value, ErrorKind> {
    eval_with(src, &EvaluationContext::default())
}

fn eval_with(src: &str, ctx: &EvaluationContext) -> Result<Value, ErrorKind> {
    evaluate_expression(src, &Environment::new(), ctx).map_err(|e| e.kind())
}

fn assert_value(src: &str, expected: Value) {
    match eval(src) {
        Ok(value) => assert_eq!(value, expected, "{src}"),
        Err(kind) => panic!("{src} failed with {kind:?}"),
    }
}

fn assert_close(src: &str, expected: f64) {
    match eval(src) {
        Ok(Value::Real(x)) => assert!((x - expected).abs() < 1e-9, "{src} gave {x}, expected {expected}"),
        other => panic!("{src} gave {other:?}, expected a real"),
    }
}

fn assert_failure(src: &str, kind: ErrorKind) {
    match eval(src) {
        Ok(value) => panic!("{src} succeeded with {value:?} but was expected to fail"),
        Err(found) => assert_eq!(found, kind, "{src}"),
    }
}

fn assert_display(src: &str, expected: &str) {
    let ctx = EvaluationContext::default();
    let value = eval_with(src, &ctx).unwrap_or_else(|kind| panic!("{src} failed with {kind:?}"));
    assert_eq!(format_value(&value, &ctx), expected, "{src}");
}

#[test]
fn two_plus_two() {
    assert_value("2+2", Value::Real(4.0));
    assert_display("2+2", "4");
}

#[test]
fn sine_of_thirty_degrees() {
    assert_close("sin(30)", 0.5);
}

#[test]
fn square_root_of_minus_one() {
    assert_failure("sqrt(-1)", ErrorKind::Domain);
    assert_failure("√-1", ErrorKind::Syntax);

    let ctx = EvaluationContext { complex_mode: true,
                                  ..EvaluationContext::default() };
    assert_eq!(eval_with("sqrt(-1)", &ctx), Ok(Value::Complex(ComplexNumber::new(0.0, 1.0))));
    assert_eq!(eval_with("√(-4)", &ctx), Ok(Value::Complex(ComplexNumber::new(0.0, 2.0))));
}

#[test]
fn mean_of_a_vector() {
    assert_value("mean([1,2,2,3,3,3,4,4,5,5,5,5])", Value::Real(3.5));
    assert_value("mean(1, 2, 3, 6)", Value::Real(3.0));
}

#[test]
fn division_by_zero() {
    assert_failure("1/0", ErrorKind::Domain);
    assert_failure("5 % 0", ErrorKind::Domain);
    assert_failure("0 ^ -1", ErrorKind::Domain);
}

#[test]
fn implicit_multiplication() {
    assert_value("2(3+4)", Value::Real(14.0));
    assert_value("(1 + 1)(2 + 2)", Value::Real(8.0));
    assert_close("2pi", 2.0 * std::f64::consts::PI);
    assert_value("3√16", Value::Real(12.0));
    assert_failure("2 3", ErrorKind::Syntax);
}

#[test]
fn precedence() {
    assert_value("2 + 3 * 4", Value::Real(14.0));
    assert_value("2 ^ 3 ^ 2", Value::Real(512.0));
    assert_value("-2 ^ 2", Value::Real(-4.0));
    assert_value("2 ^ -1", Value::Real(0.5));
    assert_value("10 - 4 - 3", Value::Real(3.0));
    assert_value("-7 % 3", Value::Real(-1.0));
    assert_value("2 × 3 ÷ 4", Value::Real(1.5));
}

#[test]
fn domain_boundaries() {
    assert_failure("log(0)", ErrorKind::Domain);
    assert_failure("ln(-1)", ErrorKind::Domain);
    assert_failure("asin(2)", ErrorKind::Domain);
    assert_failure("acos(-1.5)", ErrorKind::Domain);
    assert_failure("factorial(-1)", ErrorKind::Domain);
    assert_value("log(100)", Value::Real(2.0));
}

#[test]
fn angle_modes() {
    let radians = EvaluationContext { angle_mode: AngleMode::Radians,
                                      ..EvaluationContext::default() };
    match eval_with("sin(pi / 2)", &radians) {
        Ok(Value::Real(x)) => assert!((x - 1.0).abs() < 1e-12),
        other => panic!("unexpected {other:?}"),
    }
    assert_close("asin(1)", 90.0);
    assert_close("atan2(1, 1)", 45.0);
}

#[test]
fn complex_arithmetic() {
    assert_value("2 + 3i", Value::Complex(ComplexNumber::new(2.0, 3.0)));
    assert_value("i * i", Value::Complex(ComplexNumber::new(-1.0, 0.0)));
    assert_value("abs(3 + 4i)", Value::Real(5.0));
    assert_display("conj(1 + 2i)", "1 - 2i");
}

#[test]
fn vectors_and_matrices() {
    assert_value("[1, 2] * [3, 4]", Value::Real(11.0));
    assert_value("[1, 2] + [3, 4]", Value::from(vec![4.0, 6.0]));
    assert_value("2 * [1, 2]", Value::from(vec![2.0, 4.0]));
    assert_value("[1, 2] .* [3, 4]", Value::from(vec![3.0, 8.0]));
    assert_close("det([1, 2; 3, 4])", -2.0);
    assert_display("[1, 2; 3, 4] * [1, 0; 0, 1]", "[1, 2; 3, 4]");
    assert_display("transpose([1, 2; 3, 4])", "[1, 3; 2, 4]");
    assert_display("[1, 1; 0, 1] ^ 3", "[1, 3; 0, 1]");
    assert_display("cross([1, 0, 0], [0, 1, 0])", "[0, 0, 1]");

    assert_failure("[1, 2] + [1, 2, 3]", ErrorKind::Shape);
    assert_failure("[1, 2; 3]", ErrorKind::Shape);
    assert_failure("inv([1, 2; 2, 4])", ErrorKind::Domain);
}

#[test]
fn comparisons() {
    assert_value("1 + 1 == 2", Value::Boolean(true));
    assert_value("3 < 2", Value::Boolean(false));
    assert_value("i != 1", Value::Boolean(true));
    assert_failure("i < 1", ErrorKind::Domain);
}

#[test]
fn closed_function_table() {
    assert_failure("system(1)", ErrorKind::UnknownFunction);
    assert_failure("eval(1)", ErrorKind::UnknownFunction);
    assert_failure("sin(1, 2)", ErrorKind::Arity);
    assert_failure("pi(1)", ErrorKind::Arity);
}

#[test]
fn syntax_errors() {
    assert_failure("", ErrorKind::Syntax);
    assert_failure("   ", ErrorKind::Syntax);
    assert_failure("x = 1", ErrorKind::Syntax);
    assert_failure("(1 + 2", ErrorKind::Syntax);
    assert_failure("1 +", ErrorKind::Syntax);
    assert_failure("max(1,,2)", ErrorKind::Syntax);
    assert_failure("2 $ 3", ErrorKind::Lex);
    assert_failure("1e999", ErrorKind::Overflow);
}

#[test]
fn input_length_is_capped() {
    let ok = format!("1{}", "+1".repeat(60));
    assert_value(&ok, Value::Real(61.0));

    let long = format!("1{}", "+1".repeat(64));
    let err = evaluate_expression(&long, &Environment::new(), &EvaluationContext::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.offset(), None);
}

#[test]
fn nesting_is_capped() {
    let ctx = EvaluationContext { max_expression_length: 1024,
                                  ..EvaluationContext::default() };
    let shallow = format!("{}1{}", "(".repeat(60), ")".repeat(60));
    let deep = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(eval_with(&shallow, &ctx), Ok(Value::Real(1.0)));
    assert_eq!(eval_with(&deep, &ctx), Err(ErrorKind::Syntax));

    let sum_of_powers = vec!["1^1"; 70].join("+");
    assert_eq!(eval_with(&sum_of_powers, &ctx), Ok(Value::Real(70.0)));
    let tower = vec!["1"; 70].join("^");
    assert_eq!(eval_with(&tower, &ctx), Err(ErrorKind::Syntax));
}

#[test]
fn long_flat_chains_are_dropped_safely() {
    let ctx = EvaluationContext { max_expression_length: 100_000,
                                  ..EvaluationContext::default() };
    let chain = format!("{}1", "-".repeat(50_000));
    assert_eq!(eval_with(&chain, &ctx), Err(ErrorKind::BudgetExceeded));

    let generous = EvaluationContext { node_budget: 100_000,
                                       ..ctx.clone() };
    assert_eq!(eval_with(&chain, &generous), Ok(Value::Real(1.0)));

    let ctx = EvaluationContext { max_expression_length: 1_000_000,
                                  ..ctx };
    let sum = format!("{}1", "1+".repeat(300_000));
    assert_eq!(eval_with(&sum, &ctx), Err(ErrorKind::BudgetExceeded));
}

#[test]
fn zero_deadline_times_out() {
    let ctx = EvaluationContext { deadline: Duration::ZERO,
                                  ..EvaluationContext::default() };
    assert_eq!(eval_with("1 + 1", &ctx), Err(ErrorKind::Timeout));
}

#[test]
fn small_budget_is_exhausted() {
    let ctx = EvaluationContext { node_budget: 10,
                                  ..EvaluationContext::default() };
    assert_eq!(eval_with("sin(sin(sin(sin(sin(sin(sin(sin(1))))))))", &ctx),
               Err(ErrorKind::BudgetExceeded));
    assert_eq!(eval_with("1 + 2", &ctx), Ok(Value::Real(3.0)));
}

#[test]
fn matrix_work_counts_against_the_budget() {
    let ctx = EvaluationContext { node_budget: 10_000,
                                  ..EvaluationContext::default() };
    assert_eq!(eval_with("identity(64) ^ 1000", &ctx), Err(ErrorKind::BudgetExceeded));
}

#[test]
fn variables_come_from_the_environment() {
    let ctx = EvaluationContext::default();
    let mut env = Environment::new();

    let first = evaluate_expression("6 * 7", &env, &ctx).unwrap();
    register_variable(&mut env, ANSWER, first).unwrap();
    register_variable(&mut env, "M1", Value::Real(0.5)).unwrap();

    assert_eq!(evaluate_expression("ans + M1", &env, &ctx), Ok(Value::Real(42.5)));
    assert_eq!(evaluate_expression("2ans", &env, &ctx), Ok(Value::Real(84.0)));
    assert_eq!(evaluate_expression("rate", &env, &ctx).unwrap_err().kind(),
               ErrorKind::UndefinedVariable);
    assert!(register_variable(&mut env, "sqrt", Value::Real(1.0)).is_err());
}

#[test]
fn evaluation_does_not_touch_the_environment() {
    let ctx = EvaluationContext::default();
    let env = Environment::new();
    let before = env.clone();
    let _ = evaluate_expression("ans + 1", &env, &ctx);
    let _ = evaluate_expression("1/0", &env, &ctx);
    assert_eq!(env, before);
}

#[test]
fn display_formats() {
    assert_display("1/3", "0.3333333333");
    assert_display("2^40", "1.0995116278e12");
    assert_display("1/8", "0.125");
    assert_display("-0", "0");
    assert_display("3 > 2", "true");

    let ctx = EvaluationContext { scientific_notation: true,
                                  decimal_places: 3,
                                  ..EvaluationContext::default() };
    assert_eq!(format_value(&Value::Real(1234.0), &ctx), "1.234e3");
}

#[test]
fn errors_become_values() {
    let err = evaluate_expression("1/0", &Environment::new(), &EvaluationContext::default())
        .unwrap_err();
    let value = Value::from(&err);
    assert!(matches!(value, Value::Error(ErrorKind::Domain, _)));
    assert_eq!(format_value(&value, &EvaluationContext::default()), "Math error");
}

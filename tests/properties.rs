use keycalc::{Environment, EvaluationContext, Value, evaluate_expression, format_value};
use proptest::prelude::*;

fn expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![(0u32..1000).prop_map(|n| n.to_string()),
                           Just("pi".to_string()),
                           Just("ans".to_string()),
                           Just("i".to_string()),
                           Just("[1, 2]".to_string()),];
    leaf.prop_recursive(4, 24, 3, |inner| {
            let binop = prop::sample::select(vec!["+", "-", "*", "/", "^", "%", ".*", "<"]);
            let call = prop::sample::select(vec!["sin", "sqrt", "ln", "abs", "exp", "mean"]);
            prop_oneof![(inner.clone(), binop, inner.clone()).prop_map(|(l, op, r)| {
                                                                 format!("({l} {op} {r})")
                                                             }),
                        (call, inner.clone()).prop_map(|(f, arg)| format!("{f}({arg})")),
                        inner.prop_map(|e| format!("-{e}")),]
        })
}

proptest! {
    /// Arbitrary input never panics; it evaluates or fails with an error.
    #[test]
    fn arbitrary_input_terminates(s in ".{0,200}") {
        let _ = evaluate_expression(&s, &Environment::new(), &EvaluationContext::default());
    }

    /// Operator soup never panics either.
    #[test]
    fn operator_soup_terminates(s in "[0-9a-z()\\[\\],;+*/^%.<>=! √π-]{0,128}") {
        let _ = evaluate_expression(&s, &Environment::new(), &EvaluationContext::default());
    }

    /// Evaluating the same input twice gives the same outcome, and the
    /// environment is left untouched.
    #[test]
    fn evaluation_is_deterministic(expr in expression_strategy()) {
        let ctx = EvaluationContext::default();
        let env = Environment::new();
        let before = env.clone();

        let first = evaluate_expression(&expr, &env, &ctx).map(|v| format_value(&v, &ctx));
        let second = evaluate_expression(&expr, &env, &ctx).map(|v| format_value(&v, &ctx));
        prop_assert_eq!(first, second);
        prop_assert_eq!(env, before);
    }

    /// A real shown at full precision reads back as nearly the same real.
    #[test]
    fn displayed_reals_read_back(x in -1e12f64..1e12) {
        let ctx = EvaluationContext { decimal_places: 15,
                                      ..EvaluationContext::default() };
        let shown = format_value(&Value::Real(x), &ctx);
        let read = evaluate_expression(&shown, &Environment::new(), &ctx);
        match read {
            Ok(Value::Real(y)) => {
                let tolerance = 1e-9 * x.abs().max(1.0);
                prop_assert!((x - y).abs() <= tolerance, "{} read back as {}", x, y);
            },
            other => prop_assert!(false, "{} did not read back: {:?}", shown, other),
        }
    }

    /// Integer addition and multiplication commute.
    #[test]
    fn integer_arithmetic_commutes(a in -10_000i64..10_000, b in -10_000i64..10_000) {
        let ctx = EvaluationContext::default();
        let env = Environment::new();
        for op in ["+", "*"] {
            let ab = evaluate_expression(&format!("({a}) {op} ({b})"), &env, &ctx);
            let ba = evaluate_expression(&format!("({b}) {op} ({a})"), &env, &ctx);
            prop_assert_eq!(ab, ba);
        }
    }

    /// Deep nesting is rejected before it can exhaust the stack.
    #[test]
    fn deep_nesting_is_rejected(depth in 65usize..400) {
        let ctx = EvaluationContext { max_expression_length: 1024,
                                      ..EvaluationContext::default() };
        let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        prop_assert!(evaluate_expression(&input, &Environment::new(), &ctx).is_err());
    }
}

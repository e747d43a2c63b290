use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        registry::core::Invocation,
        value::{complex::ComplexNumber, core::Value},
    },
    util::num::checked_finite,
};

/// Computes square roots and n-th roots.
///
/// - With one argument:
///   - Non-negative reals return a real square root.
///   - Negative reals reach this rule only in complex mode and return a
///     purely imaginary result.
///   - Complex values use their principal square root.
/// - With two arguments, `sqrt(x, n)` is the n-th root `x^(1/n)`; `n` must be
///   a non-zero real.
///
/// # Example
/// ```
/// use keycalc::{
///     Environment, EvaluationContext, evaluate_expression,
///     interpreter::value::{complex::ComplexNumber, core::Value},
/// };
///
/// let env = Environment::new();
/// let mut ctx = EvaluationContext::default();
/// assert_eq!(evaluate_expression("sqrt(16, 4)", &env, &ctx).unwrap(), Value::Real(2.0));
/// assert!(evaluate_expression("sqrt(-1)", &env, &ctx).is_err());
///
/// ctx.complex_mode = true;
/// assert_eq!(evaluate_expression("sqrt(-1)", &env, &ctx).unwrap(),
///            Value::Complex(ComplexNumber::new(0.0, 1.0)));
/// ```
pub fn sqrt(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match args {
        [Value::Real(x)] if *x >= 0.0 => Ok(Value::Real(x.sqrt())),
        [Value::Real(x)] => Ok(Value::Complex(ComplexNumber::new(0.0, (-x).sqrt()))),
        [Value::Complex(c)] => Ok(Value::Complex(c.sqrt())),
        [other] => Err(other.mismatch("a number", offset)),
        [x, n] => nth_root(x, n.as_real(offset)?, offset),
        _ => Err(RuntimeError::MissingValue { offset }),
    }
}

fn nth_root(x: &Value, n: f64, offset: usize) -> EvalResult<Value> {
    if n == 0.0 {
        return Err(RuntimeError::Domain { details: "zeroth root".to_string(),
                                          offset });
    }
    match x {
        Value::Real(r) if *r >= 0.0 => {
            if *r == 0.0 && n < 0.0 {
                return Err(RuntimeError::DivisionByZero { offset });
            }
            Ok(Value::Real(checked_finite(r.powf(n.recip()), offset)?))
        },
        Value::Real(r) => {
            let root = ComplexNumber::from(*r).checked_powc(ComplexNumber::from(n.recip()), offset)?;
            Ok(Value::Complex(root))
        },
        Value::Complex(c) => {
            Ok(Value::Complex(c.checked_powc(ComplexNumber::from(n.recip()), offset)?))
        },
        other => Err(other.mismatch("a number", offset)),
    }
}

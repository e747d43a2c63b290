use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::core::evaluate_binary, core::EvalResult},
        registry::core::{Invocation, pair, single},
        value::{complex::ComplexNumber, core::Value},
    },
    util::num::checked_finite,
};

/// Natural logarithm.
///
/// Negative reals only reach this rule in complex mode and promote to the
/// principal complex logarithm.
pub fn ln(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    logarithm(single(args, invocation.offset)?, None, invocation.offset)
}

/// Logarithm to base 10, or to the base given as the second argument.
///
/// # Errors
/// `RuntimeError::Domain` for a base that is not positive or equals 1.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("log(1000)", &env, &ctx).unwrap(), Value::Real(3.0));
/// assert_eq!(evaluate_expression("log(8, 2)", &env, &ctx).unwrap(), Value::Real(3.0));
/// assert!(evaluate_expression("log(8, 1)", &env, &ctx).is_err());
/// ```
pub fn log(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match args {
        [x] => logarithm(x, Some(10.0), offset),
        [x, base] => {
            let base = base.as_real(offset)?;
            if base <= 0.0 || base == 1.0 {
                return Err(RuntimeError::Domain { details: format!("invalid logarithm base {base}"),
                                                  offset });
            }
            logarithm(x, Some(base), offset)
        },
        _ => Err(RuntimeError::MissingValue { offset }),
    }
}

/// Logarithm to base 2.
pub fn log2(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    logarithm(single(args, invocation.offset)?, Some(2.0), invocation.offset)
}

/// Logarithm to base 10.
pub fn log10(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    logarithm(single(args, invocation.offset)?, Some(10.0), invocation.offset)
}

/// `e` raised to the argument.
pub fn exp(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match single(args, offset)? {
        Value::Real(x) => Ok(Value::Real(checked_finite(x.exp(), offset)?)),
        Value::Complex(c) => Ok(Value::Complex(c.exp().checked(offset)?)),
        other => Err(other.mismatch("a number", offset)),
    }
}

/// `pow(x, y)`, the same as `x ^ y`.
pub fn pow(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (base, exponent) = pair(args, offset)?;
    let ctx = invocation.ctx;
    evaluate_binary(BinaryOperator::Pow, base, exponent, offset, ctx, invocation.guard())
}

/// Logarithm of `x` to `base`, natural when `base` is `None`.
///
/// Real arguments use the exact `f64` routines for bases 2 and 10 so that
/// `log(1000)` is exactly 3.
fn logarithm(x: &Value, base: Option<f64>, offset: usize) -> EvalResult<Value> {
    match x {
        Value::Real(r) if *r > 0.0 => {
            let result = match base {
                None => r.ln(),
                Some(2.0) => r.log2(),
                Some(10.0) => r.log10(),
                Some(b) => r.ln() / b.ln(),
            };
            Ok(Value::Real(checked_finite(result, offset)?))
        },
        Value::Real(r) => complex_logarithm(ComplexNumber::from(*r), base, offset),
        Value::Complex(c) => complex_logarithm(*c, base, offset),
        other => Err(other.mismatch("a number", offset)),
    }
}

fn complex_logarithm(z: ComplexNumber, base: Option<f64>, offset: usize) -> EvalResult<Value> {
    if z.is_zero() {
        return Err(RuntimeError::Domain { details: "logarithm of zero".to_string(),
                                          offset });
    }
    let ln = z.ln();
    let result = match base {
        None => ln,
        Some(b) => ln.checked_div(ComplexNumber::from(b.ln()), offset)?,
    };
    Ok(Value::Complex(result.checked(offset)?))
}

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        registry::core::{Invocation, pair, single},
        value::core::Value,
    },
    util::num::{MAX_SAFE_U64_INT, checked_finite, f64_to_i64_checked, f64_to_u64_checked},
};

/// Largest `n` whose factorial fits an `f64`.
pub const MAX_FACTORIAL: u64 = 170;
/// Most decimal places `round` accepts.
pub const MAX_ROUND_DIGITS: u64 = 15;

/// Absolute value; the modulus of a complex number and the Euclidean norm of
/// a vector.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("abs(-2.5)", &env, &ctx).unwrap(), Value::Real(2.5));
/// assert_eq!(evaluate_expression("abs([3, 4])", &env, &ctx).unwrap(), Value::Real(5.0));
/// ```
pub fn abs(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match single(args, offset)? {
        Value::Real(x) => Ok(Value::Real(x.abs())),
        Value::Complex(c) => Ok(Value::Real(checked_finite(c.abs(), offset)?)),
        Value::Vector(v) => {
            invocation.charge(v.len())?;
            let norm = v.iter().fold(0.0_f64, |acc, x| acc.hypot(*x));
            Ok(Value::Real(checked_finite(norm, offset)?))
        },
        other => Err(other.mismatch("a number or vector", offset)),
    }
}

/// Rounds half away from zero, to an integer or to `digits` decimal places.
pub fn round(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match args {
        [x] => Ok(Value::Real(x.as_real(offset)?.round())),
        [x, digits] => {
            let x = x.as_real(offset)?;
            let digits = f64_to_u64_checked(digits.as_real(offset)?, offset)?;
            if digits > MAX_ROUND_DIGITS {
                return Err(RuntimeError::Domain { details: format!("cannot round to {digits} places"),
                                                  offset });
            }
            let scale = 10_f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
            let scaled = x * scale;
            // Beyond 2^53 every f64 is already an integer.
            if !scaled.is_finite() || scaled.abs() > 9.007_199_254_740_992e15 {
                return Ok(Value::Real(x));
            }
            Ok(Value::Real(scaled.round() / scale))
        },
        _ => Err(RuntimeError::MissingValue { offset }),
    }
}

/// Defines a one-argument rule applying an `f64` method to a real.
macro_rules! real_rule {
    ($fname:ident, $doc:literal, $body:expr) => {
        #[doc = $doc]
        pub fn $fname(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
            let offset = invocation.offset;
            let x = single(args, offset)?.as_real(offset)?;
            let body: fn(f64) -> f64 = $body;
            Ok(Value::Real(checked_finite(body(x), offset)?))
        }
    };
}

real_rule!(floor, "Largest integer not above the argument.", f64::floor);
real_rule!(ceil, "Smallest integer not below the argument.", f64::ceil);
real_rule!(trunc, "Integer part, rounding toward zero.", f64::trunc);
real_rule!(sign, "`-1`, `0` or `1`.", |x| if x == 0.0 { 0.0 } else { x.signum() });
real_rule!(degrees, "Converts radians to degrees.", f64::to_degrees);
real_rule!(radians, "Converts degrees to radians.", f64::to_radians);

/// Most binary exponent `ldexp` applies; anything beyond already saturates
/// every finite `f64`.
const MAX_LDEXP_EXPONENT: f64 = 2200.0;

/// Length of the hypotenuse, `sqrt(x² + y²)` without intermediate overflow.
pub fn hypot(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (x, y) = real_pair(args, offset)?;
    Ok(Value::Real(checked_finite(x.hypot(y), offset)?))
}

/// Remainder of `x / y` truncated toward zero; the result has the sign of `x`.
///
/// # Errors
/// `RuntimeError::DivisionByZero` for `y = 0`.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("fmod(-7, 3)", &env, &ctx).unwrap(), Value::Real(-1.0));
/// assert!(evaluate_expression("fmod(1, 0)", &env, &ctx).is_err());
/// ```
pub fn fmod(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (x, y) = real_pair(args, offset)?;
    if y == 0.0 {
        return Err(RuntimeError::DivisionByZero { offset });
    }
    Ok(Value::Real(x % y))
}

/// IEEE remainder: `x - n y` with `n` the integer nearest `x / y`, ties to
/// even. The result lies in `[-|y|/2, |y|/2]`.
///
/// # Errors
/// `RuntimeError::DivisionByZero` for `y = 0`.
pub fn remainder(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (x, y) = real_pair(args, offset)?;
    if y == 0.0 {
        return Err(RuntimeError::DivisionByZero { offset });
    }
    let y = y.abs();
    let mut r = x % y;
    let half = y / 2.0;
    // `x % y` is exact, so only the rounding of the quotient is left.
    if r.abs() > half || (r.abs() == half && ((x - r) / y) % 2.0 != 0.0) {
        r -= y.copysign(r);
    }
    Ok(Value::Real(r))
}

/// Magnitude of `x` with the sign of `y`.
pub fn copysign(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (x, y) = real_pair(args, offset)?;
    Ok(Value::Real(x.copysign(y)))
}

/// `x · 2ⁿ` for an integer `n`.
///
/// # Errors
/// - `RuntimeError::Domain` for a fractional `n`.
/// - `RuntimeError::Overflow` if the result leaves the `f64` range.
pub fn ldexp(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (x, n) = pair(args, offset)?;
    let x = x.as_real(offset)?;
    let n = n.as_real(offset)?.clamp(-MAX_LDEXP_EXPONENT, MAX_LDEXP_EXPONENT);
    let n = f64_to_i64_checked(n, offset)?;
    // 2^n itself leaves the f64 range beyond ±1023, so scale in steps.
    let mut scaled = x;
    let mut remaining = i32::try_from(n).unwrap_or(0);
    while remaining != 0 {
        let step = remaining.clamp(-1000, 1000);
        scaled *= 2_f64.powi(step);
        remaining -= step;
    }
    Ok(Value::Real(checked_finite(scaled, offset)?))
}

fn real_pair(args: &[Value], offset: usize) -> EvalResult<(f64, f64)> {
    let (x, y) = pair(args, offset)?;
    Ok((x.as_real(offset)?, y.as_real(offset)?))
}

/// Factorial of a non-negative integer.
///
/// # Errors
/// - `RuntimeError::Domain` for negative or fractional arguments.
/// - `RuntimeError::Overflow` beyond `170!`.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("factorial(5)", &env, &ctx).unwrap(), Value::Real(120.0));
/// assert!(evaluate_expression("factorial(171)", &env, &ctx).is_err());
/// ```
pub fn factorial(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let n = f64_to_u64_checked(single(args, offset)?.as_real(offset)?, offset)?;
    if n > MAX_FACTORIAL {
        return Err(RuntimeError::Overflow { offset });
    }
    invocation.charge(usize::try_from(n).unwrap_or(usize::MAX))?;
    let mut product = 1.0_f64;
    let mut k = 2.0_f64;
    for _ in 2..=n {
        product *= k;
        k += 1.0;
    }
    Ok(Value::Real(product))
}

/// Greatest common divisor of two integers.
pub fn gcd(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let (a, b) = integer_pair(args, invocation.offset)?;
    Ok(Value::Real(to_f64(gcd_of(a, b))))
}

/// Least common multiple of two integers; `0` if either is `0`.
pub fn lcm(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (a, b) = integer_pair(args, offset)?;
    if a == 0 || b == 0 {
        return Ok(Value::Real(0.0));
    }
    let lcm = u128::from(a / gcd_of(a, b)) * u128::from(b);
    if lcm > u128::from(MAX_SAFE_U64_INT) {
        return Err(RuntimeError::Overflow { offset });
    }
    Ok(Value::Real(to_f64(u64::try_from(lcm).unwrap_or(u64::MAX))))
}

fn integer_pair(args: &[Value], offset: usize) -> EvalResult<(u64, u64)> {
    let (a, b) = pair(args, offset)?;
    Ok((f64_to_i64_checked(a.as_real(offset)?, offset)?.unsigned_abs(),
        f64_to_i64_checked(b.as_real(offset)?, offset)?.unsigned_abs()))
}

const fn gcd_of(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[allow(clippy::cast_precision_loss)]
const fn to_f64(n: u64) -> f64 {
    // Callers stay below 2^53.
    n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{context::EvaluationContext, evaluator::guard::Guard};

    fn call(rule: fn(&[Value], &mut Invocation<'_>) -> EvalResult<Value>,
            args: &[f64])
            -> EvalResult<Value> {
        let ctx = EvaluationContext::default();
        let mut guard = Guard::new(&ctx);
        let args: Vec<Value> = args.iter().copied().map(Value::Real).collect();
        rule(&args, &mut Invocation::new(0, &ctx, &mut guard))
    }

    #[test]
    fn integer_helpers() {
        assert_eq!(call(gcd, &[12.0, -18.0]), Ok(Value::Real(6.0)));
        assert_eq!(call(lcm, &[4.0, 6.0]), Ok(Value::Real(12.0)));
        assert_eq!(call(lcm, &[0.0, 6.0]), Ok(Value::Real(0.0)));
        assert!(matches!(call(gcd, &[1.5, 2.0]), Err(RuntimeError::Domain { .. })));
    }

    #[test]
    fn rounding() {
        assert_eq!(call(round, &[2.5]), Ok(Value::Real(3.0)));
        assert_eq!(call(round, &[-2.5]), Ok(Value::Real(-3.0)));
        assert_eq!(call(round, &[3.14159, 2.0]), Ok(Value::Real(3.14)));
        assert_eq!(call(trunc, &[-2.7]), Ok(Value::Real(-2.0)));
        assert_eq!(call(sign, &[0.0]), Ok(Value::Real(0.0)));
        assert_eq!(call(sign, &[-4.0]), Ok(Value::Real(-1.0)));
    }

    #[test]
    fn two_argument_helpers() {
        assert_eq!(call(hypot, &[3.0, 4.0]), Ok(Value::Real(5.0)));
        assert!(matches!(call(hypot, &[1e300, 1e300]), Ok(Value::Real(h)) if h > 1.4e300));
        assert_eq!(call(fmod, &[7.5, 2.0]), Ok(Value::Real(1.5)));
        assert_eq!(call(fmod, &[-7.0, 3.0]), Ok(Value::Real(-1.0)));
        assert_eq!(call(fmod, &[1.0, 0.0]), Err(RuntimeError::DivisionByZero { offset: 0 }));
        assert_eq!(call(copysign, &[3.0, -0.5]), Ok(Value::Real(-3.0)));
        assert_eq!(call(copysign, &[-3.0, 2.0]), Ok(Value::Real(3.0)));
    }

    #[test]
    fn ieee_remainder_rounds_the_quotient() {
        assert_eq!(call(remainder, &[5.0, 3.0]), Ok(Value::Real(-1.0)));
        assert_eq!(call(remainder, &[7.0, 3.0]), Ok(Value::Real(1.0)));
        assert_eq!(call(remainder, &[5.0, 2.0]), Ok(Value::Real(1.0)));
        assert_eq!(call(remainder, &[7.0, 2.0]), Ok(Value::Real(-1.0)));
        assert_eq!(call(remainder, &[-5.0, 3.0]), Ok(Value::Real(1.0)));
        assert_eq!(call(remainder, &[1.0, 0.0]), Err(RuntimeError::DivisionByZero { offset: 0 }));
    }

    #[test]
    fn ldexp_scales_by_powers_of_two() {
        assert_eq!(call(ldexp, &[3.0, 4.0]), Ok(Value::Real(48.0)));
        assert_eq!(call(ldexp, &[1.0, -1.0]), Ok(Value::Real(0.5)));
        assert!(matches!(call(ldexp, &[1e-300, 1100.0]), Ok(Value::Real(x)) if x > 1e30));
        assert_eq!(call(ldexp, &[0.0, 1e20]), Ok(Value::Real(0.0)));
        assert_eq!(call(ldexp, &[1.0, 1024.0]), Err(RuntimeError::Overflow { offset: 0 }));
        assert!(matches!(call(ldexp, &[1.0, 0.5]), Err(RuntimeError::Domain { .. })));
    }

    #[test]
    fn factorial_limits() {
        assert_eq!(call(factorial, &[0.0]), Ok(Value::Real(1.0)));
        assert!(matches!(call(factorial, &[-1.0]), Err(RuntimeError::Domain { .. })));
        assert_eq!(call(factorial, &[171.0]), Err(RuntimeError::Overflow { offset: 0 }));
        assert!(call(factorial, &[170.0]).is_ok());
    }
}

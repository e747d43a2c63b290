use std::f64::consts::{FRAC_2_SQRT_PI, PI, TAU};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        registry::core::{Invocation, single},
        value::core::Value,
    },
    util::num::checked_finite,
};

/// Lanczos coefficients, g = 7, n = 9.
const LANCZOS: [f64; 9] = [0.999_999_999_999_809_9,
                           676.520_368_121_885_1,
                           -1_259.139_216_722_402_8,
                           771.323_428_777_653_1,
                           -176.615_029_162_140_6,
                           12.507_343_278_686_905,
                           -0.138_571_095_265_720_12,
                           9.984_369_578_019_572e-6,
                           1.505_632_735_149_311_6e-7];
const LANCZOS_G: f64 = 7.0;
/// Largest integer whose gamma, `170!`, fits an `f64`.
const MAX_GAMMA_INTEGER: f64 = 171.0;

/// Below this magnitude `erf` sums its power series; above it `erfc` uses the
/// continued fraction.
const ERF_SERIES_LIMIT: f64 = 2.0;
const ERF_SERIES_TERMS: usize = 200;
const ERFC_FRACTION_TERMS: u32 = 200;

/// The gamma function Γ(x).
///
/// Positive integers up to `171` are computed exactly as `(x - 1)!`. Other
/// arguments use the Lanczos approximation, with the reflection formula
/// `Γ(x) = π / (sin(πx) Γ(1 - x))` below `0.5`.
///
/// # Errors
/// - `RuntimeError::Domain` at the poles `0, -1, -2, ...`.
/// - `RuntimeError::Overflow` once Γ(x) leaves the `f64` range.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("gamma(5)", &env, &ctx).unwrap(), Value::Real(24.0));
/// assert!(evaluate_expression("gamma(0)", &env, &ctx).is_err());
/// assert!(evaluate_expression("gamma(172)", &env, &ctx).is_err());
/// ```
pub fn gamma(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let x = single(args, offset)?.as_real(offset)?;
    check_pole("gamma", x, offset)?;

    if x.fract() == 0.0 && x > 0.0 {
        if x > MAX_GAMMA_INTEGER {
            return Err(RuntimeError::Overflow { offset });
        }
        let mut product = 1.0_f64;
        let mut k = 2.0_f64;
        while k < x {
            invocation.charge(1)?;
            product *= k;
            k += 1.0;
        }
        return Ok(Value::Real(product));
    }

    let value = if x < 0.5 {
        PI / ((PI * x).sin() * lanczos(1.0 - x))
    } else {
        lanczos(x)
    };
    Ok(Value::Real(checked_finite(value, offset)?))
}

/// Natural logarithm of `|Γ(x)|`, finite far beyond the range of
/// [`gamma`].
///
/// # Errors
/// `RuntimeError::Domain` at the poles of Γ.
pub fn lgamma(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let x = single(args, offset)?.as_real(offset)?;
    check_pole("lgamma", x, offset)?;
    if x == 1.0 || x == 2.0 {
        return Ok(Value::Real(0.0));
    }

    let value = if x < 0.5 {
        (PI / (PI * x).sin().abs()).ln() - ln_lanczos(1.0 - x)
    } else {
        ln_lanczos(x)
    };
    Ok(Value::Real(checked_finite(value, offset)?))
}

/// The error function.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("erf(0)", &env, &ctx).unwrap(), Value::Real(0.0));
/// let Value::Real(x) = evaluate_expression("erf(1)", &env, &ctx).unwrap() else { panic!() };
/// assert!((x - 0.842_700_792_949_715).abs() < 1e-13);
/// ```
pub fn erf(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let x = single(args, offset)?.as_real(offset)?;
    Ok(Value::Real(erf_of(x)))
}

/// The complementary error function `1 - erf(x)`, accurate in the tail where
/// the difference would cancel.
pub fn erfc(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let x = single(args, offset)?.as_real(offset)?;
    Ok(Value::Real(erfc_of(x)))
}

fn check_pole(name: &str, x: f64, offset: usize) -> EvalResult<()> {
    if x <= 0.0 && x.fract() == 0.0 {
        return Err(RuntimeError::Domain { details: format!("{name} has a pole at {x}"),
                                          offset });
    }
    Ok(())
}

/// Lanczos sum and shifted argument for `x >= 0.5`.
fn lanczos_parts(x: f64) -> (f64, f64) {
    let z = x - 1.0;
    let mut sum = LANCZOS[0];
    let mut k = 1.0;
    for c in &LANCZOS[1..] {
        sum += c / (z + k);
        k += 1.0;
    }
    (sum, z + LANCZOS_G + 0.5)
}

/// Γ(x) for `x >= 0.5`.
fn lanczos(x: f64) -> f64 {
    let (sum, t) = lanczos_parts(x);
    // t^(x - 0.5) in two halves, so that Γ(170) does not overflow early.
    let half = t.powf((x - 0.5) / 2.0);
    TAU.sqrt() * half * ((-t).exp() * half) * sum
}

/// `ln Γ(x)` for `x >= 0.5`.
fn ln_lanczos(x: f64) -> f64 {
    let (sum, t) = lanczos_parts(x);
    0.5 * TAU.ln() + (x - 0.5) * t.ln() - t + sum.ln()
}

fn erf_of(x: f64) -> f64 {
    if x.abs() < ERF_SERIES_LIMIT {
        erf_series(x)
    } else {
        (1.0 - erfc_fraction(x.abs())).copysign(x)
    }
}

fn erfc_of(x: f64) -> f64 {
    if x >= ERF_SERIES_LIMIT {
        erfc_fraction(x)
    } else if x <= -ERF_SERIES_LIMIT {
        2.0 - erfc_fraction(-x)
    } else {
        1.0 - erf_series(x)
    }
}

/// `erf(x) = 2/√π e^(-x²) Σ 2ⁿ x^(2n+1) / (1·3·…·(2n+1))`; every term has the
/// sign of `x`, so nothing cancels.
fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    let mut denominator = 1.0;
    for _ in 0..ERF_SERIES_TERMS {
        denominator += 2.0;
        term *= 2.0 * x2 / denominator;
        sum += term;
        if term.abs() <= f64::EPSILON * sum.abs() {
            break;
        }
    }
    FRAC_2_SQRT_PI * (-x2).exp() * sum
}

/// `erfc(x)` for `x >= 2` by the continued fraction
/// `e^(-x²)/√π · 1/(x + (1/2)/(x + 1/(x + (3/2)/(x + …))))`, evaluated from
/// the bottom up.
fn erfc_fraction(x: f64) -> f64 {
    let mut fraction = x;
    for k in (1..=ERFC_FRACTION_TERMS).rev() {
        fraction = x + f64::from(k) / 2.0 / fraction;
    }
    FRAC_2_SQRT_PI / 2.0 * (-x * x).exp() / fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{context::EvaluationContext, evaluator::guard::Guard};

    fn call(rule: fn(&[Value], &mut Invocation<'_>) -> EvalResult<Value>, x: f64) -> EvalResult<f64> {
        let ctx = EvaluationContext::default();
        let mut guard = Guard::new(&ctx);
        match rule(&[Value::Real(x)], &mut Invocation::new(0, &ctx, &mut guard))? {
            Value::Real(y) => Ok(y),
            other => panic!("expected a real, got {other:?}"),
        }
    }

    fn assert_near(found: f64, expected: f64) {
        let tolerance = 1e-12 * expected.abs().max(1.0);
        assert!((found - expected).abs() <= tolerance, "{found} is not {expected}");
    }

    #[test]
    fn gamma_at_integers_is_a_factorial() {
        assert_eq!(call(gamma, 1.0), Ok(1.0));
        assert_eq!(call(gamma, 6.0), Ok(120.0));
        assert!(call(gamma, 171.0).is_ok());
        assert_eq!(call(gamma, 172.0), Err(RuntimeError::Overflow { offset: 0 }));
    }

    #[test]
    fn gamma_between_integers() {
        assert_near(call(gamma, 0.5).unwrap(), PI.sqrt());
        assert_near(call(gamma, -0.5).unwrap(), -2.0 * PI.sqrt());
        assert_near(call(gamma, 4.5).unwrap(), 11.631_728_396_567_448);
        assert!(call(gamma, 170.5).unwrap().is_finite());
        assert_eq!(call(gamma, 171.7), Err(RuntimeError::Overflow { offset: 0 }));
    }

    #[test]
    fn gamma_poles() {
        for pole in [0.0, -1.0, -20.0] {
            assert!(matches!(call(gamma, pole), Err(RuntimeError::Domain { .. })));
            assert!(matches!(call(lgamma, pole), Err(RuntimeError::Domain { .. })));
        }
    }

    #[test]
    fn log_gamma() {
        assert_eq!(call(lgamma, 1.0), Ok(0.0));
        assert_near(call(lgamma, 10.0).unwrap(), 362_880_f64.ln());
        assert_near(call(lgamma, 0.5).unwrap(), PI.sqrt().ln());
        assert_near(call(lgamma, -0.5).unwrap(), (2.0 * PI.sqrt()).ln());
        assert_near(call(lgamma, 1000.0).unwrap(), 5_905.220_423_209_181);
    }

    #[test]
    fn error_function() {
        assert_eq!(call(erf, 0.0), Ok(0.0));
        assert_near(call(erf, 0.5).unwrap(), 0.520_499_877_813_046_5);
        assert_near(call(erf, -1.0).unwrap(), -0.842_700_792_949_714_9);
        assert_near(call(erf, 2.5).unwrap(), 0.999_593_047_982_555);
        assert_eq!(call(erf, 40.0), Ok(1.0));
    }

    #[test]
    fn complementary_error_function() {
        assert_eq!(call(erfc, 0.0), Ok(1.0));
        assert_near(call(erfc, 3.0).unwrap() / 2.209_049_699_858_544e-5, 1.0);
        assert_near(call(erfc, -3.0).unwrap(), 2.0 - 2.209_049_699_858_544e-5);
        assert_near(call(erfc, 1.0).unwrap(), 0.157_299_207_050_285_1);
        assert_eq!(call(erfc, 40.0), Ok(0.0));
    }
}

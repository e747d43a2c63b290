use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, registry::core::Invocation, value::core::Value},
    util::num::{checked_finite, usize_to_f64_checked},
};

/// Collects the samples of a statistics call.
///
/// Accepts either a single vector, `mean([1, 2, 3])`, or a list of reals,
/// `mean(1, 2, 3)`. Charges one budget unit per sample.
///
/// # Errors
/// - `RuntimeError::Domain` if there are no samples.
/// - `RuntimeError::TypeMismatch` for any other argument kind.
fn samples(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Vec<f64>> {
    let offset = invocation.offset;
    let samples: Vec<f64> = match args {
        [Value::Vector(v)] => v.to_vec(),
        _ => args.iter().map(|arg| arg.as_real(offset)).collect::<EvalResult<_>>()?,
    };
    invocation.charge(samples.len())?;
    if samples.is_empty() {
        return Err(RuntimeError::Domain { details: "no samples".to_string(),
                                          offset });
    }
    Ok(samples)
}

fn mean_of(samples: &[f64], offset: usize) -> EvalResult<f64> {
    let n = usize_to_f64_checked(samples.len(), offset)?;
    checked_finite(samples.iter().sum::<f64>() / n, offset)
}

fn variance_of(samples: &[f64], offset: usize) -> EvalResult<f64> {
    if samples.len() < 2 {
        return Err(RuntimeError::Domain { details: "sample variance needs two samples".to_string(),
                                          offset });
    }
    let mean = mean_of(samples, offset)?;
    let squares: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
    checked_finite(squares / usize_to_f64_checked(samples.len() - 1, offset)?, offset)
}

/// Arithmetic mean.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("mean([1, 2, 3, 6])", &env, &ctx).unwrap(), Value::Real(3.0));
/// assert!(evaluate_expression("mean([])", &env, &ctx).is_err());
/// ```
pub fn mean(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let samples = samples(args, invocation)?;
    Ok(Value::Real(mean_of(&samples, invocation.offset)?))
}

/// Median; the mean of the two middle samples for an even count.
pub fn median(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let mut samples = samples(args, invocation)?;
    samples.sort_by(f64::total_cmp);
    let mid = samples.len() / 2;
    let median = if samples.len() % 2 == 0 {
        f64::midpoint(samples[mid - 1], samples[mid])
    } else {
        samples[mid]
    };
    Ok(Value::Real(median))
}

/// Sample variance (divides by `n - 1`).
pub fn variance(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let samples = samples(args, invocation)?;
    Ok(Value::Real(variance_of(&samples, invocation.offset)?))
}

/// Sample standard deviation.
pub fn stddev(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let samples = samples(args, invocation)?;
    Ok(Value::Real(variance_of(&samples, invocation.offset)?.sqrt()))
}

/// Sum of the samples.
pub fn sum(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let samples = samples(args, invocation)?;
    Ok(Value::Real(checked_finite(samples.iter().sum(), invocation.offset)?))
}

/// Smallest sample.
pub fn min(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let samples = samples(args, invocation)?;
    Ok(Value::Real(samples.iter().copied().fold(f64::INFINITY, f64::min)))
}

/// Largest sample.
pub fn max(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let samples = samples(args, invocation)?;
    Ok(Value::Real(samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{context::EvaluationContext, evaluator::guard::Guard};

    fn call(rule: fn(&[Value], &mut Invocation<'_>) -> EvalResult<Value>,
            args: &[Value])
            -> EvalResult<Value> {
        let ctx = EvaluationContext::default();
        let mut guard = Guard::new(&ctx);
        rule(args, &mut Invocation::new(0, &ctx, &mut guard))
    }

    #[test]
    fn median_of_even_count() {
        let v = Value::from(vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(call(median, &[v]), Ok(Value::Real(2.5)));
    }

    #[test]
    fn variance_uses_sample_formula() {
        let v = Value::from(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let Ok(Value::Real(var)) = call(variance, &[v]) else {
            panic!("variance failed");
        };
        assert!((var - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn single_sample_has_no_variance() {
        assert!(matches!(call(stddev, &[Value::Real(3.0)]), Err(RuntimeError::Domain { .. })));
    }

    #[test]
    fn scalar_argument_lists() {
        let args = [Value::Real(3.0), Value::Real(-1.0), Value::Real(2.0)];
        assert_eq!(call(min, &args), Ok(Value::Real(-1.0)));
        assert_eq!(call(max, &args), Ok(Value::Real(3.0)));
        assert_eq!(call(sum, &args), Ok(Value::Real(4.0)));
    }

    #[test]
    fn samples_are_charged() {
        let ctx = EvaluationContext { node_budget: 3,
                                      ..EvaluationContext::default() };
        let mut guard = Guard::new(&ctx);
        let v = Value::from(vec![1.0; 8]);
        assert!(matches!(mean(&[v], &mut Invocation::new(0, &ctx, &mut guard)),
                         Err(RuntimeError::BudgetExceeded { .. })));
    }
}

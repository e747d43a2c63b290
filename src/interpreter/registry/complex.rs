use crate::interpreter::{
    evaluator::core::EvalResult,
    registry::{
        core::{Invocation, single},
        trig::to_user_angle,
    },
    value::{complex::ComplexNumber, core::Value},
};

fn scalar(args: &[Value], invocation: &Invocation<'_>) -> EvalResult<ComplexNumber> {
    single(args, invocation.offset)?.as_complex(invocation.offset)
}

/// Real part.
pub fn re(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    Ok(Value::Real(scalar(args, invocation)?.re))
}

/// Imaginary part; `0` for reals.
pub fn im(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    Ok(Value::Real(scalar(args, invocation)?.im))
}

/// Complex conjugate. A real stays real.
pub fn conj(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    match single(args, invocation.offset)? {
        Value::Real(x) => Ok(Value::Real(*x)),
        Value::Complex(c) => Ok(Value::Complex(c.conj())),
        other => Err(other.mismatch("a number", invocation.offset)),
    }
}

/// Argument (phase) in the current angle unit; `0` for zero.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("arg(i)", &env, &ctx).unwrap(), Value::Real(90.0));
/// assert_eq!(evaluate_expression("arg(-2)", &env, &ctx).unwrap(), Value::Real(180.0));
/// ```
pub fn arg(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let z = scalar(args, invocation)?;
    Ok(Value::Real(to_user_angle(z.arg(), invocation.ctx.angle_mode)))
}

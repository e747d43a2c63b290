use crate::{
    error::RuntimeError,
    interpreter::{
        context::AngleMode,
        evaluator::core::EvalResult,
        registry::core::{Invocation, pair, single},
        value::core::Value,
    },
    util::num::checked_finite,
};

/// Inverse-trig results this close to a whole degree are snapped to it.
const DEGREE_SNAP: f64 = 1e-9;

const SIN_QUADRANTS: [f64; 4] = [0.0, 1.0, 0.0, -1.0];
const COS_QUADRANTS: [f64; 4] = [1.0, 0.0, -1.0, 0.0];

/// Sine. Exact at multiples of 90° in degree mode; complex arguments are in
/// radians.
///
/// # Example
/// ```
/// use keycalc::{
///     Environment, EvaluationContext, Settings, evaluate_expression, interpreter::value::core::Value,
/// };
///
/// let ctx = EvaluationContext::from(&Settings::default());
/// let env = Environment::new();
/// assert_eq!(evaluate_expression("sin(180)", &env, &ctx).unwrap(), Value::Real(0.0));
/// ```
pub fn sin(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match single(args, offset)? {
        Value::Real(x) => {
            if let Some(quadrant) = quarter_turns(*x, invocation.ctx.angle_mode) {
                return Ok(Value::Real(SIN_QUADRANTS[quadrant]));
            }
            let radians = invocation.ctx.angle_mode.to_radians(*x);
            Ok(Value::Real(checked_finite(radians.sin(), offset)?))
        },
        Value::Complex(c) => Ok(Value::Complex(c.sin().checked(offset)?)),
        other => Err(other.mismatch("a number", offset)),
    }
}

/// Cosine. Exact at multiples of 90° in degree mode.
pub fn cos(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match single(args, offset)? {
        Value::Real(x) => {
            if let Some(quadrant) = quarter_turns(*x, invocation.ctx.angle_mode) {
                return Ok(Value::Real(COS_QUADRANTS[quadrant]));
            }
            let radians = invocation.ctx.angle_mode.to_radians(*x);
            Ok(Value::Real(checked_finite(radians.cos(), offset)?))
        },
        Value::Complex(c) => Ok(Value::Complex(c.cos().checked(offset)?)),
        other => Err(other.mismatch("a number", offset)),
    }
}

/// Tangent. Undefined at odd multiples of 90° in degree mode.
pub fn tan(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match single(args, offset)? {
        Value::Real(x) => {
            if let Some(quadrant) = quarter_turns(*x, invocation.ctx.angle_mode) {
                if quadrant % 2 == 1 {
                    return Err(RuntimeError::Domain { details: format!("tan is undefined at {x}°"),
                                                      offset });
                }
                return Ok(Value::Real(0.0));
            }
            let radians = invocation.ctx.angle_mode.to_radians(*x);
            Ok(Value::Real(checked_finite(radians.tan(), offset)?))
        },
        Value::Complex(c) => Ok(Value::Complex(c.sin().checked_div(c.cos(), offset)?)),
        other => Err(other.mismatch("a number", offset)),
    }
}

/// Inverse sine, returned in the current angle unit.
pub fn asin(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    inverse(args, invocation, f64::asin)
}

/// Inverse cosine, returned in the current angle unit.
pub fn acos(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    inverse(args, invocation, f64::acos)
}

/// Inverse tangent, returned in the current angle unit.
pub fn atan(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    inverse(args, invocation, f64::atan)
}

/// Angle of the point `(x, y)`, called as `atan2(y, x)`.
///
/// # Errors
/// `RuntimeError::Domain` for the origin, whose angle is undefined.
pub fn atan2(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (y, x) = pair(args, offset)?;
    let (y, x) = (y.as_real(offset)?, x.as_real(offset)?);
    if x == 0.0 && y == 0.0 {
        return Err(RuntimeError::Domain { details: "atan2 is undefined at the origin".to_string(),
                                          offset });
    }
    Ok(Value::Real(to_user_angle(y.atan2(x), invocation.ctx.angle_mode)))
}

fn inverse(args: &[Value],
           invocation: &Invocation<'_>,
           function: fn(f64) -> f64)
           -> EvalResult<Value> {
    let offset = invocation.offset;
    let x = single(args, offset)?.as_real(offset)?;
    let radians = checked_finite(function(x), offset)?;
    Ok(Value::Real(to_user_angle(radians, invocation.ctx.angle_mode)))
}

/// Converts a computed angle to the user's unit, snapping near-whole degrees.
pub(crate) fn to_user_angle(radians: f64, mode: AngleMode) -> f64 {
    let angle = mode.from_radians(radians);
    match mode {
        AngleMode::Degrees if (angle - angle.round()).abs() < DEGREE_SNAP => angle.round(),
        _ => angle,
    }
}

/// Quadrant index of an exact multiple of 90° in degree mode.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn quarter_turns(x: f64, mode: AngleMode) -> Option<usize> {
    let turns = x / 90.0;
    (mode == AngleMode::Degrees && turns.fract() == 0.0).then(|| turns.rem_euclid(4.0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{context::EvaluationContext, evaluator::guard::Guard};

    fn call(rule: fn(&[Value], &mut Invocation<'_>) -> EvalResult<Value>,
            args: &[Value],
            mode: AngleMode)
            -> EvalResult<Value> {
        let ctx = EvaluationContext { angle_mode: mode,
                                      ..EvaluationContext::default() };
        let mut guard = Guard::new(&ctx);
        let mut invocation = Invocation::new(0, &ctx, &mut guard);
        rule(args, &mut invocation)
    }

    #[test]
    fn right_angles_are_exact() {
        assert_eq!(call(sin, &[Value::Real(-90.0)], AngleMode::Degrees), Ok(Value::Real(-1.0)));
        assert_eq!(call(cos, &[Value::Real(450.0)], AngleMode::Degrees), Ok(Value::Real(0.0)));
        assert_eq!(call(tan, &[Value::Real(180.0)], AngleMode::Degrees), Ok(Value::Real(0.0)));
    }

    #[test]
    fn tangent_of_right_angle_is_undefined() {
        assert!(matches!(call(tan, &[Value::Real(270.0)], AngleMode::Degrees),
                         Err(RuntimeError::Domain { .. })));
    }

    #[test]
    fn inverse_trig_answers_in_degrees() {
        assert_eq!(call(asin, &[Value::Real(0.5)], AngleMode::Degrees), Ok(Value::Real(30.0)));
        assert_eq!(call(atan2, &[Value::Real(1.0), Value::Real(-1.0)], AngleMode::Degrees),
                   Ok(Value::Real(135.0)));
    }

    #[test]
    fn radians_pass_through() {
        let Ok(Value::Real(x)) = call(acos, &[Value::Real(-1.0)], AngleMode::Radians) else {
            panic!("acos(-1) failed");
        };
        assert_eq!(x, std::f64::consts::PI);
    }
}

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::checked_finite,
};

/// Evaluates `+ - * / .* ./` on two scalars.
///
/// Two reals stay real; if either side is complex both are promoted. A complex
/// result is never narrowed back to a real. `.*` and `./` behave like `*` and
/// `/` here.
///
/// # Errors
/// - `RuntimeError::DivisionByZero` for a zero divisor.
/// - `RuntimeError::Overflow` or `RuntimeError::Domain` for non-finite
///   results.
/// - `RuntimeError::TypeMismatch` for non-scalar operands.
///
/// # Example
/// ```
/// use keycalc::{
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::binary::scalar::arithmetic,
///         value::{complex::ComplexNumber, core::Value},
///     },
/// };
///
/// let r = arithmetic(BinaryOperator::Mul, &Value::Real(1.5), &Value::Real(2.0), 0).unwrap();
/// assert_eq!(r, Value::Real(3.0));
///
/// let i = Value::Complex(ComplexNumber::new(0.0, 1.0));
/// let r = arithmetic(BinaryOperator::Mul, &i, &i, 0).unwrap();
/// assert_eq!(r, Value::Complex(ComplexNumber::new(-1.0, 0.0)));
/// ```
pub fn arithmetic(op: BinaryOperator,
                  left: &Value,
                  right: &Value,
                  offset: usize)
                  -> EvalResult<Value> {
    use BinaryOperator::{Add, Div, ElemDiv, ElemMul, Mul, Sub};

    match (left, right) {
        (Value::Real(l), Value::Real(r)) => Ok(Value::Real(real_op(op, *l, *r, offset)?)),
        (Value::Complex(_), _) | (_, Value::Complex(_)) => {
            let l = left.as_complex(offset)?;
            let r = right.as_complex(offset)?;
            let result = match op {
                Add => l + r,
                Sub => l - r,
                Mul | ElemMul => l * r,
                Div | ElemDiv => l.checked_div(r, offset)?,
                _ => return Err(unsupported(op, left, right, offset)),
            };
            Ok(Value::Complex(result.checked(offset)?))
        },
        _ => Err(unsupported(op, left, right, offset)),
    }
}

/// Applies `+ - * / .* ./` to two reals and validates the result.
///
/// # Errors
/// As for [`arithmetic`].
pub fn real_op(op: BinaryOperator, l: f64, r: f64, offset: usize) -> EvalResult<f64> {
    use BinaryOperator::{Add, Div, ElemDiv, ElemMul, Mul, Sub};

    let result = match op {
        Add => l + r,
        Sub => l - r,
        Mul | ElemMul => l * r,
        Div | ElemDiv => {
            if r == 0.0 {
                return Err(RuntimeError::DivisionByZero { offset });
            }
            l / r
        },
        _ => {
            return Err(RuntimeError::TypeMismatch { details: format!("{op} is not arithmetic"),
                                                    offset });
        },
    };
    checked_finite(result, offset)
}

/// Evaluates `a % b` on reals. The result takes the sign of the dividend.
///
/// # Errors
/// - `RuntimeError::Domain` for a zero divisor.
/// - `RuntimeError::TypeMismatch` unless both operands are real.
///
/// # Example
/// ```
/// use keycalc::interpreter::{evaluator::binary::scalar::remainder, value::core::Value};
///
/// assert_eq!(remainder(&Value::Real(-7.0), &Value::Real(3.0), 0).unwrap(), Value::Real(-1.0));
/// assert!(remainder(&Value::Real(1.0), &Value::Real(0.0), 0).is_err());
/// ```
pub fn remainder(left: &Value, right: &Value, offset: usize) -> EvalResult<Value> {
    let (Value::Real(l), Value::Real(r)) = (left, right) else {
        return Err(unsupported(BinaryOperator::Mod, left, right, offset));
    };
    if *r == 0.0 {
        return Err(RuntimeError::Domain { details: "remainder of division by zero".to_string(),
                                          offset });
    }
    Ok(Value::Real(checked_finite(l % r, offset)?))
}

fn unsupported(op: BinaryOperator, left: &Value, right: &Value, offset: usize) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("cannot apply {op} to a {} and a {}",
                                                  left.kind_name(),
                                                  right.kind_name()),
                                 offset }
}

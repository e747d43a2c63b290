use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Maps an equality operator and an equality result to the final boolean.
///
/// # Panics
/// If `op` is not `==` or `!=`; the caller dispatches on the operator first.
#[must_use]
pub fn equality_op_result(op: BinaryOperator, is_equal: bool) -> bool {
    match op {
        BinaryOperator::Equal => is_equal,
        BinaryOperator::NotEqual => !is_equal,
        _ => unreachable!("equality_op_result used with non equality operator"),
    }
}

/// Evaluates a comparison of the form `Value <Operator> Value`.
///
/// Ordering operators are defined on reals only. `==` and `!=` compare two
/// values of the same kind entry by entry; a real compared with a complex
/// number is promoted first.
///
/// # Errors
/// `RuntimeError::TypeMismatch` for ordering non-reals and for equality
/// between different kinds.
///
/// # Example
/// ```
/// use keycalc::{
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::binary::comparison::compare,
///         value::{complex::ComplexNumber, core::Value},
///     },
/// };
///
/// let r = compare(BinaryOperator::Less, &Value::Real(3.0), &Value::Real(5.0), 0);
/// assert_eq!(r.unwrap(), Value::Boolean(true));
///
/// let z = Value::Complex(ComplexNumber::new(2.0, 0.0));
/// let r = compare(BinaryOperator::Equal, &Value::Real(2.0), &z, 0);
/// assert_eq!(r.unwrap(), Value::Boolean(true));
/// ```
pub fn compare(op: BinaryOperator, left: &Value, right: &Value, offset: usize) -> EvalResult<Value> {
    use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

    Ok(Value::Boolean(match op {
                          Equal | NotEqual => {
                              equality_op_result(op, strict_eq(left, right, offset)?)
                          },

                          Less | Greater | LessEqual | GreaterEqual => {
                              let (Value::Real(l), Value::Real(r)) = (left, right) else {
                                  return Err(RuntimeError::TypeMismatch { details: format!("cannot order a {} and a {}",
                                                                                           left.kind_name(),
                                                                                           right.kind_name()),
                                                                          offset });
                              };
                              match op {
                                  Less => l < r,
                                  Greater => l > r,
                                  LessEqual => l <= r,
                                  _ => l >= r,
                              }
                          },

                          _ => {
                              return Err(RuntimeError::TypeMismatch { details: format!("{op} is not a comparison"),
                                                                      offset });
                          },
                      }))
}

/// Exact structural equality of two values of the same kind.
///
/// # Errors
/// `RuntimeError::TypeMismatch` for values of different kinds.
pub fn strict_eq(left: &Value, right: &Value, offset: usize) -> EvalResult<bool> {
    use Value::{Boolean, Complex, Matrix, Real, Vector};

    match (left, right) {
        (Real(a), Real(b)) => Ok(a == b),
        (Complex(_), Real(_) | Complex(_)) | (Real(_), Complex(_)) => {
            Ok(left.as_complex(offset)? == right.as_complex(offset)?)
        },
        (Vector(a), Vector(b)) => Ok(a == b),
        (Matrix(a), Matrix(b)) => Ok(a == b),
        (Boolean(a), Boolean(b)) => Ok(a == b),
        _ => Err(RuntimeError::TypeMismatch { details: format!("cannot compare a {} with a {}",
                                                               left.kind_name(),
                                                               right.kind_name()),
                                              offset }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_needs_reals() {
        let b = Value::Boolean(true);
        assert!(matches!(compare(BinaryOperator::Less, &b, &Value::Real(1.0), 0),
                         Err(RuntimeError::TypeMismatch { .. })));
    }

    #[test]
    fn vectors_compare_entrywise() {
        let a = Value::from(vec![1.0, 2.0]);
        let b = Value::from(vec![1.0, 2.5]);
        assert_eq!(compare(BinaryOperator::NotEqual, &a, &b, 0), Ok(Value::Boolean(true)));
        assert_eq!(compare(BinaryOperator::Equal, &a, &a, 0), Ok(Value::Boolean(true)));
    }

    #[test]
    fn different_kinds_do_not_compare() {
        let v = Value::from(vec![1.0]);
        assert!(compare(BinaryOperator::Equal, &v, &Value::Real(1.0), 0).is_err());
    }
}

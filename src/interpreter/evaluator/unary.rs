use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Evaluates a unary operation on a value.
///
/// `Negate` flips the sign of a real, a complex number or every entry of a
/// vector or matrix. `Plus` returns numeric values unchanged. Booleans support
/// neither.
///
/// # Errors
/// `RuntimeError::TypeMismatch` for booleans and error values.
///
/// # Example
/// ```
/// use keycalc::{
///     ast::UnaryOperator,
///     interpreter::{evaluator::unary::evaluate_unary, value::core::Value},
/// };
///
/// let v = evaluate_unary(UnaryOperator::Negate, &Value::Real(5.0), 0).unwrap();
/// assert_eq!(v, Value::Real(-5.0));
///
/// let v = evaluate_unary(UnaryOperator::Negate, &Value::from(vec![1.0, -2.0]), 0).unwrap();
/// assert_eq!(v, Value::from(vec![-1.0, 2.0]));
///
/// assert!(evaluate_unary(UnaryOperator::Plus, &Value::Boolean(true), 0).is_err());
/// ```
pub fn evaluate_unary(op: UnaryOperator, value: &Value, offset: usize) -> EvalResult<Value> {
    match (op, value) {
        (_, Value::Boolean(_) | Value::Error(..)) => {
            Err(RuntimeError::TypeMismatch { details: format!("cannot apply {op} to a {}",
                                                              value.kind_name()),
                                             offset })
        },
        (UnaryOperator::Plus, _) => Ok(value.clone()),
        (UnaryOperator::Negate, Value::Real(r)) => Ok(Value::Real(-r)),
        (UnaryOperator::Negate, Value::Complex(c)) => Ok(Value::Complex(-*c)),
        (UnaryOperator::Negate, Value::Vector(v)) => Ok(Value::from(v.iter().map(|x| -x).collect::<Vec<_>>())),
        (UnaryOperator::Negate, Value::Matrix(m)) => Ok(Value::from(m.map(|x| -x))),
    }
}

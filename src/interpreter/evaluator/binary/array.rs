use std::rc::Rc;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::scalar::real_op, core::EvalResult, guard::Guard},
        value::{core::Value, matrix::Matrix},
    },
};

/// Applies an element-wise operation where at least one side is a vector or
/// a matrix.
///
/// Handles every pairing the arithmetic operators allow:
/// - vector with vector of equal length,
/// - matrix with matrix of equal dimensions,
/// - array with real and real with array (broadcast).
///
/// One budget unit is charged per element before any work is done.
///
/// # Errors
/// - `RuntimeError::Domain` when a complex number meets an array, since arrays
///   only hold reals.
/// - `RuntimeError::Shape` for mismatched lengths or dimensions and for a
///   vector combined with a matrix.
/// - Any error of the element operation.
///
/// # Example
/// ```
/// use keycalc::{
///     EvaluationContext,
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::{binary::array::elementwise, guard::Guard},
///         value::core::Value,
///     },
/// };
///
/// let mut guard = Guard::new(&EvaluationContext::default());
/// let a = Value::from(vec![1.0, 2.0]);
/// let b = Value::from(vec![10.0, 20.0]);
///
/// let r = elementwise(BinaryOperator::ElemMul, &a, &b, 0, &mut guard).unwrap();
/// assert_eq!(r, Value::from(vec![10.0, 40.0]));
/// ```
pub fn elementwise(op: BinaryOperator,
                   left: &Value,
                   right: &Value,
                   offset: usize,
                   guard: &mut Guard)
                   -> EvalResult<Value> {
    use Value::{Complex, Matrix as M, Real, Vector};

    match (left, right) {
        (Complex(_), Vector(_) | M(_)) | (Vector(_) | M(_), Complex(_)) => {
            Err(RuntimeError::Domain { details: "vectors and matrices hold real entries only"
                                                    .to_string(),
                                       offset })
        },

        (Vector(a), Vector(b)) => {
            if a.len() != b.len() {
                return Err(RuntimeError::Shape { details: format!("cannot apply {op} to vectors of lengths {} and {}",
                                                                  a.len(),
                                                                  b.len()),
                                                 offset });
            }
            guard.charge_elements(a.len(), offset)?;
            let out = a.iter()
                       .zip(b.iter())
                       .map(|(l, r)| real_op(op, *l, *r, offset))
                       .collect::<EvalResult<Vec<_>>>()?;
            Ok(Vector(Rc::new(out)))
        },

        (M(a), M(b)) => {
            if (a.rows(), a.cols()) != (b.rows(), b.cols()) {
                return Err(RuntimeError::Shape { details: format!("cannot apply {op} to a {}x{} and a {}x{} matrix",
                                                                  a.rows(),
                                                                  a.cols(),
                                                                  b.rows(),
                                                                  b.cols()),
                                                 offset });
            }
            guard.charge_elements(a.data().len(), offset)?;
            let data = a.data()
                        .iter()
                        .zip(b.data())
                        .map(|(l, r)| real_op(op, *l, *r, offset))
                        .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::from(Matrix::from_data(a.rows(), a.cols(), data, offset)?))
        },

        (Vector(v), Real(s)) => broadcast_vector(v, |x| real_op(op, x, *s, offset), offset, guard),
        (Real(s), Vector(v)) => broadcast_vector(v, |x| real_op(op, *s, x, offset), offset, guard),
        (M(m), Real(s)) => broadcast_matrix(m, |x| real_op(op, x, *s, offset), offset, guard),
        (Real(s), M(m)) => broadcast_matrix(m, |x| real_op(op, *s, x, offset), offset, guard),

        _ => Err(RuntimeError::Shape { details: format!("cannot apply {op} to a {} and a {}",
                                                        left.kind_name(),
                                                        right.kind_name()),
                                       offset }),
    }
}

fn broadcast_vector<F>(v: &[f64], f: F, offset: usize, guard: &mut Guard) -> EvalResult<Value>
    where F: Fn(f64) -> EvalResult<f64>
{
    guard.charge_elements(v.len(), offset)?;
    let out = v.iter().map(|x| f(*x)).collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::from(out))
}

fn broadcast_matrix<F>(m: &Matrix, f: F, offset: usize, guard: &mut Guard) -> EvalResult<Value>
    where F: Fn(f64) -> EvalResult<f64>
{
    guard.charge_elements(m.data().len(), offset)?;
    let data = m.data().iter().map(|x| f(*x)).collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::from(Matrix::from_data(m.rows(), m.cols(), data, offset)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{context::EvaluationContext, value::complex::I};

    fn apply(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        let mut guard = Guard::new(&EvaluationContext::default());
        elementwise(op, left, right, 0, &mut guard)
    }

    #[test]
    fn scalar_broadcasts_on_either_side() {
        let v = Value::from(vec![2.0, 4.0]);
        assert_eq!(apply(BinaryOperator::Sub, &Value::Real(10.0), &v),
                   Ok(Value::from(vec![8.0, 6.0])));
        assert_eq!(apply(BinaryOperator::Sub, &v, &Value::Real(1.0)),
                   Ok(Value::from(vec![1.0, 3.0])));
    }

    #[test]
    fn complex_does_not_mix_with_arrays() {
        let v = Value::from(vec![1.0]);
        assert!(matches!(apply(BinaryOperator::Add, &v, &Value::Complex(I)),
                         Err(RuntimeError::Domain { .. })));
    }

    #[test]
    fn element_division_by_zero_fails() {
        let a = Value::from(vec![1.0, 2.0]);
        let b = Value::from(vec![1.0, 0.0]);
        assert_eq!(apply(BinaryOperator::ElemDiv, &a, &b),
                   Err(RuntimeError::DivisionByZero { offset: 0 }));
    }

    #[test]
    fn vector_and_matrix_do_not_add() {
        let m = Value::from(Matrix::identity(2));
        let v = Value::from(vec![1.0, 2.0]);
        assert!(matches!(apply(BinaryOperator::Add, &m, &v), Err(RuntimeError::Shape { .. })));
    }
}

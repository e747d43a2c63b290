use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, guard::Guard},
        value::matrix::Matrix,
    },
    util::num::checked_finite,
};

/// Multiplies two matrices.
///
/// The number of columns of `a` must equal the number of rows of `b`. One
/// budget unit is charged per scalar multiplication.
///
/// # Errors
/// - `RuntimeError::Shape` if the inner dimensions differ.
/// - `RuntimeError::Overflow` if an entry is not finite.
/// - Guard errors.
///
/// # Example
/// ```
/// use keycalc::{
///     EvaluationContext,
///     interpreter::{
///         evaluator::{binary::matmul::multiply, guard::Guard},
///         value::matrix::Matrix,
///     },
/// };
///
/// let mut guard = Guard::new(&EvaluationContext::default());
/// let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 0).unwrap();
/// let b = Matrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 0).unwrap();
///
/// let p = multiply(&a, &b, 0, &mut guard).unwrap();
/// assert_eq!(p.data(), &[2.0, 1.0, 4.0, 3.0]);
/// ```
pub fn multiply(a: &Matrix, b: &Matrix, offset: usize, guard: &mut Guard) -> EvalResult<Matrix> {
    if a.cols() != b.rows() {
        return Err(dim_mismatch(a.rows(), a.cols(), b.rows(), b.cols(), offset));
    }
    guard.charge_elements(a.rows().saturating_mul(a.cols()).saturating_mul(b.cols()), offset)?;

    let mut data = Vec::with_capacity(a.rows() * b.cols());
    for row in a.row_iter() {
        for c in 0..b.cols() {
            let entry = row.iter().enumerate().map(|(k, x)| x * b.get(k, c)).sum();
            data.push(checked_finite(entry, offset)?);
        }
    }
    Matrix::from_data(a.rows(), b.cols(), data, offset)
}

/// Multiplies a matrix by a column vector.
///
/// # Errors
/// As for [`multiply`].
pub fn matrix_vector(m: &Matrix, v: &[f64], offset: usize, guard: &mut Guard) -> EvalResult<Vec<f64>> {
    if m.cols() != v.len() {
        return Err(dim_mismatch(m.rows(), m.cols(), v.len(), 1, offset));
    }
    guard.charge_elements(m.data().len(), offset)?;

    m.row_iter()
     .map(|row| checked_finite(row.iter().zip(v).map(|(x, y)| x * y).sum(), offset))
     .collect()
}

/// Multiplies a row vector by a matrix.
///
/// # Errors
/// As for [`multiply`].
pub fn vector_matrix(v: &[f64], m: &Matrix, offset: usize, guard: &mut Guard) -> EvalResult<Vec<f64>> {
    if v.len() != m.rows() {
        return Err(dim_mismatch(1, v.len(), m.rows(), m.cols(), offset));
    }
    guard.charge_elements(m.data().len(), offset)?;

    (0..m.cols()).map(|c| {
                     checked_finite(v.iter().enumerate().map(|(r, x)| x * m.get(r, c)).sum(),
                                    offset)
                 })
                 .collect()
}

fn dim_mismatch(lr: usize, lc: usize, rr: usize, rc: usize, offset: usize) -> RuntimeError {
    RuntimeError::Shape { details: format!("cannot multiply {lr}x{lc} by {rr}x{rc}"),
                          offset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::context::EvaluationContext;

    #[test]
    fn inner_dimensions_must_agree() {
        let mut guard = Guard::new(&EvaluationContext::default());
        let a = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]], 0).unwrap();
        assert!(matches!(multiply(&a, &a, 0, &mut guard), Err(RuntimeError::Shape { .. })));
    }

    #[test]
    fn row_times_column_is_one_by_one() {
        let mut guard = Guard::new(&EvaluationContext::default());
        let row = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]], 0).unwrap();
        let p = multiply(&row, &row.transpose(), 0, &mut guard).unwrap();
        assert_eq!((p.rows(), p.cols()), (1, 1));
        assert_eq!(p.get(0, 0), 14.0);
    }

    #[test]
    fn products_are_charged() {
        let ctx = EvaluationContext { node_budget: 7,
                                      ..EvaluationContext::default() };
        let mut guard = Guard::new(&ctx);
        let m = Matrix::identity(2);
        assert!(matches!(multiply(&m, &m, 0, &mut guard),
                         Err(RuntimeError::BudgetExceeded { .. })));
    }
}

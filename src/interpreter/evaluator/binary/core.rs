use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        context::EvaluationContext,
        evaluator::{
            binary::{array, comparison, matmul, power, scalar},
            core::EvalResult,
            guard::Guard,
        },
        registry::linalg::dot_product,
        value::core::Value,
    },
};

/// Evaluates a binary operation between two values.
///
/// Routes the operation by operator and operand kinds:
/// comparisons go to `compare`, `^` to `power`, products of two arrays to the
/// algebraic products, anything else involving a vector or matrix to the
/// element-wise rules and the remaining scalar cases to `arithmetic`.
///
/// # Errors
/// - `RuntimeError::TypeMismatch` for booleans in arithmetic and for
///   operations a kind does not support.
/// - `RuntimeError::Shape` for incompatible dimensions.
/// - `RuntimeError::Domain` for arrays combined with complex numbers, division
///   by zero and undefined results.
/// - `RuntimeError::Overflow` for infinite results.
/// - Guard errors, since array work is charged per element.
///
/// # Example
/// ```
/// use keycalc::{
///     EvaluationContext,
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::{binary::core::evaluate_binary, guard::Guard},
///         value::core::Value,
///     },
/// };
///
/// let ctx = EvaluationContext::default();
/// let mut guard = Guard::new(&ctx);
/// let v = Value::from(vec![1.0, 2.0]);
///
/// let r = evaluate_binary(BinaryOperator::Mul, &Value::Real(3.0), &v, 0, &ctx, &mut guard);
/// assert_eq!(r.unwrap(), Value::from(vec![3.0, 6.0]));
///
/// let r = evaluate_binary(BinaryOperator::Mul, &v, &v, 0, &ctx, &mut guard);
/// assert_eq!(r.unwrap(), Value::Real(5.0));
/// ```
pub fn evaluate_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       offset: usize,
                       ctx: &EvaluationContext,
                       guard: &mut Guard)
                       -> EvalResult<Value> {
    use BinaryOperator::{
        Add, Div, ElemDiv, ElemMul, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
        NotEqual, Pow, Sub,
    };
    use Value::{Matrix, Vector};

    if matches!(op, Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual) {
        return comparison::compare(op, left, right, offset);
    }

    for operand in [left, right] {
        if matches!(operand, Value::Boolean(_) | Value::Error(..)) {
            return Err(RuntimeError::TypeMismatch { details: format!("cannot apply {op} to a {}",
                                                                     operand.kind_name()),
                                                    offset });
        }
    }

    match op {
        Pow => power::power(left, right, offset, ctx, guard),

        Mul => match (left, right) {
            (Vector(a), Vector(b)) => {
                guard.charge_elements(a.len(), offset)?;
                Ok(Value::Real(dot_product(a, b, offset)?))
            },
            (Matrix(a), Matrix(b)) => Ok(Value::from(matmul::multiply(a, b, offset, guard)?)),
            (Matrix(m), Vector(v)) => Ok(Value::from(matmul::matrix_vector(m, v, offset, guard)?)),
            (Vector(v), Matrix(m)) => Ok(Value::from(matmul::vector_matrix(v, m, offset, guard)?)),
            _ if left.is_scalar() && right.is_scalar() => scalar::arithmetic(op, left, right, offset),
            _ => array::elementwise(op, left, right, offset, guard),
        },

        Div => match (left, right) {
            (Vector(_) | Matrix(_), r) if r.is_scalar() => {
                array::elementwise(op, left, right, offset, guard)
            },
            (l, r) if l.is_scalar() && r.is_scalar() => scalar::arithmetic(op, left, right, offset),
            _ => Err(RuntimeError::TypeMismatch { details: format!("cannot divide a {} by a {}; \
                                                                    use ./ for element-wise division",
                                                                   left.kind_name(),
                                                                   right.kind_name()),
                                                  offset }),
        },

        Add | Sub | ElemMul | ElemDiv => {
            if left.is_scalar() && right.is_scalar() {
                scalar::arithmetic(op, left, right, offset)
            } else {
                array::elementwise(op, left, right, offset, guard)
            }
        },

        Mod => scalar::remainder(left, right, offset),

        Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
            comparison::compare(op, left, right, offset)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::matrix;

    fn eval(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        let ctx = EvaluationContext::default();
        let mut guard = Guard::new(&ctx);
        evaluate_binary(op, left, right, 0, &ctx, &mut guard)
    }

    fn square(rows: Vec<Vec<f64>>) -> Value {
        Value::from(matrix::Matrix::from_rows(rows, 0).unwrap())
    }

    #[test]
    fn booleans_take_no_arithmetic() {
        let err = eval(BinaryOperator::Add, &Value::Boolean(true), &Value::Real(1.0));
        assert!(matches!(err, Err(RuntimeError::TypeMismatch { .. })));
    }

    #[test]
    fn matrix_vector_product_is_a_column() {
        let m = square(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let v = Value::from(vec![1.0, 1.0]);
        assert_eq!(eval(BinaryOperator::Mul, &m, &v), Ok(Value::from(vec![3.0, 7.0])));
        assert_eq!(eval(BinaryOperator::Mul, &v, &m), Ok(Value::from(vec![4.0, 6.0])));
    }

    #[test]
    fn scalar_cannot_be_divided_by_a_vector() {
        let v = Value::from(vec![1.0, 2.0]);
        assert!(matches!(eval(BinaryOperator::Div, &Value::Real(1.0), &v),
                         Err(RuntimeError::TypeMismatch { .. })));
        assert_eq!(eval(BinaryOperator::Div, &v, &Value::Real(2.0)),
                   Ok(Value::from(vec![0.5, 1.0])));
    }

    #[test]
    fn dot_product_needs_equal_lengths() {
        let a = Value::from(vec![1.0, 2.0]);
        let b = Value::from(vec![1.0, 2.0, 3.0]);
        assert!(matches!(eval(BinaryOperator::Mul, &a, &b), Err(RuntimeError::Shape { .. })));
    }
}

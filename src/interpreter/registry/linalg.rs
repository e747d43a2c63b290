use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        registry::core::{Invocation, pair, single},
        value::{core::Value, matrix::Matrix},
    },
    util::num::{checked_finite, f64_to_usize_checked},
};

/// Largest size `identity` will build.
pub const MAX_DIMENSION: usize = 64;

/// Dot product of two vectors of equal length.
///
/// # Errors
/// `RuntimeError::Shape` for vectors of different lengths.
pub fn dot(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (a, b) = pair(args, offset)?;
    let (a, b) = (a.as_vector(offset)?, b.as_vector(offset)?);
    invocation.charge(a.len())?;
    Ok(Value::Real(dot_product(a, b, offset)?))
}

/// Dot product of two slices, shared with `Vector * Vector`.
///
/// # Errors
/// `RuntimeError::Shape` for different lengths, `RuntimeError::Overflow` for a
/// non-finite sum.
pub fn dot_product(a: &[f64], b: &[f64], offset: usize) -> EvalResult<f64> {
    if a.len() != b.len() {
        return Err(RuntimeError::Shape { details: format!("dot product of lengths {} and {}",
                                                          a.len(),
                                                          b.len()),
                                         offset });
    }
    checked_finite(a.iter().zip(b).map(|(x, y)| x * y).sum(), offset)
}

/// Cross product of two 3-vectors.
///
/// # Example
/// ```
/// use keycalc::{Environment, EvaluationContext, evaluate_expression, interpreter::value::core::Value};
///
/// let (env, ctx) = (Environment::new(), EvaluationContext::default());
/// assert_eq!(evaluate_expression("cross([1, 0, 0], [0, 1, 0])", &env, &ctx).unwrap(),
///            Value::from(vec![0.0, 0.0, 1.0]));
/// ```
pub fn cross(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let (a, b) = pair(args, offset)?;
    match (a.as_vector(offset)?, b.as_vector(offset)?) {
        ([a1, a2, a3], [b1, b2, b3]) => {
            let product = vec![a2.mul_add(*b3, -(a3 * b2)),
                               a3.mul_add(*b1, -(a1 * b3)),
                               a1.mul_add(*b2, -(a2 * b1))];
            for x in &product {
                checked_finite(*x, offset)?;
            }
            Ok(Value::from(product))
        },
        (a, b) => Err(RuntimeError::Shape { details: format!("cross product of lengths {} and {}",
                                                             a.len(),
                                                             b.len()),
                                            offset }),
    }
}

/// Determinant of a square matrix.
pub fn det(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let m = single(args, offset)?.as_matrix(offset)?;
    invocation.charge(m.rows().pow(3))?;
    Ok(Value::Real(checked_finite(m.determinant(offset)?, offset)?))
}

/// Inverse of a square, non-singular matrix.
pub fn inv(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match single(args, offset)? {
        Value::Matrix(m) => {
            invocation.charge(m.rows().pow(3))?;
            Ok(Value::from(m.inverse(offset)?))
        },
        Value::Real(_) | Value::Complex(_) => Err(RuntimeError::TypeMismatch {
            details: "use 1/x for the reciprocal of a number".to_string(),
            offset,
        }),
        other => Err(other.mismatch("a matrix", offset)),
    }
}

/// Transpose of a matrix; a vector becomes a single column.
pub fn transpose(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    match single(args, offset)? {
        Value::Matrix(m) => {
            invocation.charge(m.data().len())?;
            Ok(Value::from(m.transpose()))
        },
        Value::Vector(v) => {
            invocation.charge(v.len())?;
            Ok(Value::from(Matrix::from_data(v.len(), 1, v.to_vec(), offset)?))
        },
        other => Err(other.mismatch("a matrix or vector", offset)),
    }
}

/// The `n × n` identity matrix.
///
/// # Errors
/// `RuntimeError::Domain` unless `n` is an integer in `1..=64`.
pub fn identity(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
    let offset = invocation.offset;
    let n = f64_to_usize_checked(single(args, offset)?.as_real(offset)?, offset)?;
    if n == 0 || n > MAX_DIMENSION {
        return Err(RuntimeError::Domain { details: format!("identity size must be 1 to {MAX_DIMENSION}"),
                                          offset });
    }
    invocation.charge(n * n)?;
    Ok(Value::from(Matrix::identity(n)))
}

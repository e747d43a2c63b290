use std::{fmt, rc::Rc};

use crate::{
    error::{ErrorKind, EvalError, RuntimeError},
    interpreter::{
        context::EvaluationContext,
        evaluator::core::EvalResult,
        formatter::format_value,
        value::{complex::ComplexNumber, matrix::Matrix},
    },
};

/// Represents a runtime value of the calculator.
///
/// Vectors and matrices are reference counted so that reading a memory slot
/// or `ans` during evaluation does not copy its entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A real number.
    Real(f64),
    /// A complex number. Never narrowed back to `Real` automatically, even
    /// when the imaginary part is zero.
    Complex(ComplexNumber),
    /// A fixed-length vector of reals.
    Vector(Rc<Vec<f64>>),
    /// A rectangular matrix of reals.
    Matrix(Rc<Matrix>),
    /// Result of a comparison.
    Boolean(bool),
    /// A failed evaluation, kept so that the caller can store or display it.
    /// The evaluator itself never produces this variant.
    Error(ErrorKind, String),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<ComplexNumber> for Value {
    fn from(c: ComplexNumber) -> Self {
        Self::Complex(c)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::Vector(Rc::new(v))
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Self::Matrix(Rc::new(m))
    }
}

impl From<&EvalError> for Value {
    /// Captures a failure as a storable value.
    ///
    /// # Example
    /// ```
    /// use keycalc::{
    ///     error::{ErrorKind, EvalError, RuntimeError},
    ///     interpreter::value::core::Value,
    /// };
    ///
    /// let err = EvalError::from(RuntimeError::DivisionByZero { offset: 1 });
    /// assert!(matches!(Value::from(&err), Value::Error(ErrorKind::Domain, _)));
    /// ```
    fn from(err: &EvalError) -> Self {
        Self::Error(err.kind(), err.to_string())
    }
}

impl Value {
    /// Short name of the value's kind, used in error details.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Real(_) => "real",
            Self::Complex(_) => "complex",
            Self::Vector(_) => "vector",
            Self::Matrix(_) => "matrix",
            Self::Boolean(_) => "boolean",
            Self::Error(..) => "error",
        }
    }

    /// Returns `true` for `Real` and `Complex`.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Real(_) | Self::Complex(_))
    }

    /// Extracts a real number.
    ///
    /// # Errors
    /// `RuntimeError::TypeMismatch` for every other kind.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Real(2.5).as_real(0).unwrap(), 2.5);
    /// assert!(Value::Boolean(true).as_real(0).is_err());
    /// ```
    pub fn as_real(&self, offset: usize) -> EvalResult<f64> {
        match self {
            Self::Real(r) => Ok(*r),
            other => Err(other.mismatch("a real number", offset)),
        }
    }

    /// Extracts a complex number, promoting a real.
    ///
    /// # Errors
    /// `RuntimeError::TypeMismatch` for non-scalar kinds.
    pub fn as_complex(&self, offset: usize) -> EvalResult<ComplexNumber> {
        match self {
            Self::Real(r) => Ok(ComplexNumber::from(*r)),
            Self::Complex(c) => Ok(*c),
            other => Err(other.mismatch("a number", offset)),
        }
    }

    /// Borrows the entries of a vector.
    ///
    /// # Errors
    /// `RuntimeError::TypeMismatch` for every other kind.
    pub fn as_vector(&self, offset: usize) -> EvalResult<&[f64]> {
        match self {
            Self::Vector(v) => Ok(v),
            other => Err(other.mismatch("a vector", offset)),
        }
    }

    /// Borrows a matrix.
    ///
    /// # Errors
    /// `RuntimeError::TypeMismatch` for every other kind.
    pub fn as_matrix(&self, offset: usize) -> EvalResult<&Matrix> {
        match self {
            Self::Matrix(m) => Ok(m),
            other => Err(other.mismatch("a matrix", offset)),
        }
    }

    /// Builds the type error for an operation that expected `expected`.
    #[must_use]
    pub fn mismatch(&self, expected: &str, offset: usize) -> RuntimeError {
        RuntimeError::TypeMismatch { details: format!("expected {expected}, found a {}",
                                                      self.kind_name()),
                                     offset }
    }
}

impl fmt::Display for Value {
    /// Formats with the default display settings; use
    /// [`format_value`] to honour a session's precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self, &EvaluationContext::default()))
    }
}

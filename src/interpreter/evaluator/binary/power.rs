use crate::{
    error::RuntimeError,
    interpreter::{
        context::EvaluationContext,
        evaluator::{binary::matmul::multiply, core::EvalResult, guard::Guard},
        value::{complex::ComplexNumber, core::Value, matrix::Matrix},
    },
    util::num::{checked_finite, f64_to_i64_checked},
};

/// Largest integer exponent a complex base is raised to by repeated squaring;
/// larger ones go through the principal branch.
const MAX_EXACT_EXPONENT: f64 = 9_007_199_254_740_991.0;

/// Evaluates `base ^ exponent`.
///
/// - Real powers use `powf`. A negative base with a fractional exponent has
///   no real result: it is a domain error unless complex mode is on, in which
///   case the principal complex power is returned.
/// - A complex base or exponent uses the principal branch; integer exponents
///   of a complex base up to `2^53` use repeated squaring for exact small
///   powers.
/// - A square matrix raised to an integer repeats the product; a negative
///   exponent inverts the matrix first.
///
/// # Errors
/// - `RuntimeError::DivisionByZero` for `0 ^ n` with `n < 0`.
/// - `RuntimeError::Domain` for negative bases with fractional exponents in
///   real mode and for fractional matrix powers.
/// - `RuntimeError::Shape` for non-square matrices.
/// - `RuntimeError::Overflow` for infinite results.
/// - `RuntimeError::TypeMismatch` for unsupported operand kinds.
///
/// # Example
/// ```
/// use keycalc::{
///     EvaluationContext,
///     interpreter::{
///         evaluator::{binary::power::power, guard::Guard},
///         value::core::Value,
///     },
/// };
///
/// let ctx = EvaluationContext::default();
/// let mut guard = Guard::new(&ctx);
///
/// let r = power(&Value::Real(2.0), &Value::Real(10.0), 0, &ctx, &mut guard).unwrap();
/// assert_eq!(r, Value::Real(1024.0));
/// assert!(power(&Value::Real(-8.0), &Value::Real(0.5), 0, &ctx, &mut guard).is_err());
/// ```
pub fn power(base: &Value,
             exponent: &Value,
             offset: usize,
             ctx: &EvaluationContext,
             guard: &mut Guard)
             -> EvalResult<Value> {
    use Value::{Complex, Real};

    match (base, exponent) {
        (Real(b), Real(e)) => real_power(*b, *e, offset, ctx.complex_mode),
        (Complex(b), Real(e)) if e.fract() == 0.0 && e.abs() <= MAX_EXACT_EXPONENT => {
            Ok(Complex(b.checked_powi(f64_to_i64_checked(*e, offset)?, offset)?))
        },
        (Complex(_), Real(_) | Complex(_)) | (Real(_), Complex(_)) => {
            let b = base.as_complex(offset)?;
            let e = exponent.as_complex(offset)?;
            Ok(Complex(b.checked_powc(e, offset)?))
        },
        (Value::Matrix(m), Real(e)) => Ok(Value::from(matrix_power(m, *e, offset, guard)?)),
        (Value::Matrix(_), Complex(_)) => {
            Err(RuntimeError::Domain { details: "matrices hold real entries only".to_string(),
                                       offset })
        },
        _ => Err(RuntimeError::TypeMismatch { details: format!("cannot raise a {} to a {}",
                                                               base.kind_name(),
                                                               exponent.kind_name()),
                                              offset }),
    }
}

fn real_power(base: f64, exponent: f64, offset: usize, complex_mode: bool) -> EvalResult<Value> {
    if base == 0.0 && exponent < 0.0 {
        return Err(RuntimeError::DivisionByZero { offset });
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        if complex_mode {
            let z = ComplexNumber::from(base).checked_powc(ComplexNumber::from(exponent), offset)?;
            return Ok(Value::Complex(z));
        }
        return Err(RuntimeError::Domain { details: format!("{base} ^ {exponent} is not a real number"),
                                          offset });
    }
    Ok(Value::Real(checked_finite(base.powf(exponent), offset)?))
}

/// Raises a square matrix to an integer power by repeated squaring.
///
/// # Errors
/// See [`power`]; a singular matrix with a negative exponent is a domain
/// error.
pub fn matrix_power(m: &Matrix, exponent: f64, offset: usize, guard: &mut Guard) -> EvalResult<Matrix> {
    if !m.is_square() {
        return Err(RuntimeError::Shape { details: format!("cannot raise a {}x{} matrix to a power",
                                                          m.rows(),
                                                          m.cols()),
                                         offset });
    }
    let n = f64_to_i64_checked(exponent, offset)?;
    let mut base = if n < 0 {
        guard.charge_elements(m.rows().pow(3), offset)?;
        m.inverse(offset)?
    } else {
        m.clone()
    };

    let mut result = Matrix::identity(m.rows());
    let mut remaining = n.unsigned_abs();
    while remaining > 0 {
        if remaining % 2 == 1 {
            result = multiply(&result, &base, offset, guard)?;
        }
        remaining /= 2;
        if remaining > 0 {
            base = multiply(&base, &base, offset, guard)?;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pow(base: &Value, exponent: f64, complex_mode: bool) -> EvalResult<Value> {
        let ctx = EvaluationContext { complex_mode,
                                      ..EvaluationContext::default() };
        let mut guard = Guard::new(&ctx);
        power(base, &Value::Real(exponent), 0, &ctx, &mut guard)
    }

    #[test]
    fn negative_base_with_fractional_exponent() {
        assert!(matches!(pow(&Value::Real(-4.0), 0.5, false), Err(RuntimeError::Domain { .. })));
        let Ok(Value::Complex(z)) = pow(&Value::Real(-4.0), 0.5, true) else {
            panic!("expected a complex result");
        };
        assert!(z.re.abs() < 1e-12);
        assert!((z.im - 2.0).abs() < 1e-12);
    }

    #[test]
    fn negative_base_with_integer_exponent_stays_real() {
        assert_eq!(pow(&Value::Real(-2.0), 3.0, false), Ok(Value::Real(-8.0)));
    }

    #[test]
    fn zero_to_negative_power() {
        assert_eq!(pow(&Value::Real(0.0), -1.0, false),
                   Err(RuntimeError::DivisionByZero { offset: 0 }));
    }

    #[test]
    fn huge_powers_overflow() {
        assert_eq!(pow(&Value::Real(10.0), 400.0, false), Err(RuntimeError::Overflow { offset: 0 }));
    }

    #[test]
    fn complex_base_with_huge_integer_exponent() {
        let i = Value::Complex(ComplexNumber::new(0.0, 1.0));
        let Ok(Value::Complex(z)) = pow(&i, 1e20, false) else {
            panic!("expected a complex result");
        };
        assert!((z.abs() - 1.0).abs() < 1e-9);

        let two_i = Value::Complex(ComplexNumber::new(0.0, 2.0));
        assert_eq!(pow(&two_i, 1e20, false), Err(RuntimeError::Overflow { offset: 0 }));
        assert!(matches!(pow(&i, 4.0, false), Ok(Value::Complex(z)) if z.re == 1.0 && z.im == 0.0));
    }

    #[test]
    fn matrix_powers() {
        let m = Value::from(Matrix::from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]], 0).unwrap());
        let Ok(Value::Matrix(p)) = pow(&m, 5.0, false) else {
            panic!("expected a matrix");
        };
        assert_eq!(p.data(), &[1.0, 5.0, 0.0, 1.0]);

        let Ok(Value::Matrix(p)) = pow(&m, -1.0, false) else {
            panic!("expected a matrix");
        };
        assert_eq!(p.data(), &[1.0, -1.0, 0.0, 1.0]);

        let Ok(Value::Matrix(p)) = pow(&m, 0.0, false) else {
            panic!("expected a matrix");
        };
        assert_eq!(p.data(), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn fractional_matrix_power_is_rejected() {
        let m = Value::from(Matrix::identity(2));
        assert!(matches!(pow(&m, 0.5, false), Err(RuntimeError::Domain { .. })));
    }
}

use std::ops;

use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::checked_finite,
};

/// `0` as a complex number.
pub const ZERO: ComplexNumber = ComplexNumber::new(0.0, 0.0);
/// `1` as a complex number.
pub const ONE: ComplexNumber = ComplexNumber::new(1.0, 0.0);
/// The imaginary unit.
pub const I: ComplexNumber = ComplexNumber::new(0.0, 1.0);

/// Represents a complex number with real and imaginary parts.
#[derive(Debug, Clone, Copy)]
pub struct ComplexNumber {
    /// The real part of the number.
    pub re: f64,
    /// The imaginary part of the number.
    pub im: f64,
}

impl ComplexNumber {
    /// Constructs a new complex number from real and imaginary components.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(5.0, -1.0);
    /// assert_eq!(c.re, 5.0);
    /// assert_eq!(c.im, -1.0);
    /// ```
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `true` if both parts are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// Returns `true` if both parts are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    /// Validates a computed complex result the way [`checked_finite`] does
    /// for reals: NaN in either part is a domain error, an infinity is an
    /// overflow.
    ///
    /// # Errors
    /// `RuntimeError::Domain` or `RuntimeError::Overflow`.
    pub fn checked(self, offset: usize) -> EvalResult<Self> {
        Ok(Self { re: checked_finite(self.re, offset)?,
                  im: checked_finite(self.im, offset)?, })
    }

    /// Returns the absolute value (magnitude) of the complex number.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(3.0, 4.0);
    /// assert_eq!(c.abs(), 5.0);
    /// ```
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Returns the complex conjugate of the number.
    #[must_use]
    pub const fn conj(&self) -> Self {
        Self { re: self.re,
               im: -self.im, }
    }

    /// Returns the argument (phase angle) in radians, in `(-π, π]`.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(0.0, 1.0);
    /// assert!((c.arg() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Divides by `rhs`, refusing a zero divisor.
    ///
    /// # Errors
    /// - `RuntimeError::DivisionByZero` if `rhs` is `0 + 0i`.
    /// - `RuntimeError::Overflow` if the quotient is not finite.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::complex::{ComplexNumber, ZERO};
    ///
    /// let q = ComplexNumber::new(2.0, 2.0).checked_div(ComplexNumber::new(0.0, 2.0), 0)
    ///                                     .unwrap();
    /// assert_eq!(q, ComplexNumber::new(1.0, -1.0));
    /// assert!(ComplexNumber::new(1.0, 0.0).checked_div(ZERO, 0).is_err());
    /// ```
    pub fn checked_div(self, rhs: Self, offset: usize) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero { offset });
        }
        (self / rhs).checked(offset)
    }

    /// Raises the complex number to an integer power by repeated squaring.
    ///
    /// # Errors
    /// - `RuntimeError::DivisionByZero` for `0 ^ n` with `n < 0`.
    /// - `RuntimeError::Overflow` as soon as an intermediate product is not
    ///   finite.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::complex::{ComplexNumber, I};
    /// assert_eq!(I.checked_powi(2, 0).unwrap(), ComplexNumber::new(-1.0, 0.0));
    /// ```
    pub fn checked_powi(self, exp: i64, offset: usize) -> EvalResult<Self> {
        if exp == 0 {
            return Ok(ONE);
        }
        if self.is_zero() && exp < 0 {
            return Err(RuntimeError::DivisionByZero { offset });
        }

        let mut base = self;
        let mut result = ONE;
        let mut n = exp.unsigned_abs();
        while n > 0 {
            if n % 2 == 1 {
                result = (result * base).checked(offset)?;
            }
            n /= 2;
            if n > 0 {
                base = (base * base).checked(offset)?;
            }
        }

        if exp < 0 { ONE.checked_div(result, offset) } else { Ok(result) }
    }

    /// Raises the complex number to a complex power on the principal branch,
    /// `z^w = exp(w ln z)`.
    ///
    /// `0 ^ w` is `0` for a positive real part of `w` and undefined otherwise.
    ///
    /// # Errors
    /// `RuntimeError::Domain` for `0 ^ w` with `re(w) <= 0`, plus the errors
    /// of [`ComplexNumber::checked`].
    pub fn checked_powc(self, exp: Self, offset: usize) -> EvalResult<Self> {
        if self.is_zero() {
            if exp.re > 0.0 {
                return Ok(ZERO);
            }
            return Err(RuntimeError::Domain { details: "zero to a non-positive power".to_string(),
                                              offset });
        }
        (exp * self.ln()).exp().checked(offset)
    }

    /// Returns the principal square root of the complex number.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::value::complex::ComplexNumber;
    /// let s = ComplexNumber::new(-4.0, 0.0).sqrt();
    /// assert_eq!(s, ComplexNumber::new(0.0, 2.0));
    /// ```
    #[must_use]
    pub fn sqrt(self) -> Self {
        let r = self.abs();
        let re = f64::midpoint(r, self.re).sqrt();
        let im = ((r - self.re) / 2.0).sqrt().copysign(self.im);
        Self { re, im }
    }

    /// Returns the natural logarithm on the principal branch.
    #[must_use]
    pub fn ln(self) -> Self {
        Self { re: self.abs().ln(),
               im: self.arg(), }
    }

    /// Returns `e` raised to the complex number.
    #[must_use]
    pub fn exp(self) -> Self {
        let scale = self.re.exp();
        Self { re: scale * self.im.cos(),
               im: scale * self.im.sin(), }
    }

    /// Returns the sine of the complex number.
    #[must_use]
    pub fn sin(self) -> Self {
        Self { re: self.re.sin() * self.im.cosh(),
               im: self.re.cos() * self.im.sinh(), }
    }

    /// Returns the cosine of the complex number.
    #[must_use]
    pub fn cos(self) -> Self {
        Self { re: self.re.cos() * self.im.cosh(),
               im: -self.re.sin() * self.im.sinh(), }
    }

    /// Returns the hyperbolic sine of the complex number.
    #[must_use]
    pub fn sinh(self) -> Self {
        Self { re: self.re.sinh() * self.im.cos(),
               im: self.re.cosh() * self.im.sin(), }
    }

    /// Returns the hyperbolic cosine of the complex number.
    #[must_use]
    pub fn cosh(self) -> Self {
        Self { re: self.re.cosh() * self.im.cos(),
               im: self.re.sinh() * self.im.sin(), }
    }
}

impl ops::Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { re: -self.re,
               im: -self.im, }
    }
}

impl ops::Add for ComplexNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self { re: self.re + rhs.re,
               im: self.im + rhs.im, }
    }
}

impl ops::Sub for ComplexNumber {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self { re: self.re - rhs.re,
               im: self.im - rhs.im, }
    }
}

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self { re: self.re.mul_add(rhs.re, -(self.im * rhs.im)),
               im: self.re.mul_add(rhs.im, self.im * rhs.re), }
    }
}

impl ops::Div for ComplexNumber {
    type Output = Self;

    /// Unchecked quotient; a zero divisor yields NaN parts. Use
    /// [`ComplexNumber::checked_div`] on user data.
    fn div(self, rhs: Self) -> Self::Output {
        let denom = rhs.re.mul_add(rhs.re, rhs.im * rhs.im);
        Self { re: self.re.mul_add(rhs.re, self.im * rhs.im) / denom,
               im: self.im.mul_add(rhs.re, -(self.re * rhs.im)) / denom, }
    }
}

impl From<f64> for ComplexNumber {
    fn from(re: f64) -> Self {
        Self { re, im: 0.0 }
    }
}

impl PartialEq for ComplexNumber {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.re) == OrderedFloat(other.re)
        && OrderedFloat(self.im) == OrderedFloat(other.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: ComplexNumber, b: ComplexNumber) -> bool {
        (a.re - b.re).abs() < 1e-12 && (a.im - b.im).abs() < 1e-12
    }

    #[test]
    fn principal_power_of_i() {
        // i^i = e^(-π/2)
        let r = I.checked_powc(I, 0).unwrap();
        assert!(close(r, ComplexNumber::new((-std::f64::consts::FRAC_PI_2).exp(), 0.0)));
    }

    #[test]
    fn negative_integer_power_inverts() {
        let r = ComplexNumber::new(0.0, 2.0).checked_powi(-1, 0).unwrap();
        assert!(close(r, ComplexNumber::new(0.0, -0.5)));
    }

    #[test]
    fn overflowing_power_is_reported() {
        let err = ComplexNumber::new(1e200, 1e200).checked_powi(3, 7).unwrap_err();
        assert_eq!(err, RuntimeError::Overflow { offset: 7 });
    }

    #[test]
    fn zero_to_negative_power() {
        assert!(matches!(ZERO.checked_powc(ComplexNumber::new(-1.0, 0.0), 0),
                         Err(RuntimeError::Domain { .. })));
        assert_eq!(ZERO.checked_powi(-2, 3).unwrap_err(), RuntimeError::DivisionByZero { offset: 3 });
    }
}

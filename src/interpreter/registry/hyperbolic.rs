use crate::{
    interpreter::{
        evaluator::core::EvalResult,
        registry::core::{Invocation, single},
        value::{complex::ComplexNumber, core::Value},
    },
    util::num::checked_finite,
};

/// Applies a hyperbolic function with real and complex variants.
///
/// The generated rules take exactly one argument; reals use the `f64`
/// method, complex numbers the `ComplexNumber` one. Results are validated, so
/// `sinh(1000)` is an overflow rather than infinity.
macro_rules! real_complex_rule {
    ($fname:ident, $real_fn:ident, $complex_fn:expr) => {
        #[doc = concat!("`", stringify!($fname), "` of a real or complex argument.")]
        pub fn $fname(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
            let offset = invocation.offset;
            match single(args, offset)? {
                Value::Real(x) => Ok(Value::Real(checked_finite(x.$real_fn(), offset)?)),
                Value::Complex(c) => {
                    let complex_fn: fn(ComplexNumber, usize) -> EvalResult<ComplexNumber> =
                        $complex_fn;
                    Ok(Value::Complex(complex_fn(*c, offset)?))
                },
                other => Err(other.mismatch("a number", offset)),
            }
        }
    };
}

real_complex_rule!(sinh, sinh, |c, offset| c.sinh().checked(offset));
real_complex_rule!(cosh, cosh, |c, offset| c.cosh().checked(offset));
real_complex_rule!(tanh, tanh, |c, offset| c.sinh().checked_div(c.cosh(), offset));

/// Defines an inverse hyperbolic rule on reals; the domain predicate has
/// already been checked by the registry.
macro_rules! real_rule {
    ($fname:ident, $real_fn:ident) => {
        #[doc = concat!("`", stringify!($fname), "` of a real argument.")]
        pub fn $fname(args: &[Value], invocation: &mut Invocation<'_>) -> EvalResult<Value> {
            let offset = invocation.offset;
            let x = single(args, offset)?.as_real(offset)?;
            Ok(Value::Real(checked_finite(x.$real_fn(), offset)?))
        }
    };
}

real_rule!(asinh, asinh);
real_rule!(acosh, acosh);
real_rule!(atanh, atanh);

/// The builtin table.
///
/// Declares every callable function once, generating the closed [`Builtin`]
/// enumeration together with a descriptor per function: name, arity range,
/// cost hint, domain predicate and evaluation rule. Nothing outside this
/// table can be called from an expression.
///
/// [`Builtin`]: core::Builtin
pub mod core;

/// Constants (`pi`, `e`, `tau`, `phi`, `i`).
pub mod constants;
/// Trigonometric functions, honouring the angle mode at the boundary.
pub mod trig;
/// Hyperbolic functions and their inverses.
pub mod hyperbolic;
/// Logarithms, `exp` and `pow`.
pub mod logarithm;
/// Square and n-th roots.
pub mod sqrt;
/// Statistics over vectors or argument lists.
pub mod stats;
/// Rounding, integer and angle-conversion helpers, plus the two-argument
/// floating-point helpers.
pub mod numeric;
/// Gamma and error functions.
pub mod special;
/// Complex number parts.
pub mod complex;
/// Vector and matrix functions.
pub mod linalg;

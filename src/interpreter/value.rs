/// Complex number support.
///
/// Defines the `ComplexNumber` type used for arithmetic with real and imaginary
/// parts, together with the principal-branch elementary functions the
/// registry needs (`sqrt`, `ln`, `exp`, trigonometric and hyperbolic
/// functions) and checked powers that report overflow instead of returning
/// infinities.
pub mod complex;
/// Dense real matrices.
///
/// Defines the row-major `Matrix` type behind `Value::Matrix`, with the
/// shape-checked constructors and the determinant / inverse routines shared
/// by the `det` and `inv` builtins and by matrix powers.
pub mod matrix;

pub mod core;

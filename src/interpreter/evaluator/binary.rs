/// Dispatch of binary operators by operand kinds.
pub mod core;

/// Arithmetic on two scalars and the remainder operator.
pub mod scalar;

/// Element-wise operations and scalar broadcasting on vectors and matrices.
pub mod array;

/// Algebraic products of matrices and vectors.
pub mod matmul;

/// Exponentiation of reals, complex numbers and square matrices.
pub mod power;

/// Ordering and equality comparisons.
pub mod comparison;

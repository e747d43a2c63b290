/// Checked numeric conversions.
///
/// Every evaluation result passes through [`num::checked_finite`], which turns
/// NaN and infinity into typed errors. The remaining helpers convert an `f64`
/// argument into a count, an exponent or an integer operand, failing on
/// fractions, negatives and values too large to represent exactly.
pub mod num;

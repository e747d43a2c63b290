/// Entry point of the parser.
///
/// Defines `ParseResult`, the nesting pre-check and the top-level `parse`
/// function that turns a token sequence into an expression tree.
pub mod core;

/// Unary, implicit-multiplication and primary expressions.
///
/// Handles prefix operators, `√`, names and calls, and grouping.
pub mod unary;

/// Binary operator precedence levels.
///
/// Implements comparison, additive, multiplicative and exponent levels.
pub mod binary;

/// Shared helpers for argument lists, bracket literals and error reporting.
pub mod utils;

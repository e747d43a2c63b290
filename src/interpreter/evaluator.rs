/// Binary operator evaluation logic.
///
/// Handles arithmetic, element-wise and algebraic products, exponentiation and
/// comparisons between two values.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements prefix negation and the no-op prefix plus.
pub mod unary;

/// Core evaluation logic.
///
/// Contains the explicit work-stack evaluator that walks an expression tree
/// post-order without host recursion.
pub mod core;

/// Resource limits of one evaluation.
///
/// Enforces the wall-clock deadline and the node budget at every node visit.
pub mod guard;

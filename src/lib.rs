//! # keycalc
//!
//! keycalc is the expression engine of a handheld scientific calculator.
//! It tokenizes, parses and evaluates one keypad line at a time with support
//! for complex numbers, vectors, matrices, statistics and memory slots.
//!
//! Every evaluation is bounded: input length is capped, nesting is checked
//! before parsing, and evaluation stops at a wall-clock deadline or after a
//! fixed number of node visits. Only the builtins of a closed registry can be
//! called.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use log::debug;

use crate::{error::ParseError, interpreter::formatter};

/// Defines the structure of parsed expressions.
///
/// This module declares the `Expr` enum and the operator enums that represent
/// an expression as a tree. The tree is built by the parser and reduced by the
/// evaluator.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing or
/// evaluating an expression, each with the byte offset where it was detected,
/// and the coarse `ErrorKind` shown on the display.
pub mod error;
/// Orchestrates lexing, parsing and evaluation.
///
/// This module ties together the lexer, the parser, the evaluator, the value
/// model, the builtin registry and the session state.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

pub use crate::{
    error::{ErrorKind, EvalError},
    interpreter::{
        context::{AngleMode, EvaluationContext, Settings},
        environment::Environment,
        value::core::Value,
    },
};

/// Evaluates one line of calculator input.
///
/// Runs the whole pipeline: the length check, lexing, parsing and bounded
/// evaluation. The environment is only read; storing the result as `ans` is
/// up to the caller, typically through [`register_variable`].
///
/// # Errors
/// - `EvalError::Parse` for input that is too long, cannot be tokenized or
///   does not parse.
/// - `EvalError::Runtime` for every failure during evaluation, including
///   timeouts and an exhausted node budget.
///
/// # Example
/// ```
/// use keycalc::{Environment, ErrorKind, EvaluationContext, Value, evaluate_expression};
///
/// let env = Environment::new();
/// let ctx = EvaluationContext::default();
///
/// assert_eq!(evaluate_expression("2 + 3 * 4", &env, &ctx).unwrap(), Value::Real(14.0));
/// assert_eq!(evaluate_expression("sqrt(-1)", &env, &ctx).unwrap_err().kind(),
///            ErrorKind::Domain);
/// ```
pub fn evaluate_expression(text: &str,
                           env: &Environment,
                           ctx: &EvaluationContext)
                           -> Result<Value, EvalError> {
    if text.len() > ctx.max_expression_length {
        return Err(ParseError::InputTooLong { length: text.len(),
                                              max:    ctx.max_expression_length, }.into());
    }
    debug!("evaluating {text:?}");

    let tokens = interpreter::lexer::tokenize(text)?;
    let tree = interpreter::parser::core::parse(&tokens)?;
    debug!("parsed {} node(s)", tree.node_count());

    let value = interpreter::evaluator::core::evaluate(&tree, env, ctx)?;
    debug!("result is a {}", value.kind_name());
    Ok(value)
}

/// Renders a value for the display according to `ctx`.
///
/// # Example
/// ```
/// use keycalc::{EvaluationContext, Value, format_value};
///
/// let ctx = EvaluationContext::default();
/// assert_eq!(format_value(&Value::Real(0.5), &ctx), "0.5");
/// assert_eq!(format_value(&Value::from(vec![1.0, 2.0]), &ctx), "[1, 2]");
/// ```
#[must_use]
pub fn format_value(value: &Value, ctx: &EvaluationContext) -> String {
    formatter::format_value(value, ctx)
}

/// Stores `value` under `name` in `env`.
///
/// # Errors
/// `EvalError::Runtime` wrapping `RuntimeError::InvalidStore` if `name` is not
/// an identifier, is the name of a builtin, or `value` is an error.
///
/// # Example
/// ```
/// use keycalc::{Environment, Value, lookup_variable, register_variable};
///
/// let mut env = Environment::new();
/// register_variable(&mut env, "M1", Value::Real(42.0)).unwrap();
/// assert_eq!(lookup_variable(&env, "M1"), Some(&Value::Real(42.0)));
/// assert!(register_variable(&mut env, "pi", Value::Real(3.0)).is_err());
/// ```
pub fn register_variable(env: &mut Environment, name: &str, value: Value) -> Result<(), EvalError> {
    env.register(name, value)?;
    debug!("stored {name}");
    Ok(())
}

/// Reads a variable from `env`.
#[must_use]
pub fn lookup_variable<'e>(env: &'e Environment, name: &str) -> Option<&'e Value> {
    env.lookup(name)
}

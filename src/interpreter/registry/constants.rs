use std::f64::consts;

use crate::interpreter::{
    evaluator::core::EvalResult,
    registry::core::Invocation,
    value::{complex, core::Value},
};

/// The golden ratio.
pub const PHI: f64 = 1.618_033_988_749_895;

/// `π`
pub fn pi(_: &[Value], _: &mut Invocation<'_>) -> EvalResult<Value> {
    Ok(Value::Real(consts::PI))
}

/// Euler's number.
pub fn e(_: &[Value], _: &mut Invocation<'_>) -> EvalResult<Value> {
    Ok(Value::Real(consts::E))
}

/// `2π`
pub fn tau(_: &[Value], _: &mut Invocation<'_>) -> EvalResult<Value> {
    Ok(Value::Real(consts::TAU))
}

/// `(1 + √5) / 2`
pub fn phi(_: &[Value], _: &mut Invocation<'_>) -> EvalResult<Value> {
    Ok(Value::Real(PHI))
}

/// The imaginary unit. Always complex, whatever the complex mode.
pub fn i(_: &[Value], _: &mut Invocation<'_>) -> EvalResult<Value> {
    Ok(Value::Complex(complex::I))
}

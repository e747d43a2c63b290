use std::collections::HashMap;

use crate::{
    error::RuntimeError,
    interpreter::{registry::core::is_builtin, value::core::Value},
};

/// Number of memory slots, named `M0` to `M9`.
pub const MEMORY_SLOTS: usize = 10;

/// Name of the variable holding the previous result.
pub const ANSWER: &str = "ans";

/// Variables visible to expressions.
///
/// Owned by the calculator session and only borrowed by an evaluation; the
/// engine reads it but never writes it. Stores happen between evaluations
/// through [`Environment::register`].
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates the power-on environment: `ans` and `M0..M9` all hold `0`.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::{environment::Environment, value::core::Value};
    ///
    /// let env = Environment::new();
    /// assert_eq!(env.lookup("ans"), Some(&Value::Real(0.0)));
    /// assert_eq!(env.lookup("M9"), Some(&Value::Real(0.0)));
    /// assert_eq!(env.lookup("x"), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut variables = HashMap::with_capacity(MEMORY_SLOTS + 1);
        variables.insert(ANSWER.to_string(), Value::Real(0.0));
        for slot in 0..MEMORY_SLOTS {
            variables.insert(format!("M{slot}"), Value::Real(0.0));
        }
        Self { variables }
    }

    /// Looks up a variable.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Stores `value` under `name`, replacing any previous value.
    ///
    /// # Errors
    /// `RuntimeError::InvalidStore` if `name` is not an identifier, names a
    /// builtin function or constant, or `value` is an `Error`.
    ///
    /// # Example
    /// ```
    /// use keycalc::interpreter::{environment::Environment, value::core::Value};
    ///
    /// let mut env = Environment::new();
    /// env.register("rate", Value::Real(0.07)).unwrap();
    /// assert_eq!(env.lookup("rate"), Some(&Value::Real(0.07)));
    ///
    /// assert!(env.register("sin", Value::Real(1.0)).is_err());
    /// assert!(env.register("2x", Value::Real(1.0)).is_err());
    /// ```
    pub fn register(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        validate_store(name, &value)?;
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    /// Names of all stored variables, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn validate_store(name: &str, value: &Value) -> Result<(), RuntimeError> {
    let refuse = |details: &str| {
        Err(RuntimeError::InvalidStore { name:    name.to_string(),
                                         details: details.to_string(), })
    };

    if !is_identifier(name) {
        return refuse("not a valid name");
    }
    if is_builtin(name) {
        return refuse("name of a builtin function");
    }
    if matches!(value, Value::Error(..)) {
        return refuse("errors cannot be stored");
    }
    Ok(())
}

/// Returns `true` if `name` matches `[a-zA-Z_][a-zA-Z0-9_]*`.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_is_the_power_on_state() {
        assert_eq!(Environment::default(), Environment::new());
        assert_eq!(Environment::default().lookup(ANSWER), Some(&Value::Real(0.0)));
    }

    #[test]
    fn error_values_are_refused() {
        let mut env = Environment::new();
        let err = env.register("M1", Value::Error(ErrorKind::Domain, String::new()))
                     .unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidStore { .. }));
        assert_eq!(env.lookup("M1"), Some(&Value::Real(0.0)));
    }

    #[test]
    fn constants_cannot_be_shadowed() {
        let mut env = Environment::new();
        assert!(env.register("pi", Value::Real(3.0)).is_err());
        assert!(env.register("i", Value::Real(3.0)).is_err());
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("_tmp1"));
        assert!(is_identifier("M0"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("π"));
    }
}

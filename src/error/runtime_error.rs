use thiserror::Error;

use crate::error::ErrorKind;

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Tried to use a variable missing from the environment.
    #[error("Error at offset {offset}: Undefined variable '{name}'.")]
    UndefinedVariable {
        /// The name of the variable.
        name:   String,
        /// Byte offset of the reference.
        offset: usize,
    },
    /// Attempted division by zero.
    #[error("Error at offset {offset}: Division by zero.")]
    DivisionByZero {
        /// Byte offset of the operator or call.
        offset: usize,
    },
    /// An argument outside the domain of the operation.
    #[error("Error at offset {offset}: Domain error: {details}.")]
    Domain {
        /// Details about the violated domain.
        details: String,
        /// Byte offset of the operator or call.
        offset:  usize,
    },
    /// An operation applied to a kind of value it is not defined for.
    #[error("Error at offset {offset}: Type error: {details}.")]
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// Byte offset of the operator or call.
        offset:  usize,
    },
    /// Incompatible vector or matrix dimensions.
    #[error("Error at offset {offset}: Shape error: {details}.")]
    Shape {
        /// Details about the shapes involved.
        details: String,
        /// Byte offset of the operator or call.
        offset:  usize,
    },
    /// Finite inputs produced an infinite result.
    #[error("Error at offset {offset}: Result is too large.")]
    Overflow {
        /// Byte offset of the operator or call.
        offset: usize,
    },
    /// A builtin received an argument count it cannot handle.
    #[error("Error at offset {offset}: '{name}' cannot take {found} argument(s).")]
    ArgumentCountMismatch {
        /// Name of the builtin.
        name:   String,
        /// Number of arguments received.
        found:  usize,
        /// Byte offset of the call.
        offset: usize,
    },
    /// The evaluation ran past its deadline.
    #[error("Error at offset {offset}: Calculation exceeded {limit_ms} ms.")]
    Timeout {
        /// Configured deadline in milliseconds.
        limit_ms: u128,
        /// Byte offset of the node being visited.
        offset:   usize,
    },
    /// The evaluation visited more nodes than allowed.
    #[error("Error at offset {offset}: Calculation exceeded its budget of {limit} steps.")]
    BudgetExceeded {
        /// Configured budget.
        limit:  u64,
        /// Byte offset of the node being visited.
        offset: usize,
    },
    /// An operator found fewer operands than it needs.
    #[error("Error at offset {offset}: Value missing.")]
    MissingValue {
        /// Byte offset of the node.
        offset: usize,
    },
    /// A store into the environment was refused.
    #[error("Cannot store into '{name}': {details}.")]
    InvalidStore {
        /// Target name.
        name:    String,
        /// Why the store was refused.
        details: String,
    },
}

impl RuntimeError {
    /// Returns the category of this error.
    ///
    /// # Example
    /// ```
    /// use keycalc::error::{ErrorKind, RuntimeError};
    ///
    /// assert_eq!(RuntimeError::DivisionByZero { offset: 1 }.kind(),
    ///            ErrorKind::Domain);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            Self::DivisionByZero { .. } | Self::Domain { .. } | Self::TypeMismatch { .. } => {
                ErrorKind::Domain
            },
            Self::Shape { .. } => ErrorKind::Shape,
            Self::Overflow { .. } => ErrorKind::Overflow,
            Self::ArgumentCountMismatch { .. } => ErrorKind::Arity,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::BudgetExceeded { .. } => ErrorKind::BudgetExceeded,
            Self::MissingValue { .. } | Self::InvalidStore { .. } => ErrorKind::Syntax,
        }
    }

    /// Byte offset where the error was detected, if it has one.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidStore { .. } => None,
            Self::UndefinedVariable { offset, .. }
            | Self::DivisionByZero { offset }
            | Self::Domain { offset, .. }
            | Self::TypeMismatch { offset, .. }
            | Self::Shape { offset, .. }
            | Self::Overflow { offset }
            | Self::ArgumentCountMismatch { offset, .. }
            | Self::Timeout { offset, .. }
            | Self::BudgetExceeded { offset, .. }
            | Self::MissingValue { offset } => Some(*offset),
        }
    }
}

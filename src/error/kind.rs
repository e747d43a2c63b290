use thiserror::Error;

use crate::error::{ParseError, RuntimeError};

/// The category of a failed evaluation.
///
/// Every [`ParseError`] and [`RuntimeError`] maps onto exactly one kind. The
/// kind is what the display shows and what gets stored alongside a
/// `Value::Error`; the detailed error keeps the offset and wording for logs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A character that belongs to no token.
    Lex,
    /// A malformed token sequence.
    Syntax,
    /// A call to a name outside the builtin table.
    UnknownFunction,
    /// A variable missing from the environment.
    UndefinedVariable,
    /// A call with an argument count outside the function's range.
    Arity,
    /// A mathematically undefined operation.
    Domain,
    /// Incompatible vector or matrix dimensions.
    Shape,
    /// Finite inputs that produced a non-finite result.
    Overflow,
    /// The wall-clock deadline elapsed.
    Timeout,
    /// The node-visit budget ran out.
    BudgetExceeded,
}

impl ErrorKind {
    /// Short message suitable for a small display.
    ///
    /// # Example
    /// ```
    /// use keycalc::error::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::Domain.message(), "Math error");
    /// ```
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Lex => "Invalid character",
            Self::Syntax => "Syntax error",
            Self::UnknownFunction => "Unknown function",
            Self::UndefinedVariable => "Undefined variable",
            Self::Arity => "Wrong argument count",
            Self::Domain => "Math error",
            Self::Shape => "Dimension error",
            Self::Overflow => "Number too large",
            Self::Timeout => "Calculation timeout",
            Self::BudgetExceeded => "Too complex",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Any failure of `evaluate_expression`.
///
/// Lexing and parsing failures arrive as [`ParseError`], everything raised
/// while reducing the tree arrives as [`RuntimeError`].
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    /// Failure before evaluation started.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Failure during evaluation.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl EvalError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(e) => e.kind(),
            Self::Runtime(e) => e.kind(),
        }
    }

    /// Byte offset in the input where the error was detected, if known.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Parse(e) => e.offset(),
            Self::Runtime(e) => e.offset(),
        }
    }
}

use thiserror::Error;

use crate::error::ErrorKind;

/// Represents all errors that can occur during lexing or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character that does not start any token.
    #[error("Error at offset {offset}: Invalid character '{fragment}'.")]
    InvalidCharacter {
        /// The offending source text.
        fragment: String,
        /// Byte offset of the character.
        offset:   usize,
    },
    /// The input is longer than the configured maximum.
    #[error("Expression is {length} bytes long, the maximum is {max}.")]
    InputTooLong {
        /// Length of the rejected input.
        length: usize,
        /// Configured maximum.
        max:    usize,
    },
    /// The input holds no tokens at all.
    #[error("Empty expression.")]
    EmptyInput,
    /// Found an unexpected token while parsing.
    #[error("Error at offset {offset}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered.
        token:  String,
        /// Byte offset of the token.
        offset: usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error at offset {offset}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// Byte offset of the end of input.
        offset: usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    #[error("Error at offset {offset}: Expected closing parenthesis ')' but none found.")]
    ExpectedClosingParen {
        /// Byte offset of the opening parenthesis.
        offset: usize,
    },
    /// A closing bracket `]` was expected but not found.
    #[error("Error at offset {offset}: Expected closing bracket ']' but none found.")]
    ExpectedClosingBracket {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// An argument or element slot between separators was left empty.
    #[error("Error at offset {offset}: Empty argument.")]
    EmptyArgument {
        /// Byte offset of the separator that follows the empty slot.
        offset: usize,
    },
    /// Two numbers written next to each other, such as `2 3`.
    #[error("Error at offset {offset}: Missing operator between numbers.")]
    AdjacentNumbers {
        /// Byte offset of the second number.
        offset: usize,
    },
    /// `=` inside an expression. Storing values is the caller's job.
    #[error("Error at offset {offset}: Assignment is not allowed inside an expression.")]
    AssignmentNotAllowed {
        /// Byte offset of the `=`.
        offset: usize,
    },
    /// Rows of a matrix literal differ in length.
    #[error("Error at offset {offset}: Matrix row has {found} entries, expected {expected}.")]
    RaggedMatrix {
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found:    usize,
        /// Byte offset of the matrix literal.
        offset:   usize,
    },
    /// Brackets or powers are nested deeper than the parser allows.
    #[error("Error at offset {offset}: Expression nested deeper than {max} levels.")]
    NestingTooDeep {
        /// Maximum permitted depth.
        max:    usize,
        /// Byte offset where the limit was crossed.
        offset: usize,
    },
    /// Called a name that is not a builtin.
    #[error("Error at offset {offset}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name:   String,
        /// Byte offset of the name.
        offset: usize,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Error at offset {offset}: '{name}' takes {expected} argument(s) but {found} were supplied.")]
    ArityMismatch {
        /// The name of the function.
        name:     String,
        /// Human readable arity, e.g. `1` or `1 to 2`.
        expected: String,
        /// Number of arguments supplied.
        found:    usize,
        /// Byte offset of the call.
        offset:   usize,
    },
    /// A numeric literal too large to be represented.
    #[error("Error at offset {offset}: Literal is too large.")]
    LiteralTooLarge {
        /// Byte offset of the literal.
        offset: usize,
    },
}

impl ParseError {
    /// Returns the category of this error.
    ///
    /// # Example
    /// ```
    /// use keycalc::error::{ErrorKind, ParseError};
    ///
    /// let err = ParseError::InvalidCharacter { fragment: "@".to_string(),
    ///                                          offset:   3, };
    /// assert_eq!(err.kind(), ErrorKind::Lex);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCharacter { .. } => ErrorKind::Lex,
            Self::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            Self::ArityMismatch { .. } => ErrorKind::Arity,
            Self::RaggedMatrix { .. } => ErrorKind::Shape,
            Self::LiteralTooLarge { .. } => ErrorKind::Overflow,
            Self::InputTooLong { .. }
            | Self::EmptyInput
            | Self::UnexpectedToken { .. }
            | Self::UnexpectedEndOfInput { .. }
            | Self::ExpectedClosingParen { .. }
            | Self::ExpectedClosingBracket { .. }
            | Self::EmptyArgument { .. }
            | Self::AdjacentNumbers { .. }
            | Self::AssignmentNotAllowed { .. }
            | Self::NestingTooDeep { .. } => ErrorKind::Syntax,
        }
    }

    /// Byte offset where the error was detected, if it has one.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::InputTooLong { .. } | Self::EmptyInput => None,
            Self::InvalidCharacter { offset, .. }
            | Self::UnexpectedToken { offset, .. }
            | Self::UnexpectedEndOfInput { offset }
            | Self::ExpectedClosingParen { offset }
            | Self::ExpectedClosingBracket { offset }
            | Self::EmptyArgument { offset }
            | Self::AdjacentNumbers { offset }
            | Self::AssignmentNotAllowed { offset }
            | Self::RaggedMatrix { offset, .. }
            | Self::NestingTooDeep { offset, .. }
            | Self::UnknownFunction { offset, .. }
            | Self::ArityMismatch { offset, .. }
            | Self::LiteralTooLarge { offset } => Some(*offset),
        }
    }
}

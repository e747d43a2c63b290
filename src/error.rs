/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of an
/// input line. Parse errors include stray characters, malformed token
/// sequences, unknown functions and wrong argument counts, all detected
/// before any computation starts.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while an expression tree is
/// being reduced: undefined variables, domain violations, shape mismatches,
/// overflow and resource-guard aborts.
pub mod runtime_error;
/// Error classification shared by every phase.
pub mod kind;

pub use kind::{ErrorKind, EvalError};
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

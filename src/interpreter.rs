/// The lexer module tokenizes calculator input.
///
/// The lexer reads the raw keypad text and produces a sequence of tokens, each
/// with its source text and byte offset. This is the first stage of
/// evaluation.
///
/// # Responsibilities
/// - Recognizes numbers, names, operators and the keypad glyphs `× ÷ π √`.
/// - Rejects any other character with its offset.
/// - Rejects number literals that do not fit an `f64`.
pub mod lexer;
/// The parser module builds the expression tree from tokens.
///
/// # Responsibilities
/// - Applies operator precedence, including implicit multiplication.
/// - Resolves call names against the builtin registry and checks arities.
/// - Bounds nesting before descending, so no input can exhaust the stack.
pub mod parser;
/// The evaluator module reduces an expression tree to a value.
///
/// The evaluator walks the tree post-order with an explicit work stack,
/// resolves variables against the environment and enforces the deadline and
/// node budget at every visit.
pub mod evaluator;
/// Runtime values: reals, complex numbers, vectors, matrices, booleans and
/// captured errors.
pub mod value;
/// The closed table of builtin functions and constants.
///
/// Nothing outside this table can be called from an expression.
pub mod registry;
/// Session settings and the per-evaluation context derived from them.
pub mod context;
/// Variables visible to expressions: `ans` and the memory slots.
pub mod environment;
/// Display formatting of values.
pub mod formatter;

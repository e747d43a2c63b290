use std::iter::Peekable;

use log::trace;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{binary::parse_comparison, utils::unexpected},
    },
};

/// Result type used by the lexer and the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest permitted nesting of brackets and exponents.
pub const MAX_NESTING: usize = 64;

/// Parses a token sequence into an expression tree.
///
/// The sequence must end with [`Token::EndOfInput`], as produced by
/// [`tokenize`](crate::interpreter::lexer::tokenize). Nesting is measured
/// before any descent, so hostile input cannot exhaust the stack. Names are
/// classified here: an identifier followed by `(` must be a builtin, a bare
/// constant name becomes a call and any other bare name a variable. No partial
/// tree is ever returned.
///
/// # Errors
/// - `ParseError::EmptyInput` when there are no tokens besides the end marker.
/// - `ParseError::NestingTooDeep` beyond [`MAX_NESTING`] levels.
/// - Every syntax error of the grammar, carrying the offending offset.
///
/// # Example
/// ```
/// use keycalc::{
///     ast::{BinaryOperator, Expr},
///     interpreter::{lexer::tokenize, parser::core::parse},
/// };
///
/// let tree = parse(&tokenize("2pi").unwrap()).unwrap();
/// assert!(matches!(tree, Expr::BinaryOp { op: BinaryOperator::Mul, .. }));
///
/// assert!(parse(&tokenize("1 +").unwrap()).is_err());
/// assert!(parse(&tokenize("x = 3").unwrap()).is_err());
/// ```
pub fn parse(tokens: &[Lexeme]) -> ParseResult<Expr> {
    match tokens.first() {
        None
        | Some(Lexeme { token: Token::EndOfInput,
                        .. }) => return Err(ParseError::EmptyInput),
        Some(_) => {},
    }
    check_nesting(tokens)?;

    let mut iter = tokens.iter().peekable();
    let expr = parse_expression(&mut iter)?;
    match iter.next() {
        Some(Lexeme { token: Token::EndOfInput,
                      .. }) => {
            trace!("parsed {} node(s)", expr.node_count());
            Ok(expr)
        },
        Some(lexeme) => Err(unexpected(lexeme)),
        None => Err(ParseError::UnexpectedEndOfInput { offset: 0 }),
    }
}

/// Parses a full expression.
///
/// This is the entry point of the descent, starting at the lowest precedence
/// level, comparison.
///
/// Grammar: `expression := comparison`
pub(crate) fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    parse_comparison(tokens)
}

/// Rejects inputs nested deeper than [`MAX_NESTING`].
///
/// Every open bracket is one level. Every `^` adds a level for as long as its
/// right operand is being parsed, because that operand is parsed by descent.
/// The operand ends at the next operator of lower precedence, separator or
/// closing bracket at the same level, so `1^1 + 1^1` never stacks.
fn check_nesting(tokens: &[Lexeme]) -> ParseResult<()> {
    // Pending exponents in each open bracket, outermost first.
    let mut levels: Vec<usize> = vec![0];
    let mut depth = 0_usize;
    let mut previous: Option<&Token> = None;

    for lexeme in tokens {
        match lexeme.token {
            Token::LParen | Token::LBracket => {
                levels.push(0);
                depth += 1;
            },
            Token::RParen | Token::RBracket if levels.len() > 1 => {
                depth -= 1 + levels.pop().unwrap_or(0);
            },
            Token::Caret => {
                if let Some(powers) = levels.last_mut() {
                    *powers += 1;
                }
                depth += 1;
            },
            _ if ends_exponent(&lexeme.token, previous) => {
                if let Some(powers) = levels.last_mut() {
                    depth -= *powers;
                    *powers = 0;
                }
            },
            _ => {},
        }
        if depth > MAX_NESTING {
            return Err(ParseError::NestingTooDeep { max:    MAX_NESTING,
                                                    offset: lexeme.offset, });
        }
        previous = Some(&lexeme.token);
    }
    Ok(())
}

/// Whether `token` closes the right operand of every pending `^` in its
/// bracket. A sign directly after an operator or an opening bracket is a
/// prefix and belongs to the operand.
fn ends_exponent(token: &Token, previous: Option<&Token>) -> bool {
    match token {
        Token::Plus | Token::Minus => {
            matches!(previous,
                     Some(Token::Number(_) | Token::Identifier(_) | Token::RParen | Token::RBracket))
        },
        Token::Star
        | Token::Slash
        | Token::DotStar
        | Token::DotSlash
        | Token::Percent
        | Token::Less
        | Token::Greater
        | Token::LessEqual
        | Token::GreaterEqual
        | Token::EqualEqual
        | Token::BangEqual
        | Token::Comma
        | Token::Semicolon => true,
        _ => false,
    }
}

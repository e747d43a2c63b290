use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::core::{ParseResult, parse_expression},
    },
};

/// Builds the error for a token that cannot appear where it was found.
///
/// `=` and the end of input get dedicated errors; everything else is reported
/// with its source text.
#[must_use]
pub fn unexpected(lexeme: &Lexeme) -> ParseError {
    match lexeme.token {
        Token::Equals => ParseError::AssignmentNotAllowed { offset: lexeme.offset },
        Token::EndOfInput => ParseError::UnexpectedEndOfInput { offset: lexeme.offset },
        Token::Number(_) => ParseError::AdjacentNumbers { offset: lexeme.offset },
        _ => ParseError::UnexpectedToken { token:  lexeme.text.clone(),
                                           offset: lexeme.offset, },
    }
}

/// Consumes the `)` matching the `(` at `open`.
///
/// # Errors
/// - `ParseError::ExpectedClosingParen` if the input ends first.
/// - The error of [`unexpected`] for any other token.
pub(in crate::interpreter::parser) fn expect_closing_paren<'a, I>(tokens: &mut Peekable<I>,
                                                                  open: usize)
                                                                  -> ParseResult<()>
    where I: Iterator<Item = &'a Lexeme>
{
    match tokens.next() {
        Some(Lexeme { token: Token::RParen,
                      .. }) => Ok(()),
        Some(Lexeme { token: Token::EndOfInput,
                      .. })
        | None => Err(ParseError::ExpectedClosingParen { offset: open }),
        Some(lexeme) => Err(unexpected(lexeme)),
    }
}

/// Parses the comma-separated arguments of a call; the `(` at `open` is
/// already consumed and the closing `)` is consumed here.
///
/// An immediately encountered `)` produces an empty list.
///
/// Grammar: `arguments := (expression ("," expression)*)? ")"`
///
/// # Errors
/// - `ParseError::EmptyArgument` for a missing argument, as in `f(1,,2)` or
///   `f(1,)`.
/// - `ParseError::ExpectedClosingParen` if the input ends before `)`.
pub(in crate::interpreter::parser) fn parse_arguments<'a, I>(tokens: &mut Peekable<I>,
                                                             open: usize)
                                                             -> ParseResult<Vec<Expr>>
    where I: Iterator<Item = &'a Lexeme>
{
    let mut arguments = Vec::new();
    if let Some(Lexeme { token: Token::RParen,
                         .. }) = tokens.peek()
    {
        tokens.next();
        return Ok(arguments);
    }

    loop {
        reject_empty_slot(tokens)?;
        arguments.push(parse_expression(tokens)?);
        match tokens.next() {
            Some(Lexeme { token: Token::Comma,
                          .. }) => {},
            Some(Lexeme { token: Token::RParen,
                          .. }) => return Ok(arguments),
            Some(Lexeme { token: Token::EndOfInput,
                          .. })
            | None => return Err(ParseError::ExpectedClosingParen { offset: open }),
            Some(lexeme) => return Err(unexpected(lexeme)),
        }
    }
}

/// Parses a vector or matrix literal; the `[` at `open` is already consumed.
///
/// Entries are separated by `,` and rows by `;`. A single row is a vector,
/// several rows a matrix whose rows must all have the same length. `[]` is the
/// empty vector.
///
/// Grammar:
/// ```text
///     rows := (row (";" row)*)? "]"
///     row  := expression ("," expression)*
/// ```
///
/// # Errors
/// - `ParseError::EmptyArgument` for an empty entry or row.
/// - `ParseError::RaggedMatrix` for rows of different lengths.
/// - `ParseError::ExpectedClosingBracket` if the input ends before `]`.
pub(in crate::interpreter::parser) fn parse_bracket_literal<'a, I>(tokens: &mut Peekable<I>,
                                                                   open: usize)
                                                                   -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    if let Some(Lexeme { token: Token::RBracket,
                         .. }) = tokens.peek()
    {
        tokens.next();
        return Ok(Expr::VectorLiteral { elements: Vec::new(),
                                        offset:   open, });
    }

    let mut rows: Vec<Vec<Expr>> = vec![Vec::new()];
    loop {
        reject_empty_slot(tokens)?;
        let entry = parse_expression(tokens)?;
        if let Some(row) = rows.last_mut() {
            row.push(entry);
        }
        match tokens.next() {
            Some(Lexeme { token: Token::Comma,
                          .. }) => {},
            Some(Lexeme { token: Token::Semicolon,
                          offset, .. }) => {
                check_row(&rows, *offset)?;
                rows.push(Vec::new());
            },
            Some(Lexeme { token: Token::RBracket,
                          offset, .. }) => {
                check_row(&rows, *offset)?;
                break;
            },
            Some(Lexeme { token: Token::EndOfInput,
                          .. })
            | None => return Err(ParseError::ExpectedClosingBracket { offset: open }),
            Some(lexeme) => return Err(unexpected(lexeme)),
        }
    }

    if rows.len() == 1 {
        let elements = rows.pop().unwrap_or_default();
        return Ok(Expr::VectorLiteral { elements,
                                        offset: open });
    }
    Ok(Expr::MatrixLiteral { rows,
                             offset: open })
}

/// Fails if the next token ends a slot that has no expression in it.
fn reject_empty_slot<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<()>
    where I: Iterator<Item = &'a Lexeme>
{
    match tokens.peek() {
        Some(Lexeme { token: Token::Comma | Token::Semicolon | Token::RParen | Token::RBracket,
                      offset,
                      .. }) => Err(ParseError::EmptyArgument { offset: *offset }),
        _ => Ok(()),
    }
}

/// Checks that the last completed row is as long as the first one.
fn check_row(rows: &[Vec<Expr>], offset: usize) -> ParseResult<()> {
    let expected = rows.first().map_or(0, Vec::len);
    let found = rows.last().map_or(0, Vec::len);
    if found != expected {
        return Err(ParseError::RaggedMatrix { expected,
                                              found,
                                              offset });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse};

    fn parse_str(input: &str) -> ParseResult<Expr> {
        parse(&tokenize(input).unwrap())
    }

    #[test]
    fn empty_arguments() {
        assert_eq!(parse_str("max(1,,2)"), Err(ParseError::EmptyArgument { offset: 6 }));
        assert_eq!(parse_str("max(1,)"), Err(ParseError::EmptyArgument { offset: 6 }));
        assert_eq!(parse_str("[1, 2;]"), Err(ParseError::EmptyArgument { offset: 6 }));
    }

    #[test]
    fn unclosed_groups() {
        assert_eq!(parse_str("(1 + 2"), Err(ParseError::ExpectedClosingParen { offset: 0 }));
        assert_eq!(parse_str("sin(30"), Err(ParseError::ExpectedClosingParen { offset: 3 }));
        assert_eq!(parse_str("[1, 2"), Err(ParseError::ExpectedClosingBracket { offset: 0 }));
    }

    #[test]
    fn bracket_literals() {
        assert!(matches!(parse_str("[]"), Ok(Expr::VectorLiteral { ref elements, .. }) if elements.is_empty()));
        assert!(matches!(parse_str("[1, 2, 3]"), Ok(Expr::VectorLiteral { ref elements, .. }) if elements.len() == 3));
        assert!(matches!(parse_str("[1, 2; 3, 4]"), Ok(Expr::MatrixLiteral { ref rows, .. }) if rows.len() == 2));
    }

    #[test]
    fn ragged_matrix() {
        assert_eq!(parse_str("[1, 2; 3]"),
                   Err(ParseError::RaggedMatrix { expected: 2,
                                                  found:    1,
                                                  offset:   8, }));
    }

    #[test]
    fn assignment_inside_group() {
        assert_eq!(parse_str("(x = 1)"), Err(ParseError::AssignmentNotAllowed { offset: 3 }));
    }
}

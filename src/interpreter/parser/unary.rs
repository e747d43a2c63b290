use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            binary::parse_power,
            core::{ParseResult, parse_expression},
            utils::{expect_closing_paren, parse_arguments, parse_bracket_literal, unexpected},
        },
        registry::core::{Builtin, lookup},
        value::core::Value,
    },
};

/// Parses a unary expression.
///
/// Supports the prefix operators `-` (negation) and `+`. Chains such as
/// `--x` are collected in a loop and folded afterwards, so their length never
/// turns into recursion depth.
///
/// Grammar:
/// ```text
///     unary := ("-" | "+")* power
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let mut prefixes = Vec::new();
    while let Some(&lexeme) = tokens.peek() {
        let op = match lexeme.token {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => break,
        };
        prefixes.push((op, lexeme.offset));
        tokens.next();
    }

    let operand = parse_power(tokens)?;
    Ok(prefixes.into_iter().rev().fold(operand, |expr, (op, offset)| {
                                      Expr::UnaryOp { op,
                                                      expr: Box::new(expr),
                                                      offset }
                                  }))
}

/// Parses implicit multiplication.
///
/// A factor directly followed by a name, `(`, `[` or `√` is multiplied by it:
/// `2pi`, `2(3 + 4)`, `(1)(2)` and `3√4`. The synthesized product carries the
/// offset of the right factor. A number directly after a factor is an error,
/// since `2 3` has no sensible reading.
///
/// Grammar:
/// ```text
///     implicit := factor (factor_start factor)*
/// ```
///
/// # Errors
/// `ParseError::AdjacentNumbers` for a number following a factor.
pub(crate) fn parse_implicit<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let mut left = parse_factor(tokens)?;
    while let Some(&lexeme) = tokens.peek() {
        match lexeme.token {
            Token::Identifier(_) | Token::LParen | Token::LBracket | Token::Radical => {
                let right = parse_factor(tokens)?;
                left = Expr::BinaryOp { left:   Box::new(left),
                                        op:     BinaryOperator::Mul,
                                        right:  Box::new(right),
                                        offset: lexeme.offset, };
            },
            Token::Number(_) => {
                return Err(ParseError::AdjacentNumbers { offset: lexeme.offset });
            },
            _ => break,
        }
    }
    Ok(left)
}

/// Parses a factor: a primary expression under any number of `√` prefixes.
///
/// `√` binds tighter than anything except grouping and calls, so `√4^2` is
/// `(√4)^2` and `√(4^2)` needs the parentheses. `√x` is `sqrt(x)`.
fn parse_factor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let mut radicals = Vec::new();
    while let Some(&Lexeme { token: Token::Radical,
                             offset,
                             .. }) = tokens.peek()
    {
        radicals.push(*offset);
        tokens.next();
    }

    let operand = parse_primary(tokens)?;
    Ok(radicals.into_iter().rev().fold(operand, |expr, offset| {
                                     Expr::Call { function: Builtin::Sqrt,
                                                  arguments: vec![expr],
                                                  offset }
                                 }))
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions are number literals, names, calls, parenthesized
/// expressions and vector or matrix literals.
///
/// Grammar:
/// ```text
///     primary := number
///              | identifier ( "(" arguments ")" )?
///              | "(" expression ")"
///              | "[" rows "]"
/// ```
///
/// # Errors
/// - `ParseError::UnexpectedEndOfInput` for a missing operand.
/// - `ParseError::AssignmentNotAllowed` for `=`.
/// - `ParseError::UnexpectedToken` for any other token.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let lexeme = tokens.next()
                       .ok_or(ParseError::UnexpectedEndOfInput { offset: 0 })?;

    match &lexeme.token {
        Token::Number(n) => Ok(Expr::Literal { value:  Value::Real(*n),
                                               offset: lexeme.offset, }),
        Token::Identifier(name) => parse_name(tokens, name, lexeme.offset),
        Token::LParen => parse_grouping(tokens, lexeme.offset),
        Token::LBracket => parse_bracket_literal(tokens, lexeme.offset),
        _ => Err(unexpected(lexeme)),
    }
}

/// Classifies a name.
///
/// A name followed by `(` is a call and must name a builtin whose arity admits
/// the argument count. A bare constant name such as `pi` is a call with no
/// arguments. Every other bare name is a variable, resolved only at
/// evaluation time.
///
/// # Errors
/// - `ParseError::UnknownFunction` for a call of an unknown name.
/// - `ParseError::ArityMismatch` for a wrong argument count.
fn parse_name<'a, I>(tokens: &mut Peekable<I>, name: &str, offset: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    if let Some(&Lexeme { token: Token::LParen,
                          offset: open,
                          .. }) = tokens.peek()
    {
        let open = *open;
        let descriptor = lookup(name, offset)?;
        tokens.next();
        let arguments = parse_arguments(tokens, open)?;
        if !descriptor.accepts(arguments.len()) {
            return Err(ParseError::ArityMismatch { name: name.to_string(),
                                                   expected: descriptor.arity_text(),
                                                   found: arguments.len(),
                                                   offset });
        }
        return Ok(Expr::Call { function: descriptor.builtin,
                               arguments,
                               offset });
    }

    if let Ok(descriptor) = lookup(name, offset)
       && descriptor.is_constant()
    {
        return Ok(Expr::Call { function: descriptor.builtin,
                               arguments: Vec::new(),
                               offset });
    }

    Ok(Expr::Variable { name: name.to_string(),
                        offset })
}

/// Parses a parenthesized expression; the `(` is already consumed.
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>, open: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let expr = parse_expression(tokens)?;
    expect_closing_paren(tokens, open)?;
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse};

    fn parse_str(input: &str) -> ParseResult<Expr> {
        parse(&tokenize(input).unwrap())
    }

    #[test]
    fn implicit_multiplication() {
        for input in ["2pi", "2(3 + 4)", "(1)(2)", "2[1, 2]", "3√4", "2 sin(30)"] {
            let expr = parse_str(input).unwrap();
            assert!(matches!(expr, Expr::BinaryOp { op: BinaryOperator::Mul, .. }),
                    "{input} should be a product");
        }
    }

    #[test]
    fn adjacent_numbers() {
        assert_eq!(parse_str("2 3"), Err(ParseError::AdjacentNumbers { offset: 2 }));
    }

    #[test]
    fn constants_need_no_parentheses() {
        let bare = parse_str("pi").unwrap();
        let called = parse_str("pi()").unwrap();
        assert!(matches!(bare, Expr::Call { function: Builtin::Pi, .. }));
        assert!(matches!(called, Expr::Call { function: Builtin::Pi, .. }));
    }

    #[test]
    fn names_are_classified() {
        assert!(matches!(parse_str("M3").unwrap(), Expr::Variable { .. }));
        assert_eq!(parse_str("system(1)"),
                   Err(ParseError::UnknownFunction { name:   "system".to_string(),
                                                     offset: 0, }));
        assert!(matches!(parse_str("sin(1, 2)"), Err(ParseError::ArityMismatch { found: 2, .. })));
        assert!(matches!(parse_str("mean()"), Err(ParseError::ArityMismatch { found: 0, .. })));
    }

    #[test]
    fn long_unary_chains_are_folded() {
        let input = format!("{}1", "-".repeat(120));
        let tree = parse_str(&input).unwrap();
        let mut expr = &tree;
        let mut depth = 0;
        while let Expr::UnaryOp { expr: inner, .. } = expr {
            depth += 1;
            expr = inner;
        }
        assert_eq!(depth, 120);
    }

    #[test]
    fn radical_is_sqrt() {
        let expr = parse_str("√√16").unwrap();
        let Expr::Call { function: Builtin::Sqrt, arguments, .. } = &expr else {
            panic!("expected a sqrt call");
        };
        assert!(matches!(arguments[0], Expr::Call { function: Builtin::Sqrt, .. }));
    }
}

use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::ParseResult,
            unary::{parse_implicit, parse_unary},
        },
    },
};

/// Parses comparison expressions.
///
/// Handles the left-associative operators `<`, `>`, `<=`, `>=`, `==` and
/// `!=`, which bind loosest of all.
///
/// The rule is: `comparison := additive (cmp additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    parse_left_associative(tokens, parse_additive, |op| {
        matches!(op,
                 BinaryOperator::Less
                 | BinaryOperator::Greater
                 | BinaryOperator::LessEqual
                 | BinaryOperator::GreaterEqual
                 | BinaryOperator::Equal
                 | BinaryOperator::NotEqual)
    })
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    parse_left_associative(tokens, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication-level expressions.
///
/// Handles `*`, `/`, `%`, `.*` and `./`. The operands are unary expressions,
/// so `2 * -3` is accepted.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%" | ".*" | "./") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    parse_left_associative(tokens, parse_unary, |op| {
        matches!(op,
                 BinaryOperator::Mul
                 | BinaryOperator::Div
                 | BinaryOperator::Mod
                 | BinaryOperator::ElemMul
                 | BinaryOperator::ElemDiv)
    })
}

/// Parses exponentiation.
///
/// `^` is right-associative: `a ^ b ^ c` parses as `a ^ (b ^ c)`. The right
/// operand is a unary expression so that `2 ^ -1` is accepted, while the left
/// operand binds tighter than a prefix minus: `-2 ^ 2` is `-(2 ^ 2)`. The
/// depth of exponent chains is bounded before parsing starts.
///
/// The rule is: `power := implicit ("^" unary)?`
pub fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let base = parse_implicit(tokens)?;
    if let Some(Lexeme { token: Token::Caret,
                         offset,
                         .. }) = tokens.peek()
    {
        let offset = *offset;
        tokens.next();
        let exponent = parse_unary(tokens)?;
        return Ok(Expr::BinaryOp { left: Box::new(base),
                                   op: BinaryOperator::Pow,
                                   right: Box::new(exponent),
                                   offset });
    }
    Ok(base)
}

/// Folds a left-associative level of binary operators.
fn parse_left_associative<'a, I, P, F>(tokens: &mut Peekable<I>,
                                       operand: P,
                                       accepts: F)
                                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>,
          P: Fn(&mut Peekable<I>) -> ParseResult<Expr>,
          F: Fn(BinaryOperator) -> bool
{
    let mut left = operand(tokens)?;
    while let Some(&lexeme) = tokens.peek()
          && let Some(op) = token_to_binary_operator(&lexeme.token)
          && accepts(op)
    {
        let offset = lexeme.offset;
        tokens.next();
        let right = operand(tokens)?;
        left = Expr::BinaryOp { left: Box::new(left),
                                op,
                                right: Box::new(right),
                                offset };
    }
    Ok(left)
}

/// Maps a token to the binary operator it spells, if any.
///
/// # Example
/// ```
/// use keycalc::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::DotStar), Some(BinaryOperator::ElemMul));
/// assert_eq!(token_to_binary_operator(&Token::Equals), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Sub,
        Token::Star => BinaryOperator::Mul,
        Token::Slash => BinaryOperator::Div,
        Token::DotStar => BinaryOperator::ElemMul,
        Token::DotSlash => BinaryOperator::ElemDiv,
        Token::Caret => BinaryOperator::Pow,
        Token::Percent => BinaryOperator::Mod,
        Token::Less => BinaryOperator::Less,
        Token::Greater => BinaryOperator::Greater,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::core::parse};

    fn parse_str(input: &str) -> Expr {
        parse(&tokenize(input).unwrap()).unwrap()
    }

    fn top_operator(expr: &Expr) -> Option<BinaryOperator> {
        match expr {
            Expr::BinaryOp { op, .. } => Some(*op),
            _ => None,
        }
    }

    #[test]
    fn comparison_binds_loosest() {
        assert_eq!(top_operator(&parse_str("1 + 2 < 4")), Some(BinaryOperator::Less));
    }

    #[test]
    fn power_is_right_associative() {
        let expr = parse_str("2 ^ 3 ^ 2");
        let Expr::BinaryOp { left, right, .. } = &expr else {
            panic!("expected a power");
        };
        assert!(matches!(**left, Expr::Literal { .. }));
        assert_eq!(top_operator(right), Some(BinaryOperator::Pow));
    }

    #[test]
    fn minus_applies_after_power() {
        let expr = parse_str("-2 ^ 2");
        assert!(matches!(expr, Expr::UnaryOp { .. }));
    }

    #[test]
    fn operator_offsets() {
        let Expr::BinaryOp { offset, .. } = parse_str("10 .* 2") else {
            panic!("expected a binary operation");
        };
        assert_eq!(offset, 3);
    }
}

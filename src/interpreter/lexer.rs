use logos::Logos;

use crate::{error::ParseError, interpreter::parser::core::ParseResult};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens of calculator input, including
/// the glyphs printed on the keypad (`×`, `÷`, `π`, `√`).
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2.` or `2.1e-10`.
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_number)]
    Number(f64),
    /// Identifier tokens; variable, constant or function names such as `ans`,
    /// `M0` or `sin`. The keypad glyph `π` lexes as the identifier `pi`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    #[token("π", |_| "pi".to_string())]
    Identifier(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*` or `×`
    #[token("*")]
    #[token("×")]
    Star,
    /// `/` or `÷`
    #[token("/")]
    #[token("÷")]
    Slash,
    /// `.*`
    #[token(".*")]
    DotStar,
    /// `./`
    #[token("./")]
    DotSlash,
    /// `^`
    #[token("^")]
    Caret,
    /// `%`
    #[token("%")]
    Percent,
    /// `√`
    #[token("√")]
    Radical,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `;`
    #[token(";")]
    Semicolon,
    /// Whitespace, including line breaks pasted from history.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Ignored,
    /// Appended once after the last real token.
    EndOfInput,
}

/// Coarse classification of a [`Token`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A numeric literal.
    Number,
    /// A name.
    Identifier,
    /// Any arithmetic, comparison or assignment operator.
    Operator,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `[`, `]` and the row separator `;`.
    Separator,
    /// The end of the token stream.
    EndOfInput,
}

/// A token together with its source text and byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The token.
    pub token:  Token,
    /// The exact source text the token was read from.
    pub text:   String,
    /// Byte offset of the first character of the token.
    pub offset: usize,
}

impl Lexeme {
    /// Returns the coarse kind of the token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self.token {
            Token::Number(_) => TokenKind::Number,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::LParen => TokenKind::LeftParen,
            Token::RParen => TokenKind::RightParen,
            Token::Comma => TokenKind::Comma,
            Token::LBracket | Token::RBracket | Token::Semicolon => TokenKind::Separator,
            Token::EndOfInput => TokenKind::EndOfInput,
            _ => TokenKind::Operator,
        }
    }
}

/// Converts raw input into a token sequence terminated by
/// [`Token::EndOfInput`].
///
/// # Errors
/// - `InvalidCharacter` for any character that starts no token, reporting its
///   byte offset.
/// - `LiteralTooLarge` for a number that does not fit an `f64`.
///
/// # Example
/// ```
/// use keycalc::interpreter::lexer::{Token, TokenKind, tokenize};
///
/// let tokens = tokenize("2 * pi").unwrap();
/// assert_eq!(tokens.len(), 4);
/// assert_eq!(tokens[0].token, Token::Number(2.0));
/// assert_eq!(tokens[2].offset, 4);
/// assert_eq!(tokens[3].kind(), TokenKind::EndOfInput);
///
/// assert!(tokenize("2 @ 3").is_err());
/// ```
pub fn tokenize(input: &str) -> ParseResult<Vec<Lexeme>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(input);

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let Ok(token) = token else {
            return Err(ParseError::InvalidCharacter { fragment: lexer.slice().to_string(),
                                                      offset:   span.start, });
        };
        if let Token::Number(n) = token
           && n.is_infinite()
        {
            return Err(ParseError::LiteralTooLarge { offset: span.start });
        }
        tokens.push(Lexeme { token,
                             text: lexer.slice().to_string(),
                             offset: span.start });
    }

    tokens.push(Lexeme { token:  Token::EndOfInput,
                         text:   String::new(),
                         offset: input.len(), });
    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed value; literals beyond `f64::MAX` come back as
///   infinity and are rejected by [`tokenize`].
/// - `None`: If the token slice is not a valid float.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

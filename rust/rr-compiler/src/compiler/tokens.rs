use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location of a token, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Token types for the RR language.
///
/// `;` and `\n` both lex to `Newline`. Delimiters are always a single
/// character. `true` and `false` are emitted as `Ident` symbols; the
/// parser reclassifies them into boolean literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    Newline,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,

    // Literals
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),

    // Symbols
    /// Letter symbol: starts with a letter, continues letter/digit.
    Ident(String),
    /// Special symbol: maximal run of special characters.
    Special(String),

    Eof,
}

impl TokenKind {
    /// The symbol text, if this token is a symbol of either kind.
    pub fn symbol_text(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(s) | TokenKind::Special(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Newline => write!(f, "NEWLINE"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::IntLit(n) => write!(f, "{}", n),
            TokenKind::FloatLit(x) => write!(f, "{}", x),
            TokenKind::StrLit(s) => write!(f, "\"{}\"", s),
            TokenKind::Ident(s) => write!(f, "{}", s),
            TokenKind::Special(s) => write!(f, "{}", s),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

//! Character-class-driven lexer for RR source code.

use crate::compiler::tokens::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, col {col}")]
    UnknownChar { ch: char, line: usize, col: usize },
    #[error("unterminated string at line {line}, col {col}")]
    UnterminatedString { line: usize, col: usize },
    #[error("invalid number '{text}' at line {line}, col {col}")]
    InvalidNumber {
        text: String,
        line: usize,
        col: usize,
    },
}

/// The character classes. Every input character maps to exactly one
/// class; anything else is a lex error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letter,
    Digit,
    Delim,
    Whitespace,
    Newline,
    StrMarker,
    Special,
}

fn classify(c: char) -> Option<CharClass> {
    match c {
        'a'..='z' | 'A'..='Z' | '_' => Some(CharClass::Letter),
        '0'..='9' => Some(CharClass::Digit),
        '(' | ')' | '[' | ']' | '{' | '}' | '.' | ',' => Some(CharClass::Delim),
        ' ' | '\t' | '\r' => Some(CharClass::Whitespace),
        ';' | '\n' => Some(CharClass::Newline),
        '"' | '\'' => Some(CharClass::StrMarker),
        '*' | '+' | '=' | '-' | '/' | '|' | '\\' | '&' | '^' | '%' | '#' | '!' | '`' | ':' => {
            Some(CharClass::Special)
        }
        _ => None,
    }
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// A trailing newline is appended so that every statement terminates.
    pub fn new(source: &str) -> Self {
        let mut chars: Vec<char> = source.chars().collect();
        chars.push('\n');
        Self {
            source: chars,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn span_here(&self) -> Span {
        Span::new(self.line, self.col)
    }

    fn class_of_current(&self) -> Option<CharClass> {
        self.current().and_then(classify)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        while self.class_of_current() == Some(CharClass::Whitespace) {
            self.advance();
        }
        let span = self.span_here();
        let ch = match self.current() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, span)),
        };
        let class = classify(ch).ok_or(LexError::UnknownChar {
            ch,
            line: span.line,
            col: span.col,
        })?;
        match class {
            CharClass::Newline => {
                self.advance();
                Ok(Token::new(TokenKind::Newline, span))
            }
            CharClass::Delim => {
                self.advance();
                let kind = match ch {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Dot,
                };
                Ok(Token::new(kind, span))
            }
            CharClass::StrMarker => self.read_string(ch, span),
            CharClass::Digit => self.read_number(span),
            CharClass::Letter => {
                let mut text = String::new();
                while matches!(
                    self.class_of_current(),
                    Some(CharClass::Letter | CharClass::Digit)
                ) {
                    if let Some(c) = self.advance() {
                        text.push(c);
                    }
                }
                Ok(Token::new(TokenKind::Ident(text), span))
            }
            CharClass::Special => {
                let mut text = String::new();
                while self.class_of_current() == Some(CharClass::Special) {
                    if let Some(c) = self.advance() {
                        text.push(c);
                    }
                }
                Ok(Token::new(TokenKind::Special(text), span))
            }
            CharClass::Whitespace => unreachable!("whitespace skipped above"),
        }
    }

    /// Everything between matching quote characters, no escape handling.
    fn read_string(&mut self, quote: char, span: Span) -> Result<Token, LexError> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.current() {
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(Token::new(TokenKind::StrLit(text), span));
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    return Err(LexError::UnterminatedString {
                        line: span.line,
                        col: span.col,
                    })
                }
            }
        }
    }

    /// A run of digits with at most one interior `.`, which promotes the
    /// literal to a float.
    fn read_number(&mut self, span: Span) -> Result<Token, LexError> {
        let mut text = String::new();
        let mut is_float = false;
        loop {
            match self.current() {
                Some(c) if classify(c) == Some(CharClass::Digit) => {
                    text.push(c);
                    self.advance();
                }
                Some('.') if !is_float => {
                    is_float = true;
                    text.push('.');
                    self.advance();
                }
                _ => break,
            }
        }
        let invalid = |text: String| LexError::InvalidNumber {
            text,
            line: span.line,
            col: span.col,
        };
        if is_float {
            let value: f64 = text.parse().map_err(|_| invalid(text.clone()))?;
            Ok(Token::new(TokenKind::FloatLit(value), span))
        } else {
            let value: i64 = text.parse().map_err(|_| invalid(text.clone()))?;
            Ok(Token::new(TokenKind::IntLit(value), span))
        }
    }

    /// Tokenize the remaining input. The result always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

//! RR Compiler
//!
//! Transforms RR source text into an abstract syntax tree: a
//! character-class-driven lexer followed by an operator-precedence parser
//! that consults the environment's operator and function tables.

pub mod compiler;

use compiler::ast::AstNode;
use compiler::lexer::{LexError, Lexer};
use compiler::parser::{ParseError, Parser};
use compiler::tokens::Token;
use rr_core::Environment;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Tokenize `source` completely. The token stream always ends with `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Parse `source` into a top-level `Statement` node, using `env` to
/// distinguish operator symbols from function and variable names.
pub fn parse(source: &str, env: &Environment) -> Result<AstNode, FrontendError> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(tokens, env).parse()?)
}

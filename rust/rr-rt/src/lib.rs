//! RR Runtime — tree-walking evaluator and the default environment.
//!
//! Ties the frontend and the core together: `run_source` tokenizes,
//! parses, and evaluates a program against an environment, usually one
//! produced by [`default_env`].

pub mod interpreter;

use rr_compiler::compiler::lexer::LexError;
use rr_compiler::compiler::parser::ParseError;
use rr_compiler::FrontendError;
use rr_core::{Environment, RuntimeError, Value};
use thiserror::Error;

pub use interpreter::intrinsics::default_env;
pub use interpreter::{eval, eval_mut};

#[derive(Debug, Error)]
pub enum RrError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl From<FrontendError> for RrError {
    fn from(err: FrontendError) -> Self {
        match err {
            FrontendError::Lex(e) => RrError::Lex(e),
            FrontendError::Parse(e) => RrError::Parse(e),
        }
    }
}

/// Evaluate `source` as one top-level statement block against `env` and
/// return the final value.
pub fn run_source(source: &str, env: &mut Environment) -> Result<Value, RrError> {
    let ast = rr_compiler::parse(source, env)?;
    Ok(eval(&ast, env)?)
}

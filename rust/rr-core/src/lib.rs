//! RR Core
//!
//! Shared types, values, and the environment used across the compiler,
//! evaluator, and CLI.

pub mod env;
pub mod types;
pub mod values;

pub use env::{Environment, FnRecord, NativeFn, RuntimeError};
pub use types::TypeTag;
pub use values::{FnValue, Value};

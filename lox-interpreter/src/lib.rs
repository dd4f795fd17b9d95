//! Lox tree-walking interpreter
//!
//! Executes programs produced by `lox-parser` after `lox-resolver` has
//! annotated their variable references with scope distances.
//!
//! Key pieces:
//! - `Interpreter` walks statements and expressions over chained environments
//! - `Session` runs source text through parse, resolve and interpret
//! - `Value` is the dynamically typed runtime value, with objects shared by `Rc`

pub mod callable;
pub mod class;
pub mod config;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod natives;
pub mod output;
pub mod session;
pub mod value;

// Include tests directory with all test modules
#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

// Re-export public API
pub use callable::{Callable, NativeFn};
pub use class::{Class, Instance};
pub use config::{DEFAULT_MAX_CALL_DEPTH, InterpreterConfig};
pub use environment::{Environment, SharedEnvironment};
pub use error::RuntimeError;
pub use interpreter::{ControlFlow, Interpreter};
pub use lox_parser::parse_program;
pub use lox_resolver::resolve;
pub use output::{Output, OutputBuffer};
pub use session::{RunReport, Session, SessionError, Stage};
pub use value::Value;

/// Run `source` once in a fresh session that prints to stdout
pub fn run_source(source: &str, name: &str) -> RunReport {
    Session::default().run(source, name)
}

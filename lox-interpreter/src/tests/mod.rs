//! Acceptance tests for the Lox interpreter
//!
//! Every test drives source text through the full parse → resolve →
//! interpret pipeline with a session that captures `print` output.

pub mod test_acceptance_control_flow;
pub mod test_acceptance_functions;
pub mod test_repl_context_persistence;

use crate::{InterpreterConfig, RunReport, Session};

/// Fresh session with captured output
pub(crate) fn session() -> Session {
    Session::buffered(InterpreterConfig::default())
}

/// Run `source` in a fresh session and return printed lines with the report
pub(crate) fn run(source: &str) -> (Vec<String>, RunReport) {
    let mut session = session();
    let report = session.run(source, "test.lox");
    (session.printed().unwrap_or_default(), report)
}

/// Run `source` and assert it ran without errors, printing exactly `expected`
pub(crate) fn assert_prints(source: &str, expected: &[&str]) {
    let mut session = session();
    if let Err(error) = session.assert_prints(source, expected) {
        panic!("{error}");
    }
}

/// Error messages (not warnings) produced by a run
pub(crate) fn error_messages(report: &RunReport) -> Vec<String> {
    report
        .diagnostics
        .diagnostics()
        .iter()
        .filter(|d| d.severity == lox_parser::Severity::Error)
        .map(|d| d.message())
        .collect()
}

//! Interpreter session for running Lox source text
//!
//! A session owns one interpreter and drives each chunk of source through
//! the whole pipeline:
//! - parse, stopping if any syntax error was reported
//! - resolve against the globals that already exist, stopping on a static error
//! - interpret, collecting runtime errors per top-level statement
//!
//! Globals persist between runs, which is what the REPL relies on.

use crate::config::InterpreterConfig;
use crate::interpreter::Interpreter;
use crate::output::{Output, OutputBuffer};
use lox_parser::{DiagnosticCollector, parse_program};
use lox_resolver::Resolver;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Pipeline stage that refused to let a program run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Resolve,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parse => write!(f, "parse"),
            Stage::Resolve => write!(f, "resolve"),
        }
    }
}

/// Everything one run produced besides printed output
#[derive(Debug)]
pub struct RunReport {
    /// Syntax errors, static errors, warnings and runtime errors, in that order
    pub diagnostics: DiagnosticCollector,
    /// Set when the program never reached the interpreter
    pub stopped_at: Option<Stage>,
    /// Top-level statements abandoned because of a runtime error
    pub runtime_errors: usize,
}

impl RunReport {
    /// Whether any statement was executed
    pub fn executed(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn had_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Errors raised by the session's assertion helpers
#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("Program stopped at {stage}: {messages:?}")]
    Stopped { stage: Stage, messages: Vec<String> },

    #[error("Program raised {count} runtime error(s): {messages:?}")]
    Runtime { count: usize, messages: Vec<String> },

    #[error("Assertion failed: expected {expected:?}, but got {actual:?}")]
    AssertionFailed {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Session output is not captured")]
    NotCaptured,
}

pub struct Session {
    interpreter: Interpreter,
    config: InterpreterConfig,
    output: Output,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl Session {
    /// Session printing to stdout
    pub fn new(config: InterpreterConfig) -> Self {
        Self::with_output(config, Output::Stdout)
    }

    pub fn with_output(config: InterpreterConfig, output: Output) -> Self {
        Self {
            interpreter: Interpreter::with_output(config, output.clone()),
            config,
            output,
        }
    }

    /// Session whose output is captured in memory
    pub fn buffered(config: InterpreterConfig) -> Self {
        Self::with_output(config, Output::Buffer(OutputBuffer::new()))
    }

    /// Run one chunk of source text. `name` labels it in diagnostics.
    pub fn run(&mut self, source: &str, name: &str) -> RunReport {
        let mut report = RunReport {
            diagnostics: DiagnosticCollector::new(name, source),
            stopped_at: None,
            runtime_errors: 0,
        };

        let (statements, parse_errors) = parse_program(source);
        if !parse_errors.is_empty() {
            tracing::debug!(errors = parse_errors.len(), name, "parse failed");
            report.diagnostics.extend(parse_errors);
            report.stopped_at = Some(Stage::Parse);
            return report;
        }

        let outcome = Resolver::with_globals(self.interpreter.global_names()).finish(&statements);
        report.diagnostics.extend(outcome.warnings);
        if let Some(error) = outcome.error {
            tracing::debug!(line = error.line(), name, "resolution failed");
            report.diagnostics.add(error);
            report.stopped_at = Some(Stage::Resolve);
            return report;
        }

        let runtime_errors = self.interpreter.interpret(&statements);
        report.runtime_errors = runtime_errors.len();
        report.diagnostics.extend(runtime_errors);

        report
    }

    /// Drop every global and start over with the same configuration
    pub fn reset(&mut self) {
        tracing::debug!("resetting session");
        self.interpreter = Interpreter::with_output(self.config, self.output.clone());
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Lines printed so far, when output is captured
    pub fn printed(&self) -> Option<Vec<String>> {
        match &self.output {
            Output::Buffer(buffer) => Some(buffer.lines()),
            Output::Stdout => None,
        }
    }

    /// Forget captured output
    pub fn clear_output(&self) {
        if let Output::Buffer(buffer) = &self.output {
            buffer.clear();
        }
    }

    /// Run `source` and assert it ran cleanly and printed exactly `expected`
    pub fn assert_prints(&mut self, source: &str, expected: &[&str]) -> Result<(), SessionError> {
        self.clear_output();
        let report = self.run(source, "<assert>");

        if let Some(stage) = report.stopped_at {
            return Err(SessionError::Stopped {
                stage,
                messages: report.diagnostics.messages(),
            });
        }
        if report.runtime_errors > 0 {
            return Err(SessionError::Runtime {
                count: report.runtime_errors,
                messages: report.diagnostics.messages(),
            });
        }

        let actual = self.printed().ok_or(SessionError::NotCaptured)?;
        if actual != expected {
            return Err(SessionError::AssertionFailed {
                expected: expected.iter().map(|line| line.to_string()).collect(),
                actual,
            });
        }

        Ok(())
    }
}

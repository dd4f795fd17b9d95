//! Runtime error types for the Lox interpreter.
//!
//! Every error names the source line and carries the span of the token
//! that triggered it, so the diagnostics collector can point at it.

use lox_parser::Token;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Runtime errors raised while executing a statement
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("[line {line}] Runtime error: Undefined variable '{name}'")]
    #[diagnostic(
        code(lox::runtime::undefined_variable),
        help("Declare it with 'var {name}' before use")
    )]
    UndefinedVariable {
        name: String,
        line: usize,
        #[label("undefined variable")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Operand of '{operator}' must be a number, found {found}")]
    #[diagnostic(code(lox::runtime::operand_type))]
    OperandMustBeNumber {
        operator: String,
        found: &'static str,
        line: usize,
        #[label("expected a number")]
        span: SourceSpan,
    },

    #[error(
        "[line {line}] Runtime error: Operands of '{operator}' must be numbers, found {left} and {right}"
    )]
    #[diagnostic(code(lox::runtime::operand_types))]
    OperandsMustBeNumbers {
        operator: String,
        left: &'static str,
        right: &'static str,
        line: usize,
        #[label("expected two numbers")]
        span: SourceSpan,
    },

    #[error(
        "[line {line}] Runtime error: Operands of '+' must be numbers or strings, found {left} and {right}"
    )]
    #[diagnostic(
        code(lox::runtime::invalid_addition),
        help("'+' adds two numbers or concatenates when either side is a string")
    )]
    InvalidAddition {
        left: &'static str,
        right: &'static str,
        line: usize,
        #[label("cannot add these")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Division by zero")]
    #[diagnostic(
        code(lox::runtime::division_by_zero),
        help("Neither operand of '/' may be zero")
    )]
    DivisionByZero {
        line: usize,
        #[label("zero operand")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Can only call functions and classes, found {found}")]
    #[diagnostic(code(lox::runtime::not_callable))]
    NotCallable {
        found: &'static str,
        line: usize,
        #[label("not callable")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Expected {expected} arguments but got {found}")]
    #[diagnostic(
        code(lox::runtime::wrong_arity),
        help("'{callee}' takes {expected} arguments")
    )]
    WrongArity {
        callee: String,
        expected: usize,
        found: usize,
        line: usize,
        #[label("called with {found} arguments")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Undefined property '{name}'")]
    #[diagnostic(code(lox::runtime::undefined_property))]
    UndefinedProperty {
        name: String,
        line: usize,
        #[label("no such field")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Only instances have {what}, found {found}")]
    #[diagnostic(code(lox::runtime::not_an_instance))]
    NotAnInstance {
        what: &'static str,
        found: &'static str,
        line: usize,
        #[label("not an instance")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: '{name}' is a method of {class}; method access is not supported")]
    #[diagnostic(
        code(lox::runtime::unsupported_method),
        help("Instances only support fields; store a function in a field instead")
    )]
    UnsupportedMethod {
        class: String,
        name: String,
        line: usize,
        #[label("method access")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Native function '{function}' failed: {message}")]
    #[diagnostic(code(lox::runtime::native_failure))]
    NativeFailure {
        function: String,
        message: String,
        line: usize,
        #[label("native call failed")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Stack overflow (max call depth: {max_depth})")]
    #[diagnostic(
        code(lox::runtime::stack_overflow),
        help("Check for unbounded recursion, or raise the limit with --max-call-depth")
    )]
    StackOverflow {
        max_depth: usize,
        line: usize,
        #[label("call depth exceeded here")]
        span: SourceSpan,
    },

    #[error("[line {line}] Runtime error: Failed to write output: {message}")]
    #[diagnostic(code(lox::runtime::output))]
    Output {
        message: String,
        line: usize,
        #[label("while printing this")]
        span: SourceSpan,
    },
}

impl RuntimeError {
    pub fn undefined_variable(name: &Token) -> Self {
        Self::UndefinedVariable {
            name: name.lexeme.clone(),
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn operand_must_be_number(operator: &Token, found: &'static str) -> Self {
        Self::OperandMustBeNumber {
            operator: operator.lexeme.clone(),
            found,
            line: operator.line,
            span: operator.span.into(),
        }
    }

    pub fn operands_must_be_numbers(
        operator: &Token,
        left: &'static str,
        right: &'static str,
    ) -> Self {
        Self::OperandsMustBeNumbers {
            operator: operator.lexeme.clone(),
            left,
            right,
            line: operator.line,
            span: operator.span.into(),
        }
    }

    pub fn invalid_addition(operator: &Token, left: &'static str, right: &'static str) -> Self {
        Self::InvalidAddition {
            left,
            right,
            line: operator.line,
            span: operator.span.into(),
        }
    }

    pub fn division_by_zero(operator: &Token) -> Self {
        Self::DivisionByZero {
            line: operator.line,
            span: operator.span.into(),
        }
    }

    pub fn not_callable(paren: &Token, found: &'static str) -> Self {
        Self::NotCallable {
            found,
            line: paren.line,
            span: paren.span.into(),
        }
    }

    pub fn wrong_arity(callee: &str, expected: usize, found: usize, paren: &Token) -> Self {
        Self::WrongArity {
            callee: callee.to_string(),
            expected,
            found,
            line: paren.line,
            span: paren.span.into(),
        }
    }

    pub fn undefined_property(name: &Token) -> Self {
        Self::UndefinedProperty {
            name: name.lexeme.clone(),
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn not_an_instance(what: &'static str, found: &'static str, name: &Token) -> Self {
        Self::NotAnInstance {
            what,
            found,
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn unsupported_method(class: &str, name: &Token) -> Self {
        Self::UnsupportedMethod {
            class: class.to_string(),
            name: name.lexeme.clone(),
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn native_failure(function: &str, message: String, paren: &Token) -> Self {
        Self::NativeFailure {
            function: function.to_string(),
            message,
            line: paren.line,
            span: paren.span.into(),
        }
    }

    pub fn stack_overflow(max_depth: usize, paren: &Token) -> Self {
        Self::StackOverflow {
            max_depth,
            line: paren.line,
            span: paren.span.into(),
        }
    }

    pub fn output(error: std::io::Error, line: usize, span: SourceSpan) -> Self {
        Self::Output {
            message: error.to_string(),
            line,
            span,
        }
    }

    /// Source line the error was raised on
    pub fn line(&self) -> usize {
        match self {
            Self::UndefinedVariable { line, .. }
            | Self::OperandMustBeNumber { line, .. }
            | Self::OperandsMustBeNumbers { line, .. }
            | Self::InvalidAddition { line, .. }
            | Self::DivisionByZero { line, .. }
            | Self::NotCallable { line, .. }
            | Self::WrongArity { line, .. }
            | Self::UndefinedProperty { line, .. }
            | Self::NotAnInstance { line, .. }
            | Self::UnsupportedMethod { line, .. }
            | Self::NativeFailure { line, .. }
            | Self::StackOverflow { line, .. }
            | Self::Output { line, .. } => *line,
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

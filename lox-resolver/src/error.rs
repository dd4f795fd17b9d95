//! Error and warning types for the resolver
//!
//! Follows the parser's miette conventions so both stages render the same way.

use lox_parser::Token;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Static error; the first one found aborts resolution
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("[line {line}] Error at '{name}': Already a variable with this name in this scope")]
    #[diagnostic(
        code(lox::resolve::duplicate_declaration),
        help("Shadowing is allowed in a nested block, not within the same one")
    )]
    DuplicateDeclaration {
        name: String,
        line: usize,
        #[label("'{name}' declared again here")]
        span: SourceSpan,
    },

    #[error("[line {line}] Error at '{name}': Can't read variable in its own initializer")]
    #[diagnostic(code(lox::resolve::self_referential_initializer))]
    SelfReferentialInitializer {
        name: String,
        line: usize,
        #[label("'{name}' is not defined until its initializer finishes")]
        span: SourceSpan,
    },

    #[error("[line {line}] Error at 'return': Can't return from top-level code")]
    #[diagnostic(code(lox::resolve::top_level_return))]
    TopLevelReturn {
        line: usize,
        #[label("not inside a function")]
        span: SourceSpan,
    },
}

impl ResolveError {
    pub fn duplicate_declaration(name: &Token) -> Self {
        ResolveError::DuplicateDeclaration {
            name: name.lexeme.clone(),
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn self_referential_initializer(name: &Token) -> Self {
        ResolveError::SelfReferentialInitializer {
            name: name.lexeme.clone(),
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn top_level_return(keyword: &Token) -> Self {
        ResolveError::TopLevelReturn {
            line: keyword.line,
            span: keyword.span.into(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ResolveError::DuplicateDeclaration { line, .. }
            | ResolveError::SelfReferentialInitializer { line, .. }
            | ResolveError::TopLevelReturn { line, .. } => *line,
        }
    }
}

/// Non-fatal finding; never blocks execution
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ResolveWarning {
    #[error("[line {line}] Warning: unused variable '{name}'")]
    #[diagnostic(
        code(lox::resolve::unused_variable),
        severity(Warning),
        help("Remove it, or read it somewhere in its scope")
    )]
    UnusedVariable {
        name: String,
        line: usize,
        #[label("declared here but never used")]
        span: SourceSpan,
    },
}

impl ResolveWarning {
    pub fn unused_variable(name: &Token) -> Self {
        ResolveWarning::UnusedVariable {
            name: name.lexeme.clone(),
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResolveWarning::UnusedVariable { name, .. } => name,
        }
    }
}

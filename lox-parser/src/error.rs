// Lox Parser Error Handling
// Syntax errors with miette integration, one per malformed statement

use crate::lexer::LexErrorKind;
use crate::token::{Token, TokenKind};
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Upper bound on call arguments and function parameters
pub const MAX_ARGUMENTS: usize = 255;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("[line {line}] Error at {location}: {message}")]
    #[diagnostic(code(lox::parse::unexpected_token))]
    UnexpectedToken {
        message: String,
        location: String,
        line: usize,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("[line {line}] Error: {reason}")]
    #[diagnostic(
        code(lox::parse::lexical),
        help("Strings end with '\"' on the same line; decimals need a digit on both sides of '.'")
    )]
    Lexical {
        reason: LexErrorKind,
        line: usize,
        #[label("{reason}")]
        span: SourceSpan,
    },

    #[error("[line {line}] Error at '=': Invalid assignment target")]
    #[diagnostic(
        code(lox::parse::invalid_assignment_target),
        help("Only a variable or an instance field can be assigned to")
    )]
    InvalidAssignmentTarget {
        line: usize,
        #[label("cannot assign here")]
        span: SourceSpan,
    },

    #[error("[line {line}] Error at {location}: Can't have more than {limit} {what}")]
    #[diagnostic(code(lox::parse::too_many_arguments))]
    TooManyArguments {
        what: &'static str,
        limit: usize,
        location: String,
        line: usize,
        #[label("limit exceeded here")]
        span: SourceSpan,
    },

    #[error("[line {line}] Error at 'break': A break statement may only be used within a loop")]
    #[diagnostic(code(lox::parse::break_outside_loop))]
    BreakOutsideLoop {
        line: usize,
        #[label("not inside a loop")]
        span: SourceSpan,
    },

    #[error("[line {line}] Error at '{name}': Anonymous function should not have a name")]
    #[diagnostic(
        code(lox::parse::named_anonymous_function),
        help("Declare it as a statement with 'fun {name}(...)' or drop the name")
    )]
    NamedAnonymousFunction {
        name: String,
        line: usize,
        #[label("name not allowed here")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// Error located at `token` with a free-form message
    pub fn unexpected(token: &Token, message: impl Into<String>) -> Self {
        ParseError::UnexpectedToken {
            message: message.into(),
            location: location(token),
            line: token.line,
            span: token.span.into(),
        }
    }

    pub fn lexical(token: &Token, reason: LexErrorKind) -> Self {
        ParseError::Lexical {
            reason,
            line: token.line,
            span: token.span.into(),
        }
    }

    pub fn invalid_assignment_target(equals: &Token) -> Self {
        ParseError::InvalidAssignmentTarget {
            line: equals.line,
            span: equals.span.into(),
        }
    }

    pub fn too_many(what: &'static str, token: &Token) -> Self {
        ParseError::TooManyArguments {
            what,
            limit: MAX_ARGUMENTS,
            location: location(token),
            line: token.line,
            span: token.span.into(),
        }
    }

    pub fn break_outside_loop(keyword: &Token) -> Self {
        ParseError::BreakOutsideLoop {
            line: keyword.line,
            span: keyword.span.into(),
        }
    }

    pub fn named_anonymous_function(name: &Token) -> Self {
        ParseError::NamedAnonymousFunction {
            name: name.lexeme.clone(),
            line: name.line,
            span: name.span.into(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::Lexical { line, .. }
            | ParseError::InvalidAssignmentTarget { line, .. }
            | ParseError::TooManyArguments { line, .. }
            | ParseError::BreakOutsideLoop { line, .. }
            | ParseError::NamedAnonymousFunction { line, .. } => *line,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::Lexical { span, .. }
            | ParseError::InvalidAssignmentTarget { span, .. }
            | ParseError::TooManyArguments { span, .. }
            | ParseError::BreakOutsideLoop { span, .. }
            | ParseError::NamedAnonymousFunction { span, .. } => *span,
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

fn location(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}

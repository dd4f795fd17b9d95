// Lox Parser
// Recursive-descent parser pulling tokens from the lexer on demand

mod declarations;
mod expressions;
mod statements;

use crate::ast::Stmt;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{LexErrorKind, Lexer};
use crate::stack::with_stack_headroom;
use crate::token::{Token, TokenKind};

/// Parser over a single source buffer.
///
/// Errors never stop the parse: each malformed declaration is reported,
/// the parser skips to the next statement boundary and carries on, so a
/// single call to [`Parser::parse`] surfaces every independent syntax error.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
    /// Why `current` is an invalid token, when it is one
    current_lex_error: Option<LexErrorKind>,
    errors: Vec<ParseError>,
    /// Number of enclosing loops in the function being parsed
    loop_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        let current_lex_error = lexer.take_error();
        let previous = Token::synthetic(TokenKind::Invalid, "", current.line);

        Self {
            lexer,
            current,
            previous,
            current_lex_error,
            errors: Vec::new(),
            loop_depth: 0,
        }
    }

    /// Parse every declaration up to end of input
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        statements
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse one declaration, recovering at the next statement boundary on error
    fn declaration(&mut self) -> Option<Stmt> {
        match with_stack_headroom(|| self.declaration_inner()) {
            Ok(statement) => Some(statement),
            Err(error) => {
                tracing::trace!(line = error.line(), "syntax error, synchronizing");
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    /// Discard tokens until just after a `;` or just before a token that starts a statement
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous.kind == TokenKind::Semicolon || self.current.kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    /// Record an error without abandoning the current statement
    fn report(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            let next = self.lexer.next_token();
            self.current_lex_error = self.lexer.take_error();
            self.previous = std::mem::replace(&mut self.current, next);
        }
        &self.previous
    }

    fn is_at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn matches_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.matches(*kind))
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error_at_current(message))
        }
    }

    /// Error at the current token; invalid tokens report their lexical cause instead
    fn error_at_current(&self, message: &str) -> ParseError {
        match (&self.current.kind, &self.current_lex_error) {
            (TokenKind::Invalid, Some(reason)) => {
                ParseError::lexical(&self.current, reason.clone())
            }
            _ => ParseError::unexpected(&self.current, message),
        }
    }
}

/// Parse `source` into a statement list, returning every syntax error found
pub fn parse_program(source: &str) -> (Vec<Stmt>, Vec<ParseError>) {
    let mut parser = Parser::new(source);
    let statements = parser.parse();
    (statements, parser.into_errors())
}

// Lox Lexer
// Pull-based scanner turning source text into tokens one call at a time

use crate::token::{Span, Token, TokenKind};
use thiserror::Error;

/// Reason the lexer produced an `Invalid` token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Expect digit after decimal point")]
    MalformedNumber,
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),
}

/// Scanner over a borrowed source buffer.
///
/// `next_token` never fails: lexical errors are reported as an
/// [`TokenKind::Invalid`] token and the reason is kept until the consumer
/// calls [`Lexer::take_error`]. Once the input is exhausted every call
/// returns an end-of-input token.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: usize,
    had_error: bool,
    pending_error: Option<LexErrorKind>,
    emitted_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            had_error: false,
            pending_error: None,
            emitted_eof: false,
        }
    }

    /// Whether any invalid token has been produced so far
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// Reason for the most recent invalid token, if not yet taken
    pub fn take_error(&mut self) -> Option<LexErrorKind> {
        self.pending_error.take()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            self.start = self.current;

            let Some(c) = self.advance() else {
                return self.make(TokenKind::Eof);
            };

            match c {
                ' ' | '\r' | '\t' => {}
                '\n' => self.line += 1,
                '/' if self.peek() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                '/' => return self.make(TokenKind::Slash),
                '(' => return self.make(TokenKind::LeftParen),
                ')' => return self.make(TokenKind::RightParen),
                '{' => return self.make(TokenKind::LeftBrace),
                '}' => return self.make(TokenKind::RightBrace),
                ',' => return self.make(TokenKind::Comma),
                '.' => return self.make(TokenKind::Dot),
                '-' => return self.make(TokenKind::Minus),
                '+' => return self.make(TokenKind::Plus),
                ';' => return self.make(TokenKind::Semicolon),
                '*' => return self.make(TokenKind::Star),
                ':' => return self.make(TokenKind::Colon),
                '?' => return self.make(TokenKind::Question),
                '!' => return self.make_either('=', TokenKind::BangEqual, TokenKind::Bang),
                '=' => return self.make_either('=', TokenKind::EqualEqual, TokenKind::Equal),
                '<' => return self.make_either('=', TokenKind::LessEqual, TokenKind::Less),
                '>' => return self.make_either('=', TokenKind::GreaterEqual, TokenKind::Greater),
                '"' => return self.string(),
                c if c.is_ascii_digit() => return self.number(),
                c if c == '_' || c.is_ascii_alphabetic() => return self.identifier(),
                c => return self.invalid(LexErrorKind::UnexpectedCharacter(c)),
            }
        }
    }

    fn string(&mut self) -> Token {
        while self.peek().is_some_and(|c| c != '"' && c != '\n') {
            self.advance();
        }

        if self.peek() != Some('"') {
            return self.invalid(LexErrorKind::UnterminatedString);
        }

        // closing quote
        self.advance();
        self.make(TokenKind::String)
    }

    fn number(&mut self) -> Token {
        self.consume_digits();

        if self.peek() == Some('.') {
            if !self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                // swallow the dot so scanning resumes after the bad literal
                self.advance();
                return self.invalid(LexErrorKind::MalformedNumber);
            }

            self.advance();
            self.consume_digits();
        }

        self.make(TokenKind::Number)
    }

    fn identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c == '_' || c.is_ascii_alphanumeric())
        {
            self.advance();
        }

        let kind = TokenKind::keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.make(kind)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current]
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            self.lexeme(),
            self.line,
            Span::new(self.start, self.current),
        )
    }

    fn make_either(&mut self, expected: char, matched: TokenKind, otherwise: TokenKind) -> Token {
        if self.peek() == Some(expected) {
            self.advance();
            self.make(matched)
        } else {
            self.make(otherwise)
        }
    }

    fn invalid(&mut self, reason: LexErrorKind) -> Token {
        tracing::trace!(line = self.line, %reason, "lexical error");
        self.had_error = true;
        self.pending_error = Some(reason);
        self.make(TokenKind::Invalid)
    }
}

/// Yields every token up to and including the first end-of-input token
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        self.emitted_eof = token.is_eof();
        Some(token)
    }
}

/// Convenience for tests and tooling: all tokens of `source`, end-of-input included
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

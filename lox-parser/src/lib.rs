// Lox Parser Library
// Hand-written lexer and recursive-descent parser for the Lox scripting language

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod stack;
pub mod token;

pub use ast::*;
pub use diagnostics::*;
pub use error::*;
pub use lexer::{tokenize, LexErrorKind, Lexer};
pub use parser::{parse_program, Parser};
pub use stack::with_stack_headroom;
pub use token::{Span, Token, TokenKind};

#[cfg(test)]
mod tests;

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

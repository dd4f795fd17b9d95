//! Lox Resolver
//!
//! Static pass between parsing and evaluation. Binds every local variable
//! reference to the number of scopes between it and its declaration, and
//! rejects programs that are syntactically valid but statically wrong:
//! duplicate declarations in one scope, a variable read inside its own
//! initializer, and `return` outside a function. Unused locals are
//! reported as warnings.

pub mod error;
pub mod resolver;

pub use error::{ResolveError, ResolveWarning};
pub use resolver::{resolve, ResolveOutcome, Resolver, VarState};

#[cfg(test)]
mod tests;

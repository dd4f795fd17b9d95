//! Callable values: native functions and user-defined functions.

use crate::environment::SharedEnvironment;
use crate::value::Value;
use lox_parser::FunctionDecl;
use std::fmt;
use std::rc::Rc;

/// Signature of a function implemented in Rust
pub type NativeFn = fn(&[Value]) -> Result<Value, String>;

pub enum Callable {
    Native(NativeFunction),
    Function(Function),
}

pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: NativeFn,
}

/// A function declaration paired with the environment it was created in
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: SharedEnvironment,
}

impl Callable {
    pub fn native(name: &'static str, arity: usize, function: NativeFn) -> Self {
        Callable::Native(NativeFunction {
            name,
            arity,
            function,
        })
    }

    pub fn function(declaration: Rc<FunctionDecl>, closure: SharedEnvironment) -> Self {
        Callable::Function(Function {
            declaration,
            closure,
        })
    }

    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Function(function) => function.declaration.arity(),
        }
    }

    /// Name used in diagnostics; anonymous functions are `<anonymous>`
    pub fn name(&self) -> &str {
        match self {
            Callable::Native(native) => native.name,
            Callable::Function(function) => function
                .declaration
                .display_name()
                .unwrap_or("<anonymous>"),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(native) => write!(f, "<native fn {}>", native.name),
            Callable::Function(function) => match function.declaration.display_name() {
                Some(name) => write!(f, "<fn {name}>"),
                None => write!(f, "<fn>"),
            },
        }
    }
}

// The closure may contain this very function, so it is never printed
impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .finish()
    }
}

//! Runtime value representation for the Lox interpreter.
//!
//! Primitives are stored inline; callables, classes and instances are
//! shared behind `Rc` so copying a value never copies the object.

use crate::callable::Callable;
use crate::class::{Class, Instance};
use lox_parser::LiteralValue;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Runtime values in the Lox interpreter
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    /// Native or user-defined function
    Callable(Rc<Callable>),
    Class(Rc<Class>),
    Instance(Rc<RefCell<Instance>>),
}

impl Value {
    /// Name of this value's kind, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Callable(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// `nil` and `false` are falsy, everything else (including `0` and `""`) is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn string(text: impl AsRef<str>) -> Self {
        Value::String(Rc::from(text.as_ref()))
    }
}

/// Values of different kinds are never equal; objects compare by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Nil => Value::Nil,
            LiteralValue::Boolean(b) => Value::Boolean(*b),
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::String(s) => Value::string(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            // f64's Display is already the shortest round-trip form, with no `.0` on integers
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Callable(callable) => write!(f, "{callable}"),
            Value::Class(class) => write!(f, "{}", class.name),
            Value::Instance(instance) => write!(f, "{} instance", instance.borrow().class().name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::Number(1.0).type_name(), "number");
        assert_eq!(Value::from("s").type_name(), "string");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::from("").is_truthy());
    }

    #[test]
    fn test_equality_never_crosses_kinds() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Nil, Value::Boolean(false));
        assert_ne!(Value::Number(1.0), Value::from("1"));
        assert_eq!(Value::from("abc"), Value::from("abc"));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let class = Rc::new(Class::new("Point", Vec::new()));
        let same = Value::Class(Rc::clone(&class));

        assert_eq!(Value::Class(class), same);
        assert_ne!(same, Value::Class(Rc::new(Class::new("Point", Vec::new()))));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.125).to_string(), "-0.125");
        assert_eq!(Value::Number(1e21).to_string(), "1000000000000000000000");
    }

    #[test]
    fn test_display_of_primitives() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::from("raw text").to_string(), "raw text");
    }
}

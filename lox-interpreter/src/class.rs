//! Classes and their instances.
//!
//! A class is a factory: calling it allocates an instance with an empty
//! field map. Method declarations are recorded by name only; instances
//! carry fields, nothing else.

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub struct Class {
    pub name: String,
    /// Names of the methods declared in the class body
    methods: Vec<String>,
}

impl Class {
    pub fn new(name: impl Into<String>, methods: Vec<String>) -> Self {
        Self {
            name: name.into(),
            methods,
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|method| method == name)
    }

    /// Classes take no constructor arguments
    pub fn arity(&self) -> usize {
        0
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish()
    }
}

pub struct Instance {
    class: Rc<Class>,
    fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    /// Insert or overwrite a field
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

// Fields can hold the instance itself, so only names are printed
impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.fields.keys().collect();
        fields.sort();
        f.debug_struct("Instance")
            .field("class", &self.class.name)
            .field("fields", &fields)
            .finish()
    }
}

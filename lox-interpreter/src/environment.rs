//! Chained scope records.
//!
//! Each block and call gets its own environment pointing at the enclosing
//! one. Environments are shared (`Rc<RefCell<_>>`) because a closure keeps
//! its defining scope alive after the block that created it has exited.
//! The parent chain only ever points outward.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type SharedEnvironment = Rc<RefCell<Environment>>;

#[derive(Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<SharedEnvironment>,
}

impl Environment {
    /// Global scope: no enclosing environment
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(enclosing: SharedEnvironment) -> Self {
        Self {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn shared(self) -> SharedEnvironment {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this scope, replacing any previous binding
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Look `name` up here, then outward. `None` when nothing binds it.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.values.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .enclosing
                .as_ref()
                .and_then(|enclosing| enclosing.borrow().get(name)),
        }
    }

    /// Overwrite the nearest binding of `name`. Returns false when none exists.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return true;
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => false,
        }
    }

    /// Read `name` exactly `distance` scopes out, skipping the walk
    pub fn get_at(env: &SharedEnvironment, distance: usize, name: &str) -> Option<Value> {
        let scope = Self::ancestor(env, distance)?;
        scope.borrow().values.get(name).cloned()
    }

    pub fn assign_at(env: &SharedEnvironment, distance: usize, name: &str, value: Value) -> bool {
        let Some(scope) = Self::ancestor(env, distance) else {
            return false;
        };

        let mut scope = scope.borrow_mut();
        match scope.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn ancestor(env: &SharedEnvironment, distance: usize) -> Option<SharedEnvironment> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let next = current.borrow().enclosing.clone()?;
            current = next;
        }
        Some(current)
    }

    /// Names bound directly in this scope
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

// Scopes can hold closures over themselves; print names, not values
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("enclosed", &self.enclosing.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_walks_outward() {
        let globals = Environment::new().shared();
        globals.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::new_enclosed(Rc::clone(&globals));

        assert_eq!(inner.get("a"), Some(Value::Number(1.0)));
        assert_eq!(inner.get("missing"), None);
    }

    #[test]
    fn test_shadowing_and_assignment() {
        let globals = Environment::new().shared();
        globals.borrow_mut().define("a", Value::Number(1.0));
        let mut inner = Environment::new_enclosed(Rc::clone(&globals));
        inner.define("a", Value::Number(2.0));

        assert!(inner.assign("a", Value::Number(3.0)));
        assert_eq!(inner.get("a"), Some(Value::Number(3.0)));
        assert_eq!(globals.borrow().get("a"), Some(Value::Number(1.0)));
        assert!(!inner.assign("nope", Value::Nil));
    }

    #[test]
    fn test_distance_lookup_agrees_with_walk() {
        let globals = Environment::new().shared();
        globals.borrow_mut().define("x", Value::from("global"));
        let middle = Environment::new_enclosed(Rc::clone(&globals)).shared();
        middle.borrow_mut().define("y", Value::from("middle"));
        let inner = Environment::new_enclosed(Rc::clone(&middle)).shared();

        assert_eq!(Environment::get_at(&inner, 1, "y"), inner.borrow().get("y"));
        assert_eq!(Environment::get_at(&inner, 2, "x"), inner.borrow().get("x"));
        assert_eq!(Environment::get_at(&inner, 0, "y"), None);
        assert_eq!(Environment::get_at(&inner, 5, "x"), None);

        assert!(Environment::assign_at(&inner, 1, "y", Value::Nil));
        assert_eq!(middle.borrow().get("y"), Some(Value::Nil));
    }

    #[test]
    fn test_closure_keeps_scope_alive() {
        let globals = Environment::new().shared();
        let captured = {
            let block = Environment::new_enclosed(Rc::clone(&globals)).shared();
            block.borrow_mut().define("kept", Value::Boolean(true));
            Rc::clone(&block)
        };

        assert_eq!(captured.borrow().get("kept"), Some(Value::Boolean(true)));
    }
}

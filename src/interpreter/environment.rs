use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::error::EvalError;
use crate::value::{Function, NativeFunction, Value};

/// Prefix marking caller-supplied inputs.
pub const INPUT_PREFIX: char = '$';

type Scope = IndexMap<String, Value>;

/// A scope of name bindings with read-through to a parent scope.
///
/// Cloning is cheap and yields a handle onto the same bindings, which is how
/// closures capture the scope they were defined in. Writes always land in the
/// scope the handle points at; parents are never written through a child.
#[derive(Clone, Default)]
pub struct Environment {
    bindings: Rc<RefCell<Scope>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child scope used for a function call.
    pub fn with_parent(parent: &Environment) -> Self {
        Self {
            bindings: Rc::new(RefCell::new(IndexMap::new())),
            parent: Some(Rc::new(parent.clone())),
        }
    }

    /// Bind `name` in this scope, replacing any earlier binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Look a name up here, then in each enclosing scope.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
            || self.parent.as_ref().is_some_and(|parent| parent.contains(name))
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Bind a caller-supplied input. `name` may be given with or without `$`.
    pub fn bind_input(&self, name: &str, value: Value) {
        if name.starts_with(INPUT_PREFIX) {
            self.define(name, value);
        } else {
            self.define(format!("{}{}", INPUT_PREFIX, name), value);
        }
    }

    /// Register a host function callable from expressions.
    pub fn define_native<F>(&self, name: &str, func: F)
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + 'static,
    {
        let native = NativeFunction {
            name: Rc::from(name),
            func: Box::new(func),
        };
        self.define(name, Value::Function(Rc::new(Function::Native(native))));
    }

    /// Names bound directly in this scope, in definition order.
    pub fn local_names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |parent| parent.depth())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.local_names())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_define_get() {
        let env = Environment::new();
        env.define("x", Value::Number(42.0));
        assert_eq!(env.get("x"), Some(Value::Number(42.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_redefine_overwrites() {
        let env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::Number(2.0));
        assert_eq!(env.get("x"), Some(Value::Number(2.0)));
        assert_eq!(env.local_names(), vec!["x".to_string()]);
    }

    #[test]
    fn test_child_reads_through_to_parent() {
        let root = Environment::new();
        root.define("x", Value::Number(1.0));

        let child = Environment::with_parent(&root);
        assert_eq!(child.get("x"), Some(Value::Number(1.0)));
        assert!(child.contains("x"));
        assert!(!child.contains_local("x"));
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_child_writes_stay_local() {
        let root = Environment::new();
        root.define("x", Value::Number(1.0));

        let child = Environment::with_parent(&root);
        child.define("x", Value::Number(2.0));

        assert_eq!(child.get("x"), Some(Value::Number(2.0)));
        assert_eq!(root.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_later_parent_bindings_are_visible() {
        let root = Environment::new();
        let child = Environment::with_parent(&root);
        root.define("late", Value::Bool(true));
        assert_eq!(child.get("late"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_clones_share_bindings() {
        let env = Environment::new();
        let handle = env.clone();
        handle.define("shared", Value::Null);
        assert!(env.contains("shared"));
    }

    #[test]
    fn test_bind_input_adds_prefix_once() {
        let env = Environment::new();
        env.bind_input("a", Value::Number(5.0));
        env.bind_input("$b", Value::Number(7.0));
        assert!(env.contains("$a"));
        assert!(env.contains("$b"));
        assert!(!env.contains("$$b"));
    }

    #[test]
    fn test_define_native() {
        let env = Environment::new();
        env.define_native("double", |args| {
            Ok(Value::Number(args[0].to_number()? * 2.0))
        });
        let value = env.get("double").unwrap();
        let Value::Function(function) = value else {
            panic!("expected a function");
        };
        let Function::Native(native) = function.as_ref() else {
            panic!("expected a native function");
        };
        assert_eq!((native.func)(&[Value::Number(4.0)]), Ok(Value::Number(8.0)));
    }
}

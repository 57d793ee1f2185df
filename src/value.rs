use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Expression;
use crate::interpreter::{Environment, EvalError};
use crate::lexer::is_numeric_literal;
use crate::stack::ensure_sufficient_stack;

pub type Object = IndexMap<String, Value>;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    List(Rc<Vec<Value>>),
    Object(Rc<Object>),
    Function(Rc<Function>),
}

/// Structural equality: lists element-wise, objects by key set regardless of
/// order, functions by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::List(left), Value::List(right)) => ensure_sufficient_stack(|| left == right),
            (Value::Object(left), Value::Object(right)) => ensure_sufficient_stack(|| left == right),
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Value {
    pub fn string(text: &str) -> Self {
        Value::String(Rc::from(text))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn object(fields: Object) -> Self {
        Value::Object(Rc::new(fields))
    }

    pub fn as_object(&self) -> Option<&Object> {
        if let Value::Object(object) = self {
            Some(object)
        } else {
            None
        }
    }

    /// Own field of an object value.
    pub fn field(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|object| object.get(key).cloned())
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Null => false,
            _ => true,
        }
    }

    /// Numbers pass through; strings holding a numeric literal convert;
    /// anything else is a type error.
    pub fn to_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::String(text) if is_numeric_literal(text.trim()) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| EvalError::type_error(format!("cannot convert \"{}\" to a number", text))),
            Value::String(text) => Err(EvalError::type_error(format!(
                "cannot convert \"{}\" to a number",
                text
            ))),
            other => Err(EvalError::type_error(format!(
                "expected a number, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::string(text)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<Object> for Value {
    fn from(fields: Object) -> Self {
        Value::object(fields)
    }
}

/// Display used by `print`: strings bare at the top level, quoted inside
/// lists and objects.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(text) => write!(f, "{}", text),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(display_nested).collect();
                write!(f, "({})", items.join(" "))
            }
            Value::Object(object) => {
                let fields: Vec<String> = object
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, display_nested(value)))
                    .collect();
                write!(f, "{{{}}}", fields.join(", "))
            }
            Value::Function(function) => write!(f, "<function {}>", function.name()),
        }
    }
}

fn display_nested(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{}\"", text),
        _ => ensure_sufficient_stack(|| value.to_string()),
    }
}

pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, EvalError>;

/// Host function registered through [`Environment::define_native`].
pub struct NativeFunction {
    pub name: Rc<str>,
    pub func: Box<NativeFn>,
}

/// A user function together with the scope it was defined in.
pub struct Closure {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub body: Rc<Expression>,
    pub env: Environment,
}

pub enum Function {
    Native(NativeFunction),
    Closure(Closure),
}

impl Function {
    pub fn name(&self) -> &str {
        match self {
            Function::Native(native) => &native.name,
            Function::Closure(closure) => &closure.name,
        }
    }
}

// Closures hold their environment, which may hold the closure itself.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Native(native) => write!(f, "Native({})", native.name),
            Function::Closure(closure) => f
                .debug_struct("Closure")
                .field("name", &closure.name)
                .field("params", &closure.params)
                .field("body", &closure.body)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(fields: &[(&str, Value)]) -> Value {
        Value::object(fields.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::list(vec![]).is_truthy());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::Number(2.5).to_number().unwrap(), 2.5);
        assert_eq!(Value::string("42").to_number().unwrap(), 42.0);
        assert_eq!(Value::string(" -1.5 ").to_number().unwrap(), -1.5);
        assert!(Value::string("abc").to_number().is_err());
        assert!(Value::Bool(true).to_number().is_err());
        assert!(Value::Null.to_number().is_err());
        assert!(Value::list(vec![]).to_number().is_err());
    }

    #[test]
    fn test_object_equality_ignores_key_order() {
        let a = obj(&[("x", 1.0.into()), ("y", 2.0.into())]);
        let b = obj(&[("y", 2.0.into()), ("x", 1.0.into())]);
        let c = obj(&[("x", 1.0.into())]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_nested_list_equality() {
        let a = Value::list(vec![1.0.into(), Value::list(vec!["a".into()])]);
        let b = Value::list(vec![1.0.into(), Value::list(vec!["a".into()])]);
        assert_eq!(a, b);
        assert_ne!(a, Value::list(vec![1.0.into()]));
    }

    #[test]
    fn test_field() {
        let value = obj(&[("velocity", 0.8.into())]);
        assert_eq!(value.field("velocity"), Some(Value::Number(0.8)));
        assert_eq!(value.field("pitch"), None);
        assert_eq!(Value::Number(1.0).field("velocity"), None);
    }

    #[test]
    fn test_display() {
        let value = obj(&[
            ("name", "Alice".into()),
            ("tags", Value::list(vec!["a".into(), 2.0.into()])),
        ]);
        assert_eq!(value.to_string(), r#"{name: "Alice", tags: ("a" 2)}"#);
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(Value::Number(10.0).to_string(), "10");
    }

    #[test]
    fn test_deeply_nested_display_and_equality() {
        std::thread::Builder::new()
            .stack_size(8 * 1024 * 1024)
            .spawn(|| {
                let deep = |n: usize| (0..n).fold(Value::Number(1.0), |inner, _| Value::list(vec![inner]));
                let value = deep(6000);
                let text = value.to_string();
                assert!(text.starts_with("(((("));
                assert_eq!(text.len(), 1 + 2 * 6000);
                assert_eq!(value, deep(6000));
            })
            .unwrap()
            .join()
            .unwrap();
    }
}

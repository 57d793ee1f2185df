use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::lexer::is_numeric_literal;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// An irreducible literal or bare name.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Null,
    Bool(bool),
    Number(f64),
    /// A quoted string literal, quotes already stripped. Never resolved as a name.
    String(Rc<str>),
    /// A bare word: variable, function, keyword, `$` input, or a self-quoting name.
    Symbol(Rc<str>),
}

impl Atom {
    pub fn symbol(name: &str) -> Self {
        Atom::Symbol(Rc::from(name))
    }

    pub fn string(text: &str) -> Self {
        Atom::String(Rc::from(text))
    }

    /// The text of a string-like atom, quoted or not.
    pub fn as_text(&self) -> Option<&Rc<str>> {
        match self {
            Atom::String(text) | Atom::Symbol(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Atom::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// The value an atom stands for when it is not resolved as a name.
    pub fn to_value(&self) -> Value {
        match self {
            Atom::Null => Value::Null,
            Atom::Bool(b) => Value::Bool(*b),
            Atom::Number(n) => Value::Number(*n),
            Atom::String(text) | Atom::Symbol(text) => Value::String(text.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Atom(Atom),
    List(Vec<Expression>),
    Object(ObjectLiteral),
    Function(FunctionDefinition),
}

impl Expression {
    pub fn symbol(name: &str) -> Self {
        Expression::Atom(Atom::symbol(name))
    }

    pub fn number(n: f64) -> Self {
        Expression::Atom(Atom::Number(n))
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Expression::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        self.as_atom().and_then(Atom::as_symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectLiteral {
    pub spread: Option<Box<Expression>>,
    pub properties: IndexMap<Rc<str>, Expression>,
}

/// `(defun (name p1 p2) body)`. `params[0]` is the function's own name.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub params: Vec<Rc<str>>,
    pub body: Rc<Expression>,
}

impl FunctionDefinition {
    pub fn name(&self) -> &Rc<str> {
        &self.params[0]
    }

    pub fn parameters(&self) -> &[Rc<str>] {
        &self.params[1..]
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Null => write!(f, "null"),
            Atom::Bool(b) => write!(f, "{}", b),
            Atom::Number(n) => write!(f, "{}", n),
            Atom::String(text) => write!(f, "\"{}\"", text),
            Atom::Symbol(name) => write!(f, "{}", name),
        }
    }
}

fn render_key(key: &str) -> String {
    let plain = !key.is_empty()
        && !matches!(key, "true" | "false" | "null" | "...")
        && !is_numeric_literal(key)
        && !key.chars().any(|c| c.is_whitespace() || "(){}\"".contains(c));
    if plain {
        key.to_string()
    } else {
        format!("\"{}\"", key)
    }
}

fn write_spaced<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: impl IntoIterator<Item = T>) -> fmt::Result {
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Renders back to source text that parses to an equal expression.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Expression::Atom(atom) => write!(f, "{}", atom),
            Expression::List(items) => {
                write!(f, "(")?;
                write_spaced(f, items)?;
                write!(f, ")")
            }
            Expression::Object(object) => {
                write!(f, "{{")?;
                let mut parts = Vec::new();
                if let Some(spread) = &object.spread {
                    parts.push(format!("... {}", spread));
                }
                for (key, value) in &object.properties {
                    parts.push(format!("{} {}", render_key(key), value));
                }
                write_spaced(f, parts)?;
                write!(f, "}}")
            }
            Expression::Function(definition) => {
                write!(f, "(defun (")?;
                write_spaced(f, &definition.params)?;
                write!(f, ") {})", definition.body)
            }
        })
    }
}

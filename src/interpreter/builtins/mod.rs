//! Builtin operators and special forms.
//!
//! Each keyword maps to a handler receiving its operands unevaluated, so
//! special forms (`if`, `and`, `or`, `set`) decide what gets evaluated.
//! Operators are grouped by concern:
//! - **Math**: `+ - * / %` and numeric comparisons
//! - **Logic**: equality, `and`, `or`, `not`, `if`
//! - **List**: `list`, `car`/`first`, `cdr`/`rest`, `concat`, `length`
//! - **Binding**: `set`
//! - **IO**: `print`

mod binding;
mod io;
mod list;
mod logic;
mod math;

use crate::ast::Expression;
use crate::value::Value;

use super::environment::Environment;
use super::error::EvalError;
use super::evaluator::Evaluator;

pub type Builtin = fn(&mut Operands<'_>) -> Result<Value, EvalError>;

/// Every builtin keyword with its handler.
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("+", math::add),
    ("-", math::subtract),
    ("*", math::multiply),
    ("/", math::divide),
    ("%", math::remainder),
    (">", math::greater),
    ("<", math::less),
    (">=", math::greater_eq),
    ("<=", math::less_eq),
    ("==", logic::equal),
    ("!=", logic::not_equal),
    ("and", logic::and),
    ("or", logic::or),
    ("not", logic::not),
    ("if", logic::if_),
    ("list", list::list),
    ("car", list::car),
    ("first", list::car),
    ("cdr", list::cdr),
    ("rest", list::cdr),
    ("concat", list::concat),
    ("length", list::length),
    ("set", binding::set),
    ("print", io::print),
];

pub fn lookup(keyword: &str) -> Option<Builtin> {
    BUILTINS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, builtin)| *builtin)
}

/// The unevaluated operands of a builtin call.
///
/// Operand 0 may already have been evaluated by the property-access check;
/// that value is handed out instead of evaluating the expression again.
pub struct Operands<'a> {
    evaluator: &'a Evaluator,
    env: &'a Environment,
    name: &'a str,
    exprs: &'a [Expression],
    evaluated_first: Option<Value>,
}

impl<'a> Operands<'a> {
    pub fn new(
        evaluator: &'a Evaluator,
        env: &'a Environment,
        name: &'a str,
        exprs: &'a [Expression],
        evaluated_first: Option<Value>,
    ) -> Self {
        Self {
            evaluator,
            env,
            name,
            exprs,
            evaluated_first,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn expr(&self, index: usize) -> &'a Expression {
        &self.exprs[index]
    }

    pub fn env(&self) -> &'a Environment {
        self.env
    }

    pub fn evaluator(&self) -> &'a Evaluator {
        self.evaluator
    }

    pub fn eval(&mut self, index: usize) -> Result<Value, EvalError> {
        if index == 0 {
            if let Some(value) = self.evaluated_first.take() {
                return Ok(value);
            }
        }
        self.evaluator.evaluate_expression(&self.exprs[index], self.env)
    }

    pub fn eval_number(&mut self, index: usize) -> Result<f64, EvalError> {
        self.eval(index)?.to_number()
    }

    pub fn eval_all(&mut self) -> Result<Vec<Value>, EvalError> {
        (0..self.len()).map(|index| self.eval(index)).collect()
    }
}

macro_rules! require_args {
    ($ops:expr, exactly $n:expr) => {
        if $ops.len() != $n {
            return Err(EvalError::arity($ops.name(), format!("exactly {}", $n), $ops.len()));
        }
    };
    ($ops:expr, at_least $n:expr) => {
        if $ops.len() < $n {
            return Err(EvalError::arity($ops.name(), format!("at least {}", $n), $ops.len()));
        }
    };
}

macro_rules! with_list {
    ($value:expr, $name:expr, $body:expr) => {
        match &$value {
            Value::List(items) => $body(items.as_slice()),
            other => Err(EvalError::type_error(format!(
                "{} requires a list, found {}",
                $name,
                other.type_name()
            ))),
        }
    };
}

pub(crate) use require_args;
pub(crate) use with_list;

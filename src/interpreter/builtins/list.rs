//! List construction and access.

use super::super::error::EvalError;
use super::{require_args, with_list, Operands};
use crate::value::Value;

pub fn list(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    Ok(Value::list(ops.eval_all()?))
}

/// First element, or null for an empty list.
pub fn car(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 1);
    let value = ops.eval(0)?;
    with_list!(value, ops.name(), |items: &[Value]| Ok(items
        .first()
        .cloned()
        .unwrap_or(Value::Null)))
}

pub fn cdr(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 1);
    let value = ops.eval(0)?;
    with_list!(value, ops.name(), |items: &[Value]| Ok(Value::list(
        items.iter().skip(1).cloned().collect()
    )))
}

/// Splices list operands and appends everything else.
pub fn concat(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    let mut result = Vec::new();
    for value in ops.eval_all()? {
        match value {
            Value::List(items) => result.extend(items.iter().cloned()),
            other => result.push(other),
        }
    }
    Ok(Value::list(result))
}

pub fn length(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 1);
    match ops.eval(0)? {
        Value::String(text) => Ok(Value::Number(text.chars().count() as f64)),
        Value::List(items) => Ok(Value::Number(items.len() as f64)),
        other => Err(EvalError::type_error(format!(
            "length requires a string or list, found {}",
            other.type_name()
        ))),
    }
}

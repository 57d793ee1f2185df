//! Equality, boolean connectives, and `if`.

use super::super::error::EvalError;
use super::{require_args, Operands};
use crate::value::Value;

pub fn equal(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 2);
    let left = ops.eval(0)?;
    let right = ops.eval(1)?;
    Ok(Value::Bool(left == right))
}

pub fn not_equal(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 2);
    let left = ops.eval(0)?;
    let right = ops.eval(1)?;
    Ok(Value::Bool(left != right))
}

/// Stops at the first falsy operand.
pub fn and(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    for index in 0..ops.len() {
        if !ops.eval(index)?.is_truthy() {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

/// Stops at the first truthy operand.
pub fn or(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    for index in 0..ops.len() {
        if ops.eval(index)?.is_truthy() {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

pub fn not(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 1);
    Ok(Value::Bool(!ops.eval(0)?.is_truthy()))
}

/// Only the chosen branch is evaluated.
pub fn if_(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 3);
    if ops.eval(0)?.is_truthy() {
        ops.eval(1)
    } else {
        ops.eval(2)
    }
}

//! Arithmetic and numeric comparison.
//!
//! Operands are coerced with [`Value::to_number`], so numeric strings work
//! and anything else is a type error.

use super::super::error::EvalError;
use super::{require_args, Operands};
use crate::value::Value;

pub fn add(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    let mut sum = 0.0;
    for index in 0..ops.len() {
        sum += ops.eval_number(index)?;
    }
    Ok(Value::Number(sum))
}

pub fn multiply(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    let mut product = 1.0;
    for index in 0..ops.len() {
        product *= ops.eval_number(index)?;
    }
    Ok(Value::Number(product))
}

pub fn subtract(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, at_least 1);
    let first = ops.eval_number(0)?;
    if ops.len() == 1 {
        return Ok(Value::Number(-first));
    }
    let mut difference = first;
    for index in 1..ops.len() {
        difference -= ops.eval_number(index)?;
    }
    Ok(Value::Number(difference))
}

pub fn divide(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, at_least 1);
    let mut quotient = ops.eval_number(0)?;
    for index in 1..ops.len() {
        let divisor = ops.eval_number(index)?;
        if divisor == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        quotient /= divisor;
    }
    Ok(Value::Number(quotient))
}

pub fn remainder(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 2);
    let dividend = ops.eval_number(0)?;
    let divisor = ops.eval_number(1)?;
    if divisor == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Number(dividend % divisor))
}

macro_rules! comparison {
    ($name:ident, $op:tt) => {
        pub fn $name(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
            require_args!(ops, exactly 2);
            let left = ops.eval_number(0)?;
            let right = ops.eval_number(1)?;
            Ok(Value::Bool(left $op right))
        }
    };
}

comparison!(greater, >);
comparison!(less, <);
comparison!(greater_eq, >=);
comparison!(less_eq, <=);

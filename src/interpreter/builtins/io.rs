use super::super::error::EvalError;
use super::Operands;
use crate::value::Value;

/// Sends every operand to the evaluator's output and yields the last one.
pub fn print(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    let values = ops.eval_all()?;
    ops.evaluator().output().print(&values);
    Ok(values.last().cloned().unwrap_or(Value::Null))
}

use super::super::error::EvalError;
use super::{require_args, Operands};
use crate::ast::Atom;
use crate::value::Value;

/// `(set name value)`: the name is taken as written, never evaluated.
pub fn set(ops: &mut Operands<'_>) -> Result<Value, EvalError> {
    require_args!(ops, exactly 2);
    let target = ops.expr(0);
    let Some(name) = target.as_atom().and_then(Atom::as_text) else {
        return Err(EvalError::type_error(format!(
            "set requires a variable name, found `{}`",
            target
        )));
    };
    let value = ops.eval(1)?;
    ops.env().define(name.to_string(), value.clone());
    Ok(value)
}

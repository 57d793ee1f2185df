//! Conversion of JSON inputs into runtime values. Output goes through
//! [`crate::format`].

use std::path::Path;

use crate::interpreter::Environment;
use crate::value::{Object, Value};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("inputs must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(number) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(&s),
        serde_json::Value::Array(array) => Value::list(array.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(object) => Value::object(
            object
                .into_iter()
                .map(|(key, value)| (key, json_to_value(value)))
                .collect::<Object>(),
        ),
    }
}

/// Bind every key of a JSON object as a `$`-prefixed input.
pub fn bind_inputs(env: &Environment, text: &str) -> Result<usize, InputError> {
    match serde_json::from_str::<serde_json::Value>(text)? {
        serde_json::Value::Object(object) => {
            let count = object.len();
            for (key, value) in object {
                env.bind_input(&key, json_to_value(value));
            }
            Ok(count)
        }
        other => Err(InputError::NotAnObject(json_type_name(&other))),
    }
}

pub fn bind_inputs_from_file(env: &Environment, path: &Path) -> Result<usize, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    bind_inputs(env, &text)
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

const INDENT_SIZE: usize = 2;

pub fn value_to_json_string(value: &Value, compact: bool) -> String {
    format_json(value, if compact { None } else { Some(0) })
}

pub fn escape_json_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Whole numbers print without a fraction; non-finite numbers print as null.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        "null".to_string()
    } else if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// `indent` of `None` renders on one line.
pub fn format_json(value: &Value, indent: Option<usize>) -> String {
    let mut out = String::new();
    write_json(&mut out, value, indent);
    out
}

/// How the interactive session shows a result: lists and objects as
/// indented JSON, everything else in its display form.
pub fn display_result(value: &Value) -> String {
    match value {
        Value::List(_) | Value::Object(_) => value_to_json_string(value, false),
        _ => value.to_string(),
    }
}

fn write_json(out: &mut String, value: &Value, indent: Option<usize>) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => write_string(out, s),
        Value::Function(_) => write_string(out, &value.to_string()),
        Value::List(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                open_entry(out, index, indent);
                ensure_sufficient_stack(|| write_json(out, item, indent.map(|level| level + 1)));
            }
            close(out, ']', indent);
        }
        Value::Object(object) => {
            if object.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (index, (key, field)) in object.iter().enumerate() {
                open_entry(out, index, indent);
                write_string(out, key);
                out.push_str(if indent.is_some() { ": " } else { ":" });
                ensure_sufficient_stack(|| write_json(out, field, indent.map(|level| level + 1)));
            }
            close(out, '}', indent);
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    out.push_str(&escape_json_string(s));
    out.push('"');
}

fn open_entry(out: &mut String, index: usize, indent: Option<usize>) {
    if index > 0 {
        out.push(',');
    }
    if let Some(level) = indent {
        out.push('\n');
        push_indent(out, level + 1);
    }
}

fn close(out: &mut String, bracket: char, indent: Option<usize>) {
    if let Some(level) = indent {
        out.push('\n');
        push_indent(out, level);
    }
    out.push(bracket);
}

fn push_indent(out: &mut String, level: usize) {
    out.extend(std::iter::repeat(' ').take(level * INDENT_SIZE));
}

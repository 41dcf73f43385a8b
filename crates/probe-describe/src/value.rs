//! Single-line formatting of dynamic values.

use std::fmt::Write;
use std::path::Path;

use probe_model::{ClosureRef, Value};

use crate::util::relative_path;

/// Label used for closures whose definition site is unknown.
const CLOSURE_LABEL: &str = "Closure";

/// Format a value as a single line of text.
///
/// Top-level strings are written verbatim; strings nested in lists and maps
/// are quoted so the structure stays readable.
#[must_use]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            write_nested(&mut out, other);
            out
        }
    }
}

/// Format a closure as `Closure(<file>@<line>)`.
///
/// Absolute files are shown relative to `project_dir` when one is given.
/// Closures without a known location render as `Closure`.
#[must_use]
pub fn format_closure(closure: &ClosureRef, project_dir: Option<&Path>) -> String {
    let Some(location) = closure.location() else {
        tracing::warn!("Closure location unavailable, using generic label");
        return CLOSURE_LABEL.to_owned();
    };

    let file = match project_dir {
        Some(root) if location.file.is_absolute() => relative_path(root, &location.file),
        _ => location.file.display().to_string(),
    };
    format!("{CLOSURE_LABEL}({file}@{})", location.line)
}

fn write_nested(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => write!(out, "{b}").unwrap(),
        Value::Int(i) => write!(out, "{i}").unwrap(),
        Value::Float(f) => write!(out, "{f:?}").unwrap(),
        Value::String(s) => write_quoted(out, s),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_nested(out, item);
            }
            out.push(']');
        }
        Value::Map(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_quoted(out, key);
                out.push_str(": ");
                write_nested(out, item);
            }
            out.push('}');
        }
        Value::Object(object) => write!(out, "object({})", object.type_name()).unwrap(),
        Value::Closure(_) => write!(out, "object({CLOSURE_LABEL})").unwrap(),
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

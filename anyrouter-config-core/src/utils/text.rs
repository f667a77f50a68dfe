//! Lenient JSON scalar -> edit-model text coercion.

use serde_json::Value;

/// Converts any JSON value to its string form; `null` and missing become blank.
///
/// Used for cookie values, where `0` and `false` are meaningful.
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Like [`stringify`], but falsy scalars (`false`, `0`) also become blank.
///
/// Used for optional record fields where a falsy value means "unset".
pub fn text_or_blank(value: Option<&Value>) -> String {
    match value {
        Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        other => stringify(other),
    }
}

/// Splits a comma-separated list, trimming tokens and dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Rejoins a JSON list into the edit model's comma-separated form.
pub fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| stringify(Some(item)))
        .collect::<Vec<_>>()
        .join(", ")
}

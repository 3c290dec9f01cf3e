//! Template JSON parsing and data binding

use crate::{Result, Template, TemplateError};
use serde_json::Value;

/// Parse a template from JSON string
pub fn parse_template(json: &str) -> Result<Template> {
    serde_json::from_str(json).map_err(|e| TemplateError::ParseError(e.to_string()))
}

/// Resolve a JSONPath-like binding expression against data
///
/// Supports simple paths like:
/// - `$` - The whole document
/// - `$.field` - Root field
/// - `$.object.field` - Nested field
/// - `$.array[0]` - Array index
/// - `$.array[0].field` - Array element field
pub fn resolve_binding<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
    if path == "$" {
        return Some(data);
    }

    let path = path.strip_prefix("$.")?;
    let mut current = data;

    for segment in path.split('.') {
        match segment.find('[') {
            Some(bracket_pos) => {
                let field = &segment[..bracket_pos];
                let index: usize = segment[bracket_pos + 1..]
                    .strip_suffix(']')?
                    .parse()
                    .ok()?;

                if !field.is_empty() {
                    current = current.get(field)?;
                }
                current = current.get(index)?;
            }
            None => current = current.get(segment)?,
        }
    }

    Some(current)
}

/// Resolve a binding straight to display text (missing paths become "")
pub fn resolve_text(path: &str, data: &Value) -> String {
    resolve_binding(path, data)
        .map(value_to_string)
        .unwrap_or_default()
}

/// Convert a JSON value to string for rendering
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Check if a JSON value is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().unwrap_or(0.0) != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

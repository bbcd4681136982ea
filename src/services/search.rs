use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

/// How a free-text query is matched against records
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions<'f> {
    /// Serialized field names to look at; `None` searches every string field
    /// and every element of every array field
    pub fields: Option<&'f [&'f str]>,
    pub case_sensitive: bool,
}

impl<'f> SearchOptions<'f> {
    pub fn fields(fields: &'f [&'f str]) -> Self {
        Self {
            fields: Some(fields),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

/// Stable substring filter over `records`
///
/// A blank query returns the input slice itself. Otherwise the records whose
/// searched values contain `query` are returned in input order.
pub fn search<'a, T>(records: &'a [T], query: &str, options: &SearchOptions<'_>) -> Cow<'a, [T]>
where
    T: Serialize + Clone,
{
    if query.trim().is_empty() {
        return Cow::Borrowed(records);
    }

    let needle = if options.case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };

    Cow::Owned(
        records
            .iter()
            .filter(|record| matches(*record, &needle, options))
            .cloned()
            .collect(),
    )
}

fn matches<T: Serialize>(record: &T, needle: &str, options: &SearchOptions<'_>) -> bool {
    let fields = match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => fields,
        _ => return false,
    };

    let contains = |text: &str| {
        if options.case_sensitive {
            text.contains(needle)
        } else {
            text.to_lowercase().contains(needle)
        }
    };

    match options.fields {
        Some(names) if !names.is_empty() => names.iter().any(|name| match fields.get(*name) {
            None | Some(Value::Null) => false,
            Some(value) => contains(&display_value(value)),
        }),
        _ => fields.values().any(|value| match value {
            Value::String(text) => contains(text),
            Value::Array(elements) => elements.iter().any(|element| contains(&display_value(element))),
            _ => false,
        }),
    }
}

/// Text a value is matched as: integral numbers without a fraction, arrays
/// comma-joined (null elements empty), objects as an opaque marker
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(elements) => elements
            .iter()
            .map(|element| match element {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

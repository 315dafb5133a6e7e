//! The mutable log record handed through the formatting stages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;

/// Field holding the main log message
pub const MESSAGE_KEY: &str = "msg";
/// Field holding the serialized error, if any
pub const ERROR_KEY: &str = "err";
/// Default cap on the number of stack lines kept by [`ErrorInfo::from_error`]
pub const DEFAULT_TRACE_MAX_LINES: usize = 100;

/// Structured fields of a record, in insertion order
pub type Fields = IndexMap<String, Value>;

/// One log event: `msg`, optional `err`, and any other structured fields.
///
/// Formatting stages consume the fields they own, so a record is good for
/// exactly one formatting pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Fields,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(msg: impl Into<Value>) -> Self {
        let mut record = Self::new();
        record.insert(MESSAGE_KEY, msg);
        record
    }

    /// Build a record from a JSON object. Anything else is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(obj) => Some(obj.into_iter().collect()),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Remove a field, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    /// Remove and return `msg`
    pub fn take_message(&mut self) -> Option<Value> {
        self.remove(MESSAGE_KEY)
    }

    /// Remove and return `err`, if the record carries one. A null `err`
    /// is removed but does not count as an error.
    pub fn take_error(&mut self) -> Option<ErrorInfo> {
        match self.remove(ERROR_KEY)? {
            Value::Null => None,
            value => Some(ErrorInfo::from_value(value)),
        }
    }

    pub fn set_error(&mut self, error: ErrorInfo) {
        let value = serde_json::to_value(error).unwrap_or(Value::Null);
        self.insert(ERROR_KEY, value);
    }
}

impl FromIterator<(String, Value)> for LogRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        LogRecord {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<Fields> for LogRecord {
    fn from(fields: Fields) -> Self {
        LogRecord { fields }
    }
}

/// Serialized error: `{name, message, stack?}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorInfo {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Read an `err` field leniently.
    ///
    /// Non-string members are stringified, a stack given as an array is
    /// joined one frame per line, and a bare value becomes the message.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(obj) => ErrorInfo {
                name: obj.get("name").map(value_text).unwrap_or_default(),
                message: obj.get("message").map(value_text).unwrap_or_default(),
                stack: obj.get("stack").and_then(stack_text),
            },
            other => ErrorInfo {
                name: String::new(),
                message: value_text(&other),
                stack: None,
            },
        }
    }

    /// Serialize a Rust error; its `source()` chain becomes the stack,
    /// truncated to `max_lines` lines.
    pub fn from_error(name: impl Into<String>, error: &dyn Error, max_lines: usize) -> Self {
        let mut lines = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            if lines.len() >= max_lines {
                break;
            }
            lines.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        ErrorInfo {
            name: name.into(),
            message: error.to_string(),
            stack: if lines.is_empty() {
                None
            } else {
                Some(lines.join("\n  "))
            },
        }
    }
}

fn stack_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(frames) => Some(
            frames
                .iter()
                .map(value_text)
                .collect::<Vec<_>>()
                .join("\n  "),
        ),
        other => Some(value_text(other)),
    }
}

/// Strings as-is, everything else in its JSON form
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

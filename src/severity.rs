//! Log severity labels.
//!
//! Formatting works on plain string labels, so this only normalizes what
//! upstream loggers emit: textual levels in any case, and bunyan-style
//! numeric levels (10 = trace ... 60 = fatal).

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    /// Anything that does not map to a known level
    Any,
}

impl Severity {
    /// Upper-case label, as passed to the formatter
    pub fn label(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Any => "ANY",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "trace" => Severity::Trace,
            "debug" => Severity::Debug,
            "info" | "information" => Severity::Info,
            "warn" | "warning" => Severity::Warn,
            "error" | "err" => Severity::Error,
            "fatal" | "critical" | "panic" => Severity::Fatal,
            _ => Severity::Any,
        }
    }

    /// Bunyan/pino numeric levels
    pub fn from_number(level: i64) -> Self {
        match level {
            10 => Severity::Trace,
            20 => Severity::Debug,
            30 => Severity::Info,
            40 => Severity::Warn,
            50 => Severity::Error,
            60 => Severity::Fatal,
            _ => Severity::Any,
        }
    }

    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => match s.parse::<i64>() {
                Ok(n) => Severity::from_number(n),
                Err(_) => Severity::from_label(s),
            },
            Value::Number(n) => n.as_i64().map(Severity::from_number).unwrap_or(Severity::Any),
            _ => Severity::Any,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_label() {
        assert_eq!(Severity::from_label("info"), Severity::Info);
        assert_eq!(Severity::from_label("WARNING"), Severity::Warn);
        assert_eq!(Severity::from_label("Err"), Severity::Error);
        assert_eq!(Severity::from_label("verbose"), Severity::Any);
    }

    #[test]
    fn test_from_number() {
        assert_eq!(Severity::from_number(10), Severity::Trace);
        assert_eq!(Severity::from_number(30), Severity::Info);
        assert_eq!(Severity::from_number(60), Severity::Fatal);
        assert_eq!(Severity::from_number(35), Severity::Any);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(Severity::from_value(&json!(50)), Severity::Error);
        assert_eq!(Severity::from_value(&json!("40")), Severity::Warn);
        assert_eq!(Severity::from_value(&json!("debug")), Severity::Debug);
        assert_eq!(Severity::from_value(&json!(null)), Severity::Any);
    }

    #[test]
    fn test_label_round_trip() {
        assert_eq!(Severity::Fatal.label(), "FATAL");
        assert_eq!(Severity::from_label(Severity::Warn.label()), Severity::Warn);
        assert_eq!(Severity::Any.to_string(), "ANY");
    }
}

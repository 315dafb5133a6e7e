use crate::colors::ColorScheme;
use crate::formatters::DataRenderer;
use crate::record::{value_text, Fields};
use serde_json::Value;

/// Single-line `key=value` rendering, in record order
pub struct LogfmtRenderer;

impl LogfmtRenderer {
    /// Format a single key=value pair with appropriate colors
    pub fn format_key_value_pair(&self, colors: &ColorScheme, key: &str, value: &Value) -> String {
        let colored_key = colors.paint(colors.key, key);
        let equals = colors.paint(colors.separator, "=");
        let colored_value = self.format_value(colors, value);

        format!("{}{}{}", colored_key, equals, colored_value)
    }

    /// Quote when needed, then color by JSON type
    fn format_value(&self, colors: &ColorScheme, value: &Value) -> String {
        let color = match value {
            Value::String(_) => colors.string,
            Value::Number(_) => colors.number,
            Value::Bool(_) => colors.boolean,
            Value::Null => colors.null,
            // Nested data is written as compact JSON
            Value::Array(_) | Value::Object(_) => colors.string,
        };

        let text = match value {
            Value::Null => String::new(),
            other => value_text(other),
        };

        let quoted_value = if self.needs_quoting(&text) {
            format!("\"{}\"", self.escape_quotes(&text))
        } else {
            text
        };

        colors.paint(color, &quoted_value)
    }

    /// Check if value needs to be quoted per logfmt rules
    fn needs_quoting(&self, value: &str) -> bool {
        value.is_empty()
            || value.contains(' ')
            || value.contains('\t')
            || value.contains('\n')
            || value.contains('"')
            || value.contains('=')
    }

    /// Escape backslashes, quotes and newlines inside quoted values
    fn escape_quotes(&self, value: &str) -> String {
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}

impl DataRenderer for LogfmtRenderer {
    fn name(&self) -> &str {
        "logfmt"
    }

    fn render(&self, fields: &Fields, plain: bool) -> String {
        let colors = ColorScheme::new(!plain);
        fields
            .iter()
            .map(|(key, value)| self.format_key_value_pair(&colors, key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

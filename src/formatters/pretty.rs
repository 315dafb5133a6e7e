use crate::colors::ColorScheme;
use crate::formatters::DataRenderer;
use crate::record::Fields;
use serde_json::Value;

const DEFAULT_INDENT: usize = 4;

/// Multi-line rendering for humans.
///
/// Keys are right-aligned per nesting level, arrays show their indexes and
/// values are colored by type unless rendering in plain mode:
///
/// ```text
/// {
///         status: 200,
///           path: "/",
///     ip_address: "127.0.0.1"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PrettyRenderer {
    indent: usize,
}

impl Default for PrettyRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PrettyRenderer {
    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    fn write_value(&self, value: &Value, level: usize, colors: &ColorScheme, out: &mut String) {
        match value {
            Value::Object(obj) => self.write_object(obj.iter(), level, colors, out),
            Value::Array(items) => self.write_array(items, level, colors, out),
            Value::String(s) => {
                let quoted = serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s));
                out.push_str(&colors.paint(colors.string, &quoted));
            }
            Value::Number(n) => out.push_str(&colors.paint(colors.number, &n.to_string())),
            Value::Bool(b) => out.push_str(&colors.paint(colors.boolean, &b.to_string())),
            Value::Null => out.push_str(&colors.paint(colors.null, "null")),
        }
    }

    fn write_object<'a, I>(&self, entries: I, level: usize, colors: &ColorScheme, out: &mut String)
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        let entries: Vec<(&String, &Value)> = entries.into_iter().collect();
        if entries.is_empty() {
            out.push_str("{}");
            return;
        }

        let width = entries.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        let margin = " ".repeat(self.indent * (level + 1));

        out.push_str("{\n");
        for (i, (key, value)) in entries.iter().enumerate() {
            out.push_str(&margin);
            out.push_str(&" ".repeat(width - key.chars().count()));
            out.push_str(&colors.paint(colors.key, key));
            out.push_str(": ");
            self.write_value(value, level + 1, colors, out);
            if i + 1 < entries.len() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str(&" ".repeat(self.indent * level));
        out.push('}');
    }

    fn write_array(&self, items: &[Value], level: usize, colors: &ColorScheme, out: &mut String) {
        if items.is_empty() {
            out.push_str("[]");
            return;
        }

        let width = (items.len() - 1).to_string().len();
        let margin = " ".repeat(self.indent * (level + 1));

        out.push_str("[\n");
        for (i, item) in items.iter().enumerate() {
            out.push_str(&margin);
            out.push_str(&format!("[{:>width$}] ", i, width = width));
            self.write_value(item, level + 1, colors, out);
            if i + 1 < items.len() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str(&" ".repeat(self.indent * level));
        out.push(']');
    }
}

impl DataRenderer for PrettyRenderer {
    fn name(&self) -> &str {
        "pretty"
    }

    fn render(&self, fields: &Fields, plain: bool) -> String {
        let colors = ColorScheme::new(!plain);
        let mut out = String::new();
        self.write_object(fields.iter(), 0, &colors, &mut out);
        out
    }
}

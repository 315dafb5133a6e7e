use crate::error::FormatterError;
use crate::record::{Fields, LogRecord};
use std::sync::Arc;
use tracing::{debug, error};

pub mod customizable;
pub mod logfmt;
pub mod pretty;

/// Message stage: `(severity, formatted datetime, program name, record)`.
/// Must remove `msg` from the record.
pub type MsgFormat = Box<dyn Fn(&str, &str, Option<&str>, &mut LogRecord) -> String + Send + Sync>;

/// Error stage. Must remove `err` when it renders it; `None` means no output.
pub type ErrFormat = Box<dyn Fn(&mut LogRecord) -> Option<String> + Send + Sync>;

/// Data stage, run on whatever the previous stages left. `None` means no output.
pub type DataFormat = Box<dyn Fn(&mut LogRecord) -> Option<String> + Send + Sync>;

/// Renders the structured fields of a record to text
pub trait DataRenderer: Send + Sync {
    fn name(&self) -> &str;

    /// Deterministic rendering of `fields`; `plain` turns decoration off
    fn render(&self, fields: &Fields, plain: bool) -> String;
}

/// Pretty-printed JSON. There is nothing to decorate, so `plain` is ignored.
pub struct JsonRenderer;

impl DataRenderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&self, fields: &Fields, _plain: bool) -> String {
        serde_json::to_string_pretty(fields).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Renderers available by name
pub const RENDERER_NAMES: &[&str] = &["pretty", "json", "logfmt"];

/// Look up a renderer by name.
///
/// An unknown name is a startup error: the formatter cannot render data
/// without one, so this fails at construction instead of on the first record.
pub fn renderer_by_name(name: &str) -> Result<Arc<dyn DataRenderer>, FormatterError> {
    let renderer: Arc<dyn DataRenderer> = match name.to_lowercase().as_str() {
        "pretty" => Arc::new(pretty::PrettyRenderer::new()),
        "json" => Arc::new(JsonRenderer),
        "logfmt" => Arc::new(logfmt::LogfmtRenderer),
        _ => {
            error!(renderer = name, "data renderer is not available; use one of {:?}", RENDERER_NAMES);
            return Err(FormatterError::RendererUnavailable {
                name: name.to_string(),
                known: RENDERER_NAMES.join(", "),
            });
        }
    };
    debug!(renderer = renderer.name(), "selected data renderer");
    Ok(renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renderer_by_name() {
        for name in RENDERER_NAMES {
            assert_eq!(renderer_by_name(name).unwrap().name(), *name);
        }
        assert_eq!(renderer_by_name("JSON").unwrap().name(), "json");
    }

    #[test]
    fn test_unknown_renderer_fails() {
        match renderer_by_name("amazing") {
            Err(FormatterError::RendererUnavailable { name, known }) => {
                assert_eq!(name, "amazing");
                assert_eq!(known, "pretty, json, logfmt");
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_json_renderer() {
        let mut fields = Fields::new();
        fields.insert("status".to_string(), json!(200));
        fields.insert("method".to_string(), json!("GET"));
        assert_eq!(
            JsonRenderer.render(&fields, false),
            "{\n  \"status\": 200,\n  \"method\": \"GET\"\n}"
        );
    }
}

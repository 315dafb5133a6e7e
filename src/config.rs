use crate::colors::{ColorConfig, ColorDirective};
use crate::error::ConfigError;
use crate::formatters::customizable::DEFAULT_TRACE_INDENT;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Formatter settings, typically read from a YAML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    /// Subject -> color directive, merged over the defaults
    pub colors: IndexMap<String, ColorDirective>,
    /// Seed `colors` with the built-in severity colors
    pub load_default_colors: bool,
    /// Fields never shown in the data section
    pub excluded_fields: Vec<String>,
    /// Undecorated data rendering
    pub plain: bool,
    pub trace_indent: usize,
    /// Data renderer: pretty, json or logfmt
    pub renderer: String,
    /// strftime pattern; RFC 3339 with milliseconds when unset
    pub datetime_format: Option<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            colors: IndexMap::new(),
            load_default_colors: true,
            excluded_fields: Vec::new(),
            plain: false,
            trace_indent: DEFAULT_TRACE_INDENT,
            renderer: "pretty".to_string(),
            datetime_format: None,
        }
    }
}

impl FormatterConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults"
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Resolve `colors` against the defaults
    pub fn color_config(&self) -> ColorConfig {
        ColorConfig::build(
            self.load_default_colors,
            self.colors.iter().map(|(k, v)| (k.clone(), v.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;

    #[test]
    fn test_defaults() {
        let config = FormatterConfig::from_yaml_str("").unwrap();
        assert_eq!(config, FormatterConfig::default());
        assert_eq!(config.trace_indent, 4);
        assert_eq!(config.renderer, "pretty");
        assert_eq!(config.color_config(), ColorConfig::default());
    }

    #[test]
    fn test_full_file() {
        let yaml = r#"
load_default_colors: true
colors:
  severity:
    info: bold_cyan
  datetime: "\e[34m"
  msg: "@severity"
excluded_fields: [pid, hostname]
plain: true
trace_indent: 2
renderer: logfmt
datetime_format: "%H:%M:%S"
"#;
        let config = FormatterConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.excluded_fields, vec!["pid", "hostname"]);
        assert!(config.plain);
        assert_eq!(config.trace_indent, 2);
        assert_eq!(config.renderer, "logfmt");
        assert_eq!(config.datetime_format.as_deref(), Some("%H:%M:%S"));

        let resolved = config.color_config();
        assert_eq!(resolved.color_for("severity", "INFO"), Some(colors::BOLD_CYAN));
        assert_eq!(resolved.color_for("severity", "WARN"), Some(colors::YELLOW));
        assert_eq!(resolved.color_for("datetime", "WARN"), Some(colors::BLUE));
        assert_eq!(resolved.color_for("msg", "INFO"), Some(colors::BOLD_CYAN));
    }

    #[test]
    fn test_without_default_colors() {
        let config = FormatterConfig::from_yaml_str("load_default_colors: false\n").unwrap();
        assert!(config.color_config().is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(FormatterConfig::from_yaml_str("colours: {}\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = FormatterConfig::from_file(Path::new("/nonexistent/tintfmt.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

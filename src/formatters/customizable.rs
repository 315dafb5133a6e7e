//! Three-part log formatting.
//!
//! A log entry is printed as:
//!
//! 1. the main line: timestamp, severity and message,
//! 2. the error, if the record carries one, with its stack,
//! 3. the remaining structured data.
//!
//! Each part is produced by its own stage function and any of them can be
//! replaced. Stages work destructively on the record they are given: the
//! message stage removes `msg`, the error stage removes `err`, and the data
//! stage sees whatever is left. A replacement stage that does not remove
//! its field will see it rendered again by the data stage; keeping that
//! contract is up to whoever plugs it in.

use crate::colors::ColorConfig;
use crate::config::FormatterConfig;
use crate::error::FormatterError;
use crate::formatters::pretty::PrettyRenderer;
use crate::formatters::{renderer_by_name, DataFormat, DataRenderer, ErrFormat, MsgFormat};
use crate::record::{value_text, LogRecord};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, TimeZone};
use std::fmt::{Display, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Spaces in front of the stack trace
pub const DEFAULT_TRACE_INDENT: usize = 4;

/// Main line: `[<datetime>] <severity>: <msg>`.
///
/// The three parts are colored through the `datetime`, `severity` and `msg`
/// subjects of `color_config`, all resolved against the record's severity.
pub fn default_msg_format(color_config: Arc<ColorConfig>) -> MsgFormat {
    Box::new(
        move |severity: &str, datetime: &str, _progname: Option<&str>, record: &mut LogRecord| {
            let msg = record
                .take_message()
                .map(|value| value_text(&value))
                .unwrap_or_default();

            let datetime = color_config.color("datetime", datetime, severity);
            let msg = color_config.color("msg", &msg, severity);
            let severity = color_config.color("severity", severity, severity);

            format!("[{}] {}: {}", datetime, severity, msg)
        },
    )
}

/// `  <name> (<message>):` followed by the indented stack, if any
pub fn default_err_format(trace_indent: usize) -> ErrFormat {
    Box::new(move |record: &mut LogRecord| {
        let err = record.take_error()?;

        let mut out = format!("  {} ({}):", err.name, err.message);
        if let Some(stack) = err.stack {
            out.push('\n');
            out.push_str(&" ".repeat(trace_indent));
            out.push_str(&stack);
        }
        Some(out)
    })
}

/// Drop `excluded_fields`, then pretty-print what remains
pub fn default_data_format(excluded_fields: Vec<String>, plain: bool) -> DataFormat {
    data_format_with_renderer(excluded_fields, plain, Arc::new(PrettyRenderer::new()))
}

/// Drop `excluded_fields` from the record, then render what remains with
/// `renderer`. An empty remainder produces no output.
pub fn data_format_with_renderer(
    excluded_fields: Vec<String>,
    plain: bool,
    renderer: Arc<dyn DataRenderer>,
) -> DataFormat {
    Box::new(move |record: &mut LogRecord| {
        for field in &excluded_fields {
            record.remove(field);
        }
        if record.is_empty() {
            return None;
        }
        Some(renderer.render(record.fields(), plain))
    })
}

fn check_datetime_format(pattern: &str) -> Result<(), FormatterError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FormatterError::InvalidDatetimeFormat(pattern.to_string()));
    }
    Ok(())
}

/// Formatter built from three replaceable stages
pub struct CustomizableFormatter {
    format_msg: MsgFormat,
    format_err: ErrFormat,
    format_data: DataFormat,
    datetime_format: Option<String>,
}

impl Default for CustomizableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomizableFormatter {
    /// Default colors, no excluded fields, decorated pretty data
    pub fn new() -> Self {
        CustomizableFormatter {
            format_msg: default_msg_format(Arc::new(ColorConfig::default())),
            format_err: default_err_format(DEFAULT_TRACE_INDENT),
            format_data: default_data_format(Vec::new(), false),
            datetime_format: None,
        }
    }

    /// Build the default stages from `config`.
    ///
    /// Fails when the configured renderer does not exist or the datetime
    /// pattern is invalid, so problems surface before anything is formatted.
    pub fn from_config(config: &FormatterConfig) -> Result<Self, FormatterError> {
        let renderer = renderer_by_name(&config.renderer)?;
        if let Some(pattern) = &config.datetime_format {
            check_datetime_format(pattern)?;
        }

        Ok(CustomizableFormatter {
            format_msg: default_msg_format(Arc::new(config.color_config())),
            format_err: default_err_format(config.trace_indent),
            format_data: data_format_with_renderer(
                config.excluded_fields.clone(),
                config.plain,
                renderer,
            ),
            datetime_format: config.datetime_format.clone(),
        })
    }

    /// Load a YAML file and build the formatter from it
    pub fn from_config_file(path: &Path) -> Result<Self, FormatterError> {
        let config = FormatterConfig::from_file(path)?;
        Self::from_config(&config)
    }

    /// Use the default message stage with `color_config`
    pub fn with_color_config(mut self, color_config: ColorConfig) -> Self {
        self.format_msg = default_msg_format(Arc::new(color_config));
        self
    }

    /// Replace the message stage. The replacement must remove `msg`.
    pub fn with_format_msg<F>(mut self, format_msg: F) -> Self
    where
        F: Fn(&str, &str, Option<&str>, &mut LogRecord) -> String + Send + Sync + 'static,
    {
        self.format_msg = Box::new(format_msg);
        self
    }

    /// Replace the error stage. The replacement must remove `err`.
    pub fn with_format_err<F>(mut self, format_err: F) -> Self
    where
        F: Fn(&mut LogRecord) -> Option<String> + Send + Sync + 'static,
    {
        self.format_err = Box::new(format_err);
        self
    }

    pub fn with_format_data<F>(mut self, format_data: F) -> Self
    where
        F: Fn(&mut LogRecord) -> Option<String> + Send + Sync + 'static,
    {
        self.format_data = Box::new(format_data);
        self
    }

    /// strftime pattern for the timestamp instead of RFC 3339
    pub fn with_datetime_format(mut self, pattern: impl Into<String>) -> Result<Self, FormatterError> {
        let pattern = pattern.into();
        check_datetime_format(&pattern)?;
        self.datetime_format = Some(pattern);
        Ok(self)
    }

    /// RFC 3339 with milliseconds (`Z` for UTC) unless a pattern is set
    pub fn format_datetime<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        if let Some(pattern) = &self.datetime_format {
            let mut out = String::new();
            if write!(out, "{}", time.format(pattern)).is_ok() {
                return out;
            }
            warn!(pattern = %pattern, "datetime pattern could not be applied, using RFC 3339");
        }
        time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Run only the message stage
    pub fn render_message(
        &self,
        severity: &str,
        datetime: &str,
        progname: Option<&str>,
        record: &mut LogRecord,
    ) -> String {
        (self.format_msg)(severity, datetime, progname, record)
    }

    /// Run only the error stage
    pub fn render_error(&self, record: &mut LogRecord) -> Option<String> {
        (self.format_err)(record)
    }

    /// Run only the data stage
    pub fn render_data(&self, record: &mut LogRecord) -> Option<String> {
        (self.format_data)(record)
    }

    /// Format one log entry, ready to be written out.
    ///
    /// Runs the message, error and data stages in that order on the same
    /// `record`, which is consumed in the process: on return `msg`, `err`
    /// and the excluded fields are gone. Stage outputs are joined by
    /// newlines, skipping stages with nothing to say, and the result always
    /// ends with a newline.
    pub fn format<Tz: TimeZone>(
        &self,
        severity: &str,
        time: &DateTime<Tz>,
        progname: Option<&str>,
        record: &mut LogRecord,
    ) -> String
    where
        Tz::Offset: Display,
    {
        let datetime = self.format_datetime(time);
        let mut out = self.render_message(severity, &datetime, progname, record);

        // Errors go before the additional data
        if let Some(err) = self.render_error(record) {
            out.push('\n');
            out.push_str(&err);
        }

        if let Some(data) = self.render_data(record) {
            out.push('\n');
            out.push_str(&data);
        }

        out.push('\n');
        out
    }
}

// src/stream.rs
//! Formats a stream of JSON log lines (bunyan, pino, ougai and friends).

use crate::error::ProcessingError;
use crate::formatters::customizable::CustomizableFormatter;
use crate::record::{LogRecord, MESSAGE_KEY};
use crate::severity::Severity;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;
use std::io::{BufRead, ErrorKind, Write};
use tracing::{debug, warn};

/// Fields holding the level, in order of preference
pub const LEVEL_KEYS: &[&str] = &["level", "severity", "lvl", "loglevel"];
/// Fields holding the timestamp, in order of preference
pub const TIMESTAMP_KEYS: &[&str] = &["time", "timestamp", "ts", "@timestamp"];
/// Fields holding the program name
pub const PROGNAME_KEYS: &[&str] = &["name", "progname"];
/// Alternative message fields, used when `msg` is absent
pub const MESSAGE_KEYS: &[&str] = &["message", "@message"];
/// Bunyan bookkeeping that never gets printed
pub const HOUSEKEEPING_KEYS: &[&str] = &["v"];

/// What to do with lines that are not JSON objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStrategy {
    /// Skip problematic lines and continue processing
    #[default]
    Skip,
    /// Stop processing on first error
    FailFast,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamStats {
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
}

/// One parsed line, ready for the formatter
#[derive(Debug, Clone)]
pub struct Entry {
    pub severity: Severity,
    pub time: DateTime<FixedOffset>,
    pub progname: Option<String>,
    pub record: LogRecord,
}

impl Entry {
    /// Pull level, time and program name out of a raw JSON line.
    ///
    /// Missing levels map to `ANY`, missing or unreadable times to now.
    pub fn from_value(value: Value) -> Option<Self> {
        let mut record = LogRecord::from_value(value)?;

        let severity = take_first(&mut record, LEVEL_KEYS)
            .map(|v| Severity::from_value(&v))
            .unwrap_or(Severity::Any);
        let time = take_first(&mut record, TIMESTAMP_KEYS)
            .and_then(|v| parse_time(&v))
            .unwrap_or_else(|| Utc::now().fixed_offset());
        let progname = take_first(&mut record, PROGNAME_KEYS).and_then(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        });
        for key in HOUSEKEEPING_KEYS {
            record.remove(key);
        }
        if !record.contains_key(MESSAGE_KEY) {
            if let Some(msg) = take_first(&mut record, MESSAGE_KEYS) {
                record.insert(MESSAGE_KEY, msg);
            }
        }

        Some(Entry {
            severity,
            time,
            progname,
            record,
        })
    }
}

fn take_first(record: &mut LogRecord, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|key| record.remove(key))
}

/// RFC 3339 first, then whatever `dateparser` understands, then epoch
/// seconds or milliseconds
pub fn parse_time(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .or_else(|| dateparser::parse(s).ok().map(|dt| dt.fixed_offset())),
        Value::Number(n) => {
            let utc = if let Some(secs) = n.as_i64() {
                // Anything past year 5138 in seconds is really milliseconds
                if secs.abs() > 100_000_000_000 {
                    DateTime::from_timestamp_millis(secs)
                } else {
                    DateTime::from_timestamp(secs, 0)
                }
            } else {
                n.as_f64()
                    .and_then(|secs| DateTime::from_timestamp_millis((secs * 1000.0) as i64))
            };
            utc.map(|dt| dt.fixed_offset())
        }
        _ => None,
    }
}

/// Reads JSON lines and writes one formatted entry per record
pub struct LogStream {
    formatter: CustomizableFormatter,
    error_strategy: ErrorStrategy,
}

impl LogStream {
    pub fn new(formatter: CustomizableFormatter, error_strategy: ErrorStrategy) -> Self {
        LogStream {
            formatter,
            error_strategy,
        }
    }

    /// Format a single line. `Ok(None)` for blank lines.
    pub fn format_line(&self, line: &str, line_number: usize) -> Result<Option<String>, ProcessingError> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(line).map_err(|e| ProcessingError::InvalidRecord {
            line: line_number,
            message: e.to_string(),
        })?;
        let mut entry = Entry::from_value(value).ok_or_else(|| ProcessingError::InvalidRecord {
            line: line_number,
            message: "expected a JSON object".to_string(),
        })?;

        Ok(Some(self.formatter.format(
            entry.severity.label(),
            &entry.time,
            entry.progname.as_deref(),
            &mut entry.record,
        )))
    }

    pub fn process<R: BufRead, W: Write>(
        &self,
        input: R,
        output: &mut W,
    ) -> Result<StreamStats, ProcessingError> {
        let mut stats = StreamStats::default();

        for line_result in input.lines() {
            let line = match line_result {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(ProcessingError::IoError(e)),
            };
            stats.lines += 1;

            let formatted = match self.format_line(&line, stats.lines) {
                Ok(Some(formatted)) => formatted,
                Ok(None) => continue,
                Err(err) => match self.error_strategy {
                    ErrorStrategy::FailFast => return Err(err),
                    ErrorStrategy::Skip => {
                        stats.skipped += 1;
                        warn!(line = stats.lines, "skipping line: {}", err);
                        continue;
                    }
                },
            };

            if let Err(e) = output.write_all(formatted.as_bytes()) {
                // Handle broken pipe gracefully
                if e.kind() == ErrorKind::BrokenPipe {
                    debug!("output closed, stopping");
                    break;
                }
                return Err(ProcessingError::IoError(e));
            }
            stats.records += 1;
        }

        Ok(stats)
    }
}

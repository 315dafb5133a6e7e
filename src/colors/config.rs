//! Per-subject color configuration.
//!
//! A configuration maps a *subject* (`severity`, `datetime`, `msg`, or any
//! name a custom stage cares about) to a [`ColorDirective`]:
//!
//! - a literal escape sequence, used for every severity,
//! - a per-severity table, with an optional `default` entry,
//! - an alias to another subject, which then colors both alike.
//!
//! Aliases are followed without cycle detection. A chain longer than
//! [`MAX_ALIAS_DEPTH`] hops is treated as uncolored and logged.

use crate::colors::{self, color_text};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

/// Fallback entry of a per-severity table
pub const DEFAULT_KEY: &str = "default";

/// Longest alias chain followed before giving up
pub const MAX_ALIAS_DEPTH: usize = 32;

/// Configured value for one subject
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDirective")]
pub enum ColorDirective {
    /// Escape sequence used regardless of severity
    Literal(String),
    /// Severity label -> escape sequence; keys are lower-cased on build
    PerSeverity(IndexMap<String, String>),
    /// Inherit the color of another subject
    Alias(String),
}

impl ColorDirective {
    pub fn literal(code: impl Into<String>) -> Self {
        ColorDirective::Literal(code.into())
    }

    pub fn alias(subject: impl Into<String>) -> Self {
        ColorDirective::Alias(subject.into())
    }

    /// Build a per-severity table. Severity labels are stored lower-cased.
    pub fn per_severity<K, V, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        ColorDirective::PerSeverity(
            entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
                .collect(),
        )
    }

    /// Lower-case the keys of a per-severity table; other directives as is
    fn normalized(self) -> Self {
        match self {
            ColorDirective::PerSeverity(table) => ColorDirective::per_severity(table),
            other => other,
        }
    }
}

/// File representation: a string (literal or `@alias`) or a table
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDirective {
    Code(String),
    BySeverity(IndexMap<String, String>),
}

impl From<RawDirective> for ColorDirective {
    fn from(raw: RawDirective) -> Self {
        match raw {
            RawDirective::Code(code) => match code.strip_prefix('@') {
                Some(subject) => ColorDirective::alias(subject),
                None => ColorDirective::Literal(expand_color_name(code)),
            },
            RawDirective::BySeverity(table) => ColorDirective::per_severity(
                table.into_iter().map(|(k, v)| (k, expand_color_name(v))),
            ),
        }
    }
}

/// `red` -> `\x1b[31m`; anything else is kept as written
fn expand_color_name(code: String) -> String {
    match colors::by_name(&code) {
        Some(sequence) => sequence.to_string(),
        None => code,
    }
}

/// Resolved color configuration, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorConfig {
    subjects: IndexMap<String, ColorDirective>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            subjects: Self::default_configuration(),
        }
    }
}

impl ColorConfig {
    /// Built-in colors: one per severity, including `any` for unknown levels
    pub fn default_configuration() -> IndexMap<String, ColorDirective> {
        let mut subjects = IndexMap::new();
        subjects.insert(
            "severity".to_string(),
            ColorDirective::per_severity([
                ("trace", colors::BLUE),
                ("debug", colors::WHITE),
                ("info", colors::CYAN),
                ("warn", colors::YELLOW),
                ("error", colors::RED),
                ("fatal", colors::PURPLE),
                ("any", colors::GREEN),
            ]),
        );
        subjects
    }

    /// Defaults overlaid with `overrides`
    pub fn new<K, I>(overrides: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ColorDirective)>,
    {
        Self::build(true, overrides)
    }

    /// Only `overrides`, without the built-in defaults
    pub fn without_defaults<K, I>(overrides: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ColorDirective)>,
    {
        Self::build(false, overrides)
    }

    /// No subject is colored
    pub fn empty() -> Self {
        ColorConfig {
            subjects: IndexMap::new(),
        }
    }

    /// Merge `overrides` into the (optional) defaults key by key.
    ///
    /// Per-severity keys are lower-cased first. Two per-severity tables are merged entry by entry with the override
    /// winning; in every other case the override replaces the default.
    pub fn build<K, I>(load_defaults: bool, overrides: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ColorDirective)>,
    {
        let mut subjects = if load_defaults {
            Self::default_configuration()
        } else {
            IndexMap::new()
        };

        for (key, directive) in overrides {
            let key = key.into();
            let merged = match (subjects.get(&key), directive.normalized()) {
                (Some(ColorDirective::PerSeverity(base)), ColorDirective::PerSeverity(extra)) => {
                    debug!(subject = %key, entries = extra.len(), "merging per-severity colors");
                    let mut table = base.clone();
                    table.extend(extra);
                    ColorDirective::PerSeverity(table)
                }
                (previous, directive) => {
                    if previous.is_some() {
                        debug!(subject = %key, "replacing default color directive");
                    }
                    directive
                }
            };
            subjects.insert(key, merged);
        }

        ColorConfig { subjects }
    }

    /// Color for `subject` at `severity`, or `None` when it stays uncolored.
    ///
    /// Severity is matched case-insensitively. A per-severity table missing
    /// both the severity and `default` yields `None`; this never fails.
    pub fn color_for(&self, subject: &str, severity: &str) -> Option<&str> {
        self.resolve(subject, &severity.to_lowercase(), 0)
    }

    fn resolve(&self, subject: &str, severity: &str, depth: usize) -> Option<&str> {
        match self.subjects.get(subject)? {
            ColorDirective::Literal(code) => Some(code.as_str()),
            ColorDirective::Alias(target) => {
                if depth >= MAX_ALIAS_DEPTH {
                    warn!(
                        subject,
                        alias = %target,
                        "color alias chain longer than {} hops, probably a cycle; leaving uncolored",
                        MAX_ALIAS_DEPTH
                    );
                    return None;
                }
                self.resolve(target, severity, depth + 1)
            }
            ColorDirective::PerSeverity(table) => table
                .get(severity)
                .or_else(|| table.get(DEFAULT_KEY))
                .map(String::as_str),
        }
    }

    /// Color `text` as configured for `subject` at `severity`
    pub fn color(&self, subject: &str, text: &str, severity: &str) -> String {
        color_text(self.color_for(subject, severity), text)
    }

    pub fn get(&self, subject: &str) -> Option<&ColorDirective> {
        self.subjects.get(subject)
    }

    pub fn subjects(&self) -> impl Iterator<Item = (&str, &ColorDirective)> {
        self.subjects.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

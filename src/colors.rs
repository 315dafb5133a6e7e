//! ANSI escape sequences and helpers for coloring terminal output.
//!
//! Plain foreground colors use `\x1b[3Xm` rather than `\x1b[0;3Xm` so they
//! can be combined with a background color: `\x1b[41m\x1b[34mtext\x1b[0m`
//! keeps the red background, the `0;` form would reset it.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub mod config;

pub use config::{ColorConfig, ColorDirective};

/// Reset all formatting. Appended after every colored text.
pub const RESET: &str = "\x1b[0m";

pub const BLACK: &str = "\x1b[30m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const PURPLE: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const WHITE: &str = "\x1b[37m";

pub const BOLD_RED: &str = "\x1b[1;31m";
pub const BOLD_GREEN: &str = "\x1b[1;32m";
pub const BOLD_YELLOW: &str = "\x1b[1;33m";
pub const BOLD_BLUE: &str = "\x1b[1;34m";
pub const BOLD_PURPLE: &str = "\x1b[1;35m";
pub const BOLD_CYAN: &str = "\x1b[1;36m";
pub const BOLD_WHITE: &str = "\x1b[1;37m";

pub const BG_BLACK: &str = "\x1b[40m";
pub const BG_RED: &str = "\x1b[41m";
pub const BG_GREEN: &str = "\x1b[42m";
pub const BG_YELLOW: &str = "\x1b[43m";
pub const BG_BLUE: &str = "\x1b[44m";
pub const BG_PURPLE: &str = "\x1b[45m";
pub const BG_CYAN: &str = "\x1b[46m";
pub const BG_WHITE: &str = "\x1b[47m";

/// Color names accepted in configuration files
static NAMED_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("reset", RESET);
    m.insert("black", BLACK);
    m.insert("red", RED);
    m.insert("green", GREEN);
    m.insert("yellow", YELLOW);
    m.insert("blue", BLUE);
    m.insert("purple", PURPLE);
    m.insert("magenta", PURPLE);
    m.insert("cyan", CYAN);
    m.insert("white", WHITE);
    m.insert("bold_red", BOLD_RED);
    m.insert("bold_green", BOLD_GREEN);
    m.insert("bold_yellow", BOLD_YELLOW);
    m.insert("bold_blue", BOLD_BLUE);
    m.insert("bold_purple", BOLD_PURPLE);
    m.insert("bold_cyan", BOLD_CYAN);
    m.insert("bold_white", BOLD_WHITE);
    m.insert("bg_black", BG_BLACK);
    m.insert("bg_red", BG_RED);
    m.insert("bg_green", BG_GREEN);
    m.insert("bg_yellow", BG_YELLOW);
    m.insert("bg_blue", BG_BLUE);
    m.insert("bg_purple", BG_PURPLE);
    m.insert("bg_cyan", BG_CYAN);
    m.insert("bg_white", BG_WHITE);
    m
});

/// Look up an escape sequence by its name (`red`, `bold_cyan`, `bg_blue`, ...)
pub fn by_name(name: &str) -> Option<&'static str> {
    NAMED_COLORS.get(name.to_lowercase().as_str()).copied()
}

/// Color `text` with `color`, followed by the standard reset sequence.
///
/// A `None` color returns the text untouched. This is plain concatenation:
/// nothing checks that `color` is a valid escape sequence, so callers can
/// pass whatever their terminal understands.
pub fn color_text(color: Option<&str>, text: &str) -> String {
    color_text_with_reset(color, text, RESET)
}

/// Same as [`color_text`] with a caller supplied reset sequence
pub fn color_text_with_reset(color: Option<&str>, text: &str, reset: &str) -> String {
    match color {
        None => text.to_string(),
        Some(color) => {
            let mut out = String::with_capacity(color.len() + text.len() + reset.len());
            out.push_str(color);
            out.push_str(text);
            out.push_str(reset);
            out
        }
    }
}

/// Palette used by the data renderers
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub key: &'static str,       // Cyan for field names
    pub separator: &'static str, // White for `=` / `:`
    pub string: &'static str,    // Yellow for strings
    pub number: &'static str,    // Blue for numbers
    pub boolean: &'static str,   // Green for true/false
    pub null: &'static str,      // Red for null
    pub reset: &'static str,
}

impl ColorScheme {
    /// Create the palette, or an all-empty one for undecorated output
    pub fn new(use_colors: bool) -> Self {
        if use_colors {
            Self {
                key: CYAN,
                separator: WHITE,
                string: YELLOW,
                number: BLUE,
                boolean: GREEN,
                null: RED,
                reset: RESET,
            }
        } else {
            Self {
                key: "",
                separator: "",
                string: "",
                number: "",
                boolean: "",
                null: "",
                reset: "",
            }
        }
    }

    /// Wrap `text` in `color` unless the palette is undecorated
    pub fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }
}

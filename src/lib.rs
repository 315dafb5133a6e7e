// src/lib.rs
pub mod colors;
pub mod config;
pub mod error;
pub mod formatters;
pub mod record;
pub mod severity;
pub mod stream;

pub use error::*;

pub use colors::{color_text, ColorConfig, ColorDirective};
pub use config::FormatterConfig;
pub use formatters::customizable::{
    data_format_with_renderer, default_data_format, default_err_format, default_msg_format,
    CustomizableFormatter,
};
pub use formatters::{renderer_by_name, DataRenderer};
pub use record::{ErrorInfo, LogRecord};
pub use severity::Severity;
pub use stream::{ErrorStrategy, LogStream, StreamStats};

// tests/customizable_tests.rs

use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use tintfmt::colors::{self, ColorConfig, ColorDirective};
use tintfmt::{
    default_err_format, default_msg_format, CustomizableFormatter, ErrorInfo, FormatterConfig,
    LogRecord,
};

fn time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn record(value: serde_json::Value) -> LogRecord {
    LogRecord::from_value(value).unwrap()
}

#[test]
fn test_message_line() {
    let format_msg = default_msg_format(Arc::new(ColorConfig::default()));
    let mut data = record(json!({"msg": "hello"}));
    let line = format_msg("INFO", "2024-01-01T00:00:00.000Z", None, &mut data);
    assert_eq!(
        line,
        format!("[2024-01-01T00:00:00.000Z] {}INFO{}: hello", colors::CYAN, colors::RESET)
    );
    assert!(data.is_empty());
}

#[test]
fn test_error_section() {
    let format_err = default_err_format(4);
    let mut data = record(json!({
        "msg": "m",
        "err": {"name": "DummyError", "message": "it is dummy.", "stack": "l1\n  l2"}
    }));
    let out = format_err(&mut data).unwrap();
    assert!(out.starts_with("  DummyError (it is dummy.):"));
    assert_eq!(out, "  DummyError (it is dummy.):\n    l1\n  l2");
    assert!(!data.contains_key("err"));
    assert!(data.contains_key("msg"));
}

#[test]
fn test_end_to_end_message_and_data() {
    let config = FormatterConfig {
        plain: true,
        ..FormatterConfig::default()
    };
    let formatter = CustomizableFormatter::from_config(&config).unwrap();
    let mut data = record(json!({"msg": "m", "status": 200}));

    let output = formatter.format("INFO", &time(), None, &mut data);
    assert_eq!(
        output,
        format!(
            "[2024-01-01T00:00:00.000Z] {}INFO{}: m\n{{\n    status: 200\n}}\n",
            colors::CYAN,
            colors::RESET
        )
    );
    assert!(!data.contains_key("msg"));
    assert_eq!(data.get("status"), Some(&json!(200)));
}

#[test]
fn test_end_to_end_excluded_data() {
    let config = FormatterConfig {
        excluded_fields: vec!["status".to_string()],
        ..FormatterConfig::default()
    };
    let formatter = CustomizableFormatter::from_config(&config).unwrap();
    let output = formatter.format("INFO", &time(), None, &mut record(json!({"msg": "m", "status": 200})));

    assert_eq!(output.lines().count(), 1);
    assert!(output.ends_with(": m\n"));
}

#[test]
fn test_end_to_end_with_error_and_custom_colors() {
    let config = FormatterConfig {
        colors: [
            ("datetime".to_string(), ColorDirective::literal(colors::BLUE)),
            ("msg".to_string(), ColorDirective::alias("severity")),
        ]
        .into_iter()
        .collect(),
        renderer: "logfmt".to_string(),
        plain: true,
        trace_indent: 2,
        ..FormatterConfig::default()
    };
    let formatter = CustomizableFormatter::from_config(&config).unwrap();
    let mut data = LogRecord::with_message("disk full");
    data.set_error(ErrorInfo::new("IoError", "write failed").with_stack("main.rs:10"));
    data.insert("path", "/var/log");

    let output = formatter.format("error", &time(), Some("app"), &mut data);
    let expected = format!(
        "[{blue}2024-01-01T00:00:00.000Z{reset}] {red}error{reset}: {red}disk full{reset}\n  IoError (write failed):\n  main.rs:10\npath=/var/log\n",
        blue = colors::BLUE,
        red = colors::RED,
        reset = colors::RESET
    );
    assert_eq!(output, expected);
}

#[test]
fn test_formatter_without_colors() {
    let formatter = CustomizableFormatter::new().with_color_config(ColorConfig::empty());
    let output = formatter.format("WARN", &time(), None, &mut LogRecord::with_message("plain"));
    assert_eq!(output, "[2024-01-01T00:00:00.000Z] WARN: plain\n");
    assert!(!output.contains("\x1b["));
}

#[test]
fn test_formatter_is_shareable() {
    let formatter = Arc::new(CustomizableFormatter::new().with_color_config(ColorConfig::empty()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let formatter = formatter.clone();
            std::thread::spawn(move || {
                let mut data = LogRecord::with_message(format!("worker {}", i));
                formatter.format("INFO", &time(), None, &mut data)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!("[2024-01-01T00:00:00.000Z] INFO: worker {}\n", i)
        );
    }
}

#[test]
fn test_null_error_prints_nothing() {
    let formatter = CustomizableFormatter::new().with_color_config(ColorConfig::empty());
    let mut data = record(json!({"msg": "m", "err": null}));
    let output = formatter.format("INFO", &time(), None, &mut data);
    assert_eq!(output, "[2024-01-01T00:00:00.000Z] INFO: m\n");
    assert!(data.is_empty());
}

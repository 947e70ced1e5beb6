//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, format_entry and DefaultLogger filtering.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::RenderGraph".to_string(),
        message: "compiled 3 composers".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_are_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
}

// ============================================================================
// FORMAT TESTS
// ============================================================================

#[test]
fn test_format_entry_without_location() {
    let text = format_entry(&entry(LogSeverity::Info, None, None));
    assert!(text.contains("[INFO ]"));
    assert!(text.contains("[galaxy3d::RenderGraph]"));
    assert!(text.ends_with("compiled 3 composers"));
}

#[test]
fn test_format_entry_with_location() {
    let text = format_entry(&entry(LogSeverity::Error, Some("render_graph.rs"), Some(42)));
    assert!(text.contains("[ERROR]"));
    assert!(text.ends_with("(render_graph.rs:42)"));
}

#[test]
fn test_format_entry_timestamp_shape() {
    let text = format_entry(&entry(LogSeverity::Debug, None, None));
    // [YYYY-MM-DD HH:MM:SS.mmm]
    let close = text.find(']').unwrap();
    assert_eq!(close, 24);
    assert_eq!(&text[11..12], " ");
    assert_eq!(&text[20..21], ".");
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_accepts_everything() {
    let logger = DefaultLogger::new();
    assert_eq!(logger.min_severity(), LogSeverity::Trace);
    assert!(logger.accepts(LogSeverity::Trace));
    assert!(logger.accepts(LogSeverity::Error));
}

#[test]
fn test_default_logger_min_severity() {
    let logger = DefaultLogger::with_min_severity(LogSeverity::Warn);
    assert!(!logger.accepts(LogSeverity::Debug));
    assert!(!logger.accepts(LogSeverity::Info));
    assert!(logger.accepts(LogSeverity::Warn));
    assert!(logger.accepts(LogSeverity::Error));
}

#[test]
fn test_default_logger_prints_without_panic() {
    let logger = DefaultLogger::default();
    logger.log(&entry(LogSeverity::Trace, None, None));
    logger.log(&entry(LogSeverity::Error, Some("x.rs"), Some(1)));
}

//! Unit tests for the Engine logging facade
//!
//! LOGGER is a global OnceLock shared across all tests, so every test that
//! installs a logger is marked #[serial].

use crate::galaxy3d::{Engine, Error};
use crate::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Logger capturing entries for verification
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == SOURCE {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

/// Tests outside this file log concurrently; only entries from this source count
const SOURCE: &str = "galaxy3d::engine_tests";

fn install_capture() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });
    entries
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_log_reaches_custom_logger() {
    let entries = install_capture();

    Engine::log(LogSeverity::Info, SOURCE, "hello".to_string());

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].source, SOURCE);
    assert_eq!(captured[0].message, "hello");
    assert!(captured[0].file.is_none());
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_log_detailed_carries_location() {
    let entries = install_capture();

    Engine::log_detailed(LogSeverity::Error, SOURCE, "boom".to_string(), "x.rs", 12);

    let captured = entries.lock().unwrap();
    assert_eq!(captured[0].file, Some("x.rs"));
    assert_eq!(captured[0].line, Some(12));
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_macros_route_through_engine() {
    let entries = install_capture();

    crate::engine_trace!(SOURCE, "t {}", 1);
    crate::engine_debug!(SOURCE, "d {}", 2);
    crate::engine_info!(SOURCE, "i {}", 3);
    crate::engine_warn!(SOURCE, "w {}", 4);
    crate::engine_error!(SOURCE, "e {}", 5);

    let captured = entries.lock().unwrap();
    let severities: Vec<LogSeverity> = captured.iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![LogSeverity::Trace, LogSeverity::Debug, LogSeverity::Info, LogSeverity::Warn, LogSeverity::Error]
    );
    assert_eq!(captured[4].message, "e 5");
    assert!(captured[4].line.is_some());
    drop(captured);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_bail_logs_error() {
    let entries = install_capture();

    fn fails() -> crate::galaxy3d::Result<()> {
        crate::engine_bail!(SOURCE => InvalidConfig, "exposure {}", -1.0);
    }

    assert_eq!(fails(), Err(Error::InvalidConfig("exposure -1".to_string())));
    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
    assert_eq!(captured[0].message, "exposure -1");
    drop(captured);

    Engine::reset_logger();
}

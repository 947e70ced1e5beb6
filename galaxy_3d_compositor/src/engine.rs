/// Galaxy3D Engine - global logging facade
///
/// The compositor itself has no global state beyond the logger: devices,
/// graphs and drivers are owned by the caller. The logger lives in a
/// `OnceLock<RwLock<..>>` so the logging macros can reach it from anywhere.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

// ===== PUBLIC API =====

/// Engine facade
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_compositor::galaxy3d::Engine;
/// use galaxy_3d_compositor::galaxy3d::log::{DefaultLogger, LogSeverity};
///
/// Engine::set_logger(DefaultLogger::with_min_severity(LogSeverity::Info));
/// ```
pub struct Engine;

impl Engine {
    /// Replace the global logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger, all severities)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger::new());
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by engine_trace!, engine_debug!, engine_info! and engine_warn!.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information
    ///
    /// Used by engine_error! (and therefore engine_bail! / engine_err!).
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

//! Integration tests for logging across the frame loop
//!
//! A capturing logger replaces the global one, so every test is serial.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests


use galaxy_3d_compositor::galaxy3d::{CompositorConfig, Engine};
use galaxy_3d_compositor::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use galaxy_3d_compositor::galaxy3d::render::DeviceConfig;
use galaxy_3d_compositor::galaxy3d::scene::Layer;
use glam::{Vec3, Vec4};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use test_utils::{create_driver, point_object};

const DRIVER_SOURCE: &str = "galaxy3d::FrameDriver";

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn install() -> Arc<Mutex<Vec<LogEntry>>> {
        let entries = Arc::new(Mutex::new(Vec::new()));
        Engine::set_logger(Self { entries: entries.clone() });
        entries
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn driver_entries(entries: &Arc<Mutex<Vec<LogEntry>>>, severity: LogSeverity) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.source == DRIVER_SOURCE && e.severity == severity)
        .cloned()
        .collect()
}

fn objects() -> Vec<galaxy_3d_compositor::galaxy3d::scene::SceneObject> {
    vec![point_object("star", Layer::Base, Vec3::ZERO, Vec4::ONE)]
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_start_logs_transition() {
    let entries = TestLogger::install();

    let mut harness = create_driver(CompositorConfig::default(), DeviceConfig::default(), 64, 64, objects()).unwrap();
    harness.driver.start().unwrap();

    let info = driver_entries(&entries, LogSeverity::Info);
    assert!(info.iter().any(|e| e.message.contains("SteadyLoop")), "{:?}", info);
    assert!(driver_entries(&entries, LogSeverity::Error).is_empty());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_degenerate_tick_logs_debug() {
    let entries = TestLogger::install();

    let mut harness = create_driver(CompositorConfig::default(), DeviceConfig::default(), 64, 64, objects()).unwrap();
    harness.driver.start().unwrap();
    harness.surface.set_client_size(0, 64);
    let report = harness.driver.tick().unwrap();
    assert!(!report.rendered);

    let debug = driver_entries(&entries, LogSeverity::Debug);
    assert!(debug.iter().any(|e| e.message.contains("skipped")), "{:?}", debug);
    assert!(driver_entries(&entries, LogSeverity::Warn).is_empty());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_out_of_memory_logs_error_with_location() {
    let entries = TestLogger::install();

    let device_config = DeviceConfig { memory_budget_bytes: 100 << 20, ..DeviceConfig::default() };
    let mut harness = create_driver(CompositorConfig::default(), device_config, 800, 600, objects()).unwrap();
    harness.driver.start().unwrap();
    harness.surface.set_client_size(1600, 900);
    assert!(harness.driver.tick().is_err());

    let errors = driver_entries(&entries, LogSeverity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("halting"));
    assert!(errors[0].file.is_some());
    assert!(errors[0].line.is_some());

    let info = driver_entries(&entries, LogSeverity::Info);
    assert!(info.iter().any(|e| e.message == "SteadyLoop -> Halted"));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_invalid_config_logged_by_config_source() {
    let entries = TestLogger::install();

    let mut config = CompositorConfig::default();
    config.bloom.radius = 2.0;
    assert!(create_driver(config, DeviceConfig::default(), 64, 64, objects()).is_err());

    let captured = entries.lock().unwrap();
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Error && e.source == "galaxy3d::Config"));
    drop(captured);

    Engine::reset_logger();
}

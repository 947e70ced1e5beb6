use glam::Vec3;
use crate::config::{CameraConfig, ControlsConfig};
use super::*;

fn still_controls() -> ControlsConfig {
    ControlsConfig {
        enable_damping: false,
        auto_rotate: false,
        ..ControlsConfig::default()
    }
}

fn default_camera() -> Camera {
    Camera::from_config(&CameraConfig::default())
}

fn polar_angle(camera: &Camera) -> f32 {
    let offset = camera.position() - camera.target();
    offset.angle_between(camera.up())
}

// ============================================================================
// Idle behaviour
// ============================================================================

#[test]
fn test_idle_controller_keeps_camera_still() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(still_controls());

    // First advance always reports motion
    assert!(controller.advance(&mut camera));
    let settled = camera.position();

    assert!(!controller.advance(&mut camera));
    assert!((camera.position() - settled).length() < 1e-3);
    assert!((camera.position() - Vec3::new(0.0, 500.0, 500.0)).length() < 1e-2);
}

#[test]
fn test_disabled_controller_does_nothing() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(ControlsConfig::default());
    controller.set_enabled(false);

    assert!(!controller.advance(&mut camera));
    assert_eq!(camera.position(), Vec3::new(0.0, 500.0, 500.0));
}

// ============================================================================
// Auto-rotate
// ============================================================================

#[test]
fn test_auto_rotate_moves_camera() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(ControlsConfig {
        enable_damping: false,
        auto_rotate: true,
        ..ControlsConfig::default()
    });

    controller.advance(&mut camera);
    let first = camera.position();
    assert!(controller.advance(&mut camera));
    let second = camera.position();

    assert!((first - second).length() > 1e-3);
    // Orbit around +Z keeps height and distance
    assert!((first.z - second.z).abs() < 1e-2);
    assert!((first.length() - second.length()).abs() < 1e-2);
}

#[test]
fn test_auto_rotation_angle() {
    let controller = OrbitController::new(ControlsConfig::default());
    let expected = std::f32::consts::TAU / 3600.0 * -2.0;
    assert!((controller.auto_rotation_angle() - expected).abs() < 1e-7);
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_max_distance_bound() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(still_controls());

    for _ in 0..500 {
        controller.dolly_out();
        controller.advance(&mut camera);
    }
    assert!(camera.distance_to_target() <= 16384.0 + 0.5);
    assert!(camera.distance_to_target() > 16000.0);
}

#[test]
fn test_min_distance_bound() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(still_controls());

    for _ in 0..500 {
        controller.dolly_in();
        controller.advance(&mut camera);
    }
    assert!(camera.distance_to_target() >= 1.0 - 1e-3);
    assert!(camera.distance_to_target() < 1.1);
}

#[test]
fn test_dolly_step() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(still_controls());
    let start = camera.distance_to_target();

    controller.dolly_in();
    controller.advance(&mut camera);

    assert!((camera.distance_to_target() - start * 0.95).abs() < 1e-2);
}

#[test]
fn test_max_polar_angle_bound() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(still_controls());
    let max_polar = controller.config().max_polar_angle;

    // Push toward the horizon and beyond
    controller.rotate_up(-3.0);
    controller.advance(&mut camera);

    let angle = polar_angle(&camera);
    assert!(angle <= max_polar + 1e-3);
    assert!(angle > max_polar - 1e-2);
}

#[test]
fn test_polar_angle_stays_off_the_pole() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(still_controls());

    controller.rotate_up(3.0);
    controller.advance(&mut camera);

    assert!(camera.position().is_finite());
    assert!(polar_angle(&camera) < 1e-2);
    // Still looking down at the target, never flipped past the pole
    assert!(camera.position().z > 700.0);
}

// ============================================================================
// Damping
// ============================================================================

#[test]
fn test_damping_decays_motion() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(ControlsConfig {
        auto_rotate: false,
        ..ControlsConfig::default()
    });
    controller.advance(&mut camera);

    controller.rotate_left(1.0);
    let mut previous = camera.position();
    let mut steps = Vec::new();
    for _ in 0..20 {
        controller.advance(&mut camera);
        steps.push((camera.position() - previous).length());
        previous = camera.position();
    }

    assert!(steps[0] > 0.0);
    for pair in steps.windows(2) {
        assert!(pair[1] < pair[0]);
    }

    // Eventually settles
    for _ in 0..2000 {
        controller.advance(&mut camera);
    }
    assert!(!controller.advance(&mut camera));
}

// ============================================================================
// Panning
// ============================================================================

#[test]
fn test_pan_moves_target_in_ground_plane() {
    let mut camera = default_camera();
    let mut controller = OrbitController::new(still_controls());
    controller.advance(&mut camera);

    controller.pan(&camera, 100.0, 50.0, 600.0);
    controller.advance(&mut camera);

    let target = camera.target();
    assert!(target.length() > 1.0);
    // Without screen-space panning the target stays orthogonal to up
    assert!(target.z.abs() < 1e-2);
    // Distance to target is preserved
    assert!((camera.distance_to_target() - Vec3::new(0.0, 500.0, 500.0).length()).abs() < 1e-1);
}

#[test]
fn test_pan_ignores_zero_height_viewport() {
    let camera = default_camera();
    let mut controller = OrbitController::new(still_controls());
    let mut moved = camera.clone();

    controller.pan(&camera, 100.0, 50.0, 0.0);
    controller.advance(&mut moved);
    assert!(moved.target().length() < 1e-6);
}

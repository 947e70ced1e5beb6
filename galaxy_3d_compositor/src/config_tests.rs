use glam::Vec3;
use crate::error::Error;
use super::*;

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_default_config_is_valid() {
    let config = CompositorConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_values() {
    let config = CompositorConfig::default();
    assert_eq!(config.bloom.threshold, 0.85);
    assert_eq!(config.bloom.strength, 1.5);
    assert_eq!(config.bloom.radius, 0.4);
    assert_eq!(config.tone_mapping.mode, ToneMapping::AcesFilmic);
    assert_eq!(config.tone_mapping.exposure, 0.5);
    assert_eq!(config.camera.fov_y_degrees, 60.0);
    assert_eq!(config.camera.position, Vec3::new(0.0, 500.0, 500.0));
    assert_eq!(config.camera.up, Vec3::Z);
    assert_eq!(config.controls.auto_rotate_speed, -2.0);
    assert_eq!(config.controls.max_distance, 16384.0);

    let fog = config.fog.unwrap();
    assert!((fog.density - 0.00003).abs() < 1e-9);
}

// ============================================================================
// Bloom validation
// ============================================================================

#[test]
fn test_bloom_threshold_bounds() {
    let mut bloom = BloomParams::default();
    bloom.threshold = 0.0;
    assert!(bloom.validate().is_ok());
    bloom.threshold = 1.0;
    assert!(bloom.validate().is_ok());
    bloom.threshold = 1.01;
    assert!(matches!(bloom.validate(), Err(Error::InvalidConfig(_))));
    bloom.threshold = -0.1;
    assert!(matches!(bloom.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_bloom_strength_and_radius() {
    let mut bloom = BloomParams::default();
    bloom.strength = -1.0;
    assert!(matches!(bloom.validate(), Err(Error::InvalidConfig(_))));

    let mut bloom = BloomParams::default();
    bloom.radius = 1.5;
    assert!(matches!(bloom.validate(), Err(Error::InvalidConfig(_))));

    let mut bloom = BloomParams::default();
    bloom.strength = f32::NAN;
    assert!(bloom.validate().is_err());
}

// ============================================================================
// Other sections
// ============================================================================

#[test]
fn test_exposure_must_be_positive() {
    let mut config = CompositorConfig::default();
    config.tone_mapping.exposure = 0.0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_camera_clip_range() {
    let mut config = CompositorConfig::default();
    config.camera.near = 10.0;
    config.camera.far = 1.0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_camera_position_equals_target() {
    let mut config = CompositorConfig::default();
    config.camera.position = config.camera.target;
    assert!(config.validate().is_err());
}

#[test]
fn test_controls_distance_bounds() {
    let mut config = CompositorConfig::default();
    config.controls.min_distance = 100.0;
    config.controls.max_distance = 10.0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_controls_damping_ignored_when_disabled() {
    let mut config = CompositorConfig::default();
    config.controls.damping_factor = 0.0;
    assert!(config.validate().is_err());
    config.controls.enable_damping = false;
    assert!(config.validate().is_ok());
}

#[test]
fn test_negative_fog_density() {
    let mut config = CompositorConfig::default();
    config.fog = Some(crate::scene::FogExp2::new(Vec3::ONE, -1.0));
    assert!(config.validate().is_err());
    config.fog = None;
    assert!(config.validate().is_ok());
}

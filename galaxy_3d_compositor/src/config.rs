//! Startup configuration
//!
//! Plain structs with defaults matching the galaxy viewer's session values.
//! Everything here is static for a session; `validate()` is called once by
//! the frame driver before any resource is created.

use glam::Vec3;
use crate::error::Result;
use crate::scene::FogExp2;

const SOURCE: &str = "galaxy3d::Config";

// ===== BLOOM =====

/// Bloom extraction and mixing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomParams {
    /// Luminance above which pixels start to glow, in [0, 1]
    pub threshold: f32,
    /// Overall glow multiplier, >= 0
    pub strength: f32,
    /// Spread across the mip chain, in [0, 1]
    pub radius: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            strength: 1.5,
            radius: 0.4,
        }
    }
}

impl BloomParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "bloom threshold {} outside [0, 1]", self.threshold);
        }
        if !(self.strength >= 0.0 && self.strength.is_finite()) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "bloom strength {} must be a finite value >= 0", self.strength);
        }
        if !(0.0..=1.0).contains(&self.radius) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "bloom radius {} outside [0, 1]", self.radius);
        }
        Ok(())
    }
}

// ===== TONE MAPPING =====

/// Operator applied by the composition pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneMapping {
    /// Linear, only scaled by exposure
    None,
    /// ACES filmic curve
    AcesFilmic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneMappingParams {
    pub mode: ToneMapping,
    /// Exposure multiplier, > 0
    pub exposure: f32,
    /// Encode the final color to sRGB
    pub output_srgb: bool,
}

impl Default for ToneMappingParams {
    fn default() -> Self {
        Self {
            mode: ToneMapping::AcesFilmic,
            exposure: 0.5,
            output_srgb: true,
        }
    }
}

impl ToneMappingParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.exposure > 0.0 && self.exposure.is_finite()) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "tone mapping exposure {} must be > 0", self.exposure);
        }
        Ok(())
    }
}

// ===== CAMERA =====

/// Initial perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub up: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 5_000_000.0,
            position: Vec3::new(0.0, 500.0, 500.0),
            up: Vec3::Z,
            target: Vec3::ZERO,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "camera fov {} outside (0, 180)", self.fov_y_degrees);
        }
        if !(self.near > 0.0 && self.far > self.near) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "camera clip range [{}, {}] requires 0 < near < far", self.near, self.far);
        }
        if self.up.length_squared() == 0.0 {
            crate::engine_bail!(SOURCE => InvalidConfig, "camera up vector is zero");
        }
        if (self.position - self.target).length_squared() == 0.0 {
            crate::engine_bail!(SOURCE => InvalidConfig, "camera position equals its target");
        }
        Ok(())
    }
}

// ===== CONTROLS =====

/// Orbit controller knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per tick, in (0, 1]
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// 2.0 is one turn every 30 seconds at 60 ticks per second
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Pan in screen space instead of the plane orthogonal to `up`
    pub screen_space_panning: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: true,
            auto_rotate_speed: -2.0,
            min_distance: 1.0,
            max_distance: 16384.0,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::FRAC_PI_2 - std::f32::consts::PI / 360.0,
            screen_space_panning: false,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

impl ControlsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enable_damping && !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "damping factor {} outside (0, 1]", self.damping_factor);
        }
        if !(self.min_distance >= 0.0 && self.max_distance >= self.min_distance) {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "distance bounds [{}, {}] are inverted", self.min_distance, self.max_distance);
        }
        if !(self.min_polar_angle >= 0.0
            && self.max_polar_angle <= std::f32::consts::PI
            && self.min_polar_angle <= self.max_polar_angle)
        {
            crate::engine_bail!(SOURCE => InvalidConfig,
                "polar bounds [{}, {}] outside [0, pi]", self.min_polar_angle, self.max_polar_angle);
        }
        Ok(())
    }
}

// ===== COMPOSITOR =====

/// Full session configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorConfig {
    pub bloom: BloomParams,
    pub tone_mapping: ToneMappingParams,
    /// Scene fog, `None` disables it
    pub fog: Option<FogExp2>,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            bloom: BloomParams::default(),
            tone_mapping: ToneMappingParams::default(),
            fog: Some(FogExp2::from_hex(0xebe2db, 0.00003)),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl CompositorConfig {
    /// Check every section, first violation wins
    pub fn validate(&self) -> Result<()> {
        self.bloom.validate()?;
        self.tone_mapping.validate()?;
        if let Some(fog) = &self.fog {
            if !(fog.density >= 0.0 && fog.density.is_finite()) {
                crate::engine_bail!(SOURCE => InvalidConfig,
                    "fog density {} must be >= 0", fog.density);
            }
        }
        self.camera.validate()?;
        self.controls.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

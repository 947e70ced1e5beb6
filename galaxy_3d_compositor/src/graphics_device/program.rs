//! Fullscreen programs
//!
//! Every post-process step is a fullscreen draw of one of these programs.
//! Backends implement the math; the shared helpers below keep kernel
//! weights and mix factors identical across backends.

use glam::{Vec2, Vec3};
use crate::config::ToneMapping;

/// Number of blur levels in the bloom mip chain
pub const BLOOM_MIP_COUNT: usize = 5;

/// Gaussian kernel radius per mip level (sigma = radius)
pub const BLOOM_KERNEL_RADII: [u32; BLOOM_MIP_COUNT] = [3, 5, 7, 9, 11];

/// Base contribution of each mip level before the radius adjustment
pub const BLOOM_FACTORS: [f32; BLOOM_MIP_COUNT] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// Width of the smoothstep ramp above the bloom threshold
pub const LUMINOSITY_SMOOTH_WIDTH: f32 = 0.01;

/// Sampler names of the composition program
pub const BASE_TEXTURE: &str = "baseTexture";
pub const BLOOM_TEXTURE: &str = "bloomTexture";
pub const OVERLAY_TEXTURE: &str = "overlayTexture";

const SOURCE_SAMPLERS: [&str; 1] = ["tDiffuse"];
const MIP_SAMPLERS: [&str; BLOOM_MIP_COUNT] =
    ["blurTexture1", "blurTexture2", "blurTexture3", "blurTexture4", "blurTexture5"];
const COMPOSITION_SAMPLERS: [&str; 3] = [BASE_TEXTURE, BLOOM_TEXTURE, OVERLAY_TEXTURE];

/// A fullscreen shader program with its uniforms
#[derive(Debug, Clone, PartialEq)]
pub enum FullscreenProgram {
    /// Copy the source, scaled by `opacity`
    Copy { opacity: f32 },

    /// Keep pixels whose luma exceeds `threshold`, fade others to transparent black
    LuminosityHighPass { threshold: f32, smooth_width: f32 },

    /// One direction of a separable Gaussian blur
    SeparableBlur { direction: Vec2, kernel_radius: u32 },

    /// Weighted sum of the blurred mip levels
    BloomMix {
        strength: f32,
        radius: f32,
        factors: [f32; BLOOM_MIP_COUNT],
        tints: [Vec3; BLOOM_MIP_COUNT],
    },

    /// Final blend of base, bloom and overlay images, tone mapped
    Composition {
        tone_mapping: ToneMapping,
        exposure: f32,
        output_srgb: bool,
    },
}

impl FullscreenProgram {
    pub fn bloom_mix(strength: f32, radius: f32) -> Self {
        FullscreenProgram::BloomMix {
            strength,
            radius,
            factors: BLOOM_FACTORS,
            tints: [Vec3::ONE; BLOOM_MIP_COUNT],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FullscreenProgram::Copy { .. } => "Copy",
            FullscreenProgram::LuminosityHighPass { .. } => "LuminosityHighPass",
            FullscreenProgram::SeparableBlur { .. } => "SeparableBlur",
            FullscreenProgram::BloomMix { .. } => "BloomMix",
            FullscreenProgram::Composition { .. } => "Composition",
        }
    }

    /// Sampler names, in the order inputs must be bound
    pub fn sampler_names(&self) -> &'static [&'static str] {
        match self {
            FullscreenProgram::Copy { .. }
            | FullscreenProgram::LuminosityHighPass { .. }
            | FullscreenProgram::SeparableBlur { .. } => &SOURCE_SAMPLERS,
            FullscreenProgram::BloomMix { .. } => &MIP_SAMPLERS,
            FullscreenProgram::Composition { .. } => &COMPOSITION_SAMPLERS,
        }
    }
}

/// Normalized one-sided Gaussian weights `w[0..radius]` with sigma = radius.
///
/// A blur tap at offset `i` (and `-i` for i > 0) uses `w[i]`; the weights
/// of all taps sum to 1.
pub fn gaussian_coefficients(kernel_radius: u32) -> Vec<f32> {
    let sigma = kernel_radius.max(1) as f32;
    let pdf = |x: f32| 0.39894 * (-0.5 * x * x / (sigma * sigma)).exp() / sigma;

    let mut weights: Vec<f32> = (0..kernel_radius.max(1)).map(|i| pdf(i as f32)).collect();
    let total = weights[0] + 2.0 * weights[1..].iter().sum::<f32>();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Mip contribution after spreading by `radius`
pub fn bloom_factor(factor: f32, radius: f32) -> f32 {
    let mirror = 1.2 - factor;
    factor + (mirror - factor) * radius
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;

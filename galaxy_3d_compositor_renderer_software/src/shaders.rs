/// Fullscreen program math, one function per fragment shader.
///
/// Colors are premultiplied RGBA in linear space until `compose()` encodes
/// the final frame.

use glam::{Mat3, Vec2, Vec3, Vec4};
use galaxy_3d_compositor::galaxy3d::ToneMapping;
use galaxy_3d_compositor::galaxy3d::render::{bloom_factor, BLOOM_MIP_COUNT};
use crate::sampler::Sampler;

const LUMA: Vec3 = Vec3::new(0.299, 0.587, 0.114);

// sRGB => XYZ => D65_2_D60 => AP1 => RRT_SAT
const ACES_INPUT: Mat3 = Mat3::from_cols_array(&[
    0.59719, 0.07600, 0.02840,
    0.35458, 0.90834, 0.13383,
    0.04823, 0.01566, 0.83777,
]);

// ODT_SAT => XYZ => D60_2_D65 => sRGB
const ACES_OUTPUT: Mat3 = Mat3::from_cols_array(&[
    1.60475, -0.10208, -0.00327,
    -0.53108, 1.10813, -0.07276,
    -0.07367, -0.00605, 1.07602,
]);

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Scale a texel by `opacity`
pub fn copy(texel: Vec4, opacity: f32) -> Vec4 {
    texel * opacity
}

/// Keep the texel if its luma is above `threshold`, fade to transparent black otherwise
pub fn luminosity_high_pass(texel: Vec4, threshold: f32, smooth_width: f32) -> Vec4 {
    let luma = texel.truncate().dot(LUMA);
    let alpha = smoothstep(threshold, threshold + smooth_width, luma);
    Vec4::ZERO.lerp(texel, alpha)
}

/// One tap direction of a separable Gaussian blur at `uv`.
///
/// `coefficients` come from `gaussian_coefficients()`, `texel_step` is the
/// offset of one tap in uv units. Output alpha is 1.
pub fn separable_blur(source: &Sampler, uv: Vec2, texel_step: Vec2, coefficients: &[f32]) -> Vec4 {
    let mut weight_sum = coefficients[0];
    let mut sum = source.sample(uv).truncate() * weight_sum;
    for (i, w) in coefficients.iter().enumerate().skip(1) {
        let offset = texel_step * i as f32;
        let a = source.sample(uv + offset).truncate();
        let b = source.sample(uv - offset).truncate();
        sum += (a + b) * *w;
        weight_sum += 2.0 * *w;
    }
    (sum / weight_sum).extend(1.0)
}

/// Weighted sum of the blurred mip levels
pub fn bloom_mix(
    blurred: &[Vec4; BLOOM_MIP_COUNT],
    strength: f32,
    radius: f32,
    factors: &[f32; BLOOM_MIP_COUNT],
    tints: &[Vec3; BLOOM_MIP_COUNT],
) -> Vec4 {
    let mut sum = Vec4::ZERO;
    for i in 0..BLOOM_MIP_COUNT {
        sum += bloom_factor(factors[i], radius) * tints[i].extend(1.0) * blurred[i];
    }
    strength * sum
}

/// Stephen Hill's RRT + ODT fit
fn rrt_and_odt_fit(v: Vec3) -> Vec3 {
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    a / b
}

/// ACES filmic tone mapping, output in [0, 1]
pub fn aces_filmic(color: Vec3, exposure: f32) -> Vec3 {
    // Curve is normalized so that exposure 0.6 is neutral
    let color = color * (exposure / 0.6);
    let color = ACES_OUTPUT * rrt_and_odt_fit(ACES_INPUT * color);
    color.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Linear to sRGB transfer function
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Final frame color from the three layer images
pub fn compose(
    base: Vec4,
    bloom: Vec4,
    overlay: Vec4,
    tone_mapping: ToneMapping,
    exposure: f32,
    output_srgb: bool,
) -> Vec4 {
    let hdr = base.truncate() + bloom.truncate();
    let rgb = hdr * (1.0 - overlay.w) + overlay.truncate();

    let rgb = match tone_mapping {
        ToneMapping::AcesFilmic => aces_filmic(rgb, exposure),
        ToneMapping::None => rgb.clamp(Vec3::ZERO, Vec3::ONE),
    };
    let rgb = if output_srgb {
        Vec3::new(linear_to_srgb(rgb.x), linear_to_srgb(rgb.y), linear_to_srgb(rgb.z))
    } else {
        rgb
    };
    rgb.extend(1.0)
}

#[cfg(test)]
#[path = "shaders_tests.rs"]
mod tests;

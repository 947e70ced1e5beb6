/// Texture types and trait

use std::any::Any;
use crate::error::Result;

// ===== TEXTURE FORMAT / USAGE =====

/// Pixel storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// 8-bit normalized, used by the presentable surface
    R8G8B8A8_UNORM,
    /// Full float, used by off-screen render targets (HDR)
    R32G32B32A32_SFLOAT,
}

impl TextureFormat {
    pub fn bytes_per_pixel(&self) -> u64 {
        match self {
            TextureFormat::R8G8B8A8_UNORM => 4,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
        }
    }
}

/// How a texture will be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureUsage {
    /// Only sampled by fullscreen programs
    Sampled,
    /// Only rendered into (the surface)
    RenderTarget,
    /// Rendered into by one pass, sampled by later ones
    SampledAndRenderTarget,
}

// ===== TEXTURE DESC =====

/// Texture creation descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Debug name (e.g. "bloom.rt0", "bloom.mip2.v")
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
}

impl TextureDesc {
    /// HDR off-screen target that can also be sampled
    pub fn render_target(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format: TextureFormat::R32G32B32A32_SFLOAT,
            usage: TextureUsage::SampledAndRenderTarget,
        }
    }

    pub fn size_in_bytes(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel()
    }
}

// ===== TEXTURE INFO =====

/// Texture properties, readable after creation
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            name: desc.name.clone(),
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
        }
    }
}

// ===== PIXEL DATA =====

/// CPU copy of a texture, RGBA float, row-major from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct PixelData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 4]>,
}

impl PixelData {
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>) -> Self {
        Self { width, height, pixels }
    }

    /// Pixel at (x, y), transparent black outside the image
    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        if x >= self.width || y >= self.height {
            return [0.0; 4];
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Largest RGB channel over the whole image
    pub fn max_rgb(&self) -> f32 {
        self.pixels
            .iter()
            .flat_map(|p| p[..3].iter().copied())
            .fold(0.0, f32::max)
    }

    /// Number of pixels with any RGB channel above `epsilon`
    pub fn lit_pixel_count(&self, epsilon: f32) -> usize {
        self.pixels
            .iter()
            .filter(|p| p[0] > epsilon || p[1] > epsilon || p[2] > epsilon)
            .count()
    }

    /// Quantize to 8-bit RGBA
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.iter().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }

    /// Raw float bytes (little endian f32 RGBA)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types.
pub trait Texture: Send + Sync {
    fn info(&self) -> &TextureInfo;

    /// Read the texture back to the CPU
    fn read_pixels(&self) -> Result<PixelData>;

    /// Backend downcast
    fn as_any(&self) -> &dyn Any;
}

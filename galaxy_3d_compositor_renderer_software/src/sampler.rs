/// Bilinear texture sampling with clamp-to-edge addressing

use glam::{Vec2, Vec4};

/// Read-only view of a texture's pixels
#[derive(Clone, Copy)]
pub struct Sampler<'a> {
    width: u32,
    height: u32,
    pixels: &'a [[f32; 4]],
}

impl<'a> Sampler<'a> {
    pub fn new(width: u32, height: u32, pixels: &'a [[f32; 4]]) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self { width, height, pixels }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texel at integer coordinates, clamped to the edges
    pub fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        Vec4::from_array(self.pixels[y * self.width as usize + x])
    }

    /// Filtered sample at normalized `uv` ((0,0) = top-left corner of the image)
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        top.lerp(bottom, fy)
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;

/// Bloom pass — extracts bright pixels, blurs them over a mip chain and
/// writes the glow (and only the glow) at full resolution.
///
/// Steps, all fullscreen draws:
/// 1. luminosity high-pass of the read buffer into a half-size target
/// 2. per mip level, horizontal then vertical Gaussian blur, each level
///    half the size of the previous one
/// 3. weighted mix of all levels into the write buffer

use glam::Vec2;
use crate::config::BloomParams;
use crate::error::Result;
use crate::graphics_device::{
    CommandList, FullscreenProgram, GraphicsDevice, TargetOps, Texture,
    BLOOM_KERNEL_RADII, BLOOM_MIP_COUNT, LUMINOSITY_SMOOTH_WIDTH,
};
use crate::engine_err;
use super::pass::{Pass, PassContext, PassIo};
use super::render_target::RenderTarget;
use std::sync::Arc;

const NAME: &str = "bloom";

struct MipLevel {
    horizontal: RenderTarget,
    vertical: RenderTarget,
}

pub struct BloomPass {
    params: BloomParams,
    bright: Option<RenderTarget>,
    mips: Vec<MipLevel>,
}

impl BloomPass {
    pub fn new(params: BloomParams) -> Self {
        Self {
            params,
            bright: None,
            mips: Vec::new(),
        }
    }

    pub fn params(&self) -> &BloomParams {
        &self.params
    }

    /// Sizes of the mip levels for a full-resolution size
    pub fn mip_sizes(width: u32, height: u32) -> [(u32, u32); BLOOM_MIP_COUNT] {
        let mut sizes = [(1, 1); BLOOM_MIP_COUNT];
        let (mut w, mut h) = (half(width), half(height));
        for size in sizes.iter_mut() {
            *size = (w, h);
            w = half(w);
            h = half(h);
        }
        sizes
    }

    /// (horizontal, vertical) textures of each mip level, empty before the first resize
    pub fn mip_textures(&self) -> Vec<(Arc<dyn Texture>, Arc<dyn Texture>)> {
        self.mips
            .iter()
            .map(|mip| (mip.horizontal.texture().clone(), mip.vertical.texture().clone()))
            .collect()
    }

    fn fullscreen(
        cmd: &mut dyn CommandList,
        target: &Arc<dyn Texture>,
        ops: &TargetOps,
        program: &FullscreenProgram,
        inputs: &[Arc<dyn Texture>],
    ) -> Result<()> {
        cmd.begin_render_pass(target, ops)?;
        cmd.draw_fullscreen(program, inputs)?;
        cmd.end_render_pass()
    }
}

/// Rounded half, at least one pixel
fn half(size: u32) -> u32 {
    ((size as f32 / 2.0).round() as u32).max(1)
}

impl Pass for BloomPass {
    fn name(&self) -> &str {
        NAME
    }

    fn needs_swap(&self) -> bool {
        true
    }

    fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<()> {
        let (bright_w, bright_h) = (half(width), half(height));
        self.bright = Some(match self.bright.take() {
            Some(bright) => bright.resize(device, bright_w, bright_h)?,
            None => RenderTarget::new(device, "bloom.bright", bright_w, bright_h, NAME)?,
        });

        let sizes = Self::mip_sizes(width, height);
        if self.mips.len() != sizes.len() {
            self.mips.clear();
            for (i, (w, h)) in sizes.iter().enumerate() {
                self.mips.push(MipLevel {
                    horizontal: RenderTarget::new(device, format!("bloom.mip{}.h", i), *w, *h, NAME)?,
                    vertical: RenderTarget::new(device, format!("bloom.mip{}.v", i), *w, *h, NAME)?,
                });
            }
        } else {
            for (mip, (w, h)) in std::mem::take(&mut self.mips).into_iter().zip(sizes.iter()) {
                let horizontal = mip.horizontal.resize(device, *w, *h)?;
                let vertical = mip.vertical.resize(device, *w, *h)?;
                self.mips.push(MipLevel { horizontal, vertical });
            }
        }

        crate::engine_debug!("galaxy3d::BloomPass",
            "Mip chain resized for {}x{} (bright {}x{})", width, height, bright_w, bright_h);
        Ok(())
    }

    fn render(&mut self, _ctx: &PassContext, cmd: &mut dyn CommandList, io: &PassIo) -> Result<()> {
        let bright = self.bright.as_ref().ok_or_else(|| {
            engine_err!("galaxy3d::BloomPass" => InvalidResource, "Bloom targets used before resize")
        })?;

        // 1. Extract bright areas
        Self::fullscreen(
            cmd,
            bright.texture(),
            bright.ops(),
            &FullscreenProgram::LuminosityHighPass {
                threshold: self.params.threshold,
                smooth_width: LUMINOSITY_SMOOTH_WIDTH,
            },
            &[io.read.clone()],
        )?;

        // 2. Blur chain
        let mut source = bright.texture().clone();
        for (mip, radius) in self.mips.iter().zip(BLOOM_KERNEL_RADII) {
            Self::fullscreen(
                cmd,
                mip.horizontal.texture(),
                mip.horizontal.ops(),
                &FullscreenProgram::SeparableBlur { direction: Vec2::X, kernel_radius: radius },
                &[source],
            )?;
            Self::fullscreen(
                cmd,
                mip.vertical.texture(),
                mip.vertical.ops(),
                &FullscreenProgram::SeparableBlur { direction: Vec2::Y, kernel_radius: radius },
                &[mip.horizontal.texture().clone()],
            )?;
            source = mip.vertical.texture().clone();
        }

        // 3. Mix the levels into the output
        let blurred: Vec<Arc<dyn Texture>> =
            self.mips.iter().map(|mip| mip.vertical.texture().clone()).collect();
        Self::fullscreen(
            cmd,
            io.write,
            &TargetOps::default(),
            &FullscreenProgram::bloom_mix(self.params.strength, self.params.radius),
            &blurred,
        )?;

        crate::engine_trace!("galaxy3d::BloomPass", "Glow written to '{}'", io.write.info().name);
        Ok(())
    }
}

#[cfg(test)]
#[path = "bloom_pass_tests.rs"]
mod tests;

/// Composition pass — blends the base image with the bloom and overlay
/// images produced by other composers, then tone maps.
///
/// Samplers: `baseTexture` is this composer's read buffer, `bloomTexture`
/// and `overlayTexture` are graph inputs. The result depends only on the
/// three images and the tone mapping parameters.

use crate::config::ToneMappingParams;
use crate::error::Result;
use crate::graphics_device::{
    CommandList, FullscreenProgram, TargetOps, BLOOM_TEXTURE, OVERLAY_TEXTURE,
};
use super::pass::{Pass, PassContext, PassIo};

pub struct CompositionPass {
    tone_mapping: ToneMappingParams,
}

impl CompositionPass {
    pub fn new(tone_mapping: ToneMappingParams) -> Self {
        Self { tone_mapping }
    }

    pub fn program(&self) -> FullscreenProgram {
        FullscreenProgram::Composition {
            tone_mapping: self.tone_mapping.mode,
            exposure: self.tone_mapping.exposure,
            output_srgb: self.tone_mapping.output_srgb,
        }
    }
}

impl Pass for CompositionPass {
    fn name(&self) -> &str {
        "composition"
    }

    fn needs_swap(&self) -> bool {
        true
    }

    fn render(&mut self, ctx: &PassContext, cmd: &mut dyn CommandList, io: &PassIo) -> Result<()> {
        let inputs = [
            io.read.clone(),
            ctx.input(BLOOM_TEXTURE)?.clone(),
            ctx.input(OVERLAY_TEXTURE)?.clone(),
        ];

        let ops = TargetOps {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            ..TargetOps::default()
        };
        cmd.begin_render_pass(io.write, &ops)?;
        cmd.draw_fullscreen(&self.program(), &inputs)?;
        cmd.end_render_pass()
    }
}

/// Copy pass — copies the read buffer into the write buffer (or surface).
pub struct CopyPass {
    opacity: f32,
}

impl CopyPass {
    pub fn new() -> Self {
        Self { opacity: 1.0 }
    }

    pub fn with_opacity(opacity: f32) -> Self {
        Self { opacity }
    }
}

impl Default for CopyPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CopyPass {
    fn name(&self) -> &str {
        "copy"
    }

    fn needs_swap(&self) -> bool {
        true
    }

    fn render(&mut self, _ctx: &PassContext, cmd: &mut dyn CommandList, io: &PassIo) -> Result<()> {
        cmd.begin_render_pass(io.write, &TargetOps::default())?;
        cmd.draw_fullscreen(&FullscreenProgram::Copy { opacity: self.opacity }, &[io.read.clone()])?;
        cmd.end_render_pass()
    }
}

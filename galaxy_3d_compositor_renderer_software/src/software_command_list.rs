/// CommandList - software implementation of the CommandList trait

use std::any::Any;
use std::sync::Arc;
use glam::Mat4;
use galaxy_3d_compositor::galaxy3d::{Error, Result};
use galaxy_3d_compositor::galaxy3d::render::{
    CommandList as RendererCommandList,
    FullscreenProgram, PointBatch, TargetOps, Texture,
};
use galaxy_3d_compositor::galaxy3d::scene::{BlendMode, FogExp2, PointSprite};
use galaxy_3d_compositor::engine_error;

use crate::software_texture::as_software;

/// Owned copy of a `PointBatch`
pub(crate) struct PointDraw {
    pub points: Vec<PointSprite>,
    pub model_view: Mat4,
    pub projection: Mat4,
    pub blend: BlendMode,
    pub size_attenuation: bool,
    pub fog: Option<FogExp2>,
    pub pixel_ratio: f32,
}

impl PointDraw {
    pub fn as_batch(&self) -> PointBatch<'_> {
        PointBatch {
            points: &self.points,
            model_view: self.model_view,
            projection: self.projection,
            blend: self.blend,
            size_attenuation: self.size_attenuation,
            fog: self.fog,
            pixel_ratio: self.pixel_ratio,
        }
    }
}

pub(crate) enum Command {
    BeginRenderPass { target: Arc<dyn Texture>, ops: TargetOps },
    EndRenderPass,
    DrawPoints(PointDraw),
    DrawFullscreen { program: FullscreenProgram, inputs: Vec<Arc<dyn Texture>> },
}

/// Software command list
///
/// Records commands; `SoftwareGraphicsDevice::submit()` executes them.
/// Structural mistakes (draw outside a render pass, a program sampling its
/// own target, foreign textures) are rejected while recording.
pub struct CommandList {
    commands: Vec<Command>,
    is_recording: bool,
    /// Target of the open render pass
    current_target: Option<Arc<dyn Texture>>,
}

impl CommandList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            is_recording: false,
            current_target: None,
        }
    }

    pub(crate) fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    fn check_recording(&self) -> Result<()> {
        if !self.is_recording {
            engine_error!("galaxy3d::software", "Command list not recording");
            return Err(Error::BackendError("Command list not recording".to_string()));
        }
        Ok(())
    }

    fn check_in_render_pass(&self, what: &str) -> Result<&Arc<dyn Texture>> {
        self.check_recording()?;
        self.current_target.as_ref().ok_or_else(|| {
            engine_error!("galaxy3d::software", "{} outside of a render pass", what);
            Error::BackendError(format!("{} outside of a render pass", what))
        })
    }
}

impl Default for CommandList {
    fn default() -> Self {
        Self::new()
    }
}

/// Same underlying texture, ignoring trait object metadata
pub(crate) fn same_texture(a: &Arc<dyn Texture>, b: &Arc<dyn Texture>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl RendererCommandList for CommandList {
    fn begin(&mut self) -> Result<()> {
        self.commands.clear();
        self.current_target = None;
        self.is_recording = true;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.check_recording()?;
        if let Some(target) = &self.current_target {
            engine_error!("galaxy3d::software", "Render pass on '{}' never ended", target.info().name);
            return Err(Error::BackendError("Render pass still open at end()".to_string()));
        }
        self.is_recording = false;
        Ok(())
    }

    fn begin_render_pass(&mut self, target: &Arc<dyn Texture>, ops: &TargetOps) -> Result<()> {
        self.check_recording()?;
        if self.current_target.is_some() {
            engine_error!("galaxy3d::software", "Nested render pass on '{}'", target.info().name);
            return Err(Error::BackendError("Render pass already open".to_string()));
        }
        as_software(target)?;

        self.current_target = Some(target.clone());
        self.commands.push(Command::BeginRenderPass { target: target.clone(), ops: *ops });
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.check_in_render_pass("end_render_pass")?;
        self.current_target = None;
        self.commands.push(Command::EndRenderPass);
        Ok(())
    }

    fn draw_points(&mut self, batch: &PointBatch) -> Result<()> {
        self.check_in_render_pass("draw_points")?;
        self.commands.push(Command::DrawPoints(PointDraw {
            points: batch.points.to_vec(),
            model_view: batch.model_view,
            projection: batch.projection,
            blend: batch.blend,
            size_attenuation: batch.size_attenuation,
            fog: batch.fog,
            pixel_ratio: batch.pixel_ratio,
        }));
        Ok(())
    }

    fn draw_fullscreen(&mut self, program: &FullscreenProgram, inputs: &[Arc<dyn Texture>]) -> Result<()> {
        let target = self.check_in_render_pass("draw_fullscreen")?;

        let expected = program.sampler_names().len();
        if inputs.len() != expected {
            engine_error!("galaxy3d::software", "{} expects {} inputs, got {}",
                program.name(), expected, inputs.len());
            return Err(Error::InvalidResource(format!(
                "{} expects {} inputs, got {}", program.name(), expected, inputs.len())));
        }
        for input in inputs {
            as_software(input)?;
            if same_texture(input, target) {
                engine_error!("galaxy3d::software", "{} samples its own target '{}'",
                    program.name(), target.info().name);
                return Err(Error::InvalidResource(format!(
                    "feedback loop on '{}'", target.info().name)));
            }
        }

        self.commands.push(Command::DrawFullscreen { program: program.clone(), inputs: inputs.to_vec() });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

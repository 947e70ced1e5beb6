/// Command list trait and draw descriptions

use std::any::Any;
use std::sync::Arc;
use glam::Mat4;
use crate::error::Result;
use crate::scene::{BlendMode, FogExp2, PointSprite};
use super::{FullscreenProgram, Texture};

/// What happens to a target's previous content when a render pass begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    /// Keep previous content
    Load,
    /// Fill with the clear color
    Clear,
    /// Content is fully overwritten
    DontCare,
}

/// Render pass begin operations for one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetOps {
    pub load_op: LoadOp,
    /// Premultiplied RGBA
    pub clear_color: [f32; 4],
}

impl Default for TargetOps {
    fn default() -> Self {
        Self {
            load_op: LoadOp::Clear,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// One batch of point sprites to draw
#[derive(Debug, Clone)]
pub struct PointBatch<'a> {
    pub points: &'a [PointSprite],
    /// Object-to-view transform (view * world)
    pub model_view: Mat4,
    pub projection: Mat4,
    pub blend: BlendMode,
    /// Shrink sprites with distance
    pub size_attenuation: bool,
    pub fog: Option<FogExp2>,
    /// Physical pixels per logical pixel
    pub pixel_ratio: f32,
}

/// Command recording interface
///
/// Commands are recorded between `begin()` and `end()`, then executed by
/// `GraphicsDevice::submit()`. Draw commands must be inside a render pass.
pub trait CommandList: Send + Sync {
    fn begin(&mut self) -> Result<()>;

    fn end(&mut self) -> Result<()>;

    /// Start rendering into `target`
    fn begin_render_pass(&mut self, target: &Arc<dyn Texture>, ops: &TargetOps) -> Result<()>;

    fn end_render_pass(&mut self) -> Result<()>;

    fn draw_points(&mut self, batch: &PointBatch) -> Result<()>;

    /// Run a fullscreen program over the current target.
    ///
    /// `inputs` are bound in the order of `program.sampler_names()`.
    fn draw_fullscreen(&mut self, program: &FullscreenProgram, inputs: &[Arc<dyn Texture>]) -> Result<()>;

    /// Backend downcast
    fn as_any(&self) -> &dyn Any;
}

/// Pass trait and per-render context.
///
/// A pass records its commands into the composer's command list. It reads
/// the composer's read buffer and/or graph inputs and writes either the
/// write buffer or, for the final pass of a surface composer, the surface.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_device::{CommandList, GraphicsDevice, Texture};
use crate::scene::{LayerMask, Scene};

/// Per-frame state shared by every composer in a tick
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    /// Physical pixels per logical pixel
    pub pixel_ratio: f32,
    pub tick: u64,
}

/// Everything a pass can see while rendering
pub struct PassContext<'a> {
    pub frame: FrameContext<'a>,
    /// Exactly the executing composer's layer
    pub layer_mask: LayerMask,
    /// Images produced by upstream composers, by sampler name
    pub inputs: &'a FxHashMap<String, Arc<dyn Texture>>,
}

impl<'a> PassContext<'a> {
    pub fn scene(&self) -> &'a Scene {
        self.frame.scene
    }

    pub fn camera(&self) -> &'a Camera {
        self.frame.camera
    }

    /// Graph input by sampler name
    pub fn input(&self, sampler: &str) -> Result<&Arc<dyn Texture>> {
        self.inputs.get(sampler).ok_or_else(|| {
            crate::engine_err!("galaxy3d::PassContext" => InvalidGraph,
                "Input '{}' is not connected", sampler)
        })
    }
}

/// Ping-pong buffers seen by one pass
pub struct PassIo<'a> {
    pub read: &'a Arc<dyn Texture>,
    /// Write buffer, or the surface when `to_surface` is set
    pub write: &'a Arc<dyn Texture>,
    pub to_surface: bool,
}

/// A step of a pass composer
pub trait Pass: Send + Sync {
    fn name(&self) -> &str;

    /// Swap read and write buffers after this pass
    fn needs_swap(&self) -> bool;

    /// Recreate size-dependent resources (physical pixels)
    fn resize(&mut self, _device: &mut dyn GraphicsDevice, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn render(&mut self, ctx: &PassContext, cmd: &mut dyn CommandList, io: &PassIo) -> Result<()>;
}

/// Off-screen render target owned by a pass composer or a pass.
///
/// Wraps a device texture with its descriptor and clear configuration.
/// A target is written by a single owner and may be read by many
/// (later passes, other composers through graph inputs). On resize the
/// texture is released first, then replaced by a new one; pixels are not
/// carried over.

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, TargetOps, Texture, TextureDesc};

pub struct RenderTarget {
    /// Device texture
    texture: Arc<dyn Texture>,
    /// Descriptor used to (re)create the texture
    desc: TextureDesc,
    /// Load/clear configuration applied when a pass begins on this target
    ops: TargetOps,
    /// Name of the composer or pass that writes this target
    written_by: String,
}

impl RenderTarget {
    /// Allocate an HDR target on the device
    pub fn new(
        device: &mut dyn GraphicsDevice,
        name: impl Into<String>,
        width: u32,
        height: u32,
        written_by: &str,
    ) -> Result<Self> {
        let desc = TextureDesc::render_target(name, width, height);
        let texture = device.create_texture(desc.clone())?;
        Ok(Self {
            texture,
            desc,
            ops: TargetOps::default(),
            written_by: written_by.to_string(),
        })
    }

    pub fn texture(&self) -> &Arc<dyn Texture> {
        &self.texture
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    pub fn ops(&self) -> &TargetOps {
        &self.ops
    }

    pub fn written_by(&self) -> &str {
        &self.written_by
    }

    /// Release the texture, then allocate one of the new size. No-op if unchanged.
    ///
    /// Consumes the target so the old texture is gone before the device
    /// checks its memory budget for the new one.
    pub fn resize(self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<Self> {
        if self.desc.width == width && self.desc.height == height {
            return Ok(self);
        }
        let RenderTarget { texture, mut desc, ops, written_by } = self;
        drop(texture);

        desc.width = width;
        desc.height = height;
        let texture = device.create_texture(desc.clone())?;
        crate::engine_trace!("galaxy3d::RenderTarget",
            "'{}' of '{}' recreated at {}x{}", desc.name, written_by, width, height);
        Ok(Self { texture, desc, ops, written_by })
    }
}

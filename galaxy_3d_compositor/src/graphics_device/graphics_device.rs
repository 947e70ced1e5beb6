/// Main graphics device trait and device configuration

use std::sync::Arc;
use crate::error::Result;
use super::{CommandList, Texture, TextureDesc};

/// Graphics device configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub app_name: String,
    /// Enable backend validation (extra checks on recorded commands)
    pub enable_validation: bool,
    /// Largest accepted texture width or height
    pub max_texture_dimension: u32,
    /// Total bytes all live textures may occupy
    pub memory_budget_bytes: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            app_name: "Galaxy3D Application".to_string(),
            enable_validation: cfg!(debug_assertions),
            max_texture_dimension: 8192,
            memory_budget_bytes: 1 << 30,
        }
    }
}

/// Device statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Frames presented
    pub frames: u64,
    pub render_passes: u64,
    pub draw_calls: u64,
    pub points_drawn: u64,
    /// Bytes held by live textures
    pub texture_memory_bytes: u64,
}

/// Graphics device trait
///
/// Owns the presentable surface and creates every other GPU resource.
pub trait GraphicsDevice: Send + Sync {
    /// Create a texture.
    ///
    /// # Errors
    ///
    /// `InvalidResource` for zero or oversized dimensions, `OutOfMemory`
    /// when the memory budget would be exceeded.
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    fn create_command_list(&self) -> Result<Box<dyn CommandList>>;

    /// Execute a recorded command list
    fn submit(&mut self, commands: &dyn CommandList) -> Result<()>;

    fn begin_frame(&mut self) -> Result<()>;

    /// Present the surface
    fn end_frame(&mut self) -> Result<()>;

    /// Current presentable surface. Replaced by `resize_surface()`.
    fn surface(&self) -> Arc<dyn Texture>;

    /// Surface size in physical pixels
    fn surface_size(&self) -> (u32, u32);

    /// Recreate the surface at a new size
    fn resize_surface(&mut self, width: u32, height: u32) -> Result<()>;

    fn stats(&self) -> DeviceStats;
}

/// Texture - software implementation of the Texture trait

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use galaxy_3d_compositor::galaxy3d::{Error, Result};
use galaxy_3d_compositor::galaxy3d::render::{
    PixelData, Texture as RendererTexture, TextureFormat, TextureInfo,
};
use galaxy_3d_compositor::engine_error;

/// CPU texture: RGBA f32 premultiplied pixels, row-major from the top-left.
///
/// 8-bit surfaces keep float storage but are quantized at the end of every
/// render pass, so readback matches what a UNORM image would hold.
pub struct Texture {
    info: TextureInfo,
    pixels: RwLock<Vec<[f32; 4]>>,
    /// Device-wide live texture bytes (decremented on drop)
    memory: Arc<AtomicU64>,
    size_in_bytes: u64,
}

impl Texture {
    pub(crate) fn new(info: TextureInfo, memory: Arc<AtomicU64>) -> Self {
        let size_in_bytes = info.width as u64 * info.height as u64 * info.format.bytes_per_pixel();
        memory.fetch_add(size_in_bytes, Ordering::Relaxed);
        Self {
            pixels: RwLock::new(vec![[0.0; 4]; info.width as usize * info.height as usize]),
            info,
            memory,
            size_in_bytes,
        }
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    /// Bytes counted against the device budget while alive
    pub fn size_in_bytes(&self) -> u64 {
        self.size_in_bytes
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Vec<[f32; 4]>>> {
        self.pixels.read().map_err(|_| self.poisoned())
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<[f32; 4]>>> {
        self.pixels.write().map_err(|_| self.poisoned())
    }

    /// Round every channel to the nearest 8-bit value (UNORM formats only)
    pub(crate) fn quantize(&self) -> Result<()> {
        if self.info.format != TextureFormat::R8G8B8A8_UNORM {
            return Ok(());
        }
        for pixel in self.write()?.iter_mut() {
            for c in pixel.iter_mut() {
                *c = (c.clamp(0.0, 1.0) * 255.0).round() / 255.0;
            }
        }
        Ok(())
    }

    fn poisoned(&self) -> Error {
        engine_error!("galaxy3d::software", "Pixel lock of '{}' poisoned", self.info.name);
        Error::BackendError(format!("pixel lock of '{}' poisoned", self.info.name))
    }
}

impl RendererTexture for Texture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn read_pixels(&self) -> Result<PixelData> {
        let pixels = self.read()?;
        Ok(PixelData::new(self.info.width, self.info.height, pixels.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.memory.fetch_sub(self.size_in_bytes, Ordering::Relaxed);
    }
}

/// Downcast a trait object to the software texture
pub(crate) fn as_software(texture: &Arc<dyn RendererTexture>) -> Result<&Texture> {
    texture.as_any().downcast_ref::<Texture>().ok_or_else(|| {
        engine_error!("galaxy3d::software", "Texture '{}' does not belong to the software backend",
            texture.info().name);
        Error::InvalidResource(format!("texture '{}' is not a software texture", texture.info().name))
    })
}

/// Viewport and projection manager.
///
/// Keeps the device surface sized like the host surface and the camera's
/// aspect ratio equal to width / height. Zero-sized surfaces (minimized
/// windows, collapsed layouts) are left alone: nothing is resized and the
/// projection is not touched.

use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use super::HostSurface;

/// Displayed size, pixel ratio and derived aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width
    pub width: u32,
    /// Logical height
    pub height: u32,
    pub pixel_ratio: f32,
    /// width / height, kept from the last non-degenerate size
    pub aspect_ratio: f32,
}

impl Viewport {
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Physical drawing buffer size
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        drawing_buffer_size(self.width, self.height, self.pixel_ratio)
    }
}

fn drawing_buffer_size(width: u32, height: u32, pixel_ratio: f32) -> (u32, u32) {
    (
        (width as f32 * pixel_ratio).round() as u32,
        (height as f32 * pixel_ratio).round() as u32,
    )
}

pub struct ViewportManager {
    viewport: Viewport,
}

impl ViewportManager {
    pub fn new() -> Self {
        Self {
            viewport: Viewport {
                width: 0,
                height: 0,
                pixel_ratio: 1.0,
                aspect_ratio: 1.0,
            },
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Read the host surface and resize the device surface if the drawing
    /// buffer changed. Returns true when a resize happened.
    ///
    /// # Errors
    ///
    /// Whatever `resize_surface()` returns (typically `OutOfMemory`).
    pub fn check_resize(&mut self, surface: &dyn HostSurface, device: &mut dyn GraphicsDevice) -> Result<bool> {
        let (width, height) = surface.client_size();
        let pixel_ratio = surface.pixel_ratio();
        self.viewport.width = width;
        self.viewport.height = height;
        self.viewport.pixel_ratio = pixel_ratio;

        if self.viewport.is_degenerate() {
            crate::engine_debug!("galaxy3d::ViewportManager", "Degenerate surface {}x{}, resize skipped", width, height);
            return Ok(false);
        }

        let buffer = self.viewport.drawing_buffer_size();
        if buffer.0 == 0 || buffer.1 == 0 || buffer == device.surface_size() {
            return Ok(false);
        }

        device.resize_surface(buffer.0, buffer.1)?;
        crate::engine_info!("galaxy3d::ViewportManager",
            "Surface resized to {}x{} ({}x{} at ratio {})", buffer.0, buffer.1, width, height, pixel_ratio);
        Ok(true)
    }

    /// Recompute the aspect ratio and the camera projection.
    ///
    /// Returns false (and changes nothing) for a degenerate viewport.
    pub fn update_projection(&mut self, camera: &mut Camera) -> bool {
        if self.viewport.is_degenerate() {
            return false;
        }
        self.viewport.aspect_ratio = self.viewport.width as f32 / self.viewport.height as f32;
        camera.set_aspect(self.viewport.aspect_ratio);
        camera.update_projection_matrix();
        true
    }
}

impl Default for ViewportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;

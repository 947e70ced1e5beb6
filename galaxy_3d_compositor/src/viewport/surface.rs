/// Host surface — where the composited frame is displayed.
///
/// The compositor only needs two facts from its host every tick: the
/// displayed size in logical units and the device pixel ratio.

use std::sync::atomic::{AtomicU32, Ordering};

/// Queryable display surface
pub trait HostSurface {
    /// Displayed size in logical units
    fn client_size(&self) -> (u32, u32);

    /// Physical pixels per logical unit
    fn pixel_ratio(&self) -> f32;
}

impl HostSurface for winit::window::Window {
    fn client_size(&self) -> (u32, u32) {
        let logical: winit::dpi::LogicalSize<u32> = self.inner_size().to_logical(self.scale_factor());
        (logical.width, logical.height)
    }

    fn pixel_ratio(&self) -> f32 {
        self.scale_factor() as f32
    }
}

/// Surface without a window (tests, offline rendering)
///
/// Size and ratio can be changed through a shared reference, so a test can
/// keep a handle while the frame driver owns the surface.
pub struct HeadlessSurface {
    width: AtomicU32,
    height: AtomicU32,
    pixel_ratio_bits: AtomicU32,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pixel_ratio(width, height, 1.0)
    }

    pub fn with_pixel_ratio(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width: AtomicU32::new(width),
            height: AtomicU32::new(height),
            pixel_ratio_bits: AtomicU32::new(pixel_ratio.to_bits()),
        }
    }

    pub fn set_client_size(&self, width: u32, height: u32) {
        self.width.store(width, Ordering::Relaxed);
        self.height.store(height, Ordering::Relaxed);
    }

    pub fn set_pixel_ratio(&self, pixel_ratio: f32) {
        self.pixel_ratio_bits.store(pixel_ratio.to_bits(), Ordering::Relaxed);
    }
}

impl HostSurface for HeadlessSurface {
    fn client_size(&self) -> (u32, u32) {
        (self.width.load(Ordering::Relaxed), self.height.load(Ordering::Relaxed))
    }

    fn pixel_ratio(&self) -> f32 {
        f32::from_bits(self.pixel_ratio_bits.load(Ordering::Relaxed))
    }
}

/// Mock graphics device for unit tests (no pixels)
///
/// Records every submitted command in a shared log. Each texture carries a
/// write stamp: the frame index of the last render pass that targeted it,
/// so tests can check which frame produced the images a program sampled.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use crate::error::Result;
use crate::scene::BlendMode;
use super::{
    CommandList, DeviceStats, FullscreenProgram, GraphicsDevice, LoadOp, PixelData,
    PointBatch, TargetOps, Texture, TextureDesc, TextureFormat, TextureInfo, TextureUsage,
};

const NEVER_WRITTEN: u64 = u64::MAX;

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub info: TextureInfo,
    stamp: AtomicU64,
}

impl MockTexture {
    pub fn new(info: TextureInfo) -> Self {
        Self {
            info,
            stamp: AtomicU64::new(NEVER_WRITTEN),
        }
    }

    /// Frame index of the last write, `None` if never written
    pub fn stamp(&self) -> Option<u64> {
        match self.stamp.load(Ordering::Relaxed) {
            NEVER_WRITTEN => None,
            frame => Some(frame),
        }
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn read_pixels(&self) -> Result<PixelData> {
        let count = (self.info.width * self.info.height) as usize;
        Ok(PixelData::new(self.info.width, self.info.height, vec![[0.0; 4]; count]))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn stamp_of(texture: &Arc<dyn Texture>) -> Option<u64> {
    texture.as_any().downcast_ref::<MockTexture>().and_then(|t| t.stamp())
}

// ============================================================================
// Submitted command log
// ============================================================================

/// A command as executed by the mock device
#[derive(Debug, Clone, PartialEq)]
pub enum MockCommand {
    BeginRenderPass { target: String, load_op: LoadOp, frame: u64 },
    EndRenderPass,
    DrawPoints { count: usize, blend: BlendMode },
    /// Inputs as (texture name, write stamp at execution time)
    DrawFullscreen { program: &'static str, inputs: Vec<(String, Option<u64>)> },
}

enum Recorded {
    BeginRenderPass { target: Arc<dyn Texture>, ops: TargetOps },
    EndRenderPass,
    DrawPoints { count: usize, blend: BlendMode },
    DrawFullscreen { program: &'static str, inputs: Vec<Arc<dyn Texture>> },
}

// ============================================================================
// Mock Command List
// ============================================================================

pub struct MockCommandList {
    commands: Vec<Recorded>,
    recording: bool,
    in_render_pass: bool,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            recording: false,
            in_render_pass: false,
        }
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        self.commands.clear();
        self.recording = true;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        if self.in_render_pass {
            crate::engine_bail!("galaxy3d::MockCommandList", "end() inside a render pass");
        }
        self.recording = false;
        Ok(())
    }

    fn begin_render_pass(&mut self, target: &Arc<dyn Texture>, ops: &TargetOps) -> Result<()> {
        if !self.recording || self.in_render_pass {
            crate::engine_bail!("galaxy3d::MockCommandList", "begin_render_pass() out of order");
        }
        self.in_render_pass = true;
        self.commands.push(Recorded::BeginRenderPass { target: target.clone(), ops: *ops });
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        if !self.in_render_pass {
            crate::engine_bail!("galaxy3d::MockCommandList", "end_render_pass() without begin");
        }
        self.in_render_pass = false;
        self.commands.push(Recorded::EndRenderPass);
        Ok(())
    }

    fn draw_points(&mut self, batch: &PointBatch) -> Result<()> {
        if !self.in_render_pass {
            crate::engine_bail!("galaxy3d::MockCommandList", "draw_points() outside a render pass");
        }
        self.commands.push(Recorded::DrawPoints { count: batch.points.len(), blend: batch.blend });
        Ok(())
    }

    fn draw_fullscreen(&mut self, program: &FullscreenProgram, inputs: &[Arc<dyn Texture>]) -> Result<()> {
        if !self.in_render_pass {
            crate::engine_bail!("galaxy3d::MockCommandList", "draw_fullscreen() outside a render pass");
        }
        if inputs.len() != program.sampler_names().len() {
            crate::engine_bail!("galaxy3d::MockCommandList" => InvalidResource,
                "{} expects {} inputs, got {}", program.name(), program.sampler_names().len(), inputs.len());
        }
        self.commands.push(Recorded::DrawFullscreen { program: program.name(), inputs: inputs.to_vec() });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Mock Graphics Device
// ============================================================================

pub struct MockGraphicsDevice {
    surface: Arc<MockTexture>,
    frame: u64,
    in_frame: bool,
    log: Arc<Mutex<Vec<MockCommand>>>,
    /// Fail texture creation with OutOfMemory above this many pixels
    pub max_texture_pixels: Option<u64>,
    /// Fail the next N submits with a recoverable BackendError
    pub failing_submits: u32,
    pub textures_created: usize,
    stats: DeviceStats,
}

impl MockGraphicsDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Arc::new(Self::surface_texture(width, height)),
            frame: 0,
            in_frame: false,
            log: Arc::new(Mutex::new(Vec::new())),
            max_texture_pixels: None,
            failing_submits: 0,
            textures_created: 0,
            stats: DeviceStats::default(),
        }
    }

    fn surface_texture(width: u32, height: u32) -> MockTexture {
        MockTexture::new(TextureInfo {
            name: "surface".to_string(),
            width,
            height,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: TextureUsage::RenderTarget,
        })
    }

    /// Shared handle on the submitted command log
    pub fn log(&self) -> Arc<Mutex<Vec<MockCommand>>> {
        self.log.clone()
    }

    /// Frame index of the current (or last) frame
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if desc.width == 0 || desc.height == 0 {
            crate::engine_bail!("galaxy3d::MockGraphicsDevice" => InvalidResource,
                "texture '{}' has zero size", desc.name);
        }
        if let Some(limit) = self.max_texture_pixels {
            if desc.width as u64 * desc.height as u64 > limit {
                crate::engine_error!("galaxy3d::MockGraphicsDevice", "texture '{}' exceeds the budget", desc.name);
                return Err(crate::error::Error::OutOfMemory);
            }
        }
        self.textures_created += 1;
        Ok(Arc::new(MockTexture::new(TextureInfo::from(&desc))))
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(MockCommandList::new()))
    }

    fn submit(&mut self, commands: &dyn CommandList) -> Result<()> {
        if self.failing_submits > 0 {
            self.failing_submits -= 1;
            crate::engine_bail!("galaxy3d::MockGraphicsDevice", "submit rejected");
        }
        let commands = commands
            .as_any()
            .downcast_ref::<MockCommandList>()
            .ok_or_else(|| crate::engine_err!("galaxy3d::MockGraphicsDevice" => InvalidResource,
                "foreign command list"))?;

        let mut log = self.log.lock().unwrap();
        for command in &commands.commands {
            match command {
                Recorded::BeginRenderPass { target, ops } => {
                    if let Some(mock) = target.as_any().downcast_ref::<MockTexture>() {
                        mock.stamp.store(self.frame, Ordering::Relaxed);
                    }
                    self.stats.render_passes += 1;
                    log.push(MockCommand::BeginRenderPass {
                        target: target.info().name.clone(),
                        load_op: ops.load_op,
                        frame: self.frame,
                    });
                }
                Recorded::EndRenderPass => log.push(MockCommand::EndRenderPass),
                Recorded::DrawPoints { count, blend } => {
                    self.stats.draw_calls += 1;
                    self.stats.points_drawn += *count as u64;
                    log.push(MockCommand::DrawPoints { count: *count, blend: *blend });
                }
                Recorded::DrawFullscreen { program, inputs } => {
                    self.stats.draw_calls += 1;
                    log.push(MockCommand::DrawFullscreen {
                        program: *program,
                        inputs: inputs.iter().map(|t| (t.info().name.clone(), stamp_of(t))).collect(),
                    });
                }
            }
        }
        Ok(())
    }

    fn begin_frame(&mut self) -> Result<()> {
        if self.in_frame {
            crate::engine_bail!("galaxy3d::MockGraphicsDevice", "begin_frame() called twice");
        }
        self.in_frame = true;
        self.frame += 1;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.in_frame {
            crate::engine_bail!("galaxy3d::MockGraphicsDevice", "end_frame() without begin_frame()");
        }
        self.in_frame = false;
        self.stats.frames += 1;
        Ok(())
    }

    fn surface(&self) -> Arc<dyn Texture> {
        self.surface.clone()
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.surface.info.width, self.surface.info.height)
    }

    fn resize_surface(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface = Arc::new(Self::surface_texture(width, height));
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;

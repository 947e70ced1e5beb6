/// Pass composer — an ordered list of passes producing one image.
///
/// Owns two ping-pong render targets. Each pass reads the read buffer and
/// writes the write buffer; passes that `needs_swap()` swap the two after
/// rendering, so the read buffer always holds the latest image. A surface
/// composer sends its last pass to the device surface instead.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, Texture};
use crate::scene::Layer;
use crate::{engine_bail, engine_err};
use super::pass::{FrameContext, Pass, PassContext, PassIo};
use super::render_target::RenderTarget;

/// Where a composer's final image goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerOutput {
    /// Kept in the composer's read buffer for other composers
    Offscreen,
    /// Written to the device surface by the last pass
    Surface,
}

pub struct PassComposer {
    name: String,
    layer: Layer,
    output: ComposerOutput,
    passes: Vec<Box<dyn Pass>>,
    targets: Vec<RenderTarget>,
    read_index: usize,
    last_rendered_tick: Option<u64>,
}

impl PassComposer {
    pub fn new(name: impl Into<String>, layer: Layer, output: ComposerOutput) -> Self {
        Self {
            name: name.into(),
            layer,
            output,
            passes: Vec::new(),
            targets: Vec::new(),
            read_index: 0,
            last_rendered_tick: None,
        }
    }

    /// Append a pass (builder style)
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn add_pass(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The only layer this composer renders
    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn output(&self) -> ComposerOutput {
        self.output
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Tick of the last successful render
    pub fn last_rendered_tick(&self) -> Option<u64> {
        self.last_rendered_tick
    }

    /// Target size in physical pixels, `None` before the first resize
    pub fn size(&self) -> Option<(u32, u32)> {
        self.targets.first().map(|t| (t.width(), t.height()))
    }

    /// Latest image (the read buffer)
    pub fn read_buffer(&self) -> Option<&Arc<dyn Texture>> {
        self.targets.get(self.read_index).map(|t| t.texture())
    }

    /// Image other composers sample; `None` for surface composers
    pub fn output_image(&self) -> Option<&Arc<dyn Texture>> {
        match self.output {
            ComposerOutput::Offscreen => self.read_buffer(),
            ComposerOutput::Surface => None,
        }
    }

    // ===== RESIZE / RENDER =====

    /// Recreate both buffers and every pass resource at the new size
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<()> {
        if self.targets.len() != 2 {
            self.targets.clear();
            for i in 0..2 {
                let target = RenderTarget::new(device, format!("{}.rt{}", self.name, i), width, height, &self.name)?;
                self.targets.push(target);
            }
        } else {
            // A failure leaves fewer than two targets, rebuilt by the next resize
            for target in std::mem::take(&mut self.targets) {
                self.targets.push(target.resize(device, width, height)?);
            }
        }
        self.read_index = 0;
        self.last_rendered_tick = None;

        for pass in &mut self.passes {
            pass.resize(device, width, height)?;
        }
        Ok(())
    }

    /// Run every pass against the scene, through this composer's layer only
    pub fn render(
        &mut self,
        frame: FrameContext,
        inputs: &FxHashMap<String, Arc<dyn Texture>>,
        device: &mut dyn GraphicsDevice,
    ) -> Result<()> {
        if self.targets.len() != 2 {
            engine_bail!("galaxy3d::PassComposer" => InvalidResource,
                "Composer '{}' rendered before resize", self.name);
        }
        if self.passes.is_empty() {
            engine_bail!("galaxy3d::PassComposer" => InvalidGraph,
                "Composer '{}' has no passes", self.name);
        }

        let ctx = PassContext {
            frame,
            layer_mask: self.layer.mask(),
            inputs,
        };
        let surface = match self.output {
            ComposerOutput::Surface => Some(device.surface()),
            ComposerOutput::Offscreen => None,
        };

        let mut cmd = device.create_command_list()?;
        cmd.begin()?;

        let last = self.passes.len() - 1;
        for (i, pass) in self.passes.iter_mut().enumerate() {
            let read = self.targets[self.read_index].texture();
            let (write, to_surface) = match (&surface, i == last) {
                (Some(surface), true) => (surface, true),
                _ => (self.targets[1 - self.read_index].texture(), false),
            };

            pass.render(&ctx, cmd.as_mut(), &PassIo { read, write, to_surface })
                .map_err(|e| {
                    crate::engine_warn!("galaxy3d::PassComposer",
                        "Pass '{}' of '{}' failed: {}", pass.name(), self.name, e);
                    e
                })?;

            if pass.needs_swap() && !to_surface {
                self.read_index = 1 - self.read_index;
            }
        }

        cmd.end()?;
        device.submit(cmd.as_ref())?;

        self.last_rendered_tick = Some(frame.tick);
        crate::engine_trace!("galaxy3d::PassComposer",
            "'{}' rendered {} passes (tick {})", self.name, self.passes.len(), frame.tick);
        Ok(())
    }

    /// Output image checked for freshness against `tick`
    pub(crate) fn fresh_output(&self, tick: u64) -> Result<&Arc<dyn Texture>> {
        if self.last_rendered_tick != Some(tick) {
            return Err(engine_err!("galaxy3d::PassComposer" => InvalidGraph,
                "Output of '{}' was not rendered in tick {}", self.name, tick));
        }
        self.output_image().ok_or_else(|| {
            engine_err!("galaxy3d::PassComposer" => InvalidGraph,
                "Composer '{}' renders to the surface and has no output image", self.name)
        })
    }
}

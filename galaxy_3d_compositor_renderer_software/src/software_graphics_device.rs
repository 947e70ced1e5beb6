/// GraphicsDevice - software implementation of the GraphicsDevice trait
///
/// Every texture is a float pixel buffer in system memory. `submit()`
/// executes the recorded commands immediately, in order, on the calling
/// thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use glam::{Vec2, Vec4};
use galaxy_3d_compositor::galaxy3d::{Error, Result};
use galaxy_3d_compositor::galaxy3d::render::{
    CommandList as RendererCommandList,
    GraphicsDevice as RendererGraphicsDevice,
    Texture as RendererTexture,
    DeviceConfig, DeviceStats, FullscreenProgram, LoadOp, TextureDesc, TextureFormat,
    TextureInfo, TextureUsage, gaussian_coefficients, BLOOM_MIP_COUNT,
};
use galaxy_3d_compositor::{engine_bail, engine_debug, engine_error, engine_info, engine_trace};

use crate::rasterizer::{self, RasterTarget};
use crate::sampler::Sampler;
use crate::shaders;
use crate::software_command_list::{Command, CommandList};
use crate::software_texture::{as_software, Texture};

/// Render pass being executed
struct ActivePass {
    target: Arc<dyn RendererTexture>,
    depth: Vec<f32>,
}

/// Software graphics device
pub struct GraphicsDevice {
    config: DeviceConfig,
    surface: Arc<Texture>,
    /// Bytes held by live textures, shared with every texture
    memory: Arc<AtomicU64>,
    stats: DeviceStats,
    in_frame: bool,
}

impl GraphicsDevice {
    /// Create a device with a `width` x `height` surface
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the surface cannot be created (zero or
    /// oversized dimensions, budget too small).
    pub fn new(config: DeviceConfig, width: u32, height: u32) -> Result<Self> {
        let memory = Arc::new(AtomicU64::new(0));
        let surface = allocate(&config, &memory, surface_desc(width, height), 0).map_err(|err| {
            engine_error!("galaxy3d::software", "Cannot create {}x{} surface: {}", width, height, err);
            Error::InitializationFailed(format!("cannot create {}x{} surface: {}", width, height, err))
        })?;

        engine_info!("galaxy3d::software", "Software device '{}' created ({}x{}, budget {} MiB)",
            config.app_name, width, height, config.memory_budget_bytes >> 20);

        Ok(Self {
            config,
            surface,
            memory,
            stats: DeviceStats::default(),
            in_frame: false,
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Bytes currently held by live textures (surface included)
    pub fn texture_memory_bytes(&self) -> u64 {
        self.memory.load(Ordering::Relaxed)
    }

    fn execute(&mut self, commands: &CommandList) -> Result<()> {
        let mut pass: Option<ActivePass> = None;

        for command in commands.commands() {
            match command {
                Command::BeginRenderPass { target, ops } => {
                    let texture = as_software(target)?;
                    if ops.load_op == LoadOp::Clear {
                        texture.write()?.fill(ops.clear_color);
                    }
                    let pixel_count = texture.width() as usize * texture.height() as usize;
                    pass = Some(ActivePass {
                        target: target.clone(),
                        depth: vec![f32::INFINITY; pixel_count],
                    });
                    self.stats.render_passes += 1;
                }
                Command::EndRenderPass => {
                    if let Some(finished) = pass.take() {
                        as_software(&finished.target)?.quantize()?;
                    }
                }
                Command::DrawPoints(draw) => {
                    let ActivePass { target, depth } = active(&mut pass)?;
                    let texture = as_software(target)?;
                    let mut pixels = texture.write()?;
                    let mut raster = RasterTarget {
                        width: texture.width(),
                        height: texture.height(),
                        pixels: pixels.as_mut_slice(),
                        depth: depth.as_mut_slice(),
                    };
                    let visible = rasterizer::draw_points(&mut raster, &draw.as_batch());
                    engine_trace!("galaxy3d::software", "{} of {} points visible in '{}'",
                        visible, draw.points.len(), texture.info().name);

                    self.stats.draw_calls += 1;
                    self.stats.points_drawn += draw.points.len() as u64;
                }
                Command::DrawFullscreen { program, inputs } => {
                    let ActivePass { target, .. } = active(&mut pass)?;
                    let texture = as_software(target)?;
                    run_fullscreen(program, texture, inputs)?;
                    if self.config.enable_validation {
                        check_finite(program, texture)?;
                    }
                    self.stats.draw_calls += 1;
                }
            }
        }
        Ok(())
    }
}

fn active(pass: &mut Option<ActivePass>) -> Result<&mut ActivePass> {
    pass.as_mut().ok_or_else(|| {
        engine_error!("galaxy3d::software", "Draw outside of a render pass");
        Error::BackendError("draw outside of a render pass".to_string())
    })
}

fn surface_desc(width: u32, height: u32) -> TextureDesc {
    TextureDesc {
        name: "surface".to_string(),
        width,
        height,
        format: TextureFormat::R8G8B8A8_UNORM,
        usage: TextureUsage::RenderTarget,
    }
}

/// Validate a descriptor against the device limits and allocate it.
///
/// `released` bytes are freed as soon as the new texture replaces an old
/// one, so they do not count against the budget.
fn allocate(
    config: &DeviceConfig,
    memory: &Arc<AtomicU64>,
    desc: TextureDesc,
    released: u64,
) -> Result<Arc<Texture>> {
    let max = config.max_texture_dimension;
    if desc.width == 0 || desc.height == 0 || desc.width > max || desc.height > max {
        engine_bail!("galaxy3d::software" => InvalidResource,
            "Texture '{}' has invalid size {}x{} (max {})", desc.name, desc.width, desc.height, max);
    }

    let used = memory.load(Ordering::Relaxed).saturating_sub(released);
    let requested = desc.size_in_bytes();
    if used + requested > config.memory_budget_bytes {
        engine_error!("galaxy3d::software",
            "Out of memory: '{}' needs {} bytes, {} of {} in use",
            desc.name, requested, used, config.memory_budget_bytes);
        return Err(Error::OutOfMemory);
    }

    Ok(Arc::new(Texture::new(TextureInfo::from(&desc), memory.clone())))
}

/// Run one fullscreen program over every pixel of `target`
fn run_fullscreen(program: &FullscreenProgram, target: &Texture, inputs: &[Arc<dyn RendererTexture>]) -> Result<()> {
    let sources = inputs
        .iter()
        .map(|input| {
            let texture = as_software(input)?;
            Ok((texture, texture.read()?))
        })
        .collect::<Result<Vec<_>>>()?;
    let samplers: Vec<Sampler> = sources
        .iter()
        .map(|(texture, pixels)| Sampler::new(texture.width(), texture.height(), pixels.as_slice()))
        .collect();
    if samplers.len() != program.sampler_names().len() {
        engine_bail!("galaxy3d::software" => InvalidResource,
            "{} bound with {} inputs", program.name(), samplers.len());
    }

    let (width, height) = (target.width(), target.height());
    let texel = Vec2::new(1.0 / width as f32, 1.0 / height as f32);
    let coefficients = match program {
        FullscreenProgram::SeparableBlur { kernel_radius, .. } => gaussian_coefficients(*kernel_radius),
        _ => Vec::new(),
    };

    let mut out = target.write()?;
    for y in 0..height {
        for x in 0..width {
            let uv = Vec2::new((x as f32 + 0.5) * texel.x, (y as f32 + 0.5) * texel.y);
            let color = match program {
                FullscreenProgram::Copy { opacity } => shaders::copy(samplers[0].sample(uv), *opacity),
                FullscreenProgram::LuminosityHighPass { threshold, smooth_width } => {
                    shaders::luminosity_high_pass(samplers[0].sample(uv), *threshold, *smooth_width)
                }
                FullscreenProgram::SeparableBlur { direction, .. } => {
                    shaders::separable_blur(&samplers[0], uv, *direction * texel, &coefficients)
                }
                FullscreenProgram::BloomMix { strength, radius, factors, tints } => {
                    let blurred: [Vec4; BLOOM_MIP_COUNT] = std::array::from_fn(|i| samplers[i].sample(uv));
                    shaders::bloom_mix(&blurred, *strength, *radius, factors, tints)
                }
                FullscreenProgram::Composition { tone_mapping, exposure, output_srgb } => shaders::compose(
                    samplers[0].sample(uv),
                    samplers[1].sample(uv),
                    samplers[2].sample(uv),
                    *tone_mapping,
                    *exposure,
                    *output_srgb,
                ),
            };
            out[(y * width + x) as usize] = color.to_array();
        }
    }
    Ok(())
}

fn check_finite(program: &FullscreenProgram, target: &Texture) -> Result<()> {
    let pixels = target.read()?;
    if let Some(index) = pixels.iter().position(|p| p.iter().any(|c| !c.is_finite())) {
        engine_bail!("galaxy3d::software",
            "{} wrote a non-finite value at pixel {} of '{}'", program.name(), index, target.info().name);
    }
    Ok(())
}

impl RendererGraphicsDevice for GraphicsDevice {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn RendererTexture>> {
        let name = desc.name.clone();
        let texture = allocate(&self.config, &self.memory, desc, 0)?;
        engine_debug!("galaxy3d::software", "Created texture '{}' ({}x{})",
            name, texture.width(), texture.height());
        Ok(texture)
    }

    fn create_command_list(&self) -> Result<Box<dyn RendererCommandList>> {
        Ok(Box::new(CommandList::new()))
    }

    fn submit(&mut self, commands: &dyn RendererCommandList) -> Result<()> {
        let commands = commands.as_any().downcast_ref::<CommandList>().ok_or_else(|| {
            engine_error!("galaxy3d::software", "Submitted command list is not a software command list");
            Error::InvalidResource("foreign command list".to_string())
        })?;
        if commands.is_recording() {
            engine_bail!("galaxy3d::software", "Command list submitted before end()");
        }
        self.execute(commands)
    }

    fn begin_frame(&mut self) -> Result<()> {
        if self.in_frame {
            engine_bail!("galaxy3d::software", "begin_frame() called twice");
        }
        self.in_frame = true;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.in_frame {
            engine_bail!("galaxy3d::software", "end_frame() without begin_frame()");
        }
        self.in_frame = false;
        self.stats.frames += 1;
        engine_trace!("galaxy3d::software", "Presented frame {}", self.stats.frames);
        Ok(())
    }

    fn surface(&self) -> Arc<dyn RendererTexture> {
        self.surface.clone()
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    fn resize_surface(&mut self, width: u32, height: u32) -> Result<()> {
        // Outstanding handles keep the old surface alive past the swap
        let released = if Arc::strong_count(&self.surface) == 1 {
            self.surface.size_in_bytes()
        } else {
            0
        };
        self.surface = allocate(&self.config, &self.memory, surface_desc(width, height), released)?;
        engine_info!("galaxy3d::software", "Surface resized to {}x{}", width, height);
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        DeviceStats {
            texture_memory_bytes: self.texture_memory_bytes(),
            ..self.stats
        }
    }
}

/// Plugin factory for `create_graphics_device("software", ...)`
pub fn create_software_graphics_device(
    config: DeviceConfig,
    width: u32,
    height: u32,
) -> Result<Arc<Mutex<dyn RendererGraphicsDevice>>> {
    let device = GraphicsDevice::new(config, width, height)?;
    Ok(Arc::new(Mutex::new(device)))
}

#[cfg(test)]
#[path = "software_graphics_device_tests.rs"]
mod tests;

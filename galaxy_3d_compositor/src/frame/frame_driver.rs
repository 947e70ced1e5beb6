/// Frame driver — the per-refresh loop.
///
/// ```text
///  Idle ──start()──▶ SteadyLoop ──tick()──▶ SteadyLoop
///    │                   │
///    └──setup error──────┴──fatal error──▶ Halted
/// ```
///
/// One tick: advance the camera controller, follow the host surface size
/// (device surface, graph targets and projection in lockstep), update the
/// content, execute the render graph, schedule the next tick. A degenerate
/// viewport skips the render but not the rest. Recoverable errors are
/// logged and the loop goes on; fatal ones halt it.

use std::sync::{Arc, Mutex, MutexGuard};
use crate::camera::{Camera, CameraController};
use crate::config::CompositorConfig;
use crate::error::{Error, Result};
use crate::graphics_device::GraphicsDevice;
use crate::render_graph::{FrameContext, RenderGraph};
use crate::scene::{Scene, SceneContent};
use crate::viewport::{HostSurface, Viewport, ViewportManager};
use crate::engine_err;
use super::TickScheduler;

const SOURCE: &str = "galaxy3d::FrameDriver";

/// Lifecycle of a frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Created, `start()` not called yet
    Idle,
    /// Ticking
    SteadyLoop,
    /// Stopped by a fatal error, no more ticks are scheduled
    Halted,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// The host surface size changed and the targets were recreated
    pub resized: bool,
    /// False when the frame was skipped (degenerate viewport)
    pub rendered: bool,
    /// Composer names in execution order, empty when not rendered
    pub composer_order: Vec<String>,
}

pub struct FrameDriver {
    config: CompositorConfig,
    state: DriverState,
    tick: u64,
    camera: Camera,
    scene: Scene,
    viewport: ViewportManager,
    graph: RenderGraph,
    device: Arc<Mutex<dyn GraphicsDevice>>,
    surface: Arc<dyn HostSurface>,
    scheduler: Arc<dyn TickScheduler>,
    controller: Box<dyn CameraController>,
    content: Box<dyn SceneContent>,
}

impl FrameDriver {
    /// Build a driver with the standard layered graph (bloom, overlay, base).
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation.
    pub fn new(
        config: CompositorConfig,
        device: Arc<Mutex<dyn GraphicsDevice>>,
        surface: Arc<dyn HostSurface>,
        scheduler: Arc<dyn TickScheduler>,
        controller: Box<dyn CameraController>,
        content: Box<dyn SceneContent>,
    ) -> Result<Self> {
        config.validate()?;

        let (graph, _) = RenderGraph::layered(config.bloom, config.tone_mapping)?;
        let camera = Camera::from_config(&config.camera);
        let scene = Scene::with_fog(config.fog);

        Ok(Self {
            config,
            state: DriverState::Idle,
            tick: 0,
            camera,
            scene,
            viewport: ViewportManager::new(),
            graph,
            device,
            surface,
            scheduler,
            controller,
            content,
        })
    }

    /// Replace the render graph. Only meaningful before `start()`.
    pub fn with_render_graph(mut self, graph: RenderGraph) -> Self {
        self.graph = graph;
        self
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of ticks attempted since `start()`
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewport.viewport()
    }

    pub fn render_graph(&self) -> &RenderGraph {
        &self.graph
    }

    pub fn device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.device
    }

    // ===== LIFECYCLE =====

    /// One-time setup, then Idle → SteadyLoop and the first tick is scheduled.
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the driver was already started. Any setup
    /// error halts the driver and is returned.
    pub fn start(&mut self) -> Result<()> {
        if self.state != DriverState::Idle {
            return Err(engine_err!(SOURCE => InitializationFailed,
                "start() called in state {:?}", self.state));
        }

        if let Err(err) = self.setup() {
            crate::engine_error!(SOURCE, "Startup failed: {}", err);
            self.state = DriverState::Halted;
            return Err(err);
        }

        self.state = DriverState::SteadyLoop;
        crate::engine_info!(SOURCE, "Idle -> SteadyLoop ({} objects, {} composers)",
            self.scene.object_count(), self.graph.composer_count());
        self.scheduler.schedule_next_tick();
        Ok(())
    }

    fn setup(&mut self) -> Result<()> {
        self.content.attach_to(&mut self.scene)?;

        let mut device = lock_device(&self.device)?;
        self.viewport.check_resize(self.surface.as_ref(), &mut *device)?;
        self.viewport.update_projection(&mut self.camera);

        self.graph.compile()?;
        let (width, height) = device.surface_size();
        self.graph.resize(&mut *device, width, height)?;
        Ok(())
    }

    /// Run one tick.
    ///
    /// The next tick is scheduled unless the driver halts.
    ///
    /// # Errors
    ///
    /// `InitializationFailed` outside SteadyLoop. Otherwise the tick's own
    /// error: recoverable ones leave the driver running, fatal ones halt it.
    pub fn tick(&mut self) -> Result<TickReport> {
        if self.state != DriverState::SteadyLoop {
            return Err(engine_err!(SOURCE => InitializationFailed,
                "tick() called in state {:?}", self.state));
        }

        match self.run_tick() {
            Ok(report) => {
                crate::engine_trace!(SOURCE, "Tick {} done (resized: {}, rendered: {})",
                    report.tick, report.resized, report.rendered);
                self.scheduler.schedule_next_tick();
                Ok(report)
            }
            Err(err) if !err.is_fatal() => {
                crate::engine_warn!(SOURCE, "Tick {} failed, continuing: {}", self.tick, err);
                self.scheduler.schedule_next_tick();
                Err(err)
            }
            Err(err) => {
                crate::engine_error!(SOURCE, "Tick {} failed, halting: {}", self.tick, err);
                self.state = DriverState::Halted;
                crate::engine_info!(SOURCE, "SteadyLoop -> Halted");
                Err(err)
            }
        }
    }

    /// Run `count` ticks, stopping at the first error
    pub fn run_ticks(&mut self, count: usize) -> Result<Vec<TickReport>> {
        (0..count).map(|_| self.tick()).collect()
    }

    fn run_tick(&mut self) -> Result<TickReport> {
        self.tick += 1;
        let tick = self.tick;

        self.controller.advance(&mut self.camera);

        let mut device = lock_device(&self.device)?;
        let mut resized = self.viewport.check_resize(self.surface.as_ref(), &mut *device)?;
        let surface_size = device.surface_size();
        // Also catches a graph resize that failed on an earlier tick
        if resized || self.graph.size() != Some(surface_size) {
            self.graph.resize(&mut *device, surface_size.0, surface_size.1)?;
            resized = true;
        }
        self.viewport.update_projection(&mut self.camera);

        self.content.update(&mut self.scene, &self.camera)?;

        let viewport = *self.viewport.viewport();
        if viewport.is_degenerate() {
            crate::engine_debug!(SOURCE, "Tick {} skipped, viewport is {}x{}",
                tick, viewport.width, viewport.height);
            return Ok(TickReport { tick, resized, rendered: false, composer_order: Vec::new() });
        }

        device.begin_frame()?;
        let frame = FrameContext {
            scene: &self.scene,
            camera: &self.camera,
            pixel_ratio: viewport.pixel_ratio,
            tick,
        };
        let executed = self.graph.execute(frame, &mut *device);
        // The frame is closed even when a composer failed, so the next tick can begin one
        let ended = device.end_frame();
        let composer_order = executed?;
        ended?;

        Ok(TickReport { tick, resized, rendered: true, composer_order })
    }
}

fn lock_device<'a>(
    device: &'a Arc<Mutex<dyn GraphicsDevice + 'static>>,
) -> Result<MutexGuard<'a, dyn GraphicsDevice + 'static>> {
    device.lock().map_err(|_| {
        crate::engine_error!(SOURCE, "Graphics device mutex poisoned");
        Error::InvalidResource("graphics device mutex poisoned".to_string())
    })
}

#[cfg(test)]
#[path = "frame_driver_tests.rs"]
mod tests;

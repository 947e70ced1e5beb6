/*!
# Galaxy 3D Compositor

Multi-pass compositing pipeline for the Galaxy3D field renderer.

A frame is produced by three pass composers that render the same scene
with different layer masks (bloom, overlay, base), then a composition pass
blends their images into the visible surface. Graphics backends (software,
GPU) implement the device traits and are selected at runtime via the
plugin registry.

## Architecture

- **FrameDriver**: per-refresh loop (controller → viewport → content → graph)
- **RenderGraph**: composers as nodes, images as edges, topological order
- **PassComposer**: ordered passes writing into ping-pong render targets
- **GraphicsDevice / CommandList / Texture**: backend seam
- **Scene / Layer**: layered point-sprite content
- **Camera / OrbitController**: projection and orbit navigation
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod camera;
pub mod scene;
pub mod graphics_device;
pub mod render_graph;
pub mod viewport;
pub mod frame;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine facade (logging)
    pub use crate::engine::Engine;

    // Startup configuration
    pub use crate::config::{
        CompositorConfig, BloomParams, ToneMapping, ToneMappingParams,
        CameraConfig, ControlsConfig,
    };

    // Frame loop
    pub use crate::frame::{FrameDriver, DriverState, TickReport, TickScheduler, ManualScheduler};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
    }

    // Graphics device sub-module
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Render graph sub-module
    pub mod render_graph {
        pub use crate::render_graph::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Viewport sub-module
    pub mod viewport {
        pub use crate::viewport::*;
    }
}

// Re-export math library at crate root
pub use glam;

//! Viewport module — host surface queries and projection upkeep.

mod surface;
mod viewport;

pub use surface::{HostSurface, HeadlessSurface};
pub use viewport::{Viewport, ViewportManager};

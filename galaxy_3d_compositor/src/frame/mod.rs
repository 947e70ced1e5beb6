//! Frame module — the per-refresh loop and its scheduling seam.

mod scheduler;
mod frame_driver;

pub use scheduler::{TickScheduler, ManualScheduler};
pub use frame_driver::{FrameDriver, DriverState, TickReport};

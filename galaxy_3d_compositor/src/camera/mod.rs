//! Camera module — perspective camera and camera controllers.
//!
//! The camera's position and orientation belong to its controller; its
//! aspect ratio and projection belong to the viewport manager.

mod camera;
mod controller;

pub use camera::Camera;
pub use controller::{CameraController, OrbitController};

/// Scene content — the collaborator that populates and animates the scene.

use crate::camera::Camera;
use crate::error::Result;
use super::Scene;

/// Owner of the scene objects.
///
/// The content decides the layer of every object it creates. It reads the
/// camera (for distance-dependent scaling, level of detail, ...) but can
/// never move it.
pub trait SceneContent {
    /// Called once by `FrameDriver::start()`
    fn attach_to(&mut self, scene: &mut Scene) -> Result<()>;

    /// Called every tick after the camera and viewport are up to date
    fn update(&mut self, scene: &mut Scene, camera: &Camera) -> Result<()>;
}

/// Content that adds nothing
pub struct EmptyContent;

impl SceneContent for EmptyContent {
    fn attach_to(&mut self, _scene: &mut Scene) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, _scene: &mut Scene, _camera: &Camera) -> Result<()> {
        Ok(())
    }
}

/// Scene pass — draws the objects of the active layer.

use crate::error::Result;
use crate::graphics_device::{CommandList, PointBatch, TargetOps};
use super::pass::{Pass, PassContext, PassIo};

/// Renders every visible object whose layer is in the context's mask.
///
/// Draws into the read buffer (no swap) so following passes see the scene
/// image as their input, or straight into the surface when last.
pub struct ScenePass {
    ops: TargetOps,
}

impl ScenePass {
    pub fn new() -> Self {
        Self { ops: TargetOps::default() }
    }

    /// Clear color used before drawing (premultiplied RGBA)
    pub fn with_clear_color(mut self, clear_color: [f32; 4]) -> Self {
        self.ops.clear_color = clear_color;
        self
    }
}

impl Default for ScenePass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for ScenePass {
    fn name(&self) -> &str {
        "scene"
    }

    fn needs_swap(&self) -> bool {
        false
    }

    fn render(&mut self, ctx: &PassContext, cmd: &mut dyn CommandList, io: &PassIo) -> Result<()> {
        let target = if io.to_surface { io.write } else { io.read };
        let camera = ctx.camera();
        let view = camera.view_matrix();
        let projection = *camera.projection_matrix();
        let fog = ctx.scene().fog().copied();

        cmd.begin_render_pass(target, &self.ops)?;
        let mut drawn = 0usize;
        for (_, object) in ctx.scene().objects_in(ctx.layer_mask) {
            if object.points().is_empty() {
                continue;
            }
            cmd.draw_points(&PointBatch {
                points: object.points(),
                model_view: view * *object.world_matrix(),
                projection,
                blend: object.blend(),
                size_attenuation: object.size_attenuation(),
                fog: if object.fog() { fog } else { None },
                pixel_ratio: ctx.frame.pixel_ratio,
            })?;
            drawn += 1;
        }
        cmd.end_render_pass()?;

        crate::engine_trace!("galaxy3d::ScenePass",
            "Drew {} objects of {:?} into '{}'", drawn, ctx.layer_mask, target.info().name);
        Ok(())
    }
}

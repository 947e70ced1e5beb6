/// Point sprite rasterizer
///
/// Sprites are screen-aligned discs. Normal blending is premultiplied
/// source-over with a depth test on view distance; additive sprites are
/// depth tested but never write depth.

use glam::{Vec3, Vec4};
use galaxy_3d_compositor::galaxy3d::render::PointBatch;
use galaxy_3d_compositor::galaxy3d::scene::BlendMode;

/// Target pixels plus the render pass depth buffer
pub struct RasterTarget<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a mut [[f32; 4]],
    /// View-space distance per pixel, `f32::INFINITY` when empty
    pub depth: &'a mut [f32],
}

/// Pixel diameter of a sprite at view distance `depth`
pub fn sprite_diameter(size: f32, pixel_ratio: f32, size_attenuation: bool, depth: f32, target_height: u32) -> f32 {
    let mut diameter = size * pixel_ratio;
    if size_attenuation {
        diameter *= (target_height as f32 * 0.5) / depth;
    }
    diameter.max(1.0)
}

/// Draw every point of the batch. Returns the number of points that landed
/// inside the view volume.
pub fn draw_points(target: &mut RasterTarget, batch: &PointBatch) -> usize {
    let (width, height) = (target.width as f32, target.height as f32);
    let mut visible = 0;

    for point in batch.points {
        let view = batch.model_view * point.position.extend(1.0);
        let clip = batch.projection * view;
        if clip.w <= 0.0 {
            continue;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            continue;
        }

        let depth = -view.z;
        let diameter = sprite_diameter(point.size, batch.pixel_ratio, batch.size_attenuation, depth, target.height);
        let center_x = (ndc.x * 0.5 + 0.5) * width;
        let center_y = (0.5 - ndc.y * 0.5) * height;

        let color = shade(point.color, batch, depth);
        if rasterize_disc(target, center_x, center_y, diameter * 0.5, depth, color, batch.blend) {
            visible += 1;
        }
    }
    visible
}

/// Fogged, premultiplied sprite color
fn shade(color: Vec4, batch: &PointBatch, depth: f32) -> Vec4 {
    let mut rgb: Vec3 = color.truncate();
    if let Some(fog) = &batch.fog {
        rgb = rgb.lerp(fog.color, fog.factor(depth));
    }
    (rgb * color.w).extend(color.w)
}

fn rasterize_disc(
    target: &mut RasterTarget,
    center_x: f32,
    center_y: f32,
    radius: f32,
    depth: f32,
    color: Vec4,
    blend: BlendMode,
) -> bool {
    let min_x = (center_x - radius).floor().max(0.0) as i64;
    let max_x = (center_x + radius).ceil().min(target.width as f32) as i64;
    let min_y = (center_y - radius).floor().max(0.0) as i64;
    let max_y = (center_y + radius).ceil().min(target.height as f32) as i64;
    if min_x >= max_x || min_y >= max_y {
        return false;
    }

    // Sprites smaller than a pixel still cover the pixel they fall in
    let radius_sq = radius.max(0.5).powi(2);
    let mut covered = false;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f32 + 0.5 - center_x;
            let dy = y as f32 + 0.5 - center_y;
            if dx * dx + dy * dy > radius_sq {
                continue;
            }
            let index = y as usize * target.width as usize + x as usize;
            if depth > target.depth[index] {
                continue;
            }
            covered = true;

            let dst = Vec4::from_array(target.pixels[index]);
            let out = match blend {
                BlendMode::Normal => {
                    target.depth[index] = depth;
                    color + dst * (1.0 - color.w)
                }
                BlendMode::Additive => {
                    let rgb = dst.truncate() + color.truncate();
                    rgb.extend((dst.w + color.w).min(1.0))
                }
            };
            target.pixels[index] = out.to_array();
        }
    }
    covered
}

#[cfg(test)]
#[path = "rasterizer_tests.rs"]
mod tests;

/// Scene — layered point-sprite objects plus optional fog.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. The scene is
/// filled by a `SceneContent` and read by scene passes through a layer mask.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use slotmap::{new_key_type, SlotMap};
use super::layer::{Layer, LayerMask};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a SceneObject within a Scene.
    ///
    /// A key becomes invalid only when its own object is removed.
    pub struct SceneObjectKey;
}

// ===== POINT SPRITE =====

/// One round sprite
///
/// `color` is linear RGB with straight alpha. RGB may exceed 1.0 for
/// elements meant to glow.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointSprite {
    /// Position in object space
    pub position: Vec3,
    /// Diameter in logical pixels (before attenuation)
    pub size: f32,
    pub color: Vec4,
}

impl PointSprite {
    pub fn new(position: Vec3, size: f32, color: Vec4) -> Self {
        Self { position, size, color }
    }
}

// ===== BLEND / FOG =====

/// How sprites combine with what is already in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Alpha blending with depth test and depth write
    Normal,
    /// Added on top, depth tested but never written
    Additive,
}

/// Exponential squared fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogExp2 {
    /// Linear RGB
    pub color: Vec3,
    pub density: f32,
}

impl FogExp2 {
    pub fn new(color: Vec3, density: f32) -> Self {
        Self { color, density }
    }

    /// Build from a 0xRRGGBB sRGB color
    pub fn from_hex(hex: u32, density: f32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self {
            color: Vec3::new(channel(16), channel(8), channel(0)),
            density,
        }
    }

    /// Fog amount in [0, 1] at a view-space depth
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density * depth;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

// ===== SCENE OBJECT =====

/// A batch of sprites sharing one layer, transform and blend state
#[derive(Debug, Clone)]
pub struct SceneObject {
    name: String,
    layer: Layer,
    world_matrix: Mat4,
    points: Vec<PointSprite>,
    blend: BlendMode,
    size_attenuation: bool,
    fog: bool,
    visible: bool,
}

impl SceneObject {
    /// Create a visible, fogged, size-attenuated object with normal blending
    pub fn new(name: impl Into<String>, layer: Layer, points: Vec<PointSprite>) -> Self {
        Self {
            name: name.into(),
            layer,
            world_matrix: Mat4::IDENTITY,
            points,
            blend: BlendMode::Normal,
            size_attenuation: true,
            fog: true,
            visible: true,
        }
    }

    pub fn with_world_matrix(mut self, world_matrix: Mat4) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_size_attenuation(mut self, size_attenuation: bool) -> Self {
        self.size_attenuation = size_attenuation;
        self
    }

    pub fn with_fog(mut self, fog: bool) -> Self {
        self.fog = fog;
        self
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layer fixed at creation
    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub fn points(&self) -> &[PointSprite] {
        &self.points
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    pub fn size_attenuation(&self) -> bool {
        self.size_attenuation
    }

    pub fn fog(&self) -> bool {
        self.fog
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_world_matrix(&mut self, world_matrix: Mat4) {
        self.world_matrix = world_matrix;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Mutable sprite data (for per-frame animation by the content)
    pub fn points_mut(&mut self) -> &mut Vec<PointSprite> {
        &mut self.points
    }
}

// ===== SCENE =====

/// Collection of scene objects
pub struct Scene {
    objects: SlotMap<SceneObjectKey, SceneObject>,
    fog: Option<FogExp2>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            fog: None,
        }
    }

    pub fn with_fog(fog: Option<FogExp2>) -> Self {
        Self {
            objects: SlotMap::with_key(),
            fog,
        }
    }

    pub fn fog(&self) -> Option<&FogExp2> {
        self.fog.as_ref()
    }

    pub fn set_fog(&mut self, fog: Option<FogExp2>) {
        self.fog = fog;
    }

    /// Add an object; returns a stable key
    pub fn add(&mut self, object: SceneObject) -> SceneObjectKey {
        self.objects.insert(object)
    }

    /// Remove an object; returns it if the key was valid
    pub fn remove(&mut self, key: SceneObjectKey) -> Option<SceneObject> {
        self.objects.remove(key)
    }

    pub fn object(&self, key: SceneObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    pub fn object_mut(&mut self, key: SceneObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Visible objects whose layer is in `mask`
    pub fn objects_in(&self, mask: LayerMask) -> impl Iterator<Item = (SceneObjectKey, &SceneObject)> + '_ {
        self.objects
            .iter()
            .filter(move |(_, object)| object.visible && mask.contains_layer(object.layer))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;

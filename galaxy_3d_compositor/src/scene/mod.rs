//! Scene module
//!
//! Layered scene objects, fog, and the content collaborator trait.

mod layer;
mod scene;
mod content;

pub use layer::{Layer, LayerMask};
pub use scene::{Scene, SceneObject, SceneObjectKey, PointSprite, BlendMode, FogExp2};
pub use content::{SceneContent, EmptyContent};

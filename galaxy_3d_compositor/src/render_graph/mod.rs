//! Render graph module
//!
//! Pass composers, passes and the graph that orders them. A frame is the
//! execution of every composer once, in topological order.

mod render_graph;
mod pass_composer;
mod pass;
mod render_target;
mod scene_pass;
mod bloom_pass;
mod composition_pass;

pub use render_graph::{RenderGraph, ComposerId, LayeredComposers};
pub use pass_composer::{PassComposer, ComposerOutput};
pub use pass::{Pass, PassContext, PassIo, FrameContext};
pub use render_target::RenderTarget;
pub use scene_pass::ScenePass;
pub use bloom_pass::BloomPass;
pub use composition_pass::{CompositionPass, CopyPass};

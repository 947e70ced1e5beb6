/// Render graph — pass composers as nodes, images as edges.
///
/// Each composer declares named inputs (sampler name → upstream composer).
/// `compile()` validates the wiring and computes the execution order: a
/// topological order where ties keep declaration order. `execute()` runs
/// the composers strictly one after another, each with its own layer
/// mask, and refuses to feed a composer an image that was not produced in
/// the current tick.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use crate::config::{BloomParams, ToneMappingParams};
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, Texture, BLOOM_TEXTURE, OVERLAY_TEXTURE};
use crate::scene::Layer;
use crate::{engine_bail, engine_err};
use super::bloom_pass::BloomPass;
use super::composition_pass::CompositionPass;
use super::pass::FrameContext;
use super::pass_composer::{ComposerOutput, PassComposer};
use super::scene_pass::ScenePass;

/// Handle of a composer inside one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComposerId(usize);

impl ComposerId {
    pub fn index(&self) -> usize {
        self.0
    }
}

struct ComposerNode {
    composer: PassComposer,
    /// (sampler name, producer)
    inputs: Vec<(String, ComposerId)>,
}

/// Composer ids of the standard layered graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredComposers {
    pub bloom: ComposerId,
    pub overlay: ComposerId,
    pub base: ComposerId,
}

pub struct RenderGraph {
    nodes: Vec<ComposerNode>,
    order: Option<Vec<ComposerId>>,
    size: Option<(u32, u32)>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            order: None,
            size: None,
        }
    }

    /// The standard three-composer graph:
    /// - bloom: `[ScenePass, BloomPass]` off-screen
    /// - overlay: `[ScenePass]` off-screen
    /// - base: `[ScenePass, CompositionPass]` to the surface, sampling both
    pub fn layered(bloom: BloomParams, tone_mapping: ToneMappingParams) -> Result<(Self, LayeredComposers)> {
        let mut graph = Self::new();

        let bloom_id = graph.add_composer(
            PassComposer::new("bloom", Layer::Bloom, ComposerOutput::Offscreen)
                .with_pass(ScenePass::new())
                .with_pass(BloomPass::new(bloom)),
        )?;
        let overlay_id = graph.add_composer(
            PassComposer::new("overlay", Layer::Overlay, ComposerOutput::Offscreen)
                .with_pass(ScenePass::new()),
        )?;
        let base_id = graph.add_composer(
            PassComposer::new("base", Layer::Base, ComposerOutput::Surface)
                .with_pass(ScenePass::new())
                .with_pass(CompositionPass::new(tone_mapping)),
        )?;

        graph.connect(base_id, BLOOM_TEXTURE, bloom_id)?;
        graph.connect(base_id, OVERLAY_TEXTURE, overlay_id)?;

        Ok((graph, LayeredComposers { bloom: bloom_id, overlay: overlay_id, base: base_id }))
    }

    // ===== BUILD =====

    /// Add a composer. Names must be unique.
    pub fn add_composer(&mut self, composer: PassComposer) -> Result<ComposerId> {
        if self.nodes.iter().any(|n| n.composer.name() == composer.name()) {
            engine_bail!("galaxy3d::RenderGraph" => InvalidGraph,
                "Composer '{}' already exists", composer.name());
        }
        self.nodes.push(ComposerNode { composer, inputs: Vec::new() });
        self.order = None;
        Ok(ComposerId(self.nodes.len() - 1))
    }

    /// Feed `producer`'s output to `consumer` under `sampler`
    pub fn connect(&mut self, consumer: ComposerId, sampler: &str, producer: ComposerId) -> Result<()> {
        self.check_id(producer)?;
        let node = self.nodes.get_mut(consumer.0).ok_or_else(|| {
            engine_err!("galaxy3d::RenderGraph" => InvalidGraph, "Unknown composer #{}", consumer.0)
        })?;
        if node.inputs.iter().any(|(name, _)| name == sampler) {
            engine_bail!("galaxy3d::RenderGraph" => InvalidGraph,
                "Input '{}' of '{}' is already connected", sampler, node.composer.name());
        }
        node.inputs.push((sampler.to_string(), producer));
        self.order = None;
        Ok(())
    }

    fn check_id(&self, id: ComposerId) -> Result<()> {
        if id.0 >= self.nodes.len() {
            engine_bail!("galaxy3d::RenderGraph" => InvalidGraph, "Unknown composer #{}", id.0);
        }
        Ok(())
    }

    /// Validate the graph and compute the execution order
    pub fn compile(&mut self) -> Result<&[ComposerId]> {
        let count = self.nodes.len();

        let surface_count = self
            .nodes
            .iter()
            .filter(|n| n.composer.output() == ComposerOutput::Surface)
            .count();
        if surface_count > 1 {
            engine_bail!("galaxy3d::RenderGraph" => InvalidGraph,
                "{} composers write the surface, at most one may", surface_count);
        }

        let mut in_degree = vec![0usize; count];
        let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (index, node) in self.nodes.iter().enumerate() {
            if node.composer.pass_count() == 0 {
                engine_bail!("galaxy3d::RenderGraph" => InvalidGraph,
                    "Composer '{}' has no passes", node.composer.name());
            }
            for (sampler, producer) in &node.inputs {
                let producer_node = &self.nodes[producer.0];
                if producer_node.composer.output() == ComposerOutput::Surface {
                    engine_bail!("galaxy3d::RenderGraph" => InvalidGraph,
                        "Input '{}' of '{}' reads surface composer '{}'",
                        sampler, node.composer.name(), producer_node.composer.name());
                }
                in_degree[index] += 1;
                consumers[producer.0].push(index);
            }
        }

        // Kahn's algorithm, always taking the earliest declared ready node
        let mut ready: VecDeque<usize> = (0..count).filter(|i| in_degree[*i] == 0).collect();
        let mut order = Vec::with_capacity(count);
        while let Some(index) = ready.pop_front() {
            order.push(ComposerId(index));
            for consumer in &consumers[index] {
                in_degree[*consumer] -= 1;
                if in_degree[*consumer] == 0 {
                    let position = ready.iter().position(|r| r > consumer).unwrap_or(ready.len());
                    ready.insert(position, *consumer);
                }
            }
        }

        if order.len() != count {
            let stuck: Vec<&str> = (0..count)
                .filter(|i| in_degree[*i] > 0)
                .map(|i| self.nodes[i].composer.name())
                .collect();
            engine_bail!("galaxy3d::RenderGraph" => InvalidGraph,
                "Cycle between composers {:?}", stuck);
        }

        crate::engine_info!("galaxy3d::RenderGraph", "Compiled order: {:?}",
            order.iter().map(|id| self.nodes[id.0].composer.name()).collect::<Vec<_>>());
        let order = self.order.insert(order);
        Ok(order.as_slice())
    }

    // ===== ACCESSORS =====

    pub fn composer_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn composer(&self, id: ComposerId) -> Option<&PassComposer> {
        self.nodes.get(id.0).map(|n| &n.composer)
    }

    pub fn composer_by_name(&self, name: &str) -> Option<ComposerId> {
        self.nodes.iter().position(|n| n.composer.name() == name).map(ComposerId)
    }

    /// Execution order, `None` until compiled
    pub fn order(&self) -> Option<&[ComposerId]> {
        self.order.as_deref()
    }

    /// Size all composers were last resized to (physical pixels)
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    // ===== RESIZE / EXECUTE =====

    /// Recreate every composer's targets and pass resources
    pub fn resize(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<()> {
        for node in &mut self.nodes {
            node.composer.resize(device, width, height)?;
        }
        self.size = Some((width, height));
        crate::engine_info!("galaxy3d::RenderGraph",
            "Resized {} composers to {}x{}", self.nodes.len(), width, height);
        Ok(())
    }

    /// Run one composer for `frame.tick`, after checking its inputs are fresh
    pub fn execute_composer(
        &mut self,
        id: ComposerId,
        frame: FrameContext,
        device: &mut dyn GraphicsDevice,
    ) -> Result<()> {
        self.check_id(id)?;

        let mut inputs: FxHashMap<String, Arc<dyn Texture>> = FxHashMap::default();
        for (sampler, producer) in &self.nodes[id.0].inputs {
            let image = self.nodes[producer.0].composer.fresh_output(frame.tick)?;
            inputs.insert(sampler.clone(), image.clone());
        }

        self.nodes[id.0].composer.render(frame, &inputs, device)
    }

    /// Run every composer in order. Returns the names in execution order.
    pub fn execute(&mut self, frame: FrameContext, device: &mut dyn GraphicsDevice) -> Result<Vec<String>> {
        if self.order.is_none() {
            self.compile()?;
        }
        let order = self.order.clone().unwrap_or_default();

        let mut executed = Vec::with_capacity(order.len());
        for id in order {
            self.execute_composer(id, frame, device)?;
            executed.push(self.nodes[id.0].composer.name().to_string());
        }

        crate::engine_trace!("galaxy3d::RenderGraph", "Tick {} executed {:?}", frame.tick, executed);
        Ok(executed)
    }
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "render_graph_tests.rs"]
mod tests;

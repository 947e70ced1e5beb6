/// Visual layers and visibility masks.
///
/// Every scene object belongs to exactly one layer. A pass composer renders
/// the scene through a mask holding exactly its own layer.

use bitflags::bitflags;

/// Layer an object is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Regular geometry, shown as-is in the final frame
    Base,
    /// Glowing elements, only visible through the bloom image
    Bloom,
    /// Interface elements drawn on top of everything
    Overlay,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Base, Layer::Bloom, Layer::Overlay];

    pub fn mask(self) -> LayerMask {
        match self {
            Layer::Base => LayerMask::BASE,
            Layer::Bloom => LayerMask::BLOOM,
            Layer::Overlay => LayerMask::OVERLAY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Base => "base",
            Layer::Bloom => "bloom",
            Layer::Overlay => "overlay",
        }
    }
}

bitflags! {
    /// Set of layers selected for one render
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u32 {
        const BASE = 1 << 0;
        const BLOOM = 1 << 1;
        const OVERLAY = 1 << 2;
    }
}

impl LayerMask {
    pub fn contains_layer(self, layer: Layer) -> bool {
        self.contains(layer.mask())
    }

    /// True if exactly one layer is selected
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}

/// Graphics device module - backend traits and the plugin registry

pub mod graphics_device;
pub mod texture;
pub mod command_list;
pub mod program;
pub mod plugin;

pub use graphics_device::*;
pub use texture::*;
pub use command_list::*;
pub use program::*;
pub use plugin::*;

// Mock graphics device for tests (no pixels)
#[cfg(test)]
pub mod mock_graphics_device;

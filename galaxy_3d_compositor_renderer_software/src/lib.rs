/*!
# Galaxy 3D Compositor - Software Renderer Backend

CPU implementation of the Galaxy 3D compositor graphics device traits.

Textures are RGBA float buffers in system memory, point sprites are
rasterized as discs, and the fullscreen programs (luminosity high-pass,
separable Gaussian blur, bloom mix, ACES filmic composition) run per pixel.
Used for headless rendering and pixel-level tests.

The backend is registered as the `"software"` plugin and can be selected
at runtime.
*/

mod rasterizer;
mod sampler;
mod shaders;
mod software_texture;
mod software_command_list;
mod software_graphics_device;

pub use software_graphics_device::GraphicsDevice as SoftwareGraphicsDevice;
pub use software_graphics_device::create_software_graphics_device;
pub use software_command_list::CommandList as SoftwareCommandList;
pub use software_texture::Texture as SoftwareTexture;

use galaxy_3d_compositor::galaxy3d::Result;
use galaxy_3d_compositor::galaxy3d::render::register_graphics_device_plugin;

/// Name of the plugin in the graphics device registry
pub const PLUGIN_NAME: &str = "software";

/// Register the software backend with the plugin system
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_compositor::galaxy3d::render::{create_graphics_device, DeviceConfig};
///
/// galaxy_3d_compositor_renderer_software::register()?;
/// let device = create_graphics_device("software", DeviceConfig::default(), 800, 600)?;
/// # Ok::<(), galaxy_3d_compositor::galaxy3d::Error>(())
/// ```
pub fn register() -> Result<()> {
    register_graphics_device_plugin(PLUGIN_NAME, create_software_graphics_device)
}

/// Plugin system for registering graphics device backends

use std::sync::{Arc, Mutex, OnceLock};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use super::{DeviceConfig, GraphicsDevice};

/// Graphics device factory: (config, surface width, surface height)
type GraphicsDevicePluginFactory =
    Box<dyn Fn(DeviceConfig, u32, u32) -> Result<Arc<Mutex<dyn GraphicsDevice>>> + Send + Sync>;

/// Plugin registry for graphics device backends
pub struct GraphicsDevicePluginRegistry {
    plugins: FxHashMap<&'static str, GraphicsDevicePluginFactory>,
}

impl GraphicsDevicePluginRegistry {
    fn new() -> Self {
        Self {
            plugins: FxHashMap::default(),
        }
    }

    /// Register a plugin, replacing any plugin with the same name
    pub fn register_plugin<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn(DeviceConfig, u32, u32) -> Result<Arc<Mutex<dyn GraphicsDevice>>> + Send + Sync + 'static,
    {
        self.plugins.insert(name, Box::new(factory));
    }

    /// Create a device using a registered plugin
    pub fn create_graphics_device(
        &self,
        plugin_name: &str,
        config: DeviceConfig,
        width: u32,
        height: u32,
    ) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let factory = self.plugins.get(plugin_name).ok_or_else(|| {
            crate::engine_err!("galaxy3d::GraphicsDevicePlugin" => InitializationFailed,
                "Plugin '{}' not found", plugin_name)
        })?;
        factory(config, width, height)
    }

    /// Registered plugin names, sorted
    pub fn plugin_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.plugins.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

static GRAPHICS_DEVICE_REGISTRY: OnceLock<Mutex<GraphicsDevicePluginRegistry>> = OnceLock::new();

/// Global graphics device plugin registry
pub fn graphics_device_plugin_registry() -> &'static Mutex<GraphicsDevicePluginRegistry> {
    GRAPHICS_DEVICE_REGISTRY.get_or_init(|| Mutex::new(GraphicsDevicePluginRegistry::new()))
}

fn poisoned() -> Error {
    crate::engine_err!("galaxy3d::GraphicsDevicePlugin" => InitializationFailed,
        "Plugin registry lock poisoned")
}

/// Register a graphics device plugin in the global registry
pub fn register_graphics_device_plugin<F>(name: &'static str, factory: F) -> Result<()>
where
    F: Fn(DeviceConfig, u32, u32) -> Result<Arc<Mutex<dyn GraphicsDevice>>> + Send + Sync + 'static,
{
    graphics_device_plugin_registry()
        .lock()
        .map_err(|_| poisoned())?
        .register_plugin(name, factory);
    crate::engine_info!("galaxy3d::GraphicsDevicePlugin", "Registered plugin '{}'", name);
    Ok(())
}

/// Create a graphics device from the global registry
///
/// # Errors
///
/// `InitializationFailed` if no plugin has this name, or whatever the
/// plugin's factory returns.
pub fn create_graphics_device(
    plugin_name: &str,
    config: DeviceConfig,
    width: u32,
    height: u32,
) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
    let device = graphics_device_plugin_registry()
        .lock()
        .map_err(|_| poisoned())?
        .create_graphics_device(plugin_name, config, width, height)?;
    crate::engine_info!("galaxy3d::GraphicsDevicePlugin",
        "Created '{}' graphics device ({}x{})", plugin_name, width, height);
    Ok(device)
}

/// Names of all plugins in the global registry
pub fn graphics_device_plugin_names() -> Vec<&'static str> {
    graphics_device_plugin_registry()
        .lock()
        .map(|registry| registry.plugin_names())
        .unwrap_or_default()
}

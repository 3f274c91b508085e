//! Ordered plugin registry.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{ArcPlugin, Plugin, PluginError, PluginResult};

/// Keeps plugins in registration order and rejects duplicate names.
///
/// Renders take a [`snapshot`](Self::snapshot) up front, so registering or
/// removing plugins never affects a render in progress.
#[derive(Default)]
pub struct PluginRegistry {
	plugins: RwLock<Vec<ArcPlugin>>,
}

impl PluginRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a plugin.
	///
	/// # Errors
	///
	/// Returns [`PluginError::AlreadyRegistered`] if a plugin with the same
	/// name is present. The registry is left unchanged.
	pub fn register<P: Plugin + 'static>(&self, plugin: P) -> PluginResult<()> {
		self.register_arc(Arc::new(plugin))
	}

	/// Registers an already shared plugin.
	pub fn register_arc(&self, plugin: ArcPlugin) -> PluginResult<()> {
		let mut plugins = self.plugins.write();
		let name = plugin.name().to_string();
		if plugins.iter().any(|existing| existing.name() == name) {
			return Err(PluginError::AlreadyRegistered(name));
		}
		tracing::debug!(plugin = %name, position = plugins.len(), "registered render plugin");
		plugins.push(plugin);
		Ok(())
	}

	/// Removes a plugin by name.
	pub fn unregister(&self, name: &str) -> PluginResult<ArcPlugin> {
		let mut plugins = self.plugins.write();
		let index = plugins
			.iter()
			.position(|plugin| plugin.name() == name)
			.ok_or_else(|| PluginError::NotFound(name.to_string()))?;
		Ok(plugins.remove(index))
	}

	/// Returns a plugin by name.
	pub fn get(&self, name: &str) -> Option<ArcPlugin> {
		self.plugins
			.read()
			.iter()
			.find(|plugin| plugin.name() == name)
			.cloned()
	}

	/// Checks whether a plugin is registered.
	pub fn is_registered(&self, name: &str) -> bool {
		self.plugins.read().iter().any(|plugin| plugin.name() == name)
	}

	/// Returns plugin names in registration order.
	pub fn names(&self) -> Vec<String> {
		self.plugins
			.read()
			.iter()
			.map(|plugin| plugin.name().to_string())
			.collect()
	}

	/// Returns the number of plugins.
	pub fn len(&self) -> usize {
		self.plugins.read().len()
	}

	/// Checks whether the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.plugins.read().is_empty()
	}

	/// Returns the plugins in registration order.
	pub fn snapshot(&self) -> Vec<ArcPlugin> {
		self.plugins.read().clone()
	}
}

impl std::fmt::Debug for PluginRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PluginRegistry")
			.field("plugins", &self.names())
			.finish()
	}
}

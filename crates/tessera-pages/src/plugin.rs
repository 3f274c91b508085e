//! Plugin pipeline.
//!
//! Plugins observe and rewrite a render at four points:
//!
//! | Hook | When | Order |
//! |------|------|-------|
//! | [`Plugin::render_before`] | once, before the tree is walked | registration |
//! | [`Plugin::render_node_before`] | before each node; may replace it | registration |
//! | [`Plugin::render_node_after`] | after each node; may rewrite its HTML | reverse |
//! | [`Plugin::render_after`] | once, on the whole output | reverse |
//!
//! Plugins are shared across concurrent renders, so they hold no per-render
//! state; anything a plugin needs to remember during one render goes into
//! the [`RenderContext`] extension map.

mod registry;
mod slot;

use std::sync::Arc;

use tessera_core::{Node, RenderResult};
use thiserror::Error;

use crate::ssr::RenderContext;

pub use registry::PluginRegistry;
pub use slot::{SlotDescriptor, SlotPlugin, slot_fill, slot_outlet};

/// Result type for plugin registry operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Plugin registry errors.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PluginError {
	/// A plugin with the same name is already registered.
	#[error("plugin already registered: {0}")]
	AlreadyRegistered(String),

	/// No plugin with this name is registered.
	#[error("plugin not found: {0}")]
	NotFound(String),
}

/// A render plugin. Every hook defaults to a no-op.
pub trait Plugin: Send + Sync {
	/// Unique plugin name.
	fn name(&self) -> &str;

	/// Called once before the tree is rendered.
	fn render_before(&self, _ctx: &mut RenderContext) -> RenderResult<()> {
		Ok(())
	}

	/// Called once with the complete output, before assets are appended.
	fn render_after(&self, _html: &mut String, _ctx: &mut RenderContext) -> RenderResult<()> {
		Ok(())
	}

	/// Called before a node is rendered. Returning a node replaces it.
	fn render_node_before(
		&self,
		_node: &Node,
		_ctx: &mut RenderContext,
	) -> RenderResult<Option<Node>> {
		Ok(None)
	}

	/// Called with the HTML produced for a node; returns the HTML to keep.
	fn render_node_after(
		&self,
		_node: &Node,
		html: String,
		_ctx: &mut RenderContext,
	) -> RenderResult<String> {
		Ok(html)
	}
}

/// Shared plugin handle.
pub type ArcPlugin = Arc<dyn Plugin>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Noop;

	impl Plugin for Noop {
		fn name(&self) -> &str {
			"noop"
		}
	}

	#[rstest]
	fn test_default_hooks_are_identity() {
		let plugin = Noop;
		let mut ctx = RenderContext::new();
		let node = Node::text("x");

		plugin.render_before(&mut ctx).unwrap();
		assert!(plugin.render_node_before(&node, &mut ctx).unwrap().is_none());
		assert_eq!(
			plugin
				.render_node_after(&node, "x".to_string(), &mut ctx)
				.unwrap(),
			"x"
		);
		let mut html = "<p>x</p>".to_string();
		plugin.render_after(&mut html, &mut ctx).unwrap();
		assert_eq!(html, "<p>x</p>");
	}

	#[rstest]
	fn test_plugin_error_display() {
		assert_eq!(
			PluginError::AlreadyRegistered("styled".into()).to_string(),
			"plugin already registered: styled"
		);
	}
}

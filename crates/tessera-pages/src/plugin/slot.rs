//! Named slots: content rendered in one place of the tree and emitted in another.
//!
//! A fill renders to nothing where it stands; its markup is buffered in the
//! render context. An outlet leaves a placeholder that `render_after`
//! replaces with the buffered markup, so a fill may come before or after
//! its outlet. An outlet without a fill shows its own children.

use indexmap::IndexMap;
use tessera_core::{Component, IntoNode, Node, RenderResult};

use super::Plugin;
use crate::ssr::RenderContext;

const PLACEHOLDER_PREFIX: &str = "<!--tessera-slot:";
const PLACEHOLDER_SUFFIX: &str = "-->";

/// Marks a component as a slot fill or outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotDescriptor {
	/// Buffers the component's output under this name.
	Fill(String),
	/// Emits the buffered output for this name.
	Outlet(String),
}

#[derive(Debug, Default)]
struct SlotBuffer {
	fills: IndexMap<String, String>,
	fallbacks: IndexMap<String, String>,
}

/// Creates a component whose children are rendered into the named slot.
pub fn slot_fill<I, N>(name: impl Into<String>, children: I) -> Component
where
	I: IntoIterator<Item = N>,
	N: IntoNode,
{
	let name = name.into();
	Component::new(format!("SlotFill({})", name), |_, children| {
		Node::Fragment(children.to_vec())
	})
	.with_meta(SlotDescriptor::Fill(name))
	.children(children)
}

/// Creates the outlet of a named slot. `fallback` is shown when nothing fills it.
pub fn slot_outlet<I, N>(name: impl Into<String>, fallback: I) -> Component
where
	I: IntoIterator<Item = N>,
	N: IntoNode,
{
	let name = name.into();
	Component::new(format!("SlotOutlet({})", name), |_, children| {
		Node::Fragment(children.to_vec())
	})
	.with_meta(SlotDescriptor::Outlet(name))
	.children(fallback)
}

/// Plugin implementing [`slot_fill`] / [`slot_outlet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotPlugin;

impl SlotPlugin {
	/// Creates the plugin.
	pub fn new() -> Self {
		Self
	}
}

fn descriptor(node: &Node) -> Option<&SlotDescriptor> {
	node.as_component()
		.and_then(|component| component.meta().get::<SlotDescriptor>())
}

fn placeholder(name: &str) -> String {
	format!("{}{}{}", PLACEHOLDER_PREFIX, name, PLACEHOLDER_SUFFIX)
}

impl Plugin for SlotPlugin {
	fn name(&self) -> &str {
		"slot"
	}

	fn render_node_after(
		&self,
		node: &Node,
		html: String,
		ctx: &mut RenderContext,
	) -> RenderResult<String> {
		match descriptor(node) {
			Some(SlotDescriptor::Fill(name)) => {
				let buffer = ctx.extension_or_default::<SlotBuffer>();
				buffer.fills.entry(name.clone()).or_default().push_str(&html);
				tracing::trace!(slot = %name, "buffered slot fill");
				Ok(String::new())
			}
			Some(SlotDescriptor::Outlet(name)) => {
				let buffer = ctx.extension_or_default::<SlotBuffer>();
				buffer.fallbacks.entry(name.clone()).or_insert(html);
				Ok(placeholder(name))
			}
			None => Ok(html),
		}
	}

	fn render_after(&self, html: &mut String, ctx: &mut RenderContext) -> RenderResult<()> {
		let Some(buffer) = ctx.remove_extension::<SlotBuffer>() else {
			return Ok(());
		};
		// Spliced content may hold outlets of other slots; each pass resolves
		// one level of nesting.
		for _ in 0..=buffer.fallbacks.len() {
			let mut replaced = false;
			for (name, fallback) in &buffer.fallbacks {
				let marker = placeholder(name);
				if html.contains(&marker) {
					let content = buffer.fills.get(name).unwrap_or(fallback);
					*html = html.replace(&marker, content);
					replaced = true;
				}
			}
			if !replaced {
				return Ok(());
			}
		}

		// Only a slot that fills itself is left at this point.
		for name in buffer.fallbacks.keys() {
			let marker = placeholder(name);
			if html.contains(&marker) {
				tracing::warn!(slot = %name, "dropping self-referencing slot outlet");
				*html = html.replace(&marker, "");
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::plugin::PluginRegistry;
	use crate::ssr::Renderer;
	use rstest::rstest;
	use std::sync::Arc;
	use tessera_core::Element;

	fn renderer() -> Renderer {
		let registry = Arc::new(PluginRegistry::new());
		registry.register(SlotPlugin::new()).unwrap();
		Renderer::new().with_plugins(registry)
	}

	#[rstest]
	fn test_fill_before_outlet() {
		let page = Node::fragment([
			slot_fill("title", ["Dashboard"]).into_node(),
			Element::new("h1")
				.child(slot_outlet("title", ["Untitled"]))
				.into_node(),
		]);
		assert_eq!(renderer().render(&page).unwrap(), "<h1>Dashboard</h1>");
	}

	#[rstest]
	fn test_fill_after_outlet() {
		let page = Node::fragment([
			Element::new("head")
				.child(slot_outlet("head", Vec::<Node>::new()))
				.into_node(),
			slot_fill("head", [Element::new("meta").attr("charset", "utf-8")]).into_node(),
			slot_fill("head", [Element::new("title").child("Home")]).into_node(),
		]);
		assert_eq!(
			renderer().render(&page).unwrap(),
			"<head><meta charset=\"utf-8\"/><title>Home</title></head>"
		);
	}

	#[rstest]
	fn test_outlet_without_fill_uses_fallback() {
		let page = slot_outlet("footer", ["(c) Tessera"]).into_node();
		assert_eq!(renderer().render(&page).unwrap(), "(c) Tessera");
	}

	#[rstest]
	fn test_outlet_inside_fill() {
		let layout = Node::fragment([
			Element::new("head")
				.child(slot_outlet("title", Vec::<Node>::new()))
				.into_node(),
			Element::new("body")
				.child(slot_outlet("body", Vec::<Node>::new()))
				.into_node(),
		]);
		let page = Node::fragment([
			layout,
			slot_fill(
				"body",
				[Element::new("h1").child(slot_outlet("title", ["Untitled"]))],
			)
			.into_node(),
			slot_fill("title", ["Docs"]).into_node(),
		]);
		assert_eq!(
			renderer().render(&page).unwrap(),
			"<head>Docs</head><body><h1>Docs</h1></body>"
		);
	}

	#[rstest]
	fn test_outlet_fallback_with_nested_outlet() {
		let page = Node::fragment([
			slot_outlet("main", [slot_outlet("hint", ["nothing here"])]).into_node(),
			slot_fill("hint", ["empty inbox"]).into_node(),
		]);
		assert_eq!(renderer().render(&page).unwrap(), "empty inbox");
	}

	#[rstest]
	fn test_self_referencing_fill_is_dropped() {
		let page = Node::fragment([
			Element::new("p")
				.child(slot_outlet("loop", Vec::<Node>::new()))
				.into_node(),
			slot_fill("loop", [slot_outlet("loop", ["x"])]).into_node(),
		]);
		assert_eq!(renderer().render(&page).unwrap(), "<p></p>");
	}

	#[rstest]
	fn test_without_plugin_slots_render_inline() {
		let page = Node::fragment([
			slot_fill("a", ["x"]).into_node(),
			slot_outlet("a", ["y"]).into_node(),
		]);
		assert_eq!(Renderer::new().render(&page).unwrap(), "xy");
	}
}

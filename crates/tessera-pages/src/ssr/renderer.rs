//! Recursive renderer.

use std::borrow::Cow;
use std::sync::Arc;

use tessera_core::{Component, Element, Node, RenderError, RenderResult, html_escape};

use super::context::{RenderAssets, RenderContext};
use crate::plugin::{ArcPlugin, PluginRegistry};
use crate::settings::RenderSettings;

/// Markup and assets of a render, kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
	/// Rendered markup without any appended asset blocks.
	pub html: String,
	/// CSS and scripts collected by plugins.
	pub assets: RenderAssets,
}

impl RenderOutput {
	/// Returns the markup followed by every asset block.
	pub fn into_html_with_assets(self) -> String {
		let mut html = self.html;
		html.push_str(&self.assets.to_html());
		html
	}
}

/// Renders node trees through a plugin pipeline.
///
/// A renderer is cheap to clone and safe to share: the plugin registry is
/// behind an `Arc` and every render gets its own [`RenderContext`].
///
/// ```
/// use tessera_core::{Element, IntoNode};
/// use tessera_pages::ssr::Renderer;
///
/// let node = Element::new("p").child("a < b").into_node();
/// assert_eq!(Renderer::new().render(&node).unwrap(), "<p>a &lt; b</p>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
	plugins: Arc<PluginRegistry>,
	settings: RenderSettings,
}

impl Renderer {
	/// Creates a renderer with no plugins and default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Uses the given plugin registry.
	pub fn with_plugins(mut self, plugins: Arc<PluginRegistry>) -> Self {
		self.plugins = plugins;
		self
	}

	/// Uses the given settings.
	pub fn with_settings(mut self, settings: RenderSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Returns the plugin registry.
	pub fn plugins(&self) -> &Arc<PluginRegistry> {
		&self.plugins
	}

	/// Returns the settings.
	pub fn settings(&self) -> &RenderSettings {
		&self.settings
	}

	/// Renders a node to an HTML string.
	///
	/// Unless `append_assets` is disabled, the collected external scripts,
	/// `<style>` block and inline `<script>` block follow the markup.
	pub fn render(&self, node: &Node) -> RenderResult<String> {
		let output = self.render_fragment(node)?;
		if self.settings.append_assets {
			Ok(output.into_html_with_assets())
		} else {
			Ok(output.html)
		}
	}

	/// Renders a node, returning markup and collected assets separately.
	pub fn render_fragment(&self, node: &Node) -> RenderResult<RenderOutput> {
		let plugins = self.plugins.snapshot();
		let mut ctx = RenderContext::new();

		for plugin in &plugins {
			plugin.render_before(&mut ctx)?;
		}

		let mut html = self.render_node(node, &plugins, &mut ctx)?;

		for plugin in plugins.iter().rev() {
			plugin.render_after(&mut html, &mut ctx)?;
		}

		tracing::trace!(
			nodes = ctx.nodes_visited(),
			bytes = html.len(),
			"rendered node tree"
		);

		Ok(RenderOutput {
			html,
			assets: ctx.into_assets(),
		})
	}

	fn render_node(
		&self,
		node: &Node,
		plugins: &[ArcPlugin],
		ctx: &mut RenderContext,
	) -> RenderResult<String> {
		ctx.enter(self.settings.max_depth)?;

		let mut current = Cow::Borrowed(node);
		for plugin in plugins {
			if let Some(replacement) = plugin.render_node_before(&current, ctx)? {
				current = Cow::Owned(replacement);
			}
		}

		let mut html = match current.as_ref() {
			Node::Text(text) => html_escape(text).into_owned(),
			Node::Html(raw) => raw.to_string(),
			Node::Fragment(children) => self.render_children(children, plugins, ctx)?,
			Node::Element(element) => self.render_element(element, plugins, ctx)?,
			Node::Component(component) => self.render_component(component, plugins, ctx)?,
			Node::Empty => String::new(),
		};

		for plugin in plugins.iter().rev() {
			html = plugin.render_node_after(&current, html, ctx)?;
		}

		ctx.leave();
		Ok(html)
	}

	fn render_children(
		&self,
		children: &[Node],
		plugins: &[ArcPlugin],
		ctx: &mut RenderContext,
	) -> RenderResult<String> {
		let mut html = String::new();
		for child in children {
			html.push_str(&self.render_node(child, plugins, ctx)?);
		}
		Ok(html)
	}

	fn render_element(
		&self,
		element: &Element,
		plugins: &[ArcPlugin],
		ctx: &mut RenderContext,
	) -> RenderResult<String> {
		let mut html = String::with_capacity(64);
		html.push('<');
		html.push_str(element.tag());
		element.attributes().write_html(&mut html);

		if element.is_void() {
			html.push_str("/>");
			return Ok(html);
		}

		html.push('>');
		html.push_str(&self.render_children(element.child_nodes(), plugins, ctx)?);
		html.push_str("</");
		html.push_str(element.tag());
		html.push('>');
		Ok(html)
	}

	fn render_component(
		&self,
		component: &Component,
		plugins: &[ArcPlugin],
		ctx: &mut RenderContext,
	) -> RenderResult<String> {
		let attrs = component.attributes();
		let replacement = component.resolve(&attrs).map_err(|source| {
			let mut stack = ctx.component_stack().to_vec();
			stack.push(component.name().to_string());
			RenderError::Component {
				component: component.name().to_string(),
				stack,
				source,
			}
		})?;
		tracing::debug!(
			component = component.name(),
			depth = ctx.depth(),
			"resolved component"
		);

		ctx.push_component(component.name());
		let html = self.render_node(&replacement, plugins, ctx);
		ctx.pop_component();
		html
	}
}

/// Renders a node with no plugins and default settings.
pub fn render(node: &Node) -> RenderResult<String> {
	Renderer::new().render(node)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::plugin::Plugin;
	use rstest::rstest;
	use serde_json::json;
	use tessera_core::IntoNode;

	#[rstest]
	fn test_render_html_is_verbatim() {
		assert_eq!(render(&Node::html("<b>x</b>")).unwrap(), "<b>x</b>");
	}

	#[rstest]
	fn test_render_text_is_escaped() {
		assert_eq!(
			render(&Node::text("<b>'x' & \"y\"</b>")).unwrap(),
			"&lt;b&gt;&#x27;x&#x27; &amp; &quot;y&quot;&lt;/b&gt;"
		);
	}

	#[rstest]
	fn test_void_element_ignores_children() {
		let node = Element::new("img")
			.attr("src", "a.png")
			.child("ignored")
			.into_node();
		assert_eq!(render(&node).unwrap(), "<img src=\"a.png\"/>");
	}

	#[rstest]
	fn test_fragment_is_transparent() {
		let node = Node::fragment([Element::new("div"), Element::new("span")]);
		assert_eq!(render(&node).unwrap(), "<div></div><span></span>");
	}

	#[rstest]
	fn test_component_receives_normalized_attributes() {
		let card = Component::new("Card", |attrs, children| {
			Element::new("section")
				.with_attributes(attrs.clone())
				.children(children.to_vec())
				.into_node()
		})
		.attr("className", json!(["card", {"active": true}]))
		.child("body");

		assert_eq!(
			render(&card.into_node()).unwrap(),
			"<section class=\"card active\">body</section>"
		);
	}

	#[rstest]
	fn test_component_error_carries_stack() {
		let inner = Component::try_new("Inner", |_, _| Err("no data".into()));
		let outer = Component::new("Outer", move |_, _| {
			Element::new("div").child(inner.clone()).into_node()
		});

		let err = render(&outer.into_node()).unwrap_err();
		match &err {
			RenderError::Component {
				component, stack, ..
			} => {
				assert_eq!(component, "Inner");
				assert_eq!(stack, &["Outer", "Inner"]);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_depth_limit() {
		let mut node = Node::text("leaf");
		for _ in 0..10 {
			node = Element::new("div").child(node).into_node();
		}
		let renderer = Renderer::new().with_settings(RenderSettings {
			max_depth: 5,
			..RenderSettings::default()
		});

		let err = renderer.render(&node).unwrap_err();
		assert!(matches!(err, RenderError::DepthExceeded { limit: 5, .. }));
	}

	struct Shout;

	impl Plugin for Shout {
		fn name(&self) -> &str {
			"shout"
		}

		fn render_node_before(
			&self,
			node: &Node,
			ctx: &mut RenderContext,
		) -> RenderResult<Option<Node>> {
			ctx.add_style("p{font-weight:bold}");
			Ok(match node {
				Node::Text(text) => Some(Node::text(text.to_uppercase())),
				_ => None,
			})
		}
	}

	#[rstest]
	fn test_render_fragment_keeps_assets_apart() {
		let registry = Arc::new(PluginRegistry::new());
		registry.register(Shout).unwrap();
		let renderer = Renderer::new().with_plugins(registry);
		let node = Element::new("p").child("hi").into_node();

		let output = renderer.render_fragment(&node).unwrap();
		assert_eq!(output.html, "<p>HI</p>");
		assert_eq!(output.assets.styles, ["p{font-weight:bold}"]);
		assert_eq!(
			renderer.render(&node).unwrap(),
			"<p>HI</p><style>p{font-weight:bold}</style>"
		);
	}

	#[rstest]
	fn test_append_assets_disabled() {
		let registry = Arc::new(PluginRegistry::new());
		registry.register(Shout).unwrap();
		let renderer = Renderer::new()
			.with_plugins(registry)
			.with_settings(RenderSettings {
				append_assets: false,
				..RenderSettings::default()
			});

		assert_eq!(renderer.render(&Node::text("hi")).unwrap(), "HI");
	}
}

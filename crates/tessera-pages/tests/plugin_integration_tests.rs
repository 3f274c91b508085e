//! Plugin pipeline integration tests.
//!
//! Test Categories:
//! 1. Hook ordering across several plugins
//! 2. Registry management
//! 3. Node replacement and output rewriting
//! 4. Built-in plugins working together (slots, styled)

use std::sync::{Arc, Mutex};

use rstest::rstest;
use tessera_core::{Component, Element, IntoNode, Node, RenderError, RenderResult};
use tessera_pages::plugin::{
	Plugin, PluginError, PluginRegistry, SlotPlugin, slot_fill, slot_outlet,
};
use tessera_pages::ssr::{RenderContext, Renderer};
use tessera_pages::styled::{StyledComponent, StyledPlugin};

type Log = Arc<Mutex<Vec<String>>>;

/// Records every hook call as `"{name}:{hook}"`.
struct Recorder {
	name: &'static str,
	log: Log,
}

impl Recorder {
	fn push(&self, hook: &str) {
		self.log.lock().unwrap().push(format!("{}:{}", self.name, hook));
	}
}

impl Plugin for Recorder {
	fn name(&self) -> &str {
		self.name
	}

	fn render_before(&self, _ctx: &mut RenderContext) -> RenderResult<()> {
		self.push("before");
		Ok(())
	}

	fn render_after(&self, _html: &mut String, _ctx: &mut RenderContext) -> RenderResult<()> {
		self.push("after");
		Ok(())
	}

	fn render_node_before(
		&self,
		_node: &Node,
		_ctx: &mut RenderContext,
	) -> RenderResult<Option<Node>> {
		self.push("node_before");
		Ok(None)
	}

	fn render_node_after(
		&self,
		_node: &Node,
		html: String,
		_ctx: &mut RenderContext,
	) -> RenderResult<String> {
		self.push("node_after");
		Ok(html)
	}
}

fn recording_renderer(names: &[&'static str]) -> (Renderer, Log) {
	let log = Log::default();
	let registry = Arc::new(PluginRegistry::new());
	for name in names {
		registry
			.register(Recorder {
				name,
				log: Arc::clone(&log),
			})
			.unwrap();
	}
	(Renderer::new().with_plugins(registry), log)
}

// ============================================================================
// Hook ordering
// ============================================================================

#[rstest]
fn test_before_hooks_in_order_after_hooks_reversed() {
	let (renderer, log) = recording_renderer(&["a", "b"]);
	renderer.render(&Node::text("x")).unwrap();

	assert_eq!(
		*log.lock().unwrap(),
		[
			"a:before",
			"b:before",
			"a:node_before",
			"b:node_before",
			"b:node_after",
			"a:node_after",
			"b:after",
			"a:after",
		]
	);
}

#[rstest]
fn test_node_hooks_run_for_every_node() {
	let (renderer, log) = recording_renderer(&["only"]);
	let tree = Element::new("ul")
		.child(Element::new("li").child("one"))
		.child(Element::new("li").child("two"))
		.into_node();
	renderer.render(&tree).unwrap();

	let log = log.lock().unwrap();
	let visited = log.iter().filter(|entry| *entry == "only:node_before").count();
	// ul, two li elements and two text nodes
	assert_eq!(visited, 5);
}

// ============================================================================
// Registry management
// ============================================================================

#[rstest]
fn test_duplicate_name_is_rejected() {
	let registry = PluginRegistry::new();
	registry.register(SlotPlugin::new()).unwrap();

	let err = registry.register(SlotPlugin::new()).unwrap_err();
	assert_eq!(err, PluginError::AlreadyRegistered("slot".to_string()));
	assert_eq!(registry.len(), 1);
}

#[rstest]
fn test_unregister_removes_plugin_from_later_renders() {
	let (renderer, log) = recording_renderer(&["a", "b"]);
	renderer.plugins().unregister("a").unwrap();
	renderer.render(&Node::text("x")).unwrap();

	assert!(log.lock().unwrap().iter().all(|entry| entry.starts_with("b:")));
	assert_eq!(
		renderer.plugins().unregister("a").err(),
		Some(PluginError::NotFound("a".to_string()))
	);
}

// ============================================================================
// Node replacement and output rewriting
// ============================================================================

/// Replaces every `<blink>` element with a `<span>`.
struct NoBlink;

impl Plugin for NoBlink {
	fn name(&self) -> &str {
		"no-blink"
	}

	fn render_node_before(
		&self,
		node: &Node,
		_ctx: &mut RenderContext,
	) -> RenderResult<Option<Node>> {
		match node.as_element() {
			Some(element) if element.tag() == "blink" => Ok(Some(
				Element::new("span")
					.children(element.child_nodes().to_vec())
					.into_node(),
			)),
			_ => Ok(None),
		}
	}
}

/// Uppercases the final output.
struct Shout;

impl Plugin for Shout {
	fn name(&self) -> &str {
		"shout"
	}

	fn render_after(&self, html: &mut String, _ctx: &mut RenderContext) -> RenderResult<()> {
		*html = html.to_uppercase();
		Ok(())
	}
}

#[rstest]
fn test_node_replacement_and_output_rewrite() {
	let registry = Arc::new(PluginRegistry::new());
	registry.register(NoBlink).unwrap();
	registry.register(Shout).unwrap();
	let renderer = Renderer::new().with_plugins(registry);

	let html = renderer
		.render(&Element::new("p").child(Element::new("blink").child("hi")).into_node())
		.unwrap();
	assert_eq!(html, "<P><SPAN>HI</SPAN></P>");
}

/// Fails every render.
struct Veto;

impl Plugin for Veto {
	fn name(&self) -> &str {
		"veto"
	}

	fn render_before(&self, _ctx: &mut RenderContext) -> RenderResult<()> {
		Err(RenderError::plugin("veto", "render_before", "rendering disabled"))
	}
}

#[rstest]
fn test_plugin_error_aborts_render() {
	let registry = Arc::new(PluginRegistry::new());
	registry.register(Veto).unwrap();
	let err = Renderer::new()
		.with_plugins(registry)
		.render(&Node::text("x"))
		.unwrap_err();
	assert!(matches!(err, RenderError::Plugin { ref plugin, .. } if plugin == "veto"));
	assert_eq!(
		err.to_string(),
		"plugin 'veto' failed during render_before: rendering disabled"
	);
}

// ============================================================================
// Built-in plugins
// ============================================================================

fn builtin_renderer() -> Renderer {
	let registry = Arc::new(PluginRegistry::new());
	registry.register(SlotPlugin::new()).unwrap();
	registry.register(StyledPlugin::new()).unwrap();
	Renderer::new().with_plugins(registry)
}

#[rstest]
fn test_layout_with_slots_and_styles() {
	let title = StyledComponent::new("h1", "font-size: 2rem;");
	let layout = Component::new("Layout", |_, children| {
		Element::new("html")
			.child(Element::new("head").child(slot_outlet("head", [Element::new("title").child("Untitled")])))
			.child(Element::new("body").children(children.to_vec()))
			.into_node()
	});

	let page = layout
		.child(slot_fill("head", [Element::new("title").child("Home")]))
		.child(title.node().child("Welcome"));
	let html = builtin_renderer().render(&page.into_node()).unwrap();

	let class = title.class_name();
	assert_eq!(
		html,
		format!(
			"<html><head><title>Home</title></head><body><h1 class=\"{class}\">Welcome</h1></body></html><style>.{class}{{font-size: 2rem}}</style>"
		)
	);
}

#[rstest]
fn test_unfilled_slot_shows_fallback() {
	let page = Node::fragment([
		slot_outlet("sidebar", ["No sidebar"]).into_node(),
		Element::new("main").into_node(),
	]);
	assert_eq!(
		builtin_renderer().render(&page).unwrap(),
		"No sidebar<main></main>"
	);
}

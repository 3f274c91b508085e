//! Per-render state.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use indexmap::IndexSet;
use tessera_core::{RenderError, RenderResult, html_escape};

/// State of one top-level render call.
///
/// Created by the renderer, passed to every plugin hook and dropped when
/// the render returns. Nothing in it outlives the render, so concurrent
/// renders never observe each other's assets or scratch data.
#[derive(Default)]
pub struct RenderContext {
	styles: IndexSet<String>,
	scripts: IndexSet<String>,
	external_scripts: IndexSet<String>,
	depth: usize,
	nodes_visited: u64,
	component_stack: Vec<String>,
	extensions: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl RenderContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a CSS string. Returns `false` if the exact string was already present.
	pub fn add_style(&mut self, css: impl Into<String>) -> bool {
		self.styles.insert(css.into())
	}

	/// Adds an inline script. Returns `false` if it was already present.
	pub fn add_script(&mut self, script: impl Into<String>) -> bool {
		self.scripts.insert(script.into())
	}

	/// Adds an external script URL. Returns `false` if it was already present.
	pub fn add_external_script(&mut self, src: impl Into<String>) -> bool {
		self.external_scripts.insert(src.into())
	}

	/// Returns the collected CSS strings in insertion order.
	pub fn styles(&self) -> impl Iterator<Item = &str> {
		self.styles.iter().map(String::as_str)
	}

	/// Returns the collected inline scripts in insertion order.
	pub fn scripts(&self) -> impl Iterator<Item = &str> {
		self.scripts.iter().map(String::as_str)
	}

	/// Returns the collected external script URLs in insertion order.
	pub fn external_scripts(&self) -> impl Iterator<Item = &str> {
		self.external_scripts.iter().map(String::as_str)
	}

	/// Current nesting depth (the root node is at depth 1).
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Number of nodes visited so far.
	pub fn nodes_visited(&self) -> u64 {
		self.nodes_visited
	}

	/// Names of the components currently being rendered, outermost first.
	pub fn component_stack(&self) -> &[String] {
		&self.component_stack
	}

	/// Name of the innermost component being rendered.
	pub fn current_component(&self) -> Option<&str> {
		self.component_stack.last().map(String::as_str)
	}

	/// Returns the extension of type `T`.
	pub fn extension<T: Any + Send>(&self) -> Option<&T> {
		self.extensions
			.get(&TypeId::of::<T>())
			.and_then(|value| value.downcast_ref::<T>())
	}

	/// Returns the extension of type `T` mutably.
	pub fn extension_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
		self.extensions
			.get_mut(&TypeId::of::<T>())
			.and_then(|value| value.downcast_mut::<T>())
	}

	/// Returns the extension of type `T`, inserting the default first if absent.
	pub fn extension_or_default<T: Any + Send + Default>(&mut self) -> &mut T {
		let slot = self
			.extensions
			.entry(TypeId::of::<T>())
			.or_insert_with(|| Box::new(T::default()));
		// Entries are keyed by their own TypeId.
		match slot.downcast_mut::<T>() {
			Some(value) => value,
			None => unreachable!("extension keyed by TypeId holds a different type"),
		}
	}

	/// Stores an extension, returning the previous one.
	pub fn insert_extension<T: Any + Send>(&mut self, value: T) -> Option<T> {
		self.extensions
			.insert(TypeId::of::<T>(), Box::new(value))
			.and_then(|previous| previous.downcast::<T>().ok())
			.map(|previous| *previous)
	}

	/// Removes and returns the extension of type `T`.
	pub fn remove_extension<T: Any + Send>(&mut self) -> Option<T> {
		self.extensions
			.remove(&TypeId::of::<T>())
			.and_then(|value| value.downcast::<T>().ok())
			.map(|value| *value)
	}

	pub(crate) fn enter(&mut self, limit: usize) -> RenderResult<()> {
		if self.depth >= limit {
			return Err(RenderError::DepthExceeded {
				limit,
				stack: self.component_stack.clone(),
			});
		}
		self.depth += 1;
		self.nodes_visited += 1;
		Ok(())
	}

	pub(crate) fn leave(&mut self) {
		self.depth = self.depth.saturating_sub(1);
	}

	pub(crate) fn push_component(&mut self, name: &str) {
		self.component_stack.push(name.to_string());
	}

	pub(crate) fn pop_component(&mut self) {
		self.component_stack.pop();
	}

	/// Consumes the context and returns the collected assets.
	pub fn into_assets(self) -> RenderAssets {
		RenderAssets {
			styles: self.styles.into_iter().collect(),
			scripts: self.scripts.into_iter().collect(),
			external_scripts: self.external_scripts.into_iter().collect(),
		}
	}
}

impl std::fmt::Debug for RenderContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RenderContext")
			.field("styles", &self.styles.len())
			.field("scripts", &self.scripts.len())
			.field("external_scripts", &self.external_scripts.len())
			.field("depth", &self.depth)
			.field("nodes_visited", &self.nodes_visited)
			.field("component_stack", &self.component_stack)
			.finish_non_exhaustive()
	}
}

/// CSS and scripts collected during a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderAssets {
	/// Distinct CSS strings, in first-registration order.
	pub styles: Vec<String>,
	/// Distinct inline scripts, in first-registration order.
	pub scripts: Vec<String>,
	/// Distinct external script URLs, in first-registration order.
	pub external_scripts: Vec<String>,
}

impl RenderAssets {
	/// Checks whether nothing was collected.
	pub fn is_empty(&self) -> bool {
		self.styles.is_empty() && self.scripts.is_empty() && self.external_scripts.is_empty()
	}

	/// Returns the `<style>` block, or an empty string when there is no CSS.
	pub fn style_html(&self) -> String {
		if self.styles.is_empty() {
			return String::new();
		}
		format!("<style>{}</style>", self.styles.join("\n"))
	}

	/// Returns the external `<script src>` tags.
	pub fn external_script_html(&self) -> String {
		self.external_scripts
			.iter()
			.map(|src| format!("<script src=\"{}\"></script>", html_escape(src)))
			.collect()
	}

	/// Returns the inline `<script>` block, or an empty string when there are no scripts.
	pub fn inline_script_html(&self) -> String {
		if self.scripts.is_empty() {
			return String::new();
		}
		format!("<script>{}</script>", self.scripts.join("\n"))
	}

	/// Returns every asset as HTML: external scripts, styles, inline scripts.
	pub fn to_html(&self) -> String {
		let mut html = self.external_script_html();
		html.push_str(&self.style_html());
		html.push_str(&self.inline_script_html());
		html
	}
}

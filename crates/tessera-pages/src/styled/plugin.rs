use std::sync::Arc;

use serde_json::Value;
use tessera_core::{Node, RenderResult};

use super::StyleRecord;
use crate::plugin::Plugin;
use crate::ssr::RenderContext;

/// Applies generated classes and registers scoped CSS for styled components.
///
/// Class order on the element: own class, then each base nearest-first,
/// then the caller's classes. CSS is registered root-most base first, one
/// entry per record, so a base shared by several components is emitted
/// once per render.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledPlugin;

impl StyledPlugin {
	/// Creates the plugin.
	pub fn new() -> Self {
		Self
	}
}

impl Plugin for StyledPlugin {
	fn name(&self) -> &str {
		"styled"
	}

	fn render_node_before(
		&self,
		node: &Node,
		ctx: &mut RenderContext,
	) -> RenderResult<Option<Node>> {
		let Some(component) = node.as_component() else {
			return Ok(None);
		};
		let Some(record) = component.meta().get::<Arc<StyleRecord>>() else {
			return Ok(None);
		};

		for css in record.chain_css() {
			if ctx.add_style(css) {
				tracing::debug!(class = record.class_name(), "registered scoped css");
			}
		}

		let mut component = component.clone();
		let raw = component.raw_attributes_mut();
		let mut classes: Vec<Value> = record
			.class_list()
			.into_iter()
			.map(|class| Value::String(class.to_string()))
			.collect();
		classes.extend(raw.remove("class"));
		classes.extend(raw.remove("className"));
		raw.insert("class", Value::Array(classes));

		Ok(Some(Node::Component(component)))
	}
}

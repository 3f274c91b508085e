use std::sync::Arc;

use tessera_core::{Attributes, BoxError, Node, RenderError, RenderFn, RenderResult};

use super::{Island, IslandStore, RpcProxy};
use crate::plugin::Plugin;
use crate::ssr::RenderContext;

/// Renders islands from the state held in an [`IslandStore`].
///
/// The first render of an island stores its initial state; later renders
/// (including the RPC re-render) show the stored state. The wrapper
/// attributes of each render are stored too, so the RPC re-render keeps
/// the caller's `class` and `data-*` attributes. When the store's
/// settings name a `client_script`, it is added as an external script.
#[derive(Debug, Clone)]
pub struct IslandPlugin {
	store: Arc<IslandStore>,
}

impl IslandPlugin {
	/// Creates a plugin backed by `store`.
	pub fn new(store: Arc<IslandStore>) -> Self {
		Self { store }
	}

	/// Creates a plugin backed by the process-wide store.
	pub fn global() -> Self {
		Self::new(IslandStore::global())
	}

	/// Returns the store.
	pub fn store(&self) -> &Arc<IslandStore> {
		&self.store
	}
}

impl Plugin for IslandPlugin {
	fn name(&self) -> &str {
		"islands"
	}

	fn render_node_before(
		&self,
		node: &Node,
		ctx: &mut RenderContext,
	) -> RenderResult<Option<Node>> {
		let Some(component) = node.as_component() else {
			return Ok(None);
		};
		let Some(island) = component.meta().get::<Arc<Island>>() else {
			return Ok(None);
		};
		let island = Arc::clone(island);

		let state = self.store.ensure(&island);
		self.store
			.set_attributes(island.name(), component.attributes())
			.map_err(|err| RenderError::plugin(self.name(), "render_node_before", err.to_string()))?;
		let proxy = RpcProxy::new(island.name(), self.store.settings());
		if let Some(src) = &self.store.settings().client_script {
			ctx.add_external_script(src.clone());
		}

		let render: RenderFn = Arc::new(move |attrs: &Attributes, _: &[Node]| {
			Ok::<_, BoxError>(island.render_with(&state, &proxy, attrs))
		});
		let mut component = component.clone().with_render_fn(render);
		component.meta_mut().remove::<Arc<Island>>();
		Ok(Some(Node::Component(component)))
	}
}

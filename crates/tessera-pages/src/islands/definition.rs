//! Island definitions: initial state, RPC handlers and template.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde_json::{Map, Value};
use tessera_core::{AttrValue, Attributes, BoxError, Component, Element, IntoNode, Node};

use super::{IslandError, RpcProxy, is_valid_island_name, json_kind};
use crate::settings::IslandSettings;

/// Island state: a JSON object.
pub type StateMap = Map<String, Value>;

/// RPC handler: reads the current state and the call arguments, returns a patch.
///
/// The handler gets a snapshot of the state and runs without the state lock,
/// so it may read the store. Calls on one island are serialized: a handler must
/// not dispatch an RPC call to its own island.
pub type RpcHandler =
	Arc<dyn Fn(HandlerContext<'_>) -> Result<HandlerOutcome, BoxError> + Send + Sync + 'static>;

/// Island template: renders the state; the proxy produces RPC trigger attributes.
pub type IslandTemplate = Arc<dyn Fn(&StateMap, &RpcProxy) -> Node + Send + Sync + 'static>;

/// Input of an RPC handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
	/// Island name.
	pub island: &'a str,
	/// Method being called.
	pub method: &'a str,
	/// Current state.
	pub state: &'a StateMap,
	/// Call arguments.
	pub args: &'a StateMap,
}

/// Result of a successful RPC handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutcome {
	patch: Value,
	status: StatusCode,
}

impl HandlerOutcome {
	/// Merges `patch` (a JSON object) into the state.
	pub fn patch(patch: impl Into<Value>) -> Self {
		Self {
			patch: patch.into(),
			status: StatusCode::OK,
		}
	}

	/// Leaves the state as it is.
	pub fn unchanged() -> Self {
		Self::patch(Value::Object(Map::new()))
	}

	/// Sets the response status (default `200 OK`).
	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	/// Returns the patch.
	pub fn patch_value(&self) -> &Value {
		&self.patch
	}

	/// Returns the response status.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub(crate) fn into_parts(self) -> (Value, StatusCode) {
		(self.patch, self.status)
	}
}

impl From<Value> for HandlerOutcome {
	fn from(patch: Value) -> Self {
		Self::patch(patch)
	}
}

/// An island definition.
///
/// Built once with [`Island::builder`] and shared through `Arc`; every
/// occurrence and every RPC call refers to the same definition.
pub struct Island {
	name: String,
	initial_state: StateMap,
	handlers: HashMap<String, RpcHandler>,
	template: IslandTemplate,
}

impl Island {
	/// Starts building an island.
	pub fn builder(name: impl Into<String>) -> IslandBuilder {
		IslandBuilder {
			name: name.into(),
			state: Value::Object(Map::new()),
			handlers: HashMap::new(),
			template: None,
		}
	}

	/// Island name, also the id of the wrapper element.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// State stored on first render.
	pub fn initial_state(&self) -> &StateMap {
		&self.initial_state
	}

	/// Returns the handler of an RPC method.
	pub fn handler(&self, method: &str) -> Option<&RpcHandler> {
		self.handlers.get(method)
	}

	/// Sorted names of the RPC methods.
	pub fn methods(&self) -> Vec<&str> {
		let mut methods: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
		methods.sort_unstable();
		methods
	}

	/// Renders the island for `state`, wrapped in
	/// `<div id="{name}" data-island="{name}">`.
	///
	/// `attrs` are added to the wrapper; they cannot override `id` or
	/// `data-island`.
	pub fn render_with(&self, state: &StateMap, proxy: &RpcProxy, attrs: &Attributes) -> Node {
		let mut wrapper = Attributes::new();
		wrapper.insert("id", AttrValue::Text(self.name.clone()));
		wrapper.insert("data-island", AttrValue::Text(self.name.clone()));
		for (name, value) in attrs.iter() {
			if name != "id" && name != "data-island" {
				wrapper.insert(name.clone(), value.clone());
			}
		}
		Element::new("div")
			.with_attributes(wrapper)
			.child((self.template)(state, proxy))
			.into_node()
	}

	/// Creates an occurrence of this island.
	///
	/// With [`IslandPlugin`](super::IslandPlugin) registered, the occurrence
	/// renders the stored state; without it, the initial state.
	pub fn node(self: &Arc<Self>) -> Component {
		let island = Arc::clone(self);
		Component::new(format!("Island({})", self.name), move |attrs, _| {
			let proxy = RpcProxy::new(&island.name, &IslandSettings::default());
			island.render_with(&island.initial_state, &proxy, attrs)
		})
		.with_meta(Arc::clone(self))
	}
}

impl fmt::Debug for Island {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Island")
			.field("name", &self.name)
			.field("initial_state", &self.initial_state)
			.field("methods", &self.methods())
			.finish_non_exhaustive()
	}
}

/// Builder for [`Island`].
pub struct IslandBuilder {
	name: String,
	state: Value,
	handlers: HashMap<String, RpcHandler>,
	template: Option<IslandTemplate>,
}

impl IslandBuilder {
	/// Sets the initial state (must be a JSON object).
	pub fn state(mut self, state: impl Into<Value>) -> Self {
		self.state = state.into();
		self
	}

	/// Adds an RPC handler.
	pub fn handler<F>(mut self, method: impl Into<String>, handler: F) -> Self
	where
		F: Fn(HandlerContext<'_>) -> Result<HandlerOutcome, BoxError> + Send + Sync + 'static,
	{
		self.handlers.insert(method.into(), Arc::new(handler));
		self
	}

	/// Sets the template.
	pub fn template<F>(mut self, template: F) -> Self
	where
		F: Fn(&StateMap, &RpcProxy) -> Node + Send + Sync + 'static,
	{
		self.template = Some(Arc::new(template));
		self
	}

	/// Validates and builds the island.
	pub fn build(self) -> Result<Arc<Island>, IslandError> {
		if !is_valid_island_name(&self.name) {
			return Err(IslandError::InvalidName(self.name));
		}
		let initial_state = match self.state {
			Value::Object(map) => map,
			other => {
				return Err(IslandError::InvalidState {
					island: self.name,
					kind: json_kind(&other),
				});
			}
		};
		let template = self
			.template
			.ok_or_else(|| IslandError::MissingTemplate(self.name.clone()))?;

		Ok(Arc::new(Island {
			name: self.name,
			initial_state,
			handlers: self.handlers,
			template,
		}))
	}
}

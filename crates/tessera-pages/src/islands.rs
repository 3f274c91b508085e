//! Interactive islands.
//!
//! An island is a component whose state lives on the server. The first
//! render stores its initial state in an [`IslandStore`]; afterwards the
//! client triggers RPC calls through `hx-*` attributes produced by an
//! [`RpcProxy`], the [`RpcDispatcher`](crate::rpc::RpcDispatcher) runs the
//! handler, merges the returned patch into the state and sends back the
//! re-rendered island.
//!
//! ```
//! use serde_json::json;
//! use tessera_core::{Element, IntoNode};
//! use tessera_pages::islands::{HandlerOutcome, Island};
//!
//! let counter = Island::builder("counter")
//!     .state(json!({"count": 0}))
//!     .handler("increment", |ctx| {
//!         let count = ctx.state["count"].as_i64().unwrap_or(0);
//!         Ok(HandlerOutcome::patch(json!({"count": count + 1})))
//!     })
//!     .template(|state, proxy| {
//!         Element::new("button")
//!             .attrs(&proxy.trigger("increment"))
//!             .child(state["count"].to_string())
//!             .into_node()
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(counter.methods(), ["increment"]);
//! ```

mod definition;
mod plugin;
mod proxy;
mod store;

use thiserror::Error;

pub use definition::{
	HandlerContext, HandlerOutcome, Island, IslandBuilder, IslandTemplate, RpcHandler, StateMap,
};
pub use plugin::IslandPlugin;
pub use proxy::RpcProxy;
pub use store::{IslandRecord, IslandStore};

/// Island errors.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum IslandError {
	/// The name cannot be used as an HTML id.
	#[error("invalid island name '{0}': must match [A-Za-z][A-Za-z0-9_-]*")]
	InvalidName(String),

	/// No island with this name is initialized.
	#[error("island not found: {0}")]
	NotFound(String),

	/// The state is not a JSON object.
	#[error("island '{island}' state must be a JSON object, got {kind}")]
	InvalidState {
		/// Island name.
		island: String,
		/// JSON type that was supplied.
		kind: &'static str,
	},

	/// The island was built without a template.
	#[error("island '{0}' has no template")]
	MissingTemplate(String),
}

/// Checks whether `name` is usable as an island name (and HTML id).
pub fn is_valid_island_name(name: &str) -> bool {
	let mut chars = name.chars();
	matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "boolean",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "array",
		serde_json::Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("counter", true)]
	#[case("todo-list_2", true)]
	#[case("", false)]
	#[case("2fa", false)]
	#[case("has space", false)]
	#[case("a/b", false)]
	fn test_is_valid_island_name(#[case] name: &str, #[case] expected: bool) {
		assert_eq!(is_valid_island_name(name), expected);
	}
}

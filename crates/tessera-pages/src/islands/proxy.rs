use serde_json::Value;
use tessera_core::RawAttributes;

use crate::settings::IslandSettings;

/// Produces the client attributes that trigger RPC calls on one island.
///
/// With default settings, `proxy.call("increment", json!({"by": 2}))` yields
///
/// ```text
/// hx-post="/rpc/counter/increment" hx-target="#counter" hx-swap="outerHTML" hx-vals='{"by":2}'
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcProxy {
	island: String,
	base_path: String,
	attribute_prefix: String,
	swap: String,
}

impl RpcProxy {
	/// Creates a proxy for `island`.
	pub fn new(island: impl Into<String>, settings: &IslandSettings) -> Self {
		Self {
			island: island.into(),
			base_path: settings.base_path().to_string(),
			attribute_prefix: settings.attribute_prefix.clone(),
			swap: settings.swap.clone(),
		}
	}

	/// Island name.
	pub fn island(&self) -> &str {
		&self.island
	}

	/// Endpoint of an RPC method.
	pub fn route(&self, method: &str) -> String {
		format!(
			"{}/{}/{}",
			self.base_path,
			urlencoding::encode(&self.island),
			urlencoding::encode(method)
		)
	}

	/// CSS selector of the island wrapper.
	pub fn target(&self) -> String {
		format!("#{}", self.island)
	}

	/// Attributes calling `method` with `args`.
	///
	/// `args` is sent as the vals attribute when it is a non-empty JSON
	/// object; other values are ignored.
	pub fn call(&self, method: &str, args: impl Into<Value>) -> RawAttributes {
		let prefix = &self.attribute_prefix;
		let mut attrs = RawAttributes::new()
			.set(format!("{prefix}post"), self.route(method))
			.set(format!("{prefix}target"), self.target())
			.set(format!("{prefix}swap"), self.swap.clone());
		match args.into() {
			Value::Object(args) if !args.is_empty() => {
				attrs.insert(format!("{prefix}vals"), Value::Object(args).to_string());
			}
			Value::Null | Value::Object(_) => {}
			other => {
				tracing::warn!(
					island = %self.island,
					method,
					"ignoring non-object RPC arguments: {}",
					other
				);
			}
		}
		attrs
	}

	/// Attributes calling `method` without arguments.
	pub fn trigger(&self, method: &str) -> RawAttributes {
		self.call(method, Value::Null)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use tessera_core::{Element, IntoNode};

	#[rstest]
	fn test_call_attributes() {
		let proxy = RpcProxy::new("counter", &IslandSettings::default());
		let attrs = proxy.call("increment", json!({"by": 2}));

		assert_eq!(attrs.get("hx-post"), Some(&json!("/rpc/counter/increment")));
		assert_eq!(attrs.get("hx-target"), Some(&json!("#counter")));
		assert_eq!(attrs.get("hx-swap"), Some(&json!("outerHTML")));
		assert_eq!(attrs.get("hx-vals"), Some(&json!(r#"{"by":2}"#)));
	}

	#[rstest]
	#[case(json!(null))]
	#[case(json!({}))]
	#[case(json!(3))]
	fn test_vals_omitted_without_object_args(#[case] args: Value) {
		let proxy = RpcProxy::new("counter", &IslandSettings::default());
		let attrs = proxy.call("reset", args);
		assert_eq!(attrs.len(), 3);
		assert!(attrs.get("hx-vals").is_none());
	}

	#[rstest]
	fn test_custom_settings() {
		let settings = IslandSettings {
			rpc_base_path: "/api/rpc/".to_string(),
			attribute_prefix: "data-hx-".to_string(),
			swap: "innerHTML".to_string(),
			client_script: None,
		};
		let attrs = RpcProxy::new("cart", &settings).trigger("clear");

		assert_eq!(attrs.get("data-hx-post"), Some(&json!("/api/rpc/cart/clear")));
		assert_eq!(attrs.get("data-hx-swap"), Some(&json!("innerHTML")));
	}

	#[rstest]
	fn test_attributes_render_on_element() {
		let proxy = RpcProxy::new("counter", &IslandSettings::default());
		let node = Element::new("button")
			.attrs(&proxy.call("add", json!({"n": 1})))
			.child("+")
			.into_node();

		assert_eq!(
			crate::ssr::render(&node).unwrap(),
			"<button hx-post=\"/rpc/counter/add\" hx-target=\"#counter\" hx-swap=\"outerHTML\" hx-vals=\"{&quot;n&quot;:1}\">+</button>"
		);
	}
}

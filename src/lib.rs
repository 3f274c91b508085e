//! # Tessera
//!
//! Server-side markup generation for Rust.
//!
//! Tessera turns a tree of declarative nodes into an HTML string and lets
//! plugins observe and rewrite that tree while it renders. On top of the
//! core renderer it ships:
//!
//! - **styled components**: CSS scoped to a generated class, with base
//!   component inheritance and per-render de-duplication,
//! - **islands**: components whose state lives on the server and is updated
//!   through hypermedia RPC calls (`hx-post`, `hx-target`, `hx-swap`),
//! - **slots**: content rendered in one place and emitted in another.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - renderer, plugins, styled components, islands and RPC.
//!   Without it only the node model is available.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use tessera::prelude::*;
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
//! let store = Arc::new(IslandStore::new());
//! let plugins = Arc::new(PluginRegistry::new());
//! plugins.register(IslandPlugin::new(Arc::clone(&store))).unwrap();
//! let renderer = Renderer::new().with_plugins(plugins);
//!
//! let page = renderer.render(&counter.node().into_node()).unwrap();
//! assert!(page.contains("hx-post=\"/rpc/counter/increment\""));
//!
//! let dispatcher = RpcDispatcher::new(store, renderer);
//! let response = dispatcher.handle("POST", "/rpc/counter/increment", None, b"");
//! assert!(response.html.contains(">1</button>"));
//! ```

pub mod core;
#[cfg(feature = "pages")]
pub mod pages;

/// Commonly used types.
pub mod prelude {
	pub use crate::core::{
		AttrValue, Attributes, Component, Element, IntoNode, Node, RawAttributes, RenderError,
		RenderResult, normalize_attributes,
	};

	#[cfg(feature = "pages")]
	pub use crate::pages::{
		ErrorPage, HandlerOutcome, Island, IslandPlugin, IslandStore, PagesSettings, Plugin,
		PluginRegistry, RenderContext, Renderer, RpcDispatcher, RpcProxy, SlotPlugin,
		StyledComponent, StyledPlugin, render, slot_fill, slot_outlet,
	};
}

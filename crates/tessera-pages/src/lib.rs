//! Tessera Pages - rendering, plugins, scoped styles and RPC islands.
//!
//! This crate turns [`tessera_core`] node trees into HTML:
//!
//! - [`ssr`]: the recursive [`Renderer`] and the per-render [`RenderContext`],
//! - [`plugin`]: the [`Plugin`] trait, the ordered [`PluginRegistry`] and the
//!   slot plugin,
//! - [`styled`]: styled components with class-scoped CSS,
//! - [`islands`] and [`rpc`]: server-held component state updated through
//!   hypermedia RPC calls,
//! - [`settings`]: TOML configuration,
//! - [`error_view`]: diagnostic error pages.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tessera_core::{Element, IntoNode};
//! use tessera_pages::{PluginRegistry, Renderer, StyledComponent, StyledPlugin};
//!
//! let title = StyledComponent::new("h1", "font-size: 2rem;");
//! let plugins = Arc::new(PluginRegistry::new());
//! plugins.register(StyledPlugin::new()).unwrap();
//!
//! let page = Element::new("main").child(title.node().child("Hello")).into_node();
//! let html = Renderer::new().with_plugins(plugins).render(&page).unwrap();
//! assert!(html.contains("font-size: 2rem"));
//! ```
//!
//! ## Logging
//!
//! Events are emitted through `tracing`; the crate installs no subscriber.

pub mod error_view;
pub mod islands;
pub mod plugin;
pub mod rpc;
pub mod settings;
pub mod ssr;
pub mod styled;

pub use error_view::{ErrorPage, RequestInfo, error_fragment};
pub use islands::{
	HandlerContext, HandlerOutcome, Island, IslandError, IslandPlugin, IslandRecord, IslandStore,
	RpcProxy, StateMap,
};
pub use plugin::{
	ArcPlugin, Plugin, PluginError, PluginRegistry, PluginResult, SlotDescriptor, SlotPlugin,
	slot_fill, slot_outlet,
};
pub use rpc::{RpcDispatcher, RpcError, RpcResponse, RpcResult};
pub use settings::{IslandSettings, PagesSettings, RenderSettings, SettingsError, StyledSettings};
pub use ssr::{RenderAssets, RenderContext, RenderOutput, Renderer, render};
pub use styled::{StyleRecord, StyledComponent, StyledError, StyledPlugin};

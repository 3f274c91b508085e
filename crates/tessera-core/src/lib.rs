//! Tessera Core - node model for server-side markup generation.
//!
//! This crate holds the pure data side of Tessera: the [`Node`] tree, the
//! attribute normalizer and HTML escaping. It performs no rendering on its
//! own; the renderer and the plugin pipeline live in `tessera-pages`.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use tessera_core::{Element, IntoNode, Node};
//!
//! let node = Element::new("div")
//!     .attr("class", json!(["card", "card"]))
//!     .child("Hello, World!")
//!     .into_node();
//!
//! assert!(matches!(node, Node::Element(_)));
//! ```

pub mod attrs;
pub mod error;
pub mod meta;
pub mod node;

pub use attrs::{AttrValue, Attributes, RawAttributes, normalize_attributes};
pub use error::{BoxError, RenderError, RenderResult};
pub use meta::ComponentMeta;
pub use node::{
	Component, Element, IntoNode, Node, RenderFn, VOID_ELEMENTS, flatten_children, html_escape,
	is_void_element,
};

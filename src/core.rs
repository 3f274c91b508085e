//! Node model, attribute normalization and HTML escaping.
//!
//! # Examples
//!
//! ```rust
//! use tessera::core::{Element, IntoNode, Node};
//!
//! let node = Element::new("br").into_node();
//! assert!(matches!(node, Node::Element(_)));
//! ```

pub use tessera_core::*;

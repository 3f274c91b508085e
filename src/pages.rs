//! Renderer, plugin pipeline, styled components and RPC islands.
//!
//! # Examples
//!
//! ```rust
//! # #[cfg(feature = "pages")]
//! # {
//! use tessera::core::Node;
//! use tessera::pages::render;
//!
//! assert_eq!(render(&Node::html("<b>x</b>")).unwrap(), "<b>x</b>");
//! # }
//! ```

#[cfg(feature = "pages")]
pub use tessera_pages::*;

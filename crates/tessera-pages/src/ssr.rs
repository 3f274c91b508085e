//! Server-side rendering of node trees.
//!
//! [`Renderer`] walks a [`Node`](tessera_core::Node) tree and runs the
//! registered plugins around it; [`RenderContext`] carries the state of one
//! render call.

mod context;
mod renderer;

pub use context::{RenderAssets, RenderContext};
pub use renderer::{RenderOutput, Renderer, render};

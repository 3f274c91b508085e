//! Render error types.
//!
//! Rendering never swallows failures: a component render function that
//! fails surfaces here and propagates to the top-level render call.

use thiserror::Error;

/// Boxed error returned by fallible component render functions and RPC handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while rendering a node tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
	/// A component render function failed to produce a node.
	#[error("component '{component}' failed to render: {source}")]
	Component {
		/// Name of the failing component.
		component: String,
		/// Component names from the root down to (and including) the failing one.
		stack: Vec<String>,
		/// Error returned by the render function.
		#[source]
		source: BoxError,
	},

	/// The tree nests deeper than the configured limit.
	#[error("render depth limit of {limit} exceeded")]
	DepthExceeded {
		/// Configured maximum depth.
		limit: usize,
		/// Component stack at the point the limit was hit.
		stack: Vec<String>,
	},

	/// A plugin hook failed.
	#[error("plugin '{plugin}' failed during {phase}: {message}")]
	Plugin {
		/// Plugin name.
		plugin: String,
		/// Hook that failed (render_before, render_node_after, ...).
		phase: String,
		/// Error message.
		message: String,
	},
}

impl RenderError {
	/// Creates a plugin error.
	pub fn plugin(
		plugin: impl Into<String>,
		phase: impl Into<String>,
		message: impl Into<String>,
	) -> Self {
		Self::Plugin {
			plugin: plugin.into(),
			phase: phase.into(),
			message: message.into(),
		}
	}

	/// Returns the component stack captured when the error was raised.
	///
	/// Empty for plugin errors.
	pub fn component_stack(&self) -> &[String] {
		match self {
			Self::Component { stack, .. } | Self::DepthExceeded { stack, .. } => stack,
			Self::Plugin { .. } => &[],
		}
	}
}

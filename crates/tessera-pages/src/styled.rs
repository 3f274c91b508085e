//! Scoped CSS for styled components.
//!
//! A styled component pairs a tag with a block of CSS. At declaration it
//! receives a unique class name; at render time [`StyledPlugin`] adds that
//! class (and the classes of every base it extends) to the element and
//! registers the CSS, scoped to the class, in the render context.
//!
//! ```
//! use std::sync::Arc;
//! use tessera_core::IntoNode;
//! use tessera_pages::plugin::PluginRegistry;
//! use tessera_pages::ssr::Renderer;
//! use tessera_pages::styled::{StyledComponent, StyledPlugin};
//!
//! let button = StyledComponent::new("button", "color: white; &:hover { color: red; }");
//!
//! let plugins = Arc::new(PluginRegistry::new());
//! plugins.register(StyledPlugin::new()).unwrap();
//! let html = Renderer::new()
//!     .with_plugins(plugins)
//!     .render(&button.node().child("Save").into_node())
//!     .unwrap();
//!
//! let class = button.class_name();
//! assert!(html.starts_with(&format!("<button class=\"{class}\">Save</button><style>")));
//! assert!(html.contains(&format!(".{class}:hover{{color: red}}")));
//! ```

mod plugin;
mod record;
mod scope;

use std::borrow::Cow;
use std::sync::Arc;

use tessera_core::{Component, Element, IntoNode, Node};
use thiserror::Error;

pub use plugin::StyledPlugin;
pub use record::StyleRecord;
pub use scope::scope_css;

/// Default prefix of generated class names.
pub const DEFAULT_CLASS_PREFIX: &str = "tsr";

/// Styled component errors.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum StyledError {
	/// The class prefix cannot start a CSS class name.
	#[error("invalid class prefix '{0}': must start with a letter, '_' or '-' and contain only [A-Za-z0-9_-]")]
	InvalidPrefix(String),
}

/// Checks whether `prefix` can start a CSS class name.
pub fn is_valid_class_prefix(prefix: &str) -> bool {
	let body = prefix.strip_prefix('-').unwrap_or(prefix);
	let mut chars = body.chars();
	matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A tag bound to a [`StyleRecord`].
///
/// Cloning is cheap; clones share the record and therefore the class name.
#[derive(Debug, Clone)]
pub struct StyledComponent {
	tag: Cow<'static, str>,
	record: Arc<StyleRecord>,
}

impl StyledComponent {
	/// Declares a styled component with the default class prefix.
	pub fn new(tag: impl Into<Cow<'static, str>>, css: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			record: StyleRecord::new(css),
		}
	}

	/// Declares a styled component extending `base`, rendering the same tag.
	pub fn extend(base: &StyledComponent, css: impl Into<String>) -> Self {
		Self {
			tag: base.tag.clone(),
			record: StyleRecord::extend(&base.record, css),
		}
	}

	/// Declares a styled component with a custom class prefix and optional base.
	pub fn with_prefix(
		prefix: &str,
		tag: impl Into<Cow<'static, str>>,
		css: impl Into<String>,
		base: Option<&StyledComponent>,
	) -> Result<Self, StyledError> {
		Ok(Self {
			tag: tag.into(),
			record: StyleRecord::with_prefix(prefix, css, base.map(|base| base.record.clone()))?,
		})
	}

	/// Returns the tag.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Returns the style record.
	pub fn record(&self) -> &Arc<StyleRecord> {
		&self.record
	}

	/// Returns the generated class name.
	pub fn class_name(&self) -> &str {
		self.record.class_name()
	}

	/// Creates an occurrence of this component.
	///
	/// The component renders its tag with the caller's attributes and
	/// children; [`StyledPlugin`] adds the generated classes.
	pub fn node(&self) -> Component {
		let tag = self.tag.clone();
		Component::new(format!("Styled({})", self.tag), move |attrs, children| {
			Element::new(tag.clone())
				.with_attributes(attrs.clone())
				.children(children.to_vec())
				.into_node()
		})
		.with_meta(self.record.clone())
	}
}

impl IntoNode for &StyledComponent {
	fn into_node(self) -> Node {
		self.node().into_node()
	}
}

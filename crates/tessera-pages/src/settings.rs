//! Settings for the renderer, styled components and islands.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [render]
//! max_depth = 256
//! append_assets = true
//!
//! [styled]
//! class_prefix = "tsr"
//!
//! [islands]
//! rpc_base_path = "/rpc"
//! attribute_prefix = "hx-"
//! swap = "outerHTML"
//! client_script = "https://unpkg.com/htmx.org@2.0.4"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("failed to read settings file {path}: {source}")]
	Io {
		/// Path of the file.
		path: String,
		/// Underlying IO error.
		#[source]
		source: std::io::Error,
	},

	/// The document is not valid TOML or does not match the schema.
	#[error("failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value is out of range.
	#[error("invalid setting '{field}': {message}")]
	Invalid {
		/// Dotted field path (`render.max_depth`).
		field: &'static str,
		/// What is wrong with it.
		message: String,
	},
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesSettings {
	/// Renderer settings.
	pub render: RenderSettings,
	/// Styled component settings.
	pub styled: StyledSettings,
	/// Island and RPC settings.
	pub islands: IslandSettings,
}

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
	/// Maximum nesting depth before rendering fails.
	pub max_depth: usize,
	/// Whether `render` appends the collected `<style>`/`<script>` blocks.
	pub append_assets: bool,
}

impl Default for RenderSettings {
	fn default() -> Self {
		Self {
			max_depth: 256,
			append_assets: true,
		}
	}
}

/// Styled component settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyledSettings {
	/// Prefix of generated class names.
	pub class_prefix: String,
}

impl Default for StyledSettings {
	fn default() -> Self {
		Self {
			class_prefix: crate::styled::DEFAULT_CLASS_PREFIX.to_string(),
		}
	}
}

/// Island and RPC settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IslandSettings {
	/// Path prefix of RPC endpoints.
	pub rpc_base_path: String,
	/// Prefix of the client attributes (`hx-post`, `hx-target`, ...).
	pub attribute_prefix: String,
	/// Swap strategy written to the swap attribute.
	pub swap: String,
	/// URL of the client library, added as an external script when an island renders.
	pub client_script: Option<String>,
}

impl Default for IslandSettings {
	fn default() -> Self {
		Self {
			rpc_base_path: "/rpc".to_string(),
			attribute_prefix: "hx-".to_string(),
			swap: "outerHTML".to_string(),
			client_script: None,
		}
	}
}

impl IslandSettings {
	/// Returns the base path without a trailing slash.
	pub fn base_path(&self) -> &str {
		self.rpc_base_path.trim_end_matches('/')
	}
}

impl PagesSettings {
	/// Parses and validates settings from a TOML string.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.display().to_string(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "loading pages settings");
		Self::from_toml_str(&source)
	}

	/// Checks value ranges.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.render.max_depth == 0 {
			return Err(SettingsError::Invalid {
				field: "render.max_depth",
				message: "must be greater than zero".to_string(),
			});
		}
		if !crate::styled::is_valid_class_prefix(&self.styled.class_prefix) {
			return Err(SettingsError::Invalid {
				field: "styled.class_prefix",
				message: format!(
					"'{}' is not a valid CSS identifier prefix",
					self.styled.class_prefix
				),
			});
		}
		if !self.islands.rpc_base_path.starts_with('/') {
			return Err(SettingsError::Invalid {
				field: "islands.rpc_base_path",
				message: "must start with '/'".to_string(),
			});
		}
		if self.islands.swap.trim().is_empty() {
			return Err(SettingsError::Invalid {
				field: "islands.swap",
				message: "must not be empty".to_string(),
			});
		}
		Ok(())
	}
}

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{DEFAULT_CLASS_PREFIX, StyledError, is_valid_class_prefix, scope_css};

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

fn next_class_name(prefix: &str) -> String {
	format!("{}-{}", prefix, NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
}

/// Style declaration of one styled component.
///
/// Created once at declaration and never modified. The scoped CSS is
/// computed up front, so renders only look it up.
#[derive(Debug)]
pub struct StyleRecord {
	class_name: String,
	raw_css: String,
	scoped_css: String,
	base: Option<Arc<StyleRecord>>,
}

impl StyleRecord {
	/// Creates a record with the default class prefix.
	pub fn new(css: impl Into<String>) -> Arc<Self> {
		Self::build(DEFAULT_CLASS_PREFIX, css.into(), None)
	}

	/// Creates a record extending `base`.
	pub fn extend(base: &Arc<StyleRecord>, css: impl Into<String>) -> Arc<Self> {
		Self::build(DEFAULT_CLASS_PREFIX, css.into(), Some(Arc::clone(base)))
	}

	/// Creates a record with a custom class prefix.
	pub fn with_prefix(
		prefix: &str,
		css: impl Into<String>,
		base: Option<Arc<StyleRecord>>,
	) -> Result<Arc<Self>, StyledError> {
		if !is_valid_class_prefix(prefix) {
			return Err(StyledError::InvalidPrefix(prefix.to_string()));
		}
		Ok(Self::build(prefix, css.into(), base))
	}

	fn build(prefix: &str, raw_css: String, base: Option<Arc<StyleRecord>>) -> Arc<Self> {
		let class_name = next_class_name(prefix);
		let scoped_css = scope_css(&raw_css, &class_name);
		tracing::debug!(
			class = %class_name,
			base = base.as_ref().map(|base| base.class_name.as_str()),
			"declared styled component"
		);
		Arc::new(Self {
			class_name,
			raw_css,
			scoped_css,
			base,
		})
	}

	/// Generated class name.
	pub fn class_name(&self) -> &str {
		&self.class_name
	}

	/// CSS as declared.
	pub fn raw_css(&self) -> &str {
		&self.raw_css
	}

	/// CSS scoped to [`class_name`](Self::class_name).
	pub fn scoped_css(&self) -> &str {
		&self.scoped_css
	}

	/// The record this one extends.
	pub fn base(&self) -> Option<&Arc<StyleRecord>> {
		self.base.as_ref()
	}

	/// Iterates over this record and its bases, nearest first.
	pub fn chain(&self) -> impl Iterator<Item = &StyleRecord> {
		std::iter::successors(Some(self), |record| record.base.as_deref())
	}

	/// Class names of the chain, own class first.
	pub fn class_list(&self) -> Vec<&str> {
		self.chain().map(StyleRecord::class_name).collect()
	}

	/// Scoped CSS of the chain, root-most base first.
	///
	/// Empty rules are skipped.
	pub fn chain_css(&self) -> Vec<&str> {
		let mut css: Vec<&str> = self
			.chain()
			.map(StyleRecord::scoped_css)
			.filter(|css| !css.is_empty())
			.collect();
		css.reverse();
		css
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_class_names_are_unique() {
		let a = StyleRecord::new("color: red;");
		let b = StyleRecord::new("color: red;");
		assert_ne!(a.class_name(), b.class_name());
		assert!(a.class_name().starts_with("tsr-"));
	}

	#[rstest]
	fn test_custom_prefix() {
		let record = StyleRecord::with_prefix("app", "margin: 0;", None).unwrap();
		assert!(record.class_name().starts_with("app-"));
		assert_eq!(
			record.scoped_css(),
			format!(".{}{{margin: 0}}", record.class_name())
		);
	}

	#[rstest]
	fn test_chain_order() {
		let root = StyleRecord::new("color: blue;");
		let middle = StyleRecord::extend(&root, "font-weight: bold;");
		let leaf = StyleRecord::extend(&middle, "");

		assert_eq!(
			leaf.class_list(),
			[leaf.class_name(), middle.class_name(), root.class_name()]
		);
		assert_eq!(
			leaf.chain_css(),
			[
				format!(".{}{{color: blue}}", root.class_name()),
				format!(".{}{{font-weight: bold}}", middle.class_name()),
			]
		);
		assert_eq!(leaf.raw_css(), "");
		assert!(Arc::ptr_eq(leaf.base().unwrap(), &middle));
	}
}

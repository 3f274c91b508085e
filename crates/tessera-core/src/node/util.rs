//! Escaping and void-element helpers shared by the node model and the renderer.

use std::borrow::Cow;

/// Elements that never have children and render as `<tag/>`.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// Checks whether a tag is a void element (case-insensitive).
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS
		.iter()
		.any(|void| void.eq_ignore_ascii_case(tag))
}

/// Escapes `& < > " '` for use in text content and attribute values.
///
/// Borrows the input when nothing needs escaping.
pub fn html_escape(s: &str) -> Cow<'_, str> {
	if !s.contains(['&', '<', '>', '"', '\'']) {
		return Cow::Borrowed(s);
	}
	let mut escaped = String::with_capacity(s.len() + 8);
	for c in s.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			_ => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn test_html_escape_borrows_plain_text() {
		assert!(matches!(html_escape("Hello World"), Cow::Borrowed("Hello World")));
	}

	#[rstest]
	#[case("a & b", "a &amp; b")]
	#[case("<div>", "&lt;div&gt;")]
	#[case("\"q\" 'v'", "&quot;q&quot; &#x27;v&#x27;")]
	fn test_html_escape(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(html_escape(input), expected);
	}

	#[rstest]
	#[case("img", true)]
	#[case("BR", true)]
	#[case("param", true)]
	#[case("div", false)]
	#[case("template", false)]
	fn test_is_void_element(#[case] tag: &str, #[case] expected: bool) {
		assert_eq!(is_void_element(tag), expected);
	}

	proptest! {
		#[test]
		fn escaped_text_has_no_markup_characters(input in ".*") {
			let escaped = html_escape(&input);
			prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
		}

		#[test]
		fn escaping_plain_text_is_identity(input in "[a-zA-Z0-9 ]*") {
			prop_assert_eq!(html_escape(&input), input.as_str());
		}
	}
}

//! CSS scoping.
//!
//! This is a tokenizer, not a CSS parser: it tracks strings, comments,
//! parentheses and braces, and only rewrites selectors.
//!
//! - top-level declarations are wrapped in `.class{...}`,
//! - `&` in a nested selector stands for the enclosing selector; a selector
//!   without `&` becomes a descendant of it,
//! - `@media`, `@supports`, `@container` and `@layer` blocks are scoped
//!   recursively,
//! - other at-rules (`@keyframes`, `@font-face`, ...) are copied verbatim,
//! - at-rule statements (`@import`, `@charset`) are emitted before the
//!   scoped rules of their block.
//!
//! Backslash escapes inside quoted strings are honored, so an escaped quote
//! never ends a string.

/// Scopes `css` to the class `class_name`.
///
/// ```
/// use tessera_pages::styled::scope_css;
///
/// assert_eq!(
///     scope_css("color: red; &:hover { color: blue; } span { margin: 0 }", "btn"),
///     ".btn{color: red}.btn:hover{color: blue}.btn span{margin: 0}"
/// );
/// ```
pub fn scope_css(css: &str, class_name: &str) -> String {
	let css = strip_comments(css);
	let mut out = String::new();
	scope_block(&css, &format!(".{}", class_name), &mut out);
	out
}

const GROUPING_AT_RULES: &[&str] = &["media", "supports", "container", "layer"];

/// Quoted-string state of a scanner.
#[derive(Debug, Default)]
struct Quotes {
	open: Option<char>,
	escaped: bool,
}

impl Quotes {
	/// Feeds one character. Returns `true` if it belongs to a string,
	/// delimiters included.
	fn feed(&mut self, c: char) -> bool {
		match self.open {
			Some(_) if self.escaped => {
				self.escaped = false;
				true
			}
			Some(_) if c == '\\' => {
				self.escaped = true;
				true
			}
			Some(open) => {
				if c == open {
					self.open = None;
				}
				true
			}
			None if c == '"' || c == '\'' => {
				self.open = Some(c);
				true
			}
			None => false,
		}
	}
}

fn scope_block(body: &str, parent: &str, out: &mut String) {
	let mut statements = String::new();
	let mut declarations: Vec<String> = Vec::new();
	let mut rules = String::new();
	let mut buffer = String::new();
	let mut parens = 0usize;
	let mut quotes = Quotes::default();
	let mut chars = body.char_indices().peekable();

	while let Some((index, c)) = chars.next() {
		if quotes.feed(c) {
			buffer.push(c);
			continue;
		}
		match c {
			'(' => {
				parens += 1;
				buffer.push(c);
			}
			')' => {
				parens = parens.saturating_sub(1);
				buffer.push(c);
			}
			';' if parens == 0 => {
				push_statement(&buffer, &mut statements, &mut declarations);
				buffer.clear();
			}
			'{' if parens == 0 => {
				let start = index + 1;
				let end = matching_brace(body, start);
				let inner = &body[start..end];
				scope_rule(&collapse_whitespace(&buffer), inner, parent, &mut rules);
				buffer.clear();
				// Skip the block and its closing brace.
				while chars.peek().is_some_and(|(next, _)| *next <= end) {
					chars.next();
				}
			}
			'}' if parens == 0 => {}
			_ => buffer.push(c),
		}
	}
	push_statement(&buffer, &mut statements, &mut declarations);

	out.push_str(&statements);
	if !declarations.is_empty() {
		out.push_str(parent);
		out.push('{');
		out.push_str(&declarations.join(";"));
		out.push('}');
	}
	out.push_str(&rules);
}

fn push_statement(buffer: &str, statements: &mut String, declarations: &mut Vec<String>) {
	let statement = collapse_whitespace(buffer);
	if statement.is_empty() {
		return;
	}
	if statement.starts_with('@') {
		statements.push_str(&statement);
		statements.push(';');
	} else {
		declarations.push(statement);
	}
}

fn scope_rule(prelude: &str, inner: &str, parent: &str, out: &mut String) {
	if let Some(at_rule) = prelude.strip_prefix('@') {
		let keyword = at_rule
			.split(|c: char| c.is_whitespace() || c == '(')
			.next()
			.unwrap_or_default()
			.to_ascii_lowercase();
		out.push_str(prelude);
		out.push('{');
		if GROUPING_AT_RULES.contains(&keyword.as_str()) {
			scope_block(inner, parent, out);
		} else {
			out.push_str(&collapse_whitespace(inner));
		}
		out.push('}');
		return;
	}

	let selector = rewrite_selector(prelude, parent);
	scope_block(inner, &selector, out);
}

/// Returns the index of the `}` closing the block that starts at `start`,
/// or the end of input when the block is unterminated.
fn matching_brace(body: &str, start: usize) -> usize {
	let mut depth = 1usize;
	let mut quotes = Quotes::default();
	for (offset, c) in body[start..].char_indices() {
		if quotes.feed(c) {
			continue;
		}
		match c {
			'{' => depth += 1,
			'}' => {
				depth -= 1;
				if depth == 0 {
					return start + offset;
				}
			}
			_ => {}
		}
	}
	body.len()
}

/// Rewrites a (possibly comma-separated) selector against its parent.
fn rewrite_selector(selector: &str, parent: &str) -> String {
	let parents = split_top_level(parent, ',');
	let mut rewritten = Vec::new();
	for part in split_top_level(selector, ',') {
		let part = part.trim();
		if part.is_empty() {
			continue;
		}
		for parent in &parents {
			let parent = parent.trim();
			if contains_nesting_selector(part) {
				rewritten.push(replace_nesting_selector(part, parent));
			} else {
				rewritten.push(format!("{} {}", parent, part));
			}
		}
	}
	rewritten.join(",")
}

fn split_top_level(input: &str, separator: char) -> Vec<&str> {
	let mut parts = Vec::new();
	let mut depth = 0usize;
	let mut quotes = Quotes::default();
	let mut start = 0;
	for (index, c) in input.char_indices() {
		if quotes.feed(c) {
			continue;
		}
		match c {
			'(' | '[' => depth += 1,
			')' | ']' => depth = depth.saturating_sub(1),
			_ if c == separator && depth == 0 => {
				parts.push(&input[start..index]);
				start = index + c.len_utf8();
			}
			_ => {}
		}
	}
	parts.push(&input[start..]);
	parts
}

/// Walks a selector outside strings and attribute brackets.
fn for_each_selector_char(selector: &str, mut f: impl FnMut(char, bool)) {
	let mut brackets = 0usize;
	let mut quotes = Quotes::default();
	for c in selector.chars() {
		let active = brackets == 0;
		if quotes.feed(c) {
			f(c, false);
			continue;
		}
		match c {
			'[' => brackets += 1,
			']' => brackets = brackets.saturating_sub(1),
			_ => {}
		}
		f(c, active);
	}
}

fn contains_nesting_selector(selector: &str) -> bool {
	let mut found = false;
	for_each_selector_char(selector, |c, active| found |= active && c == '&');
	found
}

fn replace_nesting_selector(selector: &str, parent: &str) -> String {
	let mut out = String::with_capacity(selector.len() + parent.len());
	for_each_selector_char(selector, |c, active| {
		if active && c == '&' {
			out.push_str(parent);
		} else {
			out.push(c);
		}
	});
	out
}

fn strip_comments(css: &str) -> String {
	let mut out = String::with_capacity(css.len());
	let mut chars = css.chars().peekable();
	let mut quotes = Quotes::default();
	while let Some(c) = chars.next() {
		if quotes.feed(c) {
			out.push(c);
			continue;
		}
		match c {
			'/' if chars.peek() == Some(&'*') => {
				chars.next();
				let mut previous = '\0';
				for next in chars.by_ref() {
					if previous == '*' && next == '/' {
						break;
					}
					previous = next;
				}
				out.push(' ');
			}
			_ => out.push(c),
		}
	}
	out
}

fn collapse_whitespace(input: &str) -> String {
	input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case::declarations("color: red;", ".c{color: red}")]
	#[case::missing_semicolon("color: red; margin: 0", ".c{color: red;margin: 0}")]
	#[case::pseudo_class("&:hover { color: blue; }", ".c:hover{color: blue}")]
	#[case::descendant("span { font-weight: bold }", ".c span{font-weight: bold}")]
	#[case::compound("&.active > a { color: red }", ".c.active > a{color: red}")]
	#[case::selector_list("h1, &:focus { margin: 0 }", ".c h1,.c:focus{margin: 0}")]
	#[case::trailing_parent("body.dark & { color: white }", "body.dark .c{color: white}")]
	#[case::empty("", "")]
	fn test_scope_css(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(scope_css(input, "c"), expected);
	}

	#[rstest]
	fn test_nested_rules_recurse() {
		assert_eq!(
			scope_css("ul { li { &:first-child { margin: 0 } } }", "c"),
			".c ul li:first-child{margin: 0}"
		);
	}

	#[rstest]
	fn test_nested_rule_with_selector_list_parent() {
		assert_eq!(
			scope_css("h1, h2 { & span { color: red } }", "c"),
			".c h1 span,.c h2 span{color: red}"
		);
	}

	#[rstest]
	fn test_media_query_is_scoped_recursively() {
		assert_eq!(
			scope_css(
				"padding: 2rem; @media (max-width: 600px) { padding: 0; & > a { color: red } }",
				"c"
			),
			".c{padding: 2rem}@media (max-width: 600px){.c{padding: 0}.c > a{color: red}}"
		);
	}

	#[rstest]
	fn test_keyframes_pass_through() {
		assert_eq!(
			scope_css(
				"animation: spin 1s; @keyframes spin { from { transform: rotate(0deg) } to { transform: rotate(360deg) } }",
				"c"
			),
			".c{animation: spin 1s}@keyframes spin{from { transform: rotate(0deg) } to { transform: rotate(360deg) }}"
		);
	}

	#[rstest]
	fn test_font_face_pass_through() {
		assert_eq!(
			scope_css("@font-face { font-family: X; src: url(x.woff2); }", "c"),
			"@font-face{font-family: X; src: url(x.woff2);}"
		);
	}

	#[rstest]
	fn test_comments_are_dropped() {
		assert_eq!(
			scope_css("/* & { */ color: red; /* } */", "c"),
			".c{color: red}"
		);
	}

	#[rstest]
	fn test_ampersand_only_rewritten_in_selectors() {
		assert_eq!(
			scope_css(r#"&::after { content: "a & b; {x}" } [data-x="&"] { color: red }"#, "c"),
			r#".c::after{content: "a & b; {x}"}.c [data-x="&"]{color: red}"#
		);
	}

	#[rstest]
	fn test_parentheses_protect_semicolons() {
		assert_eq!(
			scope_css("background: url(data:image/png;base64,AAAA);", "c"),
			".c{background: url(data:image/png;base64,AAAA)}"
		);
	}

	#[rstest]
	fn test_top_level_at_statement() {
		assert_eq!(
			scope_css("@import url(base.css); color: red;", "c"),
			"@import url(base.css);.c{color: red}"
		);
	}

	#[rstest]
	#[case::double_quote(
		r#"&::after { content: "\""; } span { color: red }"#,
		r#".c::after{content: "\""}.c span{color: red}"#
	)]
	#[case::single_quote(
		r"&::before { content: '\'}'; } a { margin: 0 }",
		r".c::before{content: '\'}'}.c a{margin: 0}"
	)]
	#[case::escaped_backslash(
		r#"&::after { content: "\\"; } b { color: blue }"#,
		r#".c::after{content: "\\"}.c b{color: blue}"#
	)]
	#[case::in_attribute_selector(
		r#"[title="a\"&"] { color: red }"#,
		r#".c [title="a\"&"]{color: red}"#
	)]
	fn test_escaped_quotes_stay_inside_strings(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(scope_css(input, "c"), expected);
	}

	#[rstest]
	fn test_unterminated_block() {
		assert_eq!(scope_css("a { color: red", "c"), ".c a{color: red}");
	}
}

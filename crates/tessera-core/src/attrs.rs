//! Attribute normalization.
//!
//! Components receive loosely typed attribute bags ([`RawAttributes`]):
//! booleans, strings, numbers, arrays and objects in any mix. Elements only
//! ever hold the canonical form ([`Attributes`]):
//!
//! - `class` is an ordered list of unique class names (first occurrence wins),
//! - `style` is a single flat map with kebab-case keys (later entries win,
//!   keeping the first position),
//! - `true` becomes a presence flag, `false` and `null` drop the attribute.
//!
//! ```
//! use serde_json::json;
//! use tessera_core::{RawAttributes, normalize_attributes};
//!
//! let raw = RawAttributes::new().set("class", json!(["foo bar", "foo", {"baz": true}]));
//! let attrs = normalize_attributes(&raw);
//! assert_eq!(attrs.class(), ["foo", "bar", "baz"]);
//! ```

use convert_case::{Case, Casing};
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::node::html_escape;

/// A normalized attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
	/// Boolean presence flag (`disabled`, `checked`, ...).
	Flag,
	/// Plain string value.
	Text(String),
	/// De-duplicated, ordered class list.
	Class(Vec<String>),
	/// Flattened style declarations with kebab-case keys.
	Style(IndexMap<String, String>),
}

/// Loosely typed, insertion-ordered attribute bag.
///
/// This is what callers hand to components. Values follow JSON shapes so
/// that `class` can be given as a string, a list, or a `{name: bool}` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAttributes(Map<String, Value>);

impl RawAttributes {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets an attribute (builder style).
	pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(name, value);
		self
	}

	/// Sets an attribute, returning the previous value.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.0.insert(name.into(), value.into())
	}

	/// Returns an attribute value.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	/// Removes an attribute, returning its value.
	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.0.shift_remove(name)
	}

	/// Copies every entry of `other` into this bag; `other` wins on conflicts.
	pub fn extend(&mut self, other: RawAttributes) {
		for (name, value) in other.0 {
			self.0.insert(name, value);
		}
	}

	/// Iterates over the entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Checks whether the bag is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Builds a bag from a JSON value. Returns `None` unless it is an object.
	pub fn from_json(value: Value) -> Option<Self> {
		match value {
			Value::Object(map) => Some(Self(map)),
			_ => None,
		}
	}

	/// Consumes the bag and returns the underlying map.
	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}
}

impl From<Map<String, Value>> for RawAttributes {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl<K, V> FromIterator<(K, V)> for RawAttributes
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}
}

/// Canonical, insertion-ordered attribute map held by elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
	/// Creates an empty attribute map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Normalizes one raw attribute and merges it into the map.
	///
	/// `class` values are appended to the existing list and `style` values
	/// merged into the existing map; any other attribute is replaced.
	pub fn apply(&mut self, name: &str, value: &Value) {
		match canonical_name(name) {
			"class" => {
				let mut classes: IndexSet<String> = self.class().iter().cloned().collect();
				collect_classes(value, &mut classes);
				self.0
					.insert("class".to_string(), AttrValue::Class(classes.into_iter().collect()));
			}
			"style" => {
				let mut styles = self.style().cloned().unwrap_or_default();
				collect_styles(value, &mut styles);
				self.0.insert("style".to_string(), AttrValue::Style(styles));
			}
			other => match scalar_value(value) {
				Some(normalized) => {
					self.0.insert(other.to_string(), normalized);
				}
				None => {
					self.0.shift_remove(other);
				}
			},
		}
	}

	/// Inserts an already-normalized value, replacing any previous one.
	pub fn insert(&mut self, name: impl Into<String>, value: AttrValue) -> Option<AttrValue> {
		self.0.insert(name.into(), value)
	}

	/// Returns a normalized value.
	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.0.get(name)
	}

	/// Removes an attribute.
	pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
		self.0.shift_remove(name)
	}

	/// Checks whether an attribute is present.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Returns the string value of a text attribute.
	pub fn text(&self, name: &str) -> Option<&str> {
		match self.0.get(name) {
			Some(AttrValue::Text(value)) => Some(value),
			_ => None,
		}
	}

	/// Returns the normalized class list (empty when absent).
	pub fn class(&self) -> &[String] {
		match self.0.get("class") {
			Some(AttrValue::Class(classes)) => classes,
			_ => &[],
		}
	}

	/// Returns the normalized style map.
	pub fn style(&self) -> Option<&IndexMap<String, String>> {
		match self.0.get("style") {
			Some(AttrValue::Style(styles)) => Some(styles),
			_ => None,
		}
	}

	/// Iterates over the attributes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
		self.0.iter()
	}

	/// Returns the number of attributes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Checks whether the map is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Writes the attributes as HTML (each preceded by a space).
	///
	/// Empty class lists and style maps are omitted.
	pub fn write_html(&self, output: &mut String) {
		for (name, value) in &self.0 {
			match value {
				AttrValue::Flag => {
					output.push(' ');
					output.push_str(name);
				}
				AttrValue::Text(text) => push_attr(output, name, text),
				AttrValue::Class(classes) => {
					if !classes.is_empty() {
						push_attr(output, name, &classes.join(" "));
					}
				}
				AttrValue::Style(styles) => {
					if !styles.is_empty() {
						let css = styles
							.iter()
							.map(|(key, value)| format!("{}:{}", key, value))
							.collect::<Vec<_>>()
							.join(";");
						push_attr(output, name, &css);
					}
				}
			}
		}
	}

	/// Renders the attributes as an HTML string.
	pub fn to_html(&self) -> String {
		let mut output = String::new();
		self.write_html(&mut output);
		output
	}
}

/// Normalizes a raw attribute bag into its canonical form.
pub fn normalize_attributes(raw: &RawAttributes) -> Attributes {
	let mut attrs = Attributes::new();
	for (name, value) in raw.iter() {
		attrs.apply(name, value);
	}
	attrs
}

fn push_attr(output: &mut String, name: &str, value: &str) {
	output.push(' ');
	output.push_str(name);
	output.push_str("=\"");
	output.push_str(&html_escape(value));
	output.push('"');
}

fn canonical_name(name: &str) -> &str {
	match name {
		"className" => "class",
		other => other,
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

fn collect_classes(value: &Value, classes: &mut IndexSet<String>) {
	match value {
		Value::String(text) => {
			for class in text.split_whitespace() {
				classes.insert(class.to_string());
			}
		}
		Value::Number(number) => {
			classes.insert(number.to_string());
		}
		Value::Array(items) => {
			for item in items {
				collect_classes(item, classes);
			}
		}
		Value::Object(map) => {
			for (name, enabled) in map {
				if is_truthy(enabled) {
					for class in name.split_whitespace() {
						classes.insert(class.to_string());
					}
				}
			}
		}
		Value::Null | Value::Bool(_) => {}
	}
}

fn collect_styles(value: &Value, styles: &mut IndexMap<String, String>) {
	match value {
		Value::String(text) => {
			for declaration in text.split(';') {
				if let Some((key, value)) = declaration.split_once(':') {
					let (key, value) = (key.trim(), value.trim());
					if !key.is_empty() && !value.is_empty() {
						styles.insert(style_key(key), value.to_string());
					}
				}
			}
		}
		Value::Object(map) => {
			for (key, value) in map {
				let value = match value {
					Value::String(text) if !text.is_empty() => text.clone(),
					Value::Number(number) => number.to_string(),
					_ => continue,
				};
				styles.insert(style_key(key), value);
			}
		}
		Value::Array(items) => {
			for item in items {
				collect_styles(item, styles);
			}
		}
		Value::Null | Value::Bool(_) | Value::Number(_) => {}
	}
}

/// Converts a style key to kebab-case.
///
/// Custom properties (`--brand`) and keys that are already lowercase are kept
/// verbatim. A leading capital marks a vendor prefix (`WebkitTransition`
/// becomes `-webkit-transition`).
fn style_key(key: &str) -> String {
	if key.starts_with("--") || !key.chars().any(|c| c.is_ascii_uppercase()) {
		return key.to_string();
	}
	let kebab = key.to_case(Case::Kebab);
	if key.starts_with(|c: char| c.is_ascii_uppercase()) {
		format!("-{}", kebab)
	} else {
		kebab
	}
}

fn scalar_value(value: &Value) -> Option<AttrValue> {
	match value {
		Value::Null | Value::Bool(false) => None,
		Value::Bool(true) => Some(AttrValue::Flag),
		Value::String(text) => Some(AttrValue::Text(text.clone())),
		Value::Number(number) => Some(AttrValue::Text(number.to_string())),
		Value::Array(items) => {
			let parts: Vec<String> = items
				.iter()
				.filter_map(|item| match item {
					Value::String(text) => Some(text.clone()),
					Value::Number(number) => Some(number.to_string()),
					_ => None,
				})
				.collect();
			Some(AttrValue::Text(parts.join(" ")))
		}
		Value::Object(_) => Some(AttrValue::Text(value.to_string())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn normalize(value: Value) -> Attributes {
		normalize_attributes(&RawAttributes::from_json(value).unwrap())
	}

	#[rstest]
	fn test_class_deduplication_mixed_shapes() {
		let attrs = normalize(json!({"class": ["foo bar", "foo", {"baz": true}]}));
		assert_eq!(attrs.class(), ["foo", "bar", "baz"]);
	}

	#[rstest]
	fn test_class_object_skips_falsy_entries() {
		let attrs = normalize(json!({"class": {"active": true, "hidden": false, "muted": 0}}));
		assert_eq!(attrs.class(), ["active"]);
	}

	#[rstest]
	fn test_class_name_alias_merges_into_class() {
		let attrs = normalize(json!({"class": "a b", "className": ["b", "c"]}));
		assert_eq!(attrs.class(), ["a", "b", "c"]);
		assert!(!attrs.contains("className"));
	}

	#[rstest]
	fn test_style_string_and_object_merge() {
		let attrs = normalize(json!({
			"style": ["color: red; margin: 0", {"backgroundColor": "blue", "color": "green"}]
		}));
		let style = attrs.style().unwrap();
		assert_eq!(
			style.iter().collect::<Vec<_>>(),
			vec![
				(&"color".to_string(), &"green".to_string()),
				(&"margin".to_string(), &"0".to_string()),
				(&"background-color".to_string(), &"blue".to_string()),
			]
		);
	}

	#[rstest]
	#[case("backgroundColor", "background-color")]
	#[case("font-size", "font-size")]
	#[case("--brand-color", "--brand-color")]
	#[case("WebkitTransition", "-webkit-transition")]
	fn test_style_key(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(style_key(input), expected);
	}

	#[rstest]
	fn test_boolean_attributes() {
		let attrs = normalize(json!({"disabled": true, "checked": false, "title": null}));
		assert_eq!(attrs.get("disabled"), Some(&AttrValue::Flag));
		assert!(!attrs.contains("checked"));
		assert!(!attrs.contains("title"));
	}

	#[rstest]
	fn test_numbers_become_text() {
		let attrs = normalize(json!({"tabindex": 0, "data-ratio": 1.5}));
		assert_eq!(attrs.text("tabindex"), Some("0"));
		assert_eq!(attrs.text("data-ratio"), Some("1.5"));
	}

	#[rstest]
	fn test_object_values_serialize_as_json() {
		let attrs = normalize(json!({"hx-vals": {"by": 2}}));
		assert_eq!(attrs.text("hx-vals"), Some(r#"{"by":2}"#));
	}

	#[rstest]
	fn test_write_html() {
		let attrs = normalize(json!({
			"id": "main",
			"class": ["a", "b"],
			"hidden": true,
			"style": {"fontSize": "12px"},
			"title": "say \"hi\""
		}));
		assert_eq!(
			attrs.to_html(),
			r#" id="main" class="a b" hidden style="font-size:12px" title="say &quot;hi&quot;""#
		);
	}

	#[rstest]
	fn test_empty_class_and_style_are_omitted() {
		let attrs = normalize(json!({"class": [], "style": ""}));
		assert_eq!(attrs.to_html(), "");
	}

	#[rstest]
	fn test_apply_replaces_plain_attributes() {
		let mut attrs = Attributes::new();
		attrs.apply("id", &json!("first"));
		attrs.apply("id", &json!("second"));
		attrs.apply("class", &json!("x"));
		attrs.apply("class", &json!("y x"));
		assert_eq!(attrs.text("id"), Some("second"));
		assert_eq!(attrs.class(), ["x", "y"]);
	}

	#[rstest]
	fn test_false_removes_previous_value() {
		let mut attrs = Attributes::new();
		attrs.apply("disabled", &json!(true));
		attrs.apply("disabled", &json!(false));
		assert!(attrs.is_empty());
	}

	#[rstest]
	fn test_raw_attributes_from_iter_keeps_order() {
		let raw: RawAttributes = [("b", "2"), ("a", "1")].into_iter().collect();
		let names: Vec<_> = raw.iter().map(|(name, _)| name.as_str()).collect();
		assert_eq!(names, ["b", "a"]);
	}
}

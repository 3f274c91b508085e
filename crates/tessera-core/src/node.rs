//! The node tree.
//!
//! A [`Node`] is an immutable description of markup. Elements carry their
//! attributes already normalized; components carry raw attributes and a
//! render function that the renderer resolves lazily, once per occurrence.

mod util;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use util::{VOID_ELEMENTS, html_escape, is_void_element};

use crate::attrs::{Attributes, RawAttributes, normalize_attributes};
use crate::error::BoxError;
use crate::meta::ComponentMeta;

/// Render function of a component: `(attributes, children) -> node`.
pub type RenderFn =
	Arc<dyn Fn(&Attributes, &[Node]) -> Result<Node, BoxError> + Send + Sync + 'static>;

/// A node in the markup tree.
#[derive(Debug, Clone)]
pub enum Node {
	/// Text content, escaped on render.
	Text(Cow<'static, str>),
	/// Pre-rendered markup, emitted verbatim.
	Html(Cow<'static, str>),
	/// Ordered children without a wrapper element.
	Fragment(Vec<Node>),
	/// An HTML element.
	Element(Element),
	/// A lazily rendered component.
	Component(Component),
	/// Renders to nothing; dropped from child lists.
	Empty,
}

impl Node {
	/// Creates a text node.
	pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(text.into())
	}

	/// Creates a raw HTML node. The content is not escaped.
	pub fn html(html: impl Into<Cow<'static, str>>) -> Self {
		Self::Html(html.into())
	}

	/// Creates a fragment, flattening its children.
	pub fn fragment<I, N>(children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: IntoNode,
	{
		Self::Fragment(flatten_children(
			children.into_iter().map(IntoNode::into_node),
		))
	}

	/// Checks whether this is the empty node.
	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}

	/// Returns the element, if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(element) => Some(element),
			_ => None,
		}
	}

	/// Returns the component, if this node is one.
	pub fn as_component(&self) -> Option<&Component> {
		match self {
			Self::Component(component) => Some(component),
			_ => None,
		}
	}
}

impl Default for Node {
	fn default() -> Self {
		Self::Empty
	}
}

/// Flattens a child list: `Empty` nodes are dropped and nested fragments
/// are spliced in place, recursively.
pub fn flatten_children<I>(children: I) -> Vec<Node>
where
	I: IntoIterator<Item = Node>,
{
	let mut flat = Vec::new();
	push_flattened(&mut flat, children);
	flat
}

fn push_flattened<I>(out: &mut Vec<Node>, children: I)
where
	I: IntoIterator<Item = Node>,
{
	for child in children {
		match child {
			Node::Empty => {}
			Node::Fragment(nested) => push_flattened(out, nested),
			other => out.push(other),
		}
	}
}

/// An HTML element with normalized attributes.
#[derive(Debug, Clone)]
pub struct Element {
	tag: Cow<'static, str>,
	attrs: Attributes,
	children: Vec<Node>,
}

impl Element {
	/// Creates an element with no attributes or children.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Attributes::new(),
			children: Vec::new(),
		}
	}

	/// Sets one attribute, normalizing the value.
	///
	/// `class` and `style` accumulate; everything else is replaced.
	pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
		self.attrs.apply(name, &value.into());
		self
	}

	/// Applies every entry of a raw attribute bag.
	pub fn attrs(mut self, raw: &RawAttributes) -> Self {
		for (name, value) in raw.iter() {
			self.attrs.apply(name, value);
		}
		self
	}

	/// Replaces the attribute map with an already-normalized one.
	pub fn with_attributes(mut self, attrs: Attributes) -> Self {
		self.attrs = attrs;
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		push_flattened(&mut self.children, [child.into_node()]);
		self
	}

	/// Appends several children.
	pub fn children<I, N>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: IntoNode,
	{
		push_flattened(
			&mut self.children,
			children.into_iter().map(IntoNode::into_node),
		);
		self
	}

	/// Returns the tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Returns the normalized attributes.
	pub fn attributes(&self) -> &Attributes {
		&self.attrs
	}

	/// Returns the children.
	pub fn child_nodes(&self) -> &[Node] {
		&self.children
	}

	/// Checks whether this is a void element.
	pub fn is_void(&self) -> bool {
		is_void_element(&self.tag)
	}

	/// Splits the element into tag, attributes and children.
	pub fn into_parts(self) -> (Cow<'static, str>, Attributes, Vec<Node>) {
		(self.tag, self.attrs, self.children)
	}
}

/// A component occurrence: raw attributes, children, plugin payloads and a
/// render function.
#[derive(Clone)]
pub struct Component {
	name: Cow<'static, str>,
	attrs: RawAttributes,
	children: Vec<Node>,
	meta: ComponentMeta,
	render: RenderFn,
}

impl Component {
	/// Creates a component from an infallible render function.
	pub fn new<F>(name: impl Into<Cow<'static, str>>, render: F) -> Self
	where
		F: Fn(&Attributes, &[Node]) -> Node + Send + Sync + 'static,
	{
		Self::try_new(name, move |attrs, children| Ok(render(attrs, children)))
	}

	/// Creates a component from a fallible render function.
	pub fn try_new<F>(name: impl Into<Cow<'static, str>>, render: F) -> Self
	where
		F: Fn(&Attributes, &[Node]) -> Result<Node, BoxError> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			attrs: RawAttributes::new(),
			children: Vec::new(),
			meta: ComponentMeta::new(),
			render: Arc::new(render),
		}
	}

	/// Sets one raw attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attrs.insert(name, value);
		self
	}

	/// Merges a raw attribute bag; the new entries win.
	pub fn attrs(mut self, raw: RawAttributes) -> Self {
		self.attrs.extend(raw);
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: impl IntoNode) -> Self {
		push_flattened(&mut self.children, [child.into_node()]);
		self
	}

	/// Appends several children.
	pub fn children<I, N>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = N>,
		N: IntoNode,
	{
		push_flattened(
			&mut self.children,
			children.into_iter().map(IntoNode::into_node),
		);
		self
	}

	/// Attaches a plugin payload.
	pub fn with_meta<T: std::any::Any + Send + Sync>(mut self, payload: T) -> Self {
		self.meta.insert(payload);
		self
	}

	/// Replaces the render function, keeping name, attributes, children and meta.
	pub fn with_render_fn(mut self, render: RenderFn) -> Self {
		self.render = render;
		self
	}

	/// Returns the component name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the raw attributes.
	pub fn raw_attributes(&self) -> &RawAttributes {
		&self.attrs
	}

	/// Returns the raw attributes mutably.
	pub fn raw_attributes_mut(&mut self) -> &mut RawAttributes {
		&mut self.attrs
	}

	/// Returns the normalized attributes.
	pub fn attributes(&self) -> Attributes {
		normalize_attributes(&self.attrs)
	}

	/// Returns the children.
	pub fn child_nodes(&self) -> &[Node] {
		&self.children
	}

	/// Returns the plugin payloads.
	pub fn meta(&self) -> &ComponentMeta {
		&self.meta
	}

	/// Returns the plugin payloads mutably.
	pub fn meta_mut(&mut self) -> &mut ComponentMeta {
		&mut self.meta
	}

	/// Returns the render function.
	pub fn render_fn(&self) -> &RenderFn {
		&self.render
	}

	/// Invokes the render function with the given normalized attributes.
	pub fn resolve(&self, attrs: &Attributes) -> Result<Node, BoxError> {
		(self.render)(attrs, &self.children)
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.name)
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.field("meta", &self.meta)
			.finish_non_exhaustive()
	}
}

/// Conversion into a [`Node`].
pub trait IntoNode {
	/// Converts `self` into a node.
	fn into_node(self) -> Node;
}

impl IntoNode for Node {
	fn into_node(self) -> Node {
		self
	}
}

impl IntoNode for Element {
	fn into_node(self) -> Node {
		Node::Element(self)
	}
}

impl IntoNode for Component {
	fn into_node(self) -> Node {
		Node::Component(self)
	}
}

impl IntoNode for &'static str {
	fn into_node(self) -> Node {
		Node::Text(Cow::Borrowed(self))
	}
}

impl IntoNode for String {
	fn into_node(self) -> Node {
		Node::Text(Cow::Owned(self))
	}
}

impl IntoNode for &String {
	fn into_node(self) -> Node {
		Node::Text(Cow::Owned(self.clone()))
	}
}

impl IntoNode for Cow<'static, str> {
	fn into_node(self) -> Node {
		Node::Text(self)
	}
}

// Booleans are the "falsy child" of conditional rendering: both render nothing.
impl IntoNode for bool {
	fn into_node(self) -> Node {
		Node::Empty
	}
}

impl IntoNode for () {
	fn into_node(self) -> Node {
		Node::Empty
	}
}

impl<T: IntoNode> IntoNode for Option<T> {
	fn into_node(self) -> Node {
		self.map_or(Node::Empty, IntoNode::into_node)
	}
}

impl<T: IntoNode> IntoNode for Vec<T> {
	fn into_node(self) -> Node {
		Node::fragment(self)
	}
}

macro_rules! impl_into_node_for_numbers {
	($($ty:ty),* $(,)?) => {
		$(
			impl IntoNode for $ty {
				fn into_node(self) -> Node {
					Node::Text(Cow::Owned(self.to_string()))
				}
			}
		)*
	};
}

impl_into_node_for_numbers!(
	i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

macro_rules! impl_into_node_for_tuples {
	($(($($name:ident),+)),* $(,)?) => {
		$(
			impl<$($name: IntoNode),+> IntoNode for ($($name,)+) {
				#[allow(non_snake_case)]
				fn into_node(self) -> Node {
					let ($($name,)+) = self;
					Node::Fragment(flatten_children([$($name.into_node()),+]))
				}
			}
		)*
	};
}

impl_into_node_for_tuples!((A, B), (A, B, C), (A, B, C, D));

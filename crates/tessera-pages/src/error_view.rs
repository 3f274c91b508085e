//! Diagnostic error views.
//!
//! [`ErrorPage`] is a full HTML page describing an error: its message, the
//! `source()` chain, the component stack of render errors and the request
//! that triggered it. [`error_fragment`] is the compact form returned by
//! failing RPC calls. Both are node trees rendered by the regular renderer.

use std::error::Error;

use http::{Request, StatusCode};
use tessera_core::{Element, IntoNode, Node, RenderError, RenderResult};

use crate::rpc::RpcError;
use crate::ssr::render;

const PAGE_CSS: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#fafafa;color:#222}\
main{max-width:60rem;margin:2rem auto;padding:0 1rem}\
h1{color:#b00020}\
.message{font-size:1.1rem;padding:1rem;background:#fff;border-left:4px solid #b00020}\
ol,dl{background:#fff;padding:1rem 2rem}\
code{font-family:ui-monospace,monospace}";

/// The request an error occurred in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
	/// HTTP method.
	pub method: String,
	/// Request path.
	pub path: String,
	/// Headers in request order.
	pub headers: Vec<(String, String)>,
}

impl RequestInfo {
	/// Creates request info without headers.
	pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			method: method.into(),
			path: path.into(),
			headers: Vec::new(),
		}
	}

	/// Adds a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Captures method, path and headers of an `http` request.
	///
	/// Header values that are not visible ASCII are shown as `<binary>`.
	pub fn from_request<B>(request: &Request<B>) -> Self {
		Self {
			method: request.method().to_string(),
			path: request.uri().path().to_string(),
			headers: request
				.headers()
				.iter()
				.map(|(name, value)| {
					(
						name.to_string(),
						value.to_str().unwrap_or("<binary>").to_string(),
					)
				})
				.collect(),
		}
	}
}

/// A full-page error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
	status: StatusCode,
	title: String,
	message: String,
	trace: Vec<String>,
	component_stack: Vec<String>,
	request: Option<RequestInfo>,
}

impl ErrorPage {
	/// Builds a report from an error and its `source()` chain.
	///
	/// The component stack is taken from the first [`RenderError`] in the
	/// chain. RPC errors set the status; anything else reports 500.
	pub fn from_error(error: &(dyn Error + 'static)) -> Self {
		let status = error
			.downcast_ref::<RpcError>()
			.map_or(StatusCode::INTERNAL_SERVER_ERROR, RpcError::status);
		let mut component_stack = error
			.downcast_ref::<RenderError>()
			.map(|err| err.component_stack().to_vec())
			.unwrap_or_default();

		let mut trace = Vec::new();
		let mut current = error.source();
		while let Some(err) = current {
			if component_stack.is_empty()
				&& let Some(render_err) = err.downcast_ref::<RenderError>()
			{
				component_stack = render_err.component_stack().to_vec();
			}
			trace.push(err.to_string());
			current = err.source();
		}

		Self {
			status,
			title: status.canonical_reason().unwrap_or("Error").to_string(),
			message: error.to_string(),
			trace,
			component_stack,
			request: None,
		}
	}

	/// Sets the status (and resets the title to its reason phrase).
	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self.title = status.canonical_reason().unwrap_or("Error").to_string();
		self
	}

	/// Overrides the title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Attaches the originating request.
	pub fn with_request(mut self, request: RequestInfo) -> Self {
		self.request = Some(request);
		self
	}

	/// Response status.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Top-level error message.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Messages of the `source()` chain, outermost cause first.
	pub fn trace(&self) -> &[String] {
		&self.trace
	}

	/// Component names from the root to the failing component.
	pub fn component_stack(&self) -> &[String] {
		&self.component_stack
	}

	/// Builds the page as a node tree.
	pub fn node(&self) -> Node {
		let mut main = Element::new("main")
			.attr("class", "tessera-error-page")
			.child(Element::new("h1").child(format!("{} {}", self.status.as_u16(), self.title)))
			.child(
				Element::new("p")
					.attr("class", "message")
					.child(self.message.clone()),
			);

		if !self.trace.is_empty() {
			main = main.child(section(
				"Trace",
				Element::new("ol").children(
					self.trace
						.iter()
						.map(|cause| Element::new("li").child(cause.clone())),
				),
			));
		}

		if !self.component_stack.is_empty() {
			main = main.child(section(
				"Component stack",
				Element::new("ol").children(self.component_stack.iter().map(|name| {
					Element::new("li").child(Element::new("code").child(name.clone()))
				})),
			));
		}

		if let Some(request) = &self.request {
			let mut list = Element::new("dl")
				.child(Element::new("dt").child("Method"))
				.child(Element::new("dd").child(request.method.clone()))
				.child(Element::new("dt").child("Path"))
				.child(Element::new("dd").child(Element::new("code").child(request.path.clone())));
			for (name, value) in &request.headers {
				list = list
					.child(Element::new("dt").child(name.clone()))
					.child(Element::new("dd").child(value.clone()));
			}
			main = main.child(section("Request", list));
		}

		Node::fragment([
			Node::html("<!DOCTYPE html>"),
			Element::new("html")
				.attr("lang", "en")
				.child(
					Element::new("head")
						.child(Element::new("meta").attr("charset", "utf-8"))
						.child(
							Element::new("title")
								.child(format!("{} {}", self.status.as_u16(), self.title)),
						)
						.child(Element::new("style").child(Node::html(PAGE_CSS))),
				)
				.child(Element::new("body").child(main))
				.into_node(),
		])
	}

	/// Renders the page.
	pub fn render(&self) -> RenderResult<String> {
		render(&self.node())
	}
}

fn section(heading: &'static str, body: Element) -> Element {
	Element::new("section")
		.child(Element::new("h2").child(heading))
		.child(body)
}

/// Builds the compact error fragment returned by failing RPC calls.
pub fn error_fragment(error: &RpcError) -> Node {
	let status = error.status();
	Element::new("div")
		.attr("class", "tessera-error")
		.attr("role", "alert")
		.attr("data-status", status.as_u16())
		.child(Element::new("strong").child(status.canonical_reason().unwrap_or("Error")))
		.child(Element::new("p").child(error.to_string()))
		.into_node()
}

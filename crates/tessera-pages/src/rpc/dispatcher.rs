//! RPC dispatch.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode, header};
use serde_json::Value;

use super::{RpcError, RpcResult, parse_args, parse_route};
use crate::error_view::error_fragment;
use crate::islands::{HandlerContext, IslandStore, RpcProxy};
use crate::ssr::Renderer;

/// HTML response of an RPC call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
	/// Response status.
	pub status: StatusCode,
	/// Response body (`text/html`).
	pub html: String,
}

impl RpcResponse {
	/// Converts into an `http` response with a `text/html` content type.
	pub fn into_http(self) -> Response<String> {
		let mut response = Response::new(self.html);
		*response.status_mut() = self.status;
		response.headers_mut().insert(
			header::CONTENT_TYPE,
			header::HeaderValue::from_static("text/html; charset=utf-8"),
		);
		response
	}
}

/// Runs island RPC handlers and re-renders the island.
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use tessera_core::Node;
/// use tessera_pages::islands::{HandlerOutcome, Island, IslandStore};
/// use tessera_pages::rpc::RpcDispatcher;
/// use tessera_pages::ssr::Renderer;
///
/// let store = Arc::new(IslandStore::new());
/// let island = Island::builder("greeter")
///     .state(json!({"name": "world"}))
///     .handler("rename", |ctx| Ok(HandlerOutcome::patch(json!({"name": ctx.args["name"]}))))
///     .template(|state, _| Node::text(format!("Hello, {}!", state["name"].as_str().unwrap_or(""))))
///     .build()
///     .unwrap();
/// store.ensure(&island);
///
/// let dispatcher = RpcDispatcher::new(store, Renderer::new());
/// let response = dispatcher.handle("POST", "/rpc/greeter/rename", None, br#"{"name": "Ada"}"#);
/// assert_eq!(response.status.as_u16(), 200);
/// assert_eq!(response.html, "<div id=\"greeter\" data-island=\"greeter\">Hello, Ada!</div>");
/// ```
#[derive(Debug, Clone)]
pub struct RpcDispatcher {
	store: Arc<IslandStore>,
	renderer: Renderer,
}

impl RpcDispatcher {
	/// Creates a dispatcher over `store`, re-rendering with `renderer`.
	pub fn new(store: Arc<IslandStore>, renderer: Renderer) -> Self {
		Self { store, renderer }
	}

	/// Returns the island store.
	pub fn store(&self) -> &Arc<IslandStore> {
		&self.store
	}

	/// Returns the renderer.
	pub fn renderer(&self) -> &Renderer {
		&self.renderer
	}

	/// Calls `method` on `island` and returns the re-rendered island.
	///
	/// Calls on one island are serialized. The handler sees a snapshot of
	/// the state and runs without the record lock, so it may read any
	/// island's state; its patch is merged afterwards. On any error before
	/// the merge the state is left untouched.
	///
	/// The response is the island wrapper with the wrapper attributes of the
	/// last page render. CSS collected while re-rendering goes inside the
	/// wrapper, so an `outerHTML` swap replaces it along with the markup.
	pub fn dispatch(
		&self,
		island: &str,
		method: &str,
		args: serde_json::Map<String, Value>,
	) -> RpcResult<RpcResponse> {
		let record = self
			.store
			.record(island)
			.ok_or_else(|| RpcError::IslandNotFound(island.to_string()))?;

		let calls = record.lock().call_lock();
		let call = calls.lock();

		let (definition, state) = {
			let record = record.lock();
			(Arc::clone(record.definition()), record.state().clone())
		};
		let handler = definition
			.handler(method)
			.ok_or_else(|| RpcError::MethodNotFound {
				island: island.to_string(),
				method: method.to_string(),
			})?;

		let outcome = handler(HandlerContext {
			island,
			method,
			state: &state,
			args: &args,
		})
		.map_err(|source| {
			tracing::error!(island, method, error = %source, "RPC handler failed");
			RpcError::Handler {
				island: island.to_string(),
				method: method.to_string(),
				source,
			}
		})?;

		let (patch, status) = outcome.into_parts();
		let patch = match patch {
			Value::Object(patch) => patch,
			other => {
				return Err(RpcError::Handler {
					island: island.to_string(),
					method: method.to_string(),
					source: format!(
						"state patch must be a JSON object, got {}",
						crate::islands::json_kind(&other)
					)
					.into(),
				});
			}
		};

		let (state, attributes) = {
			let mut record = record.lock();
			record.merge(patch);
			(record.state().clone(), record.attributes().clone())
		};
		drop(call);

		let proxy = RpcProxy::new(island, self.store.settings());
		let node = definition.render_with(&state, &proxy, &attributes);
		let output = self.renderer.render_fragment(&node)?;

		let mut html = output.html;
		let styles = output.assets.style_html();
		if !styles.is_empty() {
			html = match html.strip_suffix("</div>") {
				Some(body) => format!("{}{}</div>", body, styles),
				None => html + &styles,
			};
		}

		tracing::info!(island, method, status = status.as_u16(), "RPC call completed");
		Ok(RpcResponse { status, html })
	}

	/// Handles a raw request: routing, method check, body parsing and dispatch.
	///
	/// Never fails; errors become HTML error fragments with their status.
	pub fn handle(
		&self,
		method: &str,
		path: &str,
		content_type: Option<&str>,
		body: &[u8],
	) -> RpcResponse {
		match self.try_handle(method, path, content_type, body) {
			Ok(response) => response,
			Err(err) => self.error_response(&err),
		}
	}

	fn try_handle(
		&self,
		method: &str,
		path: &str,
		content_type: Option<&str>,
		body: &[u8],
	) -> RpcResult<RpcResponse> {
		let (island, rpc_method) = parse_route(self.store.settings().base_path(), path)
			.ok_or_else(|| RpcError::RouteNotFound(path.to_string()))?;
		if !method.eq_ignore_ascii_case(Method::POST.as_str()) {
			return Err(RpcError::MethodNotAllowed(method.to_string()));
		}
		let args = parse_args(content_type, body)?;
		self.dispatch(&island, &rpc_method, args)
	}

	/// Handles an `http` request.
	pub fn handle_request(&self, request: Request<Bytes>) -> Response<String> {
		let content_type = request
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok());
		let response = self.handle(
			request.method().as_str(),
			request.uri().path(),
			content_type,
			request.body(),
		);
		let mut http_response = response.into_http();
		if http_response.status() == StatusCode::METHOD_NOT_ALLOWED {
			http_response.headers_mut().insert(
				header::ALLOW,
				header::HeaderValue::from_static("POST"),
			);
		}
		http_response
	}

	fn error_response(&self, err: &RpcError) -> RpcResponse {
		let status = err.status();
		tracing::warn!(status = status.as_u16(), error = %err, "RPC request failed");
		let html = self
			.renderer
			.render_fragment(&error_fragment(err))
			.map(|output| output.html)
			.unwrap_or_else(|render_err| {
				tracing::error!(error = %render_err, "failed to render RPC error fragment");
				tessera_core::html_escape(&err.to_string()).into_owned()
			});
		RpcResponse { status, html }
	}
}

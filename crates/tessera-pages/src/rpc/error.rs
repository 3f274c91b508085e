use http::StatusCode;
use tessera_core::{BoxError, RenderError};
use thiserror::Error;

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// RPC errors. Each maps to an HTTP status through [`RpcError::status`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RpcError {
	/// No island with this name is initialized.
	#[error("island not found: {0}")]
	IslandNotFound(String),

	/// The island has no handler for this method.
	#[error("island '{island}' has no RPC method '{method}'")]
	MethodNotFound {
		/// Island name.
		island: String,
		/// Requested method.
		method: String,
	},

	/// The handler failed or returned an invalid patch. State is unchanged.
	#[error("RPC handler '{island}.{method}' failed: {source}")]
	Handler {
		/// Island name.
		island: String,
		/// Method name.
		method: String,
		/// Handler error.
		#[source]
		source: BoxError,
	},

	/// Re-rendering the island failed.
	#[error("failed to render island: {0}")]
	Render(#[from] RenderError),

	/// The request body could not be parsed.
	#[error("bad RPC request: {0}")]
	BadRequest(String),

	/// The request used a method other than POST.
	#[error("method {0} not allowed for RPC endpoints")]
	MethodNotAllowed(String),

	/// The path is not an RPC endpoint.
	#[error("no RPC endpoint at {0}")]
	RouteNotFound(String),
}

impl RpcError {
	/// HTTP status for this error.
	pub fn status(&self) -> StatusCode {
		match self {
			Self::IslandNotFound(_) | Self::MethodNotFound { .. } | Self::RouteNotFound(_) => {
				StatusCode::NOT_FOUND
			}
			Self::Handler { .. } | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::BadRequest(_) => StatusCode::BAD_REQUEST,
			Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(RpcError::IslandNotFound("x".into()), 404)]
	#[case(RpcError::MethodNotFound { island: "x".into(), method: "y".into() }, 404)]
	#[case(RpcError::RouteNotFound("/".into()), 404)]
	#[case(RpcError::Handler { island: "x".into(), method: "y".into(), source: "boom".into() }, 500)]
	#[case(RpcError::BadRequest("not json".into()), 400)]
	#[case(RpcError::MethodNotAllowed("GET".into()), 405)]
	fn test_status(#[case] err: RpcError, #[case] expected: u16) {
		assert_eq!(err.status().as_u16(), expected);
	}

	#[rstest]
	fn test_handler_error_display() {
		let err = RpcError::Handler {
			island: "counter".into(),
			method: "increment".into(),
			source: "overflow".into(),
		};
		assert_eq!(
			err.to_string(),
			"RPC handler 'counter.increment' failed: overflow"
		);
	}
}

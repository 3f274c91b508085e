//! Request parsing.

use serde_json::{Map, Value};

use super::{RpcError, RpcResult};
use crate::islands::StateMap;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Parses RPC arguments from a request body.
///
/// - empty body: no arguments,
/// - `application/x-www-form-urlencoded`: string values, repeated keys
///   collected into an array,
/// - JSON (`application/json`, `*+json` or no content type): must be an object.
pub fn parse_args(content_type: Option<&str>, body: &[u8]) -> RpcResult<StateMap> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(Map::new());
	}

	let media_type = content_type
		.and_then(|value| value.split(';').next())
		.map(|value| value.trim().to_ascii_lowercase());

	match media_type.as_deref() {
		Some(FORM_CONTENT_TYPE) => parse_form(body),
		None | Some("application/json") => parse_json(body),
		Some(other) if other.ends_with("+json") => parse_json(body),
		Some(other) => Err(RpcError::BadRequest(format!(
			"unsupported content type: {}",
			other
		))),
	}
}

fn parse_json(body: &[u8]) -> RpcResult<StateMap> {
	match serde_json::from_slice::<Value>(body) {
		Ok(Value::Object(args)) => Ok(args),
		Ok(other) => Err(RpcError::BadRequest(format!(
			"arguments must be a JSON object, got {}",
			crate::islands::json_kind(&other)
		))),
		Err(err) => Err(RpcError::BadRequest(format!("invalid JSON body: {}", err))),
	}
}

fn parse_form(body: &[u8]) -> RpcResult<StateMap> {
	let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
		.map_err(|err| RpcError::BadRequest(format!("invalid form body: {}", err)))?;

	let mut args = Map::new();
	for (key, value) in pairs {
		match args.get_mut(&key) {
			Some(Value::Array(values)) => values.push(Value::String(value)),
			Some(existing) => {
				let first = existing.take();
				*existing = Value::Array(vec![first, Value::String(value)]);
			}
			None => {
				args.insert(key, Value::String(value));
			}
		}
	}
	Ok(args)
}

/// Splits an RPC path into `(island, method)`.
///
/// Returns `None` unless the path is exactly `{base_path}/{island}/{method}`
/// with non-empty segments. Segments are percent-decoded.
pub fn parse_route(base_path: &str, path: &str) -> Option<(String, String)> {
	let base_path = base_path.trim_end_matches('/');
	let rest = path.strip_prefix(base_path)?.strip_prefix('/')?;
	let (island, method) = rest.split_once('/')?;
	if island.is_empty() || method.is_empty() || method.contains('/') {
		return None;
	}
	let island = urlencoding::decode(island).ok()?.into_owned();
	let method = urlencoding::decode(method).ok()?.into_owned();
	Some((island, method))
}

//! Hypermedia RPC for islands.
//!
//! Wire contract:
//!
//! - `POST {rpc_base_path}/{island}/{method}`
//! - body: a JSON object, `application/x-www-form-urlencoded` pairs, or empty
//! - response: the re-rendered island as `text/html` followed by the
//!   `<style>` block of its styled components; failures are HTML error
//!   fragments with a matching status (400, 404, 405, 500).

mod body;
mod dispatcher;
mod error;

pub use body::{parse_args, parse_route};
pub use dispatcher::{RpcDispatcher, RpcResponse};
pub use error::{RpcError, RpcResult};

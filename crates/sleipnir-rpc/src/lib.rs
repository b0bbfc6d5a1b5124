//! JSON-RPC surface for the Sleipnir simulation daemon.
//!
//! A request is a NUL-terminated UTF-8 JSON object
//! `{"method": "<name>", "parameters": [...]}`. The server reads frames off
//! a `tcp://` or `ipc://` endpoint, routes each one through the
//! [`Dispatcher`] to a registered action, and replies with
//! `{"result": <value>}` on success or
//! `{"error": true, "result": "<message>"}` on failure, NUL-terminated like
//! the request.
//!
//! The module split mirrors the request path: [`server`] owns the sockets
//! and the worker pool, [`request`]/[`response`] are the wire types,
//! [`actions`] holds the dispatcher and the built-in action handlers.

pub mod actions;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use actions::{register_builtin_actions, Dispatcher, Handler};
pub use error::{Result, RpcError};
pub use request::Request;
pub use response::Response;
pub use server::{Server, MAX_WORKERS};

//! HTTP boundary: `POST /render` and `GET /health` over `tiny_http`.

/// Request routing, independent of the transport.
pub mod endpoint;
/// Listener and worker threads.
pub mod http;

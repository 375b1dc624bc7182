use tiny_http::Method;

use crate::{
    encode::png::encode_png,
    foundation::error::{TileError, TileResult},
    render::tile::{RenderOpts, render_request},
    scene::request::RenderRequest,
};

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "tilesnap";

/// Transport-agnostic response produced by [`handle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            body: bytes,
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    pub fn text(status: u16, msg: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: msg.as_bytes().to_vec(),
        }
    }
}

/// Route one request. `url` may carry a query string; it is ignored.
pub fn handle(method: &Method, url: &str, body: &[u8], opts: &RenderOpts) -> Reply {
    let path = url.split_once('?').map_or(url, |(p, _)| p);
    match (path, method) {
        ("/render", Method::Post) => render(body, opts),
        ("/render", _) => Reply::text(405, "method not allowed"),
        ("/health", _) => health(),
        _ => Reply::text(404, "not found"),
    }
}

/// Reply for a body larger than the configured limit.
pub fn payload_too_large(limit: usize) -> Reply {
    Reply::text(413, &format!("payload exceeds {limit} bytes"))
}

fn render(body: &[u8], opts: &RenderOpts) -> Reply {
    match render_png(body, opts) {
        Ok(png) => Reply::png(png),
        Err(TileError::Decode(msg)) => {
            tracing::debug!(%msg, "rejecting render request");
            Reply::text(400, "invalid json")
        }
        Err(e) if e.is_client_error() => {
            tracing::debug!(error = %e, "rejecting render request");
            Reply::text(400, &e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "render error");
            Reply::text(500, "render failed")
        }
    }
}

fn render_png(body: &[u8], opts: &RenderOpts) -> TileResult<Vec<u8>> {
    let req = RenderRequest::from_json(body)?;
    tracing::debug!(
        tile = %req.tile(),
        tile_size = ?req.tile_size,
        strokes = req.strokes.len(),
        "render request"
    );
    let frame = render_request(&req, opts)?;
    encode_png(&frame)
}

fn health() -> Reply {
    Reply::json(
        200,
        &serde_json::json!({ "status": "ok", "service": SERVICE_NAME }),
    )
}

use std::{
    io::Read as _,
    net::SocketAddr,
    sync::Arc,
    thread::JoinHandle,
};

use crate::{
    foundation::error::{TileError, TileResult},
    render::tile::RenderOpts,
    server::endpoint::{self, Reply},
};

/// Largest accepted request body by default (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Listener and worker configuration.
#[derive(Clone, Debug)]
pub struct ServerOpts {
    pub addr: SocketAddr,
    /// Threads pulling requests off the listener; each renders one request at a time.
    pub workers: usize,
    pub max_body_bytes: usize,
    pub render: RenderOpts,
}

impl Default for ServerOpts {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            workers: std::thread::available_parallelism().map_or(4, |n| n.get()),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            render: RenderOpts::default(),
        }
    }
}

/// Blocking HTTP front for the tile renderer.
///
/// Every worker owns the requests it pulls; renders share nothing but the listener.
pub struct TileServer {
    server: Arc<tiny_http::Server>,
    opts: Arc<ServerOpts>,
}

impl TileServer {
    pub fn bind(opts: ServerOpts) -> TileResult<Self> {
        if opts.workers == 0 {
            return Err(TileError::validation("server 'workers' must be >= 1"));
        }
        let server = tiny_http::Server::http(opts.addr)
            .map_err(|e| TileError::Other(anyhow::anyhow!("bind {}: {e}", opts.addr)))?;
        Ok(Self {
            server: Arc::new(server),
            opts: Arc::new(opts),
        })
    }

    /// Actual listening address (useful when bound to port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Start the worker threads without blocking.
    pub fn spawn(&self) -> TileResult<Vec<JoinHandle<()>>> {
        tracing::info!(
            addr = ?self.local_addr(),
            workers = self.opts.workers,
            "tile server listening"
        );
        (0..self.opts.workers)
            .map(|i| {
                let server = Arc::clone(&self.server);
                let opts = Arc::clone(&self.opts);
                std::thread::Builder::new()
                    .name(format!("tilesnap-worker-{i}"))
                    .spawn(move || {
                        for rq in server.incoming_requests() {
                            serve_one(rq, &opts);
                        }
                    })
                    .map_err(TileError::from)
            })
            .collect()
    }

    /// Serve until [`TileServer::shutdown`] is called from another thread.
    pub fn run(&self) -> TileResult<()> {
        for handle in self.spawn()? {
            if handle.join().is_err() {
                tracing::error!("tile server worker panicked");
            }
        }
        Ok(())
    }

    /// Wake every worker so its request loop ends.
    pub fn shutdown(&self) {
        for _ in 0..self.opts.workers {
            self.server.unblock();
        }
    }
}

fn serve_one(mut rq: tiny_http::Request, opts: &ServerOpts) {
    let method = rq.method().clone();
    let url = rq.url().to_owned();

    let reply = match read_body(&mut rq, opts.max_body_bytes) {
        Ok(Some(body)) => endpoint::handle(&method, &url, &body, &opts.render),
        Ok(None) => endpoint::payload_too_large(opts.max_body_bytes),
        Err(e) => {
            tracing::debug!(error = %e, "failed to read request body");
            Reply::text(400, "bad request")
        }
    };

    tracing::debug!(%method, %url, status = reply.status, bytes = reply.body.len(), "served");

    let mut response = tiny_http::Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(h) = format!("Content-Type: {}", reply.content_type).parse::<tiny_http::Header>() {
        response = response.with_header(h);
    }
    if let Err(e) = rq.respond(response) {
        tracing::warn!(error = %e, "failed to write response");
    }
}

/// Read the whole body, or `None` when it is larger than `limit`.
fn read_body(rq: &mut tiny_http::Request, limit: usize) -> TileResult<Option<Vec<u8>>> {
    if rq.body_length().is_some_and(|n| n > limit) {
        return Ok(None);
    }
    let mut body = Vec::new();
    rq.as_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut body)?;
    if body.len() > limit {
        return Ok(None);
    }
    Ok(Some(body))
}

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilesnap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve `POST /render` and `GET /health` over HTTP.
    Serve(ServeArgs),
    /// Render one request JSON file to a PNG.
    Frame(FrameArgs),
    /// Render every tile under a canvas rectangle into a directory.
    Tiles(TilesArgs),
}

#[derive(Args, Debug)]
struct RenderFlags {
    /// Largest accepted tile edge in pixels.
    #[arg(long, env = "TILESNAP_MAX_TILE_SIZE", default_value_t = tilesnap::render::tile::DEFAULT_MAX_TILE_SIZE)]
    max_tile_size: u16,

    /// Style pen-like tools by name (brush, marker, highlighter, pencil, chalk).
    #[arg(long, env = "TILESNAP_BRUSH_STYLES")]
    brush_styles: bool,
}

impl RenderFlags {
    fn opts(&self) -> tilesnap::RenderOpts {
        tilesnap::RenderOpts {
            max_tile_size: self.max_tile_size,
            brush_styles: self.brush_styles,
        }
    }
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Worker threads. Defaults to the number of CPUs.
    #[arg(long, env = "TILESNAP_WORKERS")]
    workers: Option<usize>,

    /// Reject request bodies larger than this.
    #[arg(long, env = "TILESNAP_MAX_BODY_BYTES", default_value_t = tilesnap::server::http::DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,

    #[command(flatten)]
    render: RenderFlags,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input request JSON (`tileX`, `tileY`, `tileSize`, `strokes`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    render: RenderFlags,
}

#[derive(Parser, Debug)]
struct TilesArgs {
    /// Input JSON with `strokes` (and optionally `tileSize`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; tiles are written as `tile_<x>_<y>.png`.
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    x1: f64,
    #[arg(long, allow_negative_numbers = true)]
    y1: f64,
    #[arg(long, allow_negative_numbers = true)]
    x2: f64,
    #[arg(long, allow_negative_numbers = true)]
    y2: f64,

    /// Upper bound on tiles rendered in one call.
    #[arg(long, default_value_t = tilesnap::render::region::DEFAULT_MAX_TILES)]
    max_tiles: usize,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    render: RenderFlags,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Tiles(args) => cmd_tiles(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let defaults = tilesnap::ServerOpts::default();
    let opts = tilesnap::ServerOpts {
        addr: SocketAddr::new(args.host, args.port),
        workers: args.workers.unwrap_or(defaults.workers),
        max_body_bytes: args.max_body_bytes,
        render: args.render.opts(),
    };

    let server = tilesnap::TileServer::bind(opts).context("start tile server")?;
    server.run()?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let req = tilesnap::RenderRequest::from_path(&args.in_path)
        .with_context(|| format!("read request '{}'", args.in_path.display()))?;

    let frame = tilesnap::render_request(&req, &args.render.opts())?;
    let png = tilesnap::encode_png(&frame)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_tiles(args: TilesArgs) -> anyhow::Result<()> {
    let req = tilesnap::RenderRequest::from_path(&args.in_path)
        .with_context(|| format!("read strokes '{}'", args.in_path.display()))?;
    let render = args.render.opts();
    let size = req.size(render.max_tile_size)?;

    let region = tilesnap::RegionOpts {
        max_tiles: args.max_tiles,
        threads: args.threads,
    };
    let area = tilesnap::Rect::new(args.x1, args.y1, args.x2, args.y2);
    let tiles = tilesnap::render_region(area, size, &req.strokes, &render, &region)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for t in &tiles {
        let path = args
            .out_dir
            .join(format!("tile_{}_{}.png", t.tile.x, t.tile.y));
        std::fs::write(&path, &t.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
    }

    eprintln!("wrote {} tiles to {}", tiles.len(), args.out_dir.display());
    Ok(())
}

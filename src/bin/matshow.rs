use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use matshow::{ColorMap, Playback, RasterPlan, encode, input, viewer};

/// Read a JSON sequence of 2-D matrices on stdin, encode one pass of the
/// loop as an H.264 MP4 (requires `ffmpeg` on PATH), then show the loop
/// in a window until it is closed.
#[derive(Parser, Debug)]
#[command(name = "matshow", version)]
struct Cli {
    /// Output MP4 path.
    #[arg(long, default_value = encode::DEFAULT_OUT_PATH)]
    out: PathBuf,

    /// Video frame rate.
    #[arg(long, default_value_t = encode::DEFAULT_FPS)]
    fps: u32,

    /// Color map for matrix values.
    #[arg(long, value_enum, default_value_t = ColormapChoice::Viridis)]
    colormap: ColormapChoice,

    /// Pixels per matrix cell (default: smallest scale reaching 64 px).
    #[arg(long)]
    scale: Option<u32>,

    /// Encode the video only; skip the playback window.
    #[arg(long)]
    no_window: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColormapChoice {
    Viridis,
    Magma,
    Gray,
}

impl From<ColormapChoice> for ColorMap {
    fn from(choice: ColormapChoice) -> Self {
        match choice {
            ColormapChoice::Viridis => ColorMap::Viridis,
            ColormapChoice::Magma => ColorMap::Magma,
            ColormapChoice::Gray => ColorMap::Gray,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let seq = input::read_frames(std::io::stdin().lock()).context("read frames from stdin")?;
    let plan = RasterPlan::from_sequence(&seq, cli.colormap.into(), cli.scale)?;
    let playback = Playback::new(plan.rasterize_all(&seq))?;

    encode::encode_animation(playback.frames(), cli.fps, &cli.out)?;
    eprintln!("wrote {}", cli.out.display());

    if !cli.no_window {
        viewer::show(playback, "matshow")?;
    }
    Ok(())
}

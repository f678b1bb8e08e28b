use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use matshow::synth::{self, LoopSpec};

/// Generate a seamlessly looping gradient-noise animation, either as a
/// JSON matrix sequence on stdout (pipe into `matshow`) or as grayscale
/// PNG frames.
#[derive(Parser, Debug)]
#[command(name = "matgen", version)]
struct Cli {
    /// Side length of each square frame, in cells.
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Number of frames in one loop.
    #[arg(long, default_value_t = 100)]
    frames: usize,

    /// Seed for the gradient field.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Radius of the circle the spatial axes sweep.
    #[arg(long, default_value_t = 2.0)]
    space_radius: f64,

    /// Radius of the circle the time axis sweeps.
    #[arg(long, default_value_t = 1.5)]
    time_radius: f64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Json)]
    format: FormatChoice,

    /// Directory for PNG frames (with `--format png`).
    #[arg(long, default_value = "animation")]
    out_dir: PathBuf,

    /// Suppress per-frame progress on stderr.
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Json,
    Png,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let spec = LoopSpec {
        size: cli.size,
        frames: cli.frames,
        seed: cli.seed,
        space_radius: cli.space_radius,
        time_radius: cli.time_radius,
    };
    let total = spec.frames;
    let seq = synth::synthesize(&spec, |done| {
        if !cli.quiet {
            eprintln!("frame {done}/{total}");
        }
    })?;

    match cli.format {
        FormatChoice::Json => {
            let mut out = std::io::BufWriter::new(std::io::stdout().lock());
            synth::write_json(&seq, &mut out)?;
            out.flush().context("flush stdout")?;
        }
        FormatChoice::Png => {
            synth::write_png_frames(&seq, &cli.out_dir)?;
            eprintln!("wrote {} frames to {}", seq.len(), cli.out_dir.display());
        }
    }
    Ok(())
}

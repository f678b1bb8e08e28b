use std::{
    io::Write,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    error::{MatshowError, MatshowResult},
    model::{FrameSeq, Matrix},
    noise::Perlin,
};

/// Parameters for a seamlessly looping noise animation.
///
/// Each cell (x, y) of frame i maps onto a 6-D noise coordinate: the x
/// index runs around one circle of radius `space_radius`, the y index
/// around a second, and animation progress i/frames around a third of
/// radius `time_radius`. Every axis closes on itself, so the frames tile
/// spatially and loop in time without a seam.
#[derive(Clone, Debug)]
pub struct LoopSpec {
    pub size: usize,
    pub frames: usize,
    pub seed: u64,
    pub space_radius: f64,
    pub time_radius: f64,
}

impl Default for LoopSpec {
    fn default() -> Self {
        Self {
            size: 256,
            frames: 100,
            seed: 0,
            space_radius: 2.0,
            time_radius: 1.5,
        }
    }
}

impl LoopSpec {
    pub fn validate(&self) -> MatshowResult<()> {
        if self.size == 0 {
            return Err(MatshowError::validation("loop size must be > 0 cells"));
        }
        if self.frames == 0 {
            return Err(MatshowError::validation("loop must have > 0 frames"));
        }
        if !self.space_radius.is_finite() || !self.time_radius.is_finite() {
            return Err(MatshowError::validation("loop radii must be finite"));
        }
        Ok(())
    }
}

fn loop_point(spec: &LoopSpec, x: usize, y: usize, progress: f64) -> [f64; 6] {
    let step = std::f64::consts::TAU / spec.size as f64;
    let (sx, cx) = (step * x as f64).sin_cos();
    let (sy, cy) = (step * y as f64).sin_cos();
    let (st, ct) = (std::f64::consts::TAU * progress).sin_cos();
    [
        spec.space_radius * sx,
        spec.space_radius * cx,
        spec.space_radius * sy,
        spec.space_radius * cy,
        spec.time_radius * st,
        spec.time_radius * ct,
    ]
}

/// Synthesize all frames of the loop, in index order. Frames are computed
/// in parallel, one noise field per worker; `on_frame` is called with the
/// number of finished frames as each one completes.
#[tracing::instrument(skip(spec, on_frame), fields(size = spec.size, frames = spec.frames))]
pub fn synthesize(spec: &LoopSpec, on_frame: impl Fn(usize) + Sync) -> MatshowResult<FrameSeq> {
    spec.validate()?;
    let done = AtomicUsize::new(0);
    let frames: Vec<Matrix> = (0..spec.frames)
        .into_par_iter()
        .map_init(
            || Perlin::<6>::new(spec.seed),
            |field, i| {
                let progress = i as f64 / spec.frames as f64;
                let mut rows = Vec::with_capacity(spec.size);
                for y in 0..spec.size {
                    let mut row = Vec::with_capacity(spec.size);
                    for x in 0..spec.size {
                        row.push(field.sample(loop_point(spec, x, y, progress)));
                    }
                    rows.push(row);
                }
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                on_frame(finished);
                Matrix { rows }
            },
        )
        .collect();
    Ok(FrameSeq { frames })
}

/// Serialize the sequence as a JSON array of matrices.
pub fn write_json(seq: &FrameSeq, writer: impl Write) -> MatshowResult<()> {
    serde_json::to_writer(writer, seq).context("serialize frame JSON")?;
    Ok(())
}

/// Linear map from the noise range [-0.5, 0.5] to a gray byte, clamped.
fn gray_byte(v: f64) -> u8 {
    ((v + 0.5) * 255.0).clamp(0.0, 255.0) as u8
}

/// Write one grayscale PNG per frame into `dir` (`frame_0000.png`, ...).
#[tracing::instrument(skip(seq))]
pub fn write_png_frames(seq: &FrameSeq, dir: &Path) -> MatshowResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    for (i, matrix) in seq.frames.iter().enumerate() {
        let w = matrix.width();
        let h = matrix.height();
        if w == 0 || h == 0 {
            return Err(MatshowError::validation(format!(
                "frame {i} has no cells to write"
            )));
        }
        let mut buf = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                buf.push(gray_byte(matrix.cell(x, y).unwrap_or(-0.5)));
            }
        }
        let path = dir.join(format!("frame_{i:04}.png"));
        image::save_buffer_with_format(
            &path,
            &buf,
            w as u32,
            h as u32,
            image::ColorType::L8,
            image::ImageFormat::Png,
        )
        .map_err(|e| MatshowError::encode(format!("failed to write '{}': {e}", path.display())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_spec() -> LoopSpec {
        LoopSpec {
            size: 4,
            frames: 3,
            seed: 1,
            ..LoopSpec::default()
        }
    }

    #[test]
    fn default_spec_keeps_the_canonical_shape() {
        let spec = LoopSpec::default();
        assert_eq!(spec.size, 256);
        assert_eq!(spec.frames, 100);
        assert_eq!(spec.seed, 0);
        assert_eq!(spec.space_radius, 2.0);
        assert_eq!(spec.time_radius, 1.5);
    }

    #[test]
    fn validate_rejects_degenerate_specs() {
        assert!(LoopSpec { size: 0, ..tiny_spec() }.validate().is_err());
        assert!(LoopSpec { frames: 0, ..tiny_spec() }.validate().is_err());
        assert!(
            LoopSpec {
                time_radius: f64::NAN,
                ..tiny_spec()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn synthesis_is_deterministic_per_seed() {
        let spec = tiny_spec();
        let a = synthesize(&spec, |_| {}).unwrap();
        let b = synthesize(&spec, |_| {}).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.frames[0].width(), 4);
        assert_eq!(a.frames[0].height(), 4);
    }

    #[test]
    fn progress_reports_every_frame() {
        let spec = tiny_spec();
        let count = AtomicUsize::new(0);
        synthesize(&spec, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn the_loop_closes_in_time() {
        let spec = tiny_spec();
        let mut field = Perlin::<6>::new(spec.seed);
        for y in 0..spec.size {
            for x in 0..spec.size {
                let start = field.sample(loop_point(&spec, x, y, 0.0));
                let wrapped = field.sample(loop_point(&spec, x, y, 1.0));
                assert!((start - wrapped).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn the_loop_tiles_in_space() {
        let spec = tiny_spec();
        let mut field = Perlin::<6>::new(spec.seed);
        for y in 0..spec.size {
            let edge = field.sample(loop_point(&spec, 0, y, 0.5));
            let wrapped = field.sample(loop_point(&spec, spec.size, y, 0.5));
            assert!((edge - wrapped).abs() < 1e-9);
        }
    }

    #[test]
    fn gray_mapping_matches_the_noise_range() {
        assert_eq!(gray_byte(-0.5), 0);
        assert_eq!(gray_byte(0.0), 127);
        assert_eq!(gray_byte(0.5), 255);
        assert_eq!(gray_byte(9.0), 255);
        assert_eq!(gray_byte(-9.0), 0);
    }

    #[test]
    fn png_export_writes_one_file_per_frame() {
        let seq = synthesize(&tiny_spec(), |_| {}).unwrap();
        let dir = std::path::PathBuf::from("target").join("synth_png_test");
        write_png_frames(&seq, &dir).unwrap();
        for i in 0..3 {
            assert!(dir.join(format!("frame_{i:04}.png")).is_file());
        }
    }

    #[test]
    fn json_round_trips_through_the_reader() {
        let seq = synthesize(&tiny_spec(), |_| {}).unwrap();
        let mut buf = Vec::new();
        write_json(&seq, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let parsed = crate::input::parse_frames(&text).unwrap();
        assert_eq!(parsed, seq);
    }
}

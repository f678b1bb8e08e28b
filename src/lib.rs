//! matshow turns sequences of 2-D numeric matrices into looping
//! color-mapped animations: an H.264 MP4 on disk plus a live playback
//! window.
//!
//! The typical flow mirrors the `matshow` binary:
//!
//! - Parse frames from JSON with [`input::read_frames`]
//! - Build a [`RasterPlan`] and rasterize every matrix
//! - Encode one pass of the loop with [`encode::encode_animation`]
//! - Hand the frames to [`viewer::show`] for the on-screen loop
//!
//! The companion `matgen` binary synthesizes seamlessly looping noise
//! sequences (see [`synth`]) that feed the same pipeline.
#![forbid(unsafe_code)]

pub mod colormap;
pub mod encode;
pub mod error;
pub mod input;
pub mod model;
pub mod noise;
pub mod playback;
pub mod raster;
pub mod synth;
pub mod viewer;

pub use colormap::{Color, ColorMap};
pub use error::{MatshowError, MatshowResult};
pub use model::{FrameSeq, Matrix, ValueScale};
pub use playback::Playback;
pub use raster::{FrameRGBA, RasterPlan};
pub use synth::LoopSpec;

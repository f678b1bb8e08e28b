use crate::{
    error::{MatshowError, MatshowResult},
    raster::FrameRGBA,
};

/// Explicit playback state for the looping animation: the rasterized
/// frames plus a tick cursor. Tick `i` shows `frames[i mod N]`, so lookup
/// is total for every tick and the loop is periodic with period `N`.
#[derive(Debug)]
pub struct Playback {
    frames: Vec<FrameRGBA>,
    cursor: u64,
}

impl Playback {
    /// Fails on an empty frame list; everything downstream relies on
    /// `N > 0`.
    pub fn new(frames: Vec<FrameRGBA>) -> MatshowResult<Self> {
        if frames.is_empty() {
            return Err(MatshowError::validation("no frames to play"));
        }
        Ok(Self { frames, cursor: 0 })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }

    /// Frame for tick `tick`, index `tick mod N`.
    pub fn frame_at(&self, tick: u64) -> &FrameRGBA {
        &self.frames[(tick % self.frames.len() as u64) as usize]
    }

    pub fn current(&self) -> &FrameRGBA {
        self.frame_at(self.cursor)
    }

    /// Return the frame for the current tick and step the cursor.
    pub fn advance(&mut self) -> &FrameRGBA {
        let idx = (self.cursor % self.frames.len() as u64) as usize;
        self.cursor += 1;
        &self.frames[idx]
    }
}

use crate::{
    colormap::ColorMap,
    error::{MatshowError, MatshowResult},
    model::{FrameSeq, Matrix, ValueScale},
};

/// Minimum length in pixels for the longest grid side when the cell size
/// is picked automatically, so tiny matrices still get a visible window.
const MIN_AUTO_SIDE: usize = 64;

/// One rasterized frame: straight RGBA8, row-major, fully opaque.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Return the frame with dimensions forced even, replicating the last
    /// row/column as needed. 4:2:0 chroma subsampling wants even sides.
    pub fn padded_even(self) -> FrameRGBA {
        if self.width.is_multiple_of(2) && self.height.is_multiple_of(2) {
            return self;
        }
        let (w, h) = (self.width as usize, self.height as usize);
        let new_w = w + (w % 2);
        let new_h = h + (h % 2);
        let mut data = vec![0u8; new_w * new_h * 4];
        for y in 0..new_h {
            let sy = y.min(h - 1);
            for x in 0..new_w {
                let sx = x.min(w - 1);
                let src = (sy * w + sx) * 4;
                let dst = (y * new_w + x) * 4;
                data[dst..dst + 4].copy_from_slice(&self.data[src..src + 4]);
            }
        }
        FrameRGBA {
            width: new_w as u32,
            height: new_h as u32,
            data,
        }
    }
}

/// Everything needed to turn any matrix of a sequence into pixels: grid
/// dimensions and value scale fixed from the first frame, plus the color
/// map and integer cell size.
///
/// Later frames are read through the first frame's grid. Cells a matrix
/// does not cover (short rows, or a smaller later matrix) render as the
/// color map's low end; cells beyond the grid are ignored.
#[derive(Clone, Copy, Debug)]
pub struct RasterPlan {
    pub grid_width: usize,
    pub grid_height: usize,
    pub scale: ValueScale,
    pub map: ColorMap,
    pub cell_px: u32,
}

impl RasterPlan {
    /// Build a plan from the first frame of `seq`. Fails on an empty
    /// sequence, a first frame with no cells, or a zero cell size.
    pub fn from_sequence(
        seq: &FrameSeq,
        map: ColorMap,
        cell_px: Option<u32>,
    ) -> MatshowResult<Self> {
        let scale = ValueScale::from_first(seq)?;
        let first = seq
            .first()
            .ok_or_else(|| MatshowError::validation("frame sequence is empty"))?;
        let grid_width = first.width();
        let grid_height = first.height();
        if grid_width == 0 || grid_height == 0 {
            return Err(MatshowError::validation(
                "first matrix has no cells to render",
            ));
        }
        let cell_px = match cell_px {
            Some(0) => return Err(MatshowError::validation("cell size must be > 0")),
            Some(n) => n,
            None => auto_cell_px(grid_width, grid_height),
        };
        Ok(Self {
            grid_width,
            grid_height,
            scale,
            map,
            cell_px,
        })
    }

    pub fn frame_width(&self) -> u32 {
        (self.grid_width * self.cell_px as usize) as u32
    }

    pub fn frame_height(&self) -> u32 {
        (self.grid_height * self.cell_px as usize) as u32
    }

    /// Rasterize one matrix: cell value -> scale position -> color ->
    /// `cell_px` x `cell_px` opaque block.
    pub fn rasterize(&self, matrix: &Matrix) -> FrameRGBA {
        let cell = self.cell_px as usize;
        let out_w = self.grid_width * cell;
        let out_h = self.grid_height * cell;
        let mut data = vec![0u8; out_w * out_h * 4];
        for my in 0..self.grid_height {
            for mx in 0..self.grid_width {
                let v = matrix.cell(mx, my).unwrap_or(self.scale.min);
                let c = self.map.sample(self.scale.position(v));
                for dy in 0..cell {
                    let row = (my * cell + dy) * out_w;
                    for dx in 0..cell {
                        let i = (row + mx * cell + dx) * 4;
                        data[i] = c.r;
                        data[i + 1] = c.g;
                        data[i + 2] = c.b;
                        data[i + 3] = 255;
                    }
                }
            }
        }
        FrameRGBA {
            width: out_w as u32,
            height: out_h as u32,
            data,
        }
    }

    #[tracing::instrument(skip(self, seq))]
    pub fn rasterize_all(&self, seq: &FrameSeq) -> Vec<FrameRGBA> {
        seq.frames.iter().map(|m| self.rasterize(m)).collect()
    }
}

/// Smallest integer cell size that brings the longest grid side to at
/// least `MIN_AUTO_SIDE` pixels, never below 1.
fn auto_cell_px(grid_width: usize, grid_height: usize) -> u32 {
    let longest = grid_width.max(grid_height).max(1);
    MIN_AUTO_SIDE.div_ceil(longest).max(1) as u32
}

/// Nearest-neighbor blit into a packed 0RGB buffer (one `u32` per pixel),
/// the layout window surfaces expect. Rows `dst` does not fully cover are
/// left untouched, so a buffer shorter than `dst_w * dst_h` never panics.
pub fn blit_nearest(frame: &FrameRGBA, dst: &mut [u32], dst_w: u32, dst_h: u32) {
    if frame.width == 0 || frame.height == 0 || dst_w == 0 || dst_h == 0 {
        return;
    }
    let (src_w, src_h) = (frame.width as usize, frame.height as usize);
    let (dst_w, dst_h) = (dst_w as usize, dst_h as usize);
    let rows = (dst.len() / dst_w).min(dst_h);
    for y in 0..rows {
        let sy = y * src_h / dst_h;
        let src_row = sy * src_w;
        let dst_row = y * dst_w;
        for x in 0..dst_w {
            let sx = x * src_w / dst_w;
            let i = (src_row + sx) * 4;
            dst[dst_row + x] =
                u32::from_be_bytes([0, frame.data[i], frame.data[i + 1], frame.data[i + 2]]);
        }
    }
}

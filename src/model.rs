use crate::error::{MatshowError, MatshowResult};

/// One frame's worth of data: a 2-D array of numbers, row-major.
///
/// Shape is taken as-is from the input. Rows may be ragged; the renderer
/// decides what to do about it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    pub rows: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Longest row length; ragged rows render against this width.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<f64> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Min and max over all cells. NaN cells are skipped; `None` for a
    /// cell-less or all-NaN matrix.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in &self.rows {
            for &v in row {
                min = min.min(v);
                max = max.max(v);
            }
        }
        (min <= max).then_some((min, max))
    }
}

/// Ordered frame sequence as parsed from input; index 0 plays first.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FrameSeq {
    pub frames: Vec<Matrix>,
}

impl FrameSeq {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> Option<&Matrix> {
        self.frames.first()
    }
}

/// Mapping from cell values to color-map positions in [0, 1].
///
/// Fixed once from the first frame's min/max and reused for every frame;
/// values outside the range clamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn from_first(seq: &FrameSeq) -> MatshowResult<Self> {
        let first = seq
            .first()
            .ok_or_else(|| MatshowError::validation("frame sequence is empty"))?;
        let (min, max) = first.min_max().unwrap_or((0.0, 0.0));
        Ok(Self { min, max })
    }

    /// Normalized position of `value`. A degenerate span (constant or
    /// cell-less first frame) pins everything to the low end.
    pub fn position(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if !(span > 0.0) {
            return 0.0;
        }
        let t = (value - self.min) / span;
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> Matrix {
        Matrix {
            rows: rows.iter().map(|r| r.to_vec()).collect(),
        }
    }

    #[test]
    fn width_uses_longest_row() {
        let m = matrix(&[&[1.0, 2.0, 3.0], &[4.0]]);
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(m.cell(2, 0), Some(3.0));
        assert_eq!(m.cell(2, 1), None);
    }

    #[test]
    fn scale_is_fixed_from_first_frame() {
        let seq = FrameSeq {
            frames: vec![matrix(&[&[0.0, 10.0]]), matrix(&[&[-5.0, 50.0]])],
        };
        let scale = ValueScale::from_first(&seq).unwrap();
        assert_eq!(scale.min, 0.0);
        assert_eq!(scale.max, 10.0);
        assert_eq!(scale.position(5.0), 0.5);
        // later frames clamp instead of rescaling
        assert_eq!(scale.position(-5.0), 0.0);
        assert_eq!(scale.position(50.0), 1.0);
    }

    #[test]
    fn constant_first_frame_pins_low_end() {
        let seq = FrameSeq {
            frames: vec![matrix(&[&[7.0, 7.0], &[7.0, 7.0]])],
        };
        let scale = ValueScale::from_first(&seq).unwrap();
        assert_eq!(scale.position(7.0), 0.0);
        assert_eq!(scale.position(123.0), 0.0);
    }

    #[test]
    fn nan_cells_do_not_poison_the_scale() {
        let m = matrix(&[&[1.0, f64::NAN, 3.0]]);
        assert_eq!(m.min_max(), Some((1.0, 3.0)));
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let seq = FrameSeq { frames: vec![] };
        assert!(ValueScale::from_first(&seq).is_err());
    }
}

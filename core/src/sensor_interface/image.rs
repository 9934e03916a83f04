use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Quantized Range-Doppler image, `(range, doppler)`.
///
/// Row 0 holds the farthest range bin; the Doppler axis is re-centered so
/// zero velocity sits at column `cols / 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityImage {
    pixels: Array2<u8>,
}

/// Brightest pixel of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peak {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

impl IntensityImage {
    pub fn new(pixels: Array2<u8>) -> Self {
        Self { pixels }
    }

    pub fn rows(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn cols(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.rows(), self.cols()]
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.pixels.view()
    }

    /// Row-major pixel bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().copied().collect()
    }

    /// First pixel holding the maximum value, scanning row-major.
    pub fn peak(&self) -> Option<Peak> {
        let mut best: Option<Peak> = None;
        for ((row, col), &value) in self.pixels.indexed_iter() {
            if best.map_or(true, |peak| value > peak.value) {
                best = Some(Peak { row, col, value });
            }
        }
        best
    }

    pub fn to_payload(&self) -> ImagePayload {
        ImagePayload {
            rows: self.rows(),
            cols: self.cols(),
            data: self.to_bytes(),
        }
    }
}

/// Wire form of an [`IntensityImage`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<u8>,
}

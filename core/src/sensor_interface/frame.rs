use crate::prelude::{PipelineError, PipelineResult};
use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};

/// One radar frame of raw samples, `(antenna, chirp, sample)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    samples: Array3<f32>,
}

impl Frame {
    pub fn new(samples: Array3<f32>) -> Self {
        Self { samples }
    }

    pub fn zeros(antennas: usize, chirps: usize, samples: usize) -> Self {
        Self::new(Array3::zeros((antennas, chirps, samples)))
    }

    /// Reshapes a row-major sample buffer as delivered by the sensor.
    pub fn from_flat(
        data: Vec<f32>,
        antennas: usize,
        chirps: usize,
        samples: usize,
    ) -> PipelineResult<Self> {
        let expected = antennas
            .checked_mul(chirps)
            .and_then(|n| n.checked_mul(samples))
            .ok_or_else(|| {
                PipelineError::Configuration(format!(
                    "frame shape ({}, {}, {}) overflows",
                    antennas, chirps, samples
                ))
            })?;
        if data.len() != expected {
            return Err(PipelineError::shape(
                "flat frame buffer",
                &[expected],
                &[data.len()],
            ));
        }
        let samples = Array3::from_shape_vec((antennas, chirps, samples), data)
            .map_err(|err| PipelineError::Internal(format!("reshaping frame: {}", err)))?;
        Ok(Self::new(samples))
    }

    pub fn shape(&self) -> [usize; 3] {
        let (antennas, chirps, samples) = self.samples.dim();
        [antennas, chirps, samples]
    }

    pub fn antennas(&self) -> usize {
        self.samples.dim().0
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.samples.view()
    }

    pub fn into_inner(self) -> Array3<f32> {
        self.samples
    }
}

/// Wire form of a [`Frame`]: explicit shape plus the flat sample buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramePayload {
    pub antennas: usize,
    pub chirps: usize,
    pub samples: usize,
    pub data: Vec<f32>,
}

impl FramePayload {
    pub fn from_json(text: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_frame(self) -> PipelineResult<Frame> {
        Frame::from_flat(self.data, self.antennas, self.chirps, self.samples)
    }
}

impl From<&Frame> for FramePayload {
    fn from(frame: &Frame) -> Self {
        let [antennas, chirps, samples] = frame.shape();
        Self {
            antennas,
            chirps,
            samples,
            data: frame.samples.iter().copied().collect(),
        }
    }
}

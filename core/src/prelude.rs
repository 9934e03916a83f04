use serde::{Deserialize, Serialize};

/// Construction-time configuration shared by every processing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub antennas: usize,
    pub chirps_per_frame: usize,
    pub samples_per_chirp: usize,
    pub kaiser_beta: f64,
    pub display_gain: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            antennas: 3,
            chirps_per_frame: 32,
            samples_per_chirp: 64,
            kaiser_beta: 25.0,
            display_gain: 1e3,
        }
    }
}

impl PipelineConfig {
    pub fn with_antennas(antennas: usize) -> Self {
        Self {
            antennas,
            ..Default::default()
        }
    }

    /// Number of range bins kept after the range FFT (Nyquist bin dropped).
    pub fn range_bins(&self) -> usize {
        self.samples_per_chirp / 2
    }

    pub fn frame_shape(&self) -> [usize; 3] {
        [self.antennas, self.chirps_per_frame, self.samples_per_chirp]
    }

    pub fn image_shape(&self) -> [usize; 2] {
        [self.range_bins(), self.chirps_per_frame]
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.antennas == 0 {
            return Err(PipelineError::Configuration(
                "at least one antenna is required".into(),
            ));
        }
        if self.chirps_per_frame == 0 || self.samples_per_chirp == 0 {
            return Err(PipelineError::Configuration(format!(
                "frame sizes must be positive (chirps {}, samples {})",
                self.chirps_per_frame, self.samples_per_chirp
            )));
        }
        if !self.kaiser_beta.is_finite() {
            return Err(PipelineError::Configuration(
                "kaiser beta must be finite".into(),
            ));
        }
        if !self.display_gain.is_finite() || self.display_gain <= 0.0 {
            return Err(PipelineError::Configuration(format!(
                "display gain must be positive and finite, got {}",
                self.display_gain
            )));
        }
        Ok(())
    }
}

/// Common error type for the pipeline and its stages.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("payload decoding failed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn shape(context: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// A single step of the Range-Doppler chain.
///
/// Stages are built once from a [`PipelineConfig`] and are read-only
/// afterwards, so one instance may serve any number of frames concurrently.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn execute(&self, input: &Self::Input) -> PipelineResult<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_sensor_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.frame_shape(), [3, 32, 64]);
        assert_eq!(config.image_shape(), [32, 32]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_sizes_and_bad_gain() {
        let config = PipelineConfig::with_antennas(0);
        assert!(matches!(
            config.validate(),
            Err(PipelineError::Configuration(_))
        ));

        let config = PipelineConfig {
            chirps_per_frame: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            display_gain: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"antennas": 1}"#).unwrap();
        assert_eq!(config.antennas, 1);
        assert_eq!(config.samples_per_chirp, 64);
        assert_eq!(config.kaiser_beta, 25.0);
    }
}

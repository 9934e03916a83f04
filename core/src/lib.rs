//! Range-Doppler imaging core for FMCW radar.
//!
//! A frame of raw chirp samples `(antenna, chirp, sample)` passes through
//! range FFT, moving-target indication, Doppler FFT, magnitude extraction and
//! 8-bit quantization to become a `(range, doppler)` intensity image. The
//! complex Doppler transform is assembled from real-input FFTs only.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod sensor_interface;
pub mod telemetry;

pub use prelude::{PipelineConfig, PipelineError, PipelineResult, ProcessingStage};
pub use processing::RangeDopplerPipeline;
pub use sensor_interface::{Frame, IntensityImage};

use crate::math::complex::RangeSpectrum;
use crate::math::stats::StatsHelper;
use crate::prelude::{PipelineConfig, PipelineError, PipelineResult, ProcessingStage};
use crate::telemetry::log::LogManager;
use ndarray::{Array3, ArrayView3, Axis};

const CHIRP_AXIS: Axis = Axis(1);

/// Moving-target indication: removes the zero-Doppler (static clutter)
/// component by subtracting, per antenna and range bin, the mean over chirps.
pub struct MtiStage {
    expected: [usize; 3],
    logger: LogManager,
}

impl MtiStage {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            expected: [
                config.antennas,
                config.chirps_per_frame,
                config.range_bins(),
            ],
            logger: LogManager::new("mti"),
        }
    }
}

fn remove_chirp_mean(plane: ArrayView3<'_, f32>) -> PipelineResult<Array3<f32>> {
    let mean = plane
        .mean_axis(CHIRP_AXIS)
        .ok_or_else(|| PipelineError::Internal("no chirps to average".into()))?;
    Ok(&plane - &mean.insert_axis(CHIRP_AXIS))
}

impl ProcessingStage for MtiStage {
    type Input = RangeSpectrum;
    type Output = RangeSpectrum;

    fn execute(&self, spectrum: &RangeSpectrum) -> PipelineResult<RangeSpectrum> {
        if spectrum.shape() != self.expected {
            return Err(PipelineError::shape(
                "mti stage input",
                &self.expected,
                spectrum.shape(),
            ));
        }

        let filtered = RangeSpectrum::new(
            remove_chirp_mean(spectrum.re())?,
            remove_chirp_mean(spectrum.im())?,
        )?;

        self.logger.trace_frame(&format!(
            "MtiStage residual RMS {:.6}",
            StatsHelper::rms(filtered.re().iter().chain(filtered.im().iter()))
        ));
        Ok(filtered)
    }
}

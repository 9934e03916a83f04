use crate::math::complex::{ComplexSignal, DopplerRangeMap, RangeSpectrum};
use crate::math::fft::{shift_signal, SpectralTransform};
use crate::math::stats::StatsHelper;
use crate::math::window::{Window, WindowGenerator};
use crate::prelude::{PipelineConfig, PipelineError, PipelineResult, ProcessingStage};
use crate::telemetry::log::LogManager;
use ndarray::{s, Array3};

/// `(antenna, chirp, range)` <-> `(antenna, range, chirp)`; its own inverse.
const CHIRP_LAST: [usize; 3] = [0, 2, 1];

/// Slow-time stage: Kaiser taper, complex FFT across chirps, re-centering.
pub struct DopplerStage {
    window: Window,
    transform: SpectralTransform,
    expected: [usize; 3],
    logger: LogManager,
}

impl DopplerStage {
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        Ok(Self {
            window: WindowGenerator::kaiser(config.chirps_per_frame, config.kaiser_beta)?,
            transform: SpectralTransform::new(config.chirps_per_frame)?,
            expected: [
                config.antennas,
                config.chirps_per_frame,
                config.range_bins(),
            ],
            logger: LogManager::new("doppler"),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl ProcessingStage for DopplerStage {
    type Input = RangeSpectrum;
    type Output = DopplerRangeMap;

    fn execute(&self, spectrum: &RangeSpectrum) -> PipelineResult<DopplerRangeMap> {
        if spectrum.shape() != self.expected {
            return Err(PipelineError::shape(
                "doppler stage input",
                &self.expected,
                spectrum.shape(),
            ));
        }

        let re = spectrum.re().permuted_axes(CHIRP_LAST);
        let im = spectrum.im().permuted_axes(CHIRP_LAST);
        let (antennas, bins, chirps) = re.dim();
        let window = self.window.coefficients();

        let mut out_re = Array3::<f32>::zeros((antennas, bins, chirps));
        let mut out_im = Array3::<f32>::zeros((antennas, bins, chirps));
        for antenna in 0..antennas {
            for bin in 0..bins {
                let slow_time = ComplexSignal::new(
                    &re.slice(s![antenna, bin, ..]) * &window,
                    &im.slice(s![antenna, bin, ..]) * &window,
                )?;
                let centred = shift_signal(&self.transform.complex_fft(&slow_time)?)?;
                out_re
                    .slice_mut(s![antenna, bin, ..])
                    .assign(&centred.re());
                out_im
                    .slice_mut(s![antenna, bin, ..])
                    .assign(&centred.im());
            }
        }

        let map = DopplerRangeMap::new(
            out_re
                .permuted_axes(CHIRP_LAST)
                .as_standard_layout()
                .into_owned(),
            out_im
                .permuted_axes(CHIRP_LAST)
                .as_standard_layout()
                .into_owned(),
        )?;

        self.logger.trace_frame(&format!(
            "DopplerStage RMS {:.6}",
            StatsHelper::rms(map.re().iter().chain(map.im().iter()))
        ));
        Ok(map)
    }
}

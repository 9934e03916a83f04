use crate::math::complex::RangeSpectrum;
use crate::math::fft::SpectralTransform;
use crate::math::stats::StatsHelper;
use crate::math::window::{Window, WindowGenerator};
use crate::prelude::{PipelineConfig, PipelineError, PipelineResult, ProcessingStage};
use crate::sensor_interface::Frame;
use crate::telemetry::log::LogManager;
use ndarray::s;

/// Fast-time stage: per-chirp DC removal, Hann taper, one-sided range FFT.
///
/// The Nyquist bin of the real FFT is discarded, so `S` samples yield
/// `S / 2` range bins.
pub struct RangeStage {
    window: Window,
    transform: SpectralTransform,
    expected: [usize; 3],
    logger: LogManager,
}

impl RangeStage {
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        Ok(Self {
            window: WindowGenerator::hann(config.samples_per_chirp)?,
            transform: SpectralTransform::new(config.samples_per_chirp)?,
            expected: config.frame_shape(),
            logger: LogManager::new("range"),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl ProcessingStage for RangeStage {
    type Input = Frame;
    type Output = RangeSpectrum;

    fn execute(&self, frame: &Frame) -> PipelineResult<RangeSpectrum> {
        let shape = frame.shape();
        if shape != self.expected {
            return Err(PipelineError::shape("range stage input", &self.expected, &shape));
        }

        let [antennas, chirps, samples] = shape;
        let bins = samples / 2;
        let window = self.window.coefficients();
        let view = frame.view();

        let mut output = RangeSpectrum::zeros((antennas, chirps, bins));
        let (mut out_re, mut out_im) = output.planes_mut();
        for antenna in 0..antennas {
            for chirp in 0..chirps {
                let lane = view.slice(s![antenna, chirp, ..]);
                let centred = &lane - StatsHelper::mean(lane);
                let tapered = centred * &window;
                let spectrum = self.transform.real_fft(tapered.view())?;

                out_re
                    .slice_mut(s![antenna, chirp, ..])
                    .assign(&spectrum.re().slice(s![..bins]));
                out_im
                    .slice_mut(s![antenna, chirp, ..])
                    .assign(&spectrum.im().slice(s![..bins]));
            }
        }

        self.logger.trace_frame(&format!(
            "RangeStage RMS re {:.6} im {:.6}",
            StatsHelper::rms(output.re().iter()),
            StatsHelper::rms(output.im().iter())
        ));
        Ok(output)
    }
}

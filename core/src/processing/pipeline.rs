use crate::math::complex::DopplerRangeMap;
use crate::math::window::Window;
use crate::prelude::{PipelineConfig, PipelineError, PipelineResult, ProcessingStage};
use crate::processing::{DopplerStage, ImageQuantizer, MagnitudeStage, MtiStage, RangeStage};
use crate::sensor_interface::{Frame, IntensityImage};
use crate::telemetry::log::LogManager;
use ndarray::Array3;
use std::sync::Arc;

/// Raw FMCW frame in, quantized Range-Doppler image out.
///
/// Everything the pipeline owns (windows, FFT plans, sizes) is fixed at
/// construction, so `process` is a pure function of its frame and one
/// instance can be shared freely between threads.
pub struct RangeDopplerPipeline {
    config: PipelineConfig,
    range: RangeStage,
    mti: MtiStage,
    doppler: DopplerStage,
    magnitude: MagnitudeStage,
    quantizer: ImageQuantizer,
    logger: LogManager,
}

impl RangeDopplerPipeline {
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let logger = LogManager::new("pipeline");
        let pipeline = Self {
            range: RangeStage::new(&config)?,
            mti: MtiStage::new(&config),
            doppler: DopplerStage::new(&config)?,
            magnitude: MagnitudeStage,
            quantizer: ImageQuantizer::new(&config),
            config,
            logger,
        };
        pipeline.logger.record(&format!(
            "pipeline ready: frame {:?} -> image {:?}, kaiser beta {}, gain {}",
            pipeline.config.frame_shape(),
            pipeline.config.image_shape(),
            pipeline.config.kaiser_beta,
            pipeline.config.display_gain
        ));
        Ok(pipeline)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn range_window(&self) -> &Window {
        self.range.window()
    }

    pub fn doppler_window(&self) -> &Window {
        self.doppler.window()
    }

    fn check_frame(&self, frame: &Frame) -> PipelineResult<()> {
        let expected = self.config.frame_shape();
        let actual = frame.shape();
        if actual != expected {
            return Err(PipelineError::shape("frame", &expected, &actual));
        }
        Ok(())
    }

    /// Complex, re-centered Range-Doppler map of every antenna.
    pub fn range_doppler_map(&self, frame: &Frame) -> PipelineResult<DopplerRangeMap> {
        self.check_frame(frame)?;
        let spectrum = self.range.execute(frame)?;
        let filtered = self.mti.execute(&spectrum)?;
        self.doppler.execute(&filtered)
    }

    /// Magnitude cube `(antenna, chirp, range)` ahead of quantization.
    pub fn magnitude_map(&self, frame: &Frame) -> PipelineResult<Array3<f32>> {
        let map = self.range_doppler_map(frame)?;
        self.magnitude.execute(&map)
    }

    pub fn process(&self, frame: &Frame) -> PipelineResult<IntensityImage> {
        let magnitude = self.magnitude_map(frame)?;
        self.quantizer.execute(&magnitude)
    }

    /// Processes frames in order, stopping at the first failure.
    pub fn process_batch(&self, frames: &[Frame]) -> PipelineResult<Vec<IntensityImage>> {
        frames.iter().map(|frame| self.process(frame)).collect()
    }

    /// Processes every frame on its own blocking worker; output order follows
    /// input order.
    pub async fn process_concurrent(
        self: Arc<Self>,
        frames: Vec<Frame>,
    ) -> PipelineResult<Vec<IntensityImage>> {
        let handles: Vec<_> = frames
            .into_iter()
            .map(|frame| {
                let pipeline = Arc::clone(&self);
                tokio::task::spawn_blocking(move || pipeline.process(&frame))
            })
            .collect();

        let mut images = Vec::with_capacity(handles.len());
        for handle in handles {
            let image = handle
                .await
                .map_err(|err| PipelineError::Internal(format!("frame worker failed: {}", err)))??;
            images.push(image);
        }
        self.logger
            .trace_frame(&format!("processed batch of {} frames", images.len()));
        Ok(images)
    }
}

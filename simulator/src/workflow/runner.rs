use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use rdmcore::sensor_interface::{ImageBroadcaster, Peak};
use rdmcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use rdmcore::{Frame, IntensityImage, RangeDopplerPipeline};
use std::sync::Arc;

pub struct WorkflowResult {
    pub images: Vec<Arc<IntensityImage>>,
    pub peaks: Vec<Option<Peak>>,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    pipeline: Arc<RangeDopplerPipeline>,
    broadcaster: Arc<ImageBroadcaster>,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> anyhow::Result<Self> {
        let pipeline = RangeDopplerPipeline::new(config.pipeline.clone())
            .context("building range-doppler pipeline")?;
        Ok(Self {
            pipeline: Arc::new(pipeline),
            broadcaster: Arc::new(ImageBroadcaster::new()),
            metrics: Arc::new(MetricsRecorder::new()),
        })
    }

    pub fn broadcaster(&self) -> Arc<ImageBroadcaster> {
        Arc::clone(&self.broadcaster)
    }

    /// Processes the batch concurrently, then publishes images in frame order.
    pub async fn execute(&self, frames: Vec<Frame>) -> anyhow::Result<WorkflowResult> {
        let frame_count = frames.len();
        let images = match Arc::clone(&self.pipeline).process_concurrent(frames).await {
            Ok(images) => images,
            Err(err) => {
                self.metrics.record_error();
                return Err(err).context("processing frame batch");
            }
        };

        let mut shared = Vec::with_capacity(images.len());
        let mut peaks = Vec::with_capacity(images.len());
        for image in images {
            self.metrics.record_processed();
            let image = Arc::new(image);
            let delivered = self.broadcaster.publish(Arc::clone(&image));
            self.metrics.record_published(delivered);
            peaks.push(image.peak());
            shared.push(image);
        }

        let metrics = self.metrics.snapshot();
        info!(
            "processed {} frames ({} total, {} errors, {} deliveries)",
            frame_count, metrics.processed, metrics.errors, metrics.published
        );

        Ok(WorkflowResult {
            images: shared,
            peaks,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_frames, GeneratorConfig, SyntheticTarget};

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .unwrap()
    }

    #[test]
    fn runner_executes_workflow() {
        let cfg = WorkflowConfig::from_args(3, 2, 1);
        let runner = Runner::new(&cfg).unwrap();
        let (_, mut receiver) = runner.broadcaster().subscribe();
        let frames = build_frames(&cfg.generator, cfg.frames).unwrap();

        let result = runtime().block_on(runner.execute(frames)).unwrap();
        assert_eq!(result.images.len(), 3);
        assert_eq!(result.metrics.processed, 3);
        assert_eq!(result.metrics.published, 3);
        assert!(result.images.iter().all(|image| image.shape() == [32, 32]));
        for _ in 0..3 {
            assert!(receiver.try_recv().is_ok());
        }
    }

    #[test]
    fn single_target_is_found_where_expected() {
        let mut cfg = WorkflowConfig::from_args(1, 1, 0);
        cfg.generator = GeneratorConfig {
            antennas: 1,
            targets: vec![SyntheticTarget {
                range_bin: 9.0,
                doppler_bin: -3.0,
                amplitude: 1e-3,
            }],
            noise: 0.0,
            ..Default::default()
        };
        let runner = Runner::new(&cfg).unwrap();
        let frames = build_frames(&cfg.generator, 1).unwrap();
        let result = runtime().block_on(runner.execute(frames)).unwrap();

        let peak = result.peaks[0].unwrap();
        // Row 31 - 9; Doppler -3 wraps to bin 29, re-centered to 13.
        assert_eq!((peak.row, peak.col), (22, 13));
    }

    #[test]
    fn shape_mismatch_is_counted_as_error() {
        let cfg = WorkflowConfig::from_args(1, 3, 0);
        let runner = Runner::new(&cfg).unwrap();
        let mut wrong = cfg.generator.clone();
        wrong.antennas = 2;
        let frames = build_frames(&wrong, 1).unwrap();

        let result = runtime().block_on(runner.execute(frames));
        assert!(result.is_err());
        assert_eq!(runner.metrics.snapshot().errors, 1);
    }
}

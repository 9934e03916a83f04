use crate::prelude::{PipelineConfig, PipelineError, PipelineResult, ProcessingStage};
use crate::sensor_interface::IntensityImage;
use crate::telemetry::log::LogManager;
use ndarray::{Array3, Axis, Slice};

/// Antenna whose magnitude map becomes the image.
const IMAGE_CHANNEL: usize = 0;
/// `(chirp, range)` -> `(range, chirp)`.
const RANGE_MAJOR: [usize; 2] = [1, 0];
/// Axis reversed after transposition so the farthest range is row 0.
const RANGE_AXIS: Axis = Axis(0);

/// Turns a magnitude cube into an 8-bit display image.
pub struct ImageQuantizer {
    display_gain: f32,
    expected: [usize; 3],
    logger: LogManager,
}

impl ImageQuantizer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            display_gain: config.display_gain,
            expected: [
                config.antennas,
                config.chirps_per_frame,
                config.range_bins(),
            ],
            logger: LogManager::new("quantize"),
        }
    }

    /// Maps a gained magnitude to a pixel: clip to `[0, 1]`, scale, truncate.
    pub fn quantize(&self, magnitude: f32) -> u8 {
        ((magnitude * self.display_gain).clamp(0.0, 1.0) * 255.0) as u8
    }
}

impl ProcessingStage for ImageQuantizer {
    type Input = Array3<f32>;
    type Output = IntensityImage;

    fn execute(&self, magnitude: &Array3<f32>) -> PipelineResult<IntensityImage> {
        if magnitude.shape() != self.expected {
            return Err(PipelineError::shape(
                "quantizer input",
                &self.expected,
                magnitude.shape(),
            ));
        }

        let channel = magnitude
            .index_axis(Axis(0), IMAGE_CHANNEL)
            .permuted_axes(RANGE_MAJOR);
        let pixels = channel
            .slice_axis(RANGE_AXIS, Slice::new(0, None, -1))
            .mapv(|value| self.quantize(value));

        let image = IntensityImage::new(pixels);
        if let Some(peak) = image.peak() {
            self.logger.trace_frame(&format!(
                "ImageQuantizer peak {} at range row {} doppler col {}",
                peak.value, peak.row, peak.col
            ));
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantizer(antennas: usize, chirps: usize, samples: usize) -> ImageQuantizer {
        ImageQuantizer::new(&PipelineConfig {
            antennas,
            chirps_per_frame: chirps,
            samples_per_chirp: samples,
            ..Default::default()
        })
    }

    #[test]
    fn layout_is_transposed_and_range_reversed() {
        let stage = quantizer(2, 2, 6);
        // magnitude[a][chirp][range], scaled so the gain brings it to 0..1
        let magnitude = Array3::from_shape_fn((2, 2, 3), |(a, c, r)| {
            if a == 0 {
                (c * 3 + r) as f32 * 1e-4
            } else {
                1.0
            }
        });
        let image = stage.execute(&magnitude).unwrap();
        assert_eq!(image.shape(), [3, 2]);
        let expected: Vec<u8> = [[2usize, 5], [1, 4], [0, 3]]
            .iter()
            .flatten()
            .map(|&v| stage.quantize(v as f32 * 1e-4))
            .collect();
        assert_eq!(image.to_bytes(), expected);
    }

    #[test]
    fn quantization_is_bounded_and_monotonic() {
        let stage = quantizer(1, 2, 4);
        assert_eq!(stage.quantize(-3.0), 0);
        assert_eq!(stage.quantize(0.0), 0);
        assert_eq!(stage.quantize(1e-3), 255);
        assert_eq!(stage.quantize(5.0), 255);
        assert_eq!(stage.quantize(f32::NAN), 0);

        let mut previous = 0;
        for step in 0..=2000 {
            let value = stage.quantize(step as f32 * 1e-6);
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(previous, 255);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let stage = quantizer(1, 2, 4);
        let result = stage.execute(&Array3::zeros((1, 3, 2)));
        assert!(matches!(
            result,
            Err(PipelineError::ShapeMismatch { .. })
        ));
    }
}

use crate::generator::template::cosine_tone;
use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rdmcore::Frame;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Point reflector moving at constant radial velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticTarget {
    /// Beat frequency in range bins (cycles per chirp).
    pub range_bin: f32,
    /// Doppler shift in bins (phase cycles across the chirps of one frame).
    pub doppler_bin: f32,
    pub amplitude: f32,
}

/// Configuration for generating synthetic FMCW frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub antennas: usize,
    pub chirps: usize,
    pub samples: usize,
    pub targets: Vec<SyntheticTarget>,
    /// Amplitude of a static return, identical on every chirp.
    pub clutter: f32,
    pub clutter_bin: f32,
    pub dc_offset: f32,
    pub noise: f32,
    pub antenna_phase_step: f32,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            antennas: 3,
            chirps: 32,
            samples: 64,
            targets: vec![
                SyntheticTarget {
                    range_bin: 12.0,
                    doppler_bin: 4.0,
                    amplitude: 1.5e-3,
                },
                SyntheticTarget {
                    range_bin: 22.0,
                    doppler_bin: -6.0,
                    amplitude: 8e-4,
                },
            ],
            clutter: 0.5,
            clutter_bin: 3.0,
            dc_offset: 0.2,
            noise: 1e-5,
            antenna_phase_step: 0.6,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn frame_shape(&self) -> [usize; 3] {
        [self.antennas, self.chirps, self.samples]
    }
}

/// Builds frame `frame_index`; each frame draws its own noise.
pub fn build_frame(config: &GeneratorConfig, frame_index: u64) -> anyhow::Result<Frame> {
    let [antennas, chirps, samples] = config.frame_shape();
    let sample_count = antennas
        .checked_mul(chirps)
        .and_then(|n| n.checked_mul(samples))
        .context("overflow computing sample count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(frame_index));
    let static_return: Vec<f32> = cosine_tone(samples, config.clutter_bin, 0.0)
        .map(|v| config.dc_offset + config.clutter * v)
        .collect();

    let mut data = Vec::with_capacity(sample_count);
    for antenna in 0..antennas {
        for chirp in 0..chirps {
            let mut chirp_samples = static_return.clone();
            for target in &config.targets {
                let phase = 2.0 * PI * target.doppler_bin * chirp as f32 / chirps as f32
                    + antenna as f32 * config.antenna_phase_step;
                for (sample, tone) in chirp_samples
                    .iter_mut()
                    .zip(cosine_tone(samples, target.range_bin, phase))
                {
                    *sample += target.amplitude * tone;
                }
            }
            if config.noise > 0.0 {
                for sample in chirp_samples.iter_mut() {
                    *sample += rng.gen_range(-config.noise..config.noise);
                }
            }
            data.extend(chirp_samples);
        }
    }

    Frame::from_flat(data, antennas, chirps, samples).context("assembling synthetic frame")
}

pub fn build_frames(config: &GeneratorConfig, count: usize) -> anyhow::Result<Vec<Frame>> {
    (0..count as u64)
        .map(|index| build_frame(config, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdmcore::sensor_interface::FramePayload;

    #[test]
    fn generator_builds_expected_shape() {
        let frame = build_frame(&GeneratorConfig::default(), 0).unwrap();
        assert_eq!(frame.shape(), [3, 32, 64]);
    }

    #[test]
    fn frames_differ_only_by_noise() {
        let config = GeneratorConfig::default();
        let frames = build_frames(&config, 2).unwrap();
        assert_eq!(frames.len(), 2);
        assert_ne!(frames[0], frames[1]);

        let quiet = GeneratorConfig {
            noise: 0.0,
            ..config
        };
        assert_eq!(
            build_frame(&quiet, 0).unwrap(),
            build_frame(&quiet, 5).unwrap()
        );
    }

    #[test]
    fn static_scene_is_constant_across_chirps() {
        let config = GeneratorConfig {
            antennas: 1,
            targets: Vec::new(),
            noise: 0.0,
            ..Default::default()
        };
        let payload = FramePayload::from(&build_frame(&config, 0).unwrap());
        let mut chirps = payload.data.chunks(64);
        let first = chirps.next().unwrap();
        assert!(chirps.all(|chirp| chirp == first));
    }
}

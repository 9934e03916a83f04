use crate::generator::profile::GeneratorConfig;
use anyhow::{ensure, Context};
use rdmcore::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default = "default_frames")]
    pub frames: usize,
}

fn default_frames() -> usize {
    4
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(frames: usize, antennas: usize, seed: u64) -> Self {
        Self {
            pipeline: PipelineConfig::with_antennas(antennas),
            generator: GeneratorConfig {
                antennas,
                seed,
                ..Default::default()
            },
            frames,
        }
    }

    /// The generator must produce exactly the frame shape the pipeline expects.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.pipeline
            .validate()
            .context("validating pipeline configuration")?;
        ensure!(
            self.generator.frame_shape() == self.pipeline.frame_shape(),
            "generator frame shape {:?} does not match pipeline frame shape {:?}",
            self.generator.frame_shape(),
            self.pipeline.frame_shape()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_shapes_aligned() {
        let cfg = WorkflowConfig::from_args(2, 5, 9);
        assert_eq!(cfg.pipeline.antennas, 5);
        assert_eq!(cfg.generator.seed, 9);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"frames: 3\npipeline:\n  antennas: 1\ngenerator:\n  antennas: 1\n  noise: 0.0\n  targets:\n    - range_bin: 8.0\n      doppler_bin: 2.0\n      amplitude: 0.001\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.frames, 3);
        assert_eq!(cfg.pipeline.chirps_per_frame, 32);
        assert_eq!(cfg.generator.targets.len(), 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn mismatched_generator_is_rejected() {
        let mut cfg = WorkflowConfig::from_args(1, 3, 0);
        cfg.generator.samples = 128;
        assert!(cfg.validate().is_err());
    }
}

use anyhow::Context;
use rdmcore::sensor_interface::Peak;
use rdmcore::IntensityImage;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Per-frame line of `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub index: usize,
    pub peak: Option<Peak>,
    pub lit_pixels: usize,
    pub image: PathBuf,
}

/// Writes images as binary PGM plus a JSON summary into one directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn create<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating report directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn write_frame(&self, index: usize, image: &IntensityImage) -> anyhow::Result<FrameSummary> {
        let path = self.dir.join(format!("frame_{:04}.pgm", index));
        let file =
            File::create(&path).with_context(|| format!("creating image {}", path.display()))?;
        let mut out = BufWriter::new(file);
        write_pgm(&mut out, image)
            .and_then(|_| out.flush())
            .with_context(|| format!("writing image {}", path.display()))?;

        Ok(FrameSummary {
            index,
            peak: image.peak(),
            lit_pixels: image.to_bytes().iter().filter(|&&v| v > 0).count(),
            image: path,
        })
    }

    pub fn write_summary(&self, frames: &[FrameSummary]) -> anyhow::Result<PathBuf> {
        let path = self.dir.join("summary.json");
        let file =
            File::create(&path).with_context(|| format!("creating summary {}", path.display()))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, frames)
            .with_context(|| format!("writing summary {}", path.display()))?;
        out.flush()
            .with_context(|| format!("flushing summary {}", path.display()))?;
        Ok(path)
    }
}

/// Binary greyscale PGM: width is the Doppler axis, height the range axis.
pub fn write_pgm<W: Write>(out: &mut W, image: &IntensityImage) -> std::io::Result<()> {
    write!(out, "P5\n{} {}\n255\n", image.cols(), image.rows())?;
    out.write_all(&image.to_bytes())
}

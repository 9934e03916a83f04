pub mod complex;
pub mod fft;
pub mod stats;
pub mod window;

pub use complex::{ComplexSignal, DopplerRangeMap, RangeSpectrum};
pub use fft::{shift, shift_signal, SpectralTransform};
pub use stats::StatsHelper;
pub use window::{Window, WindowGenerator, WindowKind};

use crate::math::complex::ComplexSignal;
use crate::prelude::{PipelineError, PipelineResult};
use ndarray::{s, Array1, ArrayView1, Ix1};
use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Fixed-length spectral transforms built on a single forward real-input plan.
///
/// The complex transform is not planned directly: it is assembled from the
/// two-sided spectra of the real and imaginary parts, so the only primitive
/// the transform relies on is the FFT of a real sequence.
#[derive(Clone)]
pub struct SpectralTransform {
    len: usize,
    fft: Arc<dyn Fft<f32>>,
}

impl SpectralTransform {
    pub fn new(len: usize) -> PipelineResult<Self> {
        if len == 0 {
            return Err(PipelineError::Configuration(
                "transform length must be positive".into(),
            ));
        }
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);
        Ok(Self { len, fft })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-negative frequency bins, `len / 2 + 1`.
    pub fn one_sided_len(&self) -> usize {
        self.len / 2 + 1
    }

    fn check_len(&self, actual: usize) -> PipelineResult<()> {
        if actual != self.len {
            return Err(PipelineError::shape(
                "spectral transform input",
                &[self.len],
                &[actual],
            ));
        }
        Ok(())
    }

    /// Non-negative frequency bins of the DFT of a real sequence.
    pub fn real_fft(&self, x: ArrayView1<'_, f32>) -> PipelineResult<ComplexSignal<Ix1>> {
        self.check_len(x.len())?;

        let mut buffer: Vec<Complex32> = x.iter().map(|&v| Complex32::new(v, 0.0)).collect();
        let mut scratch = vec![Complex32::zero(); self.fft.get_inplace_scratch_len()];
        self.fft.process_with_scratch(&mut buffer, &mut scratch);

        let bins = &buffer[..self.one_sided_len()];
        let re = bins.iter().map(|c| c.re).collect::<Array1<f32>>();
        let im = bins.iter().map(|c| c.im).collect::<Array1<f32>>();
        ComplexSignal::new(re, im)
    }

    /// Two-sided spectrum of a real sequence, rebuilt from [`Self::real_fft`]
    /// by conjugate symmetry. DC and the Nyquist bin are never mirrored.
    pub fn full_spectrum(&self, x: ArrayView1<'_, f32>) -> PipelineResult<ComplexSignal<Ix1>> {
        let (half_re, half_im) = self.real_fft(x)?.into_parts();
        let n = self.len;
        let bins = self.one_sided_len();

        let mut re = Array1::<f32>::zeros(n);
        let mut im = Array1::<f32>::zeros(n);
        re.slice_mut(s![..bins]).assign(&half_re);
        im.slice_mut(s![..bins]).assign(&half_im);
        for k in bins..n {
            re[k] = half_re[n - k];
            im[k] = -half_im[n - k];
        }
        ComplexSignal::new(re, im)
    }

    /// DFT of a complex sequence:
    /// `re = Re(F(x.re)) - Im(F(x.im))`, `im = Im(F(x.re)) + Re(F(x.im))`.
    pub fn complex_fft(&self, x: &ComplexSignal<Ix1>) -> PipelineResult<ComplexSignal<Ix1>> {
        let from_re = self.full_spectrum(x.re())?;
        let from_im = self.full_spectrum(x.im())?;

        let re = &from_re.re() - &from_im.im();
        let im = &from_re.im() + &from_im.re();
        ComplexSignal::new(re, im)
    }
}

/// Swaps the halves of a spectrum at `len / 2`, moving DC to the centre.
/// Self-inverse for even lengths.
pub fn shift<T: Clone>(x: ArrayView1<'_, T>) -> Array1<T> {
    let mid = x.len() / 2;
    let (head, tail) = (x.slice(s![..mid]), x.slice(s![mid..]));
    tail.iter().chain(head.iter()).cloned().collect()
}

pub fn shift_signal(x: &ComplexSignal<Ix1>) -> PipelineResult<ComplexSignal<Ix1>> {
    ComplexSignal::new(shift(x.re()), shift(x.im()))
}

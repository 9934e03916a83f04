use crate::prelude::{PipelineError, PipelineResult};
use ndarray::{Array, ArrayView, ArrayViewMut, Dimension, IntoDimension, Ix1, Ix3};

/// Complex data held as separate real and imaginary planes of equal shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSignal<D: Dimension> {
    re: Array<f32, D>,
    im: Array<f32, D>,
}

/// One-sided range spectrum, `(antenna, chirp, range)`.
pub type RangeSpectrum = ComplexSignal<Ix3>;
/// Two-sided, re-centered Doppler spectrum, `(antenna, chirp, range)`.
pub type DopplerRangeMap = ComplexSignal<Ix3>;

impl<D: Dimension> ComplexSignal<D> {
    pub fn new(re: Array<f32, D>, im: Array<f32, D>) -> PipelineResult<Self> {
        if re.shape() != im.shape() {
            return Err(PipelineError::shape(
                "complex signal planes",
                re.shape(),
                im.shape(),
            ));
        }
        Ok(Self { re, im })
    }

    pub fn zeros<Sh: IntoDimension<Dim = D>>(shape: Sh) -> Self {
        let dim = shape.into_dimension();
        Self {
            re: Array::zeros(dim.clone()),
            im: Array::zeros(dim),
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.re.shape()
    }

    pub fn re(&self) -> ArrayView<'_, f32, D> {
        self.re.view()
    }

    pub fn im(&self) -> ArrayView<'_, f32, D> {
        self.im.view()
    }

    pub fn planes_mut(&mut self) -> (ArrayViewMut<'_, f32, D>, ArrayViewMut<'_, f32, D>) {
        (self.re.view_mut(), self.im.view_mut())
    }

    pub fn into_parts(self) -> (Array<f32, D>, Array<f32, D>) {
        (self.re, self.im)
    }
}

impl ComplexSignal<Ix1> {
    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }
}

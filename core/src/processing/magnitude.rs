use crate::math::complex::{ComplexSignal, DopplerRangeMap};
use crate::prelude::{PipelineResult, ProcessingStage};
use ndarray::{Array, Array3, Dimension, Zip};

/// Complex-to-real magnitude, `sqrt(re² + im²)` per element.
pub struct MagnitudeStage;

impl MagnitudeStage {
    /// Computed with `hypot`: zero exactly when both parts are zero.
    pub fn magnitude<D: Dimension>(signal: &ComplexSignal<D>) -> Array<f32, D> {
        Zip::from(signal.re())
            .and(signal.im())
            .map_collect(|&re, &im| re.hypot(im))
    }
}

impl ProcessingStage for MagnitudeStage {
    type Input = DopplerRangeMap;
    type Output = Array3<f32>;

    fn execute(&self, map: &DopplerRangeMap) -> PipelineResult<Array3<f32>> {
        Ok(Self::magnitude(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array1};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn magnitude_of_pythagorean_pairs() {
        let signal = ComplexSignal::new(arr1(&[3.0, 0.0, -5.0]), arr1(&[4.0, 0.0, 12.0])).unwrap();
        assert_eq!(MagnitudeStage::magnitude(&signal), arr1(&[5.0, 0.0, 13.0]));
    }

    #[test]
    fn magnitude_is_non_negative_and_zero_only_at_origin() {
        let mut rng = StdRng::seed_from_u64(5);
        let re: Array1<f32> = (0..256)
            .map(|i| if i % 4 == 0 { 0.0 } else { rng.gen_range(-1e3..1e3) })
            .collect();
        let im: Array1<f32> = (0..256)
            .map(|i| if i % 8 == 0 { 0.0 } else { rng.gen_range(-1e-30..1e-30) })
            .collect();
        let signal = ComplexSignal::new(re.clone(), im.clone()).unwrap();
        let magnitude = MagnitudeStage::magnitude(&signal);
        for i in 0..256 {
            assert!(magnitude[i] >= 0.0);
            assert_eq!(magnitude[i] == 0.0, re[i] == 0.0 && im[i] == 0.0);
        }
    }
}

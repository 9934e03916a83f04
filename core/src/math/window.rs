use crate::prelude::{PipelineError, PipelineResult};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Supported tapers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WindowKind {
    /// Symmetric Hann window, both zero-valued endpoints included.
    Hann,
    Kaiser { beta: f64 },
}

/// Window whose coefficients sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    kind: WindowKind,
    coefficients: Array1<f32>,
}

impl Window {
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn coefficients(&self) -> ArrayView1<'_, f32> {
        self.coefficients.view()
    }
}

/// Builds normalized windows for the range and Doppler axes.
pub struct WindowGenerator;

impl WindowGenerator {
    pub fn hann(len: usize) -> PipelineResult<Window> {
        Self::generate(WindowKind::Hann, len)
    }

    pub fn kaiser(len: usize, beta: f64) -> PipelineResult<Window> {
        Self::generate(WindowKind::Kaiser { beta }, len)
    }

    pub fn generate(kind: WindowKind, len: usize) -> PipelineResult<Window> {
        if len == 0 {
            return Err(PipelineError::Configuration(format!(
                "{:?} window length must be positive",
                kind
            )));
        }

        let raw = match kind {
            WindowKind::Hann => hann_coefficients(len),
            WindowKind::Kaiser { beta } => {
                if !beta.is_finite() {
                    return Err(PipelineError::Configuration(format!(
                        "kaiser beta must be finite, got {}",
                        beta
                    )));
                }
                kaiser_coefficients(len, beta)
            }
        };

        let sum: f64 = raw.iter().sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(PipelineError::Configuration(format!(
                "degenerate {:?} window of length {} (coefficient sum {})",
                kind, len, sum
            )));
        }

        let coefficients = raw.iter().map(|&c| (c / sum) as f32).collect();
        Ok(Window { kind, coefficients })
    }
}

fn hann_coefficients(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let span = (len - 1) as f64;
    (0..len)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / span).cos())
        .collect()
}

fn kaiser_coefficients(len: usize, beta: f64) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let denom = bessel_i0(beta);
    let span = (len - 1) as f64;
    (0..len)
        .map(|n| {
            let ratio = 2.0 * n as f64 / span - 1.0;
            let inside = (1.0 - ratio * ratio).max(0.0).sqrt();
            bessel_i0(beta * inside) / denom
        })
        .collect()
}

/// Zeroth-order modified Bessel function of the first kind, by power series.
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    // Terms grow until k ~ x/2, then shrink geometrically.
    while term > sum * 1e-17 || k < half {
        term *= (half / k) * (half / k);
        sum += term;
        k += 1.0;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_sum_to_one() {
        for len in [1, 3, 7, 32, 64, 100] {
            let hann = WindowGenerator::hann(len).unwrap();
            assert_eq!(hann.len(), len);
            assert!((hann.coefficients().sum() - 1.0).abs() < 1e-5);

            let kaiser = WindowGenerator::kaiser(len, 25.0).unwrap();
            assert!((kaiser.coefficients().sum() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn hann_is_symmetric_with_zero_endpoints() {
        let window = WindowGenerator::hann(64).unwrap();
        let c = window.coefficients();
        assert_eq!(c[0], 0.0);
        assert!(c[63].abs() < 1e-9);
        for n in 0..32 {
            assert!((c[n] - c[63 - n]).abs() < 1e-7);
        }
    }

    #[test]
    fn kaiser_matches_reference_coefficients() {
        let window = WindowGenerator::kaiser(32, 25.0).unwrap();
        let c = window.coefficients();
        let close = |got: f32, want: f64| ((got as f64 - want) / want).abs() < 1e-5;
        assert!(close(c[0], 2.239_990_945_961_063e-11), "c[0] = {:e}", c[0]);
        assert!(close(c[8], 6.100_893_142_568_943e-3), "c[8] = {}", c[8]);
        assert!(close(c[15], 0.127_711_193_160_118_8), "c[15] = {}", c[15]);
        assert!((c[15] - c[16]).abs() <= 1e-7);
        for n in 0..16 {
            assert!((c[n] - c[31 - n]).abs() <= 1e-7);
        }
    }

    #[test]
    fn bessel_matches_reference_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-15);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_4).abs() < 1e-12);
        let reference = 5.774_560_606_466_314e9;
        assert!(((bessel_i0(25.0) - reference) / reference).abs() < 1e-9);
    }

    #[test]
    fn zero_length_is_a_configuration_error() {
        assert!(matches!(
            WindowGenerator::hann(0),
            Err(PipelineError::Configuration(_))
        ));
        assert!(WindowGenerator::kaiser(0, 25.0).is_err());
    }

    #[test]
    fn degenerate_hann_is_rejected() {
        // Both coefficients of a two-point symmetric Hann window are zero.
        assert!(matches!(
            WindowGenerator::hann(2),
            Err(PipelineError::Configuration(_))
        ));
    }
}

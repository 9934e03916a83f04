use std::f32::consts::PI;

/// Sampled cosine with `cycles` periods across `length` samples, starting at
/// `phase` radians.
pub fn cosine_tone(length: usize, cycles: f32, phase: f32) -> impl Iterator<Item = f32> {
    (0..length).map(move |i| (2.0 * PI * cycles * i as f32 / length as f32 + phase).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_starts_at_its_phase() {
        let tone: Vec<f32> = cosine_tone(8, 1.0, 0.0).collect();
        assert_eq!(tone.len(), 8);
        assert!((tone[0] - 1.0).abs() < 1e-6);
        assert!(tone[2].abs() < 1e-6);
        assert!((tone[4] + 1.0).abs() < 1e-6);
    }
}

//! Per-frame signal features and their long-term statistics.

/// Features extracted from one frame's spectrum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalModel {
    /// Average log-likelihood ratio of speech presence.
    pub lrt: f32,
    /// Geometric-to-arithmetic mean ratio of the magnitude spectrum.
    pub spectral_flatness: f32,
    /// One minus the correlation with the previous frame's spectrum.
    pub spectral_diff: f32,
}

/// Long-term mean and leaky minimum of one feature.
///
/// The mean is a 0.7 exponential average; the minimum decays toward the
/// mean with a 1000-frame memory so it can recover after quiet stretches.
#[derive(Debug, Clone, Copy)]
pub struct FeatureTracker {
    mean: f32,
    min: f32,
}

const MEAN_SMOOTHING: f32 = 0.7;
const MIN_MEMORY: f32 = 1.0 / 1000.0;

impl FeatureTracker {
    pub fn new(initial: f32) -> Self {
        Self {
            mean: initial,
            min: initial,
        }
    }

    pub fn update(&mut self, value: f32) {
        self.mean = MEAN_SMOOTHING * self.mean + (1.0 - MEAN_SMOOTHING) * value;
        self.min = value.min(self.min + MIN_MEMORY * (self.mean - self.min));
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Sigmoid steepness derived from the mean/min gap: features that
    /// barely fluctuate get a near-hard threshold.
    pub fn sharpness(&self) -> f32 {
        4.0 / (self.mean - self.min + 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_converges_to_constant_input() {
        let mut t = FeatureTracker::new(0.5);
        for _ in 0..100 {
            t.update(2.0);
        }
        assert!((t.mean() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn min_latches_low_values() {
        let mut t = FeatureTracker::new(0.5);
        t.update(0.1);
        for _ in 0..10 {
            t.update(1.0);
        }
        // The minimum creeps back up only slowly.
        assert!(t.min < 0.15);
    }

    #[test]
    fn min_recovers_with_long_memory() {
        let mut t = FeatureTracker::new(0.5);
        t.update(0.0);
        for _ in 0..5000 {
            t.update(1.0);
        }
        assert!(t.min > 0.9, "min {} should have recovered toward the mean", t.min);
    }

    #[test]
    fn sharpness_grows_as_the_gap_closes() {
        let mut steady = FeatureTracker::new(0.5);
        for _ in 0..50 {
            steady.update(0.5);
        }
        let mut jumpy = FeatureTracker::new(0.5);
        for i in 0..50 {
            jumpy.update(if i % 2 == 0 { 0.1 } else { 1.5 });
        }
        assert!(steady.sharpness() > jumpy.sharpness());
    }
}

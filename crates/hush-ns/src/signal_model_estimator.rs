//! Extraction of the three speech-presence features.
//!
//! Per frame, computes the average log-likelihood ratio from the SNR
//! estimates, the spectral flatness of the magnitude spectrum, and the
//! spectral difference against the previous frame, and keeps each
//! feature's long-term statistics current.

use crate::config::NUM_BINS;
use crate::fast_math::{exp_approximation, log_approximation};
use crate::signal_model::{FeatureTracker, SignalModel};

/// Floor applied before logarithms of magnitudes.
const MIN_MAGNITUDE: f32 = 1e-10;

/// Average log-likelihood ratio over all bins:
/// `mean_k[ ξ/(1+ξ)·γ − ln(1+ξ) ]`.
fn compute_lrt(prior_snr: &[f32; NUM_BINS], post_snr: &[f32; NUM_BINS]) -> f32 {
    let mut sum = 0.0f32;
    for (&xi, &gamma) in prior_snr.iter().zip(post_snr.iter()) {
        sum += xi / (1.0 + xi) * gamma - log_approximation(1.0 + xi);
    }
    sum / NUM_BINS as f32
}

/// Geometric-to-arithmetic mean ratio over bins 1..128.
///
/// Near one for spectrally flat (noise-like) frames, small for peaky
/// (voiced) frames.
fn compute_spectral_flatness(magnitude: &[f32; NUM_BINS]) -> f32 {
    let interior = &magnitude[1..NUM_BINS - 1];
    let mut log_sum = 0.0f32;
    let mut sum = 0.0f32;
    for &m in interior {
        let m = m.max(MIN_MAGNITUDE);
        log_sum += log_approximation(m);
        sum += m;
    }
    let count = interior.len() as f32;
    exp_approximation(log_sum / count) / (sum / count)
}

/// One minus the normalised correlation between the current and previous
/// magnitude spectra.
fn compute_spectral_diff(magnitude: &[f32; NUM_BINS], prev_magnitude: &[f32; NUM_BINS]) -> f32 {
    let scale = 1.0 / NUM_BINS as f32;
    let mean_x: f32 = magnitude.iter().sum::<f32>() * scale;
    let mean_y: f32 = prev_magnitude.iter().sum::<f32>() * scale;

    let mut covariance = 0.0f32;
    let mut var_x = 0.0f32;
    let mut var_y = 0.0f32;
    for (&x, &y) in magnitude.iter().zip(prev_magnitude.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = var_x * var_y;
    // Degenerate (flat or silent) spectra count as fully correlated.
    let correlation = if denom < 1e-12 {
        1.0
    } else {
        (covariance / denom.sqrt()).clamp(-1.0, 1.0)
    };
    1.0 - correlation
}

/// Feature extractor with long-term statistics, one per channel.
#[derive(Debug, Clone)]
pub struct SignalModelEstimator {
    features: SignalModel,
    lrt_stats: FeatureTracker,
    flatness_stats: FeatureTracker,
    diff_stats: FeatureTracker,
}

impl Default for SignalModelEstimator {
    fn default() -> Self {
        Self {
            features: SignalModel::default(),
            lrt_stats: FeatureTracker::new(0.5),
            flatness_stats: FeatureTracker::new(0.5),
            diff_stats: FeatureTracker::new(0.5),
        }
    }
}

impl SignalModelEstimator {
    /// Extract the frame's features and refresh their statistics.
    pub fn update(
        &mut self,
        prior_snr: &[f32; NUM_BINS],
        post_snr: &[f32; NUM_BINS],
        magnitude: &[f32; NUM_BINS],
        prev_magnitude: &[f32; NUM_BINS],
    ) {
        self.features.lrt = compute_lrt(prior_snr, post_snr);
        self.features.spectral_flatness = compute_spectral_flatness(magnitude);
        self.features.spectral_diff = compute_spectral_diff(magnitude, prev_magnitude);

        self.lrt_stats.update(self.features.lrt);
        self.flatness_stats.update(self.features.spectral_flatness);
        self.diff_stats.update(self.features.spectral_diff);
    }

    pub fn features(&self) -> &SignalModel {
        &self.features
    }

    pub fn lrt_stats(&self) -> &FeatureTracker {
        &self.lrt_stats
    }

    pub fn flatness_stats(&self) -> &FeatureTracker {
        &self.flatness_stats
    }

    pub fn diff_stats(&self) -> &FeatureTracker {
        &self.diff_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lrt_grows_with_snr() {
        let low_xi = [0.01f32; NUM_BINS];
        let low_gamma = [1.0f32; NUM_BINS];
        let high_xi = [10.0f32; NUM_BINS];
        let high_gamma = [10.0f32; NUM_BINS];
        assert!(compute_lrt(&high_xi, &high_gamma) > compute_lrt(&low_xi, &low_gamma));
    }

    #[test]
    fn lrt_of_silence_is_near_zero() {
        let xi = [0.0f32; NUM_BINS];
        let gamma = [0.0f32; NUM_BINS];
        assert!(compute_lrt(&xi, &gamma).abs() < 0.05);
    }

    #[test]
    fn flat_spectrum_has_flatness_near_one() {
        let magnitude = [7.0f32; NUM_BINS];
        let flatness = compute_spectral_flatness(&magnitude);
        assert!((flatness - 1.0).abs() < 0.05, "flatness {flatness}");
    }

    #[test]
    fn peaky_spectrum_has_low_flatness() {
        let mut magnitude = [0.01f32; NUM_BINS];
        magnitude[16] = 1000.0;
        let flatness = compute_spectral_flatness(&magnitude);
        assert!(flatness < 0.2, "flatness {flatness}");
    }

    #[test]
    fn silence_counts_as_flat() {
        let magnitude = [0.0f32; NUM_BINS];
        let flatness = compute_spectral_flatness(&magnitude);
        assert!((flatness - 1.0).abs() < 0.05, "flatness {flatness}");
    }

    #[test]
    fn identical_spectra_have_zero_diff() {
        let mut magnitude = [0.0f32; NUM_BINS];
        for (i, m) in magnitude.iter_mut().enumerate() {
            *m = (i as f32 * 0.1).sin().abs() * 10.0;
        }
        let diff = compute_spectral_diff(&magnitude, &magnitude);
        assert!(diff < 1e-3, "diff {diff}");
    }

    #[test]
    fn uncorrelated_spectra_have_high_diff() {
        let mut a = [0.0f32; NUM_BINS];
        let mut b = [0.0f32; NUM_BINS];
        for i in 0..NUM_BINS {
            a[i] = if i % 2 == 0 { 10.0 } else { 0.0 };
            b[i] = if i % 2 == 0 { 0.0 } else { 10.0 };
        }
        let diff = compute_spectral_diff(&a, &b);
        assert!(diff > 1.5, "anticorrelated spectra should give diff near 2, got {diff}");
    }

    #[test]
    fn update_refreshes_all_features() {
        let mut est = SignalModelEstimator::default();
        let xi = [1.0f32; NUM_BINS];
        let gamma = [2.0f32; NUM_BINS];
        let magnitude = [3.0f32; NUM_BINS];
        let prev = [3.0f32; NUM_BINS];
        est.update(&xi, &gamma, &magnitude, &prev);

        let f = est.features();
        assert!(f.lrt != 0.0);
        assert!((f.spectral_flatness - 1.0).abs() < 0.05);
        assert!(f.spectral_diff < 1e-3);
    }
}

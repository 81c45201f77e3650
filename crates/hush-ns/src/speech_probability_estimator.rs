//! Frame-level speech posterior from the three signal features.
//!
//! Each feature is mapped through a `tanh` sigmoid centred on a threshold
//! derived from its long-term mean and sharpened by its mean/min gap.
//! The pseudo posteriors combine as a weighted geometric mean with the
//! likelihood-ratio feature carrying half the weight, and the result is
//! smoothed across frames.

use crate::config::NUM_BINS;
use crate::signal_model::FeatureTracker;
use crate::signal_model_estimator::SignalModelEstimator;

/// Smoothing of the posterior across frames.
const POSTERIOR_SMOOTHING: f32 = 0.2;

/// Feature weights in the combined posterior.
const LRT_WEIGHT: f32 = 0.5;
const SPECTRAL_WEIGHT: f32 = 0.25;

#[inline]
fn sigmoid(x: f32) -> f32 {
    0.5 * (x.tanh() + 1.0)
}

fn lrt_indicator(lrt: f32, stats: &FeatureTracker) -> f32 {
    let centre = (1.2 * stats.mean()).clamp(0.2, 1.0);
    sigmoid(stats.sharpness() * (lrt - centre))
}

fn flatness_indicator(flatness: f32, stats: &FeatureTracker) -> f32 {
    // Flat spectra are noise-like, so low flatness argues for speech.
    let centre = (0.9 * stats.mean()).clamp(0.1, 0.95);
    sigmoid(stats.sharpness() * (centre - flatness))
}

fn diff_indicator(diff: f32, stats: &FeatureTracker) -> f32 {
    let centre = (1.2 * stats.mean()).clamp(0.16, 1.0);
    sigmoid(stats.sharpness() * (diff - centre))
}

/// Per-channel speech posterior estimator.
#[derive(Debug, Clone)]
pub struct SpeechProbabilityEstimator {
    model_estimator: SignalModelEstimator,
    posterior: f32,
}

impl Default for SpeechProbabilityEstimator {
    fn default() -> Self {
        Self {
            model_estimator: SignalModelEstimator::default(),
            posterior: 0.5,
        }
    }
}

impl SpeechProbabilityEstimator {
    /// Update the posterior from the frame's SNR estimates and spectra.
    pub fn update(
        &mut self,
        prior_snr: &[f32; NUM_BINS],
        post_snr: &[f32; NUM_BINS],
        magnitude: &[f32; NUM_BINS],
        prev_magnitude: &[f32; NUM_BINS],
    ) {
        self.model_estimator
            .update(prior_snr, post_snr, magnitude, prev_magnitude);

        let features = self.model_estimator.features();
        let p_lrt = lrt_indicator(features.lrt, self.model_estimator.lrt_stats());
        let p_flatness = flatness_indicator(
            features.spectral_flatness,
            self.model_estimator.flatness_stats(),
        );
        let p_diff = diff_indicator(features.spectral_diff, self.model_estimator.diff_stats());

        let combined = (p_lrt.powf(LRT_WEIGHT)
            * p_flatness.powf(SPECTRAL_WEIGHT)
            * p_diff.powf(SPECTRAL_WEIGHT))
        .clamp(0.0, 1.0);

        self.posterior =
            POSTERIOR_SMOOTHING * self.posterior + (1.0 - POSTERIOR_SMOOTHING) * combined;
    }

    /// Smoothed P(speech) for the current frame.
    pub fn probability(&self) -> f32 {
        self.posterior
    }
}

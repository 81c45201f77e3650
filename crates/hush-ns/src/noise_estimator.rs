//! Two-phase noise power tracking.
//!
//! During the initialisation phase the estimate comes straight from the
//! staggered quantile trackers, which tolerate early speech. Afterwards a
//! recursive update takes over, slowed down in proportion to the speech
//! probability so that speech energy is not absorbed into the floor.

use crate::config::{MIN_NOISE_POWER, NUM_BINS};
use crate::quantile_noise_estimator::QuantileNoiseEstimator;

/// Recursive smoothing factor of the steady-state update.
const NOISE_SMOOTHING: f32 = 0.85;

/// Per-channel noise power estimator.
#[derive(Debug, Clone)]
pub struct NoiseEstimator {
    prev_noise_spectrum: [f32; NUM_BINS],
    noise_spectrum: [f32; NUM_BINS],
    quantile_noise_estimator: QuantileNoiseEstimator,
}

impl Default for NoiseEstimator {
    fn default() -> Self {
        Self {
            prev_noise_spectrum: [0.0; NUM_BINS],
            noise_spectrum: [0.0; NUM_BINS],
            quantile_noise_estimator: QuantileNoiseEstimator::default(),
        }
    }
}

impl NoiseEstimator {
    /// Snapshot the current spectrum before a new frame is analysed.
    pub fn prepare_analysis(&mut self) {
        self.prev_noise_spectrum = self.noise_spectrum;
    }

    /// Update the estimate from the frame's power spectrum.
    ///
    /// `speech_probability` is the previous frame's smoothed posterior;
    /// it gates the steady-state update:
    /// `noise ← p·noise + (1−p)·(β·noise + (1−β)·|X|²)`.
    pub fn update(
        &mut self,
        power_spectrum: &[f32; NUM_BINS],
        speech_probability: f32,
        initialising: bool,
    ) {
        if initialising {
            self.quantile_noise_estimator
                .estimate(power_spectrum, &mut self.noise_spectrum);
        } else {
            let p = speech_probability.clamp(0.0, 1.0);
            for (noise, &power) in self.noise_spectrum.iter_mut().zip(power_spectrum.iter()) {
                let tracked = NOISE_SMOOTHING * *noise + (1.0 - NOISE_SMOOTHING) * power;
                *noise = p * *noise + (1.0 - p) * tracked;
            }
        }

        for noise in self.noise_spectrum.iter_mut() {
            *noise = noise.max(MIN_NOISE_POWER);
        }
    }

    /// Current noise power estimate.
    pub fn noise_spectrum(&self) -> &[f32; NUM_BINS] {
        &self.noise_spectrum
    }

    /// Noise power estimate of the previous frame.
    pub fn prev_noise_spectrum(&self) -> &[f32; NUM_BINS] {
        &self.prev_noise_spectrum
    }
}

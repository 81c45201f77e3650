//! Per-bin suppression gain.
//!
//! The Wiener gain `ξ/(1+ξ)` is blended toward one by the frame's speech
//! posterior and floored at the level-dependent minimum:
//! `G[k] = max(floor, p + (1−p)·ξ[k]/(1+ξ[k]))`.
//! No smoothing is applied across bins; temporal smoothing comes from the
//! decision-directed ξ and the smoothed posterior.

use crate::config::NUM_BINS;
use crate::suppression_params::SuppressionParams;

/// Gain computation state; the filter persists across frames so the
/// decision-directed SNR update can refer to the previously applied gain.
#[derive(Debug)]
pub struct WienerFilter {
    suppression_params: &'static SuppressionParams,
    filter: [f32; NUM_BINS],
}

impl WienerFilter {
    pub fn new(suppression_params: &'static SuppressionParams) -> Self {
        Self {
            suppression_params,
            filter: [1.0; NUM_BINS],
        }
    }

    /// Recompute the gain from the prior SNR and speech posterior.
    pub fn update(&mut self, prior_snr: &[f32; NUM_BINS], speech_probability: f32) {
        let floor = self.suppression_params.gain_floor;
        let p = speech_probability.clamp(0.0, 1.0);
        for (gain, &xi) in self.filter.iter_mut().zip(prior_snr.iter()) {
            let wiener = xi / (1.0 + xi);
            *gain = (p + (1.0 - p) * wiener).max(floor);
        }
    }

    /// Per-bin gains, in `[floor, 1]`.
    pub fn filter(&self) -> &[f32; NUM_BINS] {
        &self.filter
    }
}

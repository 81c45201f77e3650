//! Quantile tracking of the noise power spectrum.
//!
//! Three simultaneous trackers estimate the 0.25 quantile of the log
//! power spectrum over staggered 200-frame windows. Stepping the log
//! quantile up by 0.25 and down by 0.75 of an adaptive delta makes each
//! tracker converge on the 25th percentile, which is robust to speech
//! onsets during the initialisation phase. When a tracker's window
//! expires, its estimate becomes the published noise spectrum.

use crate::config::{INITIAL_PHASE_FRAMES, MIN_NOISE_POWER, NUM_BINS};
use crate::fast_math::{exp_approximation_batch, log_approximation_batch};

/// Number of staggered quantile trackers.
const NUM_TRACKERS: usize = 3;

/// Asymmetric quantile steps for the 0.25 quantile.
const STEP_UP: f32 = 0.25;
const STEP_DOWN: f32 = 0.75;

#[derive(Debug, Clone)]
struct Tracker {
    /// Density estimate of the log-power distribution around the quantile.
    density: [f32; NUM_BINS],
    /// Current log-domain quantile estimate.
    log_quantile: [f32; NUM_BINS],
    /// Frames observed in the current window.
    counter: usize,
}

impl Tracker {
    fn new(counter: usize) -> Self {
        Self {
            density: [0.3; NUM_BINS],
            log_quantile: [16.0; NUM_BINS],
            counter,
        }
    }

    fn update(&mut self, log_spectrum: &[f32; NUM_BINS]) {
        const WIDTH: f32 = 0.01;
        const ONE_BY_TWICE_WIDTH: f32 = 1.0 / (2.0 * WIDTH);

        let one_by_counter_plus_1 = 1.0 / (self.counter as f32 + 1.0);
        for (i, &log_power) in log_spectrum.iter().enumerate() {
            let delta = if self.density[i] > 1.0 {
                40.0 / self.density[i]
            } else {
                40.0
            };
            let step = delta * one_by_counter_plus_1;
            if log_power > self.log_quantile[i] {
                self.log_quantile[i] += STEP_UP * step;
            } else {
                self.log_quantile[i] -= STEP_DOWN * step;
            }

            if (log_power - self.log_quantile[i]).abs() < WIDTH {
                self.density[i] = (self.counter as f32 * self.density[i] + ONE_BY_TWICE_WIDTH)
                    * one_by_counter_plus_1;
            }
        }
    }
}

/// Staggered quantile estimator for the noise power spectrum.
#[derive(Debug, Clone)]
pub struct QuantileNoiseEstimator {
    trackers: [Tracker; NUM_TRACKERS],
    /// Published estimate, linear power domain.
    quantile: [f32; NUM_BINS],
    num_updates: usize,
}

impl Default for QuantileNoiseEstimator {
    fn default() -> Self {
        // Stagger the windows so a fresh estimate is promoted every
        // third of the window length.
        let trackers = std::array::from_fn(|i| {
            Tracker::new(INITIAL_PHASE_FRAMES * (i + 1) / NUM_TRACKERS)
        });
        Self {
            trackers,
            quantile: [0.0; NUM_BINS],
            num_updates: 1,
        }
    }
}

impl QuantileNoiseEstimator {
    /// Update the trackers with a power spectrum and write the current
    /// noise estimate into `noise_spectrum`.
    pub fn estimate(
        &mut self,
        power_spectrum: &[f32; NUM_BINS],
        noise_spectrum: &mut [f32; NUM_BINS],
    ) {
        let mut floored = [0.0f32; NUM_BINS];
        for (f, &p) in floored.iter_mut().zip(power_spectrum.iter()) {
            *f = p.max(MIN_NOISE_POWER);
        }
        let mut log_spectrum = [0.0f32; NUM_BINS];
        log_approximation_batch(&floored, &mut log_spectrum);

        let mut promoted: Option<usize> = None;
        for (s, tracker) in self.trackers.iter_mut().enumerate() {
            tracker.update(&log_spectrum);

            if tracker.counter >= INITIAL_PHASE_FRAMES {
                tracker.counter = 0;
                if self.num_updates >= INITIAL_PHASE_FRAMES {
                    promoted = Some(s);
                }
            }
            tracker.counter += 1;
        }

        if self.num_updates < INITIAL_PHASE_FRAMES {
            // During startup, publish the longest-lived tracker every
            // frame so the estimate is usable immediately.
            promoted = Some(NUM_TRACKERS - 1);
            self.num_updates += 1;
        }

        if let Some(s) = promoted {
            exp_approximation_batch(&self.trackers[s].log_quantile, &mut self.quantile);
        }

        noise_spectrum.copy_from_slice(&self.quantile);
    }
}

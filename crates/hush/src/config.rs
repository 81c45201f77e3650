//! Public suppressor configuration.

use crate::error::Error;

pub use hush_ns::config::SuppressionLevel;

/// Sample rates the suppressor accepts.
pub const SUPPORTED_SAMPLE_RATES: [usize; 5] = [8_000, 16_000, 24_000, 32_000, 48_000];

/// Maximum number of channels per suppressor instance.
pub const MAX_CHANNELS: usize = 8;

/// Immutable configuration of a [`NoiseSuppressor`](crate::NoiseSuppressor).
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Target suppression level; determines the per-bin gain floor.
    pub suppression_level: SuppressionLevel,
    /// Input/output sample rate in Hz.
    pub sample_rate_hz: usize,
    /// Number of channels, 1 to [`MAX_CHANNELS`].
    pub num_channels: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suppression_level: SuppressionLevel::default(),
            sample_rate_hz: 16_000,
            num_channels: 1,
        }
    }
}

impl Config {
    /// Check the configuration against the supported parameter space.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate_hz) {
            return Err(Error::UnsupportedSampleRate);
        }
        if self.num_channels == 0 || self.num_channels > MAX_CHANNELS {
            return Err(Error::InvalidChannelCount);
        }
        Ok(())
    }

    /// Samples per 10 ms frame and channel at the configured rate.
    pub fn samples_per_frame(&self) -> usize {
        self.sample_rate_hz / 100
    }
}

/// Number of frequency bands a signal at `sample_rate_hz` is split into.
///
/// Rates up to 16 kHz are processed full-band; 32 kHz splits into two
/// bands and 48 kHz into three. 24 kHz stays single-band at the surface
/// and is bridged to 48 kHz internally.
pub(crate) fn num_bands_for_rate(sample_rate_hz: usize) -> usize {
    match sample_rate_hz {
        32_000 => 2,
        48_000 => 3,
        _ => 1,
    }
}

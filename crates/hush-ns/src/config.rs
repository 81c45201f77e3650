//! Suppressor configuration and shared constants.

/// FFT length of the analysis/synthesis front-end.
pub const FFT_SIZE: usize = 256;

/// Number of unique frequency bins (`FFT_SIZE / 2 + 1`).
pub const NUM_BINS: usize = FFT_SIZE / 2 + 1;

/// Samples per 10 ms band frame (160 = 10 ms at 16 kHz).
pub const FRAME_SIZE: usize = 160;

/// Overlap between consecutive extended frames.
pub const OVERLAP_SIZE: usize = FFT_SIZE - FRAME_SIZE;

/// Length of the quantile-based noise initialisation phase, in frames.
pub const INITIAL_PHASE_FRAMES: usize = 200;

/// Lower clamp for the estimated noise power per bin.
pub const MIN_NOISE_POWER: f32 = 1e-10;

/// Target suppression aggressiveness.
///
/// Each level maps to a per-bin gain floor; see
/// [`SuppressionParams`](crate::suppression_params::SuppressionParams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionLevel {
    /// 6 dB suppression.
    Low6dB,
    /// 12 dB suppression (default).
    #[default]
    Moderate12dB,
    /// 18 dB suppression.
    High18dB,
    /// 21 dB suppression.
    VeryHigh21dB,
}

/// Configuration for the noise suppression core.
#[derive(Debug, Clone, Copy, Default)]
pub struct NsConfig {
    /// Target suppression level.
    pub suppression_level: SuppressionLevel,
}

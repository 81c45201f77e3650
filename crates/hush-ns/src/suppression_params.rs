//! Level-dependent suppression parameters.

use crate::config::SuppressionLevel;

/// Gain limits derived from the configured suppression level.
#[derive(Debug, Clone, Copy)]
pub struct SuppressionParams {
    /// Minimum gain applied to attenuated bins in the suppressed band.
    pub gain_floor: f32,
    /// Fixed gain applied to bands above the suppressed band.
    pub upper_bands_gain: f32,
}

const fn for_floor(gain_floor: f32) -> SuppressionParams {
    SuppressionParams {
        gain_floor,
        upper_bands_gain: gain_floor,
    }
}

// 10^(-dB / 20) for 6, 12, 18 and 21 dB.
const LOW_6DB: SuppressionParams = for_floor(0.5012);
const MODERATE_12DB: SuppressionParams = for_floor(0.2512);
const HIGH_18DB: SuppressionParams = for_floor(0.1259);
const VERY_HIGH_21DB: SuppressionParams = for_floor(0.0891);

impl SuppressionParams {
    /// Parameters for the given suppression level.
    pub const fn for_level(level: SuppressionLevel) -> &'static Self {
        match level {
            SuppressionLevel::Low6dB => &LOW_6DB,
            SuppressionLevel::Moderate12dB => &MODERATE_12DB,
            SuppressionLevel::High18dB => &HIGH_18DB,
            SuppressionLevel::VeryHigh21dB => &VERY_HIGH_21DB,
        }
    }
}

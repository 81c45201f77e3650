//! Errors reported at the suppressor boundary.

/// Errors returned by suppressor construction and the per-frame calls.
///
/// All are reported before any state is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Construction with a sample rate outside the supported set
    /// (8, 16, 24, 32, 48 kHz).
    UnsupportedSampleRate,
    /// Construction with zero channels or more than eight.
    InvalidChannelCount,
    /// A frame whose per-channel sample count is not `rate / 100`.
    FrameSizeMismatch,
    /// A split frame whose band count does not match the configured rate.
    BandCountMismatch,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedSampleRate => write!(f, "unsupported sample rate"),
            Self::InvalidChannelCount => write!(f, "invalid channel count"),
            Self::FrameSizeMismatch => write!(f, "frame size does not match the configured rate"),
            Self::BandCountMismatch => write!(f, "band count does not match the configured rate"),
        }
    }
}

impl std::error::Error for Error {}

//! Spectral noise suppression for linear-PCM speech.
//!
//! `hush` suppresses stationary background noise in 10 ms frames of
//! `f32` samples (raw 16-bit range). A quantile-initialised noise
//! tracker and a feature-based speech posterior drive a floored
//! Wiener-style gain in the 0–8 kHz band; higher bands of 32/48 kHz
//! streams are band-split and attenuated at the configured floor, and
//! 8/24 kHz streams are bridged onto the nearest processing rate.
//!
//! ```
//! use hush::{AudioFrame, Config, NoiseSuppressor, SuppressionLevel};
//!
//! let config = Config {
//!     suppression_level: SuppressionLevel::High18dB,
//!     sample_rate_hz: 48_000,
//!     num_channels: 1,
//! };
//! let mut ns = NoiseSuppressor::new(config).unwrap();
//! let mut frame = AudioFrame::new(config.sample_rate_hz, config.num_channels).unwrap();
//!
//! // Per 10 ms chunk: load, process, store.
//! let chunk = vec![0.0f32; config.samples_per_frame()];
//! frame.copy_from_interleaved(&chunk).unwrap();
//! ns.process(&mut frame).unwrap();
//! ```

pub mod audio_frame;
pub mod config;
pub mod error;
pub(crate) mod qmf;
pub(crate) mod splitting_filter;
pub mod suppressor;
pub(crate) mod three_band_filter_bank;

pub use audio_frame::AudioFrame;
pub use config::{Config, MAX_CHANNELS, SUPPORTED_SAMPLE_RATES, SuppressionLevel};
pub use error::Error;
pub use suppressor::NoiseSuppressor;

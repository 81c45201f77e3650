//! Spectral noise suppression core.
//!
//! Wiener-style suppression of 10 ms band frames: a windowed 256-point
//! FFT front-end, a quantile-initialised noise power tracker, a
//! feature-based speech posterior, and a floored per-bin gain. Sample
//! rate handling, band splitting, and the public configuration surface
//! live in the `hush` façade crate.

pub mod config;
pub(crate) mod fast_math;
pub(crate) mod fft;
pub(crate) mod filterbank;
pub(crate) mod noise_estimator;
pub mod noise_suppressor;
pub(crate) mod quantile_noise_estimator;
pub(crate) mod signal_model;
pub(crate) mod signal_model_estimator;
pub(crate) mod speech_probability_estimator;
pub(crate) mod suppression_params;
pub(crate) mod wiener_filter;

pub use config::{NsConfig, SuppressionLevel};
pub use noise_suppressor::NoiseSuppressor;

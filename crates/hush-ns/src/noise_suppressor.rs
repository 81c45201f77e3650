//! Frame-level suppression pipeline.
//!
//! Per channel and per 10 ms band-0 frame: windowed analysis, noise and
//! speech-probability updates, gain computation, spectral weighting, and
//! windowed overlap-add synthesis. With more than one channel the prior
//! SNR and posterior are averaged across channels before the gain
//! decision, so every channel receives the same gain while keeping its
//! own phase. Bands above the first receive a fixed attenuation at the
//! configured gain floor.

use hush_common_audio::ChannelBuffer;
use realfft::num_complex::Complex;

use crate::config::{
    FFT_SIZE, FRAME_SIZE, INITIAL_PHASE_FRAMES, MIN_NOISE_POWER, NUM_BINS, NsConfig, OVERLAP_SIZE,
};
use crate::fft::NsFft;
use crate::filterbank::{apply_window, compute_spectra, form_extended_frame, overlap_and_add};
use crate::noise_estimator::NoiseEstimator;
use crate::speech_probability_estimator::SpeechProbabilityEstimator;
use crate::suppression_params::SuppressionParams;
use crate::wiener_filter::WienerFilter;

/// Decision-directed smoothing of the prior SNR.
const PRIOR_SNR_SMOOTHING: f32 = 0.98;

/// Lifecycle of a channel's estimators. Transitions are one-way; there
/// is no runtime reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelPhase {
    Uninitialised,
    Initialising { analyzed_frames: usize },
    SteadyState,
}

impl ChannelPhase {
    /// Count one analysed frame. Returns true while the quantile-based
    /// noise initialisation is still running.
    fn advance(&mut self) -> bool {
        match self {
            Self::Uninitialised => {
                *self = Self::Initialising { analyzed_frames: 1 };
                true
            }
            Self::Initialising { analyzed_frames } => {
                *analyzed_frames += 1;
                if *analyzed_frames >= INITIAL_PHASE_FRAMES {
                    *self = Self::SteadyState;
                }
                true
            }
            Self::SteadyState => false,
        }
    }
}

/// All state owned by one channel slot.
#[derive(Debug)]
struct ChannelState {
    phase: ChannelPhase,
    noise_estimator: NoiseEstimator,
    speech_probability_estimator: SpeechProbabilityEstimator,
    /// Decision-directed a-priori SNR ξ per bin.
    prior_snr: [f32; NUM_BINS],
    /// Magnitude spectrum of the previous frame.
    prev_magnitude: [f32; NUM_BINS],
    analyze_history: [f32; OVERLAP_SIZE],
    process_history: [f32; OVERLAP_SIZE],
    synthesis_memory: [f32; OVERLAP_SIZE],
}

impl ChannelState {
    fn new() -> Self {
        Self {
            phase: ChannelPhase::Uninitialised,
            noise_estimator: NoiseEstimator::default(),
            speech_probability_estimator: SpeechProbabilityEstimator::default(),
            prior_snr: [0.0; NUM_BINS],
            prev_magnitude: [0.0; NUM_BINS],
            analyze_history: [0.0; OVERLAP_SIZE],
            process_history: [0.0; OVERLAP_SIZE],
            synthesis_memory: [0.0; OVERLAP_SIZE],
        }
    }
}

fn has_nan(samples: &[f32]) -> bool {
    samples.iter().any(|s| s.is_nan())
}

/// Run the per-channel estimator chain on one analysed frame.
///
/// `gain` is the filter applied to the previous frame; it feeds the
/// decision-directed prior SNR update
/// `ξ ← 0.98·G²·γ_prev + 0.02·max(γ−1, 0)`.
fn update_estimators(
    ch: &mut ChannelState,
    gain: &[f32; NUM_BINS],
    power: &[f32; NUM_BINS],
    magnitude: &[f32; NUM_BINS],
) {
    ch.noise_estimator.prepare_analysis();
    let initialising = ch.phase.advance();
    let speech_probability = ch.speech_probability_estimator.probability();
    ch.noise_estimator
        .update(power, speech_probability, initialising);

    let noise = ch.noise_estimator.noise_spectrum();
    let prev_noise = ch.noise_estimator.prev_noise_spectrum();
    let mut post_snr = [0.0f32; NUM_BINS];
    for i in 0..NUM_BINS {
        let gamma_prev =
            ch.prev_magnitude[i] * ch.prev_magnitude[i] / (prev_noise[i] + MIN_NOISE_POWER);
        let gamma = power[i] / (noise[i] + MIN_NOISE_POWER);
        post_snr[i] = gamma;
        ch.prior_snr[i] = PRIOR_SNR_SMOOTHING * gain[i] * gain[i] * gamma_prev
            + (1.0 - PRIOR_SNR_SMOOTHING) * (gamma - 1.0).max(0.0);
    }

    ch.speech_probability_estimator
        .update(&ch.prior_snr, &post_snr, magnitude, &ch.prev_magnitude);
    ch.prev_magnitude = *magnitude;
}

/// Multichannel spectral noise suppressor over 160-sample band frames.
///
/// The caller hands in a [`ChannelBuffer`] whose first band holds the
/// 0–8 kHz signal; band splitting and sample-rate handling live in the
/// façade crate.
#[derive(Debug)]
pub struct NoiseSuppressor {
    suppression_params: &'static SuppressionParams,
    fft: NsFft,
    wiener_filter: WienerFilter,
    channels: Vec<ChannelState>,
    /// Per-channel spectra, kept between the analysis and synthesis
    /// passes of one `process` call.
    spectra: Vec<[Complex<f32>; NUM_BINS]>,
    skip_channel: Vec<bool>,
}

impl NoiseSuppressor {
    /// Create a suppressor for `num_channels` channels.
    ///
    /// All buffers are allocated here; the per-frame path does not
    /// allocate.
    pub fn new(config: NsConfig, num_channels: usize) -> Self {
        assert!(num_channels > 0, "num_channels must be > 0");
        let suppression_params = SuppressionParams::for_level(config.suppression_level);
        Self {
            suppression_params,
            fft: NsFft::new(),
            wiener_filter: WienerFilter::new(suppression_params),
            channels: (0..num_channels).map(|_| ChannelState::new()).collect(),
            spectra: vec![[Complex::default(); NUM_BINS]; num_channels],
            skip_channel: vec![false; num_channels],
        }
    }

    /// Update the estimators from a frame without modifying it.
    ///
    /// Lets a caller warm the noise and speech models before enabling
    /// suppression.
    pub fn analyze(&mut self, audio: &ChannelBuffer<f32>) {
        debug_assert_eq!(audio.samples_per_band(), FRAME_SIZE);
        debug_assert_eq!(audio.num_channels(), self.channels.len());

        let Self {
            fft,
            wiener_filter,
            channels,
            ..
        } = self;

        for (ch_index, ch) in channels.iter_mut().enumerate() {
            let frame = audio.band_channel(0, ch_index);
            if has_nan(frame) {
                tracing::warn!(channel = ch_index, "skipping analysis of frame with NaN input");
                continue;
            }

            let mut extended = [0.0f32; FFT_SIZE];
            form_extended_frame(frame, &mut ch.analyze_history, &mut extended);
            apply_window(&mut extended);

            let mut spectrum = [Complex::default(); NUM_BINS];
            fft.fft(&mut extended, &mut spectrum);
            let mut power = [0.0f32; NUM_BINS];
            let mut magnitude = [0.0f32; NUM_BINS];
            compute_spectra(&spectrum, &mut power, &mut magnitude);

            update_estimators(ch, wiener_filter.filter(), &power, &magnitude);
        }
    }

    /// Apply suppression to a frame in place.
    pub fn process(&mut self, audio: &mut ChannelBuffer<f32>) {
        debug_assert_eq!(audio.samples_per_band(), FRAME_SIZE);
        debug_assert_eq!(audio.num_channels(), self.channels.len());

        let Self {
            suppression_params,
            fft,
            wiener_filter,
            channels,
            spectra,
            skip_channel,
        } = self;
        let num_channels = channels.len();

        // First pass: analysis and estimator updates per channel.
        let mut avg_prior_snr = [0.0f32; NUM_BINS];
        let mut avg_probability = 0.0f32;
        let mut active_channels = 0usize;
        for ch_index in 0..num_channels {
            skip_channel[ch_index] = has_nan(audio.bands(ch_index));
            if skip_channel[ch_index] {
                tracing::warn!(channel = ch_index, "passing through frame with NaN input");
                continue;
            }
            let ch = &mut channels[ch_index];

            let mut extended = [0.0f32; FFT_SIZE];
            form_extended_frame(
                audio.band_channel(0, ch_index),
                &mut ch.process_history,
                &mut extended,
            );
            apply_window(&mut extended);
            fft.fft(&mut extended, &mut spectra[ch_index]);

            let mut power = [0.0f32; NUM_BINS];
            let mut magnitude = [0.0f32; NUM_BINS];
            compute_spectra(&spectra[ch_index], &mut power, &mut magnitude);

            update_estimators(ch, wiener_filter.filter(), &power, &magnitude);

            for (avg, &xi) in avg_prior_snr.iter_mut().zip(ch.prior_snr.iter()) {
                *avg += xi;
            }
            avg_probability += ch.speech_probability_estimator.probability();
            active_channels += 1;
        }

        if active_channels == 0 {
            return;
        }
        let scale = 1.0 / active_channels as f32;
        for xi in avg_prior_snr.iter_mut() {
            *xi *= scale;
        }
        avg_probability *= scale;

        // One gain decision from the cross-channel averages.
        wiener_filter.update(&avg_prior_snr, avg_probability);
        let gain = wiener_filter.filter();

        // Second pass: weight each channel's spectrum and synthesise.
        for ch_index in 0..num_channels {
            if skip_channel[ch_index] {
                continue;
            }
            let ch = &mut channels[ch_index];
            for (bin, &g) in spectra[ch_index].iter_mut().zip(gain.iter()) {
                *bin *= g;
            }

            let mut extended = [0.0f32; FFT_SIZE];
            fft.ifft(&spectra[ch_index], &mut extended);
            apply_window(&mut extended);

            let output = audio.band_channel_mut(0, ch_index);
            overlap_and_add(&extended, &mut ch.synthesis_memory, output);
            for v in output.iter_mut() {
                *v = v.clamp(-32768.0, 32767.0);
            }
        }

        // Bands above 8 kHz pass with a fixed attenuation at the floor.
        for band in 1..audio.num_bands() {
            for ch_index in 0..num_channels {
                if skip_channel[ch_index] {
                    continue;
                }
                for v in audio.band_channel_mut(band, ch_index).iter_mut() {
                    *v *= suppression_params.upper_bands_gain;
                }
            }
        }
    }
}

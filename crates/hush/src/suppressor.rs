//! Public noise-suppressor façade.
//!
//! Validates frames against the configured format, routes them onto the
//! 160-samples-per-band core, and handles the per-rate topology: direct
//! processing at 16 kHz, band splitting at 32/48 kHz, and QMF bridging
//! for 8 and 24 kHz streams.

use hush_common_audio::ChannelBuffer;
use hush_ns::config::NsConfig;

use crate::audio_frame::AudioFrame;
use crate::config::{self, Config};
use crate::error::Error;
use crate::qmf::{self, MAX_BAND_SAMPLES, QmfState};
use crate::splitting_filter::SplittingFilter;

/// Band splitter plus the buffer it writes, for paths that split
/// outside the [`AudioFrame`].
#[derive(Debug)]
struct SplitScratch {
    filter: SplittingFilter,
    bands: ChannelBuffer<f32>,
}

impl SplitScratch {
    fn new(samples_per_channel: usize, num_channels: usize, num_bands: usize) -> Self {
        Self {
            filter: SplittingFilter::new(num_channels, num_bands),
            bands: ChannelBuffer::new(samples_per_channel, num_channels, num_bands),
        }
    }
}

/// QMF bridge carrying an 8 or 24 kHz stream onto the 16 or 48 kHz
/// processing path: the input frame is treated as the low band of the
/// doubled rate (high band zero), processed there, and decimated back.
#[derive(Debug)]
struct RateBridge {
    up: Vec<QmfState>,
    down: Vec<QmfState>,
    full: ChannelBuffer<f32>,
    split: Option<SplitScratch>,
}

impl RateBridge {
    fn new(sample_rate_hz: usize, num_channels: usize) -> Self {
        let bridged_samples = 2 * (sample_rate_hz / 100);
        let bridged_bands = config::num_bands_for_rate(2 * sample_rate_hz);
        Self {
            up: (0..num_channels).map(|_| QmfState::new()).collect(),
            down: (0..num_channels).map(|_| QmfState::new()).collect(),
            full: ChannelBuffer::new_single_band(bridged_samples, num_channels),
            split: (bridged_bands > 1)
                .then(|| SplitScratch::new(bridged_samples, num_channels, bridged_bands)),
        }
    }

    /// Interpolate the frame up into the bridge and split if needed.
    fn raise(&mut self, frame: &AudioFrame) {
        let zeros = [0.0f32; MAX_BAND_SAMPLES];
        let band_len = frame.samples_per_channel();
        for (ch, state) in self.up.iter_mut().enumerate() {
            qmf::synthesis(
                frame.channel(ch),
                &zeros[..band_len],
                self.full.bands_mut(ch),
                state,
            );
        }
        if let Some(scratch) = &mut self.split {
            scratch.filter.analysis(&self.full, &mut scratch.bands);
        }
    }

    /// The buffer the core operates on.
    fn processing_buffer(&self) -> &ChannelBuffer<f32> {
        match &self.split {
            Some(scratch) => &scratch.bands,
            None => &self.full,
        }
    }

    fn processing_buffer_mut(&mut self) -> &mut ChannelBuffer<f32> {
        match &mut self.split {
            Some(scratch) => &mut scratch.bands,
            None => &mut self.full,
        }
    }

    /// Merge (if split) and decimate the processed signal back into the
    /// frame.
    fn lower(&mut self, frame: &mut AudioFrame) {
        if let Some(scratch) = &mut self.split {
            scratch.filter.synthesis(&scratch.bands, &mut self.full);
        }
        let band_len = frame.samples_per_channel();
        let mut discard = [0.0f32; MAX_BAND_SAMPLES];
        for (ch, state) in self.down.iter_mut().enumerate() {
            qmf::analysis(
                self.full.bands(ch),
                frame.channel_mut(ch),
                &mut discard[..band_len],
                state,
            );
        }
    }
}

fn frame_has_nan(frame: &AudioFrame) -> bool {
    (0..frame.num_channels()).any(|ch| frame.channel(ch).iter().any(|s| s.is_nan()))
}

/// Multichannel spectral noise suppressor.
///
/// # Example
///
/// ```
/// use hush::{AudioFrame, Config, NoiseSuppressor};
///
/// let config = Config::default();
/// let mut ns = NoiseSuppressor::new(config).unwrap();
/// let mut frame = AudioFrame::new(config.sample_rate_hz, config.num_channels).unwrap();
///
/// let samples = vec![0.0f32; config.samples_per_frame()];
/// frame.copy_from_interleaved(&samples).unwrap();
/// ns.process(&mut frame).unwrap();
/// ```
#[derive(Debug)]
pub struct NoiseSuppressor {
    config: Config,
    core: hush_ns::NoiseSuppressor,
    bridge: Option<RateBridge>,
    analyze_bridge: Option<RateBridge>,
    analyze_split: Option<SplitScratch>,
}

impl NoiseSuppressor {
    /// Construct a suppressor; all buffers and tables are set up here.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        let core = hush_ns::NoiseSuppressor::new(
            NsConfig {
                suppression_level: config.suppression_level,
            },
            config.num_channels,
        );

        let bridged = matches!(config.sample_rate_hz, 8_000 | 24_000);
        let num_bands = config::num_bands_for_rate(config.sample_rate_hz);
        Ok(Self {
            config,
            core,
            bridge: bridged.then(|| RateBridge::new(config.sample_rate_hz, config.num_channels)),
            analyze_bridge: bridged
                .then(|| RateBridge::new(config.sample_rate_hz, config.num_channels)),
            analyze_split: (num_bands > 1).then(|| {
                SplitScratch::new(config.samples_per_frame(), config.num_channels, num_bands)
            }),
        })
    }

    /// The configuration the suppressor was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn validate_frame(&self, frame: &AudioFrame) -> Result<(), Error> {
        if frame.num_channels() != self.config.num_channels {
            return Err(Error::InvalidChannelCount);
        }
        if frame.samples_per_channel() != self.config.samples_per_frame() {
            return Err(Error::FrameSizeMismatch);
        }
        if frame.num_bands() != config::num_bands_for_rate(self.config.sample_rate_hz) {
            return Err(Error::BandCountMismatch);
        }
        Ok(())
    }

    /// Update the noise and speech models from a frame without
    /// modifying it.
    ///
    /// A frame containing NaN samples is skipped entirely (defensive
    /// behaviour: NaN must not reach the recursive filter states).
    pub fn analyze(&mut self, frame: &AudioFrame) -> Result<(), Error> {
        self.validate_frame(frame)?;
        if frame_has_nan(frame) {
            tracing::warn!("skipping analysis of frame with NaN input");
            return Ok(());
        }

        let Self {
            core,
            analyze_bridge,
            analyze_split,
            ..
        } = self;

        if let Some(bridge) = analyze_bridge {
            bridge.raise(frame);
            core.analyze(bridge.processing_buffer());
            return Ok(());
        }

        match frame.num_bands() {
            1 => core.analyze(frame.full()),
            _ => {
                if let Some(bands) = frame.split_bands() {
                    core.analyze(bands);
                } else {
                    let scratch = analyze_split
                        .as_mut()
                        .expect("split scratch exists for multi-band rates");
                    scratch.filter.analysis(frame.full(), &mut scratch.bands);
                    core.analyze(&scratch.bands);
                }
            }
        }
        Ok(())
    }

    /// Apply suppression to a frame in place.
    ///
    /// If the caller has not split a 32/48 kHz frame into bands, the
    /// suppressor splits internally and merges before returning; a
    /// frame the caller split stays split.
    ///
    /// A frame containing NaN samples passes through unmodified and is
    /// skipped by the estimators (defensive behaviour: NaN must not
    /// reach the recursive filter states).
    pub fn process(&mut self, frame: &mut AudioFrame) -> Result<(), Error> {
        self.validate_frame(frame)?;
        if frame_has_nan(frame) {
            tracing::warn!("passing through frame with NaN input");
            return Ok(());
        }

        if let Some(bridge) = &mut self.bridge {
            bridge.raise(frame);
            self.core.process(bridge.processing_buffer_mut());
            bridge.lower(frame);
            return Ok(());
        }

        match frame.num_bands() {
            1 => self.core.process(frame.full_mut()),
            _ => {
                let was_split = frame.is_split();
                frame.split_into_bands();
                let bands = frame
                    .split_bands_mut()
                    .expect("bands are active after split_into_bands");
                self.core.process(bands);
                if !was_split {
                    frame.merge_bands();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuppressionLevel;

    fn suppressor(sample_rate_hz: usize, num_channels: usize) -> NoiseSuppressor {
        NoiseSuppressor::new(Config {
            suppression_level: SuppressionLevel::Moderate12dB,
            sample_rate_hz,
            num_channels,
        })
        .unwrap()
    }

    #[test]
    fn construction_rejects_bad_configs() {
        assert_eq!(
            NoiseSuppressor::new(Config {
                sample_rate_hz: 11_025,
                ..Config::default()
            })
            .unwrap_err(),
            Error::UnsupportedSampleRate
        );
        assert_eq!(
            NoiseSuppressor::new(Config {
                num_channels: 0,
                ..Config::default()
            })
            .unwrap_err(),
            Error::InvalidChannelCount
        );
    }

    #[test]
    fn frame_format_is_checked_before_processing() {
        let mut ns = suppressor(16_000, 1);

        let mut wrong_rate = AudioFrame::new(8_000, 1).unwrap();
        assert_eq!(ns.process(&mut wrong_rate), Err(Error::FrameSizeMismatch));

        let mut wrong_channels = AudioFrame::new(16_000, 2).unwrap();
        assert_eq!(
            ns.process(&mut wrong_channels),
            Err(Error::InvalidChannelCount)
        );

        let wrong_bands = AudioFrame::new(8_000, 1).unwrap();
        let mut ns48 = suppressor(48_000, 1);
        // Size differs before band count can; both rejections are fine,
        // the call just must not mutate state.
        assert!(ns48.analyze(&wrong_bands).is_err());
    }

    #[test]
    fn processing_at_every_supported_rate_stays_bounded() {
        for rate in config::SUPPORTED_SAMPLE_RATES {
            let mut ns = suppressor(rate, 1);
            let mut frame = AudioFrame::new(rate, 1).unwrap();
            let samples_per_frame = rate / 100;

            for f in 0..120 {
                let samples: Vec<f32> = (0..samples_per_frame)
                    .map(|n| ((f * samples_per_frame + n) as f32 * 0.07).sin() * 8000.0)
                    .collect();
                frame.copy_from_interleaved(&samples).unwrap();
                ns.process(&mut frame).unwrap();

                let mut out = vec![0.0f32; samples_per_frame];
                frame.copy_to_interleaved(&mut out).unwrap();
                for &v in &out {
                    assert!(v.is_finite(), "rate {rate}: non-finite output");
                    assert!((-32768.0..=32767.0).contains(&v), "rate {rate}: {v}");
                }
            }
        }
    }

    #[test]
    fn zero_input_stays_zero_at_bridged_rates() {
        for rate in [8_000usize, 24_000] {
            let mut ns = suppressor(rate, 1);
            let mut frame = AudioFrame::new(rate, 1).unwrap();
            let zeros = vec![0.0f32; rate / 100];
            let mut out = vec![1.0f32; rate / 100];

            for _ in 0..300 {
                frame.copy_from_interleaved(&zeros).unwrap();
                ns.process(&mut frame).unwrap();
                frame.copy_to_interleaved(&mut out).unwrap();
                assert!(out.iter().all(|&v| v == 0.0), "rate {rate}");
            }
        }
    }

    #[test]
    fn analyze_leaves_the_frame_untouched_at_every_rate() {
        for rate in config::SUPPORTED_SAMPLE_RATES {
            let mut ns = suppressor(rate, 2);
            let mut frame = AudioFrame::new(rate, 2).unwrap();
            let samples: Vec<f32> = (0..2 * rate / 100).map(|n| (n as f32 * 0.11).sin() * 100.0).collect();
            frame.copy_from_interleaved(&samples).unwrap();

            ns.analyze(&frame).unwrap();

            let mut out = vec![0.0f32; samples.len()];
            frame.copy_to_interleaved(&mut out).unwrap();
            assert_eq!(out, samples, "rate {rate}");
        }
    }

    #[test]
    fn nan_input_passes_through_at_the_facade() {
        let mut ns = suppressor(32_000, 1);
        let mut frame = AudioFrame::new(32_000, 1).unwrap();

        let mut samples = vec![500.0f32; 320];
        samples[100] = f32::NAN;
        frame.copy_from_interleaved(&samples).unwrap();
        ns.process(&mut frame).unwrap();

        for (n, &v) in frame.channel(0).iter().enumerate() {
            if n == 100 {
                assert!(v.is_nan());
            } else {
                assert_eq!(v, 500.0);
            }
        }

        // Recovery: clean frames keep producing finite output.
        let clean = vec![500.0f32; 320];
        frame.copy_from_interleaved(&clean).unwrap();
        ns.process(&mut frame).unwrap();
        assert!(frame.channel(0).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn caller_split_and_internal_split_agree() {
        let make_input = |f: usize, n: usize| {
            let t = (f * 320 + n) as f32 / 32000.0;
            (2.0 * std::f32::consts::PI * 700.0 * t).sin() * 3000.0
        };

        let mut internal = suppressor(32_000, 1);
        let mut internal_frame = AudioFrame::new(32_000, 1).unwrap();
        let mut caller = suppressor(32_000, 1);
        let mut caller_frame = AudioFrame::new(32_000, 1).unwrap();

        for f in 0..50 {
            let samples: Vec<f32> = (0..320).map(|n| make_input(f, n)).collect();

            internal_frame.copy_from_interleaved(&samples).unwrap();
            internal.process(&mut internal_frame).unwrap();
            let mut internal_out = vec![0.0f32; 320];
            internal_frame.copy_to_interleaved(&mut internal_out).unwrap();

            caller_frame.copy_from_interleaved(&samples).unwrap();
            caller_frame.split_into_bands();
            caller.process(&mut caller_frame).unwrap();
            assert!(caller_frame.is_split(), "caller's split stays in place");
            let mut caller_out = vec![0.0f32; 320];
            caller_frame.copy_to_interleaved(&mut caller_out).unwrap();

            assert_eq!(internal_out, caller_out, "frame {f}");
        }
    }
}

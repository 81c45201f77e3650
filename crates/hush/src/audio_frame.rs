//! Frame buffer handed across the suppressor boundary.
//!
//! An [`AudioFrame`] is a long-lived container for successive 10 ms
//! frames of one stream: it owns the deinterleaved sample storage, and
//! for rates above 16 kHz also the band-split storage and the stateful
//! splitting filters. Samples are `f32` in the raw 16-bit range
//! `[-32768, 32767]`.

use hush_common_audio::{ChannelBuffer, audio_util};

use crate::config::{self, MAX_CHANNELS, SUPPORTED_SAMPLE_RATES};
use crate::error::Error;
use crate::splitting_filter::SplittingFilter;

#[derive(Debug)]
struct SplitState {
    filter: SplittingFilter,
    bands: ChannelBuffer<f32>,
    /// Whether `bands` currently holds the split of `data`.
    active: bool,
}

/// Multichannel 10 ms frame buffer with band splitting.
#[derive(Debug)]
pub struct AudioFrame {
    sample_rate_hz: usize,
    data: ChannelBuffer<f32>,
    split: Option<SplitState>,
}

impl AudioFrame {
    /// Create a frame buffer for the given stream format.
    pub fn new(sample_rate_hz: usize, num_channels: usize) -> Result<Self, Error> {
        if !SUPPORTED_SAMPLE_RATES.contains(&sample_rate_hz) {
            return Err(Error::UnsupportedSampleRate);
        }
        if num_channels == 0 || num_channels > MAX_CHANNELS {
            return Err(Error::InvalidChannelCount);
        }

        let samples_per_channel = sample_rate_hz / 100;
        let num_bands = config::num_bands_for_rate(sample_rate_hz);
        let split = (num_bands > 1).then(|| SplitState {
            filter: SplittingFilter::new(num_channels, num_bands),
            bands: ChannelBuffer::new(samples_per_channel, num_channels, num_bands),
            active: false,
        });

        Ok(Self {
            sample_rate_hz,
            data: ChannelBuffer::new_single_band(samples_per_channel, num_channels),
            split,
        })
    }

    /// Stream sample rate in Hz.
    pub fn sample_rate_hz(&self) -> usize {
        self.sample_rate_hz
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.data.num_channels()
    }

    /// Samples per channel in one frame.
    pub fn samples_per_channel(&self) -> usize {
        self.data.samples_per_channel()
    }

    /// Number of bands the frame splits into (1 for rates ≤ 24 kHz).
    pub fn num_bands(&self) -> usize {
        self.split.as_ref().map_or(1, |s| s.bands.num_bands())
    }

    /// Whether the band-split views currently hold the frame's data.
    pub fn is_split(&self) -> bool {
        self.split.as_ref().is_some_and(|s| s.active)
    }

    /// One channel's full-band samples.
    pub fn channel(&self, channel: usize) -> &[f32] {
        self.data.bands(channel)
    }

    /// Mutable access to one channel's full-band samples.
    ///
    /// Writing here invalidates any active split views.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        if let Some(split) = &mut self.split {
            split.active = false;
        }
        self.data.bands_mut(channel)
    }

    /// Load a frame from interleaved samples.
    ///
    /// `samples` must hold `num_channels × samples_per_channel` values.
    pub fn copy_from_interleaved(&mut self, samples: &[f32]) -> Result<(), Error> {
        let num_channels = self.data.num_channels();
        if samples.len() != num_channels * self.data.samples_per_channel() {
            return Err(Error::FrameSizeMismatch);
        }
        for ch in 0..num_channels {
            for (n, v) in self.data.bands_mut(ch).iter_mut().enumerate() {
                *v = samples[n * num_channels + ch];
            }
        }
        if let Some(split) = &mut self.split {
            split.active = false;
        }
        Ok(())
    }

    /// Load a frame from interleaved 16-bit PCM.
    pub fn copy_from_interleaved_i16(&mut self, samples: &[i16]) -> Result<(), Error> {
        let num_channels = self.data.num_channels();
        if samples.len() != num_channels * self.data.samples_per_channel() {
            return Err(Error::FrameSizeMismatch);
        }
        for ch in 0..num_channels {
            for (n, v) in self.data.bands_mut(ch).iter_mut().enumerate() {
                *v = f32::from(samples[n * num_channels + ch]);
            }
        }
        if let Some(split) = &mut self.split {
            split.active = false;
        }
        Ok(())
    }

    /// Store the frame into an interleaved sample buffer, merging bands
    /// first if the frame is currently split.
    pub fn copy_to_interleaved(&mut self, samples: &mut [f32]) -> Result<(), Error> {
        let num_channels = self.data.num_channels();
        if samples.len() != num_channels * self.data.samples_per_channel() {
            return Err(Error::FrameSizeMismatch);
        }
        self.merge_bands();
        for ch in 0..num_channels {
            for (n, &v) in self.data.bands(ch).iter().enumerate() {
                samples[n * num_channels + ch] = v;
            }
        }
        Ok(())
    }

    /// Store the frame as interleaved 16-bit PCM with saturation.
    pub fn copy_to_interleaved_i16(&mut self, samples: &mut [i16]) -> Result<(), Error> {
        let num_channels = self.data.num_channels();
        if samples.len() != num_channels * self.data.samples_per_channel() {
            return Err(Error::FrameSizeMismatch);
        }
        self.merge_bands();
        for ch in 0..num_channels {
            for (n, &v) in self.data.bands(ch).iter().enumerate() {
                samples[n * num_channels + ch] = audio_util::float_s16_to_s16(v);
            }
        }
        Ok(())
    }

    /// Split the frame into frequency bands.
    ///
    /// A no-op for single-band rates and for frames that are already
    /// split.
    pub fn split_into_bands(&mut self) {
        if let Some(split) = &mut self.split {
            if !split.active {
                split.filter.analysis(&self.data, &mut split.bands);
                split.active = true;
            }
        }
    }

    /// Merge split bands back into the full-band signal.
    ///
    /// A no-op when the frame is not split.
    pub fn merge_bands(&mut self) {
        if let Some(split) = &mut self.split {
            if split.active {
                split.filter.synthesis(&split.bands, &mut self.data);
                split.active = false;
            }
        }
    }

    /// The full-band storage.
    pub(crate) fn full(&self) -> &ChannelBuffer<f32> {
        &self.data
    }

    /// Mutable full-band storage.
    pub(crate) fn full_mut(&mut self) -> &mut ChannelBuffer<f32> {
        &mut self.data
    }

    /// The band-split storage, if currently active.
    pub(crate) fn split_bands(&self) -> Option<&ChannelBuffer<f32>> {
        self.split.as_ref().filter(|s| s.active).map(|s| &s.bands)
    }

    /// Mutable band-split storage, if currently active.
    pub(crate) fn split_bands_mut(&mut self) -> Option<&mut ChannelBuffer<f32>> {
        self.split
            .as_mut()
            .filter(|s| s.active)
            .map(|s| &mut s.bands)
    }
}

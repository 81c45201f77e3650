//! Frequency-band splitting across channels.
//!
//! Dispatches between the two-band QMF (32 kHz) and the three-band
//! lapped bank (48 kHz), keeping one filter state per channel. Operates
//! on whole [`ChannelBuffer`]s: the full-band signal on one side, the
//! per-band views on the other.

use hush_common_audio::ChannelBuffer;

use crate::qmf::{self, QmfState};
use crate::three_band_filter_bank::{NUM_BANDS, SPLIT_BAND_SIZE, ThreeBandFilterBank};

const TWO_BAND_FRAME: usize = 320;
const TWO_BAND_SAMPLES: usize = TWO_BAND_FRAME / 2;

#[derive(Debug)]
enum BandStates {
    Two(Vec<QmfState>),
    Three(Vec<ThreeBandFilterBank>),
}

/// Stateful band splitter for one stream of frames.
#[derive(Debug)]
pub(crate) struct SplittingFilter {
    states: BandStates,
}

impl SplittingFilter {
    /// Create a splitter for `num_bands` ∈ {2, 3}.
    pub(crate) fn new(num_channels: usize, num_bands: usize) -> Self {
        let states = match num_bands {
            2 => BandStates::Two((0..num_channels).map(|_| QmfState::new()).collect()),
            3 => BandStates::Three(
                (0..num_channels)
                    .map(|_| ThreeBandFilterBank::new())
                    .collect(),
            ),
            _ => panic!("num_bands must be 2 or 3, got {num_bands}"),
        };
        Self { states }
    }

    /// Split full-band channels into sub-bands.
    pub(crate) fn analysis(&mut self, data: &ChannelBuffer<f32>, bands: &mut ChannelBuffer<f32>) {
        debug_assert_eq!(data.num_channels(), bands.num_channels());
        debug_assert_eq!(data.samples_per_channel(), bands.samples_per_channel());

        match &mut self.states {
            BandStates::Two(states) => {
                debug_assert_eq!(data.samples_per_channel(), TWO_BAND_FRAME);
                for (ch, state) in states.iter_mut().enumerate() {
                    let mut low = [0.0f32; TWO_BAND_SAMPLES];
                    let mut high = [0.0f32; TWO_BAND_SAMPLES];
                    qmf::analysis(data.bands(ch), &mut low, &mut high, state);
                    bands.band_channel_mut(0, ch).copy_from_slice(&low);
                    bands.band_channel_mut(1, ch).copy_from_slice(&high);
                }
            }
            BandStates::Three(banks) => {
                for (ch, bank) in banks.iter_mut().enumerate() {
                    let mut split = [[0.0f32; SPLIT_BAND_SIZE]; NUM_BANDS];
                    bank.analysis(data.bands(ch), &mut split);
                    for (band, samples) in split.iter().enumerate() {
                        bands.band_channel_mut(band, ch).copy_from_slice(samples);
                    }
                }
            }
        }
    }

    /// Merge sub-bands back into full-band channels.
    pub(crate) fn synthesis(&mut self, bands: &ChannelBuffer<f32>, data: &mut ChannelBuffer<f32>) {
        debug_assert_eq!(data.num_channels(), bands.num_channels());
        debug_assert_eq!(data.samples_per_channel(), bands.samples_per_channel());

        match &mut self.states {
            BandStates::Two(states) => {
                debug_assert_eq!(data.samples_per_channel(), TWO_BAND_FRAME);
                for (ch, state) in states.iter_mut().enumerate() {
                    let mut low = [0.0f32; TWO_BAND_SAMPLES];
                    let mut high = [0.0f32; TWO_BAND_SAMPLES];
                    low.copy_from_slice(bands.band_channel(0, ch));
                    high.copy_from_slice(bands.band_channel(1, ch));
                    qmf::synthesis(&low, &high, data.bands_mut(ch), state);
                }
            }
            BandStates::Three(banks) => {
                for (ch, bank) in banks.iter_mut().enumerate() {
                    let mut split = [[0.0f32; SPLIT_BAND_SIZE]; NUM_BANDS];
                    for (band, samples) in split.iter_mut().enumerate() {
                        samples.copy_from_slice(bands.band_channel(band, ch));
                    }
                    bank.synthesis(&split, data.bands_mut(ch));
                }
            }
        }
    }
}

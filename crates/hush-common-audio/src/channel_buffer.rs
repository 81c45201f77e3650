//! Multi-channel, multi-band sample storage with aliasing views.
//!
//! One contiguous allocation holds `channels × bands × samples_per_band`
//! samples, laid out channel-major:
//!
//! ```text
//! [ ch0/band0 | ch0/band1 | ... | ch1/band0 | ch1/band1 | ... ]
//! ```
//!
//! Three views address the same storage without copying:
//!
//! - `bands(ch)` — all bands of one channel, contiguous
//! - `band(ch, b)` — one band of one channel
//! - `band_channel(b, ch)` — the band-major spelling of `band(ch, b)`,
//!   used when iterating one band across channels
//!
//! For a single-band buffer, band 0 is the full-band data.

use derive_more::Debug;

/// Multi-channel, optionally multi-band audio buffer.
///
/// The band count follows the sample rate: one band up to 16 kHz, two at
/// 32 kHz, three at 48 kHz.
#[derive(Debug, Clone)]
pub struct ChannelBuffer<T> {
    #[debug(skip)]
    data: Vec<T>,
    samples_per_channel: usize,
    samples_per_band: usize,
    num_allocated_channels: usize,
    /// Visible channel count; may be narrowed without reallocating.
    num_channels: usize,
    num_bands: usize,
}

impl<T: Clone + Default> ChannelBuffer<T> {
    /// Create a zero-initialized buffer.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` or `num_bands` is zero, or if
    /// `samples_per_channel` is not divisible by `num_bands`.
    pub fn new(samples_per_channel: usize, num_channels: usize, num_bands: usize) -> Self {
        assert!(num_channels > 0, "num_channels must be > 0");
        assert!(num_bands > 0, "num_bands must be > 0");
        assert_eq!(
            samples_per_channel % num_bands,
            0,
            "samples_per_channel ({samples_per_channel}) not divisible by num_bands ({num_bands})"
        );
        Self {
            data: vec![T::default(); samples_per_channel * num_channels],
            samples_per_channel,
            samples_per_band: samples_per_channel / num_bands,
            num_allocated_channels: num_channels,
            num_channels,
            num_bands,
        }
    }

    /// Create a single-band buffer.
    pub fn new_single_band(samples_per_channel: usize, num_channels: usize) -> Self {
        Self::new(samples_per_channel, num_channels, 1)
    }
}

impl<T> ChannelBuffer<T> {
    /// Samples per channel across all bands.
    #[inline]
    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// Samples in each band.
    #[inline]
    pub fn samples_per_band(&self) -> usize {
        self.samples_per_band
    }

    /// Visible channel count (may be less than allocated).
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Number of frequency bands.
    #[inline]
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Narrow or restore the visible channel count.
    ///
    /// # Panics
    ///
    /// Panics if `num_channels` exceeds the allocated channel count.
    pub fn set_num_channels(&mut self, num_channels: usize) {
        assert!(
            num_channels <= self.num_allocated_channels,
            "num_channels ({num_channels}) exceeds allocated ({})",
            self.num_allocated_channels
        );
        self.num_channels = num_channels;
    }

    #[inline]
    fn band_offset(&self, channel: usize, band: usize) -> usize {
        debug_assert!(channel < self.num_allocated_channels);
        debug_assert!(band < self.num_bands);
        channel * self.samples_per_channel + band * self.samples_per_band
    }

    /// All bands of one channel, contiguous.
    #[inline]
    pub fn bands(&self, channel: usize) -> &[T] {
        let start = channel * self.samples_per_channel;
        &self.data[start..start + self.samples_per_channel]
    }

    /// Mutable view of all bands of one channel.
    #[inline]
    pub fn bands_mut(&mut self, channel: usize) -> &mut [T] {
        let start = channel * self.samples_per_channel;
        &mut self.data[start..start + self.samples_per_channel]
    }

    /// One band of one channel.
    #[inline]
    pub fn band(&self, channel: usize, band: usize) -> &[T] {
        let start = self.band_offset(channel, band);
        &self.data[start..start + self.samples_per_band]
    }

    /// Mutable view of one band of one channel.
    #[inline]
    pub fn band_mut(&mut self, channel: usize, band: usize) -> &mut [T] {
        let start = self.band_offset(channel, band);
        &mut self.data[start..start + self.samples_per_band]
    }

    /// Band-major spelling of [`band`](Self::band): one band, one channel.
    #[inline]
    pub fn band_channel(&self, band: usize, channel: usize) -> &[T] {
        self.band(channel, band)
    }

    /// Mutable band-major access.
    #[inline]
    pub fn band_channel_mut(&mut self, band: usize, channel: usize) -> &mut [T] {
        self.band_mut(channel, band)
    }

    /// The raw backing storage.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw backing storage.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_band_dimensions() {
        let buf = ChannelBuffer::<f32>::new_single_band(160, 2);
        assert_eq!(buf.samples_per_channel(), 160);
        assert_eq!(buf.samples_per_band(), 160);
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.num_bands(), 1);
    }

    #[test]
    fn three_band_dimensions() {
        let buf = ChannelBuffer::<f32>::new(480, 2, 3);
        assert_eq!(buf.samples_per_channel(), 480);
        assert_eq!(buf.samples_per_band(), 160);
        assert_eq!(buf.num_bands(), 3);
    }

    #[test]
    fn views_alias_one_storage() {
        // 2 channels, 2 bands, 2 samples per band.
        let mut buf = ChannelBuffer::<i16>::new(4, 2, 2);
        buf.band_mut(0, 0).copy_from_slice(&[1, 2]);
        buf.band_mut(0, 1).copy_from_slice(&[3, 4]);
        buf.band_mut(1, 0).copy_from_slice(&[5, 6]);
        buf.band_mut(1, 1).copy_from_slice(&[7, 8]);

        // Channel-major backing layout.
        assert_eq!(buf.data(), &[1, 2, 3, 4, 5, 6, 7, 8]);

        // Full-channel view is the concatenation of that channel's bands.
        assert_eq!(buf.bands(0), &[1, 2, 3, 4]);
        assert_eq!(buf.bands(1), &[5, 6, 7, 8]);

        // Band-major view reads the same storage.
        assert_eq!(buf.band_channel(0, 0), &[1, 2]);
        assert_eq!(buf.band_channel(1, 0), &[3, 4]);
        assert_eq!(buf.band_channel(0, 1), &[5, 6]);
        assert_eq!(buf.band_channel(1, 1), &[7, 8]);
    }

    #[test]
    fn single_band_band0_is_full_band() {
        let mut buf = ChannelBuffer::<f32>::new_single_band(4, 1);
        buf.bands_mut(0).copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buf.band(0, 0), buf.bands(0));
    }

    #[test]
    fn narrowing_keeps_allocation() {
        let mut buf = ChannelBuffer::<f32>::new_single_band(160, 4);
        buf.set_num_channels(2);
        assert_eq!(buf.num_channels(), 2);
        // Data for all four channels stays allocated and addressable.
        assert_eq!(buf.data().len(), 640);
        buf.set_num_channels(4);
        assert_eq!(buf.num_channels(), 4);
    }

    #[test]
    #[should_panic(expected = "exceeds allocated")]
    fn widening_past_allocation_panics() {
        let mut buf = ChannelBuffer::<f32>::new_single_band(160, 2);
        buf.set_num_channels(3);
    }

    #[test]
    #[should_panic(expected = "not divisible")]
    fn indivisible_band_count_panics() {
        let _ = ChannelBuffer::<f32>::new(241, 1, 2);
    }

    #[test]
    fn zero_initialized() {
        let buf = ChannelBuffer::<f32>::new(480, 2, 3);
        assert!(buf.data().iter().all(|&v| v == 0.0));
    }
}

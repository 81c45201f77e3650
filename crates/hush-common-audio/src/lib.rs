//! Shared audio primitives for the hush noise suppressor.
//!
//! Contains the multi-channel, multi-band [`ChannelBuffer`] that the
//! processing pipeline operates on, and sample-format conversions between
//! integer PCM and the internal float representation.

pub mod audio_util;
pub mod channel_buffer;

pub use channel_buffer::ChannelBuffer;

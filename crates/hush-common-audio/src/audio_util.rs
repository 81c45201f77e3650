//! Sample-format conversions between integer PCM and the internal float
//! representation.
//!
//! The pipeline operates on `f32` samples in the raw 16-bit integer range:
//!
//! | Name     | Type  | Range                 |
//! |----------|-------|-----------------------|
//! | S16      | `i16` | \[-32768, 32767\]     |
//! | FloatS16 | `f32` | \[-32768.0, 32767.0\] |

/// Convert a FloatS16 sample to S16, saturating and rounding to nearest.
#[inline]
pub fn float_s16_to_s16(v: f32) -> i16 {
    let v = v.clamp(-32768.0, 32767.0);
    (v + f32::copysign(0.5, v)) as i16
}

/// Widen a slice of S16 samples to FloatS16.
///
/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn s16_to_float_s16_slice(src: &[i16], dest: &mut [f32]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = f32::from(s);
    }
}

/// Convert a slice of FloatS16 samples to S16 with saturation.
///
/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn float_s16_to_s16_slice(src: &[f32], dest: &mut [i16]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = float_s16_to_s16(s);
    }
}

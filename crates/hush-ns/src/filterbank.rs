//! Windowed overlap-add framing around the 256-point FFT.
//!
//! Each 160-sample band frame is extended with the previous frame's last
//! 96 samples, windowed, transformed, filtered, transformed back, windowed
//! again, and overlap-added. The window is a sine taper laid out so that
//! `w[n]² + w[n+160]² = 1` across the 96-sample overlap, which makes the
//! analysis/synthesis chain an exact identity (with a 96-sample delay)
//! when the spectral gain is one.

use std::sync::LazyLock;

use realfft::num_complex::Complex;

use crate::config::{FFT_SIZE, FRAME_SIZE, NUM_BINS, OVERLAP_SIZE};

/// Combined analysis/synthesis window.
///
/// Quarter-sine rise over the first 96 samples, flat middle, matching
/// cosine fall over the last 96.
static WINDOW: LazyLock<[f32; FFT_SIZE]> = LazyLock::new(|| {
    let mut w = [1.0f32; FFT_SIZE];
    let taper = 2.0 * OVERLAP_SIZE as f32;
    for n in 0..OVERLAP_SIZE {
        let phase = std::f32::consts::PI * (n as f32 + 0.5) / taper;
        w[n] = phase.sin();
        w[FRAME_SIZE + n] = phase.cos();
    }
    w
});

/// Apply the window to an extended frame.
pub fn apply_window(x: &mut [f32; FFT_SIZE]) {
    for (x_n, &w_n) in x.iter_mut().zip(WINDOW.iter()) {
        *x_n *= w_n;
    }
}

/// Form an extended frame from history plus new samples, updating history.
///
/// `frame` must hold [`FRAME_SIZE`] samples.
pub fn form_extended_frame(
    frame: &[f32],
    history: &mut [f32; OVERLAP_SIZE],
    extended: &mut [f32; FFT_SIZE],
) {
    debug_assert_eq!(frame.len(), FRAME_SIZE);
    extended[..OVERLAP_SIZE].copy_from_slice(history);
    extended[OVERLAP_SIZE..].copy_from_slice(frame);
    history.copy_from_slice(&extended[FRAME_SIZE..]);
}

/// Overlap-add the synthesis output into a frame, updating the tail memory.
///
/// `output` must hold [`FRAME_SIZE`] samples.
pub fn overlap_and_add(
    extended: &[f32; FFT_SIZE],
    memory: &mut [f32; OVERLAP_SIZE],
    output: &mut [f32],
) {
    debug_assert_eq!(output.len(), FRAME_SIZE);
    for n in 0..OVERLAP_SIZE {
        output[n] = memory[n] + extended[n];
    }
    output[OVERLAP_SIZE..].copy_from_slice(&extended[OVERLAP_SIZE..FRAME_SIZE]);
    memory.copy_from_slice(&extended[FRAME_SIZE..]);
}

/// Per-bin power and magnitude of a complex spectrum.
pub fn compute_spectra(
    spectrum: &[Complex<f32>; NUM_BINS],
    power: &mut [f32; NUM_BINS],
    magnitude: &mut [f32; NUM_BINS],
) {
    for ((bin, p), m) in spectrum.iter().zip(power.iter_mut()).zip(magnitude.iter_mut()) {
        *p = bin.norm_sqr();
        *m = p.sqrt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_overlap_squares_sum_to_one() {
        let w = &*WINDOW;
        for n in 0..OVERLAP_SIZE {
            let sum = w[n] * w[n] + w[FRAME_SIZE + n] * w[FRAME_SIZE + n];
            assert!((sum - 1.0).abs() < 1e-6, "overlap {n}: {sum}");
        }
        for (n, &v) in w.iter().enumerate().take(FRAME_SIZE).skip(OVERLAP_SIZE) {
            assert_eq!(v, 1.0, "flat region sample {n}");
        }
    }

    #[test]
    fn double_windowed_overlap_add_is_identity() {
        // Stream several frames through analysis and synthesis windowing
        // with no spectral modification. After the first frame the output
        // must equal the input delayed by the overlap length.
        let mut history = [0.0f32; OVERLAP_SIZE];
        let mut memory = [0.0f32; OVERLAP_SIZE];
        let mut input = Vec::new();
        let mut output = Vec::new();

        for t in 0..8 {
            let frame: Vec<f32> = (0..FRAME_SIZE)
                .map(|n| ((t * FRAME_SIZE + n) as f32 * 0.037).sin() * 1000.0)
                .collect();
            input.extend_from_slice(&frame);

            let mut extended = [0.0f32; FFT_SIZE];
            form_extended_frame(&frame, &mut history, &mut extended);
            apply_window(&mut extended);
            apply_window(&mut extended);

            let mut out_frame = [0.0f32; FRAME_SIZE];
            overlap_and_add(&extended, &mut memory, &mut out_frame);
            output.extend_from_slice(&out_frame);
        }

        for n in OVERLAP_SIZE..output.len() {
            let expected = input[n - OVERLAP_SIZE];
            assert!(
                (output[n] - expected).abs() < 1e-3,
                "sample {n}: expected {expected}, got {}",
                output[n]
            );
        }
    }

    #[test]
    fn extended_frame_keeps_tail_as_history() {
        let mut history = [0.0f32; OVERLAP_SIZE];
        let frame: Vec<f32> = (0..FRAME_SIZE).map(|n| n as f32).collect();
        let mut extended = [0.0f32; FFT_SIZE];
        form_extended_frame(&frame, &mut history, &mut extended);

        assert_eq!(&extended[..OVERLAP_SIZE], &[0.0; OVERLAP_SIZE]);
        assert_eq!(extended[OVERLAP_SIZE], 0.0);
        assert_eq!(extended[FFT_SIZE - 1], (FRAME_SIZE - 1) as f32);
        // History now holds the last OVERLAP_SIZE input samples.
        assert_eq!(history[0], (FRAME_SIZE - OVERLAP_SIZE) as f32);
    }

    #[test]
    fn spectra_of_unit_bins() {
        let mut spectrum = [Complex::default(); NUM_BINS];
        spectrum[3] = Complex::new(3.0, 4.0);
        let mut power = [0.0f32; NUM_BINS];
        let mut magnitude = [0.0f32; NUM_BINS];
        compute_spectra(&spectrum, &mut power, &mut magnitude);
        assert_eq!(power[3], 25.0);
        assert_eq!(magnitude[3], 5.0);
        assert_eq!(power[0], 0.0);
    }
}

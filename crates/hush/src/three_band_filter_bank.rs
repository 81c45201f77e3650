//! Three-band DCT-modulated analysis/synthesis bank.
//!
//! Splits a 480-sample (48 kHz, 10 ms) frame into three critically
//! sampled 160-sample sub-bands (0–8, 8–16, 16–24 kHz) and merges them
//! back. The bank is a sine-windowed lapped transform: each block of
//! three new samples is windowed together with the previous three and
//! projected onto three cosine-modulated basis vectors. Time-domain
//! aliasing cancels between consecutive blocks, so analysis followed by
//! synthesis reconstructs the input exactly, delayed by three samples.

use std::f32::consts::PI;
use std::sync::LazyLock;

/// Number of frequency bands.
pub(crate) const NUM_BANDS: usize = 3;
/// Full-band frame size (480 samples = 48 kHz × 10 ms).
pub(crate) const FULL_BAND_SIZE: usize = 480;
/// Split-band frame size (160 samples per band).
pub(crate) const SPLIT_BAND_SIZE: usize = FULL_BAND_SIZE / NUM_BANDS;

/// Lapped block length: one new sub-sample group plus one of memory.
const BLOCK_SIZE: usize = 2 * NUM_BANDS;

/// Synthesis scaling that makes the round trip unity.
const SYNTHESIS_SCALING: f32 = 2.0 / NUM_BANDS as f32;

/// Windowed modulation basis,
/// `w[n]·cos(π/3·(n + 0.5 + 3/2)·(k + 0.5))` with a sine window.
static BASIS: LazyLock<[[f32; BLOCK_SIZE]; NUM_BANDS]> = LazyLock::new(|| {
    let mut basis = [[0.0f32; BLOCK_SIZE]; NUM_BANDS];
    for (k, band) in basis.iter_mut().enumerate() {
        for (n, b) in band.iter_mut().enumerate() {
            let window = (PI * (n as f32 + 0.5) / BLOCK_SIZE as f32).sin();
            let phase = PI / NUM_BANDS as f32
                * (n as f32 + 0.5 + NUM_BANDS as f32 / 2.0)
                * (k as f32 + 0.5);
            *b = window * phase.cos();
        }
    }
    basis
});

/// Per-channel three-band bank with lapped-block memory.
#[derive(Debug, Clone)]
pub(crate) struct ThreeBandFilterBank {
    analysis_memory: [f32; NUM_BANDS],
    synthesis_memory: [f32; NUM_BANDS],
}

impl ThreeBandFilterBank {
    pub(crate) fn new() -> Self {
        Self {
            analysis_memory: [0.0; NUM_BANDS],
            synthesis_memory: [0.0; NUM_BANDS],
        }
    }

    /// Split a full-band frame into three sub-band frames.
    pub(crate) fn analysis(
        &mut self,
        input: &[f32],
        output: &mut [[f32; SPLIT_BAND_SIZE]; NUM_BANDS],
    ) {
        debug_assert_eq!(input.len(), FULL_BAND_SIZE);
        let basis = &*BASIS;

        for t in 0..SPLIT_BAND_SIZE {
            let new = &input[NUM_BANDS * t..NUM_BANDS * (t + 1)];
            let mut block = [0.0f32; BLOCK_SIZE];
            block[..NUM_BANDS].copy_from_slice(&self.analysis_memory);
            block[NUM_BANDS..].copy_from_slice(new);

            for (k, band) in output.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (x, b) in block.iter().zip(basis[k].iter()) {
                    acc += x * b;
                }
                band[t] = acc;
            }
            self.analysis_memory.copy_from_slice(new);
        }
    }

    /// Merge three sub-band frames back into a full-band frame.
    pub(crate) fn synthesis(
        &mut self,
        input: &[[f32; SPLIT_BAND_SIZE]; NUM_BANDS],
        output: &mut [f32],
    ) {
        debug_assert_eq!(output.len(), FULL_BAND_SIZE);
        let basis = &*BASIS;

        for t in 0..SPLIT_BAND_SIZE {
            let mut block = [0.0f32; BLOCK_SIZE];
            for (k, band) in input.iter().enumerate() {
                let coefficient = band[t] * SYNTHESIS_SCALING;
                for (y, b) in block.iter_mut().zip(basis[k].iter()) {
                    *y += coefficient * b;
                }
            }

            let out = &mut output[NUM_BANDS * t..NUM_BANDS * (t + 1)];
            for (o, (&tail, &head)) in out
                .iter_mut()
                .zip(self.synthesis_memory.iter().zip(block.iter()))
            {
                *o = tail + head;
            }
            self.synthesis_memory.copy_from_slice(&block[NUM_BANDS..]);
        }
    }
}

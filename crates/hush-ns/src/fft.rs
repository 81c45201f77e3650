//! 256-point real FFT for the analysis/synthesis front-end.
//!
//! Wraps [`realfft`] with fixed-size plans and pre-allocated scratch so
//! the per-frame path never allocates. The inverse transform is
//! normalised here (realfft leaves the `1/N` factor to the caller).

use std::sync::Arc;

use derive_more::Debug;
use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::config::{FFT_SIZE, NUM_BINS};

/// Fixed 256-point forward/inverse real FFT with owned scratch space.
#[derive(Debug)]
pub struct NsFft {
    #[debug(skip)]
    forward: Arc<dyn RealToComplex<f32>>,
    #[debug(skip)]
    inverse: Arc<dyn ComplexToReal<f32>>,
    #[debug(skip)]
    forward_scratch: Vec<Complex<f32>>,
    #[debug(skip)]
    inverse_scratch: Vec<Complex<f32>>,
    #[debug(skip)]
    spectrum_scratch: [Complex<f32>; NUM_BINS],
}

impl Default for NsFft {
    fn default() -> Self {
        Self::new()
    }
}

impl NsFft {
    /// Create an FFT instance with pre-computed plans.
    pub fn new() -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(FFT_SIZE);
        let inverse = planner.plan_fft_inverse(FFT_SIZE);
        let forward_scratch = vec![Complex::default(); forward.get_scratch_len()];
        let inverse_scratch = vec![Complex::default(); inverse.get_scratch_len()];
        Self {
            forward,
            inverse,
            forward_scratch,
            inverse_scratch,
            spectrum_scratch: [Complex::default(); NUM_BINS],
        }
    }

    /// Forward FFT: time domain (used as scratch) to 129 complex bins.
    pub fn fft(&mut self, time_data: &mut [f32; FFT_SIZE], spectrum: &mut [Complex<f32>; NUM_BINS]) {
        self.forward
            .process_with_scratch(time_data, spectrum, &mut self.forward_scratch)
            .expect("forward FFT with fixed-size buffers");
    }

    /// Inverse FFT: 129 complex bins to time domain, scaled by `1/N`.
    pub fn ifft(&mut self, spectrum: &[Complex<f32>; NUM_BINS], time_data: &mut [f32; FFT_SIZE]) {
        self.spectrum_scratch.copy_from_slice(spectrum);
        // DC and Nyquist bins of a real spectrum carry no imaginary part.
        self.spectrum_scratch[0].im = 0.0;
        self.spectrum_scratch[NUM_BINS - 1].im = 0.0;
        self.inverse
            .process_with_scratch(
                &mut self.spectrum_scratch,
                time_data,
                &mut self.inverse_scratch,
            )
            .expect("inverse FFT with fixed-size buffers");

        let scaling = 1.0 / FFT_SIZE as f32;
        for v in time_data.iter_mut() {
            *v *= scaling;
        }
    }
}

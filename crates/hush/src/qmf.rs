//! Two-band quadrature mirror filter pair.
//!
//! Critically sampled split of a signal into half-rate low and high
//! bands, built from two chains of three first-order allpass sections
//! over the even and odd polyphase components. Aliasing cancels between
//! the branches on synthesis. Besides the 32 kHz band split, the same
//! pair serves as the half-band interpolator/decimator that bridges
//! 8 kHz and 24 kHz signals onto the 16/48 kHz processing paths.

/// State of one allpass chain: three sections, two values each.
pub(crate) const QMF_STATE_SIZE: usize = 6;

/// Largest half-band length the filters run at (240 = the 24 kHz bridge).
pub(crate) const MAX_BAND_SAMPLES: usize = 240;

const ALL_PASS_BRANCH_1: [f32; 3] = [0.097_930_908_2, 0.564_300_537_1, 0.873_733_520_5];
const ALL_PASS_BRANCH_2: [f32; 3] = [0.325_515_747_07, 0.748_626_708_98, 0.961_456_298_82];

/// Per-channel filter memory for analysis and synthesis.
#[derive(Debug, Clone)]
pub(crate) struct QmfState {
    pub analysis_state1: [f32; QMF_STATE_SIZE],
    pub analysis_state2: [f32; QMF_STATE_SIZE],
    pub synthesis_state1: [f32; QMF_STATE_SIZE],
    pub synthesis_state2: [f32; QMF_STATE_SIZE],
}

impl QmfState {
    pub fn new() -> Self {
        Self {
            analysis_state1: [0.0; QMF_STATE_SIZE],
            analysis_state2: [0.0; QMF_STATE_SIZE],
            synthesis_state1: [0.0; QMF_STATE_SIZE],
            synthesis_state2: [0.0; QMF_STATE_SIZE],
        }
    }
}

/// Three cascaded first-order allpass sections.
///
/// Each section computes `y[n] = x[n-1] + a·(x[n] - y[n-1])`. The
/// cascades ping-pong between `data` and `work`; the result lands in
/// `work`. `data` is clobbered.
fn all_pass_chain(
    data: &mut [f32],
    work: &mut [f32],
    coefficients: &[f32; 3],
    state: &mut [f32; QMF_STATE_SIZE],
) {
    let len = data.len();
    debug_assert!(len > 0);
    debug_assert_eq!(len, work.len());

    for (section, &a) in coefficients.iter().enumerate() {
        // Sections alternate direction; even sections read `data` and
        // write `work`, odd sections the reverse.
        let (src, dst): (&[f32], &mut [f32]) = if section % 2 == 0 {
            (&*data, &mut *work)
        } else {
            (&*work, &mut *data)
        };
        let s = 2 * section;
        dst[0] = state[s] + a * (src[0] - state[s + 1]);
        for n in 1..len {
            dst[n] = src[n - 1] + a * (src[n] - dst[n - 1]);
        }
        state[s] = src[len - 1];
        state[s + 1] = dst[len - 1];
    }
    // Three sections: the final output sits in `work`.
}

/// Split `input` (even length) into half-rate low and high bands.
pub(crate) fn analysis(
    input: &[f32],
    low_band: &mut [f32],
    high_band: &mut [f32],
    state: &mut QmfState,
) {
    let band_len = input.len() / 2;
    debug_assert_eq!(input.len() % 2, 0);
    debug_assert!(band_len <= MAX_BAND_SAMPLES);
    debug_assert_eq!(low_band.len(), band_len);
    debug_assert_eq!(high_band.len(), band_len);

    let mut odd = [0.0f32; MAX_BAND_SAMPLES];
    let mut even = [0.0f32; MAX_BAND_SAMPLES];
    for n in 0..band_len {
        even[n] = input[2 * n];
        odd[n] = input[2 * n + 1];
    }

    let mut filtered_odd = [0.0f32; MAX_BAND_SAMPLES];
    let mut filtered_even = [0.0f32; MAX_BAND_SAMPLES];
    all_pass_chain(
        &mut odd[..band_len],
        &mut filtered_odd[..band_len],
        &ALL_PASS_BRANCH_1,
        &mut state.analysis_state1,
    );
    all_pass_chain(
        &mut even[..band_len],
        &mut filtered_even[..band_len],
        &ALL_PASS_BRANCH_2,
        &mut state.analysis_state2,
    );

    for n in 0..band_len {
        low_band[n] = 0.5 * (filtered_odd[n] + filtered_even[n]);
        high_band[n] = 0.5 * (filtered_odd[n] - filtered_even[n]);
    }
}

/// Merge half-rate low and high bands back into a full-rate signal.
pub(crate) fn synthesis(
    low_band: &[f32],
    high_band: &[f32],
    output: &mut [f32],
    state: &mut QmfState,
) {
    let band_len = low_band.len();
    debug_assert!(band_len <= MAX_BAND_SAMPLES);
    debug_assert_eq!(high_band.len(), band_len);
    debug_assert_eq!(output.len(), 2 * band_len);

    let mut sum = [0.0f32; MAX_BAND_SAMPLES];
    let mut diff = [0.0f32; MAX_BAND_SAMPLES];
    for n in 0..band_len {
        sum[n] = low_band[n] + high_band[n];
        diff[n] = low_band[n] - high_band[n];
    }

    let mut filtered_sum = [0.0f32; MAX_BAND_SAMPLES];
    let mut filtered_diff = [0.0f32; MAX_BAND_SAMPLES];
    all_pass_chain(
        &mut sum[..band_len],
        &mut filtered_sum[..band_len],
        &ALL_PASS_BRANCH_2,
        &mut state.synthesis_state1,
    );
    all_pass_chain(
        &mut diff[..band_len],
        &mut filtered_diff[..band_len],
        &ALL_PASS_BRANCH_1,
        &mut state.synthesis_state2,
    );

    for n in 0..band_len {
        output[2 * n] = filtered_diff[n].clamp(-32768.0, 32767.0);
        output[2 * n + 1] = filtered_sum[n].clamp(-32768.0, 32767.0);
    }
}

//! End-to-end behaviour of the suppressor across rates and channel
//! layouts.

use hush::{AudioFrame, Config, NoiseSuppressor, SuppressionLevel};

/// Deterministic pseudo-random generator for noise-like input.
struct XorShift(u32);

impl XorShift {
    fn next_f32(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

fn config(rate: usize, channels: usize, level: SuppressionLevel) -> Config {
    Config {
        suppression_level: level,
        sample_rate_hz: rate,
        num_channels: channels,
    }
}

#[test]
fn identical_runs_are_bit_identical() {
    let cfg = config(16_000, 1, SuppressionLevel::Moderate12dB);
    let mut first = NoiseSuppressor::new(cfg).unwrap();
    let mut second = NoiseSuppressor::new(cfg).unwrap();
    let mut frame_a = AudioFrame::new(16_000, 1).unwrap();
    let mut frame_b = AudioFrame::new(16_000, 1).unwrap();

    let mut rng = XorShift(0x0bad_5eed);
    for _ in 0..300 {
        let samples: Vec<f32> = (0..160).map(|_| rng.next_f32() * 2000.0).collect();

        frame_a.copy_from_interleaved(&samples).unwrap();
        first.process(&mut frame_a).unwrap();
        let mut out_a = vec![0.0f32; 160];
        frame_a.copy_to_interleaved(&mut out_a).unwrap();

        frame_b.copy_from_interleaved(&samples).unwrap();
        second.process(&mut frame_b).unwrap();
        let mut out_b = vec![0.0f32; 160];
        frame_b.copy_to_interleaved(&mut out_b).unwrap();

        let bits_a: Vec<u32> = out_a.iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u32> = out_b.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }
}

#[test]
fn white_noise_at_16k_is_suppressed_below_one_fifth() {
    // White noise at amplitude 1000 under the 18 dB level; once the
    // estimators have settled the output must sit at most at a fifth of
    // the input.
    let mut ns = NoiseSuppressor::new(config(16_000, 1, SuppressionLevel::High18dB)).unwrap();
    let mut frame = AudioFrame::new(16_000, 1).unwrap();
    let mut rng = XorShift(0x1357_9bdf);

    let mut input_energy = 0.0f64;
    let mut output_energy = 0.0f64;
    for f in 0..400 {
        let samples: Vec<f32> = (0..160).map(|_| rng.next_f32() * 1000.0).collect();
        frame.copy_from_interleaved(&samples).unwrap();
        ns.process(&mut frame).unwrap();
        let mut out = vec![0.0f32; 160];
        frame.copy_to_interleaved(&mut out).unwrap();

        if f >= 300 {
            input_energy += samples.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();
            output_energy += out.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();
        }
    }

    let rms_ratio = (output_energy / input_energy).sqrt();
    assert!(rms_ratio <= 0.20, "rms ratio {rms_ratio}");
}

#[test]
fn voiced_bursts_at_16k_pass_mostly_unattenuated() {
    // 440 Hz bursts at amplitude 8000 over a weak noise bed; measured
    // over the last second, the signal must keep at least 3/4 of its
    // level.
    let mut ns = NoiseSuppressor::new(config(16_000, 1, SuppressionLevel::Moderate12dB)).unwrap();
    let mut frame = AudioFrame::new(16_000, 1).unwrap();
    let mut rng = XorShift(0x2468_ace0);

    let mut input_energy = 0.0f64;
    let mut output_energy = 0.0f64;
    for f in 0..400 {
        let burst_on = f % 35 < 5;
        let samples: Vec<f32> = (0..160)
            .map(|n| {
                let t = (f * 160 + n) as f32 / 16000.0;
                let tone = if burst_on {
                    (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 8000.0
                } else {
                    0.0
                };
                tone + rng.next_f32() * 100.0
            })
            .collect();
        frame.copy_from_interleaved(&samples).unwrap();
        ns.process(&mut frame).unwrap();
        let mut out = vec![0.0f32; 160];
        frame.copy_to_interleaved(&mut out).unwrap();

        if f >= 280 {
            input_energy += samples.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();
            output_energy += out.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();
        }
    }

    let rms_ratio = (output_energy / input_energy).sqrt();
    assert!(rms_ratio >= 0.75, "rms ratio {rms_ratio}");
}

#[test]
fn five_seconds_of_silence_at_48k_stay_exactly_zero() {
    let mut ns = NoiseSuppressor::new(config(48_000, 1, SuppressionLevel::VeryHigh21dB)).unwrap();
    let mut frame = AudioFrame::new(48_000, 1).unwrap();
    let zeros = vec![0.0f32; 480];
    let mut out = vec![1.0f32; 480];

    for _ in 0..500 {
        frame.copy_from_interleaved(&zeros).unwrap();
        ns.process(&mut frame).unwrap();
        frame.copy_to_interleaved(&mut out).unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }
}

#[test]
fn stereo_at_8k_shares_gain_and_preserves_phase() {
    // Identical content with inverted polarity on the second channel:
    // cross-channel feature averaging must give both channels the same
    // gain, so the polarity relation survives processing exactly.
    let mut ns = NoiseSuppressor::new(config(8_000, 2, SuppressionLevel::Moderate12dB)).unwrap();
    let mut frame = AudioFrame::new(8_000, 2).unwrap();
    let mut rng = XorShift(0xfeed_f00d);

    for f in 0..300 {
        let mono: Vec<f32> = (0..80)
            .map(|n| {
                let t = (f * 80 + n) as f32 / 8000.0;
                (2.0 * std::f32::consts::PI * 350.0 * t).sin() * 4000.0 + rng.next_f32() * 150.0
            })
            .collect();
        let interleaved: Vec<f32> = mono.iter().flat_map(|&s| [s, -s]).collect();
        frame.copy_from_interleaved(&interleaved).unwrap();
        ns.process(&mut frame).unwrap();

        for n in 0..80 {
            let a = frame.channel(0)[n];
            let b = frame.channel(1)[n];
            assert!(
                (a + b).abs() <= 1e-3 * a.abs().max(1.0),
                "frame {f}, sample {n}: {a} vs {b}"
            );
        }
    }
}

#[test]
fn white_noise_at_32k_is_attenuated_in_both_bands() {
    let mut ns = NoiseSuppressor::new(config(32_000, 1, SuppressionLevel::Moderate12dB)).unwrap();
    let mut frame = AudioFrame::new(32_000, 1).unwrap();
    let mut rng = XorShift(0x600d_cafe);

    let mut input_energy = 0.0f64;
    let mut output_energy = 0.0f64;
    for f in 0..400 {
        let samples: Vec<f32> = (0..320).map(|_| rng.next_f32() * 1000.0).collect();
        frame.copy_from_interleaved(&samples).unwrap();
        ns.process(&mut frame).unwrap();
        let mut out = vec![0.0f32; 320];
        frame.copy_to_interleaved(&mut out).unwrap();

        if f >= 300 {
            input_energy += samples.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();
            output_energy += out.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();
        }
    }

    let rms_ratio = (output_energy / input_energy).sqrt();
    assert!(rms_ratio <= 0.5, "rms ratio {rms_ratio}");
}

#[test]
fn analyze_warms_the_estimators_for_process() {
    // Warm one suppressor with analyze() on the noise bed, keep another
    // cold; right after a speech onset the warmed one must attenuate
    // the noise more strongly from the start.
    let cfg = config(16_000, 1, SuppressionLevel::High18dB);
    let mut warmed = NoiseSuppressor::new(cfg).unwrap();
    let mut cold = NoiseSuppressor::new(cfg).unwrap();
    let mut frame = AudioFrame::new(16_000, 1).unwrap();

    let mut rng = XorShift(0x7e57_ab1e);
    for _ in 0..250 {
        let samples: Vec<f32> = (0..160).map(|_| rng.next_f32() * 1000.0).collect();
        frame.copy_from_interleaved(&samples).unwrap();
        warmed.analyze(&frame).unwrap();
    }

    let mut warmed_energy = 0.0f64;
    let mut cold_energy = 0.0f64;
    for _ in 0..20 {
        let samples: Vec<f32> = (0..160).map(|_| rng.next_f32() * 1000.0).collect();

        frame.copy_from_interleaved(&samples).unwrap();
        warmed.process(&mut frame).unwrap();
        let mut out = vec![0.0f32; 160];
        frame.copy_to_interleaved(&mut out).unwrap();
        warmed_energy += out.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();

        frame.copy_from_interleaved(&samples).unwrap();
        cold.process(&mut frame).unwrap();
        frame.copy_to_interleaved(&mut out).unwrap();
        cold_energy += out.iter().map(|&v| (v as f64).powi(2)).sum::<f64>();
    }

    assert!(
        warmed_energy < cold_energy,
        "warmed {warmed_energy} should attenuate more than cold {cold_energy}"
    );
}

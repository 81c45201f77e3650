//! WAV-file denoising harness.
//!
//! Reads a 16-bit PCM WAV file, runs every 10 ms chunk through the
//! noise suppressor, and writes the result next to the input (or to an
//! explicit output path). A trailing chunk shorter than 10 ms is passed
//! through unprocessed so the output keeps the input's sample count.
//!
//! ```sh
//! cargo run -p hush --example denoise -- input.wav
//! cargo run -p hush --example denoise -- input.wav cleaned.wav
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use hush::{AudioFrame, Config, NoiseSuppressor};

/// `name.ext` → `name_out.ext`.
fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let mut name = format!("{stem}_out");
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(name)
}

fn run(input_path: &Path, output_path: &Path) -> Result<(), String> {
    let mut reader =
        hound::WavReader::open(input_path).map_err(|e| format!("cannot open input: {e}"))?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err("only 16-bit integer PCM input is supported".into());
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .map_err(|e| format!("cannot decode input: {e}"))?;

    let config = Config {
        sample_rate_hz: spec.sample_rate as usize,
        num_channels: spec.channels as usize,
        ..Config::default()
    };
    let mut suppressor =
        NoiseSuppressor::new(config).map_err(|e| format!("cannot configure suppressor: {e}"))?;
    let mut frame = AudioFrame::new(config.sample_rate_hz, config.num_channels)
        .map_err(|e| format!("cannot allocate frame: {e}"))?;

    let chunk_len = config.num_channels * config.samples_per_frame();
    let mut output = Vec::with_capacity(samples.len());
    let mut chunk_out = vec![0i16; chunk_len];

    let started = Instant::now();
    let mut chunks = samples.chunks_exact(chunk_len);
    for chunk in &mut chunks {
        frame
            .copy_from_interleaved_i16(chunk)
            .map_err(|e| e.to_string())?;
        suppressor.process(&mut frame).map_err(|e| e.to_string())?;
        frame
            .copy_to_interleaved_i16(&mut chunk_out)
            .map_err(|e| e.to_string())?;
        output.extend_from_slice(&chunk_out);
    }
    output.extend_from_slice(chunks.remainder());
    let elapsed = started.elapsed();

    let mut writer =
        hound::WavWriter::create(output_path, spec).map_err(|e| format!("cannot create output: {e}"))?;
    for &sample in &output {
        writer
            .write_sample(sample)
            .map_err(|e| format!("cannot write output: {e}"))?;
    }
    writer
        .finalize()
        .map_err(|e| format!("cannot finalize output: {e}"))?;

    println!(
        "processed {} samples at {} Hz in {} ms",
        output.len(),
        spec.sample_rate,
        elapsed.as_millis()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let (input, output) = match args.len() {
        2 => {
            let input = PathBuf::from(&args[1]);
            let output = derive_output_path(&input);
            (input, output)
        }
        3 => (PathBuf::from(&args[1]), PathBuf::from(&args[2])),
        _ => {
            eprintln!("usage: {} INPUT.wav [OUTPUT.wav]", args[0]);
            return ExitCode::FAILURE;
        }
    };

    match run(&input, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

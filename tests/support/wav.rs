use std::path::Path;

pub const TEST_RATE: u32 = 8_000;

/// Write 32-bit float samples as a WAV fixture.
pub fn write_test_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in samples {
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Mono signal built from `(duration_ms, amplitude)` spans.
///
/// Non-zero spans alternate sign each sample so their RMS equals the amplitude.
pub fn spans(parts: &[(u64, f32)], sample_rate: u32) -> Vec<f32> {
    let mut samples = Vec::new();
    for &(ms, amplitude) in parts {
        let frames = (ms * sample_rate as u64 / 1000) as usize;
        samples.extend((0..frames).map(|idx| if idx % 2 == 0 { amplitude } else { -amplitude }));
    }
    samples
}

/// Interleave a mono signal into `channels` identical channels.
pub fn to_channels(mono: &[f32], channels: u16) -> Vec<f32> {
    mono.iter()
        .flat_map(|&sample| std::iter::repeat_n(sample, channels as usize))
        .collect()
}

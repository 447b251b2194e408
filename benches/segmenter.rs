use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pausetrim::audio::AudioBuffer;
use pausetrim::config::SEEK_STEP_MS;
use pausetrim::silence::segment;

const SAMPLE_RATE: u32 = 44_100;
const MINUTES: u64 = 10;

/// Stereo talk-like signal: 4 s of tone, then a pause that grows from 0.5 s to 3 s.
fn synthetic_talk() -> AudioBuffer {
    let total_frames = (MINUTES * 60 * SAMPLE_RATE as u64) as usize;
    let mut samples = Vec::with_capacity(total_frames * 2);
    let mut frame = 0usize;
    let mut pause_ms = 500u64;
    while frame < total_frames {
        let speech = (4 * SAMPLE_RATE) as usize;
        for idx in 0..speech.min(total_frames - frame) {
            let value = ((idx as f32) * 0.05).sin() * 0.4;
            samples.extend_from_slice(&[value, value]);
        }
        frame += speech;
        let pause = (pause_ms * SAMPLE_RATE as u64 / 1000) as usize;
        let pause = pause.min(total_frames.saturating_sub(frame));
        samples.extend(std::iter::repeat_n(0.001, pause * 2));
        frame += pause;
        pause_ms = if pause_ms >= 3_000 { 500 } else { pause_ms + 500 };
    }
    AudioBuffer::new(samples, SAMPLE_RATE, 2)
}

fn bench_segment(c: &mut Criterion) {
    let buffer = synthetic_talk();
    for min_silence_ms in [500u64, 2_000, 5_000] {
        c.bench_with_input(
            BenchmarkId::new("segment_10min_stereo", min_silence_ms),
            &buffer,
            |b, buffer| {
                b.iter(|| {
                    segment(black_box(buffer), -40.0, min_silence_ms, SEEK_STEP_MS)
                        .expect("segment");
                });
            },
        );
    }
}

criterion_group!(benches, bench_segment);
criterion_main!(benches);

use thiserror::Error;

use super::Interval;
use crate::audio::{AudioBuffer, level::db_to_linear};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// The buffer holds no audio, or less than a millisecond of it.
    #[error("Cannot segment an empty audio buffer")]
    EmptyBuffer,
}

/// Split `buffer` into the non-silent intervals that remain once every
/// silence of at least `min_silence_ms` is cut out.
///
/// A window of `min_silence_ms` slides across the buffer in `seek_step_ms`
/// steps. Windows whose RMS sits at or below `threshold_db` (dBFS) are silent,
/// and overlapping silent windows merge into one silent range. Dips shorter
/// than a full window never qualify, so they stay inside the surrounding
/// non-silent interval.
pub fn segment(
    buffer: &AudioBuffer,
    threshold_db: f32,
    min_silence_ms: u64,
    seek_step_ms: u64,
) -> Result<Vec<Interval>, SegmentError> {
    let duration_ms = buffer.duration_ms();
    if buffer.is_empty() || duration_ms == 0 {
        return Err(SegmentError::EmptyBuffer);
    }
    let silent = detect_silence(buffer, threshold_db, min_silence_ms, seek_step_ms);
    let nonsilent = complement(&silent, duration_ms);
    tracing::debug!(
        "Segmented {duration_ms} ms at {threshold_db} dB: {} silent range(s), {} non-silent interval(s)",
        silent.len(),
        nonsilent.len()
    );
    Ok(nonsilent)
}

/// Ordered silent ranges, each at least `min_silence_ms` long.
pub fn detect_silence(
    buffer: &AudioBuffer,
    threshold_db: f32,
    min_silence_ms: u64,
    seek_step_ms: u64,
) -> Vec<Interval> {
    let min_silence_ms = min_silence_ms.max(1);
    let seek_step_ms = seek_step_ms.max(1);
    let duration_ms = buffer.duration_ms();
    if buffer.is_empty() || duration_ms < min_silence_ms {
        return Vec::new();
    }

    let energy = EnergyIndex::new(buffer);
    let threshold = db_to_linear(threshold_db) as f64;
    let last_start = duration_ms - min_silence_ms;

    let mut ranges = Vec::new();
    // (start of the open silent range, start of the last silent window)
    let mut open: Option<(u64, u64)> = None;
    for start in window_starts(last_start, seek_step_ms) {
        let rms = energy.window_rms(
            buffer.frame_at_ms(start),
            buffer.frame_at_ms(start + min_silence_ms),
        );
        if rms > threshold {
            continue;
        }
        open = match open {
            None => Some((start, start)),
            Some((range_start, prev)) => {
                let continuous = start == prev + seek_step_ms;
                let has_gap = start > prev + min_silence_ms;
                if !continuous && has_gap {
                    ranges.push(Interval::new(range_start, prev + min_silence_ms));
                    Some((start, start))
                } else {
                    Some((range_start, start))
                }
            }
        };
    }
    if let Some((range_start, prev)) = open {
        ranges.push(Interval::new(range_start, prev + min_silence_ms));
    }
    ranges
}

/// Window starts every `step` up to `last_start`, always ending on `last_start`.
fn window_starts(last_start: u64, step: u64) -> impl Iterator<Item = u64> {
    let step_usize = usize::try_from(step).unwrap_or(usize::MAX);
    let tail = (last_start % step != 0).then_some(last_start);
    (0..=last_start).step_by(step_usize).chain(tail)
}

fn complement(silent: &[Interval], duration_ms: u64) -> Vec<Interval> {
    let Some(first) = silent.first() else {
        return vec![Interval::new(0, duration_ms)];
    };
    if first.start_ms == 0 && first.end_ms >= duration_ms {
        return Vec::new();
    }
    let mut nonsilent = Vec::with_capacity(silent.len() + 1);
    let mut cursor = 0;
    for range in silent {
        if range.start_ms > cursor {
            nonsilent.push(Interval::new(cursor, range.start_ms));
        }
        cursor = range.end_ms;
    }
    if cursor < duration_ms {
        nonsilent.push(Interval::new(cursor, duration_ms));
    }
    nonsilent
}

/// Prefix sums of per-frame energy so any window's RMS costs O(1).
struct EnergyIndex {
    prefix: Vec<f64>,
    channels: usize,
}

impl EnergyIndex {
    fn new(buffer: &AudioBuffer) -> Self {
        let channels = buffer.channels() as usize;
        let mut prefix = Vec::with_capacity(buffer.frames() + 1);
        let mut total = 0.0_f64;
        prefix.push(total);
        for frame in buffer.samples().chunks_exact(channels) {
            total += frame.iter().map(|&s| s as f64 * s as f64).sum::<f64>();
            prefix.push(total);
        }
        Self { prefix, channels }
    }

    /// RMS over every sample of frames `[start, end)`.
    fn window_rms(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        let sum = (self.prefix[end] - self.prefix[start]).max(0.0);
        (sum / ((end - start) * self.channels) as f64).sqrt()
    }
}

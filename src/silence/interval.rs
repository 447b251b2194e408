use serde::Serialize;

/// Half-open time range `[start_ms, end_ms)` within a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Interval {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        debug_assert!(start_ms <= end_ms, "interval start after end");
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }
}

/// Fuse consecutive intervals separated by less than `min_gap_ms`.
///
/// Only gaps that would show up in the pause preview survive, so removal
/// matches what was previewed. Input must be ordered.
pub fn merge_short_gaps(intervals: &[Interval], min_gap_ms: u64) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for &interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start_ms.saturating_sub(last.end_ms) < min_gap_ms => {
                last.end_ms = last.end_ms.max(interval.end_ms);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

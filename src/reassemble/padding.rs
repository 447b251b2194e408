use crate::silence::Interval;

/// How padded intervals that run into each other are extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Fuse overlapping padded intervals so no audio is repeated.
    #[default]
    Merge,
    /// Extract every padded interval as-is; overlapping audio plays twice.
    Duplicate,
}

/// Widen each interval by the pre/post-roll, clamped to `[0, duration_ms]`.
pub fn pad_intervals(
    intervals: &[Interval],
    preroll_ms: u64,
    postroll_ms: u64,
    duration_ms: u64,
) -> Vec<Interval> {
    intervals
        .iter()
        .map(|interval| {
            Interval::new(
                interval.start_ms.saturating_sub(preroll_ms),
                interval
                    .end_ms
                    .saturating_add(postroll_ms)
                    .min(duration_ms),
            )
        })
        .collect()
}

/// Fuse intervals that overlap or touch. Input must be ordered by start.
pub fn merge_overlapping(intervals: &[Interval]) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for &interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start_ms <= last.end_ms => {
                last.end_ms = last.end_ms.max(interval.end_ms);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

use serde::Serialize;

use super::Interval;

/// A gap between two non-silent intervals long enough to be removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pause {
    /// 1-based position in the preview table.
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Pause {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }
}

/// Pauses that pass the minimum-length filter and their combined length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PauseReport {
    pub pauses: Vec<Pause>,
    pub total_silence_ms: u64,
}

impl PauseReport {
    pub fn is_empty(&self) -> bool {
        self.pauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pauses.len()
    }

    pub fn total_silence_seconds(&self) -> f64 {
        self.total_silence_ms as f64 / 1000.0
    }
}

/// Collect the gaps between consecutive intervals that last at least `min_silence_ms`.
pub fn derive_pauses(intervals: &[Interval], min_silence_ms: u64) -> PauseReport {
    let mut report = PauseReport::default();
    for pair in intervals.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        let gap = next.start_ms.saturating_sub(current.end_ms);
        if gap < min_silence_ms {
            continue;
        }
        report.pauses.push(Pause {
            index: report.pauses.len() + 1,
            start_ms: current.end_ms,
            end_ms: next.start_ms,
        });
        report.total_silence_ms += gap;
    }
    report
}

/// Headline numbers for an analysis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SilenceSummary {
    pub speech_segments: usize,
    pub pause_count: usize,
    pub total_silence_ms: u64,
    /// Share of the original duration covered by reported pauses.
    pub silence_percent: f64,
}

impl SilenceSummary {
    pub fn new(intervals: &[Interval], report: &PauseReport, duration_ms: u64) -> Self {
        let silence_percent = if duration_ms == 0 {
            0.0
        } else {
            report.total_silence_ms as f64 / duration_ms as f64 * 100.0
        };
        Self {
            speech_segments: intervals.len(),
            pause_count: report.len(),
            total_silence_ms: report.total_silence_ms,
            silence_percent,
        }
    }
}

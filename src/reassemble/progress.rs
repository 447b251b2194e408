/// Phase of a reassembly run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressStage {
    /// Joining padded segments.
    Stitching,
    /// Applying the loudness gain.
    Normalizing,
    Complete,
}

/// Snapshot emitted while reassembling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub stage: ProgressStage,
    /// Overall completion, 0..=100. Stitching covers 0..=90.
    pub percent: u8,
    pub segments_done: usize,
    pub segments_total: usize,
}

impl Progress {
    pub(super) fn stitching(segments_done: usize, segments_total: usize) -> Self {
        let percent = segments_done.min(segments_total) * 90 / segments_total.max(1);
        Self {
            stage: ProgressStage::Stitching,
            percent: percent as u8,
            segments_done,
            segments_total,
        }
    }

    pub(super) fn normalizing(segments_total: usize) -> Self {
        Self {
            stage: ProgressStage::Normalizing,
            percent: 95,
            segments_done: segments_total,
            segments_total,
        }
    }

    pub(super) fn complete(segments_total: usize) -> Self {
        Self {
            stage: ProgressStage::Complete,
            percent: 100,
            segments_done: segments_total,
            segments_total,
        }
    }

    /// Short status line for display.
    pub fn label(&self) -> String {
        match self.stage {
            ProgressStage::Stitching => format!(
                "Processing segment {}/{}",
                self.segments_done, self.segments_total
            ),
            ProgressStage::Normalizing => "Normalizing loudness".to_string(),
            ProgressStage::Complete => "Complete".to_string(),
        }
    }
}

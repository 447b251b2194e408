//! Silence segmentation and the pause preview derived from it.
//!
//! [`segment`] classifies a buffer into non-silent [`Interval`]s; the pause
//! helpers turn that interval list into the table shown before processing.

mod interval;
mod pauses;
mod segmenter;

pub use interval::{Interval, merge_short_gaps};
pub use pauses::{Pause, PauseReport, SilenceSummary, derive_pauses};
pub use segmenter::{SegmentError, detect_silence, segment};

//! Rebuilds audio from kept intervals.
//!
//! Each interval is widened by pre/post-roll, the widened segments are joined
//! with short equal-power crossfades, and the result is peak-normalized to a
//! fixed headroom below full scale.

mod crossfade;
mod normalize;
mod padding;
mod progress;

use thiserror::Error;

use crate::audio::{AudioBuffer, ms_to_frames};
use crate::silence::Interval;

pub use padding::{OverlapPolicy, merge_overlapping, pad_intervals};
pub use progress::{Progress, ProgressStage};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReassembleError {
    #[error("Cannot reassemble an empty audio buffer")]
    EmptyBuffer,
    /// Nothing non-silent was found, so there is no audio to keep.
    #[error("No non-silent intervals to keep")]
    NoIntervals,
    #[error("Interval {index} ({start_ms}..{end_ms} ms) is empty or outside the buffer")]
    InvalidInterval {
        index: usize,
        start_ms: u64,
        end_ms: u64,
    },
    #[error("Interval {index} starts before the previous interval ends")]
    Unordered { index: usize },
}

/// Padding, crossfade and loudness settings for [`reassemble`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReassemblyParams {
    pub preroll_ms: u64,
    pub postroll_ms: u64,
    pub crossfade_ms: u64,
    /// Output peak sits this many dB below full scale.
    pub headroom_db: f32,
    pub overlap: OverlapPolicy,
}

impl Default for ReassemblyParams {
    fn default() -> Self {
        Self {
            preroll_ms: 100,
            postroll_ms: 150,
            crossfade_ms: 60,
            headroom_db: 1.0,
            overlap: OverlapPolicy::Merge,
        }
    }
}

/// Pad, join and normalize `intervals` of `buffer` into a new buffer.
///
/// `on_progress` is called after every stitched segment and once for each
/// of the normalize and complete stages.
pub fn reassemble<F>(
    buffer: &AudioBuffer,
    intervals: &[Interval],
    params: &ReassemblyParams,
    mut on_progress: F,
) -> Result<AudioBuffer, ReassembleError>
where
    F: FnMut(Progress),
{
    let segments = plan_segments(buffer, intervals, params)?;
    let mut samples = stitch(buffer, &segments, params.crossfade_ms, &mut on_progress);

    on_progress(Progress::normalizing(segments.len()));
    match normalize::normalize_to_headroom(&mut samples, params.headroom_db) {
        Some(gain) => tracing::debug!("Normalized output with gain {gain:.3}"),
        None => tracing::debug!("Output is silent; skipped normalization"),
    }
    on_progress(Progress::complete(segments.len()));

    Ok(AudioBuffer::new(
        samples,
        buffer.sample_rate(),
        buffer.channels(),
    ))
}

/// Pad and join without normalizing or reporting progress.
pub fn reassemble_raw(
    buffer: &AudioBuffer,
    intervals: &[Interval],
    params: &ReassemblyParams,
) -> Result<AudioBuffer, ReassembleError> {
    let segments = plan_segments(buffer, intervals, params)?;
    let samples = stitch(buffer, &segments, params.crossfade_ms, &mut |_: Progress| {});
    Ok(AudioBuffer::new(
        samples,
        buffer.sample_rate(),
        buffer.channels(),
    ))
}

/// Padded segments that will be extracted, in output order.
pub fn plan_segments(
    buffer: &AudioBuffer,
    intervals: &[Interval],
    params: &ReassemblyParams,
) -> Result<Vec<Interval>, ReassembleError> {
    if buffer.is_empty() {
        return Err(ReassembleError::EmptyBuffer);
    }
    if intervals.is_empty() {
        return Err(ReassembleError::NoIntervals);
    }
    let duration_ms = buffer.duration_ms();
    validate(intervals, duration_ms)?;
    let padded = pad_intervals(
        intervals,
        params.preroll_ms,
        params.postroll_ms,
        duration_ms,
    );
    Ok(match params.overlap {
        OverlapPolicy::Merge => merge_overlapping(&padded),
        OverlapPolicy::Duplicate => padded,
    })
}

fn validate(intervals: &[Interval], duration_ms: u64) -> Result<(), ReassembleError> {
    let mut previous_end = 0;
    for (index, interval) in intervals.iter().enumerate() {
        if interval.start_ms >= interval.end_ms || interval.start_ms >= duration_ms {
            return Err(ReassembleError::InvalidInterval {
                index,
                start_ms: interval.start_ms,
                end_ms: interval.end_ms,
            });
        }
        if index > 0 && interval.start_ms < previous_end {
            return Err(ReassembleError::Unordered { index });
        }
        previous_end = interval.end_ms;
    }
    Ok(())
}

fn stitch(
    buffer: &AudioBuffer,
    segments: &[Interval],
    crossfade_ms: u64,
    on_progress: &mut dyn FnMut(Progress),
) -> Vec<f32> {
    let channels = buffer.channels() as usize;
    let fade_frames = ms_to_frames(crossfade_ms, buffer.sample_rate());
    let capacity: usize = segments
        .iter()
        .map(|segment| buffer.slice_ms(segment.start_ms, segment.end_ms).len())
        .sum();
    let mut output = Vec::with_capacity(capacity);
    let mut blended_frames = 0usize;
    for (index, segment) in segments.iter().enumerate() {
        let audio = buffer.slice_ms(segment.start_ms, segment.end_ms);
        if index == 0 {
            output.extend_from_slice(audio);
        } else {
            blended_frames +=
                crossfade::append_with_crossfade(&mut output, audio, channels, fade_frames);
        }
        on_progress(Progress::stitching(index + 1, segments.len()));
    }
    tracing::debug!(
        "Stitched {} segment(s), {blended_frames} frame(s) crossfaded",
        segments.len()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 1_000;

    fn ramp(frames: usize) -> AudioBuffer {
        let samples = (0..frames).map(|idx| (idx % 100) as f32 / 200.0).collect();
        AudioBuffer::new(samples, RATE, 1)
    }

    fn no_fade_no_pad() -> ReassemblyParams {
        ReassemblyParams {
            preroll_ms: 0,
            postroll_ms: 0,
            crossfade_ms: 0,
            headroom_db: 1.0,
            overlap: OverlapPolicy::Merge,
        }
    }

    #[test]
    fn pads_and_crossfades_documented_scenario() {
        let buffer = ramp(10_000);
        let intervals = [Interval::new(0, 3_000), Interval::new(6_000, 10_000)];
        let params = ReassemblyParams::default();
        let segments = plan_segments(&buffer, &intervals, &params).unwrap();
        assert_eq!(
            segments,
            vec![Interval::new(0, 3_150), Interval::new(5_900, 10_000)]
        );
        let output = reassemble(&buffer, &intervals, &params, |_| {}).unwrap();
        assert_eq!(output.duration_ms(), 3_150 + 4_100 - 60);
    }

    #[test]
    fn zero_fade_and_padding_is_exact_concatenation() {
        let buffer = ramp(5_000);
        let intervals = [
            Interval::new(100, 900),
            Interval::new(2_000, 2_500),
            Interval::new(4_000, 5_000),
        ];
        let output = reassemble_raw(&buffer, &intervals, &no_fade_no_pad()).unwrap();
        let mut expected = Vec::new();
        for interval in &intervals {
            expected.extend_from_slice(buffer.slice_ms(interval.start_ms, interval.end_ms));
        }
        assert_eq!(output.samples(), expected.as_slice());
    }

    #[test]
    fn output_duration_respects_bounds() {
        let buffer = ramp(12_000);
        let intervals = [
            Interval::new(500, 2_000),
            Interval::new(4_000, 4_030),
            Interval::new(7_000, 11_900),
        ];
        let params = ReassemblyParams::default();
        let output = reassemble(&buffer, &intervals, &params, |_| {}).unwrap();
        let raw: u64 = intervals.iter().map(Interval::duration_ms).sum();
        let padding = (params.preroll_ms + params.postroll_ms) * intervals.len() as u64;
        let fades = params.crossfade_ms * (intervals.len() as u64 - 1);
        assert!(output.duration_ms() <= raw + padding);
        assert!(output.duration_ms() >= raw - fades);
    }

    #[test]
    fn overlapping_padding_is_merged_by_default() {
        let buffer = ramp(4_000);
        let intervals = [Interval::new(0, 1_000), Interval::new(1_200, 2_000)];
        let segments = plan_segments(&buffer, &intervals, &ReassemblyParams::default()).unwrap();
        assert_eq!(segments, vec![Interval::new(0, 2_150)]);
    }

    #[test]
    fn duplicate_policy_keeps_overlapping_segments() {
        let buffer = ramp(4_000);
        let intervals = [Interval::new(0, 1_000), Interval::new(1_200, 2_000)];
        let params = ReassemblyParams {
            overlap: OverlapPolicy::Duplicate,
            ..ReassemblyParams::default()
        };
        let segments = plan_segments(&buffer, &intervals, &params).unwrap();
        assert_eq!(
            segments,
            vec![Interval::new(0, 1_150), Interval::new(1_100, 2_150)]
        );
        let output = reassemble_raw(&buffer, &intervals, &params).unwrap();
        assert_eq!(output.duration_ms(), 1_150 + 1_050 - 60);
    }

    #[test]
    fn output_peak_sits_at_headroom() {
        let buffer = ramp(3_000);
        let output = reassemble(
            &buffer,
            &[Interval::new(0, 3_000)],
            &ReassemblyParams::default(),
            |_| {},
        )
        .unwrap();
        let peak = crate::audio::level::peak(output.samples());
        assert!((crate::audio::level::linear_to_db(peak) + 1.0).abs() < 1e-3);
    }

    #[test]
    fn progress_runs_through_every_stage() {
        let buffer = ramp(6_000);
        let intervals = [
            Interval::new(0, 1_000),
            Interval::new(2_500, 3_000),
            Interval::new(5_000, 6_000),
        ];
        let mut updates = Vec::new();
        reassemble(&buffer, &intervals, &ReassemblyParams::default(), |p| {
            updates.push(p)
        })
        .unwrap();
        let percents: Vec<u8> = updates.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![30, 60, 90, 95, 100]);
        assert_eq!(updates.last().map(|p| p.stage), Some(ProgressStage::Complete));
    }

    #[test]
    fn rejects_empty_and_malformed_input() {
        let buffer = ramp(1_000);
        let params = ReassemblyParams::default();
        assert_eq!(
            plan_segments(&buffer, &[], &params),
            Err(ReassembleError::NoIntervals)
        );
        assert_eq!(
            plan_segments(&buffer, &[Interval::new(2_000, 3_000)], &params),
            Err(ReassembleError::InvalidInterval {
                index: 0,
                start_ms: 2_000,
                end_ms: 3_000
            })
        );
        assert_eq!(
            plan_segments(
                &buffer,
                &[Interval::new(500, 900), Interval::new(100, 200)],
                &params
            ),
            Err(ReassembleError::Unordered { index: 1 })
        );
        let empty = AudioBuffer::new(Vec::new(), RATE, 1);
        assert_eq!(
            plan_segments(&empty, &[Interval::new(0, 1)], &params),
            Err(ReassembleError::EmptyBuffer)
        );
    }
}

use std::ops::Range;

/// Interleaved `f32` audio at full scale `[-1.0, 1.0]` with its format.
///
/// Time offsets are addressed in whole milliseconds; a millisecond maps to the
/// frame `floor(ms * sample_rate / 1000)`, clamped to the buffer length.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    /// Wrap interleaved samples. A trailing partial frame is dropped.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % channels as usize;
        samples.truncate(whole);
        Self {
            samples,
            sample_rate: sample_rate.max(1),
            channels,
        }
    }

    /// Buffer of `frames` zeroed frames.
    pub fn silent(frames: usize, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        Self::new(
            vec![0.0; frames.saturating_mul(channels as usize)],
            sample_rate,
            channels,
        )
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length rounded to the nearest millisecond.
    pub fn duration_ms(&self) -> u64 {
        let frames = self.frames() as u128;
        let rate = self.sample_rate as u128;
        u64::try_from((frames * 1000 + rate / 2) / rate).unwrap_or(u64::MAX)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Frame index for a millisecond offset, clamped to the buffer.
    pub fn frame_at_ms(&self, ms: u64) -> usize {
        ms_to_frames(ms, self.sample_rate).min(self.frames())
    }

    /// Interleaved samples covering `[start_ms, end_ms)`.
    pub fn slice_ms(&self, start_ms: u64, end_ms: u64) -> &[f32] {
        &self.samples[self.sample_range(start_ms, end_ms)]
    }

    fn sample_range(&self, start_ms: u64, end_ms: u64) -> Range<usize> {
        let start = self.frame_at_ms(start_ms);
        let end = self.frame_at_ms(end_ms).max(start);
        let channels = self.channels as usize;
        start * channels..end * channels
    }
}

pub(crate) fn ms_to_frames(ms: u64, sample_rate: u32) -> usize {
    let frames = ms as u128 * sample_rate as u128 / 1000;
    usize::try_from(frames).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_trailing_frame_is_dropped() {
        let buffer = AudioBuffer::new(vec![0.1, 0.2, 0.3, 0.4, 0.5], 1_000, 2);
        assert_eq!(buffer.frames(), 2);
        assert_eq!(buffer.samples(), &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn duration_rounds_to_nearest_millisecond() {
        let buffer = AudioBuffer::silent(44_100 + 30, 44_100, 1);
        assert_eq!(buffer.duration_ms(), 1_001);
        let buffer = AudioBuffer::silent(44_100 + 20, 44_100, 1);
        assert_eq!(buffer.duration_ms(), 1_000);
    }

    #[test]
    fn slice_ms_addresses_whole_frames() {
        let samples: Vec<f32> = (0..16).map(|idx| idx as f32).collect();
        let buffer = AudioBuffer::new(samples, 4_000, 2);
        // 1 ms == 4 frames == 8 interleaved samples.
        assert_eq!(buffer.slice_ms(1, 2), &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
    }

    #[test]
    fn slice_ms_clamps_past_the_end() {
        let buffer = AudioBuffer::silent(10, 1_000, 1);
        assert_eq!(buffer.slice_ms(5, 500).len(), 5);
        assert!(buffer.slice_ms(50, 60).is_empty());
    }
}

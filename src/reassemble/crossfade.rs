/// Append `segment` to `output`, blending the splice over `fade_frames` frames.
///
/// The tail of `output` fades out while the head of `segment` fades in, using
/// equal-power gains. The fade is clamped to the shorter of the two sides, so
/// the result always holds `output + segment - fade` frames. Returns the
/// number of frames actually blended.
pub(super) fn append_with_crossfade(
    output: &mut Vec<f32>,
    segment: &[f32],
    channels: usize,
    fade_frames: usize,
) -> usize {
    let channels = channels.max(1);
    let output_frames = output.len() / channels;
    let segment_frames = segment.len() / channels;
    let fade = fade_frames.min(output_frames).min(segment_frames);
    if fade == 0 {
        output.extend_from_slice(segment);
        return 0;
    }

    let tail_start = (output_frames - fade) * channels;
    let denom = fade.saturating_sub(1).max(1) as f32;
    for frame in 0..fade {
        let progress = if fade == 1 {
            0.5
        } else {
            frame as f32 / denom
        };
        let (from_gain, to_gain) = equal_power_gains(progress);
        for ch in 0..channels {
            let out_idx = tail_start + frame * channels + ch;
            let head = segment[frame * channels + ch];
            output[out_idx] = output[out_idx] * from_gain + head * to_gain;
        }
    }
    output.extend_from_slice(&segment[fade * channels..]);
    fade
}

fn equal_power_gains(progress: f32) -> (f32, f32) {
    let t = progress.clamp(0.0, 1.0);
    let angle = t * std::f32::consts::FRAC_PI_2;
    (angle.cos(), angle.sin())
}

use std::ops::RangeInclusive;

use super::KEEP_MS_RANGE;

pub(super) fn default_silence_threshold_db() -> f32 {
    -40.0
}

pub(super) fn default_min_silence_length_s() -> f32 {
    2.0
}

pub(super) fn default_keep_before_ms() -> u64 {
    100
}

pub(super) fn default_keep_after_ms() -> u64 {
    150
}

pub(super) fn clamp_f32(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}

pub(super) fn clamp_keep_ms(value: u64) -> u64 {
    value.clamp(*KEEP_MS_RANGE.start(), *KEEP_MS_RANGE.end())
}

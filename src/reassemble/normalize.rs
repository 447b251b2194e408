use crate::audio::level::{db_to_linear, peak, scale_in_place};

/// Scale `samples` so the peak sits `headroom_db` below full scale.
///
/// Returns the applied gain, or `None` when the audio is silent and was left
/// untouched.
pub(super) fn normalize_to_headroom(samples: &mut [f32], headroom_db: f32) -> Option<f32> {
    let peak = peak(samples);
    if !peak.is_finite() || peak <= 0.0 {
        return None;
    }
    let target = db_to_linear(-headroom_db.max(0.0));
    let gain = target / peak;
    scale_in_place(samples, gain);
    Some(gain)
}

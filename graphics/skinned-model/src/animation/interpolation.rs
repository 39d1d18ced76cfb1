//! Keyframe interpolation

use super::types::{Interpolate, Keyframe};

/// Find the index of the keyframe at or before the given time
///
/// Returns None if the track has no keyframes. When `time` equals a key's
/// timestamp that key is the lower bound; when several keys share the
/// timestamp the last of them is chosen. Times before the first key map to
/// index 0.
pub fn find_key_index<T>(keys: &[Keyframe<T>], time: f64) -> Option<usize> {
    if keys.is_empty() {
        return None;
    }

    // Number of keys at or before `time`
    let upper = keys.partition_point(|key| key.time <= time);
    Some(upper.saturating_sub(1))
}

/// Interpolate a keyframe track at `time` ticks
///
/// Keys must be sorted by time. Before the first key the first value is
/// returned, after the last key the last value; there is no extrapolation
/// and no wraparound. Returns None for an empty track.
pub fn interpolate<T: Interpolate>(keys: &[Keyframe<T>], time: f64) -> Option<T> {
    let index = find_key_index(keys, time)?;
    let current = &keys[index];

    if time.is_nan() || time < current.time {
        return Some(keys[0].value);
    }

    let Some(next) = keys.get(index + 1) else {
        return Some(current.value);
    };

    let span = next.time - current.time;
    let factor = if span > 0.0 {
        ((time - current.time) / span) as f32
    } else {
        0.0
    };

    Some(current.value.interpolate(&next.value, factor.clamp(0.0, 1.0)))
}

/// Whether a track's timestamps never decrease
pub fn is_sorted<T>(keys: &[Keyframe<T>]) -> bool {
    keys.windows(2).all(|pair| pair[0].time <= pair[1].time)
}

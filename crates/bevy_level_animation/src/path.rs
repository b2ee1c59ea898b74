//! Ping-pong progress and polyline interpolation

use bevy_level_core::Movement;

/// Fold any progress value into the forward position in `[0, 1]`.
///
/// Progress is taken modulo 2; the `1..2` half walks the path backward.
pub fn reflect_progress(progress: f32) -> f32 {
    let wrapped = progress.rem_euclid(2.0);
    if wrapped > 1.0 {
        2.0 - wrapped
    } else {
        wrapped
    }
}

/// Advance progress by `speed * dt` world units along a path of `length`.
///
/// Returns `None` for a zero-length path, which cannot be traversed.
pub fn advance_progress(progress: f32, speed: f32, dt: f32, length: f32) -> Option<f32> {
    if length <= 0.0 {
        return None;
    }
    Some((progress + speed * dt / length).rem_euclid(2.0))
}

/// Point on the polyline at normalized position `t` in `[0, 1]`.
///
/// `t` is spread evenly over segments, not over arc length.
pub fn point_on_path(path: &[[f32; 2]], t: f32) -> Option<[f32; 2]> {
    match path {
        [] => None,
        [only] => Some(*only),
        _ => {
            let segments = path.len() - 1;
            let scaled = t.clamp(0.0, 1.0) * segments as f32;
            let index = (scaled.floor() as usize).min(segments - 1);
            let local = scaled - index as f32;
            let (a, b) = (path[index], path[index + 1]);
            Some([a[0] + (b[0] - a[0]) * local, a[1] + (b[1] - a[1]) * local])
        }
    }
}

/// Center of a moving object at the given raw progress
pub fn center_at(movement: &Movement, progress: f32) -> Option<[f32; 2]> {
    point_on_path(&movement.path, reflect_progress(progress))
}

/// Bottom-left corner of a box of `size` centered on `center`
pub fn origin_from_center(center: [f32; 2], size: [f32; 2]) -> [f32; 2] {
    [center[0] - size[0] / 2.0, center[1] - size[1] / 2.0]
}

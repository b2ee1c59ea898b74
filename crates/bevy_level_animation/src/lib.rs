//! bevy_level_animation - Moving-platform animation for bevy_level_editor
//!
//! Platforms carry a `Movement` (waypoints plus speed). The `PlatformAnimator`
//! resource advances a ping-pong progress value per platform every frame and
//! maps it to a position on the path.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy_level_animation::PlatformAnimator;
//!
//! let mut animator = PlatformAnimator::new();
//! animator.tick(level.objects.iter(), time.delta_secs());
//! let origin = animator.position_of(&level.objects[0]);
//! ```

mod animator;
mod path;

pub use animator::PlatformAnimator;
pub use path::{advance_progress, center_at, origin_from_center, point_on_path, reflect_progress};

use bevy::prelude::*;

/// Plugin that provides the `PlatformAnimator` resource.
///
/// Driving `tick` is left to the owner of the level data.
pub struct PlatformAnimationPlugin;

impl Plugin for PlatformAnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlatformAnimator>();
    }
}

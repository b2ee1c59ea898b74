//! Per-frame scheduler for moving platforms

use crate::path::{advance_progress, center_at, origin_from_center};
use bevy::prelude::*;
use bevy_level_core::LevelObject;
use std::collections::HashMap;
use uuid::Uuid;

/// Animation progress for every moving platform in the current level.
///
/// Progress lives in `[0, 2)`: `0..1` travels the path forward, `1..2` backward.
#[derive(Resource, Debug, Default)]
pub struct PlatformAnimator {
    progress: HashMap<Uuid, f32>,
    running: bool,
}

impl PlatformAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every qualifying platform by `dt` seconds.
    ///
    /// Entries are created on first sight and dropped once their object is gone
    /// or stops moving. Returns whether the animator is still running.
    pub fn tick<'a>(&mut self, objects: impl IntoIterator<Item = &'a LevelObject>, dt: f32) -> bool {
        let mut seen = Vec::new();
        for object in objects {
            let Some(movement) = object.movement.as_ref().filter(|m| m.is_animated()) else {
                continue;
            };
            let progress = self.progress.entry(object.id).or_insert(0.0);
            if let Some(next) = advance_progress(*progress, movement.speed, dt, movement.path_length()) {
                *progress = next;
            }
            seen.push(object.id);
        }
        self.progress.retain(|id, _| seen.contains(id));
        self.running = !self.progress.is_empty();
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self, id: Uuid) -> Option<f32> {
        self.progress.get(&id).copied()
    }

    /// Restart one platform from the beginning of its path
    pub fn reset(&mut self, id: Uuid) {
        if let Some(progress) = self.progress.get_mut(&id) {
            *progress = 0.0;
        }
    }

    /// Tear down: forget all progress and stop requesting frames
    pub fn stop(&mut self) {
        self.progress.clear();
        self.running = false;
    }

    /// Bottom-left corner to draw `object` at this frame
    pub fn position_of(&self, object: &LevelObject) -> [f32; 2] {
        let center = object
            .movement
            .as_ref()
            .filter(|m| m.is_animated())
            .and_then(|m| center_at(m, self.progress(object.id).unwrap_or(0.0)));
        match center {
            Some(center) => origin_from_center(center, object.size),
            None => object.position,
        }
    }
}

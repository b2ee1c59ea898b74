//! Editor preferences and persistent settings
//!
//! Stored as JSON in the platform config directory:
//! - Windows: %APPDATA%/bevy_level_editor/
//! - Linux: ~/.config/bevy_level_editor/
//! - macOS: ~/Library/Application Support/bevy_level_editor/

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::commands::DEFAULT_UNDO_LIMIT;
use crate::{ZOOM_MAX, ZOOM_MIN};

/// Editor preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Version for future migrations
    pub version: u32,

    // View
    pub grid_size: f32,
    pub zoom: f32,
    pub show_grid: bool,

    // Saving
    /// Quiet period after the last edit before an autosave
    pub autosave_debounce_ms: u64,
    /// Backup save interval while there are unsaved edits
    pub backup_interval_secs: u64,

    pub undo_limit: usize,

    /// Where levels and the tile library are stored; the platform data dir if unset
    pub storage_dir: Option<PathBuf>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            version: 1,
            grid_size: 32.0,
            zoom: 1.0,
            show_grid: true,
            autosave_debounce_ms: 1500,
            backup_interval_secs: 60,
            undo_limit: DEFAULT_UNDO_LIMIT,
            storage_dir: None,
        }
    }
}

impl EditorPreferences {
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_secs)
    }

    /// Clamp values a hand-edited file may have pushed out of range
    pub(crate) fn sanitized(mut self) -> Self {
        self.zoom = if self.zoom.is_finite() {
            self.zoom.clamp(ZOOM_MIN, ZOOM_MAX)
        } else {
            1.0
        };
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            self.grid_size = 32.0;
        }
        self.undo_limit = self.undo_limit.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let prefs: EditorPreferences = serde_json::from_str(r#"{ "zoom": 2.0 }"#).unwrap();
        assert_eq!(prefs.zoom, 2.0);
        assert_eq!(prefs.grid_size, 32.0);
        assert_eq!(prefs.autosave_debounce(), Duration::from_millis(1500));
        assert_eq!(prefs.backup_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_sanitized_clamps() {
        let prefs = EditorPreferences {
            zoom: 12.0,
            grid_size: -4.0,
            undo_limit: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(prefs.zoom, ZOOM_MAX);
        assert_eq!(prefs.grid_size, 32.0);
        assert_eq!(prefs.undo_limit, 1);
    }
}

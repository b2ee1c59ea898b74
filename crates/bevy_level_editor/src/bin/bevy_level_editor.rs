//! Standalone level editor binary
//!
//! Run with: bevy_level_editor [LEVEL_ID]
//!
//! Opens the stored level with the given id, or creates and saves a new one.

use bevy::asset::{AssetPlugin, UnapprovedPathMode};
use bevy::image::{ImageFilterMode, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_level_editor::preferences::EditorPreferences;
use bevy_level_editor::storage::JsonDirStorage;
use bevy_level_editor::EditorPlugin;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

fn main() -> AppExit {
    let level = match std::env::args().nth(1).map(|arg| Uuid::parse_str(&arg)) {
        None => None,
        Some(Ok(id)) => Some(id),
        Some(Err(e)) => {
            eprintln!("Invalid level id: {e}");
            return AppExit::error();
        }
    };

    let preferences = EditorPreferences::load();
    let storage_dir = preferences
        .storage_dir
        .clone()
        .or_else(EditorPreferences::data_dir)
        .unwrap_or_else(|| PathBuf::from("levels"));

    let mut editor = EditorPlugin::new().with_storage(Arc::new(JsonDirStorage::new(storage_dir)));
    if let Some(id) = level {
        editor = editor.with_level(id);
    }

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Bevy Level Editor".to_string(),
                        resolution: WindowResolution::new(1280, 720)
                            .with_scale_factor_override(1.0),
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin {
                    // Pixel art tiles stay crisp when zoomed
                    default_sampler: ImageSamplerDescriptor {
                        mag_filter: ImageFilterMode::Nearest,
                        min_filter: ImageFilterMode::Nearest,
                        mipmap_filter: ImageFilterMode::Nearest,
                        ..default()
                    },
                })
                .set(AssetPlugin {
                    // Tile textures may live anywhere on disk
                    unapproved_path_mode: UnapprovedPathMode::Allow,
                    ..default()
                }),
        )
        .add_plugins(editor)
        .run()
}

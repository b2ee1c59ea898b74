//! Storage collaborator
//!
//! The editor only decides when to load and save; where the data lives is up
//! to a [`LevelStorage`] implementation. Every operation is an opaque future
//! that the Bevy systems in this module run on the `IoTaskPool`.

mod autosave;
mod json_dir;
mod memory;
mod session;

pub use autosave::{Autosave, SaveScheduler, SaveStatus, SaveTrigger};
pub use json_dir::JsonDirStorage;
pub use memory::MemoryStorage;
pub use session::{session_active, EditorSession, StartupLevel};

use bevy::prelude::*;
use bevy_level_core::{FillPattern, Level, Pattern, TileDefinition, TileLibrary};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::preferences::EditorPreferences;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: u64, available: u64 },
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e.to_string())
    }
}

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Entry in the level list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub id: Uuid,
    pub name: String,
}

/// Async persistence for levels, the tile library and background images
pub trait LevelStorage: Send + Sync {
    /// `StorageError::NotFound` when no level has this id
    fn load_level(&self, id: Uuid) -> StorageFuture<'_, Level>;
    fn save_level(&self, level: Level) -> StorageFuture<'_, ()>;
    fn delete_level(&self, id: Uuid) -> StorageFuture<'_, ()>;
    fn list_levels(&self) -> StorageFuture<'_, Vec<LevelSummary>>;

    fn load_tiles(&self) -> StorageFuture<'_, Vec<TileDefinition>>;
    fn save_tile(&self, tile: TileDefinition) -> StorageFuture<'_, ()>;
    fn delete_tile(&self, id: String) -> StorageFuture<'_, ()>;

    fn load_patterns(&self) -> StorageFuture<'_, Vec<Pattern>>;
    fn save_pattern(&self, pattern: Pattern) -> StorageFuture<'_, ()>;
    fn delete_pattern(&self, id: String) -> StorageFuture<'_, ()>;

    fn load_fill_patterns(&self) -> StorageFuture<'_, Vec<FillPattern>>;
    fn save_fill_pattern(&self, fill: FillPattern) -> StorageFuture<'_, ()>;

    fn load_background(&self, id: String) -> StorageFuture<'_, Vec<u8>>;
    fn save_background(&self, id: String, bytes: Vec<u8>) -> StorageFuture<'_, ()>;
    fn delete_background(&self, id: String) -> StorageFuture<'_, ()>;

    /// Tiles, fill patterns and patterns in one library
    fn load_library(&self) -> StorageFuture<'_, TileLibrary> {
        Box::pin(async move {
            let mut library = TileLibrary::new();
            for tile in self.load_tiles().await? {
                library.add_tile(tile);
            }
            for fill in self.load_fill_patterns().await? {
                library.add_fill_pattern(fill);
            }
            for pattern in self.load_patterns().await? {
                library.add_pattern(pattern);
            }
            Ok(library)
        })
    }
}

/// A library edit waiting to be persisted
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryChange {
    SaveTile(TileDefinition),
    SaveFillPattern(FillPattern),
    SavePattern(Pattern),
    DeletePattern(String),
}

impl LibraryChange {
    /// Run the change against `storage`
    pub async fn apply(self, storage: &dyn LevelStorage) -> Result<(), StorageError> {
        match self {
            LibraryChange::SaveTile(tile) => storage.save_tile(tile).await,
            LibraryChange::SaveFillPattern(fill) => storage.save_fill_pattern(fill).await,
            LibraryChange::SavePattern(pattern) => storage.save_pattern(pattern).await,
            LibraryChange::DeletePattern(id) => storage.delete_pattern(id).await,
        }
    }
}

/// The storage backend shared by every storage system
#[derive(Resource, Clone)]
pub struct StorageHandle(pub Arc<dyn LevelStorage>);

/// Plugin for session loading, autosave and library persistence
pub struct StoragePlugin {
    storage: Arc<dyn LevelStorage>,
    level: Option<Uuid>,
    scheduler: SaveScheduler,
}

impl StoragePlugin {
    pub fn new(storage: Arc<dyn LevelStorage>, level: Option<Uuid>, preferences: &EditorPreferences) -> Self {
        Self {
            storage,
            level,
            scheduler: SaveScheduler::new(
                preferences.autosave_debounce(),
                preferences.backup_interval(),
            ),
        }
    }
}

impl Plugin for StoragePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(StorageHandle(self.storage.clone()))
            .insert_resource(StartupLevel(self.level))
            .insert_resource(Autosave::new(self.scheduler.clone()))
            .init_resource::<EditorSession>()
            .add_systems(Startup, session::start_session_load)
            .add_systems(
                Update,
                (session::poll_session_load, session::exit_on_failed_session).chain(),
            )
            .add_systems(Last, session::shutdown_on_exit)
            .add_systems(
                Update,
                (
                    autosave::schedule_saves,
                    autosave::poll_save_task,
                    autosave::persist_library_changes,
                )
                    .chain()
                    .run_if(session_active),
            );
    }
}

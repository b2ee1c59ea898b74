//! File-system storage backend
//!
//! Layout under the root directory:
//! - `levels/<uuid>.json`, one file per level
//! - `tiles.json`, `patterns.json`, `fill_patterns.json`
//! - `backgrounds/<id>.bin`

use bevy_level_core::{FillPattern, Level, Pattern, TileDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{LevelStorage, LevelSummary, StorageError, StorageFuture};

const LEVELS_DIR: &str = "levels";
const BACKGROUNDS_DIR: &str = "backgrounds";
const TILES_FILE: &str = "tiles.json";
const PATTERNS_FILE: &str = "patterns.json";
const FILL_PATTERNS_FILE: &str = "fill_patterns.json";

/// Stores levels and the library as JSON files under one directory
#[derive(Debug, Clone)]
pub struct JsonDirStorage {
    root: PathBuf,
}

fn is_out_of_space(err: &io::Error) -> bool {
    #[cfg(unix)]
    const DISK_FULL: &[i32] = &[28]; // ENOSPC
    #[cfg(windows)]
    const DISK_FULL: &[i32] = &[39, 112]; // ERROR_HANDLE_DISK_FULL, ERROR_DISK_FULL
    #[cfg(not(any(unix, windows)))]
    const DISK_FULL: &[i32] = &[];

    err.raw_os_error().is_some_and(|code| DISK_FULL.contains(&code))
}

fn write_error(err: io::Error, needed: usize) -> StorageError {
    if is_out_of_space(&err) {
        StorageError::QuotaExceeded {
            needed: needed as u64,
            available: 0,
        }
    } else {
        StorageError::Io(err.to_string())
    }
}

fn read_error(err: io::Error, what: impl FnOnce() -> String) -> StorageError {
    if err.kind() == io::ErrorKind::NotFound {
        StorageError::NotFound(what())
    } else {
        StorageError::Io(err.to_string())
    }
}

/// Write through a temporary file so a failed write never truncates the old one
fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| write_error(e, bytes.len()))?;
    }
    let tmp = path.with_extension("tmp");
    let written = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_error(e, bytes.len()));
    }
    Ok(())
}

fn remove_file(path: &Path) -> Result<(), StorageError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(StorageError::Io(e.to_string())),
        _ => Ok(()),
    }
}

/// Ids become file names, so only a conservative character set is accepted
fn check_file_id(id: &str) -> Result<(), StorageError> {
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::Backend(format!("invalid storage id '{id}'")))
    }
}

impl JsonDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn level_path(&self, id: Uuid) -> PathBuf {
        self.root.join(LEVELS_DIR).join(format!("{id}.json"))
    }

    fn background_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        check_file_id(id)?;
        Ok(self.root.join(BACKGROUNDS_DIR).join(format!("{id}.bin")))
    }

    /// A whole library file; a missing file is an empty list
    fn read_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StorageError> {
        match std::fs::read_to_string(self.root.join(file)) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn write_list<T: Serialize>(&self, file: &str, items: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(items)?;
        write_file(&self.root.join(file), json.as_bytes())
    }

    /// Insert or replace by id, keeping the file sorted
    fn upsert<T, F>(&self, file: &str, item: T, id_of: F) -> Result<(), StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T) -> &str,
    {
        let mut items: Vec<T> = self.read_list(file)?;
        items.retain(|existing| id_of(existing) != id_of(&item));
        items.push(item);
        items.sort_by(|a, b| id_of(a).cmp(id_of(b)));
        self.write_list(file, &items)
    }

    fn remove<T, F>(&self, file: &str, id: &str, id_of: F) -> Result<(), StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(&T) -> &str,
    {
        let mut items: Vec<T> = self.read_list(file)?;
        let before = items.len();
        items.retain(|existing| id_of(existing) != id);
        if items.len() == before {
            return Ok(());
        }
        self.write_list(file, &items)
    }
}

impl LevelStorage for JsonDirStorage {
    fn load_level(&self, id: Uuid) -> StorageFuture<'_, Level> {
        Box::pin(async move {
            let content = std::fs::read_to_string(self.level_path(id))
                .map_err(|e| read_error(e, || format!("level {id}")))?;
            Ok(Level::from_json(&content)?)
        })
    }

    fn save_level(&self, level: Level) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            let json = level.to_json()?;
            write_file(&self.level_path(level.id), json.as_bytes())
        })
    }

    fn delete_level(&self, id: Uuid) -> StorageFuture<'_, ()> {
        Box::pin(async move { remove_file(&self.level_path(id)) })
    }

    fn list_levels(&self) -> StorageFuture<'_, Vec<LevelSummary>> {
        Box::pin(async move {
            let entries = match std::fs::read_dir(self.root.join(LEVELS_DIR)) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(StorageError::Io(e.to_string())),
            };

            let mut summaries = Vec::new();
            for entry in entries {
                let path = entry.map_err(|e| StorageError::Io(e.to_string()))?.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                let parsed = std::fs::read_to_string(&path)
                    .map_err(|e| StorageError::Io(e.to_string()))
                    .and_then(|content| Level::from_json(&content).map_err(StorageError::from));
                match parsed {
                    Ok(level) => summaries.push(LevelSummary {
                        id: level.id,
                        name: level.name,
                    }),
                    Err(e) => bevy::log::warn!("Skipping unreadable level {:?}: {}", path, e),
                }
            }
            summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            Ok(summaries)
        })
    }

    fn load_tiles(&self) -> StorageFuture<'_, Vec<TileDefinition>> {
        Box::pin(async move { self.read_list(TILES_FILE) })
    }

    fn save_tile(&self, tile: TileDefinition) -> StorageFuture<'_, ()> {
        Box::pin(async move { self.upsert(TILES_FILE, tile, |t: &TileDefinition| t.id.as_str()) })
    }

    fn delete_tile(&self, id: String) -> StorageFuture<'_, ()> {
        Box::pin(async move { self.remove(TILES_FILE, &id, |t: &TileDefinition| t.id.as_str()) })
    }

    fn load_patterns(&self) -> StorageFuture<'_, Vec<Pattern>> {
        Box::pin(async move { self.read_list(PATTERNS_FILE) })
    }

    fn save_pattern(&self, pattern: Pattern) -> StorageFuture<'_, ()> {
        Box::pin(async move { self.upsert(PATTERNS_FILE, pattern, |p: &Pattern| p.id.as_str()) })
    }

    fn delete_pattern(&self, id: String) -> StorageFuture<'_, ()> {
        Box::pin(async move { self.remove(PATTERNS_FILE, &id, |p: &Pattern| p.id.as_str()) })
    }

    fn load_fill_patterns(&self) -> StorageFuture<'_, Vec<FillPattern>> {
        Box::pin(async move { self.read_list(FILL_PATTERNS_FILE) })
    }

    fn save_fill_pattern(&self, fill: FillPattern) -> StorageFuture<'_, ()> {
        Box::pin(async move { self.upsert(FILL_PATTERNS_FILE, fill, |f: &FillPattern| f.id.as_str()) })
    }

    fn load_background(&self, id: String) -> StorageFuture<'_, Vec<u8>> {
        Box::pin(async move {
            let path = self.background_path(&id)?;
            std::fs::read(path).map_err(|e| read_error(e, || format!("background {id}")))
        })
    }

    fn save_background(&self, id: String, bytes: Vec<u8>) -> StorageFuture<'_, ()> {
        Box::pin(async move { write_file(&self.background_path(&id)?, &bytes) })
    }

    fn delete_background(&self, id: String) -> StorageFuture<'_, ()> {
        Box::pin(async move { remove_file(&self.background_path(&id)?) })
    }
}

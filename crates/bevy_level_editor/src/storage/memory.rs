//! In-process storage backend

use bevy_level_core::{FillPattern, Level, Pattern, TileDefinition};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{LevelStorage, LevelSummary, StorageError, StorageFuture};

#[derive(Default)]
struct Contents {
    /// Serialized so loads hand out independent copies and sizes are real
    levels: HashMap<Uuid, String>,
    tiles: BTreeMap<String, TileDefinition>,
    patterns: BTreeMap<String, Pattern>,
    fill_patterns: BTreeMap<String, FillPattern>,
    backgrounds: HashMap<String, Vec<u8>>,
}

impl Contents {
    /// Bytes counted against the quota, ignoring the entry about to be replaced
    fn used_bytes(&self, replacing_level: Option<Uuid>, replacing_background: Option<&str>) -> u64 {
        let levels: usize = self
            .levels
            .iter()
            .filter(|(id, _)| Some(**id) != replacing_level)
            .map(|(_, json)| json.len())
            .sum();
        let backgrounds: usize = self
            .backgrounds
            .iter()
            .filter(|(id, _)| Some(id.as_str()) != replacing_background)
            .map(|(_, bytes)| bytes.len())
            .sum();
        (levels + backgrounds) as u64
    }
}

/// Keeps everything in memory. Levels and backgrounds can be capped with a
/// byte quota to exercise quota handling.
#[derive(Default)]
pub struct MemoryStorage {
    contents: Mutex<Contents>,
    quota: Option<u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes once levels and backgrounds exceed `bytes`
    pub fn with_quota(bytes: u64) -> Self {
        Self {
            contents: Mutex::default(),
            quota: Some(bytes),
        }
    }

    fn contents(&self) -> Result<MutexGuard<'_, Contents>, StorageError> {
        self.contents
            .lock()
            .map_err(|_| StorageError::Backend("memory storage lock poisoned".to_string()))
    }

    fn check_quota(&self, used: u64, needed: u64) -> Result<(), StorageError> {
        match self.quota {
            Some(quota) if used + needed > quota => Err(StorageError::QuotaExceeded {
                needed,
                available: quota.saturating_sub(used),
            }),
            _ => Ok(()),
        }
    }
}

impl LevelStorage for MemoryStorage {
    fn load_level(&self, id: Uuid) -> StorageFuture<'_, Level> {
        Box::pin(async move {
            let contents = self.contents()?;
            let json = contents
                .levels
                .get(&id)
                .ok_or_else(|| StorageError::NotFound(format!("level {id}")))?;
            Ok(Level::from_json(json)?)
        })
    }

    fn save_level(&self, level: Level) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            let json = level.to_json()?;
            let mut contents = self.contents()?;
            self.check_quota(contents.used_bytes(Some(level.id), None), json.len() as u64)?;
            contents.levels.insert(level.id, json);
            Ok(())
        })
    }

    fn delete_level(&self, id: Uuid) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.contents()?.levels.remove(&id);
            Ok(())
        })
    }

    fn list_levels(&self) -> StorageFuture<'_, Vec<LevelSummary>> {
        Box::pin(async move {
            let contents = self.contents()?;
            let mut summaries = contents
                .levels
                .values()
                .map(|json| {
                    Level::from_json(json).map(|level| LevelSummary {
                        id: level.id,
                        name: level.name,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            Ok(summaries)
        })
    }

    fn load_tiles(&self) -> StorageFuture<'_, Vec<TileDefinition>> {
        Box::pin(async move { Ok(self.contents()?.tiles.values().cloned().collect()) })
    }

    fn save_tile(&self, tile: TileDefinition) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.contents()?.tiles.insert(tile.id.clone(), tile);
            Ok(())
        })
    }

    fn delete_tile(&self, id: String) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.contents()?.tiles.remove(&id);
            Ok(())
        })
    }

    fn load_patterns(&self) -> StorageFuture<'_, Vec<Pattern>> {
        Box::pin(async move { Ok(self.contents()?.patterns.values().cloned().collect()) })
    }

    fn save_pattern(&self, pattern: Pattern) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.contents()?.patterns.insert(pattern.id.clone(), pattern);
            Ok(())
        })
    }

    fn delete_pattern(&self, id: String) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.contents()?.patterns.remove(&id);
            Ok(())
        })
    }

    fn load_fill_patterns(&self) -> StorageFuture<'_, Vec<FillPattern>> {
        Box::pin(async move { Ok(self.contents()?.fill_patterns.values().cloned().collect()) })
    }

    fn save_fill_pattern(&self, fill: FillPattern) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.contents()?.fill_patterns.insert(fill.id.clone(), fill);
            Ok(())
        })
    }

    fn load_background(&self, id: String) -> StorageFuture<'_, Vec<u8>> {
        Box::pin(async move {
            self.contents()?
                .backgrounds
                .get(&id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(format!("background {id}")))
        })
    }

    fn save_background(&self, id: String, bytes: Vec<u8>) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            let mut contents = self.contents()?;
            self.check_quota(contents.used_bytes(None, Some(&id)), bytes.len() as u64)?;
            contents.backgrounds.insert(id, bytes);
            Ok(())
        })
    }

    fn delete_background(&self, id: String) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.contents()?.backgrounds.remove(&id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::block_on;
    use bevy_level_core::TileLayer;

    #[test]
    fn test_level_round_trip() {
        let storage = MemoryStorage::new();
        let mut level = Level::new("cave", 8, 4);
        level.grid.set("solid", 1, 0, false, Some(TileLayer::Foreground));
        block_on(storage.save_level(level.clone())).unwrap();

        let loaded = block_on(storage.load_level(level.id)).unwrap();
        assert_eq!(loaded, level);
        let list = block_on(storage.list_levels()).unwrap();
        assert_eq!(list, vec![LevelSummary { id: level.id, name: "cave".to_string() }]);
    }

    #[test]
    fn test_missing_level_is_not_found() {
        let storage = MemoryStorage::new();
        let err = block_on(storage.load_level(Uuid::new_v4())).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_save() {
        let level = Level::new("big", 20, 20);
        let size = level.to_json().unwrap().len() as u64;
        let storage = MemoryStorage::with_quota(size + 10);
        block_on(storage.save_level(level.clone())).unwrap();
        // overwriting the same level does not count twice
        block_on(storage.save_level(level.clone())).unwrap();

        let mut bigger = level.clone();
        bigger.resize(40, 40);
        let err = block_on(storage.save_level(bigger)).unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(block_on(storage.load_level(level.id)).unwrap().width(), 20);

        let err = block_on(storage.save_background("sky".to_string(), vec![0; 64])).unwrap_err();
        assert_eq!(err, StorageError::QuotaExceeded { needed: 64, available: 10 });
    }

    #[test]
    fn test_library_loads_together() {
        let storage = MemoryStorage::new();
        block_on(storage.save_tile(TileDefinition::new("solid", "Solid", "solid.png"))).unwrap();
        block_on(storage.save_fill_pattern(FillPattern::new("moss", "Moss", "moss.png"))).unwrap();
        block_on(storage.save_pattern(Pattern::from_cells(
            "p",
            "P",
            [(0, 0, "solid".to_string(), false, TileLayer::Primary)],
        )))
        .unwrap();

        let library = block_on(storage.load_library()).unwrap();
        assert!(library.tiles.contains_key("solid"));
        assert!(library.fill_patterns.contains_key("moss"));
        assert!(library.patterns.contains_key("p"));

        block_on(storage.delete_pattern("p".to_string())).unwrap();
        assert!(block_on(storage.load_patterns()).unwrap().is_empty());
    }
}

//! Snapshot-based undo/redo

use bevy_level_core::Level;
use std::collections::VecDeque;

/// Default number of undo steps kept
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Whole-level state captured before (undo) or after (redo) a committed operation
#[derive(Debug, Clone)]
pub struct LevelSnapshot {
    pub level: Level,
    pub description: String,
}

impl LevelSnapshot {
    pub fn new(level: Level, description: impl Into<String>) -> Self {
        Self {
            level,
            description: description.into(),
        }
    }
}

/// Stores level snapshots for undo/redo
#[derive(Debug)]
pub struct CommandHistory {
    /// Oldest snapshot at the front
    undo_stack: VecDeque<LevelSnapshot>,
    redo_stack: Vec<LevelSnapshot>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }
}

impl CommandHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state from before a mutation that has already been applied.
    /// Clears the redo stack.
    pub fn push_undo(&mut self, snapshot: LevelSnapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Pop the last snapshot, parking `current` on the redo stack.
    ///
    /// Returns the level to restore.
    pub fn undo(&mut self, current: Level) -> Option<Level> {
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack
            .push(LevelSnapshot::new(current, snapshot.description.clone()));
        Some(snapshot.level)
    }

    /// Mirror of [`undo`](Self::undo)
    pub fn redo(&mut self, current: Level) -> Option<Level> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack
            .push_back(LevelSnapshot::new(current, snapshot.description.clone()));
        Some(snapshot.level)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get description of the operation to undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|s| s.description.as_str())
    }

    /// Get description of the operation to redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|s| s.description.as_str())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_with(tile: &str) -> Level {
        let mut level = Level::new("history", 4, 4);
        level.grid.set(tile, 0, 0, false, None);
        level
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = CommandHistory::default();
        let before = level_with("a");
        let after = level_with("b");
        history.push_undo(LevelSnapshot::new(before.clone(), "Place tiles"));
        assert_eq!(history.undo_description(), Some("Place tiles"));

        let restored = history.undo(after.clone()).unwrap();
        assert_eq!(restored, before);
        assert!(history.can_redo());
        assert_eq!(history.redo_description(), Some("Place tiles"));

        let redone = history.redo(restored).unwrap();
        assert_eq!(redone, after);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_push_clears_redo() {
        let mut history = CommandHistory::default();
        history.push_undo(LevelSnapshot::new(level_with("a"), "one"));
        history.undo(level_with("b"));
        assert!(history.can_redo());
        history.push_undo(LevelSnapshot::new(level_with("c"), "two"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = CommandHistory::with_limit(2);
        for name in ["a", "b", "c"] {
            history.push_undo(LevelSnapshot::new(level_with(name), name));
        }
        assert_eq!(history.undo_len(), 2);
        let newest = history.undo(level_with("d")).unwrap();
        assert_eq!(newest.grid.tile_at(0, 0), Some("c"));
        let older = history.undo(newest).unwrap();
        assert_eq!(older.grid.tile_at(0, 0), Some("b"));
        assert!(history.undo(older).is_none());
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut history = CommandHistory::default();
        assert!(history.undo(level_with("a")).is_none());
        assert!(!history.can_redo());
    }
}

//! Explicit saves, debounced autosave and interval backups

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, IoTaskPool, Task};
use std::time::Duration;

use super::{StorageError, StorageHandle};
use crate::EditorState;

/// Transient save indicator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed(String),
    QuotaExceeded,
}

impl SaveStatus {
    pub fn label(&self) -> String {
        match self {
            SaveStatus::Idle => String::new(),
            SaveStatus::Saving => "Saving...".to_string(),
            SaveStatus::Saved => "Saved".to_string(),
            SaveStatus::Failed(reason) => format!("Save failed: {reason}"),
            SaveStatus::QuotaExceeded => "Save failed: storage is full".to_string(),
        }
    }
}

/// Why a save was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Explicit,
    /// Quiet period after the last edit
    Autosave,
    /// Periodic save while edits keep coming
    Backup,
}

/// Decides when to save. Times are durations since app start.
#[derive(Debug, Clone)]
pub struct SaveScheduler {
    debounce: Duration,
    backup_interval: Duration,
    latest_revision: u64,
    saved_revision: u64,
    /// When `latest_revision` was first seen
    last_change: Option<Duration>,
    last_save_started: Duration,
    explicit: bool,
    in_flight: Option<u64>,
    /// Set by a failed save; only an explicit save resumes automatic saving
    suspended: bool,
}

impl SaveScheduler {
    pub fn new(debounce: Duration, backup_interval: Duration) -> Self {
        Self {
            debounce,
            backup_interval,
            latest_revision: 0,
            saved_revision: 0,
            last_change: None,
            last_save_started: Duration::ZERO,
            explicit: false,
            in_flight: None,
            suspended: false,
        }
    }

    /// Record the editor's current revision
    pub fn note_revision(&mut self, revision: u64, now: Duration) {
        if revision != self.latest_revision {
            self.latest_revision = revision;
            self.last_change = Some(now);
        }
    }

    /// Treat `revision` as persisted, e.g. right after loading it
    pub fn mark_saved(&mut self, revision: u64, now: Duration) {
        self.latest_revision = revision;
        self.saved_revision = revision;
        self.last_change = None;
        self.last_save_started = now;
    }

    pub fn request_explicit(&mut self) {
        self.explicit = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.latest_revision != self.saved_revision
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// The save to start now, if any, as `(trigger, revision)`. At most one
    /// save is in flight; the caller must report it back through [`finish`](Self::finish).
    pub fn poll(&mut self, now: Duration) -> Option<(SaveTrigger, u64)> {
        if self.in_flight.is_some() {
            return None;
        }

        let trigger = if self.explicit {
            self.explicit = false;
            self.suspended = false;
            SaveTrigger::Explicit
        } else if self.suspended || !self.is_dirty() {
            return None;
        } else if self
            .last_change
            .is_some_and(|changed| now.saturating_sub(changed) >= self.debounce)
        {
            SaveTrigger::Autosave
        } else if now.saturating_sub(self.last_save_started) >= self.backup_interval {
            SaveTrigger::Backup
        } else {
            return None;
        };

        self.in_flight = Some(self.latest_revision);
        self.last_save_started = now;
        Some((trigger, self.latest_revision))
    }

    /// Report the outcome of the save of `revision`
    pub fn finish(&mut self, revision: u64, result: &Result<(), StorageError>) -> SaveStatus {
        self.in_flight = None;
        match result {
            Ok(()) => {
                self.saved_revision = revision;
                if revision == self.latest_revision {
                    self.last_change = None;
                }
                SaveStatus::Saved
            }
            Err(e) => {
                self.suspended = true;
                if e.is_quota_exceeded() {
                    SaveStatus::QuotaExceeded
                } else {
                    SaveStatus::Failed(e.to_string())
                }
            }
        }
    }
}

struct SaveTask {
    revision: u64,
    trigger: SaveTrigger,
    task: Task<Result<(), StorageError>>,
}

/// Save scheduling state and the save currently in flight
#[derive(Resource)]
pub struct Autosave {
    pub scheduler: SaveScheduler,
    task: Option<SaveTask>,
}

impl Autosave {
    pub fn new(scheduler: SaveScheduler) -> Self {
        Self {
            scheduler,
            task: None,
        }
    }
}

/// Start a save when the scheduler asks for one
pub(crate) fn schedule_saves(
    time: Res<Time>,
    storage: Res<StorageHandle>,
    mut autosave: ResMut<Autosave>,
    mut state: ResMut<EditorState>,
) {
    let now = time.elapsed();
    if state.take_save_request() {
        autosave.scheduler.request_explicit();
    }
    autosave.scheduler.note_revision(state.revision(), now);

    let Some((trigger, revision)) = autosave.scheduler.poll(now) else {
        return;
    };

    let level = state.level().clone();
    debug!("Saving level '{}' (revision {}, {:?})", level.name, revision, trigger);
    state.save_status = SaveStatus::Saving;

    let storage = storage.0.clone();
    let task = IoTaskPool::get().spawn(async move { storage.save_level(level).await });
    autosave.task = Some(SaveTask {
        revision,
        trigger,
        task,
    });
}

/// Collect a finished save and surface the result
pub(crate) fn poll_save_task(mut autosave: ResMut<Autosave>, mut state: ResMut<EditorState>) {
    let autosave = &mut *autosave;
    let Some(save) = autosave.task.as_mut() else {
        return;
    };
    let Some(result) = block_on(future::poll_once(&mut save.task)) else {
        return;
    };
    let (revision, trigger) = (save.revision, save.trigger);
    autosave.task = None;

    match &result {
        Ok(()) => info!("Saved level '{}' ({:?})", state.level().name, trigger),
        Err(e) if e.is_quota_exceeded() => {
            warn!("Storage quota exceeded while saving: {}", e);
            state.show_free_space_prompt = true;
        }
        Err(e) => error!("Failed to save level: {}", e),
    }
    state.save_status = autosave.scheduler.finish(revision, &result);
}

/// Persist tile, fill-pattern and pattern edits in the background
pub(crate) fn persist_library_changes(storage: Res<StorageHandle>, mut state: ResMut<EditorState>) {
    for change in state.take_library_changes() {
        let storage = storage.0.clone();
        IoTaskPool::get()
            .spawn(async move {
                if let Err(e) = change.apply(&*storage).await {
                    error!("Failed to save library change: {}", e);
                }
            })
            .detach();
    }
}

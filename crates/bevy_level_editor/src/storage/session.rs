//! Startup load of the level and tile library

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, IoTaskPool, Task};
use bevy_level_animation::PlatformAnimator;
use bevy_level_core::{Level, TileLibrary};
use uuid::Uuid;

use super::{Autosave, StorageError, StorageHandle};
use crate::EditorState;

/// Lifecycle of the editing session
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorSession {
    #[default]
    Loading,
    Active,
    /// Loading failed; the app exits
    Failed(String),
}

impl EditorSession {
    pub fn is_active(&self) -> bool {
        matches!(self, EditorSession::Active)
    }
}

/// Run condition for systems that need a loaded level
pub fn session_active(session: Res<EditorSession>) -> bool {
    session.is_active()
}

/// Level to open at startup; `None` creates a new one
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct StartupLevel(pub Option<Uuid>);

struct Loaded {
    level: Option<Level>,
    library: TileLibrary,
}

#[derive(Resource)]
pub(crate) struct SessionLoad(Task<Result<Loaded, StorageError>>);

pub(crate) fn start_session_load(
    mut commands: Commands,
    storage: Res<StorageHandle>,
    startup: Res<StartupLevel>,
) {
    let storage = storage.0.clone();
    let level_id = startup.0;
    let task = IoTaskPool::get().spawn(async move {
        let library = storage.load_library().await?;
        let level = match level_id {
            Some(id) => Some(storage.load_level(id).await?),
            None => None,
        };
        Ok(Loaded { level, library })
    });
    commands.insert_resource(SessionLoad(task));
}

pub(crate) fn poll_session_load(
    mut commands: Commands,
    time: Res<Time>,
    load: Option<ResMut<SessionLoad>>,
    mut session: ResMut<EditorSession>,
    mut state: ResMut<EditorState>,
    mut autosave: ResMut<Autosave>,
) {
    let Some(mut load) = load else {
        return;
    };
    let Some(result) = block_on(future::poll_once(&mut load.0)) else {
        return;
    };
    commands.remove_resource::<SessionLoad>();

    match result {
        Ok(Loaded { level, library }) => {
            state.set_library(library);
            match level {
                Some(level) => {
                    info!(
                        "Loaded level '{}' ({}x{}, {} tiles)",
                        level.name,
                        level.width(),
                        level.height(),
                        level.grid.tile_count()
                    );
                    state.switch_level(level);
                    autosave.scheduler.mark_saved(state.revision(), time.elapsed());
                }
                None => {
                    info!(
                        "Created new level '{}' ({}x{})",
                        state.level().name,
                        state.level().width(),
                        state.level().height()
                    );
                    state.request_save();
                }
            }
            *session = EditorSession::Active;
        }
        Err(e) => {
            error!("Failed to load level: {}", e);
            *session = EditorSession::Failed(e.to_string());
        }
    }
}

/// A session that could not load has nothing to edit: leave the app
pub(crate) fn exit_on_failed_session(
    session: Res<EditorSession>,
    mut state: ResMut<EditorState>,
    animator: Option<ResMut<PlatformAnimator>>,
    mut exit: MessageWriter<AppExit>,
) {
    if !session.is_changed() {
        return;
    }
    if let EditorSession::Failed(reason) = &*session {
        error!("Closing editor: {}", reason);
        teardown(&mut state, animator);
        exit.write(AppExit::error());
    }
}

/// Stop the animator and drop queued frames once the app is exiting
pub(crate) fn shutdown_on_exit(
    mut exits: MessageReader<AppExit>,
    mut state: ResMut<EditorState>,
    animator: Option<ResMut<PlatformAnimator>>,
) {
    if exits.read().count() > 0 {
        teardown(&mut state, animator);
    }
}

fn teardown(state: &mut EditorState, animator: Option<ResMut<PlatformAnimator>>) {
    state.shutdown();
    if let Some(mut animator) = animator {
        animator.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::EditorPreferences;
    use crate::storage::{LevelStorage, MemoryStorage, StoragePlugin};
    use crate::ViewState;
    use bevy_level_core::{LevelObject, Movement};
    use std::sync::Arc;

    fn editor_app(storage: Arc<dyn LevelStorage>, level: Option<Uuid>) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(EditorState::new(
                Level::new("Untitled", 64, 24),
                ViewState::default(),
                100,
            ))
            .init_resource::<PlatformAnimator>()
            .add_plugins(StoragePlugin::new(storage, level, &EditorPreferences::default()));
        app
    }

    /// Update until the session leaves `Loading`
    fn run_until_loaded(app: &mut App) {
        for _ in 0..500 {
            app.update();
            if *app.world().resource::<EditorSession>() != EditorSession::Loading {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        panic!("session never finished loading");
    }

    #[test]
    fn test_opens_stored_level() {
        let storage = Arc::new(MemoryStorage::new());
        let level = Level::new("stored", 12, 6);
        block_on(storage.save_level(level.clone())).unwrap();

        let mut app = editor_app(storage, Some(level.id));
        run_until_loaded(&mut app);

        assert!(app.world().resource::<EditorSession>().is_active());
        let state = app.world().resource::<EditorState>();
        assert_eq!(state.level(), &level);
        assert!(!app.world().resource::<Autosave>().scheduler.is_dirty());
    }

    #[test]
    fn test_missing_level_fails_session_and_exits() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = editor_app(storage, Some(Uuid::new_v4()));
        let lift = LevelObject::new("lift", [0.0, 0.0], [32.0, 16.0])
            .with_movement(Movement::new(vec![[0.0, 0.0], [64.0, 0.0]], 32.0));
        assert!(app
            .world_mut()
            .resource_mut::<PlatformAnimator>()
            .tick([&lift], 0.1));
        run_until_loaded(&mut app);

        assert!(matches!(
            app.world().resource::<EditorSession>(),
            EditorSession::Failed(_)
        ));
        assert!(app.should_exit().is_some());
        let animator = app.world().resource::<PlatformAnimator>();
        assert!(!animator.is_running());
        assert_eq!(animator.progress(lift.id), None);
    }

    #[test]
    fn test_new_level_is_saved() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = editor_app(storage.clone(), None);
        run_until_loaded(&mut app);
        let id = app.world().resource::<EditorState>().level().id;

        for _ in 0..500 {
            app.update();
            if block_on(storage.load_level(id)).is_ok() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        panic!("new level was never saved");
    }
}

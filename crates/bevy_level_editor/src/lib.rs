//! bevy_level_editor - Tile-grid level editor for Bevy platformers
//!
//! This crate provides the editing engine and its Bevy front end:
//! - Select, place (tile rectangle, pattern stamp, fill-pattern brush) and delete tools
//! - Overwrite and group-delete confirmations
//! - Copy/cut/paste and whole-level undo/redo
//! - Moving-platform preview
//! - Async storage with debounced autosave and interval backups
//! - egui toolbar, palette, status bar, prompts and context menu
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_level_editor::EditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_grid_size(32.0))
//!         .run();
//! }
//! ```

pub mod commands;
pub mod preferences;
pub mod render;
pub mod storage;
pub mod tools;
pub mod ui;

#[cfg(test)]
mod testing;

// Re-export the data crates
pub use bevy_level_animation;
pub use bevy_level_core;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_level_animation::PlatformAnimationPlugin;
use bevy_level_core::{
    FillPattern, Level, LevelObject, Movement, Pattern, TileDefinition, TileLayer, TileLibrary, Viewport,
};
use std::sync::Arc;
use uuid::Uuid;

use commands::{handle_keyboard_shortcuts, CommandHistory, LevelSnapshot, TileClipboard};
use preferences::EditorPreferences;
use render::{EditorRenderPlugin, FrameScheduler};
use storage::{LevelStorage, LibraryChange, MemoryStorage, SaveStatus, StoragePlugin};
use tools::{
    ContextMenu, DragState, EditorTool, EditorToolsPlugin, PaintSource, PendingConfirmation,
    Selection,
};
use ui::EditorUiPlugin;

/// Smallest and largest zoom factors
pub const ZOOM_MIN: f32 = 0.25;
pub const ZOOM_MAX: f32 = 4.0;

/// Main editor plugin
#[derive(Default)]
pub struct EditorPlugin {
    storage: Option<Arc<dyn LevelStorage>>,
    level: Option<Uuid>,
    grid_size: Option<f32>,
    initial_zoom: Option<f32>,
    show_grid: Option<bool>,
}

impl EditorPlugin {
    /// Create an editor plugin with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage backend for levels, tiles, patterns and backgrounds
    pub fn with_storage(mut self, storage: Arc<dyn LevelStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Level to open on startup. Without one a new level is created.
    pub fn with_level(mut self, id: Uuid) -> Self {
        self.level = Some(id);
        self
    }

    pub fn with_grid_size(mut self, grid_size: f32) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    pub fn with_initial_zoom(mut self, zoom: f32) -> Self {
        self.initial_zoom = Some(zoom.clamp(ZOOM_MIN, ZOOM_MAX));
        self
    }

    pub fn with_initial_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = Some(show_grid);
        self
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        let preferences = EditorPreferences::load();

        let view = ViewState {
            grid_size: self.grid_size.unwrap_or(preferences.grid_size),
            zoom: self
                .initial_zoom
                .unwrap_or(preferences.zoom)
                .clamp(ZOOM_MIN, ZOOM_MAX),
            show_grid: self.show_grid.unwrap_or(preferences.show_grid),
            ..ViewState::default()
        };
        let storage = self.storage.clone().unwrap_or_else(|| {
            warn!("EditorPlugin: no storage configured, levels are kept in memory only");
            Arc::new(MemoryStorage::new())
        });

        info!(
            "EditorPlugin: grid {}px, zoom {}, autosave after {}ms, backup every {}s",
            view.grid_size, view.zoom, preferences.autosave_debounce_ms, preferences.backup_interval_secs
        );

        let state = EditorState::new(
            Level::new("Untitled", 64, 24),
            view,
            preferences.undo_limit,
        );

        app.add_plugins(EguiPlugin::default())
            .add_plugins(PlatformAnimationPlugin)
            .add_plugins(StoragePlugin::new(storage, self.level, &preferences))
            .add_plugins(EditorToolsPlugin)
            .add_plugins(EditorRenderPlugin)
            .add_plugins(EditorUiPlugin)
            .insert_resource(state)
            .insert_resource(preferences)
            .add_systems(Startup, setup_editor_camera)
            .add_systems(Update, handle_keyboard_shortcuts);
    }
}

/// Spawns the editor camera if one doesn't exist
fn setup_editor_camera(mut commands: Commands, camera_query: Query<&Camera2d>) {
    if camera_query.is_empty() {
        commands.spawn(Camera2d);
    }
}

/// Zoom, scroll and canvas size as supplied by the hosting window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub grid_size: f32,
    pub zoom: f32,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub show_grid: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            grid_size: 32.0,
            zoom: 1.0,
            scroll_left: 0.0,
            scroll_top: 0.0,
            canvas_width: 1280.0,
            canvas_height: 720.0,
            show_grid: true,
        }
    }
}

/// Editing session state.
///
/// Owns the level and everything that mutates it; tools, history and the
/// renderer all go through its operations.
#[derive(Resource)]
pub struct EditorState {
    level: Level,
    library: TileLibrary,
    pub view: ViewState,
    tool: EditorTool,
    paint_source: PaintSource,
    /// Layer new tiles are placed on
    pub selected_layer: TileLayer,
    selection: Selection,
    clipboard: Option<TileClipboard>,
    history: CommandHistory,
    pending: Option<PendingConfirmation>,
    drag: DragState,
    hover: Option<(i32, i32)>,
    context_menu: Option<ContextMenu>,
    pub frame: FrameScheduler,
    revision: u64,
    pub save_status: SaveStatus,
    /// Set when a save hit the storage quota
    pub show_free_space_prompt: bool,
    save_requested: bool,
    /// Library edits not yet handed to storage
    library_changes: Vec<LibraryChange>,
}

impl EditorState {
    pub fn new(level: Level, view: ViewState, undo_limit: usize) -> Self {
        let mut state = Self {
            level,
            library: TileLibrary::new(),
            view,
            tool: EditorTool::Select,
            paint_source: PaintSource::None,
            selected_layer: TileLayer::Primary,
            selection: Selection::default(),
            clipboard: None,
            history: CommandHistory::with_limit(undo_limit),
            pending: None,
            drag: DragState::None,
            hover: None,
            context_menu: None,
            frame: FrameScheduler::default(),
            revision: 0,
            save_status: SaveStatus::Idle,
            show_free_space_prompt: false,
            save_requested: false,
            library_changes: Vec::new(),
        };
        state.frame.request();
        state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn library(&self) -> &TileLibrary {
        &self.library
    }

    /// Replace the whole library, e.g. once storage has loaded it. Not persisted.
    pub fn set_library(&mut self, library: TileLibrary) {
        self.library = library;
        self.frame.request();
    }

    /// Add or replace a tile definition. Library edits are not undoable.
    pub fn register_tile(&mut self, tile: TileDefinition) {
        self.library.add_tile(tile.clone());
        self.library_changes.push(LibraryChange::SaveTile(tile));
        self.frame.request();
    }

    pub fn register_fill_pattern(&mut self, fill: FillPattern) {
        self.library.add_fill_pattern(fill.clone());
        self.library_changes.push(LibraryChange::SaveFillPattern(fill));
        self.frame.request();
    }

    pub fn register_pattern(&mut self, pattern: Pattern) {
        self.library.add_pattern(pattern.clone());
        self.library_changes.push(LibraryChange::SavePattern(pattern));
        self.frame.request();
    }

    /// Remove a pattern; a pattern stamp using it is dropped as paint source
    pub fn delete_pattern(&mut self, id: &str) -> bool {
        if self.library.remove_pattern(id).is_none() {
            return false;
        }
        if self.paint_source == PaintSource::Pattern(id.to_string()) {
            self.paint_source = PaintSource::None;
            self.end_gesture();
        }
        self.library_changes.push(LibraryChange::DeletePattern(id.to_string()));
        self.frame.request();
        true
    }

    /// Drain library edits waiting to be persisted
    pub fn take_library_changes(&mut self) -> Vec<LibraryChange> {
        std::mem::take(&mut self.library_changes)
    }

    pub fn tool(&self) -> EditorTool {
        self.tool
    }

    pub fn paint_source(&self) -> &PaintSource {
        &self.paint_source
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> Option<&TileClipboard> {
        self.clipboard.as_ref()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn hover(&self) -> Option<(i32, i32)> {
        self.hover
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// Bumped on every level mutation, including undo/redo
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Coordinate transform for the current view
    pub fn viewport(&self) -> Viewport {
        Viewport {
            grid_size: self.view.grid_size,
            zoom: self.view.zoom,
            scroll_left: self.view.scroll_left,
            scroll_top: self.view.scroll_top,
            canvas_width: self.view.canvas_width,
            canvas_height: self.view.canvas_height,
            map_height_cells: self.level.height(),
        }
    }

    /// Switch tool. Select and Delete drop the active paint source.
    pub fn set_tool(&mut self, tool: EditorTool) {
        if tool != EditorTool::Platform {
            self.paint_source = PaintSource::None;
        }
        self.tool = tool;
        self.end_gesture();
        self.frame.request();
    }

    pub fn select_tile(&mut self, tile_id: impl Into<String>) {
        self.set_paint_source(PaintSource::Tile(tile_id.into()));
    }

    pub fn select_pattern(&mut self, pattern_id: impl Into<String>) {
        self.set_paint_source(PaintSource::Pattern(pattern_id.into()));
    }

    pub fn select_fill_pattern(&mut self, fill_pattern_id: impl Into<String>) {
        self.set_paint_source(PaintSource::FillPattern(fill_pattern_id.into()));
    }

    fn set_paint_source(&mut self, source: PaintSource) {
        self.paint_source = source;
        self.tool = EditorTool::Platform;
        self.end_gesture();
        self.frame.request();
    }

    /// Drop the gesture in progress. A brush stroke is recorded first so its
    /// paint never sits outside the history.
    pub(crate) fn end_gesture(&mut self) {
        if matches!(self.drag, DragState::Painting { .. }) {
            self.end_fill();
        } else {
            self.drag = DragState::None;
        }
    }

    /// Apply `edit` as one undoable operation. Nothing is recorded if it reports no change.
    pub(crate) fn commit(
        &mut self,
        description: &str,
        edit: impl FnOnce(&mut Level) -> bool,
    ) -> bool {
        let before = self.level.clone();
        if !edit(&mut self.level) {
            return false;
        }
        self.history.push_undo(LevelSnapshot::new(before, description));
        self.level_changed();
        true
    }

    /// Record a mutation that already happened (brush strokes)
    pub(crate) fn commit_snapshot(&mut self, before: Level, description: &str) {
        self.history.push_undo(LevelSnapshot::new(before, description));
        self.level_changed();
    }

    /// Mutate the level without recording history (fixtures, loaded data)
    #[cfg(test)]
    pub(crate) fn edit_level_untracked(&mut self, edit: impl FnOnce(&mut Level)) {
        edit(&mut self.level);
        self.level_changed();
    }

    /// Bookkeeping after any change to `level`
    pub(crate) fn level_changed(&mut self) {
        self.revision += 1;
        self.selection.retain_valid(&self.level);
        self.frame.request();
    }

    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        match self.history.undo(self.level.clone()) {
            Some(previous) => {
                self.level = previous;
                self.level_changed();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        match self.history.redo(self.level.clone()) {
            Some(next) => {
                self.level = next;
                self.level_changed();
                true
            }
            None => false,
        }
    }

    pub fn request_save(&mut self) {
        self.save_requested = true;
    }

    /// Consume the explicit-save request
    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }

    /// Replace the edited level and reset the session. The clipboard survives.
    pub fn switch_level(&mut self, level: Level) {
        self.level = level;
        self.selection.clear();
        self.history.clear();
        self.pending = None;
        self.drag = DragState::None;
        self.hover = None;
        self.context_menu = None;
        self.view.scroll_left = 0.0;
        self.view.scroll_top = 0.0;
        self.save_status = SaveStatus::Idle;
        self.show_free_space_prompt = false;
        self.revision += 1;
        self.frame.request();
    }

    /// Change map dimensions, keeping the overlapping region
    pub fn resize_level(&mut self, width: u32, height: u32) -> bool {
        let changed = self.commit("Resize level", |level| {
            if level.width() == width && level.height() == height {
                return false;
            }
            level.resize(width, height);
            true
        });
        if changed {
            self.clamp_scroll();
        }
        changed
    }

    pub fn add_object(&mut self, object: LevelObject) -> Uuid {
        let id = object.id;
        self.commit("Add object", |level| {
            level.add_object(object);
            true
        });
        id
    }

    pub fn set_object_movement(&mut self, id: Uuid, movement: Option<Movement>) -> bool {
        self.commit("Edit movement", |level| match level.object_mut(id) {
            Some(object) if object.movement != movement => {
                object.movement = movement;
                true
            }
            _ => false,
        })
    }

    pub fn move_object(&mut self, id: Uuid, position: [f32; 2]) -> bool {
        self.commit("Move object", |level| match level.object_mut(id) {
            Some(object) if object.position != position => {
                object.position = position;
                true
            }
            _ => false,
        })
    }

    pub fn remove_object(&mut self, id: Uuid) -> bool {
        let removed = self.commit("Remove object", |level| level.remove_object(id).is_some());
        if removed && self.selection.object == Some(id) {
            self.selection.object = None;
        }
        removed
    }

    /// Rename the level
    pub fn rename_level(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.commit("Rename level", |level| {
            if level.name == name {
                return false;
            }
            level.name = name;
            true
        })
    }

    /// Host canvas resized
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        if self.view.canvas_width == width && self.view.canvas_height == height {
            return;
        }
        self.view.canvas_width = width;
        self.view.canvas_height = height;
        self.clamp_scroll();
        self.frame.request();
    }

    pub fn set_show_grid(&mut self, show_grid: bool) {
        self.view.show_grid = show_grid;
        self.frame.request();
    }

    /// Keep scroll offsets within `[0, content - canvas]`
    pub(crate) fn clamp_scroll(&mut self) {
        let (max_left, max_top) = self.viewport().max_scroll(self.level.width());
        self.view.scroll_left = self.view.scroll_left.clamp(0.0, max_left);
        self.view.scroll_top = self.view.scroll_top.clamp(0.0, max_top);
    }

    /// End of session: drop anything waiting on a frame
    pub fn shutdown(&mut self) {
        self.end_gesture();
        self.frame.cancel();
        self.pending = None;
    }
}

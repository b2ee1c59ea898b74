//! Editor panels: toolbar, palette, status bar, prompts and the context menu

mod dialogs;
mod status;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass};
use bevy_level_core::TileLibrary;

use crate::storage::session_active;
use crate::EditorState;

/// Main UI plugin
pub struct EditorUiPlugin;

impl Plugin for EditorUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiState>()
            .add_systems(EguiPrimaryContextPass, render_ui.run_if(session_active));
    }
}

/// Text buffers and what the panels took from the canvas last frame
#[derive(Resource, Debug, Default)]
pub struct UiState {
    /// Name typed for a new pattern
    pub pattern_name: String,
    /// Name typed in the context menu's rename field
    pub rename: String,
    /// Pointer is over a panel; canvas clicks and wheel zoom are skipped
    pub pointer_over_ui: bool,
    /// A text field has focus; keyboard shortcuts are skipped
    pub typing: bool,
}

impl UiState {
    pub(crate) fn blocks_pointer(ui_state: Option<&UiState>) -> bool {
        ui_state.is_some_and(|ui| ui.pointer_over_ui)
    }

    pub(crate) fn blocks_keyboard(ui_state: Option<&UiState>) -> bool {
        ui_state.is_some_and(|ui| ui.typing)
    }
}

/// One paintable entry in a palette row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub id: String,
    pub name: String,
}

/// Tiles, fill patterns and patterns of `library`, each sorted by name then id
pub fn palette(library: &TileLibrary) -> [Vec<PaletteEntry>; 3] {
    fn sorted<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> Vec<PaletteEntry> {
        let mut entries: Vec<PaletteEntry> = entries
            .map(|(id, name)| PaletteEntry {
                id: id.clone(),
                name: if name.is_empty() { id.clone() } else { name.clone() },
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        entries
    }
    [
        sorted(library.tiles.values().map(|t| (&t.id, &t.name))),
        sorted(library.fill_patterns.values().map(|f| (&f.id, &f.name))),
        sorted(library.patterns.values().map(|p| (&p.id, &p.name))),
    ]
}

fn render_ui(
    mut contexts: EguiContexts,
    mut editor_state: ResMut<EditorState>,
    mut ui_state: ResMut<UiState>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    toolbar::render_toolbar(ctx, &mut editor_state, &mut ui_state);
    status::render_status_bar(ctx, &editor_state);
    dialogs::render_confirmation(ctx, &mut editor_state);
    dialogs::render_free_space_prompt(ctx, &mut editor_state);
    dialogs::render_context_menu(ctx, &mut editor_state, &mut ui_state);

    ui_state.pointer_over_ui = ctx.is_pointer_over_area();
    ui_state.typing = ctx.wants_keyboard_input();
}

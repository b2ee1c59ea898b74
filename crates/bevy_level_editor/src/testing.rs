//! Test helpers for editor state and tool tests.
//!
//! Import the whole module via glob in test modules:
//!
//! ```rust,ignore
//! #[cfg(test)]
//! mod tests {
//!     use crate::testing::*;
//! }
//! ```
#![allow(dead_code)]

use bevy_level_core::{FillPattern, Level, TileDefinition, TileLayer, TileLibrary};

pub use crate::tools::{
    ContextAction, DragState, EditorTool, Modifiers, PaintSource, PendingConfirmation,
    PointerButton,
};
pub use crate::{EditorState, ViewState};

// ============================================================================
// Factory Functions
// ============================================================================

/// Library used by tool tests: an impassable `solid`, a passable `ice` and a
/// `moss` fill pattern.
pub fn test_library() -> TileLibrary {
    let mut library = TileLibrary::new();
    library.add_tile(TileDefinition::new("solid", "Solid", "tiles/solid.png").solid());
    library.add_tile(TileDefinition::new("ice", "Ice", "tiles/ice.png"));
    library.add_fill_pattern(FillPattern::new("moss", "Moss", "fills/moss.png"));
    library
}

/// Editor on an empty `width` x `height` level with an 800x600 canvas,
/// 32px cells and zoom 1.
pub fn editor_with_grid(width: u32, height: u32) -> EditorState {
    let view = ViewState {
        grid_size: 32.0,
        zoom: 1.0,
        canvas_width: 800.0,
        canvas_height: 600.0,
        ..ViewState::default()
    };
    let mut state = EditorState::new(Level::new("test", width, height), view, 100);
    state.set_library(test_library());
    state
}

/// Write a filled block of `tile_id` on the primary layer, bypassing tools and history
pub fn place_block(state: &mut EditorState, tile_id: &str, from: (i32, i32), to: (i32, i32)) {
    let passable = state
        .library()
        .tiles
        .get(tile_id)
        .map_or(true, |tile| tile.passable);
    state.edit_level_untracked(|level| {
        for y in from.1.min(to.1)..=from.1.max(to.1) {
            for x in from.0.min(to.0)..=from.0.max(to.0) {
                level.grid.set(tile_id, x, y, passable, Some(TileLayer::Primary));
            }
        }
    });
}

// ============================================================================
// Pointer Helpers
// ============================================================================

/// Canvas pixel at the center of a cell under the current view
pub fn cell_center(state: &EditorState, x: i32, y: i32) -> (f32, f32) {
    state.viewport().cell_rect(x, y).center()
}

/// Left press and release on a cell without moving the pointer first
pub fn click_with(state: &mut EditorState, x: i32, y: i32, modifiers: Modifiers) {
    let (px, py) = cell_center(state, x, y);
    state.pointer_down(PointerButton::Left, px, py, modifiers);
    state.pointer_up(PointerButton::Left, px, py);
}

pub fn click(state: &mut EditorState, x: i32, y: i32) {
    click_with(state, x, y, Modifiers::NONE);
}

/// Left drag from one cell to another
pub fn drag(state: &mut EditorState, from: (i32, i32), to: (i32, i32)) {
    let (x0, y0) = cell_center(state, from.0, from.1);
    let (x1, y1) = cell_center(state, to.0, to.1);
    state.pointer_down(PointerButton::Left, x0, y0, Modifiers::NONE);
    state.pointer_move(x1, y1);
    state.pointer_up(PointerButton::Left, x1, y1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_block_bypasses_history() {
        let mut state = editor_with_grid(8, 8);
        place_block(&mut state, "solid", (2, 2), (0, 0));
        assert_eq!(state.level().grid.tile_count(), 9);
        assert!(!state.level().grid.get(1, 1).unwrap().passable);
        assert!(!state.history().can_undo());
    }

    #[test]
    fn test_cell_center_maps_back() {
        let state = editor_with_grid(8, 8);
        let (x, y) = cell_center(&state, 3, 5);
        assert_eq!(state.viewport().canvas_to_cell(x, y), (3, 5));
    }
}

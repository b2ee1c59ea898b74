//! Right-click menu, clipboard actions and pattern capture

use bevy_level_core::{find_group, Pattern};
use uuid::Uuid;

use super::EditorTool;
use crate::commands::TileClipboard;
use crate::storage::LibraryChange;
use crate::EditorState;

/// Open context menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    /// Cell the menu was opened on
    pub cell: (i32, i32),
    /// Canvas position to draw the menu at
    pub canvas: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextAction {
    Copy,
    Cut,
    Paste,
    Delete,
    /// Set the display name; an empty string clears it
    Rename(String),
    /// Move to the next layer (background, primary, foreground, background...)
    CycleLayer,
    /// Swap the tile id, keeping layer and physics
    ReplaceTexture(String),
    TogglePassable,
    ClearFillPattern,
}

impl ContextAction {
    pub fn label(&self) -> &'static str {
        match self {
            ContextAction::Copy => "Copy",
            ContextAction::Cut => "Cut",
            ContextAction::Paste => "Paste",
            ContextAction::Delete => "Delete",
            ContextAction::Rename(_) => "Rename",
            ContextAction::CycleLayer => "Change layer",
            ContextAction::ReplaceTexture(_) => "Replace texture",
            ContextAction::TogglePassable => "Toggle passable",
            ContextAction::ClearFillPattern => "Clear fill pattern",
        }
    }
}

impl EditorState {
    /// Right click: the first one drops the active tool or paint source,
    /// the next one opens the menu.
    pub(crate) fn right_click(&mut self, cell: (i32, i32), canvas: (f32, f32)) {
        if self.tool != EditorTool::Select || !self.paint_source.is_none() {
            self.set_tool(EditorTool::Select);
            self.context_menu = None;
            return;
        }
        self.context_menu = self
            .level
            .grid
            .in_bounds(cell.0, cell.1)
            .then_some(ContextMenu { cell, canvas });
        self.frame.request();
    }

    pub fn close_context_menu(&mut self) {
        if self.context_menu.take().is_some() {
            self.frame.request();
        }
    }

    /// Cells a context action at `cell` applies to: the selection if `cell` is
    /// part of it, otherwise the group under `cell`.
    pub fn context_scope(&self, cell: (i32, i32)) -> Vec<(i32, i32)> {
        if self.selection.contains(cell.0, cell.1) {
            return self.selection.cells();
        }
        find_group(&self.level.grid, cell.0, cell.1)
            .map(|group| group.positions().collect())
            .unwrap_or_default()
    }

    /// Run `action` on the open menu's scope and close the menu
    pub fn apply_context_action(&mut self, action: ContextAction) -> bool {
        let Some(menu) = self.context_menu.take() else {
            return false;
        };
        self.frame.request();
        let scope = self.context_scope(menu.cell);

        match action {
            ContextAction::Copy => self.copy_cells(&scope),
            ContextAction::Cut => self.cut_cells(&scope),
            ContextAction::Paste => self.paste_at(menu.cell),
            ContextAction::Delete => {
                let had_cells = !scope.is_empty();
                self.request_delete(scope);
                had_cells
            }
            ContextAction::Rename(name) => {
                let name = Some(name.trim()).filter(|n| !n.is_empty());
                self.commit("Rename tiles", |level| {
                    scope.iter().fold(false, |changed, &(x, y)| {
                        level.grid.set_display_name(x, y, name) | changed
                    })
                })
            }
            ContextAction::CycleLayer => {
                let Some(layer) = self.level.grid.get(menu.cell.0, menu.cell.1).map(|c| c.layer.next())
                else {
                    return false;
                };
                let changed = self.commit("Change layer", |level| {
                    scope
                        .iter()
                        .fold(false, |changed, &(x, y)| level.grid.set_layer(x, y, layer) | changed)
                });
                if changed {
                    self.selected_layer = layer;
                    self.select_cell(menu.cell.0, menu.cell.1, false);
                }
                changed
            }
            ContextAction::ReplaceTexture(tile_id) => self.commit("Replace texture", |level| {
                scope.iter().fold(false, |changed, &(x, y)| {
                    level.grid.replace_tile_id(x, y, &tile_id) | changed
                })
            }),
            ContextAction::TogglePassable => {
                let Some(passable) = self
                    .level
                    .grid
                    .occupied_cell(menu.cell.0, menu.cell.1)
                    .map(|c| !c.passable)
                else {
                    return false;
                };
                self.commit("Toggle passable", |level| {
                    scope.iter().fold(false, |changed, &(x, y)| {
                        level.grid.set_passable(x, y, passable) | changed
                    })
                })
            }
            ContextAction::ClearFillPattern => self.commit("Clear fill pattern", |level| {
                scope.iter().fold(false, |changed, &(x, y)| {
                    level.grid.set_fill_pattern(x, y, None) | changed
                })
            }),
        }
    }

    /// Copy the selected tiles. Returns false when nothing is selected.
    pub fn copy_selection(&mut self) -> bool {
        let cells = self.selection.cells();
        self.copy_cells(&cells)
    }

    /// Copy then remove the selected tiles as one undoable edit
    pub fn cut_selection(&mut self) -> bool {
        let cells = self.selection.cells();
        self.cut_cells(&cells)
    }

    /// Paste at the hovered cell, or back where the tiles were copied from
    pub fn paste(&mut self) -> bool {
        let Some(origin) = self.clipboard.as_ref().map(|c| c.origin) else {
            return false;
        };
        self.paste_at(self.hover.unwrap_or(origin))
    }

    fn copy_cells(&mut self, cells: &[(i32, i32)]) -> bool {
        match TileClipboard::capture(&self.level.grid, cells.iter().copied()) {
            Some(clipboard) => {
                self.clipboard = Some(clipboard);
                true
            }
            None => false,
        }
    }

    fn cut_cells(&mut self, cells: &[(i32, i32)]) -> bool {
        if !self.copy_cells(cells) {
            return false;
        }
        self.commit("Cut", |level| {
            cells
                .iter()
                .fold(false, |changed, &(x, y)| level.grid.remove(x, y) | changed)
        })
    }

    fn paste_at(&mut self, dest: (i32, i32)) -> bool {
        let Some(clipboard) = self.clipboard.clone() else {
            return false;
        };
        self.commit("Paste", |level| clipboard.paste_into(&mut level.grid, dest))
    }

    /// Register the selected tiles as a reusable pattern. Returns the new pattern id.
    pub fn create_pattern_from_selection(&mut self, name: impl Into<String>) -> Option<String> {
        let cells: Vec<_> = self
            .selection
            .cells()
            .into_iter()
            .filter_map(|(x, y)| {
                let cell = self.level.grid.occupied_cell(x, y)?;
                Some((x, y, cell.tile()?.to_string(), cell.passable, cell.layer))
            })
            .collect();
        if cells.is_empty() {
            return None;
        }
        let id = Uuid::new_v4().to_string();
        let pattern = Pattern::from_cells(id.clone(), name, cells);
        self.library.add_pattern(pattern.clone());
        self.library_changes.push(LibraryChange::SavePattern(pattern));
        self.frame.request();
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use bevy_level_core::TileLayer;

    fn open_menu(state: &mut EditorState, x: i32, y: i32) {
        let (px, py) = cell_center(state, x, y);
        state.pointer_down(PointerButton::Right, px, py, Modifiers::NONE);
    }

    #[test]
    fn test_first_right_click_cancels_tool() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (0, 0));
        state.select_tile("solid");
        open_menu(&mut state, 0, 0);
        assert_eq!(state.tool(), EditorTool::Select);
        assert!(state.paint_source().is_none());
        assert!(state.context_menu().is_none());

        open_menu(&mut state, 0, 0);
        assert_eq!(state.context_menu().map(|m| m.cell), Some((0, 0)));
    }

    #[test]
    fn test_copy_then_paste_at_origin_reproduces() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (2, 2), (4, 3));
        let original = state.level().grid.clone();
        click(&mut state, 3, 3);
        assert!(state.copy_selection());

        state.set_tool(EditorTool::Delete);
        click_with(&mut state, 2, 2, Modifiers::SHIFT);
        state.confirm();
        assert_eq!(state.level().grid.tile_count(), 0);

        assert!(state.paste());
        assert_eq!(state.level().grid, original);
    }

    #[test]
    fn test_cut_then_paste_elsewhere_moves_tiles() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "ice", (0, 0), (1, 0));
        click(&mut state, 0, 0);
        assert!(state.cut_selection());
        assert_eq!(state.level().grid.tile_count(), 0);

        let (x, y) = cell_center(&state, 5, 5);
        state.pointer_move(x, y);
        assert!(state.paste());
        let grid = &state.level().grid;
        assert_eq!(grid.tile_at(5, 5), Some("ice"));
        assert_eq!(grid.tile_at(6, 5), Some("ice"));
        assert_eq!(grid.tile_at(0, 0), None);
        assert_eq!(grid.tile_count(), 2);
    }

    #[test]
    fn test_context_scope_prefers_selection() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (1, 0));
        place_block(&mut state, "ice", (5, 5), (5, 5));
        click(&mut state, 0, 0);
        click_with(&mut state, 5, 5, Modifiers::MULTI);
        assert_eq!(state.context_scope((5, 5)).len(), 3);

        state.cancel_current();
        assert_eq!(state.context_scope((5, 5)), vec![(5, 5)]);
        assert!(state.context_scope((9, 9)).is_empty());
    }

    #[test]
    fn test_context_delete_group_confirms() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (2, 0));
        open_menu(&mut state, 1, 0);
        assert!(state.apply_context_action(ContextAction::Delete));
        assert!(state.context_menu().is_none());
        assert!(state.pending().is_some());
        state.confirm();
        assert_eq!(state.level().grid.tile_count(), 0);
    }

    #[test]
    fn test_context_edits_are_single_commits() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (2, 0));

        open_menu(&mut state, 0, 0);
        state.apply_context_action(ContextAction::TogglePassable);
        assert!(state.level().grid.occupied().all(|(_, _, c)| c.passable));

        open_menu(&mut state, 0, 0);
        state.apply_context_action(ContextAction::Rename("ledge".to_string()));
        assert!(state
            .level()
            .grid
            .occupied()
            .all(|(_, _, c)| c.display_name.as_deref() == Some("ledge")));

        open_menu(&mut state, 0, 0);
        state.apply_context_action(ContextAction::ReplaceTexture("ice".to_string()));
        assert!(state.level().grid.occupied().all(|(_, _, c)| c.tile() == Some("ice")));
        assert!(state.level().grid.occupied().all(|(_, _, c)| c.passable));

        open_menu(&mut state, 0, 0);
        state.apply_context_action(ContextAction::CycleLayer);
        assert!(state
            .level()
            .grid
            .occupied()
            .all(|(_, _, c)| c.layer == TileLayer::Foreground));
        assert_eq!(state.selected_layer, TileLayer::Foreground);

        assert_eq!(state.history().undo_len(), 4);
        state.undo();
        assert!(state
            .level()
            .grid
            .occupied()
            .all(|(_, _, c)| c.layer == TileLayer::Primary));
    }

    #[test]
    fn test_create_pattern_from_selection() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (3, 3), (4, 3));
        place_block(&mut state, "ice", (3, 4), (3, 4));
        click(&mut state, 3, 3);
        click_with(&mut state, 3, 4, Modifiers::MULTI);

        let id = state.create_pattern_from_selection("ledge").unwrap();
        let pattern = state.library().patterns.get(&id).unwrap();
        assert_eq!(pattern.name, "ledge");
        assert_eq!(pattern.size(), (2, 2));
        assert_eq!(pattern.cells.len(), 3);
        assert_eq!(state.take_library_changes().len(), 1);
    }

    #[test]
    fn test_nothing_selected_creates_no_pattern() {
        let mut state = editor_with_grid(10, 10);
        assert!(state.create_pattern_from_selection("empty").is_none());
        assert!(!state.copy_selection());
        assert!(!state.paste());
    }
}

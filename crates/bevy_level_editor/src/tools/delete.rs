//! Delete tool

use bevy_level_core::find_group;

use super::PendingConfirmation;
use crate::EditorState;

impl EditorState {
    /// Remove the tile at `cell`.
    ///
    /// With `group` set the whole connected group goes, behind a confirmation
    /// when it has more than one member.
    pub(crate) fn delete_at(&mut self, cell: (i32, i32), group: bool) {
        if self.level.grid.occupied_cell(cell.0, cell.1).is_none() {
            return;
        }
        if group {
            if let Some(group) = find_group(&self.level.grid, cell.0, cell.1) {
                if group.len() > 1 {
                    self.request_delete(group.positions().collect());
                    return;
                }
            }
        }
        self.commit("Delete tile", |level| level.grid.remove(cell.0, cell.1));
    }

    /// Delete `cells`: immediately for one cell, behind a confirmation for more
    pub(crate) fn request_delete(&mut self, cells: Vec<(i32, i32)>) {
        match cells.as_slice() {
            [] => {}
            [(x, y)] => {
                let (x, y) = (*x, *y);
                self.commit("Delete tile", |level| level.grid.remove(x, y));
            }
            _ => {
                self.pending = Some(PendingConfirmation::GroupDelete { cells });
                self.frame.request();
            }
        }
    }

    /// Delete the current tile selection, or the selected object
    pub fn delete_selected(&mut self) {
        let cells = self.selection.cells();
        if !cells.is_empty() {
            self.request_delete(cells);
        } else if let Some(id) = self.selection.object {
            self.remove_object(id);
        }
    }
}

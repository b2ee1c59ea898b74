//! Fill-pattern brush
//!
//! Decorates existing tiles only. A stroke is recorded as one undo entry.

use bevy_level_core::find_group;

use super::DragState;
use crate::EditorState;

impl EditorState {
    /// Start a brush stroke at `cell`, or flood the cell's group when `flood` is set
    pub(crate) fn begin_fill(&mut self, cell: (i32, i32), fill_pattern_id: &str, flood: bool) {
        if flood {
            let Some(group) = find_group(&self.level.grid, cell.0, cell.1) else {
                return;
            };
            self.commit("Fill group", |level| {
                group.positions().fold(false, |changed, (x, y)| {
                    level.grid.set_fill_pattern(x, y, Some(fill_pattern_id)) | changed
                })
            });
            return;
        }

        let before = Box::new(self.level.clone());
        let changed = self.paint_cell(cell, fill_pattern_id);
        self.drag = DragState::Painting {
            fill_pattern_id: fill_pattern_id.to_string(),
            before,
            last_cell: cell,
            changed,
        };
    }

    /// Brush over `cell` while the button is held
    pub(crate) fn continue_fill(&mut self, cell: (i32, i32)) {
        let DragState::Painting {
            fill_pattern_id,
            last_cell,
            ..
        } = &mut self.drag
        else {
            return;
        };
        if *last_cell == cell {
            return;
        }
        *last_cell = cell;
        let fill_pattern_id = fill_pattern_id.clone();

        if self.paint_cell(cell, &fill_pattern_id) {
            if let DragState::Painting { changed, .. } = &mut self.drag {
                *changed = true;
            }
        }
    }

    /// Finish the stroke, recording it if anything was painted
    pub(crate) fn end_fill(&mut self) {
        if let DragState::Painting {
            before, changed, ..
        } = std::mem::take(&mut self.drag)
        {
            if changed {
                self.commit_snapshot(*before, "Paint fill pattern");
            }
        }
    }

    /// Paint one cell without touching history
    fn paint_cell(&mut self, cell: (i32, i32), fill_pattern_id: &str) -> bool {
        if !self
            .level
            .grid
            .set_fill_pattern(cell.0, cell.1, Some(fill_pattern_id))
        {
            return false;
        }
        self.revision += 1;
        self.frame.request();
        true
    }
}

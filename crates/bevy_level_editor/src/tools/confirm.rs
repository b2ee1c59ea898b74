//! Pending confirmations

use bevy_level_core::GroupCell;

use super::Placement;
use crate::EditorState;

/// A blocked mutation waiting for the user. Only one can be pending.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingConfirmation {
    /// Remove every listed cell
    GroupDelete { cells: Vec<(i32, i32)> },
    /// Write `placement`, destroying the groups it touches
    PlaceOverwrite {
        placement: Placement,
        overlapping_cells: Vec<GroupCell>,
    },
}

impl PendingConfirmation {
    /// Cells to highlight while the prompt is open
    pub fn affected_cells(&self) -> Vec<(i32, i32)> {
        match self {
            PendingConfirmation::GroupDelete { cells } => cells.clone(),
            PendingConfirmation::PlaceOverwrite {
                overlapping_cells, ..
            } => overlapping_cells.iter().map(|c| (c.x, c.y)).collect(),
        }
    }

    /// Prompt text
    pub fn message(&self) -> String {
        match self {
            PendingConfirmation::GroupDelete { cells } => {
                format!("Delete {} connected tiles?", cells.len())
            }
            PendingConfirmation::PlaceOverwrite {
                overlapping_cells, ..
            } => format!(
                "Placing here replaces existing platforms ({} tiles). Continue?",
                overlapping_cells.len()
            ),
        }
    }
}

impl EditorState {
    /// Carry out the pending mutation. A second call is a no-op returning false.
    pub fn confirm(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match pending {
            PendingConfirmation::GroupDelete { cells } => {
                self.commit("Delete group", |level| {
                    cells
                        .iter()
                        .fold(false, |changed, &(x, y)| level.grid.remove(x, y) | changed)
                });
            }
            PendingConfirmation::PlaceOverwrite { placement, .. } => {
                self.apply_placement(&placement);
            }
        }
        self.frame.request();
        true
    }

    /// Drop the pending mutation. A second call is a no-op returning false.
    pub fn cancel(&mut self) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        self.frame.request();
        true
    }
}

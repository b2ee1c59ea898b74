//! Editor tools - selection, placement, fill painting, deletion, pan/zoom
//!
//! Every pointer event maps to exactly one transition on [`EditorState`]:
//! [`pointer_down`](EditorState::pointer_down), [`pointer_move`](EditorState::pointer_move),
//! [`pointer_up`](EditorState::pointer_up) or [`wheel_zoom`](EditorState::wheel_zoom).
//! Coordinates are canvas pixels with the origin at the top-left of the view.

mod confirm;
mod context;
mod delete;
mod input;
mod paint;
mod place;
mod select;

pub use confirm::PendingConfirmation;
pub use context::{ContextAction, ContextMenu};
pub use input::{handle_canvas_input, handle_zoom_input, sync_canvas_size};
pub use place::Placement;

use bevy::prelude::*;
use bevy_level_core::{find_group, Level, TileGroup, TileLayer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::session_active;
use crate::{EditorState, ZOOM_MAX, ZOOM_MIN};

/// Zoom factor per wheel step
pub const ZOOM_STEP: f32 = 1.1;

/// Plugin for editor tools and canvas input
pub struct EditorToolsPlugin;

impl Plugin for EditorToolsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (sync_canvas_size, handle_canvas_input, handle_zoom_input)
                .chain()
                .run_if(session_active),
        );
    }
}

/// Tool mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTool {
    #[default]
    Select,
    /// Place tiles, stamp patterns or brush fill patterns
    Platform,
    Delete,
}

impl EditorTool {
    pub fn label(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select",
            EditorTool::Platform => "Platform",
            EditorTool::Delete => "Delete",
        }
    }
}

/// What the platform tool paints with. At most one source is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaintSource {
    #[default]
    None,
    Tile(String),
    Pattern(String),
    FillPattern(String),
}

impl PaintSource {
    pub fn is_none(&self) -> bool {
        matches!(self, PaintSource::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Modifier keys held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Group delete / flood fill
    pub shift: bool,
    /// Additive selection (Ctrl/Cmd)
    pub multi: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        multi: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        multi: false,
    };
    pub const MULTI: Modifiers = Modifiers {
        shift: false,
        multi: true,
    };
}

/// The most recently clicked cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedCell {
    pub x: i32,
    pub y: i32,
    pub layer: TileLayer,
}

/// Current tile and object selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub primary: Option<SelectedCell>,
    /// Selected groups, at most one per group identity
    pub groups: Vec<TileGroup>,
    pub object: Option<Uuid>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.primary = None;
        self.groups.clear();
        self.object = None;
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.groups.is_empty() && self.object.is_none()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.groups.iter().any(|g| g.contains(x, y))
    }

    /// Every selected cell, each once
    pub fn cells(&self) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = self.groups.iter().flat_map(|g| g.positions()).collect();
        if cells.is_empty() {
            cells.extend(self.primary.map(|p| (p.x, p.y)));
        }
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Replace the selection with one group
    pub fn select_group(&mut self, group: TileGroup) {
        self.groups.clear();
        self.groups.push(group);
        self.object = None;
    }

    /// Add `group`, or remove it if a group with the same identity is selected.
    /// Returns true if the group is selected afterwards.
    pub fn toggle_group(&mut self, group: TileGroup) -> bool {
        let id = group.id();
        if let Some(idx) = self.groups.iter().position(|g| g.id() == id) {
            self.groups.remove(idx);
            false
        } else {
            self.groups.push(group);
            self.object = None;
            true
        }
    }

    /// Re-derive selected groups from the level after an edit.
    ///
    /// Each group is recomputed from its first member that still holds the
    /// tile, so grown, shrunk or merged groups keep a current identity. Groups
    /// with no surviving member are dropped, and merged groups collapse to one.
    pub(crate) fn retain_valid(&mut self, level: &Level) {
        let mut refreshed: Vec<TileGroup> = Vec::with_capacity(self.groups.len());
        for group in self.groups.drain(..) {
            let survivor = group.cells.iter().find(|cell| {
                level
                    .grid
                    .get(cell.x, cell.y)
                    .is_some_and(|c| c.holds(&cell.tile_id, group.layer))
            });
            let Some(current) = survivor.and_then(|cell| find_group(&level.grid, cell.x, cell.y))
            else {
                continue;
            };
            let id = current.id();
            if !refreshed.iter().any(|g| g.id() == id) {
                refreshed.push(current);
            }
        }
        self.groups = refreshed;
        if let Some(primary) = self.primary {
            if level.grid.occupied_cell(primary.x, primary.y).is_none() {
                self.primary = None;
            }
        }
        if let Some(id) = self.object {
            if level.object(id).is_none() {
                self.object = None;
            }
        }
    }
}

/// In-progress pointer gesture
#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    None,
    /// Rectangle for tile or pattern placement, in cells
    Placing { start: (i32, i32), end: (i32, i32) },
    /// Fill-pattern brush stroke; `before` is the level at stroke start
    Painting {
        fill_pattern_id: String,
        before: Box<Level>,
        last_cell: (i32, i32),
        changed: bool,
    },
    /// Middle-button pan, last pointer position in canvas pixels
    Panning { last: (f32, f32) },
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::None)
    }
}

impl EditorState {
    pub fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32, modifiers: Modifiers) {
        if self.pending.is_some() {
            return;
        }
        let cell = self.viewport().canvas_to_cell(x, y);
        match button {
            PointerButton::Middle => {
                if !self.drag.is_active() {
                    self.drag = DragState::Panning { last: (x, y) };
                }
            }
            PointerButton::Right => self.right_click(cell, (x, y)),
            PointerButton::Left => {
                if self.context_menu.take().is_some() {
                    self.frame.request();
                }
                match self.tool {
                    EditorTool::Select => {
                        let world = self.viewport().canvas_to_world(x, y);
                        self.select_at(cell, world, modifiers.multi);
                    }
                    EditorTool::Delete => self.delete_at(cell, modifiers.shift),
                    EditorTool::Platform => match self.paint_source.clone() {
                        PaintSource::Tile(_) | PaintSource::Pattern(_) => self.begin_placement(cell),
                        PaintSource::FillPattern(id) => self.begin_fill(cell, &id, modifiers.shift),
                        PaintSource::None => {}
                    },
                }
            }
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.pending.is_some() {
            return;
        }
        let cell = self.viewport().canvas_to_cell(x, y);
        let hover = self.level.grid.in_bounds(cell.0, cell.1).then_some(cell);
        if hover != self.hover {
            self.hover = hover;
            self.frame.request();
        }

        let pan_delta = match &mut self.drag {
            DragState::Panning { last } => {
                let delta = (x - last.0, y - last.1);
                *last = (x, y);
                Some(delta)
            }
            _ => None,
        };
        if let Some((dx, dy)) = pan_delta {
            self.pan_by(dx, dy);
        } else if matches!(self.drag, DragState::Placing { .. }) {
            self.update_placement(cell);
        } else if matches!(self.drag, DragState::Painting { .. }) {
            self.continue_fill(cell);
        }
    }

    pub fn pointer_up(&mut self, button: PointerButton, x: f32, y: f32) {
        if self.pending.is_some() {
            return;
        }
        let cell = self.viewport().canvas_to_cell(x, y);
        let placing = matches!(self.drag, DragState::Placing { .. });
        let painting = matches!(self.drag, DragState::Painting { .. });
        let panning = matches!(self.drag, DragState::Panning { .. });
        match button {
            PointerButton::Left if placing => {
                self.update_placement(cell);
                self.finish_placement();
            }
            PointerButton::Left if painting => self.end_fill(),
            PointerButton::Middle if panning => self.drag = DragState::None,
            _ => {}
        }
    }

    /// Zoom by `ZOOM_STEP^steps`, keeping the world point under `(x, y)` in place
    pub fn wheel_zoom(&mut self, steps: f32, x: f32, y: f32) {
        let before = self.viewport();
        let zoom = (self.view.zoom * ZOOM_STEP.powf(steps)).clamp(ZOOM_MIN, ZOOM_MAX);
        if zoom == self.view.zoom {
            return;
        }
        let world = before.canvas_to_world(x, y);
        self.view.zoom = zoom;
        let (scroll_left, scroll_top) = self.viewport().scroll_anchoring(world, (x, y));
        self.view.scroll_left = scroll_left;
        self.view.scroll_top = scroll_top;
        self.clamp_scroll();
        self.frame.request();
    }

    /// Move the view with the pointer (drag right scrolls left)
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.view.scroll_left -= dx;
        self.view.scroll_top -= dy;
        self.clamp_scroll();
        self.frame.request();
    }

    /// Escape: pending confirmation, then drag, then context menu, then selection
    pub fn cancel_current(&mut self) {
        if self.cancel() {
            return;
        }
        if self.drag.is_active() {
            self.end_gesture();
        } else if self.context_menu.take().is_none() {
            self.selection.clear();
        }
        self.frame.request();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn test_middle_drag_pans() {
        let mut state = editor_with_grid(100, 100);
        state.view.scroll_left = 200.0;
        state.view.scroll_top = 200.0;
        state.pointer_down(PointerButton::Middle, 400.0, 300.0, Modifiers::NONE);
        state.pointer_move(350.0, 320.0);
        state.pointer_up(PointerButton::Middle, 350.0, 320.0);
        assert_eq!(state.view.scroll_left, 250.0);
        assert_eq!(state.view.scroll_top, 180.0);
        assert!(!state.drag().is_active());
        assert_eq!(state.tool(), EditorTool::Select);
    }

    #[test]
    fn test_pan_clamps_to_content() {
        let mut state = editor_with_grid(10, 10);
        state.pan_by(-5000.0, 5000.0);
        // 320px map inside an 800x600 canvas: nothing to scroll
        assert_eq!((state.view.scroll_left, state.view.scroll_top), (0.0, 0.0));
    }

    #[test]
    fn test_wheel_zoom_keeps_point_under_cursor() {
        let mut state = editor_with_grid(200, 200);
        state.view.scroll_left = 1000.0;
        state.view.scroll_top = 1000.0;
        let world = state.viewport().canvas_to_world(300.0, 200.0);
        state.wheel_zoom(3.0, 300.0, 200.0);
        assert!((state.view.zoom - 1.331).abs() < 1e-3);
        let (px, py) = state.viewport().world_to_canvas(world.0, world.1);
        assert!((px - 300.0).abs() < 1e-2);
        assert!((py - 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_wheel_zoom_clamps() {
        let mut state = editor_with_grid(10, 10);
        state.wheel_zoom(100.0, 0.0, 0.0);
        assert_eq!(state.view.zoom, ZOOM_MAX);
        state.wheel_zoom(-100.0, 0.0, 0.0);
        assert_eq!(state.view.zoom, ZOOM_MIN);
    }

    #[test]
    fn test_hover_tracks_cells_inside_map() {
        let mut state = editor_with_grid(10, 10);
        let (x, y) = cell_center(&state, 3, 4);
        state.pointer_move(x, y);
        assert_eq!(state.hover(), Some((3, 4)));
        state.pointer_move(790.0, 10.0);
        assert_eq!(state.hover(), None);
    }

    #[test]
    fn test_toggle_group_by_identity() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (2, 0));
        let group = bevy_level_core::find_group(&state.level().grid, 2, 0).unwrap();
        let same = bevy_level_core::find_group(&state.level().grid, 0, 0).unwrap();
        let mut selection = Selection::default();
        assert!(selection.toggle_group(group));
        assert!(!selection.toggle_group(same));
        assert!(selection.groups.is_empty());
    }
}

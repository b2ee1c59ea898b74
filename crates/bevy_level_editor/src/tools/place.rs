//! Rectangle tile placement and pattern stamping

use bevy_level_core::{groups_intersecting, CellRange, GroupCell, Level, Pattern, TileLayer};
use std::collections::BTreeMap;

use super::{DragState, PaintSource, PendingConfirmation};
use crate::EditorState;

/// A write the platform tool is about to make
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Fill every cell of `range` with one tile
    Rect {
        tile_id: String,
        range: CellRange,
        layer: TileLayer,
        passable: bool,
    },
    /// Stamp `pattern` with its (0, 0) cell at `origin`
    Pattern { pattern: Pattern, origin: (i32, i32) },
}

impl Placement {
    /// Cells written, grouped by the layer they land on
    pub fn footprint(&self) -> BTreeMap<TileLayer, Vec<(i32, i32)>> {
        let mut by_layer: BTreeMap<TileLayer, Vec<(i32, i32)>> = BTreeMap::new();
        match self {
            Placement::Rect { range, layer, .. } => {
                by_layer.entry(*layer).or_default().extend(range.iter());
            }
            Placement::Pattern { pattern, origin } => {
                for cell in &pattern.cells {
                    by_layer
                        .entry(cell.layer)
                        .or_default()
                        .push((origin.0 + cell.rel_x, origin.1 + cell.rel_y));
                }
            }
        }
        by_layer
    }

    /// Union of every existing group the placement would touch, sorted by position
    pub fn overlapping_cells(&self, level: &Level) -> Vec<GroupCell> {
        let mut cells: Vec<GroupCell> = self
            .footprint()
            .into_iter()
            .flat_map(|(layer, footprint)| groups_intersecting(&level.grid, footprint, layer))
            .flat_map(|group| group.cells)
            .collect();
        cells.sort_by_key(|c| (c.x, c.y));
        cells.dedup_by_key(|c| (c.x, c.y));
        cells
    }

    /// Write the placement. Out-of-bounds cells are skipped.
    pub fn apply(&self, level: &mut Level) -> bool {
        let mut changed = false;
        match self {
            Placement::Rect {
                tile_id,
                range,
                layer,
                passable,
            } => {
                for (x, y) in range.iter() {
                    changed |= level.grid.set(tile_id, x, y, *passable, Some(*layer));
                }
            }
            Placement::Pattern { pattern, origin } => {
                for cell in &pattern.cells {
                    changed |= level.grid.set(
                        &cell.tile_id,
                        origin.0 + cell.rel_x,
                        origin.1 + cell.rel_y,
                        cell.passable,
                        Some(cell.layer),
                    );
                }
            }
        }
        changed
    }

    fn description(&self) -> &'static str {
        match self {
            Placement::Rect { .. } => "Place tiles",
            Placement::Pattern { .. } => "Stamp pattern",
        }
    }
}

impl EditorState {
    pub(crate) fn begin_placement(&mut self, cell: (i32, i32)) {
        if !self.level.grid.in_bounds(cell.0, cell.1) {
            return;
        }
        self.drag = DragState::Placing {
            start: cell,
            end: cell,
        };
        self.frame.request();
    }

    /// Track the drag end, clamped to the map
    pub(crate) fn update_placement(&mut self, cell: (i32, i32)) {
        let width = self.level.width() as i32;
        let height = self.level.height() as i32;
        if let DragState::Placing { end, .. } = &mut self.drag {
            let clamped = (cell.0.clamp(0, width - 1), cell.1.clamp(0, height - 1));
            if *end != clamped {
                *end = clamped;
                self.frame.request();
            }
        }
    }

    /// Normalized rectangle of the current placement drag
    pub fn drag_rect(&self) -> Option<CellRange> {
        match self.drag {
            DragState::Placing { start, end } => CellRange::spanning(start, end)
                .clamp_to(self.level.width(), self.level.height()),
            _ => None,
        }
    }

    /// What releasing the current drag would write
    pub fn pending_placement(&self) -> Option<Placement> {
        let range = self.drag_rect()?;
        match &self.paint_source {
            PaintSource::Tile(tile_id) => Some(Placement::Rect {
                tile_id: tile_id.clone(),
                range,
                layer: self.selected_layer,
                passable: self
                    .library
                    .tiles
                    .get(tile_id)
                    .map_or(true, |tile| tile.passable),
            }),
            PaintSource::Pattern(pattern_id) => {
                self.library
                    .patterns
                    .get(pattern_id)
                    .map(|pattern| Placement::Pattern {
                        pattern: pattern.clone(),
                        origin: (range.min_x, range.min_y),
                    })
            }
            _ => None,
        }
    }

    pub(crate) fn finish_placement(&mut self) {
        let placement = self.pending_placement();
        self.drag = DragState::None;
        self.frame.request();
        if let Some(placement) = placement {
            self.place(placement);
        }
    }

    /// Write `placement` now if it touches no existing group, otherwise ask first.
    ///
    /// Returns true if the level was written immediately.
    pub fn place(&mut self, placement: Placement) -> bool {
        let overlapping_cells = placement.overlapping_cells(&self.level);
        if overlapping_cells.is_empty() {
            return self.apply_placement(&placement);
        }
        self.pending = Some(PendingConfirmation::PlaceOverwrite {
            placement,
            overlapping_cells,
        });
        self.frame.request();
        false
    }

    pub(crate) fn apply_placement(&mut self, placement: &Placement) -> bool {
        self.commit(placement.description(), |level| placement.apply(level))
    }
}

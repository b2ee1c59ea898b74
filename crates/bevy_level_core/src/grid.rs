//! Rectangular tile grid with a bottom-left origin
//!
//! Cells are stored row-major: row `y` (0 = bottom row) starts at `y * width`.
//! All mutators are bounds-checked and silently ignore out-of-range coordinates.
//! A position holds one cell that carries its layer, so writing a tile on a
//! different layer replaces the tile that was there.

use crate::{TileCell, TileLayer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<TileCell>,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl TileGrid {
    /// Create a grid of empty, passable cells on the primary layer
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![TileCell::default(); size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// The cell at `(x, y)`, or `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<&TileCell> {
        self.index(x, y).and_then(|idx| self.cells.get(idx))
    }

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut TileCell> {
        let idx = self.index(x, y)?;
        self.cells.get_mut(idx)
    }

    /// The cell at `(x, y)` only if it holds a tile
    pub fn occupied_cell(&self, x: i32, y: i32) -> Option<&TileCell> {
        self.get(x, y).filter(|cell| !cell.is_empty())
    }

    /// Tile id at `(x, y)`, `None` for empty or out-of-bounds cells
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&str> {
        self.get(x, y).and_then(|cell| cell.tile())
    }

    /// One row of cells, `y = 0` being the bottom row
    pub fn row(&self, y: i32) -> Option<&[TileCell]> {
        if y < 0 || y as u32 >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        self.cells.get(start..start + self.width as usize)
    }

    /// Place `tile_id` at `(x, y)`, replacing whatever was there.
    ///
    /// `layer = None` keeps the previous cell's layer. Decorations and names of
    /// the replaced cell are dropped. Returns false when out of bounds or when
    /// the cell already held exactly this tile.
    pub fn set(
        &mut self,
        tile_id: &str,
        x: i32,
        y: i32,
        passable: bool,
        layer: Option<TileLayer>,
    ) -> bool {
        let Some(cell) = self.get_mut(x, y) else {
            return false;
        };
        let layer = layer.unwrap_or(cell.layer);
        let replacement = TileCell::with_tile(tile_id, passable, layer);
        if *cell == replacement {
            return false;
        }
        *cell = replacement;
        true
    }

    /// Write a full cell value (used by paste and snapshot-style restores)
    pub fn put(&mut self, x: i32, y: i32, cell: TileCell) -> bool {
        let Some(slot) = self.get_mut(x, y) else {
            return false;
        };
        if *slot == cell {
            return false;
        }
        *slot = cell;
        true
    }

    /// Clear the tile at `(x, y)`, keeping its layer. Returns true if a tile was removed.
    pub fn remove(&mut self, x: i32, y: i32) -> bool {
        let Some(cell) = self.get_mut(x, y) else {
            return false;
        };
        if cell.is_empty() {
            return false;
        }
        *cell = TileCell::empty(cell.layer);
        true
    }

    /// Build a grid of the new size, copying the overlapping region
    pub fn resize(&self, width: u32, height: u32) -> TileGrid {
        let mut resized = TileGrid::new(width, height);
        let copy_w = self.width.min(width) as i32;
        let copy_h = self.height.min(height) as i32;
        for y in 0..copy_h {
            for x in 0..copy_w {
                if let (Some(cell), Some(idx)) = (self.get(x, y), resized.index(x, y)) {
                    resized.cells[idx] = cell.clone();
                }
            }
        }
        resized
    }

    /// Set or clear the decorative fill pattern. Only applies to occupied cells.
    pub fn set_fill_pattern(&mut self, x: i32, y: i32, fill_pattern_id: Option<&str>) -> bool {
        let Some(cell) = self.get_mut(x, y) else {
            return false;
        };
        if cell.is_empty() || cell.fill_pattern_id.as_deref() == fill_pattern_id {
            return false;
        }
        cell.fill_pattern_id = fill_pattern_id.map(str::to_string);
        true
    }

    pub fn set_layer(&mut self, x: i32, y: i32, layer: TileLayer) -> bool {
        match self.get_mut(x, y) {
            Some(cell) if cell.layer != layer => {
                cell.layer = layer;
                true
            }
            _ => false,
        }
    }

    pub fn set_display_name(&mut self, x: i32, y: i32, name: Option<&str>) -> bool {
        match self.get_mut(x, y) {
            Some(cell) if !cell.is_empty() && cell.display_name.as_deref() != name => {
                cell.display_name = name.map(str::to_string);
                true
            }
            _ => false,
        }
    }

    pub fn set_passable(&mut self, x: i32, y: i32, passable: bool) -> bool {
        match self.get_mut(x, y) {
            Some(cell) if !cell.is_empty() && cell.passable != passable => {
                cell.passable = passable;
                true
            }
            _ => false,
        }
    }

    /// Swap the tile id of an occupied cell, keeping layer, physics and decorations
    pub fn replace_tile_id(&mut self, x: i32, y: i32, tile_id: &str) -> bool {
        match self.get_mut(x, y) {
            Some(cell) if !cell.is_empty() && cell.tile() != Some(tile_id) => {
                cell.tile_id = Some(tile_id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Iterate every cell holding a tile as `(x, y, cell)`
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, &TileCell)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(move |(idx, cell)| ((idx % width) as i32, (idx / width) as i32, cell))
    }

    /// Number of occupied cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = TileGrid::new(10, 4);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.tile_count(), 0);
        assert!(grid.get(9, 3).unwrap().passable);
        assert!(grid.get(10, 0).is_none());
        assert!(grid.get(0, -1).is_none());
    }

    #[test]
    fn test_set_defaults_layer_to_previous() {
        let mut grid = TileGrid::new(4, 4);
        assert!(grid.set("bg", 1, 1, true, Some(TileLayer::Background)));
        assert!(grid.set("rock", 1, 1, false, None));
        let cell = grid.get(1, 1).unwrap();
        assert_eq!(cell.tile(), Some("rock"));
        assert_eq!(cell.layer, TileLayer::Background);
        assert!(!cell.passable);

        assert!(grid.set("rock", 2, 2, false, None));
        assert_eq!(grid.get(2, 2).unwrap().layer, TileLayer::Primary);
    }

    #[test]
    fn test_set_out_of_bounds_is_noop() {
        let mut grid = TileGrid::new(2, 2);
        let before = grid.clone();
        assert!(!grid.set("solid", 5, 0, false, None));
        assert!(!grid.set("solid", -1, 0, false, None));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_remove_keeps_layer_and_becomes_passable() {
        let mut grid = TileGrid::new(3, 3);
        grid.set("spike", 0, 2, false, Some(TileLayer::Foreground));
        grid.set_fill_pattern(0, 2, Some("moss"));
        assert!(grid.remove(0, 2));
        let cell = grid.get(0, 2).unwrap();
        assert!(cell.is_empty());
        assert!(cell.passable);
        assert_eq!(cell.layer, TileLayer::Foreground);
        assert!(cell.fill_pattern_id.is_none());
        assert!(!grid.remove(0, 2));
    }

    #[test]
    fn test_resize_preserves_overlap() {
        let mut grid = TileGrid::new(4, 4);
        grid.set("a", 0, 0, false, None);
        grid.set("b", 3, 3, false, None);
        grid.set("c", 1, 2, false, Some(TileLayer::Background));

        let smaller = grid.resize(2, 3);
        assert_eq!(smaller.width(), 2);
        assert_eq!(smaller.height(), 3);
        assert_eq!(smaller.tile_at(0, 0), Some("a"));
        assert_eq!(smaller.get(1, 2).unwrap().layer, TileLayer::Background);
        assert_eq!(smaller.tile_count(), 2);

        let larger = grid.resize(6, 5);
        assert_eq!(larger.tile_at(3, 3), Some("b"));
        let fresh = larger.get(5, 4).unwrap();
        assert!(fresh.is_empty() && fresh.passable);
        assert_eq!(fresh.layer, TileLayer::Primary);
    }

    #[test]
    fn test_fill_pattern_requires_tile() {
        let mut grid = TileGrid::new(2, 1);
        assert!(!grid.set_fill_pattern(0, 0, Some("stripes")));
        grid.set("solid", 0, 0, false, None);
        assert!(grid.set_fill_pattern(0, 0, Some("stripes")));
        assert!(!grid.set_fill_pattern(0, 0, Some("stripes")));
        assert_eq!(grid.get(0, 0).unwrap().fill_pattern_id.as_deref(), Some("stripes"));
    }

    #[test]
    fn test_occupied_reports_coordinates() {
        let mut grid = TileGrid::new(5, 3);
        grid.set("x", 4, 0, false, None);
        grid.set("y", 1, 2, false, None);
        let mut cells: Vec<(i32, i32)> = grid.occupied().map(|(x, y, _)| (x, y)).collect();
        cells.sort();
        assert_eq!(cells, vec![(1, 2), (4, 0)]);
        assert_eq!(grid.row(2).unwrap()[1].tile(), Some("y"));
    }

    #[test]
    fn test_set_on_another_layer_replaces_the_cell() {
        let mut grid = TileGrid::new(3, 3);
        grid.set("ice", 1, 1, true, Some(TileLayer::Background));
        assert!(grid.set("solid", 1, 1, false, Some(TileLayer::Primary)));
        let cell = grid.get(1, 1).unwrap();
        assert_eq!(cell.tile(), Some("solid"));
        assert_eq!(cell.layer, TileLayer::Primary);
        assert_eq!(grid.tile_count(), 1);
    }
}

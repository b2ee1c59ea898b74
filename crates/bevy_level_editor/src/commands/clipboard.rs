//! Tile clipboard for copy/paste operations

use bevy_level_core::{TileCell, TileGrid, TileLayer};
use serde::{Deserialize, Serialize};

/// One copied cell, relative to the clipboard origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub rel_x: i32,
    pub rel_y: i32,
    pub tile_id: String,
    pub passable: bool,
    pub layer: TileLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_pattern_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ClipboardEntry {
    fn to_cell(&self) -> TileCell {
        let mut cell = TileCell::with_tile(self.tile_id.clone(), self.passable, self.layer);
        cell.fill_pattern_id = self.fill_pattern_id.clone();
        cell.display_name = self.display_name.clone();
        cell
    }
}

/// Copied tiles. The minimum corner of the copied cells is relative (0, 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileClipboard {
    pub entries: Vec<ClipboardEntry>,
    /// Absolute cell the entries were copied from
    pub origin: (i32, i32),
}

impl TileClipboard {
    /// Capture the occupied cells among `cells`. `None` if none hold a tile.
    pub fn capture(grid: &TileGrid, cells: impl IntoIterator<Item = (i32, i32)>) -> Option<Self> {
        let mut occupied: Vec<(i32, i32, &TileCell)> = cells
            .into_iter()
            .filter_map(|(x, y)| grid.occupied_cell(x, y).map(|cell| (x, y, cell)))
            .collect();
        occupied.sort_by_key(|&(x, y, _)| (x, y));
        occupied.dedup_by_key(|entry| (entry.0, entry.1));

        let min_x = occupied.iter().map(|c| c.0).min()?;
        let min_y = occupied.iter().map(|c| c.1).min()?;
        let entries = occupied
            .into_iter()
            .filter_map(|(x, y, cell)| {
                Some(ClipboardEntry {
                    rel_x: x - min_x,
                    rel_y: y - min_y,
                    tile_id: cell.tile()?.to_string(),
                    passable: cell.passable,
                    layer: cell.layer,
                    fill_pattern_id: cell.fill_pattern_id.clone(),
                    display_name: cell.display_name.clone(),
                })
            })
            .collect();

        Some(Self {
            entries,
            origin: (min_x, min_y),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Absolute cells the clipboard covers once anchored at `dest`
    pub fn footprint(&self, dest: (i32, i32)) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.entries
            .iter()
            .map(move |e| (dest.0 + e.rel_x, dest.1 + e.rel_y))
    }

    /// Write every entry anchored at `dest`, overwriting what is there.
    /// Entries landing out of bounds are dropped. Returns true if anything changed.
    pub fn paste_into(&self, grid: &mut TileGrid, dest: (i32, i32)) -> bool {
        let mut changed = false;
        for entry in &self.entries {
            changed |= grid.put(dest.0 + entry.rel_x, dest.1 + entry.rel_y, entry.to_cell());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_relative_to_min_corner() {
        let mut grid = TileGrid::new(8, 8);
        grid.set("stone", 3, 2, false, None);
        grid.set("stone", 4, 3, false, None);
        grid.set_fill_pattern(4, 3, Some("moss"));

        let clip = TileClipboard::capture(&grid, [(4, 3), (3, 2), (5, 5), (3, 2)]).unwrap();
        assert_eq!(clip.origin, (3, 2));
        assert_eq!(clip.len(), 2);
        assert_eq!((clip.entries[0].rel_x, clip.entries[0].rel_y), (0, 0));
        assert_eq!((clip.entries[1].rel_x, clip.entries[1].rel_y), (1, 1));
        assert_eq!(clip.entries[1].fill_pattern_id.as_deref(), Some("moss"));
    }

    #[test]
    fn test_capture_of_empty_cells_is_none() {
        let grid = TileGrid::new(4, 4);
        assert!(TileClipboard::capture(&grid, [(0, 0), (1, 1)]).is_none());
    }

    #[test]
    fn test_paste_overwrites_and_clips_to_bounds() {
        let mut grid = TileGrid::new(4, 4);
        grid.set("stone", 0, 0, false, None);
        grid.set("stone", 1, 0, false, None);
        let clip = TileClipboard::capture(&grid, [(0, 0), (1, 0)]).unwrap();

        grid.set("ice", 3, 3, true, None);
        assert!(clip.paste_into(&mut grid, (3, 3)));
        assert_eq!(grid.tile_at(3, 3), Some("stone"));
        assert!(!grid.get(3, 3).unwrap().passable);
        assert_eq!(clip.footprint((3, 3)).collect::<Vec<_>>(), vec![(3, 3), (4, 3)]);
    }
}

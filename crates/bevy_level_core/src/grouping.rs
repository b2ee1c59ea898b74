//! Connected tile groups
//!
//! A group is a maximal 4-connected set of cells holding the same tile id on
//! the same layer. Searches only touch the group itself, never the whole grid.

use crate::{TileGrid, TileLayer};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

const NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A member of a tile group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupCell {
    pub x: i32,
    pub y: i32,
    pub tile_id: String,
}

/// Stable identity of a tile group.
///
/// Derived from the member with the smallest `(x, y)` and the tile id, so it
/// does not depend on which member a search started from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId {
    tile_id: String,
    x: i32,
    y: i32,
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{},{}", self.tile_id, self.x, self.y)
    }
}

/// Identity of the group formed by `cells`, `None` for an empty list
pub fn group_id(cells: &[GroupCell]) -> Option<GroupId> {
    cells
        .iter()
        .min_by_key(|cell| (cell.x, cell.y))
        .map(|anchor| GroupId {
            tile_id: anchor.tile_id.clone(),
            x: anchor.x,
            y: anchor.y,
        })
}

/// Breadth-first search from `(start_x, start_y)` over same-id, same-layer neighbors.
///
/// Returns the members sorted by `(x, y)`, including the start cell. Returns an
/// empty list when the start cell does not hold `tile_id`.
pub fn find_connected_tiles(
    grid: &TileGrid,
    start_x: i32,
    start_y: i32,
    tile_id: &str,
) -> Vec<GroupCell> {
    let Some(start) = grid.get(start_x, start_y) else {
        return Vec::new();
    };
    if start.tile() != Some(tile_id) {
        return Vec::new();
    }
    let layer = start.layer;

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert((start_x, start_y));
    queue.push_back((start_x, start_y));

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in NEIGHBORS {
            let next = (x + dx, y + dy);
            if visited.contains(&next) {
                continue;
            }
            let matches = grid
                .get(next.0, next.1)
                .is_some_and(|cell| cell.holds(tile_id, layer));
            if matches {
                visited.insert(next);
                queue.push_back(next);
            }
        }
    }

    let mut cells: Vec<GroupCell> = visited
        .into_iter()
        .map(|(x, y)| GroupCell {
            x,
            y,
            tile_id: tile_id.to_string(),
        })
        .collect();
    cells.sort_by_key(|cell| (cell.x, cell.y));
    cells
}

/// A connected group together with the layer it lives on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGroup {
    pub tile_id: String,
    pub layer: TileLayer,
    pub cells: Vec<GroupCell>,
}

impl TileGroup {
    pub fn id(&self) -> Option<GroupId> {
        group_id(&self.cells)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.cells.iter().any(|cell| cell.x == x && cell.y == y)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().map(|cell| (cell.x, cell.y))
    }
}

/// The group containing `(x, y)`, if that cell holds a tile
pub fn find_group(grid: &TileGrid, x: i32, y: i32) -> Option<TileGroup> {
    let cell = grid.occupied_cell(x, y)?;
    let tile_id = cell.tile()?.to_string();
    let layer = cell.layer;
    let cells = find_connected_tiles(grid, x, y, &tile_id);
    Some(TileGroup {
        tile_id,
        layer,
        cells,
    })
}

/// Every group on `layer` that has at least one member inside `footprint`.
///
/// Each group is reported once, in the order its first footprint cell appears.
pub fn groups_intersecting<I>(grid: &TileGrid, footprint: I, layer: TileLayer) -> Vec<TileGroup>
where
    I: IntoIterator<Item = (i32, i32)>,
{
    let mut claimed: HashSet<(i32, i32)> = HashSet::new();
    let mut groups = Vec::new();

    for (x, y) in footprint {
        if claimed.contains(&(x, y)) {
            continue;
        }
        let on_layer = grid
            .occupied_cell(x, y)
            .is_some_and(|cell| cell.layer == layer);
        if !on_layer {
            continue;
        }
        if let Some(group) = find_group(grid, x, y) {
            claimed.extend(group.positions());
            groups.push(group);
        }
    }

    groups
}

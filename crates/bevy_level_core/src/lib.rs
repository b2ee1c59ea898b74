//! Core data structures for bevy_level_editor
//!
//! This crate holds the editor-independent model of a tile-grid platformer level:
//! - `TileGrid` - Fixed-size grid of `TileCell`s with Y growing upward
//! - `Viewport` - Cell <-> canvas transform under zoom and scroll
//! - `find_connected_tiles` - Same-tile, same-layer 4-connected groups
//! - `Level` - Grid plus placed `LevelObject`s
//! - `TileLibrary` - Tile, fill-pattern and pattern definitions

mod grid;
mod grouping;
mod layer;
mod level;
mod object;
mod tile;
mod value;
mod viewport;

pub use grid::TileGrid;
pub use grouping::{
    find_connected_tiles, find_group, group_id, groups_intersecting, GroupCell, GroupId, TileGroup,
};
pub use layer::{TileCell, TileLayer};
pub use level::Level;
pub use object::{LevelObject, Movement};
pub use tile::{FillPattern, Pattern, PatternCell, TileDefinition, TileLibrary, TileRegistry};
pub use value::Value;
pub use viewport::{CanvasRect, CellRange, Viewport};

//! Tile, fill-pattern and pattern definitions

use crate::TileLayer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A paintable tile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileDefinition {
    pub id: String,
    pub name: String,
    /// Texture path or storage key
    pub texture: String,
    /// Default passability for newly placed cells
    #[serde(default = "default_passable")]
    pub passable: bool,
}

fn default_passable() -> bool {
    true
}

impl TileDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, texture: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            texture: texture.into(),
            passable: true,
        }
    }

    pub fn solid(mut self) -> Self {
        self.passable = false;
        self
    }
}

/// A texture laid over a tile group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FillPattern {
    pub id: String,
    pub name: String,
    pub texture: String,
}

impl FillPattern {
    pub fn new(id: impl Into<String>, name: impl Into<String>, texture: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            texture: texture.into(),
        }
    }
}

/// One cell of a pattern, relative to the pattern's min corner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternCell {
    pub rel_x: i32,
    pub rel_y: i32,
    pub tile_id: String,
    #[serde(default = "default_passable")]
    pub passable: bool,
    #[serde(default)]
    pub layer: TileLayer,
}

/// A reusable multi-cell stamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub cells: Vec<PatternCell>,
}

impl Pattern {
    /// Build a pattern from absolute cells, shifting them so the min corner is (0, 0)
    pub fn from_cells(
        id: impl Into<String>,
        name: impl Into<String>,
        cells: impl IntoIterator<Item = (i32, i32, String, bool, TileLayer)>,
    ) -> Self {
        let cells: Vec<_> = cells.into_iter().collect();
        let min_x = cells.iter().map(|c| c.0).min().unwrap_or(0);
        let min_y = cells.iter().map(|c| c.1).min().unwrap_or(0);
        Self {
            id: id.into(),
            name: name.into(),
            cells: cells
                .into_iter()
                .map(|(x, y, tile_id, passable, layer)| PatternCell {
                    rel_x: x - min_x,
                    rel_y: y - min_y,
                    tile_id,
                    passable,
                    layer,
                })
                .collect(),
        }
    }

    /// Bounding box size in cells
    pub fn size(&self) -> (i32, i32) {
        let width = self.cells.iter().map(|c| c.rel_x + 1).max().unwrap_or(0);
        let height = self.cells.iter().map(|c| c.rel_y + 1).max().unwrap_or(0);
        (width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Lookup of paintable definitions by id
pub trait TileRegistry {
    fn tile_definition(&self, id: &str) -> Option<&TileDefinition>;
    fn fill_pattern(&self, id: &str) -> Option<&FillPattern>;
    fn pattern(&self, id: &str) -> Option<&Pattern>;
}

/// In-memory registry of everything the editor can paint with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileLibrary {
    #[serde(default)]
    pub tiles: HashMap<String, TileDefinition>,
    #[serde(default)]
    pub fill_patterns: HashMap<String, FillPattern>,
    #[serde(default)]
    pub patterns: HashMap<String, Pattern>,
}

impl TileLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tile(&mut self, tile: TileDefinition) {
        self.tiles.insert(tile.id.clone(), tile);
    }

    pub fn add_fill_pattern(&mut self, fill: FillPattern) {
        self.fill_patterns.insert(fill.id.clone(), fill);
    }

    pub fn add_pattern(&mut self, pattern: Pattern) {
        self.patterns.insert(pattern.id.clone(), pattern);
    }

    pub fn remove_pattern(&mut self, id: &str) -> Option<Pattern> {
        self.patterns.remove(id)
    }

    /// Tile definitions sorted by name, for palettes
    pub fn sorted_tiles(&self) -> Vec<&TileDefinition> {
        let mut tiles: Vec<_> = self.tiles.values().collect();
        tiles.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        tiles
    }
}

impl TileRegistry for TileLibrary {
    fn tile_definition(&self, id: &str) -> Option<&TileDefinition> {
        self.tiles.get(id)
    }

    fn fill_pattern(&self, id: &str) -> Option<&FillPattern> {
        self.fill_patterns.get(id)
    }

    fn pattern(&self, id: &str) -> Option<&Pattern> {
        self.patterns.get(id)
    }
}

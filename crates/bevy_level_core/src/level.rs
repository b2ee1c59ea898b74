//! A complete level: tile grid plus placed objects

use crate::{LevelObject, TileGrid};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: Uuid,
    pub name: String,
    pub grid: TileGrid,
    #[serde(default)]
    pub objects: Vec<LevelObject>,
    /// Storage key of the background image, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_id: Option<String>,
}

impl Level {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            grid: TileGrid::new(width, height),
            objects: Vec::new(),
            background_image_id: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Resize the grid, preserving the overlapping region
    pub fn resize(&mut self, width: u32, height: u32) {
        self.grid = self.grid.resize(width, height);
    }

    pub fn object(&self, id: Uuid) -> Option<&LevelObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: Uuid) -> Option<&mut LevelObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Topmost object under a world-space point
    pub fn object_at(&self, x: f32, y: f32) -> Option<&LevelObject> {
        self.objects.iter().rev().find(|o| o.contains_point(x, y))
    }

    pub fn add_object(&mut self, object: LevelObject) -> Uuid {
        let id = object.id;
        self.objects.push(object);
        id
    }

    pub fn remove_object(&mut self, id: Uuid) -> Option<LevelObject> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(idx))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

//! Placed objects and their movement paths

use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Back-and-forth movement along a polyline of world-space waypoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    /// Waypoints the object's center travels through
    pub path: Vec<[f32; 2]>,
    /// World units per second
    pub speed: f32,
}

impl Movement {
    pub fn new(path: Vec<[f32; 2]>, speed: f32) -> Self {
        Self { path, speed }
    }

    /// Total polyline length
    pub fn path_length(&self) -> f32 {
        self.path
            .windows(2)
            .map(|pair| {
                let dx = pair[1][0] - pair[0][0];
                let dy = pair[1][1] - pair[0][1];
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }

    /// Whether the object would actually move
    pub fn is_animated(&self) -> bool {
        self.path.len() >= 2 && self.speed > 0.0 && self.path_length() > 0.0
    }
}

/// An object placed in a level, e.g. a moving platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelObject {
    pub id: Uuid,
    pub name: String,
    /// Bottom-left corner in world units
    pub position: [f32; 2],
    pub size: [f32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<Movement>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, Value>,
}

impl LevelObject {
    pub fn new(name: impl Into<String>, position: [f32; 2], size: [f32; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position,
            size,
            movement: None,
            properties: HashMap::new(),
        }
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn center(&self) -> [f32; 2] {
        [
            self.position[0] + self.size[0] / 2.0,
            self.position[1] + self.size[1] / 2.0,
        ]
    }

    /// Whether a world-space point falls inside the object's box
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.position[0]
            && x < self.position[0] + self.size[0]
            && y >= self.position[1]
            && y < self.position[1] + self.size[1]
    }

    /// Display name, falling back to a short id
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("object ({})", &self.id.to_string()[..8])
        } else {
            self.name.clone()
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_string())
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_length() {
        let movement = Movement::new(vec![[0.0, 0.0], [30.0, 40.0], [30.0, 0.0]], 10.0);
        assert!((movement.path_length() - 90.0).abs() < 1e-4);
        assert!(movement.is_animated());
    }

    #[test]
    fn test_degenerate_movement_is_not_animated() {
        assert!(!Movement::new(vec![[5.0, 5.0]], 10.0).is_animated());
        assert!(!Movement::new(vec![[5.0, 5.0], [5.0, 5.0]], 10.0).is_animated());
        assert!(!Movement::new(vec![[0.0, 0.0], [5.0, 0.0]], 0.0).is_animated());
    }

    #[test]
    fn test_contains_point_and_center() {
        let object = LevelObject::new("lift", [32.0, 64.0], [64.0, 16.0]);
        assert_eq!(object.center(), [64.0, 72.0]);
        assert!(object.contains_point(32.0, 64.0));
        assert!(!object.contains_point(96.0, 70.0));
    }

    #[test]
    fn test_display_name_fallback() {
        let object = LevelObject::new("", [0.0, 0.0], [1.0, 1.0]);
        assert!(object.display_name().starts_with("object ("));
    }

    #[test]
    fn test_string_properties() {
        let mut object = LevelObject::new("door", [0.0, 0.0], [32.0, 64.0]);
        object.set_property("target", "level-2");
        object.set_property("locked", true);
        assert_eq!(object.get_string("target"), Some("level-2"));
        assert_eq!(object.get_string("locked"), None);
    }
}

//! What one canvas frame contains
//!
//! Everything here is in canvas pixels (origin top-left, Y down). Building the
//! list is pure so it can be checked without a renderer.

use bevy_level_animation::PlatformAnimator;
use bevy_level_core::{CanvasRect, TileLayer, TileRegistry};
use uuid::Uuid;

use crate::EditorState;

/// A straight grid line between two canvas points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: (f32, f32),
    pub to: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileSprite {
    pub cell: (i32, i32),
    pub rect: CanvasRect,
    pub layer: TileLayer,
    pub tile_id: String,
    /// `None` when the tile id is not in the registry
    pub texture: Option<String>,
    pub passable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillOverlay {
    pub rect: CanvasRect,
    pub layer: TileLayer,
    pub fill_pattern_id: String,
    pub texture: Option<String>,
}

/// Highlight styles, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HighlightKind {
    Selection,
    Primary,
    /// Cells a pending confirmation would destroy
    Affected,
    /// Where the current placement drag would write
    Preview,
    Hover,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub rect: CanvasRect,
    pub kind: HighlightKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSprite {
    pub id: Uuid,
    pub rect: CanvasRect,
    pub name: String,
    pub selected: bool,
    /// Movement path as canvas points, empty for static objects
    pub path: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Area covered by the map
    pub map_rect: Option<CanvasRect>,
    pub grid_lines: Vec<GridLine>,
    /// Tiles in layer order, background first
    pub tiles: Vec<TileSprite>,
    pub fill_overlays: Vec<FillOverlay>,
    pub objects: Vec<ObjectSprite>,
    pub highlights: Vec<Highlight>,
}

impl DrawList {
    /// Texture paths this frame needs
    pub fn textures(&self) -> impl Iterator<Item = &str> {
        self.tiles
            .iter()
            .filter_map(|tile| tile.texture.as_deref())
            .chain(
                self.fill_overlays
                    .iter()
                    .filter_map(|fill| fill.texture.as_deref()),
            )
    }
}

/// Build the frame for the current editor state.
///
/// Grid lines cover the whole visible range, even past the map edges; tiles
/// only the part of it inside the map.
pub fn build_draw_list(
    state: &EditorState,
    animator: &PlatformAnimator,
    registry: &impl TileRegistry,
) -> DrawList {
    let viewport = state.viewport();
    let level = state.level();
    let visible = viewport.visible_cells();
    let mut list = DrawList::default();

    if level.width() > 0 && level.height() > 0 {
        let (left, top) = viewport.cell_to_canvas(0, level.height() as i32);
        let (right, bottom) = viewport.cell_to_canvas(level.width() as i32, 0);
        list.map_rect = Some(CanvasRect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        });
    }

    if state.view.show_grid {
        for x in visible.min_x..=visible.max_x + 1 {
            let (px, _) = viewport.cell_to_canvas(x, 0);
            list.grid_lines.push(GridLine {
                from: (px, 0.0),
                to: (px, viewport.canvas_height),
            });
        }
        for y in visible.min_y..=visible.max_y + 1 {
            let (_, py) = viewport.cell_to_canvas(0, y);
            list.grid_lines.push(GridLine {
                from: (0.0, py),
                to: (viewport.canvas_width, py),
            });
        }
    }

    if let Some(range) = visible.clamp_to(level.width(), level.height()) {
        for (x, y) in range.iter() {
            let Some(cell) = level.grid.occupied_cell(x, y) else {
                continue;
            };
            let Some(tile_id) = cell.tile() else {
                continue;
            };
            let rect = viewport.cell_rect(x, y);
            list.tiles.push(TileSprite {
                cell: (x, y),
                rect,
                layer: cell.layer,
                tile_id: tile_id.to_string(),
                texture: registry.tile_definition(tile_id).map(|t| t.texture.clone()),
                passable: cell.passable,
            });
            if let Some(fill_id) = &cell.fill_pattern_id {
                list.fill_overlays.push(FillOverlay {
                    rect,
                    layer: cell.layer,
                    fill_pattern_id: fill_id.clone(),
                    texture: registry.fill_pattern(fill_id).map(|f| f.texture.clone()),
                });
            }
        }
        // stable: keeps row order within a layer
        list.tiles.sort_by_key(|tile| tile.layer);
        list.fill_overlays.sort_by_key(|fill| fill.layer);
    }

    for object in &level.objects {
        let origin = animator.position_of(object);
        let path = object
            .movement
            .as_ref()
            .filter(|movement| movement.is_animated())
            .map(|movement| {
                movement
                    .path
                    .iter()
                    .map(|p| viewport.world_to_canvas(p[0], p[1]))
                    .collect()
            })
            .unwrap_or_default();
        list.objects.push(ObjectSprite {
            id: object.id,
            rect: viewport.world_rect_to_canvas(origin, object.size),
            name: object.display_name(),
            selected: state.selection().object == Some(object.id),
            path,
        });
    }

    let mut highlight = |cells: &mut dyn Iterator<Item = (i32, i32)>, kind: HighlightKind| {
        for (x, y) in cells {
            if visible.contains(x, y) {
                list.highlights.push(Highlight {
                    rect: viewport.cell_rect(x, y),
                    kind,
                });
            }
        }
    };

    highlight(&mut state.selection().cells().into_iter(), HighlightKind::Selection);
    if let Some(primary) = state.selection().primary {
        highlight(&mut std::iter::once((primary.x, primary.y)), HighlightKind::Primary);
    }
    if let Some(pending) = state.pending() {
        highlight(&mut pending.affected_cells().into_iter(), HighlightKind::Affected);
    }
    if let Some(placement) = state.pending_placement() {
        let cells = placement.footprint().into_values().flatten();
        highlight(&mut cells.into_iter(), HighlightKind::Preview);
    }
    if let Some(hover) = state.hover() {
        highlight(&mut std::iter::once(hover), HighlightKind::Hover);
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use bevy_level_core::{LevelObject, Movement};

    fn build(state: &EditorState) -> DrawList {
        build_draw_list(state, &PlatformAnimator::new(), state.library())
    }

    #[test]
    fn test_grid_lines_extend_past_map() {
        let state = editor_with_grid(4, 4);
        let list = build(&state);
        // visible range is padded to -1..=26 x -1..=19 on an 800x600 canvas
        let vertical = list.grid_lines.iter().filter(|l| l.from.0 == l.to.0).count();
        assert!(vertical > 5);
        assert!(list.grid_lines.iter().any(|l| l.from.0 < 0.0));

        let mut hidden = editor_with_grid(4, 4);
        hidden.set_show_grid(false);
        assert!(build(&hidden).grid_lines.is_empty());
    }

    #[test]
    fn test_tiles_sorted_by_layer_with_textures() {
        let mut state = editor_with_grid(6, 6);
        place_block(&mut state, "solid", (0, 0), (1, 0));
        place_block(&mut state, "ice", (3, 3), (3, 3));
        state.select_cell(0, 0, false);
        state.select_tile("ice");
        state.selected_layer = TileLayer::Background;
        drag(&mut state, (5, 5), (5, 5));

        let list = build(&state);
        assert_eq!(list.tiles.len(), 4);
        assert_eq!(list.tiles[0].layer, TileLayer::Background);
        assert_eq!(list.tiles[0].cell, (5, 5));
        assert_eq!(list.tiles[1].texture.as_deref(), Some("tiles/solid.png"));
        let textures: Vec<_> = list.textures().collect();
        assert!(textures.contains(&"tiles/ice.png"));
    }

    #[test]
    fn test_only_visible_tiles_are_listed() {
        let mut state = editor_with_grid(100, 100);
        place_block(&mut state, "solid", (0, 0), (0, 0));
        place_block(&mut state, "solid", (90, 90), (90, 90));
        // bottom-left corner of the map in view
        let (_, max_top) = state.viewport().max_scroll(100);
        state.view.scroll_top = max_top;
        let list = build(&state);
        assert_eq!(list.tiles.len(), 1);
        assert_eq!(list.tiles[0].cell, (0, 0));
    }

    #[test]
    fn test_highlights_follow_state() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (2, 0));
        state.select_cell(1, 0, false);
        let (x, y) = cell_center(&state, 6, 6);
        state.pointer_move(x, y);

        let list = build(&state);
        let count = |kind| list.highlights.iter().filter(|h| h.kind == kind).count();
        assert_eq!(count(HighlightKind::Selection), 3);
        assert_eq!(count(HighlightKind::Primary), 1);
        assert_eq!(count(HighlightKind::Hover), 1);
        assert_eq!(count(HighlightKind::Preview), 0);
    }

    #[test]
    fn test_drag_preview_and_fill_overlay() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (0, 0));
        state.select_fill_pattern("moss");
        click(&mut state, 0, 0);
        state.select_tile("ice");
        let (x0, y0) = cell_center(&state, 4, 4);
        let (x1, y1) = cell_center(&state, 5, 6);
        state.pointer_down(PointerButton::Left, x0, y0, Modifiers::NONE);
        state.pointer_move(x1, y1);

        let list = build(&state);
        assert_eq!(list.fill_overlays.len(), 1);
        assert_eq!(list.fill_overlays[0].texture.as_deref(), Some("fills/moss.png"));
        let preview = list
            .highlights
            .iter()
            .filter(|h| h.kind == HighlightKind::Preview)
            .count();
        assert_eq!(preview, 6);
    }

    #[test]
    fn test_objects_use_animated_position() {
        let mut state = editor_with_grid(10, 10);
        let lift = LevelObject::new("lift", [0.0, 0.0], [32.0, 16.0])
            .with_movement(Movement::new(vec![[16.0, 8.0], [116.0, 8.0]], 100.0));
        let id = state.add_object(lift);
        let mut animator = PlatformAnimator::new();
        animator.tick(state.level().objects.iter(), 0.5);

        let list = build_draw_list(&state, &animator, state.library());
        let object = list.objects.iter().find(|o| o.id == id).unwrap();
        let expected = state.viewport().world_rect_to_canvas([50.0, 0.0], [32.0, 16.0]);
        assert!((object.rect.x - expected.x).abs() < 1e-3);
        assert!((object.rect.y - expected.y).abs() < 1e-3);
        assert_eq!(object.path.len(), 2);
    }
}

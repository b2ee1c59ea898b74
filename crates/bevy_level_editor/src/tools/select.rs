//! Select tool

use bevy_level_core::find_group;

use super::SelectedCell;
use crate::EditorState;

impl EditorState {
    /// Left click with the select tool.
    ///
    /// A populated cell selects its group (or toggles it with `multi`). An empty
    /// cell without `multi` clears the tile selection and picks the topmost
    /// level object under `world` instead.
    pub(crate) fn select_at(&mut self, cell: (i32, i32), world: (f32, f32), multi: bool) {
        match find_group(&self.level.grid, cell.0, cell.1) {
            Some(group) => {
                self.selection.primary = Some(SelectedCell {
                    x: cell.0,
                    y: cell.1,
                    layer: group.layer,
                });
                self.selected_layer = group.layer;
                if multi {
                    self.selection.toggle_group(group);
                } else {
                    self.selection.select_group(group);
                }
            }
            None if !multi => {
                self.selection.clear();
                self.selection.object = self.level.object_at(world.0, world.1).map(|o| o.id);
            }
            None => {}
        }
        self.frame.request();
    }

    /// Select the connected group at `(x, y)` as if it had been clicked
    pub fn select_cell(&mut self, x: i32, y: i32, multi: bool) {
        let world = (
            (x as f32 + 0.5) * self.view.grid_size,
            (y as f32 + 0.5) * self.view.grid_size,
        );
        self.select_at((x, y), world, multi);
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::*;
    use bevy_level_core::{LevelObject, TileLayer};

    #[test]
    fn test_click_selects_whole_group() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (1, 1), (3, 1));
        click(&mut state, 2, 1);
        let selection = state.selection();
        assert_eq!(selection.primary.map(|p| (p.x, p.y)), Some((2, 1)));
        assert_eq!(selection.groups.len(), 1);
        assert_eq!(selection.cells(), vec![(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_plain_click_replaces_selection() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (1, 0));
        place_block(&mut state, "ice", (5, 5), (5, 6));
        click(&mut state, 0, 0);
        click(&mut state, 5, 6);
        assert_eq!(state.selection().cells(), vec![(5, 5), (5, 6)]);
    }

    #[test]
    fn test_multi_click_toggles_groups() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (1, 0));
        place_block(&mut state, "ice", (5, 5), (5, 6));
        click(&mut state, 0, 0);
        click_with(&mut state, 5, 5, Modifiers::MULTI);
        assert_eq!(state.selection().groups.len(), 2);

        // any member of an already-selected group removes it
        click_with(&mut state, 1, 0, Modifiers::MULTI);
        assert_eq!(state.selection().groups.len(), 1);
        assert_eq!(state.selection().cells(), vec![(5, 5), (5, 6)]);
    }

    #[test]
    fn test_selection_follows_layer() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (0, 0));
        state.select_cell(0, 0, false);
        assert_eq!(state.selected_layer, TileLayer::Primary);
        let layer = state.selection().primary.map(|p| p.layer);
        assert_eq!(layer, Some(TileLayer::Primary));
    }

    #[test]
    fn test_empty_click_clears_and_hits_objects() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (0, 0));
        let id = state.add_object(LevelObject::new("lift", [128.0, 128.0], [64.0, 32.0]));
        click(&mut state, 0, 0);
        assert!(!state.selection().groups.is_empty());

        // cell (4, 4) spans world 128..160, inside the object
        click(&mut state, 4, 4);
        assert!(state.selection().groups.is_empty());
        assert_eq!(state.selection().object, Some(id));

        click(&mut state, 8, 8);
        assert!(state.selection().is_empty());
    }

    #[test]
    fn test_multi_click_on_empty_cell_keeps_selection() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (0, 0));
        click(&mut state, 0, 0);
        click_with(&mut state, 7, 7, Modifiers::MULTI);
        assert_eq!(state.selection().groups.len(), 1);
    }

    #[test]
    fn test_selection_follows_group_growth() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (2, 0), (3, 0));
        click(&mut state, 2, 0);
        assert_eq!(state.selection().groups.len(), 1);

        state.select_tile("solid");
        click(&mut state, 1, 0);
        assert_eq!(state.level().grid.tile_count(), 3);
        let groups = &state.selection().groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[0].id().unwrap().to_string(), "solid@1,0");

        // the grown group is still the selected one, so a multi click removes it
        state.set_tool(EditorTool::Select);
        click_with(&mut state, 2, 0, Modifiers::MULTI);
        assert!(state.selection().groups.is_empty());
    }

    #[test]
    fn test_merged_groups_collapse_to_one() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (0, 0));
        place_block(&mut state, "solid", (2, 0), (2, 0));
        click(&mut state, 0, 0);
        click_with(&mut state, 2, 0, Modifiers::MULTI);
        assert_eq!(state.selection().groups.len(), 2);

        state.select_tile("solid");
        click(&mut state, 1, 0);
        assert_eq!(state.selection().groups.len(), 1);
        assert_eq!(state.selection().cells(), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_split_group_keeps_surviving_part() {
        let mut state = editor_with_grid(10, 10);
        place_block(&mut state, "solid", (0, 0), (4, 0));
        click(&mut state, 3, 0);
        state.set_tool(EditorTool::Delete);
        click(&mut state, 2, 0);
        assert_eq!(state.selection().cells(), vec![(0, 0), (1, 0)]);
    }
}

//! Cell <-> canvas coordinate transform
//!
//! Grid Y grows upward from the bottom row; canvas Y grows downward from the top
//! edge of the scrolled view. This module is the only place that flips between
//! the two.

use serde::{Deserialize, Serialize};

/// Everything needed to map between cells, world units and canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Edge length of one cell in world units (pixels at zoom 1)
    pub grid_size: f32,
    pub zoom: f32,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub map_height_cells: u32,
}

/// Inclusive cell range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

/// Axis-aligned rectangle in canvas pixels, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl CellRange {
    /// Normalized range spanning two corner cells in any order
    pub fn spanning(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            max_x: a.0.max(b.0),
            min_y: a.1.min(b.1),
            max_y: a.1.max(b.1),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    /// Intersect with a `width` x `height` map. `None` if nothing overlaps.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<CellRange> {
        if width == 0 || height == 0 {
            return None;
        }
        let clamped = CellRange {
            min_x: self.min_x.max(0),
            max_x: self.max_x.min(width as i32 - 1),
            min_y: self.min_y.max(0),
            max_y: self.max_y.min(height as i32 - 1),
        };
        (clamped.min_x <= clamped.max_x && clamped.min_y <= clamped.max_y).then_some(clamped)
    }

    /// Every cell in the range, row by row from the bottom
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y).flat_map(move |y| (min_x..=max_x).map(move |x| (x, y)))
    }
}

impl Viewport {
    /// Edge length of one cell on the canvas
    pub fn cell_px(&self) -> f32 {
        self.grid_size * self.zoom
    }

    fn map_height_px(&self) -> f32 {
        self.map_height_cells as f32 * self.cell_px()
    }

    /// Canvas position of a cell's left edge and of the edge at `cell_y` on the
    /// flipped axis. Subtract one cell height from `y` for a fill rectangle.
    pub fn cell_to_canvas(&self, cell_x: i32, cell_y: i32) -> (f32, f32) {
        let cell = self.cell_px();
        let x = cell_x as f32 * cell - self.scroll_left;
        let y = (self.map_height_px() - cell_y as f32 * cell) - self.scroll_top;
        (x, y)
    }

    /// Cell under a canvas point. Always floors.
    ///
    /// The floored guess is settled against the edges `cell_to_canvas` itself
    /// produces, so a cell's own corner maps back to that cell and a point
    /// short of a boundary never spills into the next one.
    pub fn canvas_to_cell(&self, pixel_x: f32, pixel_y: f32) -> (i32, i32) {
        let cell = self.cell_px();
        let guess_x = ((pixel_x + self.scroll_left) / cell).floor() as i32;
        let guess_y = ((self.map_height_px() - (pixel_y + self.scroll_top)) / cell).floor() as i32;
        (
            settle(guess_x, |c| self.cell_to_canvas(c, 0).0 <= pixel_x),
            settle(guess_y, |c| self.cell_to_canvas(0, c).1 >= pixel_y),
        )
    }

    /// Top-left anchored rectangle covering one cell
    pub fn cell_rect(&self, cell_x: i32, cell_y: i32) -> CanvasRect {
        let cell = self.cell_px();
        let (x, y) = self.cell_to_canvas(cell_x, cell_y);
        CanvasRect {
            x,
            y: y - cell,
            width: cell,
            height: cell,
        }
    }

    /// Cells overlapping the canvas, padded by one cell on every side.
    ///
    /// Not clamped to the map so a grid overlay can extend past its edges.
    pub fn visible_cells(&self) -> CellRange {
        let cell = self.cell_px();
        let left = self.scroll_left / cell;
        let right = (self.scroll_left + self.canvas_width) / cell;
        let top = (self.map_height_px() - self.scroll_top) / cell;
        let bottom = (self.map_height_px() - self.scroll_top - self.canvas_height) / cell;
        CellRange {
            min_x: left.floor() as i32 - 1,
            max_x: right.floor() as i32 + 1,
            min_y: bottom.floor() as i32 - 1,
            max_y: top.floor() as i32 + 1,
        }
    }

    /// World units (Y up from the map's bottom edge) to canvas pixels
    pub fn world_to_canvas(&self, world_x: f32, world_y: f32) -> (f32, f32) {
        (
            world_x * self.zoom - self.scroll_left,
            self.map_height_px() - world_y * self.zoom - self.scroll_top,
        )
    }

    pub fn canvas_to_world(&self, pixel_x: f32, pixel_y: f32) -> (f32, f32) {
        (
            (pixel_x + self.scroll_left) / self.zoom,
            (self.map_height_px() - (pixel_y + self.scroll_top)) / self.zoom,
        )
    }

    /// Scroll offsets that put world point `world` under canvas point `pixel`
    pub fn scroll_anchoring(&self, world: (f32, f32), pixel: (f32, f32)) -> (f32, f32) {
        (
            world.0 * self.zoom - pixel.0,
            self.map_height_px() - world.1 * self.zoom - pixel.1,
        )
    }

    /// Largest scroll offsets for a map `width_cells` wide; zero when the map fits
    pub fn max_scroll(&self, width_cells: u32) -> (f32, f32) {
        (
            (width_cells as f32 * self.cell_px() - self.canvas_width).max(0.0),
            (self.map_height_px() - self.canvas_height).max(0.0),
        )
    }

    /// Canvas rectangle of a world-space box given by its bottom-left origin
    pub fn world_rect_to_canvas(&self, origin: [f32; 2], size: [f32; 2]) -> CanvasRect {
        let (x, bottom) = self.world_to_canvas(origin[0], origin[1]);
        let height = size[1] * self.zoom;
        CanvasRect {
            x,
            y: bottom - height,
            width: size[0] * self.zoom,
            height,
        }
    }
}

/// Largest cell next to `guess` whose starting edge is at or before the point.
/// `reached` must be true for low cells and false for high ones.
fn settle(guess: i32, reached: impl Fn(i32) -> bool) -> i32 {
    if reached(guess + 1) {
        guess + 1
    } else if reached(guess) {
        guess
    } else {
        guess - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(zoom: f32, scroll_left: f32, scroll_top: f32) -> Viewport {
        Viewport {
            grid_size: 32.0,
            zoom,
            scroll_left,
            scroll_top,
            canvas_width: 800.0,
            canvas_height: 600.0,
            map_height_cells: 20,
        }
    }

    #[test]
    fn test_bottom_row_sits_at_map_bottom() {
        let vp = viewport(1.0, 0.0, 0.0);
        assert_eq!(vp.cell_to_canvas(0, 0), (0.0, 640.0));
        assert_eq!(vp.cell_to_canvas(2, 20), (64.0, 0.0));
        let rect = vp.cell_rect(0, 0);
        assert_eq!((rect.x, rect.y, rect.width), (0.0, 608.0, 32.0));
    }

    #[test]
    fn test_canvas_to_cell_floors() {
        let vp = viewport(1.0, 0.0, 0.0);
        assert_eq!(vp.canvas_to_cell(31.9, 639.0), (0, 0));
        assert_eq!(vp.canvas_to_cell(32.0, 639.0), (1, 0));
        assert_eq!(vp.canvas_to_cell(-0.5, 10.0), (-1, 19));
    }

    #[test]
    fn test_point_just_short_of_boundary_stays_put() {
        let vp = viewport(1.0, 0.0, 0.0);
        assert_eq!(vp.canvas_to_cell(31.999, 639.0), (0, 0));
        // canvas y 608 is the edge between rows 0 and 1
        assert_eq!(vp.canvas_to_cell(1.0, 608.001), (0, 0));
        assert_eq!(vp.canvas_to_cell(1.0, 608.0), (0, 1));

        let zoomed = viewport(3.7, 13.5, 7.25);
        let (px, py) = zoomed.cell_to_canvas(5, 6);
        assert_eq!(zoomed.canvas_to_cell(px - 0.001, py + 0.001), (4, 5));
    }

    #[test]
    fn test_round_trip_across_zoom_and_scroll() {
        for &zoom in &[0.25_f32, 0.5, 1.0, 1.3, 2.0, 3.7, 4.0] {
            for &(sl, st) in &[(0.0_f32, 0.0_f32), (13.5, 7.25), (300.0, 121.0)] {
                let vp = viewport(zoom, sl, st);
                for cx in -2..25 {
                    for cy in -2..25 {
                        let (px, py) = vp.cell_to_canvas(cx, cy);
                        assert_eq!(vp.canvas_to_cell(px, py), (cx, cy), "zoom {zoom} scroll {sl},{st}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_visible_cells_has_margin_and_is_unclamped() {
        let vp = viewport(1.0, 0.0, 0.0);
        let range = vp.visible_cells();
        assert_eq!(range.min_x, -1);
        assert_eq!(range.max_x, 26);
        // canvas spans world y 40..640 -> cells 1..20
        assert_eq!(range.min_y, 0);
        assert_eq!(range.max_y, 21);

        let clamped = range.clamp_to(10, 20).unwrap();
        assert_eq!(clamped, CellRange { min_x: 0, max_x: 9, min_y: 0, max_y: 19 });
    }

    #[test]
    fn test_clamp_outside_map_is_none() {
        let range = CellRange { min_x: 12, max_x: 15, min_y: 0, max_y: 3 };
        assert!(range.clamp_to(10, 10).is_none());
        assert!(range.clamp_to(0, 10).is_none());
    }

    #[test]
    fn test_spanning_normalizes_direction() {
        let range = CellRange::spanning((5, 1), (2, 4));
        assert_eq!(range, CellRange { min_x: 2, max_x: 5, min_y: 1, max_y: 4 });
        assert_eq!(range.iter().count(), 16);
        assert_eq!((range.width(), range.height()), (4, 4));
    }

    #[test]
    fn test_world_round_trip() {
        let vp = viewport(2.0, 40.0, 12.0);
        let (px, py) = vp.world_to_canvas(100.0, 64.0);
        let (wx, wy) = vp.canvas_to_world(px, py);
        assert!((wx - 100.0).abs() < 1e-3);
        assert!((wy - 64.0).abs() < 1e-3);
    }

    #[test]
    fn test_scroll_anchoring_keeps_point_fixed() {
        let before = viewport(1.0, 30.0, 20.0);
        let world = before.canvas_to_world(200.0, 150.0);
        let mut after = before;
        after.zoom = 2.0;
        let (sl, st) = after.scroll_anchoring(world, (200.0, 150.0));
        after.scroll_left = sl;
        after.scroll_top = st;
        let (px, py) = after.world_to_canvas(world.0, world.1);
        assert!((px - 200.0).abs() < 1e-3);
        assert!((py - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_max_scroll() {
        let vp = viewport(1.0, 0.0, 0.0);
        // 40 cells wide = 1280px on an 800px canvas; 640px tall on 600px
        assert_eq!(vp.max_scroll(40), (480.0, 40.0));
        assert_eq!(vp.max_scroll(10), (0.0, 40.0));
    }

    #[test]
    fn test_world_rect_matches_cell_rect() {
        let vp = viewport(1.5, 10.0, 5.0);
        let from_world = vp.world_rect_to_canvas([64.0, 32.0], [32.0, 32.0]);
        let from_cell = vp.cell_rect(2, 1);
        assert!((from_world.x - from_cell.x).abs() < 1e-3);
        assert!((from_world.y - from_cell.y).abs() < 1e-3);
        assert!((from_world.width - from_cell.width).abs() < 1e-3);
    }
}

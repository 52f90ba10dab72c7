use macroquad::prelude::*;

use super::Camera;

/// Inclusive block of grid cells, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// First visible row
    pub start_row: u32,
    /// Last visible row (inclusive)
    pub end_row: u32,
    /// First visible column
    pub start_col: u32,
    /// Last visible column (inclusive)
    pub end_col: u32,
}

impl CellRange {
    /// `(row, col)` pairs top-to-bottom, left-to-right.
    pub fn cells(self) -> impl Iterator<Item = (u32, u32)> {
        (self.start_row..=self.end_row)
            .flat_map(move |row| (self.start_col..=self.end_col).map(move |col| (row, col)))
    }

    /// Number of cells in the range.
    pub fn count(&self) -> usize {
        ((self.end_row - self.start_row + 1) * (self.end_col - self.start_col + 1)) as usize
    }
}

/// Cells of a `width`x`height` grid that a `viewport`-sized camera view can touch.
///
/// The end bounds are pushed out by one cell so tiles sliding in at the
/// right/bottom edges are drawn before they become visible, then every bound
/// is clamped into the grid. Returns `None` for an empty grid.
pub fn visible_cells(
    camera: &Camera,
    viewport: Vec2,
    cell_size: u32,
    width: u32,
    height: u32,
) -> Option<CellRange> {
    if width == 0 || height == 0 || cell_size == 0 {
        return None;
    }

    let cs = cell_size as f32;
    let min = camera.top_left();
    let max = min + viewport + vec2(cs, cs);

    let clamp_to = |v: f32, cells: u32| ((v / cs).floor() as i64).clamp(0, cells as i64 - 1) as u32;

    Some(CellRange {
        start_col: clamp_to(min.x, width),
        end_col: clamp_to(max.x, width),
        start_row: clamp_to(min.y, height),
        end_row: clamp_to(max.y, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_view_pads_one_cell() {
        let cam = Camera::new(Vec2::ZERO);
        let r = visible_cells(&cam, vec2(64.0, 48.0), 16, 10, 10).unwrap();
        assert_eq!(
            r,
            CellRange {
                start_row: 0,
                end_row: 4,
                start_col: 0,
                end_col: 5
            }
        );
        assert_eq!(r.count(), 30);
    }

    #[test]
    fn bounds_are_clamped_into_grid() {
        let cam = Camera::new(vec2(100.0, -40.0));
        let r = visible_cells(&cam, vec2(64.0, 64.0), 16, 10, 3).unwrap();
        assert_eq!(r.start_col, 6);
        assert_eq!(r.end_col, 9);
        assert_eq!(r.start_row, 0);
        assert_eq!(r.end_row, 2);
    }

    #[test]
    fn offset_shifts_the_view() {
        let cam = Camera {
            target: vec2(64.0, 64.0),
            offset: vec2(32.0, 32.0),
        };
        let r = visible_cells(&cam, vec2(16.0, 16.0), 16, 20, 20).unwrap();
        assert_eq!((r.start_row, r.start_col), (2, 2));
        assert_eq!((r.end_row, r.end_col), (4, 4));
    }

    #[test]
    fn cells_are_row_major() {
        let r = CellRange {
            start_row: 1,
            end_row: 2,
            start_col: 3,
            end_col: 4,
        };
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(1, 3), (1, 4), (2, 3), (2, 4)]);
    }

    #[test]
    fn empty_grid_has_no_range() {
        let cam = Camera::default();
        assert!(visible_cells(&cam, vec2(64.0, 64.0), 16, 0, 4).is_none());
    }
}

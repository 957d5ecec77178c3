/// Affine mapping from logical grid cells to screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub origin_x: i32,
    pub origin_y: i32,
    pub border_width: i32,
    pub cell_width: i32,
    pub cell_height: i32,
}

impl CellGeometry {
    pub fn new(
        origin_x: i32,
        origin_y: i32,
        border_width: i32,
        cell_width: i32,
        cell_height: i32,
    ) -> Self {
        Self {
            origin_x,
            origin_y,
            border_width,
            cell_width,
            cell_height,
        }
    }

    /// Top-left screen coordinate (x, y) of the cell at (row, col)
    pub fn cell_to_pixel(&self, row: i32, col: i32) -> (i32, i32) {
        (
            self.origin_x + self.border_width + col * self.cell_width,
            self.origin_y + self.border_width + row * self.cell_height,
        )
    }

    /// Screen size (width, height) of a grid including its border on both sides
    pub fn grid_extent(&self, rows: usize, cols: usize) -> (i32, i32) {
        (
            2 * self.border_width + cols as i32 * self.cell_width,
            2 * self.border_width + rows as i32 * self.cell_height,
        )
    }
}

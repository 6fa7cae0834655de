/*
 * Spatial Grid Module
 *
 * Uniform grid over a fixed region starting at the origin. Positions map to
 * a cell by dividing by the cell size and clamping into the grid, so agents
 * outside the region land in the nearest border cell.
 *
 * The grid is insert-only: callers clear it and reinsert every agent before
 * querying. There is no incremental update.
 */

use nannou::prelude::*;

pub const DEFAULT_CELL_SIZE: f32 = 100.0;
pub const DEFAULT_GRID_CELLS: usize = 20;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    grid_width: usize,
    grid_height: usize,
    cells: Vec<Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE, DEFAULT_GRID_CELLS, DEFAULT_GRID_CELLS)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32, grid_width: usize, grid_height: usize) -> Self {
        let grid_width = grid_width.max(1);
        let grid_height = grid_height.max(1);
        Self {
            cell_size,
            grid_width,
            grid_height,
            cells: vec![Vec::new(); grid_width * grid_height],
        }
    }

    // Convert a position to clamped cell coordinates
    #[inline]
    pub fn cell_coords(&self, position: Point2) -> (usize, usize) {
        let max_x = (self.grid_width - 1) as f32;
        let max_y = (self.grid_height - 1) as f32;
        let cx = (position.x / self.cell_size).floor().clamp(0.0, max_x) as usize;
        let cy = (position.y / self.cell_size).floor().clamp(0.0, max_y) as usize;
        (cx, cy)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    #[inline]
    pub fn insert(&mut self, index: usize, position: Point2) {
        let (cx, cy) = self.cell_coords(position);
        self.cells[cy * self.grid_width + cx].push(index);
    }

    /// Clear and insert every position, using its slice index as the id.
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Point2>,
    {
        self.clear();
        for (index, position) in positions.into_iter().enumerate() {
            self.insert(index, position);
        }
    }

    /// Indices registered in the 3x3 block of cells around `position`.
    pub fn neighbors_of(&self, position: Point2) -> Vec<usize> {
        let (cx, cy) = self.cell_coords(position);
        let mut result = Vec::new();

        let y_start = cy.saturating_sub(1);
        let y_end = (cy + 1).min(self.grid_height - 1);
        let x_start = cx.saturating_sub(1);
        let x_end = (cx + 1).min(self.grid_width - 1);

        for y in y_start..=y_end {
            let row = y * self.grid_width;
            for x in x_start..=x_end {
                result.extend_from_slice(&self.cells[row + x]);
            }
        }

        result
    }

    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }
}

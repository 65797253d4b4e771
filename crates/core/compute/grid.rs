//! Regular grid partitioning of a bounding rectangle.
//!
//! Cells are produced lazily, column by column, and within a column from the
//! first corner's latitude towards the second's:
//!
//! ```rust
//! use geosample::compute::grid::partition;
//! use geosample_types::bbox::BoundingRectangle;
//! use geosample_types::grid::GridResolution;
//!
//! let rect = BoundingRectangle::new(8.0, 45.0, 10.0, 55.0);
//! let cells = partition(&rect, GridResolution::new(2, 2).unwrap());
//! assert_eq!(cells.len(), 4);
//!
//! let order: Vec<(u32, u32)> = cells.map(|c| (c.col, c.row)).collect();
//! assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
//! ```

use geosample_types::bbox::BoundingRectangle;
use geosample_types::geo::Point;
use geosample_types::grid::{CellPolygon, GridResolution};
use std::iter::FusedIterator;

/// Partition `rect` into `horizontal × vertical` cells.
pub fn partition(rect: &BoundingRectangle, resolution: GridResolution) -> GridCells {
    GridCells {
        rect: *rect,
        resolution,
        next: 0,
    }
}

/// Iterator over the cells of a partitioned rectangle.
///
/// A clone carries its own position; clone before consuming to iterate again.
#[derive(Debug, Clone)]
pub struct GridCells {
    rect: BoundingRectangle,
    resolution: GridResolution,
    next: usize,
}

impl GridCells {
    pub fn resolution(&self) -> GridResolution {
        self.resolution
    }

    fn cell(&self, index: usize) -> CellPolygon {
        let v = self.resolution.vertical();
        let h = self.resolution.horizontal();
        let col = (index / v as usize) as u32;
        let row = (index % v as usize) as u32;

        let x0 = axis_at(&self.rect, col, h, BoundingRectangle::lerp_x, self.rect.second.x());
        let x1 = axis_at(&self.rect, col + 1, h, BoundingRectangle::lerp_x, self.rect.second.x());
        let y0 = axis_at(&self.rect, row, v, BoundingRectangle::lerp_y, self.rect.second.y());
        let y1 = axis_at(&self.rect, row + 1, v, BoundingRectangle::lerp_y, self.rect.second.y());

        let rect = BoundingRectangle::from_corners(Point::new(x0, y0), Point::new(x1, y1));
        CellPolygon {
            index,
            col,
            row,
            owns_max_x: rect.max_x() == self.rect.max_x(),
            owns_max_y: rect.max_y() == self.rect.max_y(),
            rect,
        }
    }
}

/// Coordinate at step `i` of `n`; the last step lands exactly on `end`.
#[inline]
fn axis_at(
    rect: &BoundingRectangle,
    i: u32,
    n: u32,
    lerp: fn(&BoundingRectangle, f64) -> f64,
    end: f64,
) -> f64 {
    if i >= n {
        end
    } else {
        lerp(rect, i as f64 / n as f64)
    }
}

impl Iterator for GridCells {
    type Item = CellPolygon;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.resolution.cell_count() {
            return None;
        }
        let cell = self.cell(self.next);
        self.next += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.resolution.cell_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridCells {}

impl FusedIterator for GridCells {}

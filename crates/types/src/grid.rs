use crate::bbox::BoundingRectangle;
use crate::geo::{Point, Polygon};
use serde::{Deserialize, Serialize};

/// Number of columns (`horizontal`) and rows (`vertical`) of a sampling grid.
///
/// Both counts are at least one. The upper bound is a configuration
/// concern and is enforced by the parameter validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridResolution {
    horizontal: u32,
    vertical: u32,
}

impl GridResolution {
    /// Returns `None` when either count is zero.
    ///
    /// ```
    /// use geosample_types::grid::GridResolution;
    ///
    /// let res = GridResolution::new(3, 4).unwrap();
    /// assert_eq!(res.cell_count(), 12);
    /// assert!(GridResolution::new(0, 4).is_none());
    /// ```
    pub fn new(horizontal: u32, vertical: u32) -> Option<Self> {
        if horizontal == 0 || vertical == 0 {
            return None;
        }
        Some(Self {
            horizontal,
            vertical,
        })
    }

    pub fn horizontal(&self) -> u32 {
        self.horizontal
    }

    pub fn vertical(&self) -> u32 {
        self.vertical
    }

    /// Total number of cells, and so of per-cell store queries.
    pub fn cell_count(&self) -> usize {
        self.horizontal as usize * self.vertical as usize
    }
}

impl Default for GridResolution {
    fn default() -> Self {
        Self {
            horizontal: 3,
            vertical: 4,
        }
    }
}

/// One lattice cell of a partitioned [`BoundingRectangle`].
///
/// Neighbouring cells share edges. Each point of the parent rectangle is
/// owned by exactly one cell: a cell owns its western and southern edges,
/// and its eastern or northern edge only where that edge is also the
/// parent's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellPolygon {
    /// Position in emission order (column-major, then row)
    pub index: usize,
    pub col: u32,
    pub row: u32,
    /// The cell bounds as a corner sub-rectangle of the parent
    pub rect: BoundingRectangle,
    /// The cell's `max_x` edge lies on the parent's boundary
    pub owns_max_x: bool,
    /// The cell's `max_y` edge lies on the parent's boundary
    pub owns_max_y: bool,
}

impl CellPolygon {
    /// A cell whose own bounds are the whole parent, owning every edge.
    pub fn whole(index: usize, col: u32, row: u32, rect: BoundingRectangle) -> Self {
        Self {
            index,
            col,
            row,
            rect,
            owns_max_x: true,
            owns_max_y: true,
        }
    }

    /// Closed five-point ring of the cell.
    pub fn polygon(&self) -> Polygon {
        self.rect.to_polygon()
    }

    pub fn centroid(&self) -> Point {
        self.rect.center()
    }

    /// Half-open containment: `true` for exactly one cell of a partition.
    ///
    /// ```
    /// use geosample_types::bbox::BoundingRectangle;
    /// use geosample_types::geo::Point;
    /// use geosample_types::grid::CellPolygon;
    ///
    /// let west = CellPolygon {
    ///     owns_max_x: false,
    ///     ..CellPolygon::whole(0, 0, 0, BoundingRectangle::new(0.0, 0.0, 1.0, 1.0))
    /// };
    /// let east = CellPolygon::whole(1, 1, 0, BoundingRectangle::new(1.0, 0.0, 2.0, 1.0));
    ///
    /// let shared = Point::new(1.0, 0.5);
    /// assert!(!west.owns(&shared));
    /// assert!(east.owns(&shared));
    /// ```
    pub fn owns(&self, point: &Point) -> bool {
        let (x, y) = (point.x(), point.y());
        let (min_x, max_x) = (self.rect.min_x(), self.rect.max_x());
        let (min_y, max_y) = (self.rect.min_y(), self.rect.max_y());

        let in_x = x >= min_x && (x < max_x || (self.owns_max_x && x == max_x));
        let in_y = y >= min_y && (y < max_y || (self.owns_max_y && y == max_y));
        in_x && in_y
    }
}

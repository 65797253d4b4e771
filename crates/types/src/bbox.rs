use crate::geo::{Point, Polygon};
use serde::{Deserialize, Serialize};

/// A query rectangle given by two opposite corners.
///
/// The corners are kept exactly as supplied: no ordering is assumed between
/// them. Grid interpolation runs from `first` towards `second`, and the
/// `min_*`/`max_*` accessors extract the numeric extent when one is needed.
///
/// # Examples
///
/// ```
/// use geosample_types::bbox::BoundingRectangle;
///
/// // corners given "backwards" still describe the same area
/// let rect = BoundingRectangle::new(10.0, 55.0, 8.0, 45.0);
/// assert_eq!(rect.min_x(), 8.0);
/// assert_eq!(rect.max_y(), 55.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRectangle {
    /// Corner `(long1, lat1)`
    pub first: Point,
    /// Corner `(long2, lat2)`
    pub second: Point,
}

impl BoundingRectangle {
    /// Create a rectangle from the corners `(long1, lat1)` and `(long2, lat2)`.
    pub fn new(long1: f64, lat1: f64, long2: f64, lat2: f64) -> Self {
        Self {
            first: Point::new(long1, lat1),
            second: Point::new(long2, lat2),
        }
    }

    pub fn from_corners(first: Point, second: Point) -> Self {
        Self { first, second }
    }

    pub fn min_x(&self) -> f64 {
        self.first.x().min(self.second.x())
    }

    pub fn min_y(&self) -> f64 {
        self.first.y().min(self.second.y())
    }

    pub fn max_x(&self) -> f64 {
        self.first.x().max(self.second.x())
    }

    pub fn max_y(&self) -> f64 {
        self.first.y().max(self.second.y())
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x() + self.max_x()) / 2.0,
            (self.min_y() + self.max_y()) / 2.0,
        )
    }

    /// Longitude at fraction `t` of the way from the first corner to the second.
    #[inline]
    pub fn lerp_x(&self, t: f64) -> f64 {
        self.first.x() + t * (self.second.x() - self.first.x())
    }

    /// Latitude at fraction `t` of the way from the first corner to the second.
    #[inline]
    pub fn lerp_y(&self, t: f64) -> f64 {
        self.first.y() + t * (self.second.y() - self.first.y())
    }

    /// Inclusive containment test against the extracted extent.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.min_x()
            && point.x() <= self.max_x()
            && point.y() >= self.min_y()
            && point.y() <= self.max_y()
    }

    /// Closed ring through all four corners, starting at the first corner.
    pub fn to_polygon(&self) -> Polygon {
        let (x0, y0) = (self.first.x(), self.first.y());
        let (x1, y1) = (self.second.x(), self.second.y());
        Polygon::from_coords(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)], vec![])
    }
}

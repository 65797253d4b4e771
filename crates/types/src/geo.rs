//! Wrapped geometric types from the `geo` crate.
//!
//! Posts carry a [`Point`] geometry; grid cells and store queries use
//! [`Polygon`]. Both wrap the `geo` primitives so the rest of the workspace
//! does not depend on `geo` generics directly.

use serde::{Deserialize, Serialize};

/// A geographic point with longitude/latitude coordinates.
///
/// # Examples
///
/// ```
/// use geosample_types::geo::Point;
///
/// let point = Point::new(13.0, 37.0);
/// assert_eq!(point.lon(), 13.0);
/// assert_eq!(point.lat(), 37.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    inner: geo::Point<f64>,
}

impl Point {
    /// Create a new point from x (longitude) and y (latitude) coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            inner: geo::Point::new(x, y),
        }
    }

    /// Get the x coordinate (longitude).
    #[inline]
    pub fn x(&self) -> f64 {
        self.inner.x()
    }

    /// Get the y coordinate (latitude).
    #[inline]
    pub fn y(&self) -> f64 {
        self.inner.y()
    }

    /// Get the longitude (alias for x).
    #[inline]
    pub fn lon(&self) -> f64 {
        self.x()
    }

    /// Get the latitude (alias for y).
    #[inline]
    pub fn lat(&self) -> f64 {
        self.y()
    }

    /// Haversine distance to another point in meters.
    ///
    /// ```
    /// use geosample_types::geo::Point;
    ///
    /// let a = Point::new(20.0, 40.0);
    /// let b = Point::new(20.0, 41.0);
    /// let distance = a.haversine_distance(&b);
    /// assert!(distance > 110_000.0 && distance < 112_000.0);
    /// ```
    #[inline]
    pub fn haversine_distance(&self, other: &Point) -> f64 {
        use geo::Distance;
        geo::Haversine.distance(self.inner, other.inner)
    }

    /// GeoJSON position: `[longitude, latitude]`.
    pub fn to_position(&self) -> Vec<f64> {
        vec![self.x(), self.y()]
    }
}

/// A polygon with an exterior ring and optional holes.
///
/// ```
/// use geosample_types::geo::{Point, Polygon};
///
/// let square = Polygon::from_coords(
///     &[(8.0, 45.0), (10.0, 45.0), (10.0, 55.0), (8.0, 55.0), (8.0, 45.0)],
///     vec![],
/// );
/// assert!(square.covers(&Point::new(9.0, 50.0)));
/// assert!(square.covers(&Point::new(8.0, 50.0)));
/// assert!(!square.covers(&Point::new(11.0, 50.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    inner: geo::Polygon<f64>,
}

impl Polygon {
    pub fn new(exterior: geo::LineString<f64>, interiors: Vec<geo::LineString<f64>>) -> Self {
        Self {
            inner: geo::Polygon::new(exterior, interiors),
        }
    }

    /// Create a polygon from raw `(lon, lat)` coordinate lists.
    pub fn from_coords(exterior: &[(f64, f64)], interiors: Vec<Vec<(f64, f64)>>) -> Self {
        let exterior_coords: Vec<geo::Coord> =
            exterior.iter().map(|&(x, y)| geo::Coord { x, y }).collect();
        let exterior_line = geo::LineString::from(exterior_coords);

        let interior_lines: Vec<geo::LineString<f64>> = interiors
            .into_iter()
            .map(|interior| {
                let coords: Vec<geo::Coord> = interior
                    .into_iter()
                    .map(|(x, y)| geo::Coord { x, y })
                    .collect();
                geo::LineString::from(coords)
            })
            .collect();

        Self::new(exterior_line, interior_lines)
    }

    #[inline]
    pub fn exterior(&self) -> &geo::LineString<f64> {
        self.inner.exterior()
    }

    #[inline]
    pub fn interiors(&self) -> &[geo::LineString<f64>] {
        self.inner.interiors()
    }

    /// Strict containment: points on the boundary are excluded.
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        use geo::Contains;
        self.inner.contains(&point.inner)
    }

    /// Interior or boundary. A point on an edge shared by two grid cells
    /// is covered by both; [`crate::grid::CellPolygon::owns`] picks one.
    #[inline]
    pub fn covers(&self, point: &Point) -> bool {
        use geo::Intersects;
        self.inner.intersects(&point.inner)
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`, if the
    /// exterior ring is non-empty.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        use geo::BoundingRect;
        self.inner
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// GeoJSON rings: exterior first, then holes.
    pub fn to_rings(&self) -> Vec<Vec<Vec<f64>>> {
        std::iter::once(self.exterior())
            .chain(self.interiors().iter())
            .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
            .collect()
    }
}

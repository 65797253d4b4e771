//! Geospatial store abstraction.
//!
//! The engine never owns post storage. It talks to a [`GeoStore`], which is
//! injected by the caller and may be a remote database or the in-process
//! [`MemoryStore`]. All operations are read-only from the engine's side.

use crate::error::Result;
use async_trait::async_trait;
use geosample_types::geo::{Point, Polygon};
use geosample_types::post::{Post, PostId};
use std::cmp::Ordering;

mod memory;

pub use memory::MemoryStore;

/// Capability the sampling engine consumes.
///
/// Implementations must be `Send + Sync`: one handle is shared by every
/// concurrently running cell query.
#[async_trait]
pub trait GeoStore: Send + Sync {
    /// Posts whose geometry lies inside or on the boundary of `polygon`,
    /// ordered by `options.sort`.
    async fn find_within(&self, polygon: &Polygon, options: &FindOptions) -> Result<Vec<Post>>;

    /// Posts within `max_distance` meters of `center`, nearest first.
    /// `options.sort` only breaks distance ties.
    async fn find_near(
        &self,
        center: &Point,
        max_distance: f64,
        options: &FindOptions,
    ) -> Result<Vec<Post>>;

    /// Single post by identity.
    async fn find_by_id(&self, id: &PostId, projection: Projection) -> Result<Option<Post>>;

    /// All posts ordered by `options.sort`.
    async fn find_recent(&self, options: &FindOptions) -> Result<Vec<Post>>;
}

/// Result ordering requested from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOrder {
    /// Most recently inserted first
    Recency,
    /// Highest relevance first, then most recent
    Relevance,
    /// Closest to the given point first, then most recent
    NearestTo(Point),
}

impl SortOrder {
    /// Comparator placing the preferred post first.
    ///
    /// ```
    /// use geosample::storage::SortOrder;
    /// use geosample::{Point, Post, PostId, PostProperties};
    /// use std::cmp::Ordering;
    ///
    /// let post = |seq: u64| Post {
    ///     id: PostId::parse("ab").unwrap(),
    ///     geometry: Point::new(0.0, 0.0),
    ///     properties: PostProperties::new("m"),
    ///     sequence: seq,
    /// };
    /// assert_eq!(SortOrder::Recency.compare(&post(2), &post(1)), Ordering::Less);
    /// ```
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let by_recency = b.sequence.cmp(&a.sequence);
        match self {
            SortOrder::Recency => by_recency,
            SortOrder::Relevance => b
                .properties
                .relevance
                .partial_cmp(&a.properties.relevance)
                .unwrap_or(Ordering::Equal)
                .then(by_recency),
            SortOrder::NearestTo(target) => {
                let da = target.haversine_distance(&a.geometry);
                let db = target.haversine_distance(&b.geometry);
                da.partial_cmp(&db)
                    .unwrap_or(Ordering::Equal)
                    .then(by_recency)
            }
        }
    }
}

/// Which post fields a query needs back.
///
/// Geometry and identity are always returned. Stores that keep more than
/// the feature fields may use the hint to skip transferring the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub properties: bool,
}

impl Projection {
    /// Geometry, properties and identity.
    pub const FEATURE: Projection = Projection { properties: true };
    /// Geometry and identity only.
    pub const LOCATION: Projection = Projection { properties: false };

    pub fn apply(&self, mut post: Post) -> Post {
        if !self.properties {
            post.properties = Default::default();
        }
        post
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::FEATURE
    }
}

/// Limit, ordering and projection of a store query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FindOptions {
    pub limit: usize,
    pub sort: SortOrder,
    pub projection: Projection,
}

impl FindOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            sort: SortOrder::Recency,
            projection: Projection::FEATURE,
        }
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}

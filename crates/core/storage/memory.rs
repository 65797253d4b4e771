//! In-memory geospatial store backed by an R*-tree.

use super::{FindOptions, GeoStore, Projection};
use crate::compute::validation::validate_geographic_point;
use crate::error::{GeoSampleError, Result};
use async_trait::async_trait;
use geo::HaversineMeasure;
use geosample_types::geo::{Point, Polygon};
use geosample_types::post::{Post, PostId, PostProperties};
use parking_lot::RwLock;
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Index entry: a post position plus the key into the post map.
#[derive(Debug, Clone, PartialEq)]
struct IndexedPost {
    position: [f64; 2],
    id: PostId,
}

impl RTreeObject for IndexedPost {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPost {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

#[derive(Default)]
struct Inner {
    tree: RTree<IndexedPost>,
    posts: FxHashMap<PostId, Post>,
}

/// Thread-safe in-memory [`GeoStore`].
///
/// Posts are indexed by position in an R*-tree; polygon and radius queries
/// prune by envelope before the exact geometric test.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            sequence: AtomicU64::new(1),
        }
    }

    /// Insert a post under a freshly generated identity.
    pub fn insert(&self, geometry: Point, properties: PostProperties) -> Result<Post> {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        let id = PostId::parse(&raw)
            .ok_or_else(|| GeoSampleError::Store(format!("generated id is not hex: {}", raw)))?;
        self.insert_with_id(id, geometry, properties)
    }

    /// Insert or replace the post with the given identity.
    ///
    /// A replaced post counts as newly inserted for recency ordering.
    pub fn insert_with_id(
        &self,
        id: PostId,
        geometry: Point,
        properties: PostProperties,
    ) -> Result<Post> {
        validate_geographic_point(&geometry)?;

        let post = Post {
            id: id.clone(),
            geometry,
            properties,
            sequence: self.sequence.fetch_add(1, AtomicOrdering::Relaxed),
        };

        let mut inner = self.inner.write();
        if let Some(old) = inner.posts.insert(id.clone(), post.clone()) {
            inner.tree.remove(&IndexedPost {
                position: [old.geometry.x(), old.geometry.y()],
                id: id.clone(),
            });
        }
        inner.tree.insert(IndexedPost {
            position: [geometry.x(), geometry.y()],
            id,
        });

        Ok(post)
    }

    pub fn remove(&self, id: &PostId) -> Option<Post> {
        let mut inner = self.inner.write();
        let old = inner.posts.remove(id)?;
        inner.tree.remove(&IndexedPost {
            position: [old.geometry.x(), old.geometry.y()],
            id: id.clone(),
        });
        Some(old)
    }

    pub fn len(&self) -> usize {
        self.inner.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().posts.is_empty()
    }

    fn finish(mut posts: Vec<Post>, options: &FindOptions) -> Vec<Post> {
        posts.sort_by(|a, b| options.sort.compare(a, b));
        posts.truncate(options.limit);
        posts
            .into_iter()
            .map(|p| options.projection.apply(p))
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoStore for MemoryStore {
    async fn find_within(&self, polygon: &Polygon, options: &FindOptions) -> Result<Vec<Post>> {
        if options.limit == 0 {
            return Ok(Vec::new());
        }
        let Some((min_x, min_y, max_x, max_y)) = polygon.bounds() else {
            return Ok(Vec::new());
        };

        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let inner = self.inner.read();
        let matches = inner
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|entry| inner.posts.get(&entry.id))
            .filter(|post| polygon.covers(&post.geometry))
            .cloned()
            .collect();

        Ok(Self::finish(matches, options))
    }

    async fn find_near(
        &self,
        center: &Point,
        max_distance: f64,
        options: &FindOptions,
    ) -> Result<Vec<Post>> {
        if options.limit == 0 || !max_distance.is_finite() || max_distance < 0.0 {
            return Ok(Vec::new());
        }

        let envelopes = search_envelopes(center, max_distance);

        let inner = self.inner.read();
        let mut candidates: Vec<(f64, &Post)> = envelopes
            .iter()
            .flat_map(|envelope| inner.tree.locate_in_envelope_intersecting(envelope))
            .filter_map(|entry| inner.posts.get(&entry.id))
            .filter_map(|post| {
                let distance = center.haversine_distance(&post.geometry);
                (distance.is_finite() && distance <= max_distance).then_some((distance, post))
            })
            .collect();

        candidates.sort_by(|(da, a), (db, b)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| options.sort.compare(a, b))
        });

        Ok(candidates
            .into_iter()
            .take(options.limit)
            .map(|(_, post)| options.projection.apply(post.clone()))
            .collect())
    }

    async fn find_by_id(&self, id: &PostId, projection: Projection) -> Result<Option<Post>> {
        Ok(self
            .inner
            .read()
            .posts
            .get(id)
            .map(|post| projection.apply(post.clone())))
    }

    async fn find_recent(&self, options: &FindOptions) -> Result<Vec<Post>> {
        if options.limit == 0 {
            return Ok(Vec::new());
        }
        let posts = self.inner.read().posts.values().cloned().collect();
        Ok(Self::finish(posts, options))
    }
}

/// Degrees of latitude and longitude spanned by `radius` meters around `lat`.
///
/// The longitude span is the widest one over the whole circle, which lies
/// poleward of `lat`. It is 180 once the circle reaches a pole.
#[inline]
fn compute_lat_lon_degrees(lat: f64, radius: f64) -> (f64, f64) {
    let angular = radius / HaversineMeasure::GRS80_MEAN_RADIUS.radius();
    let lat_degrees = angular.to_degrees();

    if lat.abs() + lat_degrees >= 90.0 {
        return (lat_degrees, 180.0);
    }

    let lon_degrees = (angular.sin() / lat.to_radians().cos()).asin().to_degrees();
    (lat_degrees, lon_degrees)
}

/// Index envelopes holding every point within `radius` meters of `center`.
///
/// A circle crossing the antimeridian yields two disjoint boxes, one on each
/// side. A circle reaching a pole yields a single full-longitude band.
fn search_envelopes(center: &Point, radius: f64) -> Vec<AABB<[f64; 2]>> {
    let (lat_degrees, lon_degrees) = compute_lat_lon_degrees(center.y(), radius);
    let min_y = (center.y() - lat_degrees).max(-90.0);
    let max_y = (center.y() + lat_degrees).min(90.0);
    let min_x = center.x() - lon_degrees;
    let max_x = center.x() + lon_degrees;

    if lon_degrees >= 180.0 {
        vec![AABB::from_corners([-180.0, min_y], [180.0, max_y])]
    } else if min_x < -180.0 {
        vec![
            AABB::from_corners([-180.0, min_y], [max_x, max_y]),
            AABB::from_corners([min_x + 360.0, min_y], [180.0, max_y]),
        ]
    } else if max_x > 180.0 {
        vec![
            AABB::from_corners([min_x, min_y], [180.0, max_y]),
            AABB::from_corners([-180.0, min_y], [max_x - 360.0, max_y]),
        ]
    } else {
        vec![AABB::from_corners([min_x, min_y], [max_x, max_y])]
    }
}

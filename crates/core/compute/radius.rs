//! Nearest-posts lookup around a point.

use crate::error::{GeoSampleError, Result};
use crate::storage::{FindOptions, GeoStore, Projection, SortOrder};
use geosample_types::geo::Point;
use geosample_types::post::Post;
use std::sync::Arc;
use std::time::Duration;

/// Up to `limit` posts within a distance of a point, nearest first and most
/// recent first among equally distant posts.
#[derive(Clone)]
pub struct RadiusQuery {
    store: Arc<dyn GeoStore>,
    timeout: Duration,
}

impl RadiusQuery {
    pub fn new(store: Arc<dyn GeoStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// `max_distance` is in meters.
    pub async fn run(&self, center: &Point, max_distance: u64, limit: u32) -> Result<Vec<Post>> {
        let options = FindOptions::new(limit as usize)
            .sort(SortOrder::Recency)
            .projection(Projection::FEATURE);

        log::debug!(
            "Radius query at ({}, {}) within {} m, limit {}",
            center.lon(),
            center.lat(),
            max_distance,
            limit
        );

        tokio::time::timeout(
            self.timeout,
            self.store.find_near(center, max_distance as f64, &options),
        )
        .await
        .map_err(|_| {
            log::warn!("Radius query exceeded {:?}", self.timeout);
            GeoSampleError::Timeout(self.timeout)
        })?
    }
}

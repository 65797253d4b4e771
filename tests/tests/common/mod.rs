#![allow(dead_code)]

use async_trait::async_trait;
use geosample::{
    FindOptions, GeoSampleError, GeoStore, MemoryStore, Params, Point, Polygon, Post, PostId,
    PostProperties, Projection, Result,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Posts on a regular lattice over the rectangle, `n × n` of them.
pub fn lattice_store(min: (f64, f64), max: (f64, f64), n: usize) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for i in 0..n {
        for j in 0..n {
            let x = min.0 + (max.0 - min.0) * (i as f64 + 0.5) / n as f64;
            let y = min.1 + (max.1 - min.1) * (j as f64 + 0.5) / n as f64;
            store
                .insert(
                    Point::new(x, y),
                    PostProperties::new(format!("{}:{}", i, j)).with_relevance((i * n + j) as f64),
                )
                .unwrap();
        }
    }
    Arc::new(store)
}

/// Delays each `find_within` by an amount derived from the queried polygon.
pub struct DelayedStore {
    pub inner: Arc<MemoryStore>,
    pub delay: Box<dyn Fn(&Polygon) -> Duration + Send + Sync>,
}

#[async_trait]
impl GeoStore for DelayedStore {
    async fn find_within(&self, polygon: &Polygon, options: &FindOptions) -> Result<Vec<Post>> {
        tokio::time::sleep((self.delay)(polygon)).await;
        self.inner.find_within(polygon, options).await
    }

    async fn find_near(&self, c: &Point, d: f64, o: &FindOptions) -> Result<Vec<Post>> {
        self.inner.find_near(c, d, o).await
    }

    async fn find_by_id(&self, id: &PostId, p: Projection) -> Result<Option<Post>> {
        self.inner.find_by_id(id, p).await
    }

    async fn find_recent(&self, o: &FindOptions) -> Result<Vec<Post>> {
        self.inner.find_recent(o).await
    }
}

/// Fails `find_within` for polygons whose western edge lies west of `fail_west_of`.
pub struct FailingStore {
    pub inner: Arc<MemoryStore>,
    pub fail_west_of: f64,
}

#[async_trait]
impl GeoStore for FailingStore {
    async fn find_within(&self, polygon: &Polygon, options: &FindOptions) -> Result<Vec<Post>> {
        let min_x = polygon.bounds().map(|b| b.0).unwrap_or(f64::NAN);
        if min_x < self.fail_west_of {
            return Err(GeoSampleError::Store("store unavailable".into()));
        }
        self.inner.find_within(polygon, options).await
    }

    async fn find_near(&self, _: &Point, _: f64, _: &FindOptions) -> Result<Vec<Post>> {
        Err(GeoSampleError::Store("store unavailable".into()))
    }

    async fn find_by_id(&self, id: &PostId, p: Projection) -> Result<Option<Post>> {
        self.inner.find_by_id(id, p).await
    }

    async fn find_recent(&self, o: &FindOptions) -> Result<Vec<Post>> {
        self.inner.find_recent(o).await
    }
}

/// Counts every store call.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoStore for CountingStore {
    async fn find_within(&self, polygon: &Polygon, options: &FindOptions) -> Result<Vec<Post>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_within(polygon, options).await
    }

    async fn find_near(&self, c: &Point, d: f64, o: &FindOptions) -> Result<Vec<Post>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_near(c, d, o).await
    }

    async fn find_by_id(&self, id: &PostId, p: Projection) -> Result<Option<Post>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id, p).await
    }

    async fn find_recent(&self, o: &FindOptions) -> Result<Vec<Post>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_recent(o).await
    }
}

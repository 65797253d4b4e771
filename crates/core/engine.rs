//! The query surface: validate, query, assemble.

use crate::builder::EngineBuilder;
use crate::compute::dispatcher::{SampleResult, SamplingDispatcher};
use crate::compute::geojson::{
    cells_to_feature_collection, post_to_feature, posts_to_feature_collection,
    sample_to_feature_collection,
};
use crate::compute::grid::partition;
use crate::compute::radius::RadiusQuery;
use crate::compute::sampler::CellSampler;
use crate::compute::validation::{GridRequest, ListRequest, Params, RadiusRequest, parse_post_id};
use crate::config::Config;
use crate::error::{GeoSampleError, Result};
use crate::storage::{FindOptions, GeoStore, Projection, SortOrder};
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use geosample_types::grid::CellPolygon;
use geosample_types::post::Post;
use std::sync::Arc;

/// Geospatial sampling engine over an injected store.
///
/// Every entry point validates its parameters before touching the store; a
/// rejected request never issues a query.
///
/// ```rust
/// use geosample::{Engine, MemoryStore, Params, Point, PostProperties};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), geosample::GeoSampleError> {
/// let store = Arc::new(MemoryStore::new());
/// store.insert(Point::new(9.0, 50.0), PostProperties::new("hello"))?;
///
/// let engine = Engine::builder().store(store).build()?;
///
/// let params: Params = [("long1", "8"), ("lat1", "45"), ("long2", "10"), ("lat2", "55")]
///     .into_iter()
///     .map(|(k, v)| (k.to_string(), v.to_string()))
///     .collect();
/// let collection = engine.by_rectangle(&params).await?;
/// assert!(!collection.features.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn GeoStore>,
    config: Config,
    dispatcher: SamplingDispatcher,
    radius: RadiusQuery,
}

impl Engine {
    /// Fails with [`GeoSampleError::Config`] when `config` does not validate.
    pub fn new(store: Arc<dyn GeoStore>, config: Config) -> Result<Self> {
        config.validate().map_err(GeoSampleError::Config)?;

        let sampler = CellSampler::new(store.clone(), config.ranking);
        let dispatcher =
            SamplingDispatcher::new(sampler, config.failure_policy, config.query_timeout);
        let radius = RadiusQuery::new(store.clone(), config.query_timeout);

        Ok(Self {
            store,
            config,
            dispatcher,
            radius,
        })
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn GeoStore> {
        &self.store
    }

    /// Grid mode: one representative post per cell of the requested grid.
    ///
    /// Under [`FailurePolicy::Partial`](crate::config::FailurePolicy::Partial)
    /// failed cell positions are reported in the `failed_cells` foreign
    /// member of the collection.
    pub async fn by_rectangle(&self, params: &Params) -> Result<FeatureCollection> {
        let request = GridRequest::from_params(params, &self.config)?;
        let result = self.sample_grid(&request).await?;

        let mut collection = sample_to_feature_collection(
            &result,
            self.config.empty_cells,
            request.limit.map(|limit| limit as usize),
        )?;

        if !result.is_complete() {
            let mut members = JsonObject::new();
            members.insert(
                "failed_cells".to_string(),
                JsonValue::from(result.failed_cells.clone()),
            );
            collection.foreign_members = Some(members);
        }

        Ok(collection)
    }

    pub async fn sample_grid(&self, request: &GridRequest) -> Result<SampleResult> {
        log::debug!(
            "Sampling {}x{} grid over ({}, {})-({}, {})",
            request.resolution.horizontal(),
            request.resolution.vertical(),
            request.rect.first.x(),
            request.rect.first.y(),
            request.rect.second.x(),
            request.rect.second.y()
        );
        self.dispatcher
            .dispatch(partition(&request.rect, request.resolution))
            .await
    }

    /// Outlines of the cells a grid request would query.
    pub fn grid_cells(&self, params: &Params) -> Result<FeatureCollection> {
        let request = GridRequest::from_params(params, &self.config)?;
        let cells: Vec<CellPolygon> = partition(&request.rect, request.resolution).collect();
        Ok(cells_to_feature_collection(&cells))
    }

    /// Radius mode: posts nearest to a point within a distance.
    pub async fn by_point(&self, params: &Params) -> Result<FeatureCollection> {
        let request = RadiusRequest::from_params(params, &self.config)?;
        let posts = self.nearby(&request).await?;
        posts_to_feature_collection(&posts)
    }

    pub async fn nearby(&self, request: &RadiusRequest) -> Result<Vec<Post>> {
        self.radius
            .run(&request.center, request.max_distance, request.limit)
            .await
    }

    /// List mode: most recent posts first.
    pub async fn list(&self, params: &Params) -> Result<FeatureCollection> {
        let request = ListRequest::from_params(params, &self.config)?;
        let posts = self.recent(&request).await?;
        posts_to_feature_collection(&posts)
    }

    pub async fn recent(&self, request: &ListRequest) -> Result<Vec<Post>> {
        let options = FindOptions::new(request.limit as usize).sort(SortOrder::Recency);
        self.with_deadline(self.store.find_recent(&options)).await
    }

    /// Single fetch by hexadecimal identity.
    pub async fn get_post(&self, id: &str) -> Result<Feature> {
        let id = parse_post_id(id)?;
        let post = self
            .with_deadline(self.store.find_by_id(&id, Projection::FEATURE))
            .await?
            .ok_or_else(|| GeoSampleError::NotFound(id.to_string()))?;
        post_to_feature(&post)
    }

    async fn with_deadline<T, F>(&self, query: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let timeout = self.config.query_timeout;
        tokio::time::timeout(timeout, query)
            .await
            .map_err(|_| GeoSampleError::Timeout(timeout))?
    }
}

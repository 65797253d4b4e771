//! Per-cell representative lookup.

use crate::config::CellRanking;
use crate::error::Result;
use crate::storage::{FindOptions, GeoStore, Projection, SortOrder};
use geosample_types::grid::CellPolygon;
use geosample_types::post::Post;
use std::sync::Arc;

/// Picks the single best post inside one cell.
#[derive(Clone)]
pub struct CellSampler {
    store: Arc<dyn GeoStore>,
    ranking: CellRanking,
}

impl CellSampler {
    pub fn new(store: Arc<dyn GeoStore>, ranking: CellRanking) -> Self {
        Self { store, ranking }
    }

    pub fn ranking(&self) -> CellRanking {
        self.ranking
    }

    /// Store ordering that puts the cell's representative first.
    pub fn sort_order(&self, cell: &CellPolygon) -> SortOrder {
        match self.ranking {
            CellRanking::Recency => SortOrder::Recency,
            CellRanking::Relevance => SortOrder::Relevance,
            CellRanking::CellCenter => SortOrder::NearestTo(cell.centroid()),
        }
    }

    /// `None` when the cell owns no post.
    ///
    /// The store answers for the closed polygon, so the top hit can sit on
    /// an edge owned by a neighbouring cell. Such hits are skipped and the
    /// query is repeated with a larger batch until an owned post turns up or
    /// the store runs out.
    pub async fn sample(&self, cell: &CellPolygon) -> Result<Option<Post>> {
        let polygon = cell.polygon();
        let sort = self.sort_order(cell);
        let mut batch = 1usize;

        loop {
            let options = FindOptions::new(batch)
                .sort(sort)
                .projection(Projection::FEATURE);
            let posts = self.store.find_within(&polygon, &options).await?;
            let exhausted = posts.len() < batch;

            if let Some(post) = posts.into_iter().find(|post| cell.owns(&post.geometry)) {
                return Ok(Some(post));
            }
            if exhausted || batch == usize::MAX {
                return Ok(None);
            }
            log::debug!(
                "Cell {} top {} posts lie on neighbouring edges, widening",
                cell.index,
                batch
            );
            batch = batch.saturating_mul(BATCH_GROWTH);
        }
    }
}

const BATCH_GROWTH: usize = 4;

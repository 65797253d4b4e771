//! Concurrent fanout of cell queries.
//!
//! One task per cell is spawned on a [`JoinSet`]; outcomes are slotted back
//! by position so the result lines up with the cell sequence no matter in
//! which order the store answers. The whole fanout runs under a deadline.

use crate::compute::sampler::CellSampler;
use crate::config::FailurePolicy;
use crate::error::{GeoSampleError, Result};
use geosample_types::grid::CellPolygon;
use geosample_types::post::Post;
use std::time::Duration;
use tokio::task::JoinSet;

/// Per-cell outcome of a grid query, aligned with the cell sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleResult {
    /// `None` for cells without a post, or whose query failed
    pub cells: Vec<Option<Post>>,
    /// Positions of failed cells, ascending. Only filled under
    /// [`FailurePolicy::Partial`].
    pub failed_cells: Vec<usize>,
}

impl SampleResult {
    /// Sampled posts in cell order, skipping empty cells.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.cells.iter().flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.failed_cells.is_empty()
    }
}

/// Runs a [`CellSampler`] over every cell concurrently.
#[derive(Clone)]
pub struct SamplingDispatcher {
    sampler: CellSampler,
    failure_policy: FailurePolicy,
    timeout: Duration,
}

impl SamplingDispatcher {
    pub fn new(sampler: CellSampler, failure_policy: FailurePolicy, timeout: Duration) -> Self {
        Self {
            sampler,
            failure_policy,
            timeout,
        }
    }

    pub async fn dispatch<I>(&self, cells: I) -> Result<SampleResult>
    where
        I: IntoIterator<Item = CellPolygon>,
    {
        let mut tasks = JoinSet::new();
        let mut count = 0;
        for (position, cell) in cells.into_iter().enumerate() {
            let sampler = self.sampler.clone();
            tasks.spawn(async move { (position, sampler.sample(&cell).await) });
            count += 1;
        }

        log::debug!(
            "Dispatched {} cell queries (ranking {:?}, policy {:?})",
            count,
            self.sampler.ranking(),
            self.failure_policy
        );

        let mut result = SampleResult {
            cells: vec![None; count],
            failed_cells: Vec::new(),
        };

        let joined = tokio::time::timeout(self.timeout, async {
            while let Some(joined) = tasks.join_next().await {
                let (position, outcome) =
                    joined.map_err(|e| GeoSampleError::Task(e.to_string()))?;
                match outcome {
                    Ok(post) => result.cells[position] = post,
                    Err(e) => match self.failure_policy {
                        FailurePolicy::FailFast => return Err(e),
                        FailurePolicy::Partial => {
                            log::warn!("Cell {} query failed: {}", position, e);
                            result.failed_cells.push(position);
                        }
                    },
                }
            }
            Ok::<(), GeoSampleError>(())
        })
        .await;

        match joined {
            Ok(Ok(())) => {
                result.failed_cells.sort_unstable();
                Ok(result)
            }
            Ok(Err(e)) => {
                tasks.abort_all();
                log::warn!("Grid query aborted, {} cell queries cancelled: {}", tasks.len(), e);
                Err(e)
            }
            Err(_) => {
                tasks.abort_all();
                log::warn!(
                    "Grid query exceeded {:?} with {} of {} cells outstanding",
                    self.timeout,
                    tasks.len(),
                    count
                );
                Err(GeoSampleError::Timeout(self.timeout))
            }
        }
    }
}

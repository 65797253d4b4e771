//! Query computation: validation, partitioning, sampling and assembly.

pub mod dispatcher;
pub mod geojson;
pub mod grid;
pub mod radius;
pub mod sampler;
pub mod validation;

pub use dispatcher::{SampleResult, SamplingDispatcher};
pub use grid::{GridCells, partition};
pub use radius::RadiusQuery;
pub use sampler::CellSampler;
pub use validation::{GridRequest, ListRequest, Params, RadiusRequest};

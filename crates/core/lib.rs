//! Grid-based geospatial sampling over a pluggable store of geotagged posts.
//!
//! ## Features
//! - **Grid sampling**: partition a rectangle into `h × v` cells and pick one
//!   representative post per cell, querying all cells concurrently
//! - **Radius queries**: nearest posts within a distance of a point
//! - **List and fetch**: most recent posts, or a single post by identity
//! - **Pluggable store**: any [`GeoStore`]; [`MemoryStore`] is an in-process
//!   R*-tree implementation
//!
//! ## Failure handling
//! Parameters are validated before any store query. A grid query runs under
//! a deadline (`Config::query_timeout`) and, depending on
//! [`FailurePolicy`], either aborts on the first failing cell or returns the
//! remaining cells with the failed ones listed.
//!
//! ```rust
//! use geosample::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! store.insert(Point::new(20.0, 40.0), PostProperties::new("hello"))?;
//!
//! let engine = Engine::builder().store(store).build()?;
//! let request = RadiusRequest {
//!     center: Point::new(20.0, 40.0),
//!     max_distance: 1_000,
//!     limit: 10,
//! };
//! assert_eq!(engine.nearby(&request).await?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod storage;

pub use builder::EngineBuilder;
pub use engine::Engine;
pub use error::{GeoSampleError, Result, ValidationError};

pub use config::{CellRanking, Config, EmptyCellPolicy, FailurePolicy, GridResolution};

pub use geosample_types::bbox::BoundingRectangle;
pub use geosample_types::geo::{Point, Polygon};
pub use geosample_types::grid::CellPolygon;
pub use geosample_types::post::{Post, PostId, PostProperties, UserRef};

pub use compute::geojson;
pub use compute::validation;
pub use compute::{
    CellSampler, GridRequest, ListRequest, Params, RadiusQuery, RadiusRequest, SampleResult,
    SamplingDispatcher, partition,
};

pub use storage::{FindOptions, GeoStore, MemoryStore, Projection, SortOrder};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for callers of the engine.
pub mod prelude {
    pub use crate::{
        BoundingRectangle, CellRanking, Config, EmptyCellPolicy, Engine, FailurePolicy,
        GeoSampleError, GeoStore, GridRequest, GridResolution, MemoryStore, Params, Point, Post,
        PostId, PostProperties, RadiusRequest, Result,
    };
}

//! # geosample-types
//!
//! Data types shared by the geosample engine and its callers:
//!
//! - **Geometry**: [`geo::Point`], [`geo::Polygon`] wrappers over the `geo` crate
//! - **Grid**: [`bbox::BoundingRectangle`], [`grid::GridResolution`], [`grid::CellPolygon`]
//! - **Items**: [`post::Post`] with its properties and identity
//! - **Policies**: empty-cell, failure and ranking choices in [`config`]
//!
//! All types are serializable with Serde.
//!
//! ```rust
//! use geosample_types::bbox::BoundingRectangle;
//! use geosample_types::geo::Point;
//!
//! let area = BoundingRectangle::new(8.0, 45.0, 10.0, 55.0);
//! assert!(area.contains_point(&Point::new(9.0, 50.0)));
//! ```

pub mod bbox;
pub mod config;
pub mod geo;
pub mod grid;
pub mod post;

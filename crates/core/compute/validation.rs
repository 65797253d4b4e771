//! Parameter validation for every query mode.
//!
//! Raw request parameters arrive as strings keyed by field name. Each check
//! either yields a typed value or a [`ValidationError`] naming the field, and
//! runs before any store query is issued.

use crate::config::Config;
use crate::error::ValidationError;
use geosample_types::bbox::BoundingRectangle;
use geosample_types::geo::Point;
use geosample_types::grid::GridResolution;
use geosample_types::post::PostId;
use std::collections::HashMap;

/// Raw request parameters, keyed by field name.
pub type Params = HashMap<String, String>;

type Validated<T> = std::result::Result<T, ValidationError>;

/// Validates a 2D point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geosample::compute::validation::validate_geographic_point;
/// use geosample::Point;
///
/// assert!(validate_geographic_point(&Point::new(13.0, 37.0)).is_ok());
/// assert!(validate_geographic_point(&Point::new(200.0, 40.0)).is_err());
/// assert!(validate_geographic_point(&Point::new(-74.0, 95.0)).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Validated<()> {
    check_longitude("geometry", point.x())?;
    check_latitude("geometry", point.y())?;
    Ok(())
}

fn check_longitude(field: &str, x: f64) -> Validated<f64> {
    if !x.is_finite() {
        return Err(ValidationError::new(
            field,
            format!("longitude must be finite, got: {}", x),
        ));
    }
    if !(-180.0..=180.0).contains(&x) {
        return Err(ValidationError::new(
            field,
            format!("longitude out of range [-180.0, 180.0]: {}", x),
        ));
    }
    Ok(x)
}

fn check_latitude(field: &str, y: f64) -> Validated<f64> {
    if !y.is_finite() {
        return Err(ValidationError::new(
            field,
            format!("latitude must be finite, got: {}", y),
        ));
    }
    if !(-90.0..=90.0).contains(&y) {
        return Err(ValidationError::new(
            field,
            format!("latitude out of range [-90.0, 90.0]: {}", y),
        ));
    }
    Ok(y)
}

fn required<'a>(params: &'a Params, field: &str) -> Validated<&'a str> {
    match params.get(field) {
        Some(raw) => non_empty(field, raw),
        None => Err(ValidationError::new(field, "is required")),
    }
}

fn optional<'a>(params: &'a Params, field: &str) -> Validated<Option<&'a str>> {
    params
        .get(field)
        .map(|raw| non_empty(field, raw))
        .transpose()
}

fn non_empty<'a>(field: &str, raw: &'a str) -> Validated<&'a str> {
    if raw.is_empty() {
        Err(ValidationError::new(field, "must not be empty"))
    } else {
        Ok(raw)
    }
}

fn parse_integer(field: &str, raw: &str) -> Validated<i64> {
    raw.parse::<i64>()
        .map_err(|_| ValidationError::new(field, format!("must be an integer, got: {:?}", raw)))
}

fn parse_float(field: &str, raw: &str) -> Validated<f64> {
    raw.parse::<f64>()
        .map_err(|_| ValidationError::new(field, format!("must be a number, got: {:?}", raw)))
}

fn integer_in_range(field: &str, raw: &str, min: i64, max: i64) -> Validated<u32> {
    let value = parse_integer(field, raw)?;
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be in [{}, {}], got: {}", min, max, value),
        ));
    }
    u32::try_from(value)
        .map_err(|_| ValidationError::new(field, format!("out of range: {}", value)))
}

/// Longitude parameter `field`, required.
pub fn parse_longitude(params: &Params, field: &str) -> Validated<f64> {
    let raw = required(params, field)?;
    check_longitude(field, parse_float(field, raw)?)
}

/// Latitude parameter `field`, required.
pub fn parse_latitude(params: &Params, field: &str) -> Validated<f64> {
    let raw = required(params, field)?;
    check_latitude(field, parse_float(field, raw)?)
}

/// `limit` in `[1, max_limit]`, or `default_limit` when absent.
pub fn parse_limit(params: &Params, config: &Config) -> Validated<u32> {
    Ok(parse_optional_limit(params, config)?.unwrap_or(config.default_limit))
}

/// `limit` in `[1, max_limit]` when present.
pub fn parse_optional_limit(params: &Params, config: &Config) -> Validated<Option<u32>> {
    optional(params, "limit")?
        .map(|raw| integer_in_range("limit", raw, 1, config.max_limit as i64))
        .transpose()
}

/// Both grid axes, each in `[1, max_resolution]`, defaulting per axis.
pub fn parse_resolution(params: &Params, config: &Config) -> Validated<GridResolution> {
    let max = config.max_resolution as i64;
    let horizontal = optional(params, "horizontal_resolution")?
        .map(|raw| integer_in_range("horizontal_resolution", raw, 1, max))
        .transpose()?
        .unwrap_or(config.default_resolution.horizontal());
    let vertical = optional(params, "vertical_resolution")?
        .map(|raw| integer_in_range("vertical_resolution", raw, 1, max))
        .transpose()?
        .unwrap_or(config.default_resolution.vertical());

    GridResolution::new(horizontal, vertical)
        .ok_or_else(|| ValidationError::new("horizontal_resolution", "must be positive"))
}

/// `distance` in meters: a required integer, zero or more.
pub fn parse_distance(params: &Params) -> Validated<u64> {
    let raw = required(params, "distance")?;
    let value = parse_integer("distance", raw)?;
    u64::try_from(value).map_err(|_| {
        ValidationError::new("distance", format!("must not be negative, got: {}", value))
    })
}

/// Post identity: a non-empty hexadecimal string.
pub fn parse_post_id(raw: &str) -> Validated<PostId> {
    PostId::parse(raw).ok_or_else(|| {
        ValidationError::new("id", format!("must be a hexadecimal string, got: {:?}", raw))
    })
}

/// Validated grid-mode request.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub rect: BoundingRectangle,
    pub resolution: GridResolution,
    /// Cap on the number of returned features
    pub limit: Option<u32>,
}

impl GridRequest {
    pub fn from_params(params: &Params, config: &Config) -> Validated<Self> {
        let long1 = parse_longitude(params, "long1")?;
        let lat1 = parse_latitude(params, "lat1")?;
        let long2 = parse_longitude(params, "long2")?;
        let lat2 = parse_latitude(params, "lat2")?;
        let resolution = parse_resolution(params, config)?;
        let limit = parse_optional_limit(params, config)?;

        Ok(Self {
            rect: BoundingRectangle::new(long1, lat1, long2, lat2),
            resolution,
            limit,
        })
    }
}

/// Validated radius-mode request.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusRequest {
    pub center: Point,
    /// Meters
    pub max_distance: u64,
    pub limit: u32,
}

impl RadiusRequest {
    pub fn from_params(params: &Params, config: &Config) -> Validated<Self> {
        let long = parse_longitude(params, "long")?;
        let lat = parse_latitude(params, "lat")?;
        let max_distance = parse_distance(params)?;
        let limit = parse_limit(params, config)?;

        Ok(Self {
            center: Point::new(long, lat),
            max_distance,
            limit,
        })
    }
}

/// Validated list-mode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    pub limit: u32,
}

impl ListRequest {
    pub fn from_params(params: &Params, config: &Config) -> Validated<Self> {
        Ok(Self {
            limit: parse_limit(params, config)?,
        })
    }
}

//! GeoJSON conversion for query results and post input.

use crate::compute::dispatcher::SampleResult;
use crate::compute::validation::validate_geographic_point;
use crate::config::EmptyCellPolicy;
use crate::error::{GeoSampleError, Result, ValidationError};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use geosample_types::geo::Point;
use geosample_types::grid::CellPolygon;
use geosample_types::post::{Post, PostId, PostProperties};

/// A post read from GeoJSON input, before a store assigns its sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PostInput {
    pub id: Option<PostId>,
    pub geometry: Point,
    pub properties: PostProperties,
}

/// Converts a post to a Feature carrying its identity both as `id` and as
/// the `_id` foreign member.
pub fn post_to_feature(post: &Post) -> Result<Feature> {
    let properties = match serde_json::to_value(&post.properties)? {
        JsonValue::Object(map) => map,
        other => {
            return Err(GeoSampleError::Serialization(serde::ser::Error::custom(
                format!("post properties did not serialize to an object: {}", other),
            )));
        }
    };

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("_id".to_string(), JsonValue::from(post.id.as_str()));

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(post.geometry.to_position()))),
        id: Some(Id::String(post.id.to_string())),
        properties: Some(properties),
        foreign_members: Some(foreign_members),
    })
}

/// Placeholder for a grid cell without a post.
pub fn empty_cell_feature(index: usize) -> Feature {
    cell_marker(index, "empty")
}

/// Placeholder for a grid cell whose query failed, so its content is unknown.
pub fn failed_cell_feature(index: usize) -> Feature {
    cell_marker(index, "failed")
}

fn cell_marker(index: usize, flag: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("cell".to_string(), JsonValue::from(index));
    properties.insert(flag.to_string(), JsonValue::Bool(true));

    Feature {
        bbox: None,
        geometry: None,
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Posts to a FeatureCollection, in the given order.
pub fn posts_to_feature_collection<'a, I>(posts: I) -> Result<FeatureCollection>
where
    I: IntoIterator<Item = &'a Post>,
{
    let features = posts
        .into_iter()
        .map(post_to_feature)
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Grid result to a FeatureCollection in cell order.
///
/// Empty and failed cells are dropped or replaced by a marker according to
/// `policy`; a failed cell's marker is flagged `failed` rather than `empty`.
/// `limit` caps the number of emitted features.
pub fn sample_to_feature_collection(
    result: &SampleResult,
    policy: EmptyCellPolicy,
    limit: Option<usize>,
) -> Result<FeatureCollection> {
    let mut features = Vec::with_capacity(result.cells.len());
    for (index, cell) in result.cells.iter().enumerate() {
        if limit.is_some_and(|limit| features.len() >= limit) {
            break;
        }
        match (cell, policy) {
            (Some(post), _) => features.push(post_to_feature(post)?),
            (None, EmptyCellPolicy::Marker) if result.failed_cells.contains(&index) => {
                features.push(failed_cell_feature(index))
            }
            (None, EmptyCellPolicy::Marker) => features.push(empty_cell_feature(index)),
            (None, EmptyCellPolicy::Omit) => {}
        }
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Cell outlines as Polygon features with their grid position.
pub fn cells_to_feature_collection<'a, I>(cells: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a CellPolygon>,
{
    let features = cells
        .into_iter()
        .map(|cell| {
            let mut properties = JsonObject::new();
            properties.insert("cell".to_string(), JsonValue::from(cell.index));
            properties.insert("col".to_string(), JsonValue::from(cell.col));
            properties.insert("row".to_string(), JsonValue::from(cell.row));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Polygon(cell.polygon().to_rings()))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Reads a post from a Point feature.
///
/// The identity is taken from `id` or the `_id` foreign member when present
/// and hexadecimal.
pub fn post_from_feature(feature: &Feature) -> Result<PostInput> {
    let geometry = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => Point::new(coords[0], coords[1]),
        Some(Value::Point(_)) => {
            return Err(
                ValidationError::new("geometry", "Point must have at least 2 coordinates").into(),
            );
        }
        Some(_) => {
            return Err(ValidationError::new("geometry", "GeoJSON geometry is not a Point").into());
        }
        None => return Err(ValidationError::new("geometry", "is required").into()),
    };
    validate_geographic_point(&geometry)?;

    let properties = match &feature.properties {
        Some(map) => serde_json::from_value(JsonValue::Object(map.clone()))
            .map_err(|e| ValidationError::new("properties", e.to_string()))?,
        None => PostProperties::default(),
    };

    let raw_id = match &feature.id {
        Some(Id::String(s)) => Some(s.as_str()),
        _ => feature
            .foreign_members
            .as_ref()
            .and_then(|m| m.get("_id"))
            .and_then(JsonValue::as_str),
    };
    let id = match raw_id {
        Some(raw) => Some(
            PostId::parse(raw)
                .ok_or_else(|| ValidationError::new("id", format!("not hexadecimal: {:?}", raw)))?,
        ),
        None => None,
    };

    Ok(PostInput {
        id,
        geometry,
        properties,
    })
}

/// Parses a Feature or FeatureCollection of Point features.
pub fn posts_from_geojson(text: &str) -> Result<Vec<PostInput>> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| ValidationError::new("geojson", e.to_string()))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            collection.features.iter().map(post_from_feature).collect()
        }
        GeoJson::Feature(feature) => Ok(vec![post_from_feature(&feature)?]),
        GeoJson::Geometry(_) => Err(ValidationError::new(
            "geojson",
            "expected a Feature or FeatureCollection",
        )
        .into()),
    }
}

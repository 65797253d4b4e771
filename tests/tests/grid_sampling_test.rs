mod common;

use common::{DelayedStore, FailingStore, init_logging, lattice_store, params};
use geosample::prelude::*;
use geosample::{BoundingRectangle, Polygon, partition};
use std::sync::Arc;
use std::time::Duration;

fn grid(long1: &str, lat1: &str, long2: &str, lat2: &str) -> Params {
    params(&[("long1", long1), ("lat1", lat1), ("long2", long2), ("lat2", lat2)])
}

fn with_resolution(mut p: Params, h: &str, v: &str) -> Params {
    p.insert("horizontal_resolution".into(), h.into());
    p.insert("vertical_resolution".into(), v.into());
    p
}

#[tokio::test]
async fn test_default_grid_returns_at_most_twelve() -> anyhow::Result<()> {
    init_logging();
    let engine = Engine::builder()
        .store(lattice_store((8.0, 45.0), (10.0, 55.0), 10))
        .build()?;

    let collection = engine.by_rectangle(&grid("8", "45", "10", "55")).await?;
    assert!(collection.features.len() <= 12);
    assert_eq!(collection.features.len(), 12);

    Ok(())
}

#[tokio::test]
async fn test_grid_over_empty_store() -> anyhow::Result<()> {
    let engine = Engine::builder().store(Arc::new(MemoryStore::new())).build()?;
    let collection = engine.by_rectangle(&grid("8", "45", "10", "55")).await?;
    assert!(collection.features.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_grid_never_emits_null_entries() -> anyhow::Result<()> {
    // a sparse store leaves most cells empty
    let store = Arc::new(MemoryStore::new());
    store.insert(Point::new(14.2, 51.9), PostProperties::new("one"))?;
    store.insert(Point::new(16.7, 51.1), PostProperties::new("two"))?;

    for policy in [EmptyCellPolicy::Omit, EmptyCellPolicy::Marker] {
        let engine = Engine::builder()
            .store(store.clone())
            .config(Config::default().with_empty_cells(policy))
            .build()?;

        let collection = engine.by_rectangle(&grid("14", "52", "17", "51")).await?;
        let value = serde_json::to_value(&collection)?;
        let features = value["features"].as_array().unwrap();

        assert!(features.iter().all(|f| f.is_object()));
        assert!(features.iter().all(|f| f["type"] == "Feature"));
        match policy {
            EmptyCellPolicy::Omit => assert_eq!(features.len(), 2),
            EmptyCellPolicy::Marker => {
                assert_eq!(features.len(), 12);
                let markers = features.iter().filter(|f| f["geometry"].is_null()).count();
                assert_eq!(markers, 10);
            }
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_round_trip_through_grid() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let post = store.insert(
        Point::new(13.0, 37.0),
        PostProperties::new("X").with_user("42", "testuser"),
    )?;
    let engine = Engine::builder().store(store).build()?;

    let collection = engine
        .by_rectangle(&with_resolution(grid("12", "36", "14", "38"), "1", "1"))
        .await?;
    assert_eq!(collection.features.len(), 1);

    let value = serde_json::to_value(&collection.features[0])?;
    assert_eq!(value["_id"], post.id.as_str());
    assert_eq!(
        value["geometry"],
        serde_json::json!({"type": "Point", "coordinates": [13.0, 37.0]})
    );
    assert_eq!(value["properties"]["message"], "X");
    assert_eq!(value["properties"]["user"]["name"], "testuser");

    Ok(())
}

#[tokio::test]
async fn test_post_on_shared_edges_is_sampled_once() -> anyhow::Result<()> {
    // lattice center, outer corners and a shared edge on the outer boundary
    for (x, y) in [(9.0, 50.0), (10.0, 55.0), (8.0, 45.0), (9.0, 45.0), (10.0, 50.0)] {
        let store = Arc::new(MemoryStore::new());
        let post = store.insert(Point::new(x, y), PostProperties::new("corner"))?;

        for policy in [EmptyCellPolicy::Omit, EmptyCellPolicy::Marker] {
            let engine = Engine::builder()
                .store(store.clone())
                .config(Config::default().with_empty_cells(policy))
                .build()?;
            let collection = engine
                .by_rectangle(&with_resolution(grid("8", "45", "10", "55"), "2", "2"))
                .await?;

            let value = serde_json::to_value(&collection)?;
            let ids: Vec<&serde_json::Value> = value["features"]
                .as_array()
                .unwrap()
                .iter()
                .map(|f| &f["_id"])
                .filter(|id| !id.is_null())
                .collect();
            assert_eq!(ids, vec![post.id.as_str()], "post at ({}, {})", x, y);
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_single_cell_grid() -> anyhow::Result<()> {
    let engine = Engine::builder()
        .store(lattice_store((8.0, 45.0), (10.0, 55.0), 4))
        .build()?;

    let p = with_resolution(grid("8", "45", "10", "55"), "1", "1");
    assert!(engine.by_rectangle(&p).await?.features.len() <= 1);

    let cells = engine.grid_cells(&p)?;
    assert_eq!(cells.features.len(), 1);
    let outline = serde_json::to_value(&cells.features[0])?;
    assert_eq!(
        outline["geometry"]["coordinates"],
        serde_json::json!([[[8.0, 45.0], [10.0, 45.0], [10.0, 55.0], [8.0, 55.0], [8.0, 45.0]]])
    );

    Ok(())
}

#[tokio::test]
async fn test_resolution_out_of_range_rejected() -> anyhow::Result<()> {
    let engine = Engine::builder().build()?;

    for (h, v, field) in [
        ("0", "4", "horizontal_resolution"),
        ("11", "4", "horizontal_resolution"),
        ("-2", "4", "horizontal_resolution"),
        ("3", "0", "vertical_resolution"),
        ("3", "11", "vertical_resolution"),
    ] {
        let err = engine
            .by_rectangle(&with_resolution(grid("8", "45", "10", "55"), h, v))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some(field), "resolution {}x{}", h, v);
    }

    Ok(())
}

#[tokio::test]
async fn test_rankings_pick_expected_post() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store.insert(Point::new(0.5, 0.5), PostProperties::new("central").with_relevance(1.0))?;
    store.insert(Point::new(0.1, 0.9), PostProperties::new("relevant").with_relevance(50.0))?;
    store.insert(Point::new(0.9, 0.1), PostProperties::new("newest").with_relevance(2.0))?;

    let p = with_resolution(grid("0", "0", "1", "1"), "1", "1");
    for (ranking, expected) in [
        (CellRanking::Recency, "newest"),
        (CellRanking::Relevance, "relevant"),
        (CellRanking::CellCenter, "central"),
    ] {
        let engine = Engine::builder()
            .store(store.clone())
            .config(Config::default().with_ranking(ranking))
            .build()?;
        let collection = engine.by_rectangle(&p).await?;
        assert_eq!(
            collection.features[0].property("message").unwrap(),
            expected,
            "{:?}",
            ranking
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_out_of_order_completion_keeps_alignment() -> anyhow::Result<()> {
    init_logging();
    let inner = lattice_store((0.0, 0.0), (4.0, 4.0), 8);

    // western cells answer last
    let store = Arc::new(DelayedStore {
        inner,
        delay: Box::new(|polygon: &Polygon| {
            let min_x = polygon.bounds().map(|b| b.0).unwrap_or(0.0);
            Duration::from_millis(((4.0 - min_x) * 10.0) as u64)
        }),
    });
    let engine = Engine::builder().store(store).build()?;

    let request = GridRequest {
        rect: BoundingRectangle::new(0.0, 0.0, 4.0, 4.0),
        resolution: GridResolution::new(4, 4).unwrap(),
        limit: None,
    };
    let result = engine.sample_grid(&request).await?;
    let cells: Vec<_> = partition(&request.rect, request.resolution).collect();

    assert_eq!(result.cells.len(), 16);
    for (cell, post) in cells.iter().zip(&result.cells) {
        let post = post.as_ref().expect("every cell holds lattice posts");
        assert!(
            cell.rect.contains_point(&post.geometry),
            "cell {} got post at {:?}",
            cell.index,
            post.geometry
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_fail_fast_aborts_grid_query() -> anyhow::Result<()> {
    let store = Arc::new(FailingStore {
        inner: lattice_store((0.0, 0.0), (4.0, 4.0), 4),
        fail_west_of: 1.0,
    });
    let engine = Engine::builder().store(store).build()?;

    let err = engine
        .by_rectangle(&with_resolution(grid("0", "0", "4", "4"), "4", "2"))
        .await
        .unwrap_err();
    assert!(matches!(err, GeoSampleError::Store(_)));

    Ok(())
}

#[tokio::test]
async fn test_partial_policy_reports_failed_cells() -> anyhow::Result<()> {
    init_logging();
    let store = Arc::new(FailingStore {
        inner: lattice_store((0.0, 0.0), (4.0, 4.0), 4),
        fail_west_of: 1.0,
    });
    let engine = Engine::builder()
        .store(store)
        .config(Config::default().with_failure_policy(FailurePolicy::Partial))
        .build()?;

    let p = with_resolution(grid("0", "0", "4", "4"), "4", "2");
    let collection = engine.by_rectangle(&p).await?;

    // column 0 holds cells 0 and 1
    assert_eq!(collection.features.len(), 6);
    let members = collection.foreign_members.unwrap();
    assert_eq!(members["failed_cells"], serde_json::json!([0, 1]));

    Ok(())
}

#[tokio::test]
async fn test_partial_policy_flags_failed_markers() -> anyhow::Result<()> {
    let store = Arc::new(FailingStore {
        inner: lattice_store((0.0, 0.0), (4.0, 4.0), 4),
        fail_west_of: 1.0,
    });
    let engine = Engine::builder()
        .store(store)
        .config(
            Config::default()
                .with_failure_policy(FailurePolicy::Partial)
                .with_empty_cells(EmptyCellPolicy::Marker),
        )
        .build()?;

    let collection = engine
        .by_rectangle(&with_resolution(grid("0", "0", "4", "4"), "4", "2"))
        .await?;
    let value = serde_json::to_value(&collection)?;
    let features = value["features"].as_array().unwrap();

    assert_eq!(features.len(), 8);
    for index in [0, 1] {
        assert_eq!(
            features[index]["properties"],
            serde_json::json!({"cell": index, "failed": true})
        );
    }
    assert!(features.iter().all(|f| f["properties"]["empty"].is_null()));

    Ok(())
}

#[tokio::test]
async fn test_slow_store_times_out() -> anyhow::Result<()> {
    let store = Arc::new(DelayedStore {
        inner: lattice_store((0.0, 0.0), (1.0, 1.0), 2),
        delay: Box::new(|_: &Polygon| Duration::from_millis(500)),
    });
    let timeout = Duration::from_millis(50);
    let engine = Engine::builder()
        .store(store)
        .config(Config::default().with_query_timeout(timeout))
        .build()?;

    let err = engine
        .by_rectangle(&grid("0", "0", "1", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, GeoSampleError::Timeout(t) if t == timeout));

    Ok(())
}

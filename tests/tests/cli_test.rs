use clap::Parser;
use geosample::MemoryStore;
use geosample_cli::{Args, load_posts, run};
use std::io::Write;

fn args(argv: &[&str]) -> Args {
    Args::parse_from(std::iter::once("geosample").chain(argv.iter().copied()))
}

fn data_file() -> anyhow::Result<tempfile::NamedTempFile> {
    let posts = serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "c0ffee",
                "geometry": {"type": "Point", "coordinates": [13.0, 37.0]},
                "properties": {"message": "X", "user": {"_id": "42", "name": "testuser"}}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [9.0, 50.2]},
                "properties": {"message": "Y", "relevance": 7}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [8.2, 45.4]},
                "properties": {"message": "Z"}
            }
        ]
    });

    let mut file = tempfile::Builder::new().suffix(".geojson").tempfile()?;
    write!(file, "{}", posts)?;
    Ok(file)
}

#[test]
fn test_load_posts_keeps_ids() -> anyhow::Result<()> {
    let file = data_file()?;
    let store = MemoryStore::new();
    assert_eq!(load_posts(&store, file.path())?, 3);
    assert_eq!(store.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_cli_by_rectangle() -> anyhow::Result<()> {
    let file = data_file()?;
    let path = file.path().to_str().unwrap();

    let output = run(args(&[
        "--data", path, "by-rectangle", "--long1", "8", "--lat1", "45", "--long2", "10",
        "--lat2", "55",
    ]))
    .await?;
    let value: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"].as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_cli_by_point_round_trip() -> anyhow::Result<()> {
    let file = data_file()?;
    let path = file.path().to_str().unwrap();

    let output = run(args(&[
        "--data", path, "by-point", "--long", "13", "--lat", "37", "--distance", "1000",
    ]))
    .await?;
    let value: serde_json::Value = serde_json::from_str(&output)?;
    let feature = &value["features"][0];
    assert_eq!(feature["_id"], "c0ffee");
    assert_eq!(feature["geometry"]["coordinates"], serde_json::json!([13.0, 37.0]));
    assert_eq!(feature["properties"]["message"], "X");
    assert_eq!(feature["properties"]["user"]["name"], "testuser");

    Ok(())
}

#[tokio::test]
async fn test_cli_config_file() -> anyhow::Result<()> {
    let file = data_file()?;
    let path = file.path().to_str().unwrap();

    let mut config = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(config, "empty_cells = \"marker\"")?;
    let config_path = config.path().to_str().unwrap();

    let output = run(args(&[
        "--data",
        path,
        "--config",
        config_path,
        "by-rectangle",
        "--long1",
        "8",
        "--lat1",
        "45",
        "--long2",
        "10",
        "--lat2",
        "55",
    ]))
    .await?;
    let value: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(value["features"].as_array().unwrap().len(), 12);

    Ok(())
}

#[tokio::test]
async fn test_cli_get_unknown_post() -> anyhow::Result<()> {
    let err = run(args(&["get", "deadbeef"])).await.unwrap_err();
    let err = err.downcast::<geosample::GeoSampleError>()?;
    assert!(matches!(err, geosample::GeoSampleError::NotFound(_)));
    Ok(())
}

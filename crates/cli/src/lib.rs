//! Command-line front end: load posts from GeoJSON into an in-memory store
//! and run one query against them.

use anyhow::Context;
use clap::{Parser, Subcommand};
use geosample::geojson::posts_from_geojson;
use geosample::{Engine, MemoryStore, Params};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// GeoJSON Feature or FeatureCollection of Point posts to load
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Engine configuration, JSON or TOML by extension
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Query modes. Values are passed through as raw strings so the engine
/// reports invalid parameters by field name.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// One representative post per cell of a grid over a rectangle
    ByRectangle {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,
    },
    /// Outlines of the cells a grid query would sample
    Cells {
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Posts nearest to a point, within a distance in meters
    ByPoint {
        #[arg(long, allow_hyphen_values = true)]
        long: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        distance: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,
    },
    /// Most recent posts
    List {
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<String>,
    },
    /// A single post by hexadecimal id
    Get { id: String },
}

#[derive(clap::Args, Debug)]
pub struct GridArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub long1: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lat1: String,
    #[arg(long, allow_hyphen_values = true)]
    pub long2: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lat2: String,
    #[arg(long, allow_hyphen_values = true)]
    pub horizontal_resolution: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub vertical_resolution: Option<String>,
}

impl GridArgs {
    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("long1".to_string(), self.long1.clone());
        params.insert("lat1".to_string(), self.lat1.clone());
        params.insert("long2".to_string(), self.long2.clone());
        params.insert("lat2".to_string(), self.lat2.clone());
        insert_opt(&mut params, "horizontal_resolution", &self.horizontal_resolution);
        insert_opt(&mut params, "vertical_resolution", &self.vertical_resolution);
        params
    }
}

fn insert_opt(params: &mut Params, field: &str, value: &Option<String>) {
    if let Some(value) = value {
        params.insert(field.to_string(), value.clone());
    }
}

/// Insert every post of a GeoJSON file, keeping ids that are present.
pub fn load_posts(store: &MemoryStore, path: &Path) -> anyhow::Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let posts =
        posts_from_geojson(&text).with_context(|| format!("invalid posts in {}", path.display()))?;

    let count = posts.len();
    for post in posts {
        match post.id {
            Some(id) => store.insert_with_id(id, post.geometry, post.properties)?,
            None => store.insert(post.geometry, post.properties)?,
        };
    }

    info!("Loaded {} posts from {}", count, path.display());
    Ok(count)
}

/// Run the selected query and return the JSON output.
pub async fn run(args: Args) -> anyhow::Result<String> {
    let store = Arc::new(MemoryStore::new());
    if let Some(path) = &args.data {
        load_posts(&store, path)?;
    } else {
        info!("No data file given, querying an empty store");
    }

    let mut builder = Engine::builder().store(store);
    if let Some(path) = &args.config {
        debug!("Loading configuration from {}", path.display());
        builder = builder.config_file(path)?;
    }
    let engine = builder.build()?;

    let value = match &args.command {
        Command::ByRectangle { grid, limit } => {
            let mut params = grid.params();
            insert_opt(&mut params, "limit", limit);
            serde_json::to_value(engine.by_rectangle(&params).await?)?
        }
        Command::Cells { grid } => serde_json::to_value(engine.grid_cells(&grid.params())?)?,
        Command::ByPoint {
            long,
            lat,
            distance,
            limit,
        } => {
            let mut params = Params::new();
            params.insert("long".to_string(), long.clone());
            params.insert("lat".to_string(), lat.clone());
            insert_opt(&mut params, "distance", distance);
            insert_opt(&mut params, "limit", limit);
            serde_json::to_value(engine.by_point(&params).await?)?
        }
        Command::List { limit } => {
            let mut params = Params::new();
            insert_opt(&mut params, "limit", limit);
            serde_json::to_value(engine.list(&params).await?)?
        }
        Command::Get { id } => serde_json::to_value(engine.get_post(id).await?)?,
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(output)
}

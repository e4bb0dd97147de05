//! Ranks zones from three GeoJSON files and prints the top of the ranking.
//!
//! Run with the bundled sample data:
//!
//! ```shell
//! cargo run --example rank_zones
//! ```
//!
//! or with your own files and, optionally, a JSON configuration:
//!
//! ```shell
//! cargo run --example rank_zones -- trees.geojson zones.geojson roads.geojson config.json
//! ```
//!
//! Files without a `crs` member are assumed to be in WGS84, as GeoJSON requires.

use anyhow::{anyhow, Result};
use canopy::canopy_types::geo::Crs;
use canopy::config::ScoringConfig;
use canopy::pipeline::Pipeline;
use canopy::source::GeoJsonSource;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (trees, zones, roads, config) = match args.as_slice() {
        [] => {
            let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("examples/data");
            (
                data.join("trees.geojson"),
                data.join("zones.geojson"),
                data.join("roads.geojson"),
                None,
            )
        }
        [trees, zones, roads, rest @ ..] if rest.len() <= 1 => (
            PathBuf::from(trees),
            PathBuf::from(zones),
            PathBuf::from(roads),
            rest.first().map(PathBuf::from),
        ),
        _ => {
            return Err(anyhow!(
                "expected arguments: <trees.geojson> <zones.geojson> <roads.geojson> [config.json]"
            ))
        }
    };

    let config = match config {
        Some(path) => ScoringConfig::from_file(path)?,
        None => ScoringConfig::default(),
    };

    let source = GeoJsonSource::new(trees, zones, roads).with_fallback_crs(Crs::WGS84);
    let report = Pipeline::new(config)?.run_source(&source)?;

    println!("{report}");

    Ok(())
}

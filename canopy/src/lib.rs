//! Canopy ranks management zones by how many trees they hold and how close they are to a road.
//!
//! A run takes three layers: tree locations, zone polygons and road lines. The layers are
//!
//! * [harmonized](harmonize) into one planar coordinate system,
//! * aggregated per zone: trees inside the zone are [counted](count) and the distance to the
//!   [nearest road](distance) is measured, both in parallel,
//! * [scored](score) with `tree_count / (distance + ε)` and ranked from the highest score down.
//!
//! ```no_run
//! use canopy::config::ScoringConfig;
//! use canopy::layer::{Layer, Layers, Road, Tree, Zone};
//! use canopy::pipeline::Pipeline;
//! use canopy::canopy_types::geo::Crs;
//! use geo_types::{line_string, point, polygon};
//!
//! let crs = Crs::utm(35, true).unwrap();
//! let layers = Layers::new(
//!     Layer::new(vec![Tree::new("t1", point!(x: 500_010.0, y: 9_600_010.0))], crs.clone()),
//!     Layer::new(
//!         vec![Zone::new("A", polygon![
//!             (x: 500_000.0, y: 9_600_000.0),
//!             (x: 500_100.0, y: 9_600_000.0),
//!             (x: 500_100.0, y: 9_600_100.0),
//!         ])],
//!         crs.clone(),
//!     ),
//!     Layer::new(
//!         vec![Road::new("R1", line_string![(x: 500_000.0, y: 9_599_950.0), (x: 500_200.0, y: 9_599_950.0)])],
//!         crs,
//!     ),
//! );
//!
//! let report = Pipeline::new(ScoringConfig::default()).unwrap().run(layers).unwrap();
//! println!("{report}");
//! ```
//!
//! Features with malformed geometry do not stop the run. They are left out and listed in
//! [`Report::warnings`](pipeline::Report::warnings).

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod config;
pub mod count;
pub mod distance;
pub mod engine;
pub mod error;
pub mod harmonize;
pub mod layer;
pub mod pipeline;
mod report;
pub mod score;
pub mod source;

pub use canopy_types;
pub use report::ZoneTable;

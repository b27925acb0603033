//! # Velo - Cycling Route Planner
//!
//! Route planning for bicycles over a compact, memory-mapped road graph of
//! Switzerland, with elevation profiles along the planned routes.
//!
//! ## Features
//!
//! - **Fast**: The graph is memory-mapped and read in place, nothing is parsed
//!   at load time
//! - **Compact**: Fixed-point coordinates and delta-encoded elevation samples
//! - **Cycling-aware**: Edge costs follow OSM attributes (cycleways, one-way
//!   streets, surfaces)
//! - **Cached**: Legs between waypoints are kept in a bounded cache
//!
//! ## Quick Start
//!
//! ```ignore
//! use velo::{Point, RoutePlanner};
//!
//! let planner = RoutePlanner::builder("/data/velo").build()?;
//!
//! let from = planner.node_closest_to(&Point::from_wgs84(7.4474, 46.9480)?).unwrap();
//! let to = planner.node_closest_to(&Point::from_wgs84(7.5886, 47.5596)?).unwrap();
//!
//! let planned = planner.plan(&[from, to]).expect("no route");
//! println!("Length: {:.1} km", planned.route().length() / 1000.0);
//! println!("Ascent: {:.0} m", planned.profile().total_ascent());
//! ```
//!
//! ## Graph Format
//!
//! A graph is a directory of six big-endian binary tables:
//!
//! - `nodes.bin`: node coordinates (CH1903+ LV95, 1/16 m) and out-edges
//! - `edges.bin`: target, length, elevation gain and attributes of each edge
//! - `profile_ids.bin`, `elevations.bin`: elevation samples every 2 m
//! - `sectors.bin`: 128×128 grid of node ranges for nearest-node queries
//! - `attributes.bin`: 64-bit OSM attribute sets shared by edges
//!
//! See [`graph`] for the exact layout.

pub mod attribute;
pub mod ch1903;
pub mod error;
pub mod fixed_point;
pub mod graph;
pub mod math;
pub mod planner;
pub mod point;
pub mod routing;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use attribute::{Attribute, AttributeSet};
pub use error::{Result, VeloError};
pub use graph::{EdgeId, Graph, NodeId};
pub use planner::{CacheStats, CostModel, PlannedRoute, RoutePlanner, RoutePlannerBuilder};
pub use point::Point;
pub use routing::{
    elevation_profile, CityBikeCost, CostFunction, Edge, ElevationProfile, MultiRoute, Route,
    RouteComputer, RoutePoint, SingleRoute, UnitCost,
};

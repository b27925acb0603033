use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use velo::{CostModel, NodeId, Point, RoutePlanner, RoutePlannerBuilder};

pub mod info;
pub mod nearest;
pub mod route;

/// Planner settings gathered from the command line and environment.
pub struct PlannerOptions {
    pub graph_dir: Option<PathBuf>,
    pub cache_size: u64,
    pub profile_step: f64,
    pub search_distance: f64,
    pub cost_model: CostModel,
}

impl PlannerOptions {
    pub fn build(self) -> Result<RoutePlanner> {
        let builder = match self.graph_dir {
            Some(dir) => RoutePlannerBuilder::new(dir),
            None => RoutePlannerBuilder::from_env().context(
                "VELO_GRAPH_DIR environment variable not set. Use --graph-dir or set VELO_GRAPH_DIR",
            )?,
        };

        builder
            .cache_size(self.cache_size)
            .max_step_length(self.profile_step)
            .search_distance(self.search_distance)
            .cost_model(self.cost_model)
            .build()
            .context("Failed to create route planner")
    }
}

/// A WGS84 coordinate written as `lat,lon` in decimal degrees.
#[derive(Debug, Clone, Copy)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn to_point(self) -> Result<Point> {
        Point::from_wgs84(self.lon, self.lat)
            .with_context(|| format!("{self} is outside the area covered by the graph"))
    }

    /// The node closest to this coordinate.
    pub fn snap(self, planner: &RoutePlanner) -> Result<NodeId> {
        let point = self.to_point()?;
        planner
            .node_closest_to(&point)
            .with_context(|| format!("No graph node near {self}"))
    }
}

impl FromStr for LatLon {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lon\", got \"{s}\""))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate \"{v}\": {e}"))
        };
        Ok(LatLon {
            lat: parse(lat)?,
            lon: parse(lon)?,
        })
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lat_lon() {
        let coord: LatLon = "46.948, 7.4474".parse().unwrap();
        assert_eq!(coord.lat, 46.948);
        assert_eq!(coord.lon, 7.4474);

        assert!("46.948".parse::<LatLon>().is_err());
        assert!("north,7.4".parse::<LatLon>().is_err());
    }

    #[test]
    fn test_to_point() {
        let bern = LatLon {
            lat: 46.948,
            lon: 7.4474,
        };
        assert!(bern.to_point().is_ok());

        let paris = LatLon {
            lat: 48.8566,
            lon: 2.3522,
        };
        assert!(paris.to_point().is_err());
    }
}

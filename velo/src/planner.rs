//! Multi-waypoint route planning with leg caching.
//!
//! [`RoutePlanner`] owns a loaded [`Graph`], snaps points to graph nodes,
//! routes through an ordered list of waypoints and computes the elevation
//! profile of the result. Legs are cached by `(from, to)` node pair, so
//! moving one waypoint only recomputes the legs next to it.
//!
//! ```ignore
//! use velo::RoutePlanner;
//!
//! let planner = RoutePlanner::builder("/data/velo")
//!     .cache_size(128)
//!     .build()?;
//!
//! let planned = planner.plan(&[start, via, end]).expect("no route");
//! println!("{:.0} m, +{:.0} m", planned.route().length(), planned.profile().total_ascent());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;

use crate::error::{Result, VeloError};
use crate::graph::{Graph, NodeId};
use crate::point::Point;
use crate::routing::{
    elevation_profile, CityBikeCost, ElevationProfile, MultiRoute, Route, RouteComputer,
    SingleRoute, UnitCost,
};

pub const GRAPH_DIR_VAR: &str = "VELO_GRAPH_DIR";
pub const CACHE_SIZE_VAR: &str = "VELO_CACHE_SIZE";
pub const PROFILE_STEP_VAR: &str = "VELO_PROFILE_STEP";
pub const SEARCH_DISTANCE_VAR: &str = "VELO_SEARCH_DISTANCE";
pub const COST_MODEL_VAR: &str = "VELO_COST_MODEL";

const DEFAULT_CACHE_SIZE: u64 = 64;
const DEFAULT_MAX_STEP_LENGTH: f64 = 5.0;
const DEFAULT_SEARCH_DISTANCE: f64 = 500.0;

/// Statistics about leg cache usage.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of legs currently cached.
    pub entry_count: u64,
    /// Number of legs served from the cache.
    pub hit_count: u64,
    /// Number of legs that had to be searched.
    pub miss_count: u64,
}

impl CacheStats {
    /// Fraction of leg requests served from the cache (0.0 to 1.0).
    ///
    /// Returns 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// Which cost function weighs the edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CostModel {
    /// Shortest route by length.
    Shortest,
    /// Attribute-aware routing for city bikes.
    #[default]
    CityBike,
}

impl FromStr for CostModel {
    type Err = VeloError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "shortest" => Ok(CostModel::Shortest),
            "city-bike" | "citybike" => Ok(CostModel::CityBike),
            _ => Err(VeloError::UnknownCostModel {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostModel::Shortest => f.write_str("shortest"),
            CostModel::CityBike => f.write_str("city-bike"),
        }
    }
}

/// A route through a list of waypoints, with its elevation profile.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    route: Route,
    profile: ElevationProfile,
    waypoints: Vec<NodeId>,
}

impl PlannedRoute {
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn profile(&self) -> &ElevationProfile {
        &self.profile
    }

    /// The waypoint nodes the route was planned through, duplicates
    /// included.
    pub fn waypoints(&self) -> &[NodeId] {
        &self.waypoints
    }

    /// Index of the waypoint pair whose leg contains `position`.
    ///
    /// Consecutive identical waypoints produce no leg; they are counted here
    /// so the result indexes [`waypoints`](Self::waypoints) directly.
    pub fn index_of_non_empty_segment_at(&self, position: f64) -> usize {
        let mut index = self.route.index_of_segment_at(position);
        let mut i = 0;
        while i <= index && i + 1 < self.waypoints.len() {
            if self.waypoints[i] == self.waypoints[i + 1] {
                index += 1;
            }
            i += 1;
        }
        index
    }
}

/// Plans routes on one graph, caching legs between waypoint pairs.
pub struct RoutePlanner {
    graph: Graph,
    cost_model: CostModel,
    max_step_length: f64,
    search_distance: f64,
    /// Legs keyed by `(from, to)`; `None` marks an unreachable destination.
    leg_cache: Cache<(NodeId, NodeId), Option<SingleRoute>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl RoutePlanner {
    /// A planner over an already loaded graph, with default settings.
    pub fn new(graph: Graph) -> Self {
        RoutePlannerBuilder::default().assemble(graph)
    }

    /// Create a builder loading the graph from `graph_dir`.
    pub fn builder<P: AsRef<Path>>(graph_dir: P) -> RoutePlannerBuilder {
        RoutePlannerBuilder::new(graph_dir)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    /// The graph node closest to `point`, within the configured search
    /// distance.
    pub fn node_closest_to(&self, point: &Point) -> Option<NodeId> {
        self.graph.node_closest_to(point, self.search_distance)
    }

    /// The best route from `from` to `to`, from the cache if possible.
    ///
    /// # Panics
    ///
    /// Panics if both nodes are the same.
    pub fn leg(&self, from: NodeId, to: NodeId) -> Option<SingleRoute> {
        let key = (from, to);
        if let Some(leg) = self.leg_cache.get(&key) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(from, to, "Leg cache hit");
            return leg;
        }
        self.miss_count.fetch_add(1, Ordering::Relaxed);

        let leg = match self.cost_model {
            CostModel::Shortest => {
                RouteComputer::new(&self.graph, UnitCost).best_route_between(from, to)
            }
            CostModel::CityBike => {
                RouteComputer::new(&self.graph, CityBikeCost::new(&self.graph))
                    .best_route_between(from, to)
            }
        };
        self.leg_cache.insert(key, leg.clone());
        leg
    }

    /// Plan a route through `waypoints`, in order.
    ///
    /// Consecutive identical waypoints are skipped. Returns `None` if fewer
    /// than two distinct consecutive waypoints are given or if any leg is
    /// unreachable.
    pub fn plan(&self, waypoints: &[NodeId]) -> Option<PlannedRoute> {
        let mut legs = Vec::new();
        for pair in waypoints.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from == to {
                continue;
            }
            legs.push(Route::from(self.leg(from, to)?));
        }
        if legs.is_empty() {
            return None;
        }

        let route = Route::from(MultiRoute::new(legs));
        if route.length() <= 0.0 {
            tracing::warn!(?waypoints, "Planned route has zero length");
            return None;
        }
        let profile = elevation_profile(&route, self.max_step_length);
        Some(PlannedRoute {
            route,
            profile,
            waypoints: waypoints.to_vec(),
        })
    }

    /// Get leg cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.leg_cache.entry_count(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}

/// Builder for [`RoutePlanner`].
///
/// ```ignore
/// use velo::{CostModel, RoutePlannerBuilder};
///
/// let planner = RoutePlannerBuilder::new("/data/velo")
///     .cost_model(CostModel::Shortest)
///     .max_step_length(10.0)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RoutePlannerBuilder {
    graph_dir: Option<PathBuf>,
    cache_size: u64,
    max_step_length: f64,
    search_distance: f64,
    cost_model: CostModel,
}

impl Default for RoutePlannerBuilder {
    fn default() -> Self {
        Self {
            graph_dir: None,
            cache_size: DEFAULT_CACHE_SIZE,
            max_step_length: DEFAULT_MAX_STEP_LENGTH,
            search_distance: DEFAULT_SEARCH_DISTANCE,
            cost_model: CostModel::default(),
        }
    }
}

impl RoutePlannerBuilder {
    /// Create a new builder loading the graph from `graph_dir`.
    pub fn new<P: AsRef<Path>>(graph_dir: P) -> Self {
        Self {
            graph_dir: Some(graph_dir.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `VELO_GRAPH_DIR` | Directory holding the graph tables | Required |
    /// | `VELO_CACHE_SIZE` | Maximum legs in cache | 64 |
    /// | `VELO_PROFILE_STEP` | Maximum profile step, meters | 5 |
    /// | `VELO_SEARCH_DISTANCE` | Waypoint snapping radius, meters | 500 |
    /// | `VELO_COST_MODEL` | `shortest` or `city-bike` | `city-bike` |
    ///
    /// Unparsable numeric values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::MissingConfig`] if `VELO_GRAPH_DIR` is not set,
    /// [`VeloError::UnknownCostModel`] if `VELO_COST_MODEL` names no model,
    /// or [`VeloError::InvalidConfig`] if the profile step or search distance
    /// is out of range.
    pub fn from_env() -> Result<Self> {
        let graph_dir = std::env::var(GRAPH_DIR_VAR)
            .map_err(|_| VeloError::MissingConfig { name: GRAPH_DIR_VAR })?;

        let mut builder = Self::new(graph_dir);
        if let Some(size) = env_parsed(CACHE_SIZE_VAR) {
            builder.cache_size = size;
        }
        if let Some(step) = env_parsed(PROFILE_STEP_VAR) {
            builder.max_step_length = step;
        }
        if let Some(distance) = env_parsed(SEARCH_DISTANCE_VAR) {
            builder.search_distance = distance;
        }
        if let Ok(model) = std::env::var(COST_MODEL_VAR) {
            builder.cost_model = model.parse()?;
        }
        builder.validate()?;
        Ok(builder)
    }

    /// Set the graph directory.
    pub fn graph_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.graph_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the maximum number of legs to keep in cache.
    ///
    /// Default is 64 legs.
    pub fn cache_size(mut self, size: u64) -> Self {
        self.cache_size = size;
        self
    }

    /// Set the maximum distance between two elevation profile samples.
    ///
    /// Default is 5 m.
    pub fn max_step_length(mut self, meters: f64) -> Self {
        self.max_step_length = meters;
        self
    }

    /// Set how far from a point its closest node may be.
    ///
    /// Default is 500 m.
    pub fn search_distance(mut self, meters: f64) -> Self {
        self.search_distance = meters;
        self
    }

    pub fn cost_model(mut self, cost_model: CostModel) -> Self {
        self.cost_model = cost_model;
        self
    }

    /// Load the graph and build the [`RoutePlanner`].
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::MissingConfig`] if no graph directory was set,
    /// [`VeloError::InvalidConfig`] if a setting is out of range, or any error
    /// from [`Graph::load_from`].
    pub fn build(self) -> Result<RoutePlanner> {
        self.validate()?;
        let dir = self
            .graph_dir
            .clone()
            .ok_or(VeloError::MissingConfig { name: GRAPH_DIR_VAR })?;
        let graph = Graph::load_from(dir)?;
        Ok(self.assemble(graph))
    }

    /// Build the [`RoutePlanner`] over an already loaded graph, ignoring the
    /// graph directory.
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::InvalidConfig`] if the profile step is not a
    /// positive finite length, or the search distance is negative or NaN.
    pub fn build_with(self, graph: Graph) -> Result<RoutePlanner> {
        self.validate()?;
        Ok(self.assemble(graph))
    }

    fn validate(&self) -> Result<()> {
        if !(self.max_step_length > 0.0 && self.max_step_length.is_finite()) {
            return Err(VeloError::InvalidConfig {
                name: PROFILE_STEP_VAR,
                value: self.max_step_length,
            });
        }
        if self.search_distance.is_nan() || self.search_distance < 0.0 {
            return Err(VeloError::InvalidConfig {
                name: SEARCH_DISTANCE_VAR,
                value: self.search_distance,
            });
        }
        Ok(())
    }

    fn assemble(self, graph: Graph) -> RoutePlanner {
        RoutePlanner {
            graph,
            cost_model: self.cost_model,
            max_step_length: self.max_step_length,
            search_distance: self.search_distance,
            leg_cache: Cache::builder().max_capacity(self.cache_size).build(),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }
}

fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

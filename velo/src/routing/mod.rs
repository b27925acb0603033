//! Route search and the route model.
//!
//! [`RouteComputer`] finds the best chain of edges between two nodes for a
//! given [`CostFunction`]. The resulting [`SingleRoute`]s can be composed
//! into a [`MultiRoute`], queried by position along the route, and resampled
//! into an [`ElevationProfile`].

pub mod computer;
pub mod cost;
pub mod edge;
pub mod profile;
pub mod route;
pub mod route_point;

pub use computer::RouteComputer;
pub use cost::{CityBikeCost, CostFunction, UnitCost};
pub use edge::Edge;
pub use profile::{elevation_profile, ElevationProfile};
pub use route::{MultiRoute, Route, SingleRoute};
pub use route_point::RoutePoint;

//! GeoJSON export of routes.
//!
//! Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use velo::geojson::planned_route_to_feature;
//!
//! let planned = planner.plan(&[start, end]).expect("no route");
//! let feature = planned_route_to_feature(&planned);
//! println!("{}", feature);
//! // {"type":"Feature","geometry":{"type":"LineString","coordinates":[[7.44,46.95,541.2],...]},...}
//! ```

use geojson::{Feature, Geometry, Value as GeoJsonValue};

use crate::planner::PlannedRoute;
use crate::routing::{ElevationProfile, Route};

/// Convert a route into a `LineString` through its points.
///
/// Coordinates are in GeoJSON order, `[longitude, latitude]` in degrees. If
/// a profile is given, each coordinate gets the profile elevation at that
/// point as a third value.
pub fn route_to_geometry(route: &Route, profile: Option<&ElevationProfile>) -> Geometry {
    let mut position = 0.0;
    let mut positions = Vec::with_capacity(route.points().len());
    positions.push(position);
    for edge in route.edges() {
        position += edge.length;
        positions.push(position);
    }

    let coords = route
        .points()
        .iter()
        .zip(positions)
        .map(|(point, position)| {
            let mut coord = vec![point.lon().to_degrees(), point.lat().to_degrees()];
            if let Some(profile) = profile {
                coord.push(profile.elevation_at(position));
            }
            coord
        })
        .collect();

    Geometry::new(GeoJsonValue::LineString(coords))
}

/// Convert a planned route into a `Feature` with elevation coordinates and
/// summary properties.
///
/// Properties: `length`, `ascent`, `descent`, `min_elevation`,
/// `max_elevation` (all in meters).
pub fn planned_route_to_feature(planned: &PlannedRoute) -> Feature {
    let profile = planned.profile();
    let mut feature = Feature {
        bbox: None,
        geometry: Some(route_to_geometry(planned.route(), Some(profile))),
        id: None,
        properties: None,
        foreign_members: None,
    };
    feature.set_property("length", planned.route().length());
    feature.set_property("ascent", profile.total_ascent());
    feature.set_property("descent", profile.total_descent());
    feature.set_property("min_elevation", profile.min_elevation());
    feature.set_property("max_elevation", profile.max_elevation());
    feature
}

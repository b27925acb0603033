//! Edges of a route, resolved from the graph.

use crate::graph::{EdgeId, EdgeProfile, Graph, NodeId};
use crate::math::{interpolate, projection_length};
use crate::point::Point;

/// One edge of a route, with its endpoints and elevation profile resolved.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
    pub from_point: Point,
    pub to_point: Point,
    /// Length in meters.
    pub length: f64,
    pub profile: EdgeProfile,
}

impl Edge {
    /// The edge `edge_id` of `graph`, going from `from_node_id` to
    /// `to_node_id`.
    pub fn of(graph: &Graph, edge_id: EdgeId, from_node_id: NodeId, to_node_id: NodeId) -> Self {
        Self {
            from_node_id,
            to_node_id,
            from_point: graph.node_point(from_node_id),
            to_point: graph.node_point(to_node_id),
            length: graph.edge_length(edge_id),
            profile: graph.edge_profile(edge_id),
        }
    }

    /// Position along the edge of the projection of `point` onto the line
    /// through its endpoints. May be negative or exceed the length.
    pub fn position_closest_to(&self, point: &Point) -> f64 {
        projection_length(
            self.from_point.e(),
            self.from_point.n(),
            self.to_point.e(),
            self.to_point.n(),
            point.e(),
            point.n(),
        )
    }

    /// The point at `position` meters from the source, on the line through
    /// the endpoints.
    pub fn point_at(&self, position: f64) -> Point {
        if self.length == 0.0 {
            return self.from_point;
        }
        let x = position / self.length;
        Point::from_trusted(
            interpolate(self.from_point.e(), self.to_point.e(), x),
            interpolate(self.from_point.n(), self.to_point.n(), x),
        )
    }

    /// Elevation at `position` meters from the source, or `None` if the edge
    /// has no profile.
    pub fn elevation_at(&self, position: f64) -> Option<f64> {
        self.profile.at(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Sampled;
    use crate::point::bounds;

    fn point(de: f64, dn: f64) -> Point {
        Point::new(bounds::MIN_E + 1_000.0 + de, bounds::MIN_N + 1_000.0 + dn).unwrap()
    }

    fn edge(length: f64, profile: EdgeProfile) -> Edge {
        Edge {
            from_node_id: 0,
            to_node_id: 1,
            from_point: point(0.0, 0.0),
            to_point: point(30.0, 40.0),
            length,
            profile,
        }
    }

    #[test]
    fn test_point_at() {
        let edge = edge(50.0, EdgeProfile::Undefined);
        assert_eq!(edge.point_at(0.0), point(0.0, 0.0));
        assert_eq!(edge.point_at(25.0), point(15.0, 20.0));
        assert_eq!(edge.point_at(50.0), point(30.0, 40.0));
    }

    #[test]
    fn test_zero_length_edge() {
        let edge = edge(0.0, EdgeProfile::Undefined);
        assert_eq!(edge.point_at(10.0), point(0.0, 0.0));
    }

    #[test]
    fn test_position_closest_to() {
        let edge = edge(50.0, EdgeProfile::Undefined);
        assert!((edge.position_closest_to(&point(15.0, 20.0)) - 25.0).abs() < 1e-9);
        assert!((edge.position_closest_to(&point(-30.0, -40.0)) + 50.0).abs() < 1e-9);
        // (-40, 30) is perpendicular to the edge.
        assert!(edge.position_closest_to(&point(-40.0, 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_elevation_at() {
        let sloped = edge(
            50.0,
            EdgeProfile::Sampled(Sampled::new(vec![100.0f32, 110.0], 50.0)),
        );
        assert_eq!(sloped.elevation_at(25.0), Some(105.0));
        assert_eq!(sloped.elevation_at(-5.0), Some(100.0));

        let unsurveyed = edge(50.0, EdgeProfile::Undefined);
        assert_eq!(unsurveyed.elevation_at(25.0), None);
    }
}

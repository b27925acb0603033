//! Routes: chains of edges, possibly composed of sub-routes.
//!
//! Every query takes a position in meters from the start of the route. The
//! position is first clamped into `[0, length]`, then the owning edge or
//! sub-route is found by binary search over the cumulative lengths: a position
//! on a boundary belongs to the following piece, except for the end of the
//! route, which belongs to the last one.

use crate::graph::NodeId;
use crate::math::clamp;
use crate::point::Point;
use crate::routing::edge::Edge;
use crate::routing::route_point::RoutePoint;

/// A route, either a single chain of edges or a composition of routes.
#[derive(Debug, Clone)]
pub enum Route {
    Single(SingleRoute),
    Multi(MultiRoute),
}

impl Route {
    /// Index of the segment containing `position`.
    ///
    /// A [`SingleRoute`] is one segment. A [`MultiRoute`] numbers the
    /// segments of all its descendants in order.
    pub fn index_of_segment_at(&self, position: f64) -> usize {
        match self {
            Route::Single(route) => route.index_of_segment_at(position),
            Route::Multi(route) => route.index_of_segment_at(position),
        }
    }

    /// Length in meters.
    pub fn length(&self) -> f64 {
        match self {
            Route::Single(route) => route.length(),
            Route::Multi(route) => route.length(),
        }
    }

    /// All edges, in route order.
    pub fn edges(&self) -> &[Edge] {
        match self {
            Route::Single(route) => route.edges(),
            Route::Multi(route) => route.edges(),
        }
    }

    /// The points joining consecutive edges, plus both ends of the route.
    pub fn points(&self) -> &[Point] {
        match self {
            Route::Single(route) => route.points(),
            Route::Multi(route) => route.points(),
        }
    }

    pub fn point_at(&self, position: f64) -> Point {
        match self {
            Route::Single(route) => route.point_at(position),
            Route::Multi(route) => route.point_at(position),
        }
    }

    /// Elevation at `position`, or `None` if the edge there has no profile.
    pub fn elevation_at(&self, position: f64) -> Option<f64> {
        match self {
            Route::Single(route) => route.elevation_at(position),
            Route::Multi(route) => route.elevation_at(position),
        }
    }

    /// The endpoint of the edge at `position` nearest to that position.
    pub fn node_closest_to(&self, position: f64) -> NodeId {
        match self {
            Route::Single(route) => route.node_closest_to(position),
            Route::Multi(route) => route.node_closest_to(position),
        }
    }

    /// The point of the route closest to `point`.
    pub fn point_closest_to(&self, point: &Point) -> RoutePoint {
        match self {
            Route::Single(route) => route.point_closest_to(point),
            Route::Multi(route) => route.point_closest_to(point),
        }
    }
}

impl From<SingleRoute> for Route {
    fn from(route: SingleRoute) -> Self {
        Route::Single(route)
    }
}

impl From<MultiRoute> for Route {
    fn from(route: MultiRoute) -> Self {
        Route::Multi(route)
    }
}

/// Index of the piece owning `position` and the position relative to that
/// piece's start. `cumulative` starts at 0 and ends at the total length.
fn locate(cumulative: &[f64], position: f64) -> (usize, f64) {
    let pieces = cumulative.len() - 1;
    let position = clamp(0.0, position, cumulative[pieces]);
    let index = (cumulative.partition_point(|&start| start <= position) - 1).min(pieces - 1);
    (index, position - cumulative[index])
}

fn cumulative_lengths(lengths: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut cumulative = vec![0.0];
    let mut total = 0.0;
    for length in lengths {
        total += length;
        cumulative.push(total);
    }
    cumulative
}

/// A route made of one chain of edges.
#[derive(Debug, Clone)]
pub struct SingleRoute {
    edges: Vec<Edge>,
    points: Vec<Point>,
    cumulative: Vec<f64>,
}

impl SingleRoute {
    /// # Panics
    ///
    /// Panics if `edges` is empty.
    pub fn new(edges: Vec<Edge>) -> Self {
        assert!(!edges.is_empty(), "a route needs at least one edge");

        let cumulative = cumulative_lengths(edges.iter().map(|edge| edge.length));
        let mut points: Vec<Point> = edges.iter().map(|edge| edge.from_point).collect();
        points.push(edges[edges.len() - 1].to_point);

        Self {
            edges,
            points,
            cumulative,
        }
    }

    pub fn index_of_segment_at(&self, _position: f64) -> usize {
        0
    }

    pub fn length(&self) -> f64 {
        self.cumulative[self.edges.len()]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_at(&self, position: f64) -> Point {
        let (index, local) = locate(&self.cumulative, position);
        self.edges[index].point_at(local)
    }

    pub fn elevation_at(&self, position: f64) -> Option<f64> {
        let (index, local) = locate(&self.cumulative, position);
        self.edges[index].elevation_at(local)
    }

    pub fn node_closest_to(&self, position: f64) -> NodeId {
        let (index, local) = locate(&self.cumulative, position);
        let edge = &self.edges[index];
        if local > edge.length / 2.0 {
            edge.to_node_id
        } else {
            edge.from_node_id
        }
    }

    pub fn point_closest_to(&self, point: &Point) -> RoutePoint {
        self.edges
            .iter()
            .zip(&self.cumulative)
            .fold(RoutePoint::NONE, |closest, (edge, &start)| {
                let local = clamp(0.0, edge.position_closest_to(point), edge.length);
                let candidate = edge.point_at(local);
                closest.min_with(candidate, start + local, candidate.distance_to(point))
            })
    }
}

/// A route made of consecutive sub-routes.
#[derive(Debug, Clone)]
pub struct MultiRoute {
    segments: Vec<Route>,
    edges: Vec<Edge>,
    points: Vec<Point>,
    cumulative: Vec<f64>,
}

impl MultiRoute {
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn new(segments: Vec<Route>) -> Self {
        assert!(!segments.is_empty(), "a route needs at least one segment");

        let cumulative = cumulative_lengths(segments.iter().map(Route::length));
        let edges = segments
            .iter()
            .flat_map(|segment| segment.edges().iter().cloned())
            .collect();

        // Each segment starts where the previous one ends.
        let mut points: Vec<Point> = Vec::new();
        for segment in &segments {
            points.pop();
            points.extend_from_slice(segment.points());
        }

        Self {
            segments,
            edges,
            points,
            cumulative,
        }
    }

    pub fn index_of_segment_at(&self, position: f64) -> usize {
        let (index, local) = locate(&self.cumulative, position);
        let passed: usize = self.segments[..index]
            .iter()
            .map(|segment| 1 + segment.index_of_segment_at(segment.length()))
            .sum();
        passed + self.segments[index].index_of_segment_at(local)
    }

    pub fn length(&self) -> f64 {
        self.cumulative[self.segments.len()]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_at(&self, position: f64) -> Point {
        let (index, local) = locate(&self.cumulative, position);
        self.segments[index].point_at(local)
    }

    pub fn elevation_at(&self, position: f64) -> Option<f64> {
        let (index, local) = locate(&self.cumulative, position);
        self.segments[index].elevation_at(local)
    }

    pub fn node_closest_to(&self, position: f64) -> NodeId {
        let (index, local) = locate(&self.cumulative, position);
        self.segments[index].node_closest_to(local)
    }

    pub fn point_closest_to(&self, point: &Point) -> RoutePoint {
        self.segments
            .iter()
            .zip(&self.cumulative)
            .fold(RoutePoint::NONE, |closest, (segment, &start)| {
                closest.min(segment.point_closest_to(point).with_position_shifted_by(start))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeProfile;
    use crate::math::Sampled;
    use crate::point::bounds;

    fn point(de: f64, dn: f64) -> Point {
        Point::new(bounds::MIN_E + 1_000.0 + de, bounds::MIN_N + 1_000.0 + dn).unwrap()
    }

    /// A straight edge between two nodes placed on a 100 m grid, rising by
    /// 10 m.
    fn edge(from: (NodeId, f64, f64), to: (NodeId, f64, f64), base: f32) -> Edge {
        let from_point = point(from.1, from.2);
        let to_point = point(to.1, to.2);
        let length = from_point.distance_to(&to_point);
        Edge {
            from_node_id: from.0,
            to_node_id: to.0,
            from_point,
            to_point,
            length,
            profile: EdgeProfile::Sampled(Sampled::new(vec![base, base + 10.0], length)),
        }
    }

    fn flat(from: (NodeId, f64, f64), to: (NodeId, f64, f64)) -> Edge {
        Edge {
            profile: EdgeProfile::Undefined,
            ..edge(from, to, 0.0)
        }
    }

    /// (0,0) → (100,0) → (100,100)
    fn l_shaped() -> SingleRoute {
        SingleRoute::new(vec![
            edge((0, 0.0, 0.0), (1, 100.0, 0.0), 500.0),
            edge((1, 100.0, 0.0), (2, 100.0, 100.0), 510.0),
        ])
    }

    /// Three single routes heading east, 100 m each, the last one nested.
    fn eastward() -> MultiRoute {
        let leg = |i: u32| {
            let x = 100.0 * i as f64;
            Route::from(SingleRoute::new(vec![
                edge((2 * i, x, 0.0), (2 * i + 1, x + 50.0, 0.0), 0.0),
                edge((2 * i + 1, x + 50.0, 0.0), (2 * i + 2, x + 100.0, 0.0), 10.0),
            ]))
        };
        let tail = MultiRoute::new(vec![leg(2), leg(3)]);
        MultiRoute::new(vec![leg(0), leg(1), Route::from(tail)])
    }

    #[test]
    fn test_single_route_geometry() {
        let route = l_shaped();
        assert_eq!(route.length(), 200.0);
        assert_eq!(route.edges().len(), 2);
        assert_eq!(
            route.points(),
            &[point(0.0, 0.0), point(100.0, 0.0), point(100.0, 100.0)]
        );
        assert_eq!(route.point_at(150.0), point(100.0, 50.0));
        assert_eq!(route.point_at(100.0), point(100.0, 0.0));
    }

    #[test]
    fn test_single_route_clamps_positions() {
        let route = l_shaped();
        assert_eq!(route.point_at(-10.0), point(0.0, 0.0));
        assert_eq!(route.point_at(1e6), point(100.0, 100.0));
        assert_eq!(route.elevation_at(-10.0), Some(500.0));
        assert_eq!(route.elevation_at(1e6), Some(520.0));
    }

    #[test]
    fn test_single_route_elevation() {
        let route = l_shaped();
        assert_eq!(route.elevation_at(50.0), Some(505.0));
        // Boundary belongs to the second edge.
        assert_eq!(route.elevation_at(100.0), Some(510.0));
        assert_eq!(route.elevation_at(150.0), Some(515.0));
    }

    #[test]
    fn test_single_route_undefined_elevation() {
        let route = SingleRoute::new(vec![
            edge((0, 0.0, 0.0), (1, 100.0, 0.0), 500.0),
            flat((1, 100.0, 0.0), (2, 200.0, 0.0)),
        ]);
        assert_eq!(route.elevation_at(75.0), Some(507.5));
        assert_eq!(route.elevation_at(150.0), None);
    }

    #[test]
    fn test_single_route_node_closest_to() {
        let route = l_shaped();
        assert_eq!(route.node_closest_to(0.0), 0);
        assert_eq!(route.node_closest_to(50.0), 0);
        assert_eq!(route.node_closest_to(50.1), 1);
        assert_eq!(route.node_closest_to(149.0), 1);
        assert_eq!(route.node_closest_to(151.0), 2);
        assert_eq!(route.node_closest_to(500.0), 2);
    }

    #[test]
    fn test_single_route_point_closest_to() {
        let route = l_shaped();

        let closest = route.point_closest_to(&point(40.0, -30.0));
        assert_eq!(closest.point, Some(point(40.0, 0.0)));
        assert_eq!(closest.position, 40.0);
        assert_eq!(closest.distance_to_reference, 30.0);

        let closest = route.point_closest_to(&point(130.0, 60.0));
        assert_eq!(closest.point, Some(point(100.0, 60.0)));
        assert_eq!(closest.position, 160.0);
        assert_eq!(closest.distance_to_reference, 30.0);

        // Beyond the end, the projection is clamped to the last point.
        let closest = route.point_closest_to(&point(100.0, 130.0));
        assert_eq!(closest.point, Some(point(100.0, 100.0)));
        assert_eq!(closest.position, 200.0);
    }

    #[test]
    fn test_single_route_segment_index() {
        let route = l_shaped();
        assert_eq!(route.index_of_segment_at(0.0), 0);
        assert_eq!(route.index_of_segment_at(199.0), 0);
    }

    #[test]
    #[should_panic]
    fn test_empty_single_route() {
        SingleRoute::new(Vec::new());
    }

    #[test]
    fn test_multi_route_flattens() {
        let route = eastward();
        assert_eq!(route.length(), 400.0);
        assert_eq!(route.edges().len(), 8);
        assert_eq!(route.points().len(), 9);
        for (i, p) in route.points().iter().enumerate() {
            assert_eq!(*p, point(50.0 * i as f64, 0.0));
        }
    }

    #[test]
    fn test_multi_route_segment_index() {
        let route = eastward();
        assert_eq!(route.index_of_segment_at(-5.0), 0);
        assert_eq!(route.index_of_segment_at(99.0), 0);
        assert_eq!(route.index_of_segment_at(100.0), 1);
        assert_eq!(route.index_of_segment_at(250.0), 2);
        assert_eq!(route.index_of_segment_at(300.0), 3);
        assert_eq!(route.index_of_segment_at(400.0), 3);
        assert_eq!(route.index_of_segment_at(1e6), 3);

        let mut previous = 0;
        for i in 0..=400 {
            let index = route.index_of_segment_at(i as f64);
            assert!(index >= previous);
            previous = index;
        }
    }

    #[test]
    fn test_multi_route_queries_delegate() {
        let route = eastward();
        assert_eq!(route.point_at(325.0), point(325.0, 0.0));
        assert_eq!(route.point_at(1e6), point(400.0, 0.0));
        assert_eq!(route.elevation_at(225.0), Some(5.0));
        assert_eq!(route.elevation_at(375.0), Some(15.0));
        assert_eq!(route.node_closest_to(0.0), 0);
        assert_eq!(route.node_closest_to(130.0), 3);
        assert_eq!(route.node_closest_to(330.0), 7);
        assert_eq!(route.node_closest_to(400.0), 8);
    }

    #[test]
    fn test_multi_route_point_closest_to() {
        let route = eastward();
        let closest = route.point_closest_to(&point(330.0, 20.0));
        assert_eq!(closest.point, Some(point(330.0, 0.0)));
        assert_eq!(closest.position, 330.0);
        assert_eq!(closest.distance_to_reference, 20.0);

        // Equidistant from the end of a segment and the start of the next:
        // the first one wins.
        let closest = route.point_closest_to(&point(200.0, 5.0));
        assert_eq!(closest.position, 200.0);
        assert_eq!(closest.point, Some(point(200.0, 0.0)));
    }

    #[test]
    fn test_route_enum_dispatch() {
        let single = Route::from(l_shaped());
        assert_eq!(single.length(), 200.0);
        assert_eq!(single.point_at(150.0), point(100.0, 50.0));

        let multi = Route::from(MultiRoute::new(vec![single.clone(), single]));
        assert_eq!(multi.length(), 400.0);
        assert_eq!(multi.index_of_segment_at(250.0), 1);
        assert_eq!(multi.points().len(), 5);
    }

    #[test]
    #[should_panic]
    fn test_empty_multi_route() {
        MultiRoute::new(Vec::new());
    }
}

//! Best-route search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::fixed_point::extract_unsigned;
use crate::graph::{Graph, NodeId};
use crate::routing::cost::CostFunction;
use crate::routing::edge::Edge;
use crate::routing::route::SingleRoute;

/// Distance of a node whose best route is final.
const CLOSED: f32 = f32::NEG_INFINITY;

const EDGE_INDEX_START: u32 = 28;
const EDGE_INDEX_BITS: u32 = 4;
const NODE_ID_BITS: u32 = EDGE_INDEX_START;

/// Finds minimum-cost routes with A*, guided by the straight-line distance
/// to the destination.
///
/// The graph is only read, so any number of computers may search the same
/// graph concurrently.
#[derive(Debug)]
pub struct RouteComputer<'g, C> {
    graph: &'g Graph,
    cost_function: C,
}

impl<'g, C: CostFunction> RouteComputer<'g, C> {
    pub fn new(graph: &'g Graph, cost_function: C) -> Self {
        Self {
            graph,
            cost_function,
        }
    }

    /// The route of minimum cost from `start_node_id` to `end_node_id`, or
    /// `None` if the destination cannot be reached.
    ///
    /// # Panics
    ///
    /// Panics if both nodes are the same.
    pub fn best_route_between(
        &self,
        start_node_id: NodeId,
        end_node_id: NodeId,
    ) -> Option<SingleRoute> {
        assert_ne!(
            start_node_id, end_node_id,
            "start and end nodes must differ"
        );

        let node_count = self.graph.node_count();
        let mut distance = vec![f32::INFINITY; node_count];
        let mut predecessor = vec![0u32; node_count];
        let mut queue = BinaryHeap::new();
        let end_point = self.graph.node_point(end_node_id);
        let mut expanded = 0usize;

        distance[start_node_id as usize] = 0.0;
        queue.push(WeightedNode::new(start_node_id, 0.0));

        while let Some(WeightedNode { node_id, .. }) = queue.pop() {
            // Nodes are pushed again whenever their distance improves; every
            // entry after the first one popped is stale and must be skipped,
            // or a closed node would be expanded from a worse distance.
            let current = distance[node_id as usize];
            if current == CLOSED {
                continue;
            }
            if node_id == end_node_id {
                tracing::debug!(
                    start = start_node_id,
                    end = end_node_id,
                    expanded,
                    "Route found"
                );
                return Some(self.rebuild(&predecessor, start_node_id, end_node_id));
            }

            for edge_index in 0..self.graph.node_out_degree(node_id) {
                let edge_id = self.graph.node_out_edge_id(node_id, edge_index);
                let target = self.graph.edge_target_node_id(edge_id);
                let cost = self.graph.edge_length(edge_id)
                    * self.cost_function.cost_factor(node_id, edge_id);
                let tentative = current + cost as f32;

                if tentative < distance[target as usize] {
                    distance[target as usize] = tentative;
                    predecessor[target as usize] = (edge_index << EDGE_INDEX_START) | node_id;
                    let estimate = tentative as f64
                        + self.graph.node_point(target).distance_to(&end_point);
                    queue.push(WeightedNode::new(target, estimate as f32));
                }
            }
            distance[node_id as usize] = CLOSED;
            expanded += 1;
        }

        tracing::debug!(
            start = start_node_id,
            end = end_node_id,
            expanded,
            "Destination unreachable"
        );
        None
    }

    fn rebuild(
        &self,
        predecessor: &[u32],
        start_node_id: NodeId,
        end_node_id: NodeId,
    ) -> SingleRoute {
        let mut edges = Vec::new();
        let mut to_node_id = end_node_id;
        while to_node_id != start_node_id {
            let packed = predecessor[to_node_id as usize];
            let edge_index = extract_unsigned(packed, EDGE_INDEX_START, EDGE_INDEX_BITS);
            let from_node_id = extract_unsigned(packed, 0, NODE_ID_BITS);
            let edge_id = self.graph.node_out_edge_id(from_node_id, edge_index);
            edges.push(Edge::of(self.graph, edge_id, from_node_id, to_node_id));
            to_node_id = from_node_id;
        }
        edges.reverse();
        SingleRoute::new(edges)
    }
}

/// A queue entry: a node and its estimated total distance through it.
#[derive(Debug, Clone, Copy)]
struct WeightedNode {
    node_id: NodeId,
    estimate: f32,
}

impl WeightedNode {
    fn new(node_id: NodeId, estimate: f32) -> Self {
        Self { node_id, estimate }
    }
}

impl PartialEq for WeightedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WeightedNode {}

impl Ord for WeightedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the heap pops the smallest estimate first.
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.node_id.cmp(&self.node_id))
    }
}

impl PartialOrd for WeightedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::{EdgeSpec, GraphBuilder};
    use crate::graph::EdgeId;
    use crate::point::{bounds, Point};
    use crate::routing::cost::UnitCost;

    fn point(de: f64, dn: f64) -> Point {
        Point::new(bounds::MIN_E + de, bounds::MIN_N + dn).unwrap()
    }

    /// ```text
    /// 3 ── 4
    /// │    │
    /// 0 ── 1 ── 2
    /// ```
    /// All edges are 100 m and go both ways, except 1 → 2 which has no way
    /// back.
    fn grid() -> Graph {
        let mut builder = GraphBuilder::new();
        let n0 = builder.add_node(point(0.0, 0.0));
        let n1 = builder.add_node(point(100.0, 0.0));
        let n2 = builder.add_node(point(200.0, 0.0));
        let n3 = builder.add_node(point(0.0, 100.0));
        let n4 = builder.add_node(point(100.0, 100.0));
        for (from, to) in [
            (n0, n1),
            (n0, n3),
            (n1, n0),
            (n1, n2),
            (n1, n4),
            (n3, n0),
            (n3, n4),
            (n4, n1),
            (n4, n3),
        ] {
            builder.add_edge(from, to, EdgeSpec::new(100.0));
        }
        builder.build()
    }

    fn node_ids(route: &SingleRoute) -> Vec<NodeId> {
        let mut ids = vec![route.edges()[0].from_node_id];
        ids.extend(route.edges().iter().map(|edge| edge.to_node_id));
        ids
    }

    #[test]
    fn test_three_node_route() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(point(0.0, 0.0));
        let b = builder.add_node(point(100.0, 0.0));
        let c = builder.add_node(point(100.0, 100.0));
        builder.add_edge(a, b, EdgeSpec::new(100.0));
        builder.add_edge(b, c, EdgeSpec::new(100.0));
        let graph = builder.build();

        let route = RouteComputer::new(&graph, UnitCost)
            .best_route_between(a, c)
            .unwrap();
        assert_eq!(node_ids(&route), vec![0, 1, 2]);
        assert_eq!(route.length(), 200.0);
        assert_eq!(route.point_at(150.0), point(100.0, 50.0));
    }

    #[test]
    fn test_shortest_route() {
        let graph = grid();
        let computer = RouteComputer::new(&graph, UnitCost);

        let route = computer.best_route_between(3, 2).unwrap();
        assert_eq!(route.length(), 300.0);
        assert_eq!(route.edges().len(), 3);
        assert_eq!(route.edges()[2].to_node_id, 2);

        let route = computer.best_route_between(0, 4).unwrap();
        assert_eq!(route.length(), 200.0);
    }

    #[test]
    fn test_unreachable() {
        let graph = grid();
        let computer = RouteComputer::new(&graph, UnitCost);
        assert!(computer.best_route_between(2, 0).is_none());
    }

    #[test]
    fn test_forbidden_edge_is_avoided() {
        let graph = grid();
        // 0 → 1 is edge 0.
        let forbid_0_1 = |_node: NodeId, edge: EdgeId| {
            if edge == 0 {
                f64::INFINITY
            } else {
                1.0
            }
        };
        let route = RouteComputer::new(&graph, forbid_0_1)
            .best_route_between(0, 2)
            .unwrap();
        assert_eq!(node_ids(&route), vec![0, 3, 4, 1, 2]);
        assert_eq!(route.length(), 400.0);
    }

    #[test]
    fn test_costlier_edge_is_avoided() {
        let graph = grid();
        let expensive_0_1 = |_node: NodeId, edge: EdgeId| if edge == 0 { 5.0 } else { 1.0 };
        let route = RouteComputer::new(&graph, expensive_0_1)
            .best_route_between(0, 1)
            .unwrap();
        assert_eq!(node_ids(&route), vec![0, 3, 4, 1]);
    }

    #[test]
    fn test_all_edges_forbidden() {
        let graph = grid();
        let nothing = |_node: NodeId, _edge: EdgeId| f64::INFINITY;
        assert!(RouteComputer::new(&graph, nothing)
            .best_route_between(0, 1)
            .is_none());
    }

    #[test]
    #[should_panic(expected = "must differ")]
    fn test_same_start_and_end() {
        let graph = grid();
        RouteComputer::new(&graph, UnitCost).best_route_between(1, 1);
    }

    #[test]
    fn test_queue_order() {
        let mut queue = BinaryHeap::new();
        queue.push(WeightedNode::new(1, 30.0));
        queue.push(WeightedNode::new(2, 10.0));
        queue.push(WeightedNode::new(3, 20.0));
        queue.push(WeightedNode::new(0, 10.0));
        let order: Vec<NodeId> = std::iter::from_fn(|| queue.pop().map(|e| e.node_id)).collect();
        assert_eq!(order, vec![0, 2, 3, 1]);
    }

    /// Xorshift generator, so the random graphs are the same on every run.
    struct XorShift(u64);

    impl XorShift {
        fn unit(&mut self) -> f64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    /// A `side`×`side` grid, 50 m apart, with about 15% of the one-way
    /// streets missing and lengths between 50 and 150 m.
    fn random_grid(side: u32, seed: u64) -> Graph {
        let mut rng = XorShift(seed);
        let mut builder = GraphBuilder::new();
        for y in 0..side {
            for x in 0..side {
                builder.add_node(point(50.0 * x as f64, 50.0 * y as f64));
            }
        }
        for y in 0..side {
            for x in 0..side {
                let neighbours = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in neighbours {
                    if nx >= side || ny >= side || rng.unit() < 0.15 {
                        continue;
                    }
                    let length = 50.0 * (1.0 + 2.0 * rng.unit());
                    builder.add_edge(y * side + x, ny * side + nx, EdgeSpec::new(length));
                }
            }
        }
        builder.build()
    }

    /// Plain Dijkstra distances from `start` to every node.
    fn dijkstra(graph: &Graph, start: NodeId) -> Vec<f64> {
        let count = graph.node_count();
        let mut distance = vec![f64::INFINITY; count];
        let mut done = vec![false; count];
        distance[start as usize] = 0.0;

        while let Some(node) = (0..count)
            .filter(|&i| !done[i] && distance[i].is_finite())
            .min_by(|&a, &b| distance[a].total_cmp(&distance[b]))
        {
            done[node] = true;
            let node_id = node as NodeId;
            for edge_index in 0..graph.node_out_degree(node_id) {
                let edge_id = graph.node_out_edge_id(node_id, edge_index);
                let target = graph.edge_target_node_id(edge_id) as usize;
                let through = distance[node] + graph.edge_length(edge_id);
                distance[target] = distance[target].min(through);
            }
        }
        distance
    }

    #[test]
    fn test_matches_dijkstra_on_random_grid() {
        let graph = random_grid(12, 0x9E37_79B9_7F4A_7C15);
        let computer = RouteComputer::new(&graph, UnitCost);
        let mut unreachable = 0;

        for start in [0, 17, 77, 143] {
            let expected = dijkstra(&graph, start);
            for end in 0..graph.node_count() as NodeId {
                if end == start {
                    continue;
                }
                match computer.best_route_between(start, end) {
                    Some(route) => {
                        let best = expected[end as usize];
                        assert!(
                            (route.length() - best).abs() < 1e-2,
                            "{start} -> {end}: {} instead of {best}",
                            route.length()
                        );
                        assert_eq!(route.edges()[0].from_node_id, start);
                        assert_eq!(route.edges()[route.edges().len() - 1].to_node_id, end);
                    }
                    None => {
                        assert!(expected[end as usize].is_infinite(), "{start} -> {end}");
                        unreachable += 1;
                    }
                }
            }
        }
        assert!(unreachable < 4 * 143);
    }
}

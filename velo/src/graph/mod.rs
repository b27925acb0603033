//! The routing graph.
//!
//! A [`Graph`] is loaded once from a directory of big-endian binary tables and
//! never changes afterwards. Node, edge, profile and sector tables are
//! memory-mapped and decoded on demand; only the attribute sets are
//! materialized at load time.
//!
//! # Directory layout
//!
//! | File              | Content                                        |
//! |-------------------|------------------------------------------------|
//! | `nodes.bin`       | node positions and out-edge ranges             |
//! | `edges.bin`       | edge targets, lengths, gains, attribute index  |
//! | `profile_ids.bin` | one profile descriptor per edge                |
//! | `elevations.bin`  | shared pool of 16-bit elevation samples        |
//! | `sectors.bin`     | 128×128 sector table                           |
//! | `attributes.bin`  | one 64-bit attribute mask per distinct set     |

pub mod builder;
pub mod edges;
pub mod nodes;
pub mod region;
pub mod sectors;

use std::path::Path;

use crate::attribute::AttributeSet;
use crate::error::Result;
use crate::math::Sampled;
use crate::point::Point;

use self::edges::GraphEdges;
use self::nodes::GraphNodes;
use self::region::Region;
use self::sectors::GraphSectors;

/// Dense node identifier.
pub type NodeId = u32;

/// Dense edge identifier.
pub type EdgeId = u32;

pub const NODES_FILE: &str = "nodes.bin";
pub const EDGES_FILE: &str = "edges.bin";
pub const PROFILE_IDS_FILE: &str = "profile_ids.bin";
pub const ELEVATIONS_FILE: &str = "elevations.bin";
pub const SECTORS_FILE: &str = "sectors.bin";
pub const ATTRIBUTES_FILE: &str = "attributes.bin";

/// Elevation along an edge as a function of the distance from its source.
#[derive(Debug, Clone)]
pub enum EdgeProfile {
    /// The edge has no surveyed profile.
    Undefined,
    /// A single sample covers the whole edge.
    Constant(f64),
    /// Evenly spaced samples, linearly interpolated.
    Sampled(Sampled),
}

impl EdgeProfile {
    /// Elevation at `position` meters from the source, or `None` if the edge
    /// has no profile.
    pub fn at(&self, position: f64) -> Option<f64> {
        match self {
            EdgeProfile::Undefined => None,
            EdgeProfile::Constant(elevation) => Some(*elevation),
            EdgeProfile::Sampled(sampled) => Some(sampled.at(position)),
        }
    }
}

/// An immutable cycling graph.
#[derive(Debug)]
pub struct Graph {
    nodes: GraphNodes,
    sectors: GraphSectors,
    edges: GraphEdges,
    attribute_sets: Vec<AttributeSet>,
}

impl Graph {
    /// Load a graph from the tables stored in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::FileNotFound`](crate::VeloError::FileNotFound) if
    /// a table is missing, [`VeloError::Io`](crate::VeloError::Io) if one
    /// cannot be mapped, and
    /// [`VeloError::InvalidAttributeSet`](crate::VeloError::InvalidAttributeSet)
    /// if an attribute mask sets an unknown bit.
    pub fn load_from<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let nodes = GraphNodes::new(Region::map(dir.join(NODES_FILE))?);
        let sectors = GraphSectors::new(Region::map(dir.join(SECTORS_FILE))?);
        let edges = GraphEdges::new(
            Region::map(dir.join(EDGES_FILE))?,
            Region::map(dir.join(PROFILE_IDS_FILE))?,
            Region::map(dir.join(ELEVATIONS_FILE))?,
        );
        let attribute_sets = Region::map(dir.join(ATTRIBUTES_FILE))?
            .u64_words()
            .map(AttributeSet::new)
            .collect::<Result<Vec<_>>>()?;

        let graph = Self::from_parts(nodes, sectors, edges, attribute_sets);
        tracing::info!(
            dir = %dir.display(),
            nodes = graph.node_count(),
            edges = graph.edges.count(),
            attribute_sets = graph.attribute_sets.len(),
            "Loaded graph"
        );
        Ok(graph)
    }

    pub fn from_parts(
        nodes: GraphNodes,
        sectors: GraphSectors,
        edges: GraphEdges,
        attribute_sets: Vec<AttributeSet>,
    ) -> Self {
        Self {
            nodes,
            sectors,
            edges,
            attribute_sets,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.count()
    }

    pub fn node_point(&self, node_id: NodeId) -> Point {
        Point::from_trusted(self.nodes.node_e(node_id), self.nodes.node_n(node_id))
    }

    pub fn node_out_degree(&self, node_id: NodeId) -> u32 {
        self.nodes.out_degree(node_id)
    }

    /// Id of the `edge_index`-th edge leaving the node.
    pub fn node_out_edge_id(&self, node_id: NodeId, edge_index: u32) -> EdgeId {
        self.nodes.edge_id(node_id, edge_index)
    }

    /// The node closest to `point` among those at most `search_distance`
    /// meters away, or `None` if there is no such node.
    ///
    /// When several nodes are equally close, the first one visited wins.
    ///
    /// # Panics
    ///
    /// Panics if `search_distance` is negative.
    pub fn node_closest_to(&self, point: &Point, search_distance: f64) -> Option<NodeId> {
        let mut closest = None;
        let mut closest_distance = search_distance * search_distance;

        for sector in self.sectors.sectors_in_area(point, search_distance) {
            for node_id in sector.nodes() {
                let distance = point.squared_distance_to(&self.node_point(node_id));
                let better = match closest {
                    None => distance <= closest_distance,
                    Some(_) => distance < closest_distance,
                };
                if better {
                    closest = Some(node_id);
                    closest_distance = distance;
                }
            }
        }
        closest
    }

    pub fn edge_target_node_id(&self, edge_id: EdgeId) -> NodeId {
        self.edges.target_node_id(edge_id)
    }

    /// Whether the edge runs against the direction of its OSM way.
    pub fn edge_is_inverted(&self, edge_id: EdgeId) -> bool {
        self.edges.is_inverted(edge_id)
    }

    pub fn edge_attributes(&self, edge_id: EdgeId) -> AttributeSet {
        self.attribute_sets[self.edges.attributes_index(edge_id)]
    }

    /// Length in meters.
    pub fn edge_length(&self, edge_id: EdgeId) -> f64 {
        self.edges.length(edge_id)
    }

    /// Positive elevation gain in meters.
    pub fn edge_elevation_gain(&self, edge_id: EdgeId) -> f64 {
        self.edges.elevation_gain(edge_id)
    }

    /// Raw elevation samples of the edge, one every 2 m from its source.
    /// Empty if the edge has no profile.
    pub fn edge_profile_samples(&self, edge_id: EdgeId) -> Vec<f32> {
        self.edges.profile_samples(edge_id)
    }

    /// Elevation profile of the edge, from its source to its target.
    pub fn edge_profile(&self, edge_id: EdgeId) -> EdgeProfile {
        if !self.edges.has_profile(edge_id) {
            return EdgeProfile::Undefined;
        }
        let samples = self.edges.profile_samples(edge_id);
        let length = self.edge_length(edge_id);
        if samples.len() < 2 || length <= 0.0 {
            EdgeProfile::Constant(samples[0] as f64)
        } else {
            EdgeProfile::Sampled(Sampled::new(samples, length))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::builder::{EdgeSpec, GraphBuilder};
    use super::*;
    use crate::attribute::Attribute;
    use crate::error::VeloError;
    use crate::point::bounds;
    use tempfile::TempDir;

    fn point(de: f64, dn: f64) -> Point {
        Point::new(bounds::MIN_E + 1_000.0 + de, bounds::MIN_N + 1_000.0 + dn).unwrap()
    }

    fn triangle() -> GraphBuilder {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(point(0.0, 0.0));
        let b = builder.add_node(point(100.0, 0.0));
        let c = builder.add_node(point(100.0, 100.0));
        builder.add_edge(
            a,
            b,
            EdgeSpec::new(100.0)
                .with_attributes(AttributeSet::of(&[Attribute::HighwayCycleway]))
                .with_profile((0..51).map(|i| 400.0 + i as f32 * 0.25).collect()),
        );
        builder.add_edge(b, c, EdgeSpec::new(100.0));
        builder.add_edge(b, a, EdgeSpec::new(100.0).inverted());
        builder.add_edge(c, b, EdgeSpec::new(100.0));
        builder
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        triangle().write_to(dir.path()).unwrap();

        let graph = Graph::load_from(dir.path()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.node_point(1), point(100.0, 0.0));
        assert_eq!(graph.node_out_degree(1), 2);
        assert_eq!(graph.node_out_edge_id(1, 1), 2);
        assert_eq!(graph.edge_target_node_id(2), 0);
        assert!(graph.edge_is_inverted(2));
        assert_eq!(graph.edge_length(0), 100.0);
        assert_eq!(graph.edge_elevation_gain(0), 12.5);
        assert!(graph.edge_attributes(0).contains(Attribute::HighwayCycleway));
        assert_eq!(graph.edge_attributes(1), AttributeSet::EMPTY);
    }

    #[test]
    fn test_load_missing_table() {
        let dir = TempDir::new().unwrap();
        triangle().write_to(dir.path()).unwrap();
        std::fs::remove_file(dir.path().join(SECTORS_FILE)).unwrap();

        match Graph::load_from(dir.path()) {
            Err(VeloError::FileNotFound { path }) => assert!(path.ends_with(SECTORS_FILE)),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_unknown_attribute_bit() {
        let dir = TempDir::new().unwrap();
        triangle().write_to(dir.path()).unwrap();
        std::fs::write(dir.path().join(ATTRIBUTES_FILE), u64::MAX.to_be_bytes()).unwrap();

        assert!(matches!(
            Graph::load_from(dir.path()),
            Err(VeloError::InvalidAttributeSet { .. })
        ));
    }

    #[test]
    fn test_node_closest_to() {
        let graph = triangle().build();
        assert_eq!(graph.node_closest_to(&point(10.0, 5.0), 50.0), Some(0));
        assert_eq!(graph.node_closest_to(&point(90.0, 80.0), 50.0), Some(2));
        assert_eq!(graph.node_closest_to(&point(50.0, 50.0), 10.0), None);
    }

    #[test]
    fn test_node_closest_to_boundary_distance() {
        let graph = triangle().build();
        assert_eq!(graph.node_closest_to(&point(-30.0, -40.0), 50.0), Some(0));
        assert_eq!(graph.node_closest_to(&point(-30.0, -40.0), 49.99), None);
    }

    #[test]
    fn test_node_closest_to_keeps_first_on_tie() {
        // Equidistant from nodes 0 and 1.
        let graph = triangle().build();
        assert_eq!(graph.node_closest_to(&point(50.0, 0.0), 60.0), Some(0));
    }

    #[test]
    fn test_edge_profiles() {
        let graph = triangle().build();

        let profile = graph.edge_profile(0);
        assert!(matches!(profile, EdgeProfile::Sampled(_)));
        assert_eq!(profile.at(0.0), Some(400.0));
        assert_eq!(profile.at(1.0), Some(400.125));
        assert_eq!(profile.at(100.0), Some(412.5));
        assert_eq!(profile.at(500.0), Some(412.5));

        assert!(matches!(graph.edge_profile(1), EdgeProfile::Undefined));
        assert_eq!(graph.edge_profile(1).at(10.0), None);
    }

    #[test]
    fn test_zero_length_edge_profile_is_constant() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(point(0.0, 0.0));
        let b = builder.add_node(point(0.0, 0.0));
        builder.add_edge(a, b, EdgeSpec::new(0.0).with_profile(vec![512.0]));
        let graph = builder.build();

        let profile = graph.edge_profile(0);
        assert!(matches!(profile, EdgeProfile::Constant(_)));
        assert_eq!(profile.at(3.0), Some(512.0));
    }
}

//! In-memory construction of graphs in the on-disk table format.
//!
//! ```
//! use velo::graph::builder::{EdgeSpec, GraphBuilder};
//! use velo::Point;
//!
//! let mut builder = GraphBuilder::new();
//! let a = builder.add_node(Point::new(2_600_000.0, 1_200_000.0)?);
//! let b = builder.add_node(Point::new(2_600_100.0, 1_200_000.0)?);
//! builder.add_edge(a, b, EdgeSpec::new(100.0));
//! builder.add_edge(b, a, EdgeSpec::new(100.0).inverted());
//!
//! let graph = builder.build();
//! assert_eq!(graph.node_count(), 2);
//! # Ok::<(), velo::VeloError>(())
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::attribute::AttributeSet;
use crate::error::Result;
use crate::graph::edges::{sample_count, ProfileDescriptor, ProfileKind};
use crate::graph::nodes::{OutEdges, MAX_OUT_DEGREE};
use crate::graph::region::Region;
use crate::graph::sectors::{cell_of, sector_index, SECTOR_COUNT};
use crate::graph::{
    edges::GraphEdges, nodes::GraphNodes, sectors::GraphSectors, EdgeId, Graph, NodeId,
    ATTRIBUTES_FILE, EDGES_FILE, ELEVATIONS_FILE, NODES_FILE, PROFILE_IDS_FILE, SECTORS_FILE,
};
use crate::point::Point;

/// Description of one edge to add to a [`GraphBuilder`].
#[derive(Debug, Clone, Default)]
pub struct EdgeSpec {
    length: f64,
    attributes: AttributeSet,
    inverted: bool,
    profile: Vec<f32>,
}

impl EdgeSpec {
    /// An edge of the given length in meters, without attributes or profile.
    pub fn new(length: f64) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    /// Mark the edge as running against its OSM way.
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Elevation samples every 2 m, from the source of the edge to its target.
    pub fn with_profile(mut self, samples: Vec<f32>) -> Self {
        self.profile = samples;
        self
    }
}

/// Builds a [`Graph`] node by node and edge by edge.
///
/// Nodes must be added in sector order and edges grouped by source node, in
/// node order, which is how ids are laid out in the tables.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Point>,
    out_edges: Vec<OutEdges>,
    last_sector: usize,
    edges: Vec<u8>,
    edge_count: u32,
    last_source: NodeId,
    profile_ids: Vec<u32>,
    elevations: Vec<u16>,
    attribute_sets: Vec<AttributeSet>,
    attribute_indices: HashMap<AttributeSet, u16>,
}

/// Encoded tables, in the order they are written.
struct Tables {
    nodes: Vec<u8>,
    edges: Vec<u8>,
    profile_ids: Vec<u8>,
    elevations: Vec<u8>,
    sectors: Vec<u8>,
    attributes: Vec<u8>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the node lies in a sector before the previous node's.
    pub fn add_node(&mut self, point: Point) -> NodeId {
        let (x, y) = cell_of(point.e(), point.n());
        let sector = sector_index(x, y);
        assert!(
            sector >= self.last_sector,
            "node {point} added out of sector order"
        );
        self.last_sector = sector;

        self.nodes.push(point);
        self.out_edges.push(OutEdges {
            degree: 0,
            first_edge: self.edge_count,
        });
        (self.nodes.len() - 1) as NodeId
    }

    /// Add an edge from `from` to `to` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if either node is unknown, if `from` precedes the source of the
    /// previous edge, if `from` already has the maximum out-degree, if the
    /// length does not fit the table, or if the profile does not have one
    /// sample per 2 m.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, spec: EdgeSpec) -> EdgeId {
        let node_count = self.nodes.len() as NodeId;
        assert!(from < node_count && to < node_count, "unknown edge endpoint");
        assert!(
            from >= self.last_source,
            "edges must be grouped by source node"
        );
        self.last_source = from;

        let out = &mut self.out_edges[from as usize];
        assert!(out.degree < MAX_OUT_DEGREE, "node {from} has too many edges");
        if out.degree == 0 {
            out.first_edge = self.edge_count;
        }
        out.degree += 1;

        let length = fixed_u16(spec.length);
        let gain = fixed_u16(elevation_gain(&spec.profile));
        let attributes = self.attribute_index(spec.attributes);
        let target = if spec.inverted {
            !(to as i32)
        } else {
            to as i32
        };
        self.edges.extend(target.to_be_bytes());
        self.edges.extend(length.to_be_bytes());
        self.edges.extend(gain.to_be_bytes());
        self.edges.extend(attributes.to_be_bytes());

        let descriptor = if spec.profile.is_empty() {
            ProfileDescriptor {
                kind: ProfileKind::None,
                first_sample: 0,
            }
        } else {
            assert_eq!(
                spec.profile.len(),
                sample_count(length),
                "profile sample count does not match edge length"
            );
            let mut stored = spec.profile;
            if spec.inverted {
                stored.reverse();
            }
            self.push_profile(&stored)
        };
        self.profile_ids.push(descriptor.encode());

        let id = self.edge_count;
        self.edge_count += 1;
        id
    }

    /// Build the graph in memory.
    pub fn build(&self) -> Graph {
        let tables = self.encode();
        Graph::from_parts(
            GraphNodes::new(Region::from(tables.nodes)),
            GraphSectors::new(Region::from(tables.sectors)),
            GraphEdges::new(
                Region::from(tables.edges),
                Region::from(tables.profile_ids),
                Region::from(tables.elevations),
            ),
            self.attribute_sets.clone(),
        )
    }

    /// Write the graph tables into `dir`, which must exist.
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::Io`](crate::VeloError::Io) if a table cannot be
    /// written.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        let tables = self.encode();
        fs::write(dir.join(NODES_FILE), tables.nodes)?;
        fs::write(dir.join(EDGES_FILE), tables.edges)?;
        fs::write(dir.join(PROFILE_IDS_FILE), tables.profile_ids)?;
        fs::write(dir.join(ELEVATIONS_FILE), tables.elevations)?;
        fs::write(dir.join(SECTORS_FILE), tables.sectors)?;
        fs::write(dir.join(ATTRIBUTES_FILE), tables.attributes)?;
        Ok(())
    }

    fn attribute_index(&mut self, attributes: AttributeSet) -> u16 {
        if let Some(&index) = self.attribute_indices.get(&attributes) {
            return index;
        }
        assert!(
            self.attribute_sets.len() <= u16::MAX as usize,
            "too many distinct attribute sets"
        );
        let index = self.attribute_sets.len() as u16;
        self.attribute_sets.push(attributes);
        self.attribute_indices.insert(attributes, index);
        index
    }

    /// Append samples to the pool in the most compact encoding that
    /// represents them exactly.
    fn push_profile(&mut self, samples: &[f32]) -> ProfileDescriptor {
        let fixed: Vec<u16> = samples.iter().map(|&s| fixed_u16(s as f64)).collect();
        let deltas: Vec<i32> = fixed
            .windows(2)
            .map(|w| w[1] as i32 - w[0] as i32)
            .collect();
        let fits = |bits: u32| {
            let bound = 1 << (bits - 1);
            deltas.iter().all(|d| (-bound..bound).contains(d))
        };
        let kind = if fits(4) {
            ProfileKind::Delta4
        } else if fits(8) {
            ProfileKind::Delta8
        } else {
            ProfileKind::Raw
        };

        let first_sample = self.elevations.len() as u32;
        match kind.delta_bits() {
            None => self.elevations.extend(&fixed),
            Some(bits) => {
                self.elevations.push(fixed[0]);
                let per_word = (u16::BITS / bits) as usize;
                let mask = (1u16 << bits) - 1;
                for chunk in deltas.chunks(per_word) {
                    let word = chunk.iter().enumerate().fold(0u16, |word, (i, &d)| {
                        let shift = u16::BITS - bits * (i as u32 + 1);
                        word | ((d as u16 & mask) << shift)
                    });
                    self.elevations.push(word);
                }
            }
        }
        ProfileDescriptor { kind, first_sample }
    }

    fn encode(&self) -> Tables {
        let mut nodes = Vec::with_capacity(self.nodes.len() * 12);
        for (point, out) in self.nodes.iter().zip(&self.out_edges) {
            nodes.extend(fixed_i32(point.e()).to_be_bytes());
            nodes.extend(fixed_i32(point.n()).to_be_bytes());
            nodes.extend(out.encode().to_be_bytes());
        }

        let mut counts = vec![0u16; SECTOR_COUNT];
        for point in &self.nodes {
            let (x, y) = cell_of(point.e(), point.n());
            let count = &mut counts[sector_index(x, y)];
            assert!(*count < u16::MAX, "too many nodes in one sector");
            *count += 1;
        }
        let mut sectors = Vec::with_capacity(SECTOR_COUNT * 6);
        let mut start: NodeId = 0;
        for count in counts {
            sectors.extend(start.to_be_bytes());
            sectors.extend(count.to_be_bytes());
            start += count as NodeId;
        }

        Tables {
            nodes,
            edges: self.edges.clone(),
            profile_ids: self.profile_ids.iter().flat_map(|w| w.to_be_bytes()).collect(),
            elevations: self.elevations.iter().flat_map(|w| w.to_be_bytes()).collect(),
            sectors,
            attributes: self
                .attribute_sets
                .iter()
                .flat_map(|set| set.bits().to_be_bytes())
                .collect(),
        }
    }
}

/// Sum of the positive differences between consecutive samples.
fn elevation_gain(samples: &[f32]) -> f64 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0) as f64)
        .sum()
}

fn fixed_i32(value: f64) -> i32 {
    (value * 16.0).round() as i32
}

fn fixed_u16(value: f64) -> u16 {
    let fixed = (value * 16.0).round();
    assert!(
        (0.0..=u16::MAX as f64).contains(&fixed),
        "{value} does not fit an unsigned Q12.4 field"
    );
    fixed as u16
}

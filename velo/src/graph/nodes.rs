//! Node table: three 32-bit words per node.
//!
//! | Word | Content                                             |
//! |------|-----------------------------------------------------|
//! | 0    | east coordinate, Q28.4                              |
//! | 1    | north coordinate, Q28.4                             |
//! | 2    | out-degree (bits 28..32), first edge id (bits 0..28) |

use crate::fixed_point::{extract_unsigned, to_f64};
use crate::graph::region::Region;
use crate::graph::{EdgeId, NodeId};

const E_WORD: usize = 0;
const N_WORD: usize = E_WORD + 1;
const OUT_EDGES_WORD: usize = N_WORD + 1;

/// Number of 32-bit words per node record.
pub const NODE_WORDS: usize = OUT_EDGES_WORD + 1;

const DEGREE_START: u32 = 28;
const DEGREE_BITS: u32 = 4;
const FIRST_EDGE_START: u32 = 0;
const FIRST_EDGE_BITS: u32 = DEGREE_START;

/// Largest out-degree a node record can hold.
pub const MAX_OUT_DEGREE: u32 = (1 << DEGREE_BITS) - 1;

/// Largest edge id a node record can reference.
pub const MAX_FIRST_EDGE: u32 = (1 << FIRST_EDGE_BITS) - 1;

/// The outgoing edges of a node: `degree` consecutive edge ids starting at
/// `first_edge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutEdges {
    pub degree: u32,
    pub first_edge: EdgeId,
}

impl OutEdges {
    pub fn decode(word: u32) -> Self {
        Self {
            degree: extract_unsigned(word, DEGREE_START, DEGREE_BITS),
            first_edge: extract_unsigned(word, FIRST_EDGE_START, FIRST_EDGE_BITS),
        }
    }

    /// # Panics
    ///
    /// Panics if either field does not fit its bit range.
    pub fn encode(self) -> u32 {
        assert!(
            self.degree <= MAX_OUT_DEGREE,
            "out-degree {} too large",
            self.degree
        );
        assert!(
            self.first_edge <= MAX_FIRST_EDGE,
            "edge id {} too large",
            self.first_edge
        );
        (self.degree << DEGREE_START) | (self.first_edge << FIRST_EDGE_START)
    }
}

/// View over the node table.
#[derive(Debug)]
pub struct GraphNodes {
    region: Region,
}

impl GraphNodes {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    pub fn count(&self) -> usize {
        self.region.len() / (NODE_WORDS * 4)
    }

    /// East coordinate of the node, in meters.
    pub fn node_e(&self, node_id: NodeId) -> f64 {
        to_f64(self.region.i32_at(self.offset(node_id, E_WORD)))
    }

    /// North coordinate of the node, in meters.
    pub fn node_n(&self, node_id: NodeId) -> f64 {
        to_f64(self.region.i32_at(self.offset(node_id, N_WORD)))
    }

    pub fn out_degree(&self, node_id: NodeId) -> u32 {
        self.out_edges(node_id).degree
    }

    /// Id of the `edge_index`-th outgoing edge of the node.
    pub fn edge_id(&self, node_id: NodeId, edge_index: u32) -> EdgeId {
        debug_assert!(edge_index < self.out_degree(node_id));
        self.out_edges(node_id).first_edge + edge_index
    }

    fn out_edges(&self, node_id: NodeId) -> OutEdges {
        OutEdges::decode(self.region.u32_at(self.offset(node_id, OUT_EDGES_WORD)))
    }

    fn offset(&self, node_id: NodeId, word: usize) -> usize {
        (node_id as usize * NODE_WORDS + word) * 4
    }
}

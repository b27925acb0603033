//! Edge table, profile descriptors and the shared elevation sample pool.
//!
//! Each edge record is 10 bytes:
//!
//! | Bytes | Content                                                       |
//! |-------|---------------------------------------------------------------|
//! | 0..4  | target node id; bitwise-negated when the edge is inverted      |
//! | 4..6  | length, unsigned Q12.4                                        |
//! | 6..8  | elevation gain, unsigned Q12.4                                |
//! | 8..10 | index of the edge's attribute set                             |
//!
//! A parallel table holds one 32-bit profile descriptor per edge: the
//! profile kind in bits 30..32 and the index of its first sample in the
//! 16-bit elevation pool in bits 0..30.

use crate::fixed_point::{extract_signed, extract_unsigned, to_f32, to_f64, to_fixed_point};
use crate::graph::region::Region;
use crate::graph::{EdgeId, NodeId};
use crate::math::ceil_div;

const TARGET_OFFSET: usize = 0;
const LENGTH_OFFSET: usize = TARGET_OFFSET + 4;
const ELEVATION_GAIN_OFFSET: usize = LENGTH_OFFSET + 2;
const ATTRIBUTES_OFFSET: usize = ELEVATION_GAIN_OFFSET + 2;

/// Size of one edge record in bytes.
pub const EDGE_BYTES: usize = ATTRIBUTES_OFFSET + 2;

const PROFILE_KIND_START: u32 = 30;
const PROFILE_KIND_BITS: u32 = 2;
const FIRST_SAMPLE_START: u32 = 0;
const FIRST_SAMPLE_BITS: u32 = PROFILE_KIND_START;

/// Bits in one word of the elevation pool.
const SAMPLE_WORD_BITS: u32 = u16::BITS;

/// Distance in meters between two consecutive profile samples.
pub const SAMPLE_SPACING: i32 = 2;

/// Encoding of an edge's elevation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// The edge has no profile.
    None = 0,
    /// Every sample is stored as a Q12.4 word.
    Raw = 1,
    /// First sample raw, then 8-bit Q4.4 deltas packed two per word.
    Delta8 = 2,
    /// First sample raw, then 4-bit Q0.4 deltas packed four per word.
    Delta4 = 3,
}

impl ProfileKind {
    fn from_code(code: u32) -> Self {
        match code {
            0 => ProfileKind::None,
            1 => ProfileKind::Raw,
            2 => ProfileKind::Delta8,
            _ => ProfileKind::Delta4,
        }
    }

    /// Width in bits of one delta, for compressed kinds.
    pub fn delta_bits(self) -> Option<u32> {
        match self {
            ProfileKind::Delta8 => Some(8),
            ProfileKind::Delta4 => Some(4),
            ProfileKind::None | ProfileKind::Raw => None,
        }
    }
}

/// Kind and pool offset of an edge's profile, packed in one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileDescriptor {
    pub kind: ProfileKind,
    pub first_sample: u32,
}

impl ProfileDescriptor {
    pub fn decode(word: u32) -> Self {
        Self {
            kind: ProfileKind::from_code(extract_unsigned(
                word,
                PROFILE_KIND_START,
                PROFILE_KIND_BITS,
            )),
            first_sample: extract_unsigned(word, FIRST_SAMPLE_START, FIRST_SAMPLE_BITS),
        }
    }

    /// # Panics
    ///
    /// Panics if `first_sample` does not fit in 30 bits.
    pub fn encode(self) -> u32 {
        assert!(
            self.first_sample < 1 << FIRST_SAMPLE_BITS,
            "sample index {} too large",
            self.first_sample
        );
        ((self.kind as u32) << PROFILE_KIND_START) | (self.first_sample << FIRST_SAMPLE_START)
    }
}

/// Number of profile samples of an edge whose Q12.4 length is `length_fixed`.
pub fn sample_count(length_fixed: u16) -> usize {
    1 + ceil_div(length_fixed as u32, to_fixed_point(SAMPLE_SPACING) as u32) as usize
}

/// View over the edge tables.
#[derive(Debug)]
pub struct GraphEdges {
    edges: Region,
    profile_ids: Region,
    elevations: Region,
}

impl GraphEdges {
    pub fn new(edges: Region, profile_ids: Region, elevations: Region) -> Self {
        Self {
            edges,
            profile_ids,
            elevations,
        }
    }

    pub fn count(&self) -> usize {
        self.edges.len() / EDGE_BYTES
    }

    /// Whether the edge runs against the direction of the OSM way it
    /// belongs to.
    pub fn is_inverted(&self, edge_id: EdgeId) -> bool {
        self.raw_target(edge_id) < 0
    }

    pub fn target_node_id(&self, edge_id: EdgeId) -> NodeId {
        let target = self.raw_target(edge_id);
        (if target < 0 { !target } else { target }) as NodeId
    }

    /// Length in meters.
    pub fn length(&self, edge_id: EdgeId) -> f64 {
        to_f64(self.length_fixed(edge_id) as i32)
    }

    /// Positive elevation gain in meters.
    pub fn elevation_gain(&self, edge_id: EdgeId) -> f64 {
        to_f64(self.edges.u16_at(self.offset(edge_id, ELEVATION_GAIN_OFFSET)) as i32)
    }

    pub fn attributes_index(&self, edge_id: EdgeId) -> usize {
        self.edges.u16_at(self.offset(edge_id, ATTRIBUTES_OFFSET)) as usize
    }

    pub fn has_profile(&self, edge_id: EdgeId) -> bool {
        self.profile(edge_id).kind != ProfileKind::None
    }

    /// Decoded elevation samples of the edge, ordered from its source to its
    /// target. Empty if the edge has no profile.
    pub fn profile_samples(&self, edge_id: EdgeId) -> Vec<f32> {
        let descriptor = self.profile(edge_id);
        let count = sample_count(self.length_fixed(edge_id));
        let first = descriptor.first_sample as usize;

        let mut samples = match descriptor.kind {
            ProfileKind::None => return Vec::new(),
            ProfileKind::Raw => (0..count)
                .map(|i| to_f32(self.sample_word(first + i) as i32))
                .collect(),
            ProfileKind::Delta8 => self.decode_deltas(first, count, 8),
            ProfileKind::Delta4 => self.decode_deltas(first, count, 4),
        };

        if self.is_inverted(edge_id) {
            samples.reverse();
        }
        samples
    }

    fn decode_deltas(&self, first: usize, count: usize, bits: u32) -> Vec<f32> {
        let per_word = (SAMPLE_WORD_BITS / bits) as usize;
        let mut elevation = self.sample_word(first) as i32;
        let mut samples = Vec::with_capacity(count);
        samples.push(to_f32(elevation));

        for i in 0..count - 1 {
            let word = self.sample_word(first + 1 + i / per_word) as u32;
            let start = SAMPLE_WORD_BITS - bits * (i % per_word + 1) as u32;
            elevation += extract_signed(word, start, bits);
            samples.push(to_f32(elevation));
        }
        samples
    }

    fn profile(&self, edge_id: EdgeId) -> ProfileDescriptor {
        ProfileDescriptor::decode(self.profile_ids.u32_at(edge_id as usize * 4))
    }

    fn length_fixed(&self, edge_id: EdgeId) -> u16 {
        self.edges.u16_at(self.offset(edge_id, LENGTH_OFFSET))
    }

    fn raw_target(&self, edge_id: EdgeId) -> i32 {
        self.edges.i32_at(self.offset(edge_id, TARGET_OFFSET))
    }

    fn sample_word(&self, index: usize) -> u16 {
        self.elevations.u16_at(index * 2)
    }

    fn offset(&self, edge_id: EdgeId, field: usize) -> usize {
        edge_id as usize * EDGE_BYTES + field
    }
}

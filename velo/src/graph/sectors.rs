//! Sector table: a 128×128 grid over the covered region.
//!
//! Node ids are assigned sector by sector, so every sector maps to a
//! contiguous id range. Each of the 16384 records (row-major, south-west
//! first) holds the first node id as a 32-bit word followed by the node count
//! as a 16-bit word.

use std::ops::Range;

use crate::graph::region::Region;
use crate::graph::NodeId;
use crate::point::{bounds, Point};

const FIRST_NODE_OFFSET: usize = 0;
const NODE_COUNT_OFFSET: usize = FIRST_NODE_OFFSET + 4;

/// Size of one sector record in bytes.
pub const SECTOR_BYTES: usize = NODE_COUNT_OFFSET + 2;

/// Number of sectors along each axis.
pub const SECTORS_PER_SIDE: usize = 128;

/// Total number of sectors.
pub const SECTOR_COUNT: usize = SECTORS_PER_SIDE * SECTORS_PER_SIDE;

const SECTOR_WIDTH: f64 = bounds::WIDTH / SECTORS_PER_SIDE as f64;
const SECTOR_HEIGHT: f64 = bounds::HEIGHT / SECTORS_PER_SIDE as f64;

/// The nodes of one sector, as a half-open id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub start_node_id: NodeId,
    pub end_node_id: NodeId,
}

impl Sector {
    pub fn nodes(&self) -> Range<NodeId> {
        self.start_node_id..self.end_node_id
    }
}

/// Grid cell `(x, y)` containing `(e, n)`, clamped to the grid.
pub fn cell_of(e: f64, n: f64) -> (usize, usize) {
    (
        grid_index((e - bounds::MIN_E) / SECTOR_WIDTH),
        grid_index((n - bounds::MIN_N) / SECTOR_HEIGHT),
    )
}

/// Row-major index of the sector at grid cell `(x, y)`.
pub fn sector_index(x: usize, y: usize) -> usize {
    y * SECTORS_PER_SIDE + x
}

fn grid_index(scaled: f64) -> usize {
    (scaled as i64).clamp(0, SECTORS_PER_SIDE as i64 - 1) as usize
}

/// View over the sector table.
#[derive(Debug)]
pub struct GraphSectors {
    region: Region,
}

impl GraphSectors {
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    pub fn sector(&self, index: usize) -> Sector {
        let offset = index * SECTOR_BYTES;
        let start = self.region.u32_at(offset + FIRST_NODE_OFFSET);
        let count = self.region.u16_at(offset + NODE_COUNT_OFFSET) as u32;
        Sector {
            start_node_id: start,
            end_node_id: start + count,
        }
    }

    /// All sectors overlapping the square of side `2 * half_side` centred on
    /// `center`.
    ///
    /// Square corners outside the grid are clamped to its border cells, so
    /// near the edge of the region the result may include cells that the
    /// unclamped square does not reach.
    ///
    /// # Panics
    ///
    /// Panics if `half_side` is negative.
    pub fn sectors_in_area(&self, center: &Point, half_side: f64) -> Vec<Sector> {
        assert!(half_side >= 0.0, "negative search distance {half_side}");

        let (x_min, y_min) = cell_of(center.e() - half_side, center.n() - half_side);
        let (x_max, y_max) = cell_of(center.e() + half_side, center.n() + half_side);

        let mut sectors = Vec::with_capacity((x_max - x_min + 1) * (y_max - y_min + 1));
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                sectors.push(self.sector(sector_index(x, y)));
            }
        }
        sectors
    }
}

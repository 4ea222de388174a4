//! Cube edge topology shared by the cell tables and the mesher.
//!
//! # Cube Topology
//!
//! ```text
//!       6──────7         Corners (binary ZYX):
//!      /│     /│           0=(0,0,0)  1=(1,0,0)  2=(0,1,0)  3=(1,1,0)
//!     4─┼────5 │           4=(0,0,1)  5=(1,0,1)  6=(0,1,1)  7=(1,1,1)
//!     │ 2────┼─3
//!     │/     │/          +Z
//!     0──────1            │  +Y
//!                         │ /
//!                         └───+X
//! ```
//!
//! Every edge lists its lower corner first, so interpolation along an edge
//! always runs from the smaller lattice coordinate to the larger one. Two
//! chunks sharing a face therefore evaluate shared edges identically.
//!
//! # Edge Table Usage
//!
//! `EDGE_TABLE[case]` is a 12-bit mask of the edges whose endpoints differ in
//! solidity for the given 8-bit corner case.

/// Edge endpoint corner indices, lower corner first.
pub const EDGE_CORNERS: [[u8; 2]; 12] = [
  [0, 1], // Edge 0:  X axis at Y=0, Z=0
  [0, 2], // Edge 1:  Y axis at X=0, Z=0
  [0, 4], // Edge 2:  Z axis at X=0, Y=0
  [1, 3], // Edge 3:  Y axis at X=1, Z=0
  [1, 5], // Edge 4:  Z axis at X=1, Y=0
  [2, 3], // Edge 5:  X axis at Y=1, Z=0
  [2, 6], // Edge 6:  Z axis at X=0, Y=1
  [3, 7], // Edge 7:  Z axis at X=1, Y=1
  [4, 5], // Edge 8:  X axis at Y=0, Z=1
  [4, 6], // Edge 9:  Y axis at X=0, Z=1
  [5, 7], // Edge 10: Y axis at X=1, Z=1
  [6, 7], // Edge 11: X axis at Y=1, Z=1
];

/// Axis (0 = x, 1 = y, 2 = z) each edge runs along.
pub const EDGE_AXIS: [u8; 12] = generate_edge_axes();

/// Precomputed edge crossing masks indexed by corner case.
pub const EDGE_TABLE: [u16; 256] = generate_edge_table();

const fn generate_edge_axes() -> [u8; 12] {
  let mut axes = [0u8; 12];
  let mut edge = 0;
  while edge < 12 {
    let diff = EDGE_CORNERS[edge][0] ^ EDGE_CORNERS[edge][1];
    axes[edge] = diff.trailing_zeros() as u8;
    edge += 1;
  }
  axes
}

const fn generate_edge_table() -> [u16; 256] {
  let mut table = [0u16; 256];
  let mut case = 0usize;

  while case < 256 {
    let mut edge_mask = 0u16;
    let mut edge = 0;

    while edge < 12 {
      let solid0 = (case >> EDGE_CORNERS[edge][0]) & 1;
      let solid1 = (case >> EDGE_CORNERS[edge][1]) & 1;
      if solid0 != solid1 {
        edge_mask |= 1 << edge;
      }
      edge += 1;
    }

    table[case] = edge_mask;
    case += 1;
  }

  table
}

/// Edge connecting two corners, in either order.
pub const fn edge_between(a: u8, b: u8) -> Option<u8> {
  let mut edge = 0;
  while edge < 12 {
    let [c0, c1] = EDGE_CORNERS[edge];
    if (c0 == a && c1 == b) || (c0 == b && c1 == a) {
      return Some(edge as u8);
    }
    edge += 1;
  }
  None
}

/// Whether the cell case has any edge crossing the surface.
#[inline(always)]
pub const fn has_surface(case: u8) -> bool {
  EDGE_TABLE[case as usize] != 0
}

#[cfg(test)]
#[path = "edge_table_test.rs"]
mod edge_table_test;

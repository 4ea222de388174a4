//! Transition cell table.
//!
//! A transition cell sits in the skirt between a coarse chunk face and a
//! neighbor at twice the resolution. In the cell's local frame `(a, b, c)`,
//! `c` is depth into the chunk:
//!
//! ```text
//!  full-resolution face (c = 0)         half-resolution face (c = w)
//!
//!   6 ──── 7 ──── 8                      11 ─────────── 12
//!   │      │      │                       │              │
//!   3 ──── 4 ──── 5        b              │              │
//!   │      │      │        ▲              │              │
//!   0 ──── 1 ──── 2        └──► a         9 ─────────── 10
//! ```
//!
//! Samples 0..9 are read at half the coarse stride on the face plane.
//! Corners 9..13 repeat samples 0, 2, 6 and 8 one skirt depth inside, so
//! the half-resolution face matches the coarse cell face exactly.

use super::trace::trace_polygons;
use super::{CellRecipe, CellTable};

/// Face sample each half-resolution corner copies.
pub const HALF_TO_FULL: [u8; 4] = [0, 2, 6, 8];

/// Transition cell edges, lower corner first.
///
/// Ids 0..12 lie on the full-resolution face, 12..16 on the
/// half-resolution face.
pub const TRANSITION_EDGES: [[u8; 2]; 16] = [
  [0, 1],
  [1, 2],
  [3, 4],
  [4, 5],
  [6, 7],
  [7, 8],
  [0, 3],
  [3, 6],
  [1, 4],
  [4, 7],
  [2, 5],
  [5, 8],
  [9, 10],
  [11, 12],
  [9, 11],
  [10, 12],
];

/// First edge id on the half-resolution face.
pub const FIRST_HALF_EDGE: u8 = 12;

/// Polyhedron faces, corners counter-clockwise around the outward normal.
const TRANSITION_FACES: [&[u8]; 9] = [
  &[0, 3, 4, 1],
  &[1, 4, 5, 2],
  &[3, 6, 7, 4],
  &[4, 7, 8, 5],
  &[9, 10, 12, 11],
  &[0, 1, 2, 10, 9],
  &[6, 11, 12, 8, 7],
  &[0, 9, 11, 6, 3],
  &[2, 5, 8, 12, 10],
];

/// Local `(a, b)` coordinates of a corner in half-sample units (0..=2).
pub const fn corner_ab(corner: u8) -> (i32, i32) {
  let sample = if corner >= 9 {
    HALF_TO_FULL[(corner - 9) as usize]
  } else {
    corner
  };
  ((sample % 3) as i32, (sample / 3) as i32)
}

/// Edge id between two corners, in either order.
pub fn transition_edge(a: u8, b: u8) -> Option<u8> {
  TRANSITION_EDGES
    .iter()
    .position(|&[c0, c1]| (c0 == a && c1 == b) || (c0 == b && c1 == a))
    .map(|edge| edge as u8)
}

pub(super) fn build_table() -> CellTable {
  let cases = (0..512u16)
    .map(|case| {
      let solid = |corner: u8| {
        let sample = if corner >= 9 {
          HALF_TO_FULL[(corner - 9) as usize]
        } else {
          corner
        };
        case >> sample & 1 == 1
      };
      let polygons = trace_polygons(&TRANSITION_FACES, solid, |a, b| {
        transition_edge(a, b).unwrap_or(u8::MAX)
      });
      CellRecipe::from_polygons(&polygons)
    })
    .collect();
  CellTable::from_recipes(cases)
}

//! Regular cube cell table.

use super::trace::trace_polygons;
use super::{CellRecipe, CellTable};
use crate::edge_table::edge_between;

/// Cube faces, corners counter-clockwise around the outward normal.
pub const CUBE_FACES: [[u8; 4]; 6] = [
  [0, 4, 6, 2], // -X
  [1, 3, 7, 5], // +X
  [0, 1, 5, 4], // -Y
  [2, 6, 7, 3], // +Y
  [0, 2, 3, 1], // -Z
  [4, 5, 7, 6], // +Z
];

pub(super) fn build_table() -> CellTable {
  let faces: Vec<&[u8]> = CUBE_FACES.iter().map(|f| f.as_slice()).collect();
  let cases = (0..256u16)
    .map(|case| {
      let polygons = trace_polygons(
        &faces,
        |corner| case >> corner & 1 == 1,
        |a, b| edge_between(a, b).unwrap_or(u8::MAX),
      );
      CellRecipe::from_polygons(&polygons)
    })
    .collect();
  CellTable::from_recipes(cases)
}

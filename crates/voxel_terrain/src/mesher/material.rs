//! Cell material selection.
//!
//! A base-level cell takes the most frequent material among its solid
//! corners. A coarse cell instead votes over the native-resolution cells it
//! covers that actually carry surface, so thin features of another material
//! below the coarse sampling still win when they dominate the surface.

use glam::IVec3;
use smallvec::SmallVec;

use crate::constants::CORNER_DELTAS;
use crate::edge_table::has_surface;
use crate::types::MaterialPair;
use crate::view::TerrainViews;

type Votes = SmallVec<[(MaterialPair, u32); 8]>;

fn add_vote(votes: &mut Votes, material: MaterialPair, weight: u32) {
  match votes.iter_mut().find(|(m, _)| *m == material) {
    Some((_, count)) => *count += weight,
    None => votes.push((material, weight)),
  }
}

/// Highest count wins; ties keep the first material voted for.
fn winner(votes: &Votes) -> Option<MaterialPair> {
  let mut best: Option<(MaterialPair, u32)> = None;
  for &(material, count) in votes {
    if best.map_or(true, |(_, c)| count > c) {
      best = Some((material, count));
    }
  }
  best.map(|(material, _)| material)
}

#[inline]
pub(crate) fn material_at(views: &TerrainViews, p: IVec3) -> MaterialPair {
  MaterialPair::new(
    views.material_primary.unsigned_voxel(p),
    views.material_secondary.unsigned_voxel(p),
  )
}

/// Corner case of the cell at `base` (block-local native) with `stride`.
#[inline]
pub(crate) fn cell_case(views: &TerrainViews, base: IVec3, stride: i32) -> u8 {
  let mut case = 0u8;
  for (i, delta) in CORNER_DELTAS.iter().enumerate() {
    let p = base + IVec3::from_array(*delta) * stride;
    if views.density.voxel(p) < 0 {
      case |= 1 << i;
    }
  }
  case
}

/// Most frequent material among the solid corners of a cell.
pub(crate) fn dominant_material(views: &TerrainViews, base: IVec3, stride: i32, case: u8) -> MaterialPair {
  let solid = CORNER_DELTAS
    .iter()
    .enumerate()
    .filter(|(i, _)| case >> i & 1 == 1)
    .map(|(_, delta)| base + IVec3::from_array(*delta) * stride);
  dominant_sample_material(views, solid)
}

/// Most frequent material over `points`; ties keep the earliest point.
pub(crate) fn dominant_sample_material(views: &TerrainViews, points: impl IntoIterator<Item = IVec3>) -> MaterialPair {
  let mut votes = Votes::new();
  for p in points {
    add_vote(&mut votes, material_at(views, p), 1);
  }
  winner(&votes).unwrap_or_default()
}

/// Material of a coarse cell from the surface-bearing native cells below it.
///
/// Falls back to [`dominant_material`] over the coarse corners when no
/// native cell inside carries surface.
pub(crate) fn find_best_material(views: &TerrainViews, base: IVec3, stride: i32, case: u8) -> MaterialPair {
  let mut votes = Votes::new();
  vote_surface_cells(views, base, stride, &mut votes);
  winner(&votes).unwrap_or_else(|| dominant_material(views, base, stride, case))
}

fn vote_surface_cells(views: &TerrainViews, base: IVec3, stride: i32, votes: &mut Votes) {
  if stride == 1 {
    let case = cell_case(views, base, 1);
    if has_surface(case) {
      for (i, delta) in CORNER_DELTAS.iter().enumerate() {
        if case >> i & 1 == 1 {
          add_vote(votes, material_at(views, base + IVec3::from_array(*delta)), 1);
        }
      }
    }
    return;
  }

  let half = stride / 2;
  for delta in CORNER_DELTAS {
    let child = base + IVec3::from_array(delta) * half;
    if has_surface(cell_case(views, child, half)) {
      vote_surface_cells(views, child, half, votes);
    }
  }
}

#[cfg(test)]
#[path = "material_test.rs"]
mod material_test;

//! Triangulation choice for coarse cells.
//!
//! A polygon with four or more vertices can be fanned from more than one
//! vertex, and the fans disagree about where the surface runs through the
//! cell interior. Coarse cells have a real sample at their center, so each
//! candidate fan is scored by the density it implies there:
//!
//! ```text
//! implied = gradient · (center - mean of fan diagonal midpoints)
//! score   = |implied - sampled center|          (lower wins)
//! ```
//!
//! Skirt polygons often run several full-resolution vertices along one
//! straight line on the face plane. Fanning from the end of such a run makes
//! a zero-area triangle, and dropping it would leave one long edge against
//! the finer neighbor's short ones. Skirts are therefore fanned from the
//! first vertex that yields no degenerate triangle.

use glam::{I64Vec3, IVec3, Vec3};
use smallvec::SmallVec;

use crate::constants::FRACTION_ONE;
use crate::mesher::vertex::VertexArena;
use crate::tables::CellRecipe;

/// Triangles as vertex ids.
pub(crate) type TriangleList = SmallVec<[[u32; 3]; 12]>;

/// Geometry of the coarse cell being triangulated.
pub(crate) struct CellProbe {
  /// Cell center in chunk-local fixed-point units.
  pub center: IVec3,
  /// Density gradient per native voxel.
  pub gradient: Vec3,
  /// Density sampled at the center.
  pub center_density: f32,
}

fn to_voxels(p: IVec3) -> Vec3 {
  p.as_vec3() / FRACTION_ONE as f32
}

/// Score of fanning `polygon` (vertex ids in winding order) from `start`.
fn fan_error(polygon: &[u32], start: usize, arena: &VertexArena, probe: &CellProbe) -> f32 {
  let n = polygon.len();
  let apex = to_voxels(arena.get(polygon[start]).position0);
  let mut sum = Vec3::ZERO;
  for k in 2..n - 1 {
    let far = to_voxels(arena.get(polygon[(start + k) % n]).position0);
    sum += (apex + far) * 0.5;
  }
  let mean = sum / (n - 3) as f32;
  let implied = probe.gradient.dot(to_voxels(probe.center) - mean);
  (implied - probe.center_density).abs()
}

fn push_fan(out: &mut TriangleList, polygon: &[u32], start: usize) {
  let n = polygon.len();
  for k in 1..n - 1 {
    out.push([
      polygon[start],
      polygon[(start + k) % n],
      polygon[(start + k + 1) % n],
    ]);
  }
}

/// Triangulate every polygon of `recipe`, picking the better of the fans
/// from its first two vertices.
pub(crate) fn choose_triangulation(
  recipe: &CellRecipe,
  vertex_ids: &[u32],
  arena: &VertexArena,
  probe: &CellProbe,
) -> TriangleList {
  let mut out = TriangleList::new();
  for polygon in &recipe.polygons {
    let ids: SmallVec<[u32; 12]> = polygon.iter().map(|&v| vertex_ids[v as usize]).collect();
    let start = if ids.len() >= 4 && fan_error(&ids, 1, arena, probe) < fan_error(&ids, 0, arena, probe) {
      1
    } else {
      0
    };
    push_fan(&mut out, &ids, start);
  }
  out
}

/// Whether every triangle of the fan from `start` has non-zero area at
/// `position1`.
fn fan_is_solid(polygon: &[u32], start: usize, arena: &VertexArena) -> bool {
  let n = polygon.len();
  let apex = arena.get(polygon[start]).position1;
  (1..n - 1).all(|k| {
    let b = arena.get(polygon[(start + k) % n]).position1;
    let c = arena.get(polygon[(start + k + 1) % n]).position1;
    (b - apex).as_i64vec3().cross((c - apex).as_i64vec3()) != I64Vec3::ZERO
  })
}

/// Fan every polygon of a transition recipe from its first vertex that
/// gives only non-degenerate triangles, or from vertex 0 if none does.
pub(crate) fn skirt_triangulation(recipe: &CellRecipe, vertex_ids: &[u32], arena: &VertexArena) -> TriangleList {
  let mut out = TriangleList::new();
  for polygon in &recipe.polygons {
    let ids: SmallVec<[u32; 12]> = polygon.iter().map(|&v| vertex_ids[v as usize]).collect();
    let start = if ids.len() >= 4 {
      (0..ids.len()).find(|&start| fan_is_solid(&ids, start, arena)).unwrap_or(0)
    } else {
      0
    };
    push_fan(&mut out, &ids, start);
  }
  out
}

/// Default fan triangulation of `recipe`.
pub(crate) fn default_triangulation(recipe: &CellRecipe, vertex_ids: &[u32]) -> TriangleList {
  recipe
    .triangles
    .iter()
    .map(|tri| tri.map(|v| vertex_ids[v as usize]))
    .collect()
}

#[cfg(test)]
#[path = "triangulation_test.rs"]
mod triangulation_test;

//! Border skirts between a coarse chunk and a finer neighbor.
//!
//! Each face of an LOD chunk carries 16×16 transition cells, one per coarse
//! cell touching the face. In face space `u = (k + 1) % 3`, `v = (k + 2) % 3`
//! and depth runs along the face axis `k` into the chunk:
//!
//! ```text
//!   full-resolution samples (face plane)    half-resolution corners
//!   F(i, j) at half the coarse stride       shared with the interior mesh
//!
//!      F6 ── F7 ── F8                          ●──────────●
//!      │     │     │                           │          │
//!      F3 ── F4 ── F5       v                  │ coarse   │  at position1,
//!      │     │     │        ▲                  │ cell     │  one skirt depth
//!      F0 ── F1 ── F2       └──► u             ●──────────●  inside
//! ```
//!
//! Full-resolution vertices sit on the face plane and never move, so they
//! meet the finer neighbor's own boundary vertices exactly. Half-resolution
//! vertices are the interior mesh's own boundary vertices, welded by key.

use glam::IVec3;

use crate::constants::{CHUNK_SIZE, FRACTION_ONE};
use crate::edge_table::has_surface;
use crate::lod::triangulation::skirt_triangulation;
use crate::mesher::extract::{crossing_weight, edge_key, CellExtractor};
use crate::mesher::material::{cell_case, dominant_sample_material, find_best_material};
use crate::mesher::vertex::NO_VERTEX;
use crate::tables::transition::{corner_ab, FIRST_HALF_EDGE, HALF_TO_FULL, TRANSITION_EDGES};
use crate::tables::{TRANSITION_CELLS, TRANSITION_FLIP};
use crate::types::{Face, MaterialPair};

/// Chunk-local native position of face sample `(i, j)` of the transition
/// cell at `(cu, cv)`.
#[inline]
fn face_sample(face: Face, stride: i32, cu: i32, cv: i32, i: i32, j: i32) -> IVec3 {
  let k = face.axis();
  let mut p = IVec3::ZERO;
  p[k] = if face.is_high() { CHUNK_SIZE as i32 * stride } else { 0 };
  p[(k + 1) % 3] = cu * stride + i * stride / 2;
  p[(k + 2) % 3] = cv * stride + j * stride / 2;
  p
}

/// Coarse lattice point of half-resolution corner offset `(a, b)` (0 or 2).
#[inline]
fn face_lattice(face: Face, cu: i32, cv: i32, a: i32, b: i32) -> IVec3 {
  let k = face.axis();
  let mut l = IVec3::ZERO;
  l[k] = if face.is_high() { CHUNK_SIZE as i32 } else { 0 };
  l[(k + 1) % 3] = cu + a / 2;
  l[(k + 2) % 3] = cv + b / 2;
  l
}

impl CellExtractor<'_> {
  /// Mesh the transition cells of `face` into its skirt run.
  ///
  /// Returns `false` once the triangle budget is exhausted.
  pub(crate) fn build_mip_border(&mut self, face: Face) -> bool {
    let size = CHUNK_SIZE as i32;
    for cv in 0..size {
      for cu in 0..size {
        if !self.process_transition_cell(face, cu, cv) {
          return false;
        }
      }
    }
    true
  }

  fn process_transition_cell(&mut self, face: Face, cu: i32, cv: i32) -> bool {
    let s = self.stride;
    let mut samples = [IVec3::ZERO; 9];
    let mut densities = [0i32; 9];
    let mut case = 0usize;
    for n in 0..9 {
      let (i, j) = ((n % 3) as i32, (n / 3) as i32);
      samples[n] = face_sample(face, s, cu, cv, i, j);
      densities[n] = self.density(samples[n]);
      if densities[n] < 0 {
        case |= 1 << n;
      }
    }
    let recipe = TRANSITION_CELLS.recipe(case);
    if recipe.is_empty() {
      return true;
    }

    let material = self.transition_material(face, cu, cv, &samples, case);
    if material.is_dead() {
      return true;
    }

    let mut vertex_ids = [NO_VERTEX; 12];
    for (slot, &edge) in recipe.vertices.iter().enumerate() {
      vertex_ids[slot] = if edge < FIRST_HALF_EDGE {
        self.full_resolution_vertex(edge, &samples, &densities, material)
      } else {
        self.half_resolution_vertex(face, cu, cv, edge, &samples, &densities, material)
      };
    }

    let mut triangles = skirt_triangulation(recipe, &vertex_ids[..recipe.vertices.len()], &self.arena);
    if TRANSITION_FLIP[face.index()] {
      for tri in &mut triangles {
        tri.swap(1, 2);
      }
    }

    if !self.reserve(triangles.len()) {
      return false;
    }
    self.runs[1 + face.index()].extend_from_slice(&triangles);
    true
  }

  /// Material of the coarse cell behind the transition cell, or of the
  /// solid face samples when that cell carries no surface.
  fn transition_material(&self, face: Face, cu: i32, cv: i32, samples: &[IVec3; 9], case: usize) -> MaterialPair {
    let s = self.stride;
    let mut cell = face_lattice(face, cu, cv, 0, 0);
    if face.is_high() {
      cell[face.axis()] -= 1;
    }
    let base = self.origin + cell * s;
    let coarse = cell_case(self.views, base, s);
    if has_surface(coarse) {
      return find_best_material(self.views, base, s, coarse);
    }

    let solid = (0..9).filter(|n| case >> n & 1 == 1).map(|n| self.origin + samples[n]);
    dominant_sample_material(self.views, solid)
  }

  /// Vertex on a face-plane edge; never displaced, shared by position.
  fn full_resolution_vertex(
    &mut self,
    edge: u8,
    samples: &[IVec3; 9],
    densities: &[i32; 9],
    material: MaterialPair,
  ) -> u32 {
    let [c0, c1] = TRANSITION_EDGES[edge as usize].map(usize::from);
    let (q0, q1) = (samples[c0], samples[c1]);
    let (d0, d1) = (densities[c0], densities[c1]);
    let t = crossing_weight(d0, d1);
    let position = q0 * t + q1 * (FRACTION_ONE - t);

    if let Some(&head) = self.skirt_vertices.get(&position) {
      return self.arena.add_shared_vertex(head, material);
    }
    let step = (self.stride / 2).max(1);
    let vertex = self.make_edge_vertex(q0, q1, d0, d1, material, step, false);
    let index = self.arena.push(vertex);
    self.skirt_vertices.insert(position, index);
    index
  }

  /// Vertex on a coarse face edge, welded to the interior mesh.
  #[allow(clippy::too_many_arguments)]
  fn half_resolution_vertex(
    &mut self,
    face: Face,
    cu: i32,
    cv: i32,
    edge: u8,
    samples: &[IVec3; 9],
    densities: &[i32; 9],
    material: MaterialPair,
  ) -> u32 {
    let [c0, c1] = TRANSITION_EDGES[edge as usize];
    let (a0, b0) = corner_ab(c0);
    let (a1, b1) = corner_ab(c1);
    let axis = if a0 != a1 { (face.axis() + 1) % 3 } else { (face.axis() + 2) % 3 };
    let l0 = face_lattice(face, cu, cv, a0, b0);
    let l1 = face_lattice(face, cu, cv, a1, b1);
    let n0 = HALF_TO_FULL[(c0 - 9) as usize] as usize;
    let n1 = HALF_TO_FULL[(c1 - 9) as usize] as usize;
    let (d0, d1) = (densities[n0], densities[n1]);
    let key = edge_key(l0, l1, axis as u8, crossing_weight(d0, d1));

    if let Some(&head) = self.boundary_vertices.get(&key) {
      return self.arena.add_shared_vertex(head, material);
    }
    let vertex = self.make_edge_vertex(samples[n0], samples[n1], d0, d1, material, self.stride, true);
    let index = self.arena.push(vertex);
    self.boundary_vertices.insert(key, index);
    index
  }
}

#[cfg(test)]
#[path = "transition_test.rs"]
mod transition_test;

//! Cell extraction shared by the base-level and LOD meshers.
//!
//! # Extraction Flow
//!
//! ```text
//! for cz in 0..16                 begin_layer(cz) rolls the deck cache
//!   for cy, cx in 0..16
//!     case = 8 corner signs       trivial ──► skip
//!     material                    dead ──► skip
//!     for edge in recipe          cache hit ──► add_shared_vertex
//!                                 miss ──► make_edge_vertex, fill cache
//!     triangles ──► runs[0]       over budget ──► truncated, stop
//! ```
//!
//! Positions are chunk-local fixed point, `FRACTION_ONE` units per native
//! voxel, so every chunk computes a crossing on a shared edge identically.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use super::cache::DeckCache;
use super::material::{cell_case, dominant_material, find_best_material};
use super::vertex::{boundary_status, BuildVertex, VertexArena, VertexKey, NO_VERTEX};
use crate::constants::{
  level_extent, level_stride, CHUNK_SIZE, CORNER_DELTAS, FRACTION_ONE, MAX_TERRAIN_TRIANGLE_COUNT,
};
use crate::edge_table::{EDGE_AXIS, EDGE_CORNERS};
use crate::lod::dual::dual_position;
use crate::lod::triangulation::{choose_triangulation, default_triangulation, CellProbe};
use crate::tables::REGULAR_CELLS;
use crate::types::{MaterialPair, MeshConfig};
use crate::view::TerrainViews;

/// Triangle runs: the interior first, then one skirt per face.
pub(crate) const RUN_COUNT: usize = 7;
pub(crate) const INTERIOR_RUN: usize = 0;

/// Scratch state of one chunk build. Never shared between builds.
pub(crate) struct CellExtractor<'a> {
  pub views: &'a TerrainViews,
  pub config: &'a MeshConfig,
  pub level: u32,
  pub stride: i32,
  /// Block-local native coordinate of the chunk's first voxel.
  pub origin: IVec3,
  pub arena: VertexArena,
  pub runs: [Vec<[u32; 3]>; RUN_COUNT],
  pub triangle_count: usize,
  pub truncated: bool,
  /// Head vertices on the chunk boundary planes, for skirt welding.
  pub boundary_vertices: HashMap<VertexKey, u32>,
  /// Full-resolution skirt vertices by position.
  pub skirt_vertices: HashMap<IVec3, u32>,
}

impl<'a> CellExtractor<'a> {
  pub fn new(views: &'a TerrainViews, config: &'a MeshConfig, chunk: IVec3, level: u32) -> Self {
    Self {
      views,
      config,
      level,
      stride: level_stride(level),
      origin: chunk * level_extent(level),
      arena: VertexArena::default(),
      runs: Default::default(),
      triangle_count: 0,
      truncated: false,
      boundary_vertices: HashMap::new(),
      skirt_vertices: HashMap::new(),
    }
  }

  /// Chunk extent in fixed-point units.
  #[inline]
  pub fn fixed_extent(&self) -> i32 {
    level_extent(self.level) * FRACTION_ONE
  }

  #[inline]
  pub fn density(&self, q: IVec3) -> i32 {
    self.views.density.voxel(self.origin + q) as i32
  }

  /// Claim room for `count` more triangles, flagging truncation when the
  /// budget is exhausted.
  pub fn reserve(&mut self, count: usize) -> bool {
    let budget = self.config.max_triangles.min(MAX_TERRAIN_TRIANGLE_COUNT);
    if self.truncated || self.triangle_count + count > budget {
      self.truncated = true;
      return false;
    }
    self.triangle_count += count;
    true
  }

  /// March every regular cell of the chunk. Stops early on truncation.
  pub fn extract_regular_cells(&mut self) {
    let mut cache = DeckCache::new();
    let size = CHUNK_SIZE as i32;
    for cz in 0..size {
      cache.begin_layer(cz);
      for cy in 0..size {
        for cx in 0..size {
          if !self.process_cell(IVec3::new(cx, cy, cz), &mut cache) {
            return;
          }
        }
      }
    }
  }

  /// Mesh one cell. Returns `false` once the triangle budget is exhausted.
  fn process_cell(&mut self, cell: IVec3, cache: &mut DeckCache) -> bool {
    let s = self.stride;
    let base = cell * s;
    let case = cell_case(self.views, self.origin + base, s);
    let recipe = REGULAR_CELLS.recipe(case as usize);
    if recipe.is_empty() {
      return true;
    }

    let material = if self.level == 0 {
      dominant_material(self.views, self.origin + base, s, case)
    } else {
      find_best_material(self.views, self.origin + base, s, case)
    };
    if material.is_dead() {
      return true;
    }

    let mut vertex_ids = [NO_VERTEX; 12];
    for (slot, &edge) in recipe.vertices.iter().enumerate() {
      vertex_ids[slot] = self.regular_vertex(cell, edge, material, cache);
    }
    let vertex_ids = &vertex_ids[..recipe.vertices.len()];

    let triangles = if self.level > 0 && self.config.choose_triangulation && recipe.is_ambiguous() {
      let probe = self.cell_probe(base);
      choose_triangulation(recipe, vertex_ids, &self.arena, &probe)
    } else {
      default_triangulation(recipe, vertex_ids)
    };

    if !self.reserve(triangles.len()) {
      return false;
    }
    self.runs[INTERIOR_RUN].extend_from_slice(&triangles);
    true
  }

  /// Vertex on `edge` of `cell` carrying `material`, reusing the cache.
  fn regular_vertex(&mut self, cell: IVec3, edge: u8, material: MaterialPair, cache: &mut DeckCache) -> u32 {
    let s = self.stride;
    let [c0, c1] = EDGE_CORNERS[edge as usize];
    let l0 = cell + IVec3::from_array(CORNER_DELTAS[c0 as usize]);
    let l1 = cell + IVec3::from_array(CORNER_DELTAS[c1 as usize]);
    let d0 = self.density(l0 * s);
    let d1 = self.density(l1 * s);
    let t = crossing_weight(d0, d1);
    let key = edge_key(l0, l1, EDGE_AXIS[edge as usize], t);

    if let Some(head) = cache.get(&key) {
      return self.arena.add_shared_vertex(head, material);
    }

    let vertex = self.make_edge_vertex(l0 * s, l1 * s, d0, d1, material, s, true);
    let index = self.arena.push(vertex);
    cache.set(&key, index);
    if key.boundary_mask() != 0 {
      self.boundary_vertices.entry(key).or_insert(index);
    }
    index
  }

  /// Build a vertex at the crossing between chunk-local native points `q0`
  /// and `q1`. `displaced` enables the skirt-side `position1` on LOD chunks.
  #[allow(clippy::too_many_arguments)]
  pub fn make_edge_vertex(
    &self,
    q0: IVec3,
    q1: IVec3,
    d0: i32,
    d1: i32,
    material: MaterialPair,
    normal_step: i32,
    displaced: bool,
  ) -> BuildVertex {
    let t = crossing_weight(d0, d1);
    let u = FRACTION_ONE - t;
    let position0 = q0 * t + q1 * u;

    let normal = self
      .views
      .density
      .calculate_edge_normal(self.origin + q0, self.origin + q1, t, u, normal_step);
    let b0 = self.views.blend.unsigned_voxel(self.origin + q0) as i32;
    let b1 = self.views.blend.unsigned_voxel(self.origin + q1) as i32;
    let blend = ((b0 * t + b1 * u) >> 8) as u8;

    let extent = self.fixed_extent();
    let (position1, border_flags) = if self.level > 0 && displaced {
      let cell = self.stride * FRACTION_ONE;
      let width = self.config.transition_width as i32 * self.stride;
      dual_position(position0, cell, extent, width)
    } else {
      (position0, 0)
    };

    BuildVertex {
      position0,
      position1,
      normal,
      material,
      blend,
      border_flags,
      status: boundary_status(position0, extent),
      next_shared: NO_VERTEX,
    }
  }

  /// Center sample and corner gradient of the coarse cell at `base`.
  fn cell_probe(&self, base: IVec3) -> CellProbe {
    let s = self.stride;
    let mut gradient = Vec3::ZERO;
    for delta in CORNER_DELTAS {
      let d = IVec3::from_array(delta);
      let sample = self.density(base + d * s) as f32;
      let sign = (d * 2 - 1).as_vec3();
      gradient += sign * sample;
    }
    let center = base * FRACTION_ONE + IVec3::splat(s * FRACTION_ONE / 2);
    CellProbe {
      center,
      gradient: gradient / (4 * s) as f32,
      center_density: self.density(base + IVec3::splat(s / 2)) as f32,
    }
  }
}

/// Fixed-point weight of the first endpoint at the crossing of `d0`, `d1`.
///
/// `0` puts the crossing on the second endpoint, `FRACTION_ONE` on the first.
#[inline]
pub(crate) fn crossing_weight(d0: i32, d1: i32) -> i32 {
  if d0 == d1 {
    return FRACTION_ONE / 2;
  }
  (d1 << 8) / (d1 - d0)
}

/// Cache key of the crossing between lattice points `l0` (low) and `l1`.
#[inline]
pub(crate) fn edge_key(l0: IVec3, l1: IVec3, axis: u8, t: i32) -> VertexKey {
  match t {
    0 => VertexKey::Corner(l1),
    FRACTION_ONE => VertexKey::Corner(l0),
    _ => VertexKey::Edge(l0, axis),
  }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;

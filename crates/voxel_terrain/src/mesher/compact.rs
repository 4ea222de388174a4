//! Final pass: filter triangles, remap vertices, convert to world space.
//!
//! Interior triangles are dropped when they have zero area or when all three
//! vertices lie on one chunk boundary plane and the triangle faces into the
//! chunk; the neighbor across that plane emits the outward-facing copy.
//! Skirt triangles are only checked for zero area, on `position1`.

use glam::{I64Vec3, IVec3};

use super::extract::{CellExtractor, INTERIOR_RUN, RUN_COUNT};
use super::vertex::NO_VERTEX;
use crate::constants::{CHUNK_SIZE, FRACTION_ONE, MAX_TERRAIN_TRIANGLE_COUNT};
use crate::types::{BuildStatus, ChunkMesh, MinMaxAABB, TerrainVertex};

// Every referenced vertex gets a `u16` index.
const _: () = assert!(MAX_TERRAIN_TRIANGLE_COUNT * 3 <= u16::MAX as usize + 1);

/// Compacted mesh with the triangle range `(start, count)` of every run.
pub(crate) struct CompactMesh {
  pub mesh: ChunkMesh,
  pub runs: [(u32, u32); RUN_COUNT],
}

fn cross(a: IVec3, b: IVec3, c: IVec3) -> I64Vec3 {
  let ab = (b - a).as_i64vec3();
  let ac = (c - a).as_i64vec3();
  ab.cross(ac)
}

fn in_range(p: IVec3, extent: i32) -> bool {
  p.cmpge(IVec3::ZERO).all() && p.cmple(IVec3::splat(extent)).all()
}

impl CellExtractor<'_> {
  fn keep_interior(&self, tri: [u32; 3]) -> bool {
    let [a, b, c] = tri.map(|v| self.arena.get(v));
    let extent = self.fixed_extent();
    if ![a, b, c].iter().all(|v| in_range(v.position0, extent)) {
      return false;
    }
    let n = cross(a.position0, b.position0, c.position0);
    if n == I64Vec3::ZERO {
      return false;
    }
    let shared = a.status & b.status & c.status;
    for face in 0..6 {
      if shared >> face & 1 == 0 {
        continue;
      }
      let axis = face / 2;
      let outward = if face & 1 == 1 { 1 } else { -1 };
      if n[axis] * outward <= 0 {
        return false;
      }
    }
    true
  }

  fn keep_skirt(&self, tri: [u32; 3]) -> bool {
    let [a, b, c] = tri.map(|v| self.arena.get(v).position1);
    cross(a, b, c) != I64Vec3::ZERO
  }

  /// Consume the extractor into the output mesh.
  ///
  /// `block_origin` is the block's first chunk in chunk units.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesher::compact"))]
  pub fn finish(self, block_origin: IVec3) -> CompactMesh {
    let mut remap = vec![NO_VERTEX; self.arena.vertices.len()];
    let mut order: Vec<u32> = Vec::new();
    let mut indices: Vec<u16> = Vec::new();
    let mut runs = [(0u32, 0u32); RUN_COUNT];

    for (run, triangles) in self.runs.iter().enumerate() {
      let start = (indices.len() / 3) as u32;
      for &tri in triangles {
        let keep = if run == INTERIOR_RUN {
          self.keep_interior(tri)
        } else {
          self.keep_skirt(tri)
        };
        if !keep {
          continue;
        }

        for v in tri {
          let slot = &mut remap[v as usize];
          if *slot == NO_VERTEX {
            *slot = order.len() as u32;
            order.push(v);
          }
          indices.push(*slot as u16);
        }
      }
      runs[run] = (start, (indices.len() / 3) as u32 - start);
    }

    let base = (block_origin * CHUNK_SIZE as i32 + self.origin).as_i64vec3() * FRACTION_ONE as i64;
    let scale = self.config.voxel_scale as f64 / FRACTION_ONE as f64;
    let to_world = |p: IVec3| -> [f32; 3] {
      let fixed = base + p.as_i64vec3();
      [
        (fixed.x as f64 * scale) as f32,
        (fixed.y as f64 * scale) as f32,
        (fixed.z as f64 * scale) as f32,
      ]
    };

    let mut bounds = MinMaxAABB::empty();
    let vertices: Vec<TerrainVertex> = order
      .iter()
      .map(|&v| {
        let vertex = self.arena.get(v);
        let position = to_world(vertex.position0);
        let position1 = to_world(vertex.position1);
        bounds.encapsulate(position);
        bounds.encapsulate(position1);
        TerrainVertex {
          position,
          position1,
          normal: vertex.normal.to_array(),
          material: [vertex.material.primary, vertex.material.secondary, vertex.blend],
          border_flags: vertex.border_flags,
        }
      })
      .collect();

    let status = if self.truncated {
      #[cfg(feature = "tracing")]
      tracing::warn!(
        chunk = ?self.origin,
        level = self.level,
        triangles = indices.len() / 3,
        "chunk mesh truncated"
      );
      BuildStatus::Truncated
    } else {
      BuildStatus::Complete
    };

    CompactMesh {
      mesh: ChunkMesh {
        vertices,
        indices,
        bounds,
        status,
      },
      runs,
    }
  }
}

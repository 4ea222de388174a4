//! Test utilities shared by unit tests.
//!
//! Provides block fixtures filled from density functions plus a few canned
//! density fields.

use glam::{IVec3, Vec3};

use crate::constants::{CHUNK_SIZE, CHUNK_SIZE_SQ, CHUNK_VOLUME};
use crate::store::{Block, Channel, MATERIAL_PRIMARY, MATERIAL_SECONDARY};
use crate::types::{BlockConfig, ChunkMesh};

// =============================================================================
// Block Fixtures
// =============================================================================

/// Fill every chunk of a channel from a per-voxel function.
pub fn fill_channel(block: &mut Block, channel: Channel, subchannel: usize, f: impl Fn(IVec3) -> u8) {
  let size = block.size();
  let mut raster = [0u8; CHUNK_VOLUME];
  for cz in 0..size.z {
    for cy in 0..size.y {
      for cx in 0..size.x {
        let chunk = IVec3::new(cx, cy, cz);
        for (i, value) in raster.iter_mut().enumerate() {
          let (x, y, z) = crate::constants::index_to_coord(i);
          *value = f(chunk * CHUNK_SIZE as i32 + IVec3::new(x as i32, y as i32, z as i32));
        }
        block
          .store_voxels(channel, subchannel, chunk, &raster, CHUNK_SIZE, CHUNK_SIZE_SQ)
          .unwrap();
      }
    }
  }
}

/// Block of `size` chunks with density from `density` (clamped to ±127),
/// primary material 1, secondary material 2 and zero blend.
pub fn block_from_fn(size: IVec3, density: impl Fn(IVec3) -> i32) -> Block {
  let mut block = Block::new(BlockConfig::new(size));
  fill_channel(&mut block, Channel::Density, 0, |p| density(p).clamp(-127, 127) as i8 as u8);
  fill_channel(&mut block, Channel::Material, MATERIAL_PRIMARY, |_| 1);
  fill_channel(&mut block, Channel::Material, MATERIAL_SECONDARY, |_| 2);
  fill_channel(&mut block, Channel::Blend, 0, |_| 0);
  block
}

// =============================================================================
// Density Fields
// =============================================================================

/// Floor with its surface exactly on the lattice plane `z = height`.
pub fn flat_floor(height: i32) -> impl Fn(IVec3) -> i32 {
  move |p| p.z * 8 - height * 8
}

/// Sphere whose density is always odd, so no crossing lands on a corner.
pub fn odd_sphere(center: Vec3, radius: f32) -> impl Fn(IVec3) -> i32 {
  move |p| {
    let d = (p.as_vec3() - center).length() - radius;
    (d * 6.0).round() as i32 * 2 + 1
  }
}

/// Alternating solid/empty voxels.
pub fn checkerboard() -> impl Fn(IVec3) -> i32 {
  |p| if (p.x + p.y + p.z) & 1 == 0 { -50 } else { 50 }
}

// =============================================================================
// Mesh Checks
// =============================================================================

/// Geometric normal of a triangle from its positions.
pub fn triangle_normal(tri: [[f32; 3]; 3]) -> Vec3 {
  let [a, b, c] = tri.map(Vec3::from_array);
  (b - a).cross(c - a)
}

/// Every triangle has non-zero area.
pub fn assert_no_degenerate_triangles(mesh: &ChunkMesh) {
  for i in 0..mesh.triangle_count() {
    assert!(
      triangle_normal(mesh.triangle(i)).length_squared() > 0.0,
      "triangle {} is degenerate",
      i
    );
  }
}

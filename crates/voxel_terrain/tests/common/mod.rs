//! Block fixtures for integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;

use glam::{IVec3, Vec3};
use voxel_terrain::constants::CHUNK_SIZE_SQ;
use voxel_terrain::{
  index_to_coord, Block, BlockConfig, Channel, TerrainVertex, CHUNK_SIZE, CHUNK_VOLUME, MATERIAL_PRIMARY,
  MATERIAL_SECONDARY,
};

/// Block of `size` chunks with density from `density` (clamped to ±127)
/// and materials 1/2 with zero blend.
pub fn block_from_fn(size: IVec3, density: impl Fn(IVec3) -> i32) -> Block {
  let mut block = Block::new(BlockConfig::new(size));
  let mut raster = [0u8; CHUNK_VOLUME];
  for cz in 0..size.z {
    for cy in 0..size.y {
      for cx in 0..size.x {
        let chunk = IVec3::new(cx, cy, cz);
        for (i, value) in raster.iter_mut().enumerate() {
          let (x, y, z) = index_to_coord(i);
          let p = chunk * CHUNK_SIZE as i32 + IVec3::new(x as i32, y as i32, z as i32);
          *value = density(p).clamp(-127, 127) as i8 as u8;
        }
        block
          .store_voxels(Channel::Density, 0, chunk, &raster, CHUNK_SIZE, CHUNK_SIZE_SQ)
          .unwrap();
        block.fill_chunk(Channel::Material, MATERIAL_PRIMARY, chunk, 1).unwrap();
        block.fill_chunk(Channel::Material, MATERIAL_SECONDARY, chunk, 2).unwrap();
        block.fill_chunk(Channel::Blend, 0, chunk, 0).unwrap();
      }
    }
  }
  block
}

/// Sphere whose density is always odd, so no crossing lands on a corner.
pub fn odd_sphere(center: Vec3, radius: f32) -> impl Fn(IVec3) -> i32 {
  move |p| {
    let d = (p.as_vec3() - center).length() - radius;
    (d * 6.0).round() as i32 * 2 + 1
  }
}

/// Sphere with even densities; lattice points on the surface read exactly 0.
pub fn even_sphere(center: Vec3, radius: f32) -> impl Fn(IVec3) -> i32 {
  move |p| {
    let d = (p.as_vec3() - center).length() - radius;
    (d * 4.0).round() as i32 * 2
  }
}

/// Exact position key for set comparisons.
pub fn position_key(position: [f32; 3]) -> [u32; 3] {
  position.map(f32::to_bits)
}

/// Positions of the vertices lying on the plane `axis = value`.
pub fn positions_on_plane<'a>(
  vertices: impl IntoIterator<Item = &'a TerrainVertex>,
  axis: usize,
  value: f32,
) -> BTreeSet<[u32; 3]> {
  vertices
    .into_iter()
    .filter(|v| v.position[axis] == value)
    .map(|v| position_key(v.position))
    .collect()
}

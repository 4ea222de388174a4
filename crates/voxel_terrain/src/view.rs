//! Decompressed neighborhood of one chunk for a single channel.
//!
//! ```text
//!            base - s                      base + 16s + s
//!               │◄──────── covered range ────────►│
//!   ────────────┼──┬──────────────────────────┬───┼──────────
//!               │s │      16 coarse cells     │ s │
//!   ────────────┴──┴──────────────────────────┴───┴──────────
//!                  ▲ base                    ▲ base + 16s
//! ```
//!
//! The covered range is clipped to the block; reads outside it clamp to the
//! nearest covered voxel. Coordinates are block-local native voxels.

use glam::{IVec3, Vec3};

use crate::constants::{level_extent, level_stride, CHUNK_SIZE, MAX_DETAIL_LEVEL};
use crate::error::{Result, TerrainError};
use crate::store::{BlockSnapshot, Channel, MATERIAL_PRIMARY, MATERIAL_SECONDARY};

/// Dense decompressed copy of the chunks around one chunk.
#[derive(Debug)]
pub struct VoxelView {
  data: Vec<u8>,
  /// Native coordinate of `data[0]` (chunk aligned).
  origin: IVec3,
  dims: IVec3,
  voxel_min: IVec3,
  voxel_max: IVec3,
  block_min: IVec3,
  block_max: IVec3,
}

impl VoxelView {
  /// Load the neighborhood of `chunk` (in level-`level` chunk units).
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "view::new"))]
  pub fn new(
    snapshot: &BlockSnapshot,
    channel: Channel,
    subchannel: usize,
    chunk: IVec3,
    level: u32,
  ) -> Result<Self> {
    if level > MAX_DETAIL_LEVEL {
      return Err(TerrainError::InvalidDetailLevel { level });
    }
    let stride = level_stride(level);
    let base = chunk * level_extent(level);
    let size = CHUNK_SIZE as i32;
    let block_voxels = snapshot.size() * size;
    if base.cmplt(IVec3::ZERO).any() || base.cmpge(block_voxels).any() {
      return Err(TerrainError::ChunkOutOfBounds { chunk });
    }

    let voxel_min = (base - stride).max(IVec3::ZERO);
    let voxel_max = (base + level_extent(level) + stride).min(block_voxels - 1);
    let block_min = voxel_min.div_euclid(IVec3::splat(size));
    let block_max = voxel_max.div_euclid(IVec3::splat(size));
    let origin = block_min * size;
    let dims = (block_max - block_min + 1) * size;

    let len = (dims.x * dims.y * dims.z) as usize;
    let mut data = Vec::new();
    data
      .try_reserve_exact(len)
      .map_err(|_| TerrainError::OutOfMemory {
        requested: len,
        available: 0,
      })?;
    data.resize(len, 0);

    let stride_x = dims.x as usize;
    let stride_y = (dims.x * dims.y) as usize;
    for z in block_min.z..=block_max.z {
      for y in block_min.y..=block_max.y {
        for x in block_min.x..=block_max.x {
          let c = IVec3::new(x, y, z);
          let offset = (c - block_min) * size;
          let start = offset.x as usize + offset.y as usize * stride_x + offset.z as usize * stride_y;
          snapshot.load_voxels(channel, subchannel, c, &mut data[start..], stride_x, stride_y)?;
        }
      }
    }

    Ok(Self {
      data,
      origin,
      dims,
      voxel_min,
      voxel_max,
      block_min,
      block_max,
    })
  }

  #[inline]
  fn index(&self, p: IVec3) -> usize {
    let p = p.clamp(self.voxel_min, self.voxel_max) - self.origin;
    (p.x + p.y * self.dims.x + p.z * self.dims.x * self.dims.y) as usize
  }

  /// Signed sample at a block-local native coordinate.
  #[inline]
  pub fn voxel(&self, p: IVec3) -> i8 {
    self.data[self.index(p)] as i8
  }

  #[inline]
  pub fn unsigned_voxel(&self, p: IVec3) -> u8 {
    self.data[self.index(p)]
  }

  /// Central-difference density gradient with the given sample step.
  pub fn gradient(&self, p: IVec3, step: i32) -> Vec3 {
    let axis = |d: IVec3| (self.voxel(p + d * step) as i32 - self.voxel(p - d * step) as i32) as f32;
    Vec3::new(axis(IVec3::X), axis(IVec3::Y), axis(IVec3::Z))
  }

  /// Unit normal pointing towards empty space.
  pub fn calculate_normal(&self, p: IVec3, step: i32) -> Vec3 {
    self.gradient(p, step).normalize_or(Vec3::Z)
  }

  /// Normal at an edge crossing, blending endpoint gradients by `t` and `u`
  /// (`t` weights `c0`).
  pub fn calculate_edge_normal(&self, c0: IVec3, c1: IVec3, t: i32, u: i32, step: i32) -> Vec3 {
    let g = self.gradient(c0, step) * t as f32 + self.gradient(c1, step) * u as f32;
    g.normalize_or(Vec3::Z)
  }

  /// Inclusive native voxel range that reads resolve to.
  pub fn voxel_bounds(&self) -> (IVec3, IVec3) {
    (self.voxel_min, self.voxel_max)
  }

  /// Inclusive chunk range loaded into the view.
  pub fn block_bounds(&self) -> (IVec3, IVec3) {
    (self.block_min, self.block_max)
  }
}

/// The four channel views a chunk build samples from.
#[derive(Debug)]
pub struct TerrainViews {
  pub density: VoxelView,
  pub blend: VoxelView,
  pub material_primary: VoxelView,
  pub material_secondary: VoxelView,
}

impl TerrainViews {
  pub fn new(snapshot: &BlockSnapshot, chunk: IVec3, level: u32) -> Result<Self> {
    Ok(Self {
      density: VoxelView::new(snapshot, Channel::Density, 0, chunk, level)?,
      blend: VoxelView::new(snapshot, Channel::Blend, 0, chunk, level)?,
      material_primary: VoxelView::new(snapshot, Channel::Material, MATERIAL_PRIMARY, chunk, level)?,
      material_secondary: VoxelView::new(
        snapshot,
        Channel::Material,
        MATERIAL_SECONDARY,
        chunk,
        level,
      )?,
    })
  }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

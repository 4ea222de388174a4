//! A block of chunks holding the three terrain channels.
//!
//! Edits go through `&mut Block`; builds read a [`BlockSnapshot`]. Taking a
//! snapshot clones slot tables only (compressed buffers are shared), and an
//! edit replaces a slot rather than mutating its buffer, so a snapshot never
//! observes later edits.

use std::sync::Arc;

use glam::IVec3;

use super::heap::VoxelHeap;
use super::voxel_store::{VoxelStore, VoxelValue};
use crate::constants::{coord_to_index, CHUNK_SIZE, CHUNK_SIZE_SQ, CHUNK_VOLUME};
use crate::error::Result;
use crate::types::BlockConfig;

/// Material subchannel holding the primary material.
pub const MATERIAL_PRIMARY: usize = 0;

/// Material subchannel holding the secondary material.
pub const MATERIAL_SECONDARY: usize = 1;

/// Voxel data channels stored per chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
  /// Signed density (negative = solid).
  Density,
  /// Unsigned blend weight between primary and secondary material.
  Blend,
  /// Primary and secondary material ids.
  Material,
}

impl Channel {
  pub const ALL: [Channel; 3] = [Channel::Density, Channel::Blend, Channel::Material];

  pub const fn subchannel_count(self) -> usize {
    match self {
      Channel::Density | Channel::Blend => 1,
      Channel::Material => 2,
    }
  }

  const fn index(self) -> usize {
    match self {
      Channel::Density => 0,
      Channel::Blend => 1,
      Channel::Material => 2,
    }
  }
}

fn make_channels(heap: &VoxelHeap, size: IVec3) -> [VoxelStore; 3] {
  Channel::ALL.map(|channel| VoxelStore::new(heap.clone(), channel.subchannel_count(), size))
}

/// Split a block-local voxel coordinate into chunk and raster index.
fn locate(voxel: IVec3) -> (IVec3, usize) {
  let size = CHUNK_SIZE as i32;
  let chunk = voxel.div_euclid(IVec3::splat(size));
  let local = voxel.rem_euclid(IVec3::splat(size));
  let index = coord_to_index(local.x as usize, local.y as usize, local.z as usize);
  (chunk, index)
}

/// Mutable terrain block.
#[derive(Debug)]
pub struct Block {
  config: BlockConfig,
  heap: VoxelHeap,
  channels: [VoxelStore; 3],
}

impl Block {
  pub fn new(config: BlockConfig) -> Self {
    let heap = match config.heap_limit {
      Some(limit) => VoxelHeap::with_limit(limit),
      None => VoxelHeap::new(),
    };
    let channels = make_channels(&heap, config.size);
    Self {
      config,
      heap,
      channels,
    }
  }

  pub fn config(&self) -> &BlockConfig {
    &self.config
  }

  /// Block dimensions in chunks.
  pub fn size(&self) -> IVec3 {
    self.config.size
  }

  pub fn heap(&self) -> &VoxelHeap {
    &self.heap
  }

  pub fn channel(&self, channel: Channel) -> &VoxelStore {
    &self.channels[channel.index()]
  }

  pub fn channel_mut(&mut self, channel: Channel) -> &mut VoxelStore {
    &mut self.channels[channel.index()]
  }

  /// Drop all voxel data and reallocate every channel at `size`.
  pub fn set_block_size(&mut self, size: IVec3) {
    self.config.size = size;
    for store in &mut self.channels {
      store.set_block_size(size);
    }
  }

  /// Resize keeping overlapping chunks; the block origin moves by
  /// `origin_offset` chunks.
  pub fn resize_block(&mut self, new_size: IVec3, origin_offset: IVec3) {
    self.config.size = new_size;
    self.config.origin += origin_offset;
    for store in &mut self.channels {
      store.resize_block(new_size, origin_offset);
    }
  }

  pub fn store_voxels<V: VoxelValue>(
    &mut self,
    channel: Channel,
    subchannel: usize,
    chunk: IVec3,
    src: &[V],
    stride_x: usize,
    stride_y: usize,
  ) -> Result<()> {
    self
      .channel_mut(channel)
      .store_voxels(subchannel, chunk, src, stride_x, stride_y)
  }

  pub fn load_voxels<V: VoxelValue>(
    &self,
    channel: Channel,
    subchannel: usize,
    chunk: IVec3,
    dest: &mut [V],
    stride_x: usize,
    stride_y: usize,
  ) -> Result<()> {
    self
      .channel(channel)
      .load_voxels(subchannel, chunk, dest, stride_x, stride_y)
  }

  pub fn fill_chunk(&mut self, channel: Channel, subchannel: usize, chunk: IVec3, value: u8) -> Result<()> {
    self.channel_mut(channel).fill_chunk(subchannel, chunk, value)
  }

  /// Read one voxel at a block-local native coordinate.
  pub fn voxel(&self, channel: Channel, subchannel: usize, voxel: IVec3) -> Result<u8> {
    let (chunk, index) = locate(voxel);
    let mut raster = [0u8; CHUNK_VOLUME];
    self.load_voxels(channel, subchannel, chunk, &mut raster, CHUNK_SIZE, CHUNK_SIZE_SQ)?;
    Ok(raster[index])
  }

  /// Write one voxel at a block-local native coordinate.
  ///
  /// The owning chunk is decompressed, patched and recompressed; on error the
  /// chunk keeps its previous contents.
  pub fn set_voxel(&mut self, channel: Channel, subchannel: usize, voxel: IVec3, value: u8) -> Result<()> {
    let (chunk, index) = locate(voxel);
    let mut raster = [0u8; CHUNK_VOLUME];
    self.load_voxels(channel, subchannel, chunk, &mut raster, CHUNK_SIZE, CHUNK_SIZE_SQ)?;
    if raster[index] == value {
      return Ok(());
    }
    raster[index] = value;
    self.store_voxels(channel, subchannel, chunk, &raster, CHUNK_SIZE, CHUNK_SIZE_SQ)
  }

  /// Immutable view of the current contents for mesh builds.
  pub fn snapshot(&self) -> BlockSnapshot {
    BlockSnapshot {
      inner: Arc::new(SnapshotData {
        config: self.config.clone(),
        channels: self.channels.clone(),
      }),
    }
  }
}

#[derive(Debug)]
struct SnapshotData {
  config: BlockConfig,
  channels: [VoxelStore; 3],
}

/// Frozen copy of a block's slot tables, cheap to clone and share across
/// build threads.
#[derive(Clone, Debug)]
pub struct BlockSnapshot {
  inner: Arc<SnapshotData>,
}

impl BlockSnapshot {
  pub fn config(&self) -> &BlockConfig {
    &self.inner.config
  }

  pub fn size(&self) -> IVec3 {
    self.inner.config.size
  }

  /// World chunk coordinate of the block's first chunk.
  pub fn origin(&self) -> IVec3 {
    self.inner.config.origin
  }

  pub fn channel(&self, channel: Channel) -> &VoxelStore {
    &self.inner.channels[channel.index()]
  }

  pub fn load_voxels<V: VoxelValue>(
    &self,
    channel: Channel,
    subchannel: usize,
    chunk: IVec3,
    dest: &mut [V],
    stride_x: usize,
    stride_y: usize,
  ) -> Result<()> {
    self
      .channel(channel)
      .load_voxels(subchannel, chunk, dest, stride_x, stride_y)
  }

  pub fn voxel(&self, channel: Channel, subchannel: usize, voxel: IVec3) -> Result<u8> {
    let (chunk, index) = locate(voxel);
    let mut raster = [0u8; CHUNK_VOLUME];
    self.load_voxels(channel, subchannel, chunk, &mut raster, CHUNK_SIZE, CHUNK_SIZE_SQ)?;
    Ok(raster[index])
  }
}

#[cfg(test)]
#[path = "block_test.rs"]
mod block_test;

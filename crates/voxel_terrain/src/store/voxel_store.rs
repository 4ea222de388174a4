//! Per-chunk compressed storage for one voxel channel.
//!
//! ```text
//! slots: [ sub 0: chunk 0 .. chunk N-1 | sub 1: chunk 0 .. chunk N-1 | ... ]
//!
//! chunk linear index = x + y * size.x + z * size.x * size.y
//! ```
//!
//! Each slot is one of:
//! - `Empty` / `Solid`: the whole chunk holds the matching sentinel byte
//! - `Compressed`: a run-length stream in a heap-owned buffer
//!
//! Slots are replaced wholesale on write, so cloning a store (a snapshot)
//! only clones `Arc`s and later writes never disturb the clone.

use std::sync::Arc;

use glam::IVec3;

use super::heap::{VoxelBuffer, VoxelHeap};
use super::rle;
use crate::constants::{CHUNK_SIZE, CHUNK_VOLUME, EMPTY_VOXEL, SOLID_VOXEL};
use crate::error::{Result, TerrainError};

/// Byte-sized voxel element accepted by raster transfers.
pub trait VoxelValue: Copy {
  fn to_byte(self) -> u8;
  fn from_byte(byte: u8) -> Self;
}

impl VoxelValue for u8 {
  #[inline(always)]
  fn to_byte(self) -> u8 {
    self
  }

  #[inline(always)]
  fn from_byte(byte: u8) -> Self {
    byte
  }
}

impl VoxelValue for i8 {
  #[inline(always)]
  fn to_byte(self) -> u8 {
    self as u8
  }

  #[inline(always)]
  fn from_byte(byte: u8) -> Self {
    byte as i8
  }
}

/// Storage state of one chunk.
#[derive(Clone, Debug, Default)]
pub enum ChunkSlot {
  #[default]
  Empty,
  Solid,
  Compressed(Arc<VoxelBuffer>),
}

impl ChunkSlot {
  /// Byte every voxel holds, when the slot is uniform.
  pub fn uniform_value(&self) -> Option<u8> {
    match self {
      ChunkSlot::Empty => Some(EMPTY_VOXEL),
      ChunkSlot::Solid => Some(SOLID_VOXEL),
      ChunkSlot::Compressed(_) => None,
    }
  }
}

/// Validate raster strides and return the minimum buffer length they need.
fn raster_extent(stride_x: usize, stride_y: usize) -> Result<usize> {
  if stride_x < CHUNK_SIZE || stride_y < stride_x * CHUNK_SIZE {
    return Err(TerrainError::InvalidStride { stride_x, stride_y });
  }
  let last = CHUNK_SIZE - 1;
  Ok(last + last * stride_x + last * stride_y + 1)
}

/// Compressed chunk grid for one channel with one or more subchannels.
#[derive(Clone, Debug)]
pub struct VoxelStore {
  heap: VoxelHeap,
  subchannels: usize,
  size: IVec3,
  slots: Vec<ChunkSlot>,
}

impl VoxelStore {
  pub fn new(heap: VoxelHeap, subchannels: usize, size: IVec3) -> Self {
    let mut store = Self {
      heap,
      subchannels,
      size: IVec3::ZERO,
      slots: Vec::new(),
    };
    store.set_block_size(size);
    store
  }

  pub fn size(&self) -> IVec3 {
    self.size
  }

  pub fn subchannel_count(&self) -> usize {
    self.subchannels
  }

  pub fn heap(&self) -> &VoxelHeap {
    &self.heap
  }

  fn chunk_count(&self) -> usize {
    (self.size.x * self.size.y * self.size.z) as usize
  }

  pub fn contains_chunk(&self, chunk: IVec3) -> bool {
    chunk.cmpge(IVec3::ZERO).all() && chunk.cmplt(self.size).all()
  }

  fn slot_index(&self, subchannel: usize, chunk: IVec3) -> Result<usize> {
    if subchannel >= self.subchannels {
      return Err(TerrainError::InvalidSubchannel {
        subchannel,
        count: self.subchannels,
      });
    }
    if !self.contains_chunk(chunk) {
      return Err(TerrainError::ChunkOutOfBounds { chunk });
    }
    let linear = chunk.x + chunk.y * self.size.x + chunk.z * self.size.x * self.size.y;
    Ok(subchannel * self.chunk_count() + linear as usize)
  }

  pub fn slot(&self, subchannel: usize, chunk: IVec3) -> Result<&ChunkSlot> {
    let index = self.slot_index(subchannel, chunk)?;
    Ok(&self.slots[index])
  }

  /// Reallocate to `size` chunks; every slot becomes `Empty`.
  pub fn set_block_size(&mut self, size: IVec3) {
    let size = size.max(IVec3::ZERO);
    let count = (size.x * size.y * size.z) as usize * self.subchannels;
    self.size = size;
    self.slots = vec![ChunkSlot::Empty; count];
  }

  /// Resize keeping chunks that remain in range.
  ///
  /// Chunk `c` of the old grid lands at `c - origin_offset` in the new one;
  /// chunks that fall outside are released.
  pub fn resize_block(&mut self, new_size: IVec3, origin_offset: IVec3) {
    let mut resized = Self {
      heap: self.heap.clone(),
      subchannels: self.subchannels,
      size: IVec3::ZERO,
      slots: Vec::new(),
    };
    resized.set_block_size(new_size);

    for subchannel in 0..self.subchannels {
      for z in 0..self.size.z {
        for y in 0..self.size.y {
          for x in 0..self.size.x {
            let old = IVec3::new(x, y, z);
            let Ok(target) = resized.slot_index(subchannel, old - origin_offset) else {
              continue;
            };
            if let Ok(source) = self.slot_index(subchannel, old) {
              resized.slots[target] = std::mem::take(&mut self.slots[source]);
            }
          }
        }
      }
    }

    *self = resized;
  }

  /// Compress a strided raster into the chunk slot.
  ///
  /// Element `(x, y, z)` is read from `src[x + y * stride_x + z * stride_y]`.
  /// The slot is only replaced once the new buffer exists.
  pub fn store_voxels<V: VoxelValue>(
    &mut self,
    subchannel: usize,
    chunk: IVec3,
    src: &[V],
    stride_x: usize,
    stride_y: usize,
  ) -> Result<()> {
    let index = self.slot_index(subchannel, chunk)?;
    let needed = raster_extent(stride_x, stride_y)?;
    if src.len() < needed {
      return Err(TerrainError::SourceTooSmall {
        needed,
        len: src.len(),
      });
    }

    let mut raster = [0u8; CHUNK_VOLUME];
    for z in 0..CHUNK_SIZE {
      for y in 0..CHUNK_SIZE {
        let row = y * stride_x + z * stride_y;
        let out = (y + z * CHUNK_SIZE) * CHUNK_SIZE;
        for x in 0..CHUNK_SIZE {
          raster[out + x] = src[row + x].to_byte();
        }
      }
    }

    self.slots[index] = self.encode_slot(&raster)?;
    Ok(())
  }

  /// Set a whole chunk to one byte value.
  pub fn fill_chunk(&mut self, subchannel: usize, chunk: IVec3, value: u8) -> Result<()> {
    let index = self.slot_index(subchannel, chunk)?;
    self.slots[index] = self.encode_slot(&[value; CHUNK_VOLUME])?;
    Ok(())
  }

  fn encode_slot(&self, raster: &[u8; CHUNK_VOLUME]) -> Result<ChunkSlot> {
    let stream = rle::compress(raster);
    let slot = match rle::constant_value(&stream) {
      Some(EMPTY_VOXEL) => ChunkSlot::Empty,
      Some(SOLID_VOXEL) => ChunkSlot::Solid,
      _ => return Ok(ChunkSlot::Compressed(self.heap.allocate(&stream)?)),
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(?slot, "chunk collapsed to sentinel slot");
    Ok(slot)
  }

  /// Decompress the chunk into a strided raster.
  ///
  /// Element `(x, y, z)` is written to `dest[x + y * stride_x + z * stride_y]`;
  /// other elements of `dest` are left untouched.
  pub fn load_voxels<V: VoxelValue>(
    &self,
    subchannel: usize,
    chunk: IVec3,
    dest: &mut [V],
    stride_x: usize,
    stride_y: usize,
  ) -> Result<()> {
    let index = self.slot_index(subchannel, chunk)?;
    let needed = raster_extent(stride_x, stride_y)?;
    if dest.len() < needed {
      return Err(TerrainError::SourceTooSmall {
        needed,
        len: dest.len(),
      });
    }

    let mut raster = [0u8; CHUNK_VOLUME];
    match &self.slots[index] {
      ChunkSlot::Compressed(buffer) => {
        if let Err(err) = rle::decompress(buffer, &mut raster) {
          #[cfg(feature = "tracing")]
          tracing::warn!(?chunk, subchannel, %err, "stored chunk failed to decode");
          return Err(err);
        }
      }
      uniform => {
        let value = uniform.uniform_value().unwrap_or(EMPTY_VOXEL);
        let value = V::from_byte(value);
        for z in 0..CHUNK_SIZE {
          for y in 0..CHUNK_SIZE {
            let row = y * stride_x + z * stride_y;
            dest[row..row + CHUNK_SIZE].fill(value);
          }
        }
        return Ok(());
      }
    }

    for z in 0..CHUNK_SIZE {
      for y in 0..CHUNK_SIZE {
        let row = y * stride_x + z * stride_y;
        let src = (y + z * CHUNK_SIZE) * CHUNK_SIZE;
        for x in 0..CHUNK_SIZE {
          dest[row + x] = V::from_byte(raster[src + x]);
        }
      }
    }
    Ok(())
  }

  /// Persisted form of one chunk: `None` when empty, `[SOLID_VOXEL]` when
  /// solid, otherwise the run-length stream.
  pub fn export_chunk(&self, subchannel: usize, chunk: IVec3) -> Result<Option<Vec<u8>>> {
    Ok(match self.slot(subchannel, chunk)? {
      ChunkSlot::Empty => None,
      ChunkSlot::Solid => Some(vec![SOLID_VOXEL]),
      ChunkSlot::Compressed(buffer) => Some(buffer.to_vec()),
    })
  }

  /// Restore a chunk from [`VoxelStore::export_chunk`] output.
  ///
  /// Streams are fully decoded before the slot is replaced.
  pub fn import_chunk(&mut self, subchannel: usize, chunk: IVec3, data: Option<&[u8]>) -> Result<()> {
    let index = self.slot_index(subchannel, chunk)?;
    let slot = match data {
      None => ChunkSlot::Empty,
      Some([SOLID_VOXEL]) => ChunkSlot::Solid,
      Some(stream) => {
        let mut raster = [0u8; CHUNK_VOLUME];
        if let Err(err) = rle::decompress(stream, &mut raster) {
          #[cfg(feature = "tracing")]
          tracing::warn!(?chunk, subchannel, %err, "rejected corrupt chunk import");
          return Err(err);
        }
        self.encode_slot(&raster)?
      }
    };
    self.slots[index] = slot;
    Ok(())
  }
}

#[cfg(test)]
#[path = "voxel_store_test.rs"]
mod voxel_store_test;

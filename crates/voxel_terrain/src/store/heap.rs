//! Byte-accounted heap for compressed chunk buffers.
//!
//! Every [`VoxelBuffer`] is charged against its heap when allocated and
//! credited back on drop, so `used_bytes` always equals the padded size of
//! the buffers still alive (including those held by snapshots).

use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Result, TerrainError};

/// Buffers are padded to this alignment.
pub const BUFFER_ALIGN: usize = 4;

#[derive(Debug)]
struct HeapState {
  used: AtomicUsize,
  limit: usize,
}

/// Shared handle to a voxel heap.
#[derive(Clone, Debug)]
pub struct VoxelHeap {
  state: Arc<HeapState>,
}

impl Default for VoxelHeap {
  fn default() -> Self {
    Self::new()
  }
}

impl VoxelHeap {
  /// Heap without a byte limit.
  pub fn new() -> Self {
    Self::with_limit(usize::MAX)
  }

  pub fn with_limit(limit: usize) -> Self {
    Self {
      state: Arc::new(HeapState {
        used: AtomicUsize::new(0),
        limit,
      }),
    }
  }

  pub fn used_bytes(&self) -> usize {
    self.state.used.load(Ordering::Acquire)
  }

  pub fn limit(&self) -> usize {
    self.state.limit
  }

  /// Copy `bytes` into a new padded buffer charged to this heap.
  ///
  /// On failure nothing is charged and the caller's state is untouched.
  pub fn allocate(&self, bytes: &[u8]) -> Result<Arc<VoxelBuffer>> {
    let padded = bytes.len().next_multiple_of(BUFFER_ALIGN);
    self.charge(padded)?;

    let mut data = Vec::new();
    if data.try_reserve_exact(padded).is_err() {
      self.credit(padded);
      return Err(TerrainError::OutOfMemory {
        requested: padded,
        available: self.available(),
      });
    }
    data.extend_from_slice(bytes);
    data.resize(padded, 0);

    Ok(Arc::new(VoxelBuffer {
      data: data.into_boxed_slice(),
      len: bytes.len(),
      heap: Arc::clone(&self.state),
    }))
  }

  fn available(&self) -> usize {
    self.state.limit.saturating_sub(self.used_bytes())
  }

  fn charge(&self, bytes: usize) -> Result<()> {
    let limit = self.state.limit;
    self
      .state
      .used
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
        used.checked_add(bytes).filter(|&total| total <= limit)
      })
      .map(|_| ())
      .map_err(|used| TerrainError::OutOfMemory {
        requested: bytes,
        available: limit.saturating_sub(used),
      })
  }

  fn credit(&self, bytes: usize) {
    self.state.used.fetch_sub(bytes, Ordering::AcqRel);
  }
}

/// Immutable compressed chunk bytes owned by a [`VoxelHeap`].
#[derive(Debug)]
pub struct VoxelBuffer {
  data: Box<[u8]>,
  len: usize,
  heap: Arc<HeapState>,
}

impl VoxelBuffer {
  /// Bytes including alignment padding.
  pub fn padded_len(&self) -> usize {
    self.data.len()
  }
}

impl Deref for VoxelBuffer {
  type Target = [u8];

  fn deref(&self) -> &[u8] {
    &self.data[..self.len]
  }
}

impl Drop for VoxelBuffer {
  fn drop(&mut self) {
    self.heap.used.fetch_sub(self.data.len(), Ordering::AcqRel);
  }
}

#[cfg(test)]
#[path = "heap_test.rs"]
mod heap_test;

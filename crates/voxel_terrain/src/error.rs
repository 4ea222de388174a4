//! Error types for voxel storage and chunk builds.

use glam::IVec3;
use thiserror::Error;

/// Errors produced by the voxel store and the chunk mesher.
///
/// Running out of triangle budget is not an error: a build that hits the cap
/// still succeeds and reports [`crate::BuildStatus::Truncated`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerrainError {
  #[error("corrupt voxel data at byte {offset}: {reason}")]
  CorruptVoxelData { offset: usize, reason: &'static str },

  #[error("voxel heap exhausted: requested {requested} bytes, {available} available")]
  OutOfMemory { requested: usize, available: usize },

  #[error("chunk {chunk} is outside the block")]
  ChunkOutOfBounds { chunk: IVec3 },

  #[error("subchannel {subchannel} does not exist (channel has {count})")]
  InvalidSubchannel { subchannel: usize, count: usize },

  #[error("detail level {level} is not supported")]
  InvalidDetailLevel { level: u32 },

  #[error("invalid raster strides ({stride_x}, {stride_y})")]
  InvalidStride { stride_x: usize, stride_y: usize },

  #[error("voxel buffer too small: need {needed} elements, got {len}")]
  SourceTooSmall { needed: usize, len: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TerrainError>;

impl TerrainError {
  pub(crate) fn corrupt(offset: usize, reason: &'static str) -> Self {
    TerrainError::CorruptVoxelData { offset, reason }
  }
}

//! Chunk layout and fixed-point constants for 16³ voxel chunks.
//!
//! # Chunk Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CHUNK LAYOUT                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Voxel index:   0     1     2    ...    13    14    15 │ 16 (next chunk)│
//! │                 │     │                             │  │  │             │
//! │                 └──────── 16 owned voxels ──────────┘  │  └─ +1 corner  │
//! │                                                         │    read from  │
//! │                 cells 0..15 use corners 0..16           │    neighbor   │
//! │                                                                         │
//! │  A chunk at detail level L covers 16·2^L native voxels per axis and is  │
//! │  meshed as 16³ coarse cells sampled at stride 2^L.                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Memory Layout
//!
//! ```text
//! Raster layout (X innermost):
//!
//! index = x + y * 16 + z * 256
//!       = x | y << 4 | z << 8
//! ```
//!
//! # Coordinate System
//!
//! ```text
//!         +Z
//!          │
//!          │  +Y
//!          │ /
//!          └───────── +X
//!
//! Cell corner indices (binary: ZYX):
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```
//!
//! # Fixed-Point Positions
//!
//! Vertex positions are computed in 1/256 voxel units so that two chunks
//! computing the same edge crossing produce bit-identical results.

/// Voxels per chunk axis.
pub const CHUNK_SIZE: usize = 16;

/// Voxels per chunk face (16² = 256).
pub const CHUNK_SIZE_SQ: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Voxels per chunk (16³ = 4096).
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Bit shift for Y in the raster index (log2(16) = 4).
pub const Y_SHIFT: u32 = 4;

/// Bit shift for Z in the raster index (log2(256) = 8).
pub const Z_SHIFT: u32 = 8;

/// Mask for extracting a single axis from a raster index.
pub const INDEX_MASK: usize = 0x0F;

/// Fractional bits of fixed-point vertex positions.
pub const VOXEL_FRACTION_BITS: u32 = 8;

/// One voxel in fixed-point units.
pub const FRACTION_ONE: i32 = 1 << VOXEL_FRACTION_BITS;

/// Density byte for "fully empty" (+127).
pub const EMPTY_VOXEL: u8 = 0x7F;

/// Density byte for "fully solid" (-127).
pub const SOLID_VOXEL: u8 = 0x81;

/// Primary material value marking a cell that must not produce geometry.
pub const DEAD_MATERIAL: u8 = 0xFF;

/// Hard cap on triangles emitted for one chunk build.
pub const MAX_TERRAIN_TRIANGLE_COUNT: usize = 10240;

/// Coarsest supported detail level (chunk spans 16·2^4 = 256 native voxels).
pub const MAX_DETAIL_LEVEL: u32 = 4;

/// Number of independent render-stamp slots tracked per chunk.
pub const STAMP_SLOTS: usize = 4;

/// Default skirt depth in 1/256 of a coarse cell (a quarter cell).
pub const DEFAULT_TRANSITION_WIDTH: u8 = 64;

/// Convert chunk-local coordinates to a raster index.
#[inline(always)]
pub const fn coord_to_index(x: usize, y: usize, z: usize) -> usize {
  x | (y << Y_SHIFT) | (z << Z_SHIFT)
}

/// Convert a raster index back to chunk-local coordinates.
#[inline(always)]
pub const fn index_to_coord(idx: usize) -> (usize, usize, usize) {
  let x = idx & INDEX_MASK;
  let y = (idx >> Y_SHIFT) & INDEX_MASK;
  let z = idx >> Z_SHIFT;
  (x, y, z)
}

/// Lattice offsets of the 8 cell corners (bit0 = x, bit1 = y, bit2 = z).
pub const CORNER_DELTAS: [[i32; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [0, 1, 0],
  [1, 1, 0],
  [0, 0, 1],
  [1, 0, 1],
  [0, 1, 1],
  [1, 1, 1],
];

/// Native voxel stride of a chunk at the given detail level.
#[inline(always)]
pub const fn level_stride(level: u32) -> i32 {
  1 << level
}

/// Native voxels spanned by a chunk at the given detail level.
#[inline(always)]
pub const fn level_extent(level: u32) -> i32 {
  CHUNK_SIZE as i32 * level_stride(level)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;

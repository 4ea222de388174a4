//! voxel_terrain - Engine independent voxel terrain meshing
//!
//! Turns a chunked, run-length compressed signed-density field into triangle
//! meshes at multiple detail levels, with transition skirts that stitch a
//! coarse chunk to finer neighbors without cracks.
//!
//! # Features
//!
//! - **Voxel Store**: Sparse per-chunk RLE storage with empty/solid sentinels
//!   and copy-on-write snapshots for concurrent builds
//! - **Base Mesher**: Marching cubes at native resolution with fixed-point
//!   crossings, so adjacent chunks agree bit-exactly on shared faces
//! - **LOD Mesher**: Coarse interior, ambiguous-cell triangulation choice,
//!   surface material voting and per-face transition skirts
//! - **Border State**: Per-frame skirt masks from neighbor detail stamps
//!
//! # Example
//!
//! ```ignore
//! use voxel_terrain::{build_chunk, Block, BlockConfig, Channel, MeshConfig};
//!
//! let mut block = Block::new(BlockConfig::new(IVec3::ONE));
//! block.store_voxels(Channel::Density, 0, IVec3::ZERO, &densities, 16, 256)?;
//!
//! let mesh = build_chunk(&block.snapshot(), IVec3::ZERO, &MeshConfig::default())?;
//! println!("Generated {} vertices, {} triangles",
//!     mesh.vertices.len(), mesh.triangle_count());
//! ```

pub mod constants;
pub mod edge_table;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use constants::{
  coord_to_index, index_to_coord, level_extent, level_stride, CHUNK_SIZE, CHUNK_VOLUME, EMPTY_VOXEL,
  MAX_DETAIL_LEVEL, MAX_TERRAIN_TRIANGLE_COUNT, SOLID_VOXEL,
};
pub use error::{Result, TerrainError};
pub use types::{
  BlockConfig, BuildStatus, ChunkMesh, Density, Face, MaterialPair, MeshConfig, MinMaxAABB, TerrainVertex,
};

// Compressed voxel storage
pub mod store;
pub use store::{Block, BlockSnapshot, Channel, ChunkSlot, VoxelHeap, VoxelStore, MATERIAL_PRIMARY, MATERIAL_SECONDARY};

// Decompressed chunk neighborhoods
pub mod view;
pub use view::{TerrainViews, VoxelView};

// Regular and transition cell tables
pub mod tables;

// Base-level mesher
pub mod mesher;
pub use mesher::build_chunk;

// LOD mesher and transition skirts
pub mod lod;
pub use lod::{build_lod_chunk, build_lod_chunk_faces, BorderRenderData, LodChunkMesh};

// Per-frame skirt selection
pub mod border;
pub use border::{draw_ranges, resolve_position, BorderState, DetailStamps, LodChunk, SkirtState};

// Task queue for parallel builds
pub mod task_queue;
pub use task_queue::{BuildCompletion, BuildRequest, BuildStage};

pub mod metrics;

#[cfg(test)]
mod test_utils;

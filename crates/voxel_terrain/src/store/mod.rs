//! Voxel chunk store: compressed per-chunk channels, heap accounting and
//! snapshots.

pub mod block;
pub mod heap;
pub mod rle;
pub mod voxel_store;

pub use block::{Block, BlockSnapshot, Channel, MATERIAL_PRIMARY, MATERIAL_SECONDARY};
pub use heap::{VoxelBuffer, VoxelHeap};
pub use voxel_store::{ChunkSlot, VoxelStore, VoxelValue};

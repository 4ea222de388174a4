//! Base-level marching-cubes mesher.
//!
//! Meshes one chunk at native resolution from a [`BlockSnapshot`]:
//!
//! ```text
//! snapshot ──► TerrainViews ──► CellExtractor ──► finish ──► ChunkMesh
//!              (chunk + halo)   (cells, cache)    (filter, remap, world)
//! ```
//!
//! Every build owns its scratch state, so builds of different chunks can run
//! concurrently against the same snapshot.

pub(crate) mod cache;
pub(crate) mod compact;
pub(crate) mod extract;
pub(crate) mod material;
pub(crate) mod vertex;

use glam::IVec3;

use self::extract::CellExtractor;
use crate::error::Result;
use crate::store::BlockSnapshot;
use crate::types::{ChunkMesh, MeshConfig};
use crate::view::TerrainViews;

/// Mesh `chunk` (block-local chunk coordinate) at native resolution.
///
/// Returns the partial mesh flagged [`crate::BuildStatus::Truncated`] when
/// the triangle budget runs out. Fails when the chunk lies outside the
/// block or a stored stream is corrupt.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesher::build_chunk"))]
pub fn build_chunk(snapshot: &BlockSnapshot, chunk: IVec3, config: &MeshConfig) -> Result<ChunkMesh> {
  let views = TerrainViews::new(snapshot, chunk, 0)?;
  let mut extractor = CellExtractor::new(&views, config, chunk, 0);

  {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("regular_cells").entered();
    extractor.extract_regular_cells();
  }

  Ok(extractor.finish(snapshot.origin()).mesh)
}

//! LOD mesher: coarse interior plus transition skirts.
//!
//! # Index Buffer Layout
//!
//! ```text
//! ┌───────────────┬────────┬────────┬─────┬────────┐
//! │   interior    │ skirt  │ skirt  │ ... │ skirt  │
//! │   triangles   │ face 0 │ face 1 │     │ face 5 │
//! └───────────────┴────────┴────────┴─────┴────────┘
//!  interior_triangle_count   face_ranges[f] = (start, count)
//! ```
//!
//! The renderer draws the interior plus the skirts of live faces in one
//! indexed call (see [`crate::border::draw_ranges`]). Vertices within one
//! coarse cell of a face carry a `position1` pulled in by the skirt depth;
//! the vertex stage picks it on faces whose skirt is live.

pub(crate) mod dual;
pub(crate) mod transition;
pub(crate) mod triangulation;

use glam::IVec3;

use crate::constants::MAX_DETAIL_LEVEL;
use crate::error::{Result, TerrainError};
use crate::mesher::extract::{CellExtractor, INTERIOR_RUN};
use crate::store::BlockSnapshot;
use crate::types::{ChunkMesh, Face, MeshConfig};
use crate::view::TerrainViews;

/// Where the interior and each face's skirt live in the index buffer.
///
/// Ranges are in triangles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BorderRenderData {
  pub interior_triangle_count: u32,
  /// `(start, count)` per face, in [`Face`] index order.
  pub face_ranges: [(u32, u32); 6],
  /// Faces whose skirt geometry was built.
  pub built_mask: u8,
}

impl BorderRenderData {
  /// Triangle range of one face's skirt.
  pub fn face_range(&self, face: Face) -> (u32, u32) {
    self.face_ranges[face.index()]
  }
}

/// Mesh of one LOD chunk.
#[derive(Clone, Debug, Default)]
pub struct LodChunkMesh {
  pub mesh: ChunkMesh,
  pub border: BorderRenderData,
}

impl LodChunkMesh {
  /// Wrap a base-level mesh: everything is interior, no skirts.
  pub fn from_base(mesh: ChunkMesh) -> Self {
    let border = BorderRenderData {
      interior_triangle_count: mesh.triangle_count() as u32,
      face_ranges: [(mesh.triangle_count() as u32, 0); 6],
      built_mask: 0,
    };
    Self { mesh, border }
  }
}

/// Mesh `chunk` (in level-`level` chunk units) with skirts on all faces.
pub fn build_lod_chunk(snapshot: &BlockSnapshot, chunk: IVec3, level: u32, config: &MeshConfig) -> Result<LodChunkMesh> {
  build_lod_chunk_faces(snapshot, chunk, level, Face::ALL_MASK, config)
}

/// Mesh `chunk` with skirts only on the faces in `faces` (bit per face).
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "lod::build_lod_chunk"))]
pub fn build_lod_chunk_faces(
  snapshot: &BlockSnapshot,
  chunk: IVec3,
  level: u32,
  faces: u8,
  config: &MeshConfig,
) -> Result<LodChunkMesh> {
  if level == 0 || level > MAX_DETAIL_LEVEL {
    return Err(TerrainError::InvalidDetailLevel { level });
  }
  let views = TerrainViews::new(snapshot, chunk, level)?;
  let mut extractor = CellExtractor::new(&views, config, chunk, level);

  {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("regular_cells").entered();
    extractor.extract_regular_cells();
  }

  let mut built_mask = 0u8;
  if !extractor.truncated {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("mip_borders").entered();
    for face in Face::ALL.into_iter().filter(|f| faces & f.bit() != 0) {
      if !extractor.build_mip_border(face) {
        break;
      }
      built_mask |= face.bit();
    }
  }

  let compact = extractor.finish(snapshot.origin());
  let mut face_ranges = [(0, 0); 6];
  for face in Face::ALL {
    face_ranges[face.index()] = compact.runs[1 + face.index()];
  }
  let border = BorderRenderData {
    interior_triangle_count: compact.runs[INTERIOR_RUN].1,
    face_ranges,
    built_mask,
  };

  #[cfg(feature = "tracing")]
  tracing::debug!(
    ?chunk,
    level,
    triangles = compact.mesh.triangle_count(),
    interior = border.interior_triangle_count,
    "built lod chunk"
  );

  Ok(LodChunkMesh {
    mesh: compact.mesh,
    border,
  })
}

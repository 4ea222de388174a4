//! Border state tracking for LOD chunks.
//!
//! Every frame the renderer decides, per LOD chunk, which of the six skirts
//! to draw. A skirt is live when the neighbor across that face is missing or
//! was drawn finer than this chunk during the current frame:
//!
//! ```text
//!   neighbor        finer stamp == current?    skirt    border_state
//!   ─────────────   ───────────────────────    ─────    ────────────
//!   none            -                          live     0.0
//!   present         yes (drawn finer)          live     0.0
//!   present         no                         off      1.0
//! ```
//!
//! Stamps are plain counters published through atomics, so a neighbor's
//! state can be read while it is being updated for the next frame.
//!
//! # Skirt State Machine
//!
//! ```text
//!                 live faces not built
//!  NoSkirtNeeded ─────────────────────► SkirtPending(mask) ──attach──► SkirtBuilt(mask)
//!        ▲                                      ▲                            │
//!        └──────── attach (no faces) ───────────┴──── invalidate / new face ─┘
//! ```

use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::constants::STAMP_SLOTS;
use crate::lod::{BorderRenderData, LodChunkMesh};
use crate::types::{Face, TerrainVertex};

// =============================================================================
// Stamps
// =============================================================================

/// Per-chunk record of the frames in which the chunk was drawn finer.
///
/// Stamp 0 means never.
#[derive(Debug, Default)]
pub struct DetailStamps {
  finer: [AtomicU32; STAMP_SLOTS],
}

impl DetailStamps {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record that the chunk was replaced by finer chunks during `stamp`.
  pub fn mark_finer(&self, stamp_index: usize, stamp: u32) {
    debug_assert!(stamp_index < STAMP_SLOTS, "stamp index {} out of range", stamp_index);
    self.finer[stamp_index % STAMP_SLOTS].store(stamp, Ordering::Release);
  }

  pub fn finer_stamp(&self, stamp_index: usize) -> u32 {
    debug_assert!(stamp_index < STAMP_SLOTS, "stamp index {} out of range", stamp_index);
    self.finer[stamp_index % STAMP_SLOTS].load(Ordering::Acquire)
  }

  /// Whether the chunk was drawn finer during `stamp`.
  pub fn is_finer(&self, stamp_index: usize, stamp: u32) -> bool {
    stamp != 0 && self.finer_stamp(stamp_index) == stamp
  }
}

// =============================================================================
// Border State
// =============================================================================

/// Per-face skirt blend factors for the vertex stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderState {
  /// `[low/high][x/y/z]`: 1.0 when the skirt is suppressed, 0.0 when live.
  pub border_state: [[f32; 3]; 2],
  /// Faces whose skirt is live.
  pub live_mask: u8,
}

impl Default for BorderState {
  /// Every skirt live until neighbors are known.
  fn default() -> Self {
    Self {
      border_state: [[0.0; 3]; 2],
      live_mask: Face::ALL_MASK,
    }
  }
}

impl BorderState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Recompute from the six neighbors (in [`Face`] index order).
  pub fn update_border_state(
    &mut self,
    neighbors: [Option<&DetailStamps>; 6],
    stamp_index: usize,
    current_stamp: u32,
  ) -> u8 {
    debug_assert!(stamp_index < STAMP_SLOTS, "stamp index {} out of range", stamp_index);
    let mut live_mask = 0;
    for face in Face::ALL {
      let live = match neighbors[face.index()] {
        None => true,
        Some(stamps) => stamps.is_finer(stamp_index, current_stamp),
      };
      self.border_state[face.is_high() as usize][face.axis()] = if live { 0.0 } else { 1.0 };
      if live {
        live_mask |= face.bit();
      }
    }
    self.live_mask = live_mask;
    live_mask
  }

  #[inline]
  pub fn is_live(&self, face: Face) -> bool {
    self.live_mask & face.bit() != 0
  }

  /// Blend factor for one axis of a vertex with `border_flags`.
  #[inline]
  fn axis_factor(&self, border_flags: u8, axis: usize) -> f32 {
    if border_flags >> (2 * axis) & 1 == 1 {
      self.border_state[0][axis]
    } else if border_flags >> (2 * axis + 1) & 1 == 1 {
      self.border_state[1][axis]
    } else {
      1.0
    }
  }
}

/// Position a vertex is drawn at: `position1 + (position - position1) * state`
/// on every axis flagged in `border_flags`.
pub fn resolve_position(vertex: &TerrainVertex, state: &BorderState) -> [f32; 3] {
  std::array::from_fn(|axis| {
    let factor = state.axis_factor(vertex.border_flags, axis);
    let p0 = vertex.position[axis];
    let p1 = vertex.position1[axis];
    p1 + (p0 - p1) * factor
  })
}

/// Index ranges to draw: the interior plus the skirts in `live_mask` that
/// were built, with adjacent ranges merged.
pub fn draw_ranges(border: &BorderRenderData, live_mask: u8) -> SmallVec<[Range<u32>; 7]> {
  let mut ranges: SmallVec<[Range<u32>; 7]> = SmallVec::new();
  let mut push = |start: u32, count: u32| {
    if count == 0 {
      return;
    }
    let range = start * 3..(start + count) * 3;
    match ranges.last_mut() {
      Some(last) if last.end == range.start => last.end = range.end,
      _ => ranges.push(range),
    }
  };

  push(0, border.interior_triangle_count);
  for face in Face::ALL {
    if live_mask & border.built_mask & face.bit() != 0 {
      let (start, count) = border.face_range(face);
      push(start, count);
    }
  }
  ranges
}

// =============================================================================
// LOD Chunk
// =============================================================================

/// Skirt geometry state of one LOD chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkirtState {
  #[default]
  NoSkirtNeeded,
  /// Faces waiting for a (re)build.
  SkirtPending(u8),
  /// Faces present in the current mesh.
  SkirtBuilt(u8),
}

/// Mesh, stamps and border state of one LOD chunk.
#[derive(Debug)]
pub struct LodChunk {
  pub level: u32,
  stamps: Arc<DetailStamps>,
  mesh: Option<LodChunkMesh>,
  border: BorderState,
  skirt: SkirtState,
}

impl LodChunk {
  pub fn new(level: u32) -> Self {
    Self {
      level,
      stamps: Arc::new(DetailStamps::new()),
      mesh: None,
      border: BorderState::new(),
      skirt: SkirtState::NoSkirtNeeded,
    }
  }

  /// Stamps neighbors read when computing their own border state.
  pub fn stamps(&self) -> &Arc<DetailStamps> {
    &self.stamps
  }

  pub fn mesh(&self) -> Option<&LodChunkMesh> {
    self.mesh.as_ref()
  }

  pub fn border(&self) -> &BorderState {
    &self.border
  }

  pub fn skirt_state(&self) -> SkirtState {
    self.skirt
  }

  /// Refresh the live mask for this frame and request any live skirt the
  /// mesh lacks. Returns the live mask.
  pub fn update_border(&mut self, neighbors: [Option<&DetailStamps>; 6], stamp_index: usize, stamp: u32) -> u8 {
    let live = self.border.update_border_state(neighbors, stamp_index, stamp);
    self.skirt = match self.skirt {
      SkirtState::NoSkirtNeeded if live != 0 => SkirtState::SkirtPending(live),
      SkirtState::SkirtBuilt(built) if live & !built != 0 => SkirtState::SkirtPending(built | live),
      SkirtState::SkirtPending(pending) => SkirtState::SkirtPending(pending | live),
      state => state,
    };
    live
  }

  /// Faces the next build should include, if a build is due.
  pub fn pending_faces(&self) -> Option<u8> {
    match self.skirt {
      SkirtState::SkirtPending(mask) => Some(mask),
      _ if self.mesh.is_none() => Some(self.border.live_mask),
      _ => None,
    }
  }

  /// Install a freshly built mesh.
  pub fn attach(&mut self, mesh: LodChunkMesh) {
    let built = mesh.border.built_mask;
    self.skirt = if built == 0 {
      SkirtState::NoSkirtNeeded
    } else {
      SkirtState::SkirtBuilt(built)
    };
    self.mesh = Some(mesh);
  }

  /// Voxel content changed: keep drawing the old mesh until a rebuild lands.
  pub fn invalidate(&mut self) {
    self.skirt = match self.skirt {
      SkirtState::SkirtBuilt(mask) | SkirtState::SkirtPending(mask) => SkirtState::SkirtPending(mask),
      SkirtState::NoSkirtNeeded => SkirtState::SkirtPending(self.border.live_mask),
    };
  }

  /// Index ranges for this frame's draw call.
  pub fn draw_ranges(&self) -> SmallVec<[Range<u32>; 7]> {
    match &self.mesh {
      Some(mesh) => draw_ranges(&mesh.border, self.border.live_mask),
      None => SmallVec::new(),
    }
  }
}

#[cfg(test)]
#[path = "border_test.rs"]
mod border_test;

//! Task queue for parallel chunk builds.
//!
//! Following the IStage pattern: Enqueue → Tick → Completions
//!
//! Each request carries its own [`BlockSnapshot`], so builds never observe
//! edits made after they were enqueued and need no locking. Every build
//! allocates its own scratch storage.
//!
//! Uses rayon for parallel execution on all platforms.

use crossbeam_channel::Sender;
use glam::IVec3;
use rayon::prelude::*;
use web_time::Instant;

use crate::error::Result;
use crate::lod::{build_lod_chunk_faces, LodChunkMesh};
use crate::mesher::build_chunk;
use crate::metrics::BuildMetrics;
use crate::store::BlockSnapshot;
use crate::types::{Face, MeshConfig};

/// Request to build one chunk.
#[derive(Clone)]
pub struct BuildRequest {
  /// Unique identifier for this request
  pub id: u64,
  /// Voxel data the build reads
  pub snapshot: BlockSnapshot,
  /// Chunk coordinate in level-`level` chunk units
  pub chunk: IVec3,
  /// Detail level; 0 builds at native resolution without skirts
  pub level: u32,
  /// Faces to build skirts for (LOD levels only)
  pub faces: u8,
  /// Build configuration
  pub config: MeshConfig,
}

impl BuildRequest {
  fn run(&self) -> Result<LodChunkMesh> {
    if self.level == 0 {
      build_chunk(&self.snapshot, self.chunk, &self.config).map(LodChunkMesh::from_base)
    } else {
      build_lod_chunk_faces(&self.snapshot, self.chunk, self.level, self.faces, &self.config)
    }
  }
}

/// Finished build.
#[derive(Debug)]
pub struct BuildCompletion {
  /// Request ID this completion corresponds to
  pub id: u64,
  pub chunk: IVec3,
  pub level: u32,
  /// Mesh, or the reason the chunk could not be built
  pub result: Result<LodChunkMesh>,
  /// Raw build time in microseconds
  pub build_time_us: u64,
}

/// Build stage that processes requests in parallel.
pub struct BuildStage {
  /// Pending requests waiting to be processed
  pending: Vec<BuildRequest>,
  /// Completed results ready to be collected
  completed: Vec<BuildCompletion>,
  /// Receives completions instead of `completed` when attached
  sink: Option<Sender<BuildCompletion>>,
  metrics: BuildMetrics,
  /// Next request ID
  next_id: u64,
}

impl Default for BuildStage {
  fn default() -> Self {
    Self::new()
  }
}

impl BuildStage {
  /// Create a new build stage.
  pub fn new() -> Self {
    Self {
      pending: Vec::new(),
      completed: Vec::new(),
      sink: None,
      metrics: BuildMetrics::new(),
      next_id: 0,
    }
  }

  /// Send completions over `sink` instead of buffering them.
  pub fn with_sink(mut self, sink: Sender<BuildCompletion>) -> Self {
    self.sink = Some(sink);
    self
  }

  /// Enqueue a native-resolution build, returning the assigned ID.
  pub fn enqueue(&mut self, snapshot: BlockSnapshot, chunk: IVec3, config: MeshConfig) -> u64 {
    self.enqueue_lod(snapshot, chunk, 0, Face::ALL_MASK, config)
  }

  /// Enqueue a build at `level` with skirts on `faces`.
  pub fn enqueue_lod(
    &mut self,
    snapshot: BlockSnapshot,
    chunk: IVec3,
    level: u32,
    faces: u8,
    config: MeshConfig,
  ) -> u64 {
    let id = self.next_id;
    self.next_id += 1;

    self.pending.push(BuildRequest {
      id,
      snapshot,
      chunk,
      level,
      faces,
      config,
    });

    id
  }

  /// Process pending requests in parallel and move completions to output.
  /// Returns the number of tasks processed this tick.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "task_queue::tick"))]
  pub fn tick(&mut self) -> usize {
    if self.pending.is_empty() {
      return 0;
    }

    let requests = std::mem::take(&mut self.pending);
    let count = requests.len();

    let completions: Vec<BuildCompletion> = requests
      .into_par_iter()
      .map(|req| {
        let start = Instant::now();
        let result = req.run();
        let build_time_us = start.elapsed().as_micros() as u64;
        BuildCompletion {
          id: req.id,
          chunk: req.chunk,
          level: req.level,
          result,
          build_time_us,
        }
      })
      .collect();

    for completion in completions {
      self.metrics.record_completion(&completion);

      #[cfg(feature = "tracing")]
      if let Err(err) = &completion.result {
        tracing::warn!(chunk = ?completion.chunk, level = completion.level, %err, "chunk build failed");
      }

      match &self.sink {
        Some(sink) => {
          if let Err(err) = sink.send(completion) {
            self.completed.push(err.into_inner());
          }
        }
        None => self.completed.push(completion),
      }
    }
    count
  }

  /// Take all buffered completions.
  pub fn drain_completions(&mut self) -> Vec<BuildCompletion> {
    std::mem::take(&mut self.completed)
  }

  /// Number of pending requests.
  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  /// Number of completed results waiting to be drained.
  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// True when no work remains.
  pub fn is_idle(&self) -> bool {
    self.pending.is_empty() && self.completed.is_empty()
  }

  pub fn metrics(&self) -> &BuildMetrics {
    &self.metrics
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;

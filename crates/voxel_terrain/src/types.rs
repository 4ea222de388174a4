//! Core data types for chunk meshing.

use glam::IVec3;

use crate::constants::{DEAD_MATERIAL, DEFAULT_TRANSITION_WIDTH, MAX_TERRAIN_TRIANGLE_COUNT};

/// Signed density sample.
/// Negative = inside/solid, zero or positive = outside/empty.
pub type Density = i8;

/// Material pair carried by a surface vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialPair {
  pub primary: u8,
  pub secondary: u8,
}

impl MaterialPair {
  pub const fn new(primary: u8, secondary: u8) -> Self {
    Self { primary, secondary }
  }

  /// Cells resolving to a dead material produce no geometry.
  #[inline]
  pub const fn is_dead(self) -> bool {
    self.primary == DEAD_MATERIAL
  }
}

/// One of the six chunk faces.
///
/// Index layout: `2 * axis + side` (low x, high x, low y, high y, low z,
/// high z). Bit `index` is the face's bit in every 6-bit face mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Face(u8);

impl Face {
  pub const ALL: [Face; 6] = [Face(0), Face(1), Face(2), Face(3), Face(4), Face(5)];

  /// Mask with every face bit set.
  pub const ALL_MASK: u8 = 0b11_1111;

  pub const fn new(axis: usize, high: bool) -> Self {
    Face((axis as u8) << 1 | high as u8)
  }

  pub const fn from_index(index: usize) -> Self {
    Face(index as u8 % 6)
  }

  #[inline]
  pub const fn index(self) -> usize {
    self.0 as usize
  }

  #[inline]
  pub const fn axis(self) -> usize {
    (self.0 >> 1) as usize
  }

  #[inline]
  pub const fn is_high(self) -> bool {
    self.0 & 1 == 1
  }

  #[inline]
  pub const fn bit(self) -> u8 {
    1 << self.0
  }

  /// Face of the neighbor that touches this one.
  pub const fn opposite(self) -> Self {
    Face(self.0 ^ 1)
  }

  /// Unit step from the chunk towards the neighbor across this face.
  pub fn normal(self) -> IVec3 {
    let mut n = IVec3::ZERO;
    n[self.axis()] = if self.is_high() { 1 } else { -1 };
    n
  }
}

/// Output vertex with all mesh attributes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainVertex {
  /// Position in world units.
  pub position: [f32; 3],

  /// Position used while a border skirt on a flagged face is live.
  pub position1: [f32; 3],

  /// Surface normal (unit vector, pointing towards empty space).
  pub normal: [f32; 3],

  /// Primary material, secondary material, blend.
  pub material: [u8; 3],

  /// Faces (bit per [`Face`] index) whose skirt moves this vertex.
  pub border_flags: u8,
}

impl Default for TerrainVertex {
  fn default() -> Self {
    Self {
      position: [0.0; 3],
      position1: [0.0; 3],
      normal: [0.0, 0.0, 1.0],
      material: [0; 3],
      border_flags: 0,
    }
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }

  pub fn contains(&self, point: [f32; 3]) -> bool {
    (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// How a chunk build finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildStatus {
  #[default]
  Complete,
  /// The triangle cap was reached; remaining cells were skipped.
  Truncated,
}

/// Mesh produced for one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
  pub vertices: Vec<TerrainVertex>,

  /// Triangle indices (3 per triangle), counter-clockwise seen from empty
  /// space.
  pub indices: Vec<u16>,

  pub bounds: MinMaxAABB,

  pub status: BuildStatus,
}

impl ChunkMesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn is_truncated(&self) -> bool {
    self.status == BuildStatus::Truncated
  }

  /// Vertex positions of one triangle.
  pub fn triangle(&self, index: usize) -> [[f32; 3]; 3] {
    let base = index * 3;
    [0, 1, 2].map(|k| self.vertices[self.indices[base + k] as usize].position)
  }
}

/// Configuration for chunk builds.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshConfig {
  /// World units per native voxel.
  pub voxel_scale: f32,

  /// Triangle cap per chunk build (at most [`MAX_TERRAIN_TRIANGLE_COUNT`]).
  pub max_triangles: usize,

  /// Skirt depth in 1/256 of a coarse cell.
  pub transition_width: u8,

  /// Pick between the two fan triangulations of ambiguous coarse cells by
  /// comparing against the real center sample.
  pub choose_triangulation: bool,
}

impl Default for MeshConfig {
  fn default() -> Self {
    Self {
      voxel_scale: 1.0,
      max_triangles: MAX_TERRAIN_TRIANGLE_COUNT,
      transition_width: DEFAULT_TRANSITION_WIDTH,
      choose_triangulation: true,
    }
  }
}

impl MeshConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_voxel_scale(mut self, scale: f32) -> Self {
    self.voxel_scale = scale;
    self
  }

  pub fn with_max_triangles(mut self, max: usize) -> Self {
    self.max_triangles = max.min(MAX_TERRAIN_TRIANGLE_COUNT);
    self
  }

  pub fn with_transition_width(mut self, width: u8) -> Self {
    self.transition_width = width;
    self
  }

  pub fn with_choose_triangulation(mut self, enabled: bool) -> Self {
    self.choose_triangulation = enabled;
    self
  }
}

/// Configuration for a block of chunks.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockConfig {
  /// Block dimensions in chunks.
  pub size: IVec3,

  /// World chunk coordinate of the block's first chunk.
  pub origin: IVec3,

  /// Byte limit for compressed chunk buffers (`None` = unlimited).
  pub heap_limit: Option<usize>,
}

impl Default for BlockConfig {
  fn default() -> Self {
    Self {
      size: IVec3::ONE,
      origin: IVec3::ZERO,
      heap_limit: None,
    }
  }
}

impl BlockConfig {
  pub fn new(size: IVec3) -> Self {
    Self {
      size,
      ..Self::default()
    }
  }

  pub fn with_origin(mut self, origin: IVec3) -> Self {
    self.origin = origin;
    self
  }

  pub fn with_heap_limit(mut self, bytes: usize) -> Self {
    self.heap_limit = Some(bytes);
    self
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

//! Build-time vertex storage with material-aware sharing.
//!
//! A crossing on one lattice edge may be emitted by up to four cells. Cells
//! with the same material share one vertex; a cell with a different material
//! gets its own copy, linked from the first through `next_shared`:
//!
//! ```text
//! cache slot ──► v12 (stone) ──► v40 (grass) ──► NO_VERTEX
//! ```

use glam::{IVec3, Vec3};

use crate::constants::CHUNK_SIZE;
use crate::types::MaterialPair;

pub(crate) const NO_VERTEX: u32 = u32::MAX;

/// Identity of a crossing on the coarse cell lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum VertexKey {
  /// Crossing snapped onto a lattice point.
  Corner(IVec3),
  /// Crossing strictly inside the edge from `lattice` along `axis`.
  Edge(IVec3, u8),
}

impl VertexKey {
  #[inline]
  pub fn lattice(&self) -> IVec3 {
    match *self {
      VertexKey::Corner(p) | VertexKey::Edge(p, _) => p,
    }
  }

  /// Deck slot: 0 for a corner, 1 + axis for an edge.
  #[inline]
  pub fn slot(&self) -> usize {
    match *self {
      VertexKey::Corner(_) => 0,
      VertexKey::Edge(_, axis) => 1 + axis as usize,
    }
  }

  /// Face bits of the chunk boundary planes containing the crossing.
  pub fn boundary_mask(&self) -> u8 {
    let p = self.lattice();
    let along = match *self {
      VertexKey::Corner(_) => None,
      VertexKey::Edge(_, axis) => Some(axis as usize),
    };
    let mut mask = 0;
    for axis in 0..3 {
      if along == Some(axis) {
        continue;
      }
      if p[axis] == 0 {
        mask |= 1 << (2 * axis);
      } else if p[axis] == CHUNK_SIZE as i32 {
        mask |= 1 << (2 * axis + 1);
      }
    }
    mask
  }
}

/// Vertex in chunk-local fixed-point coordinates.
#[derive(Clone, Debug)]
pub(crate) struct BuildVertex {
  pub position0: IVec3,
  pub position1: IVec3,
  pub normal: Vec3,
  pub material: MaterialPair,
  pub blend: u8,
  pub border_flags: u8,
  /// Face bits of the boundary planes `position0` lies in.
  pub status: u8,
  pub next_shared: u32,
}

/// Face bits of the chunk boundary planes a fixed-point position lies on.
pub(crate) fn boundary_status(position: IVec3, extent: i32) -> u8 {
  let mut status = 0;
  for axis in 0..3 {
    if position[axis] == 0 {
      status |= 1 << (2 * axis);
    } else if position[axis] == extent {
      status |= 1 << (2 * axis + 1);
    }
  }
  status
}

#[derive(Debug, Default)]
pub(crate) struct VertexArena {
  pub vertices: Vec<BuildVertex>,
}

impl VertexArena {
  pub fn push(&mut self, vertex: BuildVertex) -> u32 {
    self.vertices.push(vertex);
    (self.vertices.len() - 1) as u32
  }

  #[inline]
  pub fn get(&self, index: u32) -> &BuildVertex {
    &self.vertices[index as usize]
  }

  /// Vertex on the chain starting at `head` carrying `material`, appending
  /// a copy of `head` when no such vertex exists yet.
  pub fn add_shared_vertex(&mut self, head: u32, material: MaterialPair) -> u32 {
    let mut current = head;
    loop {
      let vertex = &self.vertices[current as usize];
      if vertex.material == material {
        return current;
      }
      if vertex.next_shared == NO_VERTEX {
        break;
      }
      current = vertex.next_shared;
    }

    let mut copy = self.vertices[head as usize].clone();
    copy.material = material;
    copy.next_shared = NO_VERTEX;
    let index = self.push(copy);
    self.vertices[current as usize].next_shared = index;
    index
  }
}

#[cfg(test)]
#[path = "vertex_test.rs"]
mod vertex_test;

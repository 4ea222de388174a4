//! Rolling two-deck vertex cache.
//!
//! Cells are visited layer by layer along z. A cell in layer `cz` touches
//! lattice planes `cz` and `cz + 1` only, so two decks indexed by plane
//! parity hold every vertex a cell can reuse:
//!
//! ```text
//! layer cz:  deck[cz & 1]       ◄── plane cz     (filled by layer cz - 1)
//!            deck[(cz + 1) & 1] ◄── plane cz + 1 (cleared, filled now)
//! ```
//!
//! Each deck stores, per lattice point of its plane, the vertex created for
//! a snapped corner and for the x, y and z edges starting there.

use super::vertex::{VertexKey, NO_VERTEX};
use crate::constants::CHUNK_SIZE;

const DECK_SIDE: usize = CHUNK_SIZE + 1;
const SLOTS: usize = 4;
const DECK_LEN: usize = DECK_SIDE * DECK_SIDE * SLOTS;

pub(crate) struct DeckCache {
  decks: [Box<[u32; DECK_LEN]>; 2],
  layer: i32,
}

impl DeckCache {
  pub fn new() -> Self {
    Self {
      decks: [Box::new([NO_VERTEX; DECK_LEN]), Box::new([NO_VERTEX; DECK_LEN])],
      layer: 0,
    }
  }

  /// Prepare for the cells of layer `cz`.
  pub fn begin_layer(&mut self, cz: i32) {
    if cz == 0 {
      self.decks[0].fill(NO_VERTEX);
      self.decks[1].fill(NO_VERTEX);
    } else {
      self.decks[((cz + 1) & 1) as usize].fill(NO_VERTEX);
    }
    self.layer = cz;
  }

  #[inline]
  fn index(&self, key: &VertexKey) -> (usize, usize) {
    let p = key.lattice();
    debug_assert!(p.z == self.layer || p.z == self.layer + 1, "key outside the live decks");
    let deck = (p.z & 1) as usize;
    let slot = (p.y as usize * DECK_SIDE + p.x as usize) * SLOTS + key.slot();
    (deck, slot)
  }

  #[inline]
  pub fn get(&self, key: &VertexKey) -> Option<u32> {
    let (deck, slot) = self.index(key);
    let vertex = self.decks[deck][slot];
    (vertex != NO_VERTEX).then_some(vertex)
  }

  #[inline]
  pub fn set(&mut self, key: &VertexKey, vertex: u32) {
    let (deck, slot) = self.index(key);
    self.decks[deck][slot] = vertex;
  }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

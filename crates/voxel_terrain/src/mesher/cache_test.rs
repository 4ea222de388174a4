use glam::IVec3;

use super::*;

#[test]
fn test_upper_plane_survives_one_layer() {
  let mut cache = DeckCache::new();
  cache.begin_layer(0);
  let top = VertexKey::Edge(IVec3::new(3, 4, 1), 0);
  let bottom = VertexKey::Corner(IVec3::new(3, 4, 0));
  cache.set(&top, 7);
  cache.set(&bottom, 8);

  cache.begin_layer(1);
  // plane 1 is now the lower deck and keeps its vertices
  assert_eq!(cache.get(&top), Some(7));
  // plane 2 reuses plane 0's deck and starts empty
  assert_eq!(cache.get(&VertexKey::Corner(IVec3::new(3, 4, 2))), None);
}

#[test]
fn test_slots_are_independent() {
  let mut cache = DeckCache::new();
  cache.begin_layer(0);
  let p = IVec3::new(16, 16, 0);
  cache.set(&VertexKey::Edge(p, 1), 1);
  assert_eq!(cache.get(&VertexKey::Edge(p, 1)), Some(1));
  assert_eq!(cache.get(&VertexKey::Edge(p, 2)), None);
  assert_eq!(cache.get(&VertexKey::Corner(p)), None);
}

#[test]
fn test_first_layer_clears_both_decks() {
  let mut cache = DeckCache::new();
  cache.begin_layer(5);
  cache.set(&VertexKey::Corner(IVec3::new(0, 0, 5)), 3);
  cache.set(&VertexKey::Corner(IVec3::new(0, 0, 6)), 4);
  cache.begin_layer(0);
  assert_eq!(cache.get(&VertexKey::Corner(IVec3::new(0, 0, 0))), None);
  assert_eq!(cache.get(&VertexKey::Corner(IVec3::new(0, 0, 1))), None);
}

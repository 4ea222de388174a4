use super::*;

fn border_data() -> BorderRenderData {
  // interior 0..100, skirts of 10 triangles on faces 0, 2 and 5
  BorderRenderData {
    interior_triangle_count: 100,
    face_ranges: [(100, 10), (110, 0), (110, 10), (120, 0), (120, 0), (120, 10)],
    built_mask: Face::ALL_MASK,
  }
}

fn lod_mesh(built_mask: u8) -> LodChunkMesh {
  LodChunkMesh {
    border: BorderRenderData {
      built_mask,
      ..border_data()
    },
    ..LodChunkMesh::default()
  }
}

// =============================================================================
// Stamps and Border State
// =============================================================================

#[test]
fn test_stamp_zero_never_matches() {
  let stamps = DetailStamps::new();
  assert!(!stamps.is_finer(0, 0));
  stamps.mark_finer(1, 7);
  assert!(stamps.is_finer(1, 7));
  assert!(!stamps.is_finer(0, 7));
  assert!(!stamps.is_finer(1, 8));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "stamp index")]
fn test_stamp_index_past_slots_panics() {
  DetailStamps::new().mark_finer(STAMP_SLOTS, 7);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "stamp index")]
fn test_border_update_rejects_bad_stamp_index() {
  BorderState::new().update_border_state([None; 6], STAMP_SLOTS + 1, 7);
}

#[test]
fn test_no_neighbors_all_skirts_live() {
  let mut state = BorderState::new();
  let live = state.update_border_state([None; 6], 0, 1);
  assert_eq!(live, Face::ALL_MASK);
  assert_eq!(state.border_state, [[0.0; 3]; 2]);
}

#[test]
fn test_neighbors_clear_skirts_one_by_one() {
  let neighbors: Vec<DetailStamps> = (0..6).map(|_| DetailStamps::new()).collect();
  let mut state = BorderState::new();
  let mut present: [Option<&DetailStamps>; 6] = [None; 6];

  for face in Face::ALL {
    present[face.index()] = Some(&neighbors[face.index()]);
    let live = state.update_border_state(present, 0, 3);
    assert_eq!(live & face.bit(), 0);
    assert!(!state.is_live(face));
    assert_eq!(state.border_state[face.is_high() as usize][face.axis()], 1.0);
  }
  assert_eq!(state.live_mask, 0);
}

#[test]
fn test_finer_neighbor_keeps_skirt_live() {
  let neighbors: Vec<DetailStamps> = (0..6).map(|_| DetailStamps::new()).collect();
  let present: [Option<&DetailStamps>; 6] = std::array::from_fn(|i| Some(&neighbors[i]));
  let high_y = Face::new(1, true);
  neighbors[high_y.index()].mark_finer(2, 41);

  let mut state = BorderState::new();
  assert_eq!(state.update_border_state(present, 2, 41), high_y.bit());
  assert_eq!(state.border_state[1][1], 0.0);

  // next frame the neighbor is coarse again
  assert_eq!(state.update_border_state(present, 2, 42), 0);
}

#[test]
fn test_resolve_position_blends_flagged_axes() {
  let vertex = TerrainVertex {
    position: [0.0, 5.0, 31.0],
    position1: [0.5, 5.0, 30.5],
    border_flags: Face::new(0, false).bit() | Face::new(2, true).bit(),
    ..TerrainVertex::default()
  };
  let mut state = BorderState::new();
  assert_eq!(resolve_position(&vertex, &state), [0.5, 5.0, 30.5]);

  state.border_state = [[1.0, 1.0, 1.0], [1.0, 1.0, 0.0]];
  assert_eq!(resolve_position(&vertex, &state), [0.0, 5.0, 30.5]);

  state.border_state = [[1.0; 3]; 2];
  assert_eq!(resolve_position(&vertex, &state), vertex.position);
}

// =============================================================================
// Draw Ranges
// =============================================================================

#[test]
fn test_draw_ranges_merge_adjacent_runs() {
  let ranges = draw_ranges(&border_data(), Face::ALL_MASK);
  assert_eq!(ranges.as_slice(), &[0..390]);
}

#[test]
fn test_draw_ranges_skip_dead_faces() {
  let live = Face::new(2, true).bit();
  let ranges = draw_ranges(&border_data(), live);
  assert_eq!(ranges.as_slice(), &[0..300, 360..390]);

  let ranges = draw_ranges(&border_data(), 0);
  assert_eq!(ranges.as_slice(), &[0..300]);
}

#[test]
fn test_draw_ranges_ignore_unbuilt_faces() {
  let border = BorderRenderData {
    built_mask: 0,
    ..border_data()
  };
  assert_eq!(draw_ranges(&border, Face::ALL_MASK).as_slice(), &[0..300]);
}

// =============================================================================
// Skirt State Machine
// =============================================================================

#[test]
fn test_new_chunk_requests_build() {
  let chunk = LodChunk::new(2);
  assert_eq!(chunk.skirt_state(), SkirtState::NoSkirtNeeded);
  assert_eq!(chunk.pending_faces(), Some(Face::ALL_MASK));
  assert!(chunk.draw_ranges().is_empty());
}

#[test]
fn test_skirt_lifecycle() {
  let neighbor = DetailStamps::new();
  let mut chunk = LodChunk::new(1);

  let live = chunk.update_border([None; 6], 0, 1);
  assert_eq!(chunk.skirt_state(), SkirtState::SkirtPending(live));

  chunk.attach(lod_mesh(live));
  assert_eq!(chunk.skirt_state(), SkirtState::SkirtBuilt(Face::ALL_MASK));
  assert_eq!(chunk.pending_faces(), None);
  assert_eq!(chunk.draw_ranges().as_slice(), &[0..390]);

  // all neighbors present and coarse: nothing to build, nothing to draw
  chunk.update_border([Some(&neighbor); 6], 0, 2);
  assert_eq!(chunk.skirt_state(), SkirtState::SkirtBuilt(Face::ALL_MASK));
  assert_eq!(chunk.draw_ranges().as_slice(), &[0..300]);

  chunk.invalidate();
  assert_eq!(chunk.pending_faces(), Some(Face::ALL_MASK));
}

#[test]
fn test_new_live_face_requests_rebuild() {
  let neighbor = DetailStamps::new();
  let mut chunk = LodChunk::new(1);
  let low_x = Face::new(0, false);

  let mut neighbors = [Some(&neighbor); 6];
  assert_eq!(chunk.update_border(neighbors, 0, 1), 0);
  assert_eq!(chunk.skirt_state(), SkirtState::NoSkirtNeeded);
  chunk.attach(lod_mesh(0));
  assert_eq!(chunk.skirt_state(), SkirtState::NoSkirtNeeded);

  neighbors[low_x.index()] = None;
  chunk.update_border(neighbors, 0, 2);
  assert_eq!(chunk.skirt_state(), SkirtState::SkirtPending(low_x.bit()));
  assert_eq!(chunk.mesh().map(|m| m.border.built_mask), Some(0));
}

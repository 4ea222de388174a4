use super::*;

#[test]
fn test_chunk_size_is_power_of_two() {
  assert!(CHUNK_SIZE.is_power_of_two());
  assert_eq!(1usize << Y_SHIFT, CHUNK_SIZE);
  assert_eq!(1usize << Z_SHIFT, CHUNK_SIZE_SQ);
}

#[test]
fn test_coord_to_index_roundtrip() {
  for idx in 0..CHUNK_VOLUME {
    let (x, y, z) = index_to_coord(idx);
    assert_eq!(coord_to_index(x, y, z), idx, "Roundtrip failed for index {}", idx);
  }
}

#[test]
fn test_raster_is_x_innermost() {
  assert_eq!(coord_to_index(1, 0, 0), 1);
  assert_eq!(coord_to_index(0, 1, 0), CHUNK_SIZE);
  assert_eq!(coord_to_index(0, 0, 1), CHUNK_SIZE_SQ);
}

#[test]
fn test_corner_deltas_match_bits() {
  for (i, delta) in CORNER_DELTAS.iter().enumerate() {
    assert_eq!(delta[0], (i & 1) as i32);
    assert_eq!(delta[1], ((i >> 1) & 1) as i32);
    assert_eq!(delta[2], ((i >> 2) & 1) as i32);
  }
}

#[test]
fn test_sentinels_are_signed_extremes() {
  assert_eq!(EMPTY_VOXEL as i8, 127);
  assert_eq!(SOLID_VOXEL as i8, -127);
}

#[test]
fn test_level_extent() {
  assert_eq!(level_extent(0), 16);
  assert_eq!(level_extent(2), 64);
  assert_eq!(level_extent(MAX_DETAIL_LEVEL), 256);
}

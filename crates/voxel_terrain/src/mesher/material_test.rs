use super::*;
use crate::store::{Channel, MATERIAL_PRIMARY};
use crate::test_utils::{block_from_fn, fill_channel};

fn views_for(block: &crate::store::Block, level: u32) -> TerrainViews {
  TerrainViews::new(&block.snapshot(), IVec3::ZERO, level).unwrap()
}

#[test]
fn test_dominant_material_counts_solid_corners() {
  let mut block = block_from_fn(IVec3::ONE, |p| if p.z == 0 { -10 } else { 10 });
  // three of four solid corners are material 7
  fill_channel(&mut block, Channel::Material, MATERIAL_PRIMARY, |p| {
    if p == IVec3::ZERO {
      4
    } else {
      7
    }
  });
  let views = views_for(&block, 0);
  let case = cell_case(&views, IVec3::ZERO, 1);
  assert_eq!(case, 0b0000_1111);
  let material = dominant_material(&views, IVec3::ZERO, 1, case);
  assert_eq!(material, MaterialPair::new(7, 2));
}

#[test]
fn test_dominant_material_tie_keeps_lowest_corner() {
  let mut block = block_from_fn(IVec3::ONE, |p| if p.x == 0 { -10 } else { 10 });
  fill_channel(&mut block, Channel::Material, MATERIAL_PRIMARY, |p| if p.y == 0 { 5 } else { 6 });
  let views = views_for(&block, 0);
  let case = cell_case(&views, IVec3::ZERO, 1);
  assert_eq!(dominant_material(&views, IVec3::ZERO, 1, case).primary, 5);
}

#[test]
fn test_find_best_material_votes_on_surface_cells() {
  // coarse cell at stride 4 whose surface sits at z = 2: the coarse corners
  // at z = 0 are material 3, the native surface cells touch material 9
  let mut block = block_from_fn(IVec3::ONE, |p| p.z * 8 - 20);
  fill_channel(&mut block, Channel::Material, MATERIAL_PRIMARY, |p| if p.z >= 2 { 9 } else { 3 });
  let views = views_for(&block, 2);
  let case = cell_case(&views, IVec3::ZERO, 4);
  assert_eq!(case, 0b0000_1111);
  assert_eq!(dominant_material(&views, IVec3::ZERO, 4, case).primary, 3);
  assert_eq!(find_best_material(&views, IVec3::ZERO, 4, case).primary, 9);
}

#[test]
fn test_find_best_material_matches_dominant_at_native_stride() {
  let block = block_from_fn(IVec3::ONE, |p| p.z * 8 - 60);
  let views = views_for(&block, 0);
  let base = IVec3::new(3, 3, 7);
  let case = cell_case(&views, base, 1);
  assert_eq!(
    find_best_material(&views, base, 1, case),
    dominant_material(&views, base, 1, case)
  );
}

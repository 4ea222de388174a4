//! Secondary vertex positions for live border skirts.
//!
//! When the neighbor across a face is rendered at finer detail, the outer
//! coarse cell layer on that face is squeezed inwards to make room for the
//! skirt: along the face axis, `[0, s]` maps onto `[w, s]` (and the high
//! side mirrors it), where `s` is one coarse cell and `w` the skirt depth.
//!
//! ```text
//!  face      w                s
//!   │────────┼────────────────┤        position0
//!   │        ├──────┬─────────┤        position1
//!   │ skirt  │ squeezed cell  │
//! ```

use glam::IVec3;

/// `position1` and border flags of a fixed-point chunk-local position.
///
/// `cell` is one coarse cell and `extent` the chunk size, both in
/// fixed-point units; `width` is the skirt depth in the same units.
pub(crate) fn dual_position(position: IVec3, cell: i32, extent: i32, width: i32) -> (IVec3, u8) {
  let mut displaced = position;
  let mut flags = 0u8;
  let squeeze = |offset: i32| width + (offset as i64 * (cell - width) as i64 / cell as i64) as i32;

  for axis in 0..3 {
    let c = position[axis];
    if c < cell {
      displaced[axis] = squeeze(c);
      flags |= 1 << (2 * axis);
    } else if c > extent - cell {
      displaced[axis] = extent - squeeze(extent - c);
      flags |= 1 << (2 * axis + 1);
    }
  }

  (displaced, flags)
}

#[cfg(test)]
#[path = "dual_test.rs"]
mod dual_test;

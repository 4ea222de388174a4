//! Isosurface tracing over the faces of a cell polyhedron.
//!
//! Each face lists its corners counter-clockwise around the outward normal.
//! Walking a face, every maximal arc of solid corners yields one segment from
//! the crossing where the walk enters solid to the crossing where it leaves.
//! Solid corners on an ambiguous face are therefore always cut off
//! separately, so two cells sharing the face agree on its segments.
//!
//! Each crossing edge is entered from one adjacent face and left through the
//! other, so segments chain into closed polygons. Polygon vertices come out
//! counter-clockwise seen from the empty side.

use smallvec::SmallVec;

/// Closed polygon as a list of edge ids.
pub type EdgePolygon = SmallVec<[u8; 12]>;

/// Trace all surface polygons of one case.
///
/// `inside(corner)` reports solidity, `edge_id(a, b)` names the edge
/// between two corners of the same face.
pub fn trace_polygons(
  faces: &[&[u8]],
  inside: impl Fn(u8) -> bool,
  edge_id: impl Fn(u8, u8) -> u8,
) -> SmallVec<[EdgePolygon; 4]> {
  let mut segments: SmallVec<[(u8, u8); 16]> = SmallVec::new();

  for face in faces {
    let n = face.len();
    for i in 0..n {
      let (a, b) = (face[i], face[(i + 1) % n]);
      if inside(a) || !inside(b) {
        continue;
      }
      let entry = edge_id(a, b);
      let mut j = (i + 1) % n;
      while !(inside(face[j]) && !inside(face[(j + 1) % n])) {
        j = (j + 1) % n;
      }
      let exit = edge_id(face[j], face[(j + 1) % n]);
      segments.push((entry, exit));
    }
  }

  let mut used: SmallVec<[bool; 16]> = SmallVec::from_elem(false, segments.len());
  let mut polygons = SmallVec::new();

  while let Some(first) = used.iter().position(|&u| !u) {
    used[first] = true;
    let (start, mut next) = segments[first];
    let mut polygon = EdgePolygon::new();
    polygon.push(start);

    for _ in 0..segments.len() {
      if next == start {
        break;
      }
      polygon.push(next);
      let Some(k) = (0..segments.len()).find(|&k| !used[k] && segments[k].0 == next) else {
        break;
      };
      used[k] = true;
      next = segments[k].1;
    }

    debug_assert_eq!(next, start, "open polygon while tracing cell faces");
    polygons.push(polygon);
  }

  polygons
}

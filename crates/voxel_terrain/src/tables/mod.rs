//! Cell case tables for regular and transition cells.
//!
//! # Table Layout
//!
//! ```text
//! case index ──► CellRecipe
//!                 ├─ class      equivalence class (polygon-size signature)
//!                 ├─ vertices   edge id per cell vertex
//!                 ├─ polygons   closed loops over `vertices`
//!                 └─ triangles  default fan triangulation of every polygon
//! ```
//!
//! Regular cells are the 256 corner cases of a cube. Transition cells are the
//! 512 cases of the 9 full-resolution samples on a chunk face. Both tables are
//! generated on first use by tracing the surface over the cell's faces (see
//! [`trace`]), which keeps the winding rule and the ambiguous-face rule
//! identical everywhere.

pub mod regular;
pub mod trace;
pub mod transition;

use std::sync::LazyLock;

use smallvec::SmallVec;

use self::trace::EdgePolygon;

/// Mesh recipe for one cell case.
#[derive(Clone, Debug, Default)]
pub struct CellRecipe {
  pub class: u8,
  pub vertices: SmallVec<[u8; 12]>,
  pub polygons: SmallVec<[SmallVec<[u8; 12]>; 4]>,
  pub triangles: SmallVec<[[u8; 3]; 12]>,
}

impl CellRecipe {
  /// Build a recipe from traced edge polygons.
  fn from_polygons(edge_polygons: &[EdgePolygon]) -> Self {
    let mut recipe = CellRecipe::default();
    for edge_polygon in edge_polygons {
      let mut polygon = SmallVec::new();
      for &edge in edge_polygon {
        let slot = match recipe.vertices.iter().position(|&e| e == edge) {
          Some(slot) => slot,
          None => {
            recipe.vertices.push(edge);
            recipe.vertices.len() - 1
          }
        };
        polygon.push(slot as u8);
      }
      for k in 1..polygon.len().saturating_sub(1) {
        recipe.triangles.push([polygon[0], polygon[k], polygon[k + 1]]);
      }
      recipe.polygons.push(polygon);
    }
    recipe
  }

  pub fn is_empty(&self) -> bool {
    self.triangles.is_empty()
  }

  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  /// Whether some polygon admits more than one fan triangulation.
  pub fn is_ambiguous(&self) -> bool {
    self.polygons.iter().any(|p| p.len() >= 4)
  }

  fn signature(&self) -> SmallVec<[usize; 4]> {
    let mut sizes: SmallVec<[usize; 4]> = self.polygons.iter().map(|p| p.len()).collect();
    sizes.sort_unstable();
    sizes
  }
}

/// All cases of one cell kind.
#[derive(Debug)]
pub struct CellTable {
  pub cases: Vec<CellRecipe>,
  pub class_count: usize,
}

impl CellTable {
  fn from_recipes(mut cases: Vec<CellRecipe>) -> Self {
    let mut signatures: Vec<SmallVec<[usize; 4]>> = Vec::new();
    for recipe in &mut cases {
      let signature = recipe.signature();
      let class = match signatures.iter().position(|s| *s == signature) {
        Some(class) => class,
        None => {
          signatures.push(signature);
          signatures.len() - 1
        }
      };
      recipe.class = class as u8;
    }
    Self {
      cases,
      class_count: signatures.len(),
    }
  }

  #[inline]
  pub fn recipe(&self, case: usize) -> &CellRecipe {
    &self.cases[case]
  }
}

/// 256 regular cube cases.
pub static REGULAR_CELLS: LazyLock<CellTable> = LazyLock::new(regular::build_table);

/// 512 transition cell cases.
pub static TRANSITION_CELLS: LazyLock<CellTable> = LazyLock::new(transition::build_table);

/// Whether triangles of a face's transition cells need their winding
/// reversed (faces in [`crate::Face`] index order).
pub const TRANSITION_FLIP: [bool; 6] = [false, true, false, true, false, true];

//! Cube geometry for occupied cells.
//!
//! Each cell becomes an axis-aligned cube with flat-shaded faces: 4 vertices
//! and 2 triangles per face, counter-clockwise when seen from outside.

use glam::DVec3;

use crate::bounds::DAabb3;
use crate::cells::CellContainer;

/// Vertices emitted per cell (6 faces x 4 corners).
pub const VERTICES_PER_CELL: usize = 24;
/// Indices emitted per cell (6 faces x 2 triangles x 3).
pub const INDICES_PER_CELL: usize = 36;

/// Output vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellVertex {
  pub position: [f32; 3],
  /// Outward face normal.
  pub normal: [f32; 3],
}

/// Renderable cube mesh for a set of cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellMesh {
  pub vertices: Vec<CellVertex>,

  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,

  /// Union of all cell boxes.
  pub bounds: DAabb3,
}

impl CellMesh {
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }
}

/// Face normal with two tangents, `u x v = normal`.
const FACES: [(DVec3, DVec3, DVec3); 6] = [
  (DVec3::X, DVec3::Y, DVec3::Z),
  (DVec3::NEG_X, DVec3::Z, DVec3::Y),
  (DVec3::Y, DVec3::Z, DVec3::X),
  (DVec3::NEG_Y, DVec3::X, DVec3::Z),
  (DVec3::Z, DVec3::X, DVec3::Y),
  (DVec3::NEG_Z, DVec3::Y, DVec3::X),
];

/// Build one cube per cell, sized by the container's unit size.
#[tracing::instrument(skip_all, fields(cells = cells.len()))]
pub fn build_cell_mesh(cells: &CellContainer) -> CellMesh {
  let mut mesh = CellMesh {
    vertices: Vec::with_capacity(cells.len() * VERTICES_PER_CELL),
    indices: Vec::with_capacity(cells.len() * INDICES_PER_CELL),
    bounds: DAabb3::EMPTY,
  };

  for cell in cells {
    let aabb = cells.cell_bounds(cell);
    let center = aabb.center();
    let h = aabb.half_extents();
    mesh.bounds = mesh.bounds.union(&aabb);

    for (normal, u, v) in FACES {
      let base = mesh.vertices.len() as u32;
      for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let position = center + h * (normal + u * su + v * sv);
        mesh.vertices.push(CellVertex {
          position: position.as_vec3().to_array(),
          normal: normal.as_vec3().to_array(),
        });
      }
      mesh
        .indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
  }

  mesh
}

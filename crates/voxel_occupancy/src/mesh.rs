//! Triangle mesh input.
//!
//! The mesh is the caller's scanned room surface: vertex positions plus a flat
//! index buffer, three indices per triangle. Validation is deferred to BVH
//! construction so malformed input surfaces as a single `GeometryError`.

use glam::DVec3;

use crate::bounds::DAabb3;
use crate::error::GeometryError;

/// Immutable triangulated surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
  /// Vertex positions in world units.
  pub positions: Vec<[f32; 3]>,

  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,
}

impl TriangleMesh {
  pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
    Self { positions, indices }
  }

  /// Build an unindexed mesh from a triangle soup.
  pub fn from_triangles(triangles: &[[[f32; 3]; 3]]) -> Self {
    let mut positions = Vec::with_capacity(triangles.len() * 3);
    for tri in triangles {
      positions.extend_from_slice(tri);
    }
    let indices = (0..positions.len() as u32).collect();
    Self { positions, indices }
  }

  /// Closed axis-aligned box surface: 8 vertices, 12 triangles.
  pub fn cuboid(center: [f32; 3], half_extents: [f32; 3]) -> Self {
    let mut mesh = Self::default();
    mesh.append_cuboid(center, half_extents);
    mesh
  }

  /// Append a closed box surface to this mesh.
  ///
  /// Used to assemble room fixtures (floor slab, walls, furniture) from boxes.
  pub fn append_cuboid(&mut self, center: [f32; 3], half_extents: [f32; 3]) {
    let base = self.positions.len() as u32;
    let [cx, cy, cz] = center;
    let [hx, hy, hz] = half_extents;

    // Corner i: bit 0 = +X, bit 1 = +Y, bit 2 = +Z
    for i in 0..8u32 {
      let sx = if i & 1 != 0 { hx } else { -hx };
      let sy = if i & 2 != 0 { hy } else { -hy };
      let sz = if i & 4 != 0 { hz } else { -hz };
      self.positions.push([cx + sx, cy + sy, cz + sz]);
    }

    const FACES: [[u32; 6]; 6] = [
      [0, 2, 6, 0, 6, 4], // -X
      [1, 5, 7, 1, 7, 3], // +X
      [0, 4, 5, 0, 5, 1], // -Y
      [2, 3, 7, 2, 7, 6], // +Y
      [0, 1, 3, 0, 3, 2], // -Z
      [4, 6, 7, 4, 7, 5], // +Z
    ];
    for face in FACES {
      self.indices.extend(face.iter().map(|i| base + i));
    }
  }

  /// Append another mesh, rebasing its indices.
  pub fn append(&mut self, other: &TriangleMesh) {
    let base = self.positions.len() as u32;
    self.positions.extend_from_slice(&other.positions);
    self.indices.extend(other.indices.iter().map(|i| base + i));
  }

  /// Number of complete triangles in the index buffer.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Returns true if no triangles are present.
  pub fn is_empty(&self) -> bool {
    self.triangle_count() == 0
  }

  /// Corners of triangle `i` in double precision.
  ///
  /// Panics if the triangle or one of its vertices is out of range.
  pub fn triangle(&self, i: usize) -> [DVec3; 3] {
    let idx = &self.indices[i * 3..i * 3 + 3];
    [
      to_dvec3(self.positions[idx[0] as usize]),
      to_dvec3(self.positions[idx[1] as usize]),
      to_dvec3(self.positions[idx[2] as usize]),
    ]
  }

  /// Bounds of all vertex positions, `None` for a mesh without vertices.
  pub fn bounds(&self) -> Option<DAabb3> {
    DAabb3::from_points(self.positions.iter().copied().map(to_dvec3))
  }

  /// Check buffer consistency without building anything.
  ///
  /// Every check the BVH build depends on lives here.
  pub fn validate(&self) -> Result<(), GeometryError> {
    if self.indices.len() % 3 != 0 {
      return Err(GeometryError::IndexCountNotTriangles {
        len: self.indices.len(),
      });
    }
    if self.indices.is_empty() {
      return Err(GeometryError::EmptyMesh);
    }

    if let Some((index, position)) = self
      .positions
      .iter()
      .enumerate()
      .find(|(_, p)| !p.iter().all(|c| c.is_finite()))
    {
      return Err(GeometryError::NonFiniteVertex {
        index,
        position: *position,
      });
    }

    let vertex_count = self.positions.len();
    for (i, &index) in self.indices.iter().enumerate() {
      if index as usize >= vertex_count {
        return Err(GeometryError::IndexOutOfRange {
          triangle: i / 3,
          index,
          vertex_count,
        });
      }
    }

    Ok(())
  }
}

#[inline]
pub(crate) fn to_dvec3(p: [f32; 3]) -> DVec3 {
  DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64)
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;

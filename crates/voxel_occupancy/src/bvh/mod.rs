//! Mesh adapter over parry's bounding volume hierarchy.
//!
//! Built once per mesh, immutable afterwards. Answers "does this box touch
//! any triangle?" in two steps:
//!
//! ```text
//! query box ──loosen──► parry Bvh::intersect_aabb ──► candidate triangle ids
//!                                                        │
//!                        parry cuboid/triangle SAT ◄─────┘
//! ```
//!
//! Leaf ids are the triangles' original indices, so results and lookups never
//! need a remapping table.

use std::ops::ControlFlow;

use glam::DVec3;
use parry3d_f64::partitioning::{Bvh, BvhBuildStrategy};
use parry3d_f64::shape::Triangle;

use crate::bounds::DAabb3;
use crate::error::GeometryError;
use crate::mesh::TriangleMesh;

pub mod triangle;

pub use triangle::{triangle_aabb, triangle_intersects_aabb, TOUCH_EPSILON};

use triangle::{contact_box, from_point, to_aabb, to_triangle, triangle_touches};

/// Bounding volume hierarchy over the triangles of one mesh.
///
/// Owns a double-precision copy of the triangles in source order, so the
/// source mesh can be dropped after the build. `Send + Sync`; share it with
/// `Arc` across passes.
#[derive(Clone)]
pub struct MeshBvh {
  tree: Bvh,
  triangles: Vec<Triangle>,
  bounds: DAabb3,
}

impl std::fmt::Debug for MeshBvh {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MeshBvh")
      .field("triangles", &self.triangles.len())
      .field("depth", &self.depth())
      .field("bounds", &self.bounds)
      .finish()
  }
}

impl MeshBvh {
  /// Build the hierarchy over every triangle of `mesh`.
  ///
  /// Fails if the mesh is empty or malformed (see [`TriangleMesh::validate`]).
  #[tracing::instrument(skip_all, name = "bvh::build", fields(triangles = mesh.triangle_count()))]
  pub fn build(mesh: &TriangleMesh) -> Result<Self, GeometryError> {
    mesh.validate()?;

    let corners: Vec<[DVec3; 3]> = (0..mesh.triangle_count()).map(|i| mesh.triangle(i)).collect();
    let bounds = corners
      .iter()
      .fold(DAabb3::EMPTY, |acc, tri| acc.union(&triangle_aabb(tri)));

    let leaves: Vec<_> = corners.iter().map(|tri| to_aabb(&triangle_aabb(tri))).collect();
    let tree = Bvh::from_leaves(BvhBuildStrategy::Binned, &leaves);
    let triangles = corners.iter().map(to_triangle).collect();

    let bvh = Self {
      tree,
      triangles,
      bounds,
    };

    tracing::debug!(
      triangles = bvh.triangles.len(),
      depth = bvh.depth(),
      "built mesh BVH"
    );

    Ok(bvh)
  }

  /// Check if at least one triangle touches `query`.
  ///
  /// Touching is inclusive: a triangle on the box boundary counts.
  pub fn intersects_box(&self, query: &DAabb3) -> bool {
    self
      .visit_box(query, |_| ControlFlow::Break(()))
      .is_break()
  }

  /// Original indices of every triangle touching `query`, ascending.
  pub fn triangles_in_box(&self, query: &DAabb3) -> Vec<u32> {
    let mut hits = Vec::new();
    let _ = self.visit_box(query, |id| {
      hits.push(id);
      ControlFlow::<()>::Continue(())
    });
    hits.sort_unstable();
    hits
  }

  /// Call `visitor` with the original index of each triangle touching
  /// `query`, stopping early on `Break`.
  pub fn visit_box<B>(
    &self,
    query: &DAabb3,
    mut visitor: impl FnMut(u32) -> ControlFlow<B>,
  ) -> ControlFlow<B> {
    let contact = contact_box(query);

    for id in self.tree.intersect_aabb(&contact) {
      let Some(tri) = self.triangles.get(id as usize) else {
        continue;
      };
      if triangle_touches(tri, &contact) {
        visitor(id)?;
      }
    }

    ControlFlow::Continue(())
  }

  /// Bounds of the whole mesh.
  pub fn bounds(&self) -> DAabb3 {
    self.bounds
  }

  /// Number of indexed triangles.
  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }

  /// Depth of the deepest leaf (root = 1).
  pub fn depth(&self) -> usize {
    self.tree.subtree_depth(0) as usize
  }

  /// The underlying parry hierarchy. Leaf ids are triangle indices.
  pub fn tree(&self) -> &Bvh {
    &self.tree
  }

  /// Corners of the triangle with original index `id`.
  pub fn triangle(&self, id: u32) -> Option<[DVec3; 3]> {
    self
      .triangles
      .get(id as usize)
      .map(|tri| [from_point(&tri.a), from_point(&tri.b), from_point(&tri.c)])
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

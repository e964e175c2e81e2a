//! Shared mesh fixtures for tests.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::DAabb3;
use crate::mesh::TriangleMesh;

/// Closed unit cube centered at the origin (half-extent 0.5).
pub fn unit_cube() -> TriangleMesh {
  TriangleMesh::cuboid([0.0; 3], [0.5; 3])
}

/// Small scanned-room stand-in: floor slab, two walls, a table and a crate.
///
/// Spans x, z in `[0, 4]` and y in `[0, 2.5]`.
pub fn room() -> TriangleMesh {
  let mut mesh = TriangleMesh::default();
  // Floor
  mesh.append_cuboid([2.0, -0.05, 2.0], [2.0, 0.05, 2.0]);
  // Back wall and left wall
  mesh.append_cuboid([2.0, 1.25, 0.05], [2.0, 1.25, 0.05]);
  mesh.append_cuboid([0.05, 1.25, 2.0], [0.05, 1.25, 2.0]);
  // Table top
  mesh.append_cuboid([2.5, 0.75, 2.5], [0.6, 0.03, 0.4]);
  // Crate in the corner
  mesh.append_cuboid([3.4, 0.25, 0.6], [0.25, 0.25, 0.25]);
  mesh
}

/// Navigable region of [`room`].
pub fn room_region() -> DAabb3 {
  DAabb3::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(4.0, 2.5, 4.0))
}

/// Seeded random triangle soup inside `[-extent, extent]^3`.
///
/// Triangles are small relative to the extent, so box queries hit a mix of
/// empty and occupied space.
pub fn random_soup(seed: u64, count: usize, extent: f32) -> TriangleMesh {
  let mut rng = StdRng::seed_from_u64(seed);
  let size = extent * 0.15;

  let triangles: Vec<[[f32; 3]; 3]> = (0..count)
    .map(|_| {
      let anchor = [
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
      ];
      let mut corner = || {
        [
          anchor[0] + rng.random_range(-size..size),
          anchor[1] + rng.random_range(-size..size),
          anchor[2] + rng.random_range(-size..size),
        ]
      };
      [corner(), corner(), corner()]
    })
    .collect();

  TriangleMesh::from_triangles(&triangles)
}

/// Seeded random query box inside `[-extent, extent]^3` with edges up to
/// `max_edge`.
pub fn random_box(rng: &mut StdRng, extent: f64, max_edge: f64) -> DAabb3 {
  let min = DVec3::new(
    rng.random_range(-extent..extent),
    rng.random_range(-extent..extent),
    rng.random_range(-extent..extent),
  );
  let size = DVec3::new(
    rng.random_range(0.0..max_edge),
    rng.random_range(0.0..max_edge),
    rng.random_range(0.0..max_edge),
  );
  DAabb3::new(min, min + size)
}

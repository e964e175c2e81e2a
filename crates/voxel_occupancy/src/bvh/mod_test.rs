use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::test_utils::{random_box, random_soup, room, unit_cube};

fn brute_force(mesh: &TriangleMesh, query: &DAabb3) -> Vec<u32> {
  (0..mesh.triangle_count())
    .filter(|&i| triangle_intersects_aabb(&mesh.triangle(i), query))
    .map(|i| i as u32)
    .collect()
}

#[test]
fn test_build_rejects_empty_mesh() {
  let err = MeshBvh::build(&TriangleMesh::default()).unwrap_err();
  assert_eq!(err, GeometryError::EmptyMesh);
}

#[test]
fn test_build_rejects_bad_indices() {
  let mesh = TriangleMesh::new(vec![[0.0; 3]; 4], vec![0, 1, 2, 3]);
  assert!(matches!(
    MeshBvh::build(&mesh),
    Err(GeometryError::IndexCountNotTriangles { len: 4 })
  ));
}

#[test]
fn test_single_triangle_is_one_leaf() {
  let mesh = TriangleMesh::from_triangles(&[[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]);
  let bvh = MeshBvh::build(&mesh).unwrap();

  assert_eq!(bvh.tree().leaf_count(), 1);
  assert_eq!(bvh.depth(), 1);
  assert_eq!(bvh.bounds(), DAabb3::new(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0)));
  assert!(bvh.intersects_box(&DAabb3::cube(DVec3::new(0.25, 0.25, 0.0), 0.1)));
}

#[test]
fn test_unit_cube_bounds_and_counts() {
  let bvh = MeshBvh::build(&unit_cube()).unwrap();

  assert_eq!(bvh.triangle_count(), 12);
  assert_eq!(bvh.tree().leaf_count(), 12);
  assert_eq!(bvh.bounds(), DAabb3::cube(DVec3::ZERO, 1.0));
  assert!(bvh.depth() > 1);
}

#[test]
fn test_bounds_cover_every_triangle() {
  let mesh = room();
  let bvh = MeshBvh::build(&mesh).unwrap();

  assert_eq!(Some(bvh.bounds()), mesh.bounds());
  for i in 0..mesh.triangle_count() {
    assert!(bvh.bounds().contains_aabb(&triangle_aabb(&mesh.triangle(i))));
  }
}

#[test]
fn test_depth_stays_shallow() {
  let mesh = random_soup(11, 1024, 10.0);
  let bvh = MeshBvh::build(&mesh).unwrap();

  assert_eq!(bvh.tree().leaf_count(), 1024);
  // One triangle per leaf: 11 levels when perfectly balanced
  assert!(bvh.depth() >= 11);
  assert!(bvh.depth() <= 40, "Depth {} too large", bvh.depth());
}

#[test]
fn test_intersects_box_on_unit_cube() {
  let bvh = MeshBvh::build(&unit_cube()).unwrap();

  // Straddles the +X face
  assert!(bvh.intersects_box(&DAabb3::cube(DVec3::new(0.5, 0.0, 0.0), 0.2)));
  // Fully inside the hollow cube: no surface in it
  assert!(!bvh.intersects_box(&DAabb3::cube(DVec3::ZERO, 0.5)));
  // Far away
  assert!(!bvh.intersects_box(&DAabb3::cube(DVec3::splat(5.0), 1.0)));
  // Touches the +X face from outside
  assert!(bvh.intersects_box(&DAabb3::new(
    DVec3::new(0.5, -0.1, -0.1),
    DVec3::new(0.7, 0.1, 0.1)
  )));
  // Encloses the whole cube
  assert!(bvh.intersects_box(&DAabb3::cube(DVec3::ZERO, 4.0)));
}

#[test]
fn test_triangles_in_box_face() {
  let bvh = MeshBvh::build(&unit_cube()).unwrap();

  // Thin slab around the center of the +Z face touches only its two triangles
  let query = DAabb3::new(DVec3::new(-0.1, -0.1, 0.45), DVec3::new(0.1, 0.1, 0.55));
  let hits = bvh.triangles_in_box(&query);
  assert_eq!(hits, vec![10, 11]);

  for id in hits {
    let tri = bvh.triangle(id).unwrap();
    assert!(tri.iter().all(|v| v.z == 0.5));
  }
}

#[test]
fn test_triangle_lookup_by_original_index() {
  let mesh = random_soup(3, 64, 5.0);
  let bvh = MeshBvh::build(&mesh).unwrap();

  for i in 0..mesh.triangle_count() {
    assert_eq!(bvh.triangle(i as u32), Some(mesh.triangle(i)));
  }
  assert_eq!(bvh.triangle(64), None);
}

/// BVH queries agree with a plain loop over every triangle.
#[test]
fn test_matches_brute_force_on_random_soup() {
  let mesh = random_soup(42, 400, 10.0);
  let bvh = MeshBvh::build(&mesh).unwrap();
  let mut rng = StdRng::seed_from_u64(1234);

  let mut occupied = 0;
  for _ in 0..500 {
    let query = random_box(&mut rng, 10.0, 3.0);
    let expected = brute_force(&mesh, &query);

    assert_eq!(bvh.triangles_in_box(&query), expected, "Query {:?}", query);
    assert_eq!(bvh.intersects_box(&query), !expected.is_empty());
    if !expected.is_empty() {
      occupied += 1;
    }
  }

  // Both outcomes exercised
  assert!(occupied > 0 && occupied < 500);
}

#[test]
fn test_visit_box_stops_early() {
  let bvh = MeshBvh::build(&unit_cube()).unwrap();
  let everything = DAabb3::cube(DVec3::ZERO, 2.0);

  let mut visited = 0;
  let flow = bvh.visit_box(&everything, |id| {
    visited += 1;
    if visited == 3 {
      ControlFlow::Break(id)
    } else {
      ControlFlow::Continue(())
    }
  });

  assert!(flow.is_break());
  assert_eq!(visited, 3);
}

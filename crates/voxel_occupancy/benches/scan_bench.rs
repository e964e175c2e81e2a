//! Voxelization benchmarks.
//!
//! - **bvh_build**: hierarchy construction for growing room meshes
//! - **box_query**: single occupancy queries, hit and miss
//! - **scan**: full passes over a furnished room at several resolutions
//! - **batch**: parallel passes sharing one BVH

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use voxel_occupancy::{
  voxelize_batch, DAabb3, MeshBvh, ScanConfig, ScanRequest, TriangleMesh, VoxelizationEngine,
};

// =============================================================================
// Synthetic rooms
// =============================================================================

/// Room of `size` x 2.5 x `size` with a floor, four walls and a grid of
/// furniture boxes (`furniture` per side).
fn furnished_room(size: f32, furniture: u32) -> TriangleMesh {
  let mut mesh = TriangleMesh::default();
  let half = size * 0.5;

  mesh.append_cuboid([half, -0.05, half], [half, 0.05, half]);
  mesh.append_cuboid([half, 1.25, 0.05], [half, 1.25, 0.05]);
  mesh.append_cuboid([half, 1.25, size - 0.05], [half, 1.25, 0.05]);
  mesh.append_cuboid([0.05, 1.25, half], [0.05, 1.25, half]);
  mesh.append_cuboid([size - 0.05, 1.25, half], [0.05, 1.25, half]);

  let spacing = size / (furniture + 1) as f32;
  for i in 1..=furniture {
    for j in 1..=furniture {
      let height = 0.3 + 0.1 * ((i + j) % 5) as f32;
      mesh.append_cuboid(
        [i as f32 * spacing, height * 0.5, j as f32 * spacing],
        [spacing * 0.2, height * 0.5, spacing * 0.2],
      );
    }
  }
  mesh
}

fn region(size: f64) -> DAabb3 {
  DAabb3::new(DVec3::ZERO, DVec3::new(size, 2.5, size))
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_bvh_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("bvh_build");
  for furniture in [4, 16, 64] {
    let mesh = furnished_room(8.0, furniture);
    group.bench_with_input(
      BenchmarkId::from_parameter(mesh.triangle_count()),
      &mesh,
      |b, mesh| b.iter(|| MeshBvh::build(black_box(mesh))),
    );
  }
  group.finish();
}

fn bench_box_query(c: &mut Criterion) {
  let bvh = MeshBvh::build(&furnished_room(8.0, 16)).expect("valid mesh");
  let hit = DAabb3::cube(DVec3::new(4.0, 0.0, 4.0), 0.1);
  let miss = DAabb3::cube(DVec3::new(4.0, 2.0, 4.0), 0.1);

  let mut group = c.benchmark_group("box_query");
  group.bench_function("hit", |b| b.iter(|| bvh.intersects_box(black_box(&hit))));
  group.bench_function("miss", |b| b.iter(|| bvh.intersects_box(black_box(&miss))));
  group.finish();
}

fn bench_scan(c: &mut Criterion) {
  let mesh = furnished_room(8.0, 8);
  let mut engine = VoxelizationEngine::new(&mesh, ScanConfig::default()).expect("valid mesh");

  let mut group = c.benchmark_group("scan");
  group.sample_size(20);
  for resolution in [0.4, 0.2, 0.1, 0.05] {
    group.bench_with_input(
      BenchmarkId::from_parameter(resolution),
      &resolution,
      |b, &resolution| {
        b.iter(|| {
          engine
            .voxelize(&region(8.0), black_box(resolution))
            .map(|cells| cells.len())
        })
      },
    );
  }
  group.finish();
}

fn bench_batch(c: &mut Criterion) {
  let bvh = MeshBvh::build(&furnished_room(8.0, 8)).expect("valid mesh");
  let config = ScanConfig::default();
  let requests: Vec<ScanRequest> = (0..8)
    .map(|i| ScanRequest::new(region(8.0), 0.05 + 0.01 * i as f64))
    .collect();

  c.bench_function("batch_8_passes", |b| {
    b.iter(|| voxelize_batch(&bvh, black_box(&requests), &config))
  });
}

criterion_group!(benches, bench_bvh_build, bench_box_query, bench_scan, bench_batch);
criterion_main!(benches);

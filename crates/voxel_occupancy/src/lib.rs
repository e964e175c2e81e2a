//! voxel_occupancy - occupancy voxelization of scanned room meshes
//!
//! Turns a static triangle mesh (floor, walls, furniture) and a navigable
//! region into a set of occupied cubic cells at a target resolution. A BVH
//! over the mesh answers "does this box touch the surface?", and an octree
//! scan over a padded cube around the region keeps only the occupied cells.
//!
//! # Features
//!
//! - **Mesh BVH**: parry's hierarchy over the mesh triangles, with parry's exact
//!   triangle/box test on the candidates
//! - **Octree scan**: top-down subdivision with pruning, driven by an explicit
//!   worklist, with resource limits and cooperative cancellation
//! - **Cell output**: cells with a center and a scale, plus a cube mesh builder
//!   for display
//! - **Batch / async**: independent passes in parallel over one shared BVH
//!
//! # Example
//!
//! ```ignore
//! use voxel_occupancy::{DAabb3, ScanConfig, TriangleMesh, VoxelizationEngine};
//!
//! let mesh = TriangleMesh::new(positions, indices);
//! let mut engine = VoxelizationEngine::new(&mesh, ScanConfig::default())?;
//!
//! let navigable = DAabb3::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(4.0, 2.5, 4.0));
//! let cells = engine.voxelize(&navigable, 0.05)?;
//!
//! println!("{} cells at {} units", cells.len(), engine.effective_resolution().unwrap());
//! ```

pub mod bounds;
pub mod error;
pub mod mesh;

pub use bounds::DAabb3;
pub use error::{GeometryError, ResourceLimitKind, VoxelizeError};
pub use mesh::TriangleMesh;

// Acceleration structure and the occupancy seam
pub mod bvh;
pub mod occupancy;
pub use bvh::MeshBvh;
pub use occupancy::OccupancyTest;

// Volume planning and octree scan
pub mod scan;
pub use scan::{CancelToken, ScanBudget, ScanConfig, ScanStats, ScanVolume};

// Scan output
pub mod cells;
pub mod geometry;
pub use cells::{CellContainer, CellSink, OccupiedCell};
pub use geometry::{build_cell_mesh, CellMesh, CellVertex};

// Caller-owned engine
pub mod engine;
pub use engine::{EngineId, VoxelizationEngine};

// Parallel and background passes
pub mod batch;
pub use batch::{voxelize_batch, AsyncVoxelizer, ScanRequest, VoxelGrid};

pub mod metrics;

#[cfg(test)]
pub(crate) mod test_utils;

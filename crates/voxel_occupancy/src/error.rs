//! Error types for mesh ingestion and voxelization passes.

use glam::DVec3;
use thiserror::Error;

/// Malformed or empty mesh, reported when the BVH is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
  #[error("mesh has no triangles")]
  EmptyMesh,

  #[error("index buffer length {len} is not a multiple of 3")]
  IndexCountNotTriangles { len: usize },

  #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
  IndexOutOfRange {
    triangle: usize,
    index: u32,
    vertex_count: usize,
  },

  #[error("vertex {index} has a non-finite coordinate {position:?}")]
  NonFiniteVertex { index: usize, position: [f32; 3] },
}

/// Which budget a pass ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLimitKind {
  /// `(edge / resolution)^3` exceeded `max_estimated_cells`.
  EstimatedCells,
  /// `log2(edge / resolution)` exceeded `max_depth`.
  Depth,
  /// More than `max_cells` cells were emitted.
  EmittedCells,
}

impl std::fmt::Display for ResourceLimitKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ResourceLimitKind::EstimatedCells => write!(f, "estimated cell count"),
      ResourceLimitKind::Depth => write!(f, "subdivision depth"),
      ResourceLimitKind::EmittedCells => write!(f, "emitted cell count"),
    }
  }
}

/// Everything a voxelization pass can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoxelizeError {
  #[error("invalid mesh geometry: {0}")]
  Geometry(#[from] GeometryError),

  #[error("invalid navigable region: min {min:?} must be finite and <= max {max:?} on every axis")]
  InvalidRegion { min: DVec3, max: DVec3 },

  #[error("resolution must be finite and positive, got {0}")]
  InvalidResolution(f64),

  #[error("invalid scan configuration: {0}")]
  InvalidConfig(String),

  #[error("{kind} {requested} exceeds the limit of {limit}")]
  ResourceLimit {
    kind: ResourceLimitKind,
    requested: u64,
    limit: u64,
  },

  #[error("voxelization pass was cancelled")]
  Cancelled,

  #[error("background voxelization pass ended without a result")]
  PassLost,
}

impl VoxelizeError {
  /// True for errors caused by the caller's parameters rather than the mesh.
  pub fn is_parameter_error(&self) -> bool {
    matches!(
      self,
      VoxelizeError::InvalidRegion { .. }
        | VoxelizeError::InvalidResolution(_)
        | VoxelizeError::InvalidConfig(_)
        | VoxelizeError::ResourceLimit { .. }
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn geometry_error_converts() {
    let err: VoxelizeError = GeometryError::EmptyMesh.into();
    assert_eq!(err, VoxelizeError::Geometry(GeometryError::EmptyMesh));
    assert!(!err.is_parameter_error());
  }

  #[test]
  fn messages_name_the_limit() {
    let err = VoxelizeError::ResourceLimit {
      kind: ResourceLimitKind::EstimatedCells,
      requested: 1_000,
      limit: 10,
    };
    assert_eq!(
      err.to_string(),
      "estimated cell count 1000 exceeds the limit of 10"
    );
    assert!(err.is_parameter_error());
  }

  #[test]
  fn index_error_message() {
    let err = GeometryError::IndexOutOfRange {
      triangle: 2,
      index: 9,
      vertex_count: 8,
    };
    assert!(err.to_string().contains("references vertex 9"));
  }
}

//! Scan volume planning.
//!
//! Turns a navigable region and a target resolution into the cube the scanner
//! subdivides:
//!
//! ```text
//! S0      = resolution * coarse_step_factor
//! extent  = ceil(size / S0 + padding_steps) * S0          (per axis)
//! edge    = max(extent.x, extent.y, extent.z)
//! cube    = cube of `edge` centered on the region centroid
//! ```
//!
//! The effective resolution is `edge` divided by `subdivisions` until it is at
//! or below the requested one, so it can be finer than requested but never
//! coarser.

use glam::DVec3;

use super::{ScanBudget, ScanConfig};
use crate::bounds::DAabb3;
use crate::error::{ResourceLimitKind, VoxelizeError};

/// Planned geometry of one pass. Pure data, no mesh access.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanVolume {
  /// Navigable region as supplied by the caller.
  pub region: DAabb3,
  /// Requested resolution.
  pub resolution: f64,
  /// Coarse step size S0.
  pub coarse_step: f64,
  /// Padded extent per axis, before taking the maximum.
  pub padded_extents: DVec3,
  /// Cube actually scanned.
  pub cube: DAabb3,
  /// Edge length of `cube`.
  pub edge: f64,
  /// Children per axis at every split.
  pub subdivisions: u32,
  /// Subdivision levels between the cube and the leaf cells (0 = the cube
  /// itself is the only leaf).
  pub depth: u32,
  /// Edge length of emitted cells.
  pub effective_resolution: f64,
}

impl ScanVolume {
  /// Validate inputs and plan the scan cube.
  pub fn plan(region: &DAabb3, resolution: f64, config: &ScanConfig) -> Result<Self, VoxelizeError> {
    if !resolution.is_finite() || resolution <= 0.0 {
      return Err(VoxelizeError::InvalidResolution(resolution));
    }
    if !region.is_valid() {
      return Err(VoxelizeError::InvalidRegion {
        min: region.min,
        max: region.max,
      });
    }
    config.validate()?;

    let coarse_step = resolution * config.coarse_step_factor;
    let padding = config.padding_steps as f64;
    let size = region.size();
    let padded_extents = DVec3::new(
      (size.x / coarse_step + padding).ceil() * coarse_step,
      (size.y / coarse_step + padding).ceil() * coarse_step,
      (size.z / coarse_step + padding).ceil() * coarse_step,
    );
    let edge = padded_extents.max_element();

    // Overflowing step sizes leave nothing sensible to scan
    if !edge.is_finite() {
      return Err(VoxelizeError::InvalidResolution(resolution));
    }
    // Flat region without padding
    if edge <= 0.0 {
      return Err(VoxelizeError::InvalidRegion {
        min: region.min,
        max: region.max,
      });
    }

    let subdivisions = config.subdivisions;
    let (depth, effective_resolution) = level_steps(edge, resolution, subdivisions);

    Ok(Self {
      region: *region,
      resolution,
      coarse_step,
      padded_extents,
      cube: DAabb3::cube(region.center(), edge),
      edge,
      subdivisions,
      depth,
      effective_resolution,
    })
  }

  /// The whole cube is already at or below the resolution.
  #[inline]
  pub fn is_single_leaf(&self) -> bool {
    self.depth == 0
  }

  /// Upper bound on the cells a pass can touch: `(edge / resolution)^3`,
  /// saturating at `u64::MAX`.
  pub fn estimated_cells(&self) -> u64 {
    let per_axis = (self.edge / self.resolution).max(1.0);
    // Float-to-int casts saturate
    (per_axis * per_axis * per_axis) as u64
  }

  /// Scale of emitted cells relative to the requested resolution (`<= 1`).
  #[inline]
  pub fn leaf_scale(&self) -> f64 {
    self.effective_resolution / self.resolution
  }

  /// Reject the pass before scanning if it would exceed `budget`.
  pub fn check_limits(&self, budget: &ScanBudget) -> Result<(), VoxelizeError> {
    let estimated = self.estimated_cells();
    if !budget.allows_estimate(estimated) {
      tracing::warn!(
        estimated,
        limit = budget.max_estimated_cells,
        resolution = self.resolution,
        edge = self.edge,
        "scan rejected: estimated cell count over budget"
      );
      return Err(VoxelizeError::ResourceLimit {
        kind: ResourceLimitKind::EstimatedCells,
        requested: estimated,
        limit: budget.max_estimated_cells,
      });
    }

    if !budget.allows_depth(self.depth) {
      tracing::warn!(
        depth = self.depth,
        limit = budget.max_depth,
        "scan rejected: subdivision depth over budget"
      );
      return Err(VoxelizeError::ResourceLimit {
        kind: ResourceLimitKind::Depth,
        requested: self.depth as u64,
        limit: budget.max_depth as u64,
      });
    }

    Ok(())
  }
}

/// Divide `edge` by `subdivisions` until it is `<= resolution`.
///
/// Returns the number of divisions and the final step. The scanner repeats the
/// same divisions, so leaf detection agrees with this plan bit for bit.
pub(crate) fn level_steps(edge: f64, resolution: f64, subdivisions: u32) -> (u32, f64) {
  let divisor = subdivisions as f64;
  let mut step = edge;
  let mut depth = 0;
  while step > resolution {
    step /= divisor;
    depth += 1;
  }
  (depth, step)
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;

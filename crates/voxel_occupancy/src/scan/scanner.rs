//! Top-down octree scan of a planned volume.
//!
//! # Algorithm
//!
//! ```text
//! scan(region, step):            step = region edge / subdivisions
//!   for x, z, y in 0..subdivisions:    (x outer, z middle, y inner)
//!     child = cube(center(x, y, z), step)
//!     if !occupied(child)       -> prune
//!     else if step <= R         -> emit cell { center, scale: step / R }
//!     else                      -> scan(child, step / subdivisions)
//! ```
//!
//! The recursion runs on an explicit stack of frames, each remembering which
//! child it visits next, so cells come out in the same order a recursive walk
//! would produce while depth never grows the call stack.
//!
//! Before splitting, the whole scan cube is tested once; an empty cube ends
//! the pass after a single query.

use glam::DVec3;
use smallvec::SmallVec;
use web_time::Instant;

use super::{CancelToken, ScanBudget, ScanStats, ScanVolume};
use crate::bounds::DAabb3;
use crate::cells::{CellSink, OccupiedCell};
use crate::error::{ResourceLimitKind, VoxelizeError};
use crate::occupancy::OccupancyTest;

/// A region being split: its min corner, the child step and the next child.
#[derive(Clone, Copy, Debug)]
struct Frame {
  min: DVec3,
  step: f64,
  depth: u32,
  next_child: u32,
}

/// Scan `volume`, emitting every occupied leaf cell into `sink`.
///
/// The sink is cleared first. On error it holds whatever was emitted before
/// the failure; callers that promise an empty container on error clear it.
#[tracing::instrument(skip_all, name = "scan::scan", fields(edge = volume.edge, depth = volume.depth))]
pub fn scan<O, S>(
  occupancy: &O,
  volume: &ScanVolume,
  budget: &ScanBudget,
  cancel: Option<&CancelToken>,
  sink: &mut S,
) -> Result<ScanStats, VoxelizeError>
where
  O: OccupancyTest + ?Sized,
  S: CellSink + ?Sized,
{
  let start = Instant::now();
  sink.clear();

  let mut stats = ScanStats::default();
  let resolution = volume.resolution;
  let subdivisions = volume.subdivisions;
  let divisor = subdivisions as f64;
  let children = subdivisions * subdivisions * subdivisions;

  let is_cancelled = || cancel.is_some_and(CancelToken::is_cancelled);
  if is_cancelled() {
    return Err(VoxelizeError::Cancelled);
  }

  stats.occupancy_tests += 1;
  if !occupancy.is_occupied(&volume.cube) {
    stats.pruned += 1;
    stats.scan_us = start.elapsed().as_micros() as u64;
    tracing::debug!("scan cube is empty");
    return Ok(stats);
  }

  if volume.is_single_leaf() {
    emit(sink, &mut stats, budget, volume.cube.center(), volume.edge / resolution)?;
    stats.scan_us = start.elapsed().as_micros() as u64;
    return Ok(stats);
  }

  let mut stack: SmallVec<[Frame; 32]> = SmallVec::new();
  stack.push(Frame {
    min: volume.cube.min,
    step: volume.edge / divisor,
    depth: 1,
    next_child: 0,
  });
  stats.max_depth_reached = 1;

  while let Some(frame) = stack.last_mut() {
    if frame.next_child == children {
      stack.pop();
      continue;
    }
    if is_cancelled() {
      return Err(VoxelizeError::Cancelled);
    }

    // x outer, z middle, y inner
    let n = frame.next_child;
    frame.next_child += 1;
    let ix = n / (subdivisions * subdivisions);
    let iz = (n / subdivisions) % subdivisions;
    let iy = n % subdivisions;

    let step = frame.step;
    let depth = frame.depth;
    let center = frame.min
      + DVec3::new(
        (ix as f64 + 0.5) * step,
        (iy as f64 + 0.5) * step,
        (iz as f64 + 0.5) * step,
      );
    let child = DAabb3::cube(center, step);

    stats.occupancy_tests += 1;
    if !occupancy.is_occupied(&child) {
      stats.pruned += 1;
      continue;
    }

    if step <= resolution {
      emit(sink, &mut stats, budget, center, step / resolution)?;
    } else {
      stats.subdivisions += 1;
      stats.max_depth_reached = stats.max_depth_reached.max(depth + 1);
      stack.push(Frame {
        min: child.min,
        step: step / divisor,
        depth: depth + 1,
        next_child: 0,
      });
    }
  }

  stats.scan_us = start.elapsed().as_micros() as u64;
  tracing::debug!(
    cells = stats.cells_emitted,
    tests = stats.occupancy_tests,
    pruned = stats.pruned,
    scan_us = stats.scan_us,
    "scan complete"
  );

  Ok(stats)
}

#[inline]
fn emit<S: CellSink + ?Sized>(
  sink: &mut S,
  stats: &mut ScanStats,
  budget: &ScanBudget,
  center: DVec3,
  scale: f64,
) -> Result<(), VoxelizeError> {
  if !budget.can_emit(stats.cells_emitted) {
    tracing::warn!(limit = budget.max_cells, "scan stopped: emitted cell count over budget");
    return Err(VoxelizeError::ResourceLimit {
      kind: ResourceLimitKind::EmittedCells,
      requested: stats.cells_emitted as u64 + 1,
      limit: budget.max_cells as u64,
    });
  }
  sink.add(OccupiedCell { center, scale });
  stats.cells_emitted += 1;
  Ok(())
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod scanner_test;

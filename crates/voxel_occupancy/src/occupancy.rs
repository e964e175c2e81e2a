//! Occupancy test: is a region of space touched by surface geometry?

use std::sync::Arc;

use crate::bounds::DAabb3;
use crate::bvh::MeshBvh;

/// Decides whether a box-shaped region is occupied.
///
/// Implementations must be pure: the same region always yields the same
/// answer, and a region touching geometry only on its boundary counts as
/// occupied.
pub trait OccupancyTest: Send + Sync {
  fn is_occupied(&self, region: &DAabb3) -> bool;
}

impl OccupancyTest for MeshBvh {
  #[inline]
  fn is_occupied(&self, region: &DAabb3) -> bool {
    self.intersects_box(region)
  }
}

impl<T: OccupancyTest + ?Sized> OccupancyTest for Arc<T> {
  #[inline]
  fn is_occupied(&self, region: &DAabb3) -> bool {
    (**self).is_occupied(region)
  }
}

impl<T: OccupancyTest + ?Sized> OccupancyTest for &T {
  #[inline]
  fn is_occupied(&self, region: &DAabb3) -> bool {
    (**self).is_occupied(region)
  }
}

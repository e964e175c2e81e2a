//! Occupied cells and the containers that collect them.

use glam::DVec3;

use crate::bounds::DAabb3;

/// One occupied cubic cell.
///
/// `scale` is the cell edge relative to the requested resolution, so the
/// edge length is `scale * resolution`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupiedCell {
  pub center: DVec3,
  pub scale: f64,
}

impl OccupiedCell {
  /// Box of this cell for a pass at `unit_size` resolution.
  #[inline]
  pub fn bounds(&self, unit_size: f64) -> DAabb3 {
    DAabb3::cube(self.center, self.scale * unit_size)
  }
}

/// Receives cells as a scan emits them.
///
/// Implemented by [`CellContainer`]; a renderer can implement it to build
/// instances directly.
pub trait CellSink {
  fn add(&mut self, cell: OccupiedCell);
  fn clear(&mut self);
}

impl CellSink for Vec<OccupiedCell> {
  fn add(&mut self, cell: OccupiedCell) {
    self.push(cell);
  }

  fn clear(&mut self) {
    Vec::clear(self);
  }
}

/// Cells of one voxelization pass, in emission order.
///
/// No deduplication: every `add` appends.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellContainer {
  cells: Vec<OccupiedCell>,
  unit_size: f64,
}

impl CellContainer {
  /// Empty container for a pass at `unit_size` resolution.
  pub fn new(unit_size: f64) -> Self {
    Self {
      cells: Vec::new(),
      unit_size,
    }
  }

  /// Requested resolution the cell scales are relative to.
  #[inline]
  pub fn unit_size(&self) -> f64 {
    self.unit_size
  }

  pub fn set_unit_size(&mut self, unit_size: f64) {
    self.unit_size = unit_size;
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, OccupiedCell> {
    self.cells.iter()
  }

  pub fn as_slice(&self) -> &[OccupiedCell] {
    &self.cells
  }

  pub fn into_cells(self) -> Vec<OccupiedCell> {
    self.cells
  }

  /// Box covered by `cell` at this container's unit size.
  #[inline]
  pub fn cell_bounds(&self, cell: &OccupiedCell) -> DAabb3 {
    cell.bounds(self.unit_size)
  }

  /// Union of all cell boxes, `None` when empty.
  pub fn bounds(&self) -> Option<DAabb3> {
    self
      .cells
      .iter()
      .map(|cell| self.cell_bounds(cell))
      .reduce(|acc, b| acc.union(&b))
  }
}

impl CellSink for CellContainer {
  #[inline]
  fn add(&mut self, cell: OccupiedCell) {
    self.cells.push(cell);
  }

  fn clear(&mut self) {
    self.cells.clear();
  }
}

impl<'a> IntoIterator for &'a CellContainer {
  type Item = &'a OccupiedCell;
  type IntoIter = std::slice::Iter<'a, OccupiedCell>;

  fn into_iter(self) -> Self::IntoIter {
    self.cells.iter()
  }
}

#[cfg(test)]
#[path = "cells_test.rs"]
mod cells_test;

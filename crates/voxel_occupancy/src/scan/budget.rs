//! Resource limits for a voxelization pass.
//!
//! Prevents runaway passes: a too-fine resolution over a large region would
//! otherwise subdivide until memory runs out.

/// Resource limits for a single voxelization pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ScanBudget {
	/// Maximum subdivision levels below the scan cube (0 = unlimited).
	pub max_depth: u32,
	/// Maximum emitted cells per pass (0 = unlimited).
	pub max_cells: usize,
	/// Maximum pre-scan estimate `(edge / resolution)^3` (0 = unlimited).
	/// Checked before any occupancy query runs.
	pub max_estimated_cells: u64,
}

impl ScanBudget {
	/// Default budget, sized for room-scale scans down to centimetre cells.
	pub const DEFAULT: Self = Self {
		max_depth: 20,
		max_cells: 1 << 22,
		max_estimated_cells: 1 << 30,
	};

	/// Unlimited budget for testing or offline passes.
	pub const UNLIMITED: Self = Self {
		max_depth: 0,
		max_cells: 0,
		max_estimated_cells: 0,
	};

	/// Check if `depth` subdivision levels are allowed.
	#[inline]
	pub fn allows_depth(&self, depth: u32) -> bool {
		self.max_depth == 0 || depth <= self.max_depth
	}

	/// Check if one more cell can be emitted after `emitted`.
	#[inline]
	pub fn can_emit(&self, emitted: usize) -> bool {
		self.max_cells == 0 || emitted < self.max_cells
	}

	/// Check if the pre-scan estimate fits.
	#[inline]
	pub fn allows_estimate(&self, estimated_cells: u64) -> bool {
		self.max_estimated_cells == 0 || estimated_cells <= self.max_estimated_cells
	}
}

impl Default for ScanBudget {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Statistics from one scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
	/// Occupancy queries issued (including the whole-cube pre-test).
	pub occupancy_tests: usize,
	/// Regions found empty and dropped.
	pub pruned: usize,
	/// Occupied regions that were split further.
	pub subdivisions: usize,
	/// Leaf cells emitted.
	pub cells_emitted: usize,
	/// Deepest subdivision level visited (scan cube children = 1).
	pub max_depth_reached: u32,
	/// Wall time of the scan in microseconds.
	pub scan_us: u64,
}

impl ScanStats {
	/// Occupied regions, whether emitted or split.
	#[inline]
	pub fn occupied(&self) -> usize {
		self.subdivisions + self.cells_emitted
	}

	/// Fraction of queries that found geometry.
	pub fn hit_ratio(&self) -> f64 {
		if self.occupancy_tests == 0 {
			0.0
		} else {
			(self.occupancy_tests - self.pruned) as f64 / self.occupancy_tests as f64
		}
	}
}

//! Axis-aligned bounding box with double precision.
//!
//! One box type serves the navigable region, every scan cell, BVH nodes and
//! triangle bounds, so overlap semantics stay identical across the crate.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Both corners are inclusive: boxes that only share a face, edge or corner
/// still overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DAabb3 {
	/// Minimum corner (inclusive).
	pub min: DVec3,
	/// Maximum corner (inclusive).
	pub max: DVec3,
}

impl DAabb3 {
	/// Box with inverted extents, ready for `encapsulate`.
	pub const EMPTY: Self = Self {
		min: DVec3::splat(f64::INFINITY),
		max: DVec3::splat(f64::NEG_INFINITY),
	};

	/// Create a new AABB from min and max corners.
	///
	/// No validation happens here; callers accepting user input check
	/// [`DAabb3::is_valid`] first.
	pub fn new(min: DVec3, max: DVec3) -> Self {
		Self { min, max }
	}

	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Cube of the given edge length centered on `center`.
	#[inline]
	pub fn cube(center: DVec3, edge: f64) -> Self {
		Self::from_center_half_extents(center, DVec3::splat(edge * 0.5))
	}

	/// Smallest box containing every point, `None` for an empty iterator.
	pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Option<Self> {
		let mut points = points.into_iter();
		let first = points.next()?;
		let mut aabb = Self::new(first, first);
		for p in points {
			aabb.encapsulate(p);
		}
		Some(aabb)
	}

	/// Expand to include a point.
	#[inline]
	pub fn encapsulate(&mut self, point: DVec3) {
		self.min = self.min.min(point);
		self.max = self.max.max(point);
	}

	/// Smallest box containing both boxes.
	#[inline]
	pub fn union(&self, other: &DAabb3) -> DAabb3 {
		DAabb3 {
			min: self.min.min(other.min),
			max: self.max.max(other.max),
		}
	}

	/// Finite corners with `min <= max` on every axis.
	pub fn is_valid(&self) -> bool {
		self.min.is_finite()
			&& self.max.is_finite()
			&& self.min.x <= self.max.x
			&& self.min.y <= self.max.y
			&& self.min.z <= self.max.z
	}

	/// Check if this AABB overlaps with another.
	///
	/// Two AABBs overlap if they share any interior or boundary points.
	#[inline]
	pub fn overlaps(&self, other: &DAabb3) -> bool {
		self.min.x <= other.max.x
			&& self.max.x >= other.min.x
			&& self.min.y <= other.max.y
			&& self.max.y >= other.min.y
			&& self.min.z <= other.max.z
			&& self.max.z >= other.min.z
	}

	/// Check if the interiors overlap by more than `tolerance` on every axis.
	///
	/// Face-adjacent cells do not overlap in this sense.
	#[inline]
	pub fn overlaps_interior(&self, other: &DAabb3, tolerance: f64) -> bool {
		let lo = self.min.max(other.min);
		let hi = self.max.min(other.max);
		let depth = hi - lo;
		depth.x > tolerance && depth.y > tolerance && depth.z > tolerance
	}

	/// Check if this AABB contains a point.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Check if `other` lies entirely inside this box.
	#[inline]
	pub fn contains_aabb(&self, other: &DAabb3) -> bool {
		self.contains_point(other.min) && self.contains_point(other.max)
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}

	/// Half of [`DAabb3::size`].
	#[inline]
	pub fn half_extents(&self) -> DVec3 {
		self.size() * 0.5
	}

	/// Index of the axis with the largest extent (0 = X, 1 = Y, 2 = Z).
	pub fn longest_axis(&self) -> usize {
		let size = self.size();
		if size.x >= size.y && size.x >= size.z {
			0
		} else if size.y >= size.z {
			1
		} else {
			2
		}
	}

	/// Enclosed volume (zero for flat or inverted boxes).
	pub fn volume(&self) -> f64 {
		let size = self.size().max(DVec3::ZERO);
		size.x * size.y * size.z
	}
}

impl Default for DAabb3 {
	fn default() -> Self {
		Self::EMPTY
	}
}

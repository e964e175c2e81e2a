//! Triangle / axis-aligned box contact, and the glam <-> parry conversions.
//!
//! The exact test is parry's separating-axis check between a cuboid and a
//! triangle, which reports contact when no axis separates by more than zero.
//! The query box is loosened by a small relative tolerance first, so rounding
//! in the projections never turns a touching pair (shared face, edge or
//! corner) into a miss.

use glam::DVec3;
use parry3d_f64::bounding_volume::{Aabb, BoundingVolume};
use parry3d_f64::math::{Point, Real};
use parry3d_f64::query::details::intersection_test_aabb_triangle;
use parry3d_f64::shape::Triangle;

use crate::bounds::DAabb3;

/// Relative tolerance for contact, scaled by the query box's coordinates.
pub const TOUCH_EPSILON: f64 = 1e-9;

/// Check if a triangle touches or overlaps a box.
///
/// Degenerate triangles (segments, points) are handled: parry skips their
/// zero-length axes, and the remaining axes are still sufficient.
pub fn triangle_intersects_aabb(tri: &[DVec3; 3], aabb: &DAabb3) -> bool {
  triangle_touches(&to_triangle(tri), &contact_box(aabb))
}

/// Bounds of a triangle.
#[inline]
pub fn triangle_aabb(tri: &[DVec3; 3]) -> DAabb3 {
  DAabb3::new(tri[0].min(tri[1]).min(tri[2]), tri[0].max(tri[1]).max(tri[2]))
}

/// `query` loosened by the contact tolerance.
pub(crate) fn contact_box(query: &DAabb3) -> Aabb {
  let scale = query
    .min
    .abs()
    .max(query.max.abs())
    .max_element()
    .max(1.0);
  to_aabb(query).loosened(TOUCH_EPSILON * scale)
}

/// Exact test against a box already passed through [`contact_box`].
#[inline]
pub(crate) fn triangle_touches(tri: &Triangle, contact: &Aabb) -> bool {
  intersection_test_aabb_triangle(contact, tri)
}

#[inline]
pub(crate) fn to_point(v: DVec3) -> Point<Real> {
  Point::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn from_point(p: &Point<Real>) -> DVec3 {
  DVec3::new(p.x, p.y, p.z)
}

#[inline]
pub(crate) fn to_aabb(aabb: &DAabb3) -> Aabb {
  Aabb::new(to_point(aabb.min), to_point(aabb.max))
}

#[inline]
pub(crate) fn to_triangle(tri: &[DVec3; 3]) -> Triangle {
  Triangle::new(to_point(tri[0]), to_point(tri[1]), to_point(tri[2]))
}

#[cfg(test)]
#[path = "triangle_test.rs"]
mod triangle_test;

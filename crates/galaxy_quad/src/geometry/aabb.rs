//! Axis-aligned rectangle with double precision for an unbounded galaxy plane.

use glam::DVec2;

use crate::quadtree::Quadrant;

/// Double-precision axis-aligned rectangle stored as center + half-extents.
///
/// Quadtree cells and the tree root are described by this type. Bounds are
/// closed: edges belong to the rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb2 {
  /// Center of the rectangle.
  pub center: DVec2,
  /// Half width (x) and half height (y).
  pub half_extents: DVec2,
}

impl DAabb2 {
  /// Create a new rectangle from center and half-extents.
  ///
  /// # Panics
  /// Debug-asserts that both half-extents are non-negative.
  pub fn from_center_half_extents(center: DVec2, half_extents: DVec2) -> Self {
    debug_assert!(
      half_extents.x >= 0.0 && half_extents.y >= 0.0,
      "AABB half-extents must be >= 0"
    );
    Self {
      center,
      half_extents,
    }
  }

  /// Create a new rectangle from min and max corners.
  pub fn from_min_max(min: DVec2, max: DVec2) -> Self {
    debug_assert!(min.x <= max.x && min.y <= max.y, "AABB min must be <= max");
    Self {
      center: (min + max) * 0.5,
      half_extents: (max - min) * 0.5,
    }
  }

  /// Minimum corner (inclusive).
  #[inline]
  pub fn min(&self) -> DVec2 {
    self.center - self.half_extents
  }

  /// Maximum corner (inclusive).
  #[inline]
  pub fn max(&self) -> DVec2 {
    self.center + self.half_extents
  }

  /// Full size (width, height).
  #[inline]
  pub fn size(&self) -> DVec2 {
    self.half_extents * 2.0
  }

  /// Larger of the two half-extents.
  #[inline]
  pub fn max_half_extent(&self) -> f64 {
    self.half_extents.max_element()
  }

  /// Area of the rectangle.
  #[inline]
  pub fn area(&self) -> f64 {
    let size = self.size();
    size.x * size.y
  }

  /// Corners in counter-clockwise order starting at min.
  pub fn corners(&self) -> [DVec2; 4] {
    let (min, max) = (self.min(), self.max());
    [
      min,
      DVec2::new(max.x, min.y),
      max,
      DVec2::new(min.x, max.y),
    ]
  }

  /// Check if this rectangle overlaps another.
  ///
  /// Two rectangles overlap if they share any interior or boundary points.
  #[inline]
  pub fn overlaps(&self, other: &DAabb2) -> bool {
    let (a_min, a_max) = (self.min(), self.max());
    let (b_min, b_max) = (other.min(), other.max());
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
  }

  /// Check if this rectangle contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: DVec2) -> bool {
    let d = (point - self.center).abs();
    d.x <= self.half_extents.x && d.y <= self.half_extents.y
  }

  /// The quarter of this rectangle covered by `quadrant`.
  ///
  /// The four quadrants tile the rectangle exactly: each has half the
  /// parent's half-extents and shares edges with its siblings.
  pub fn quadrant(&self, quadrant: Quadrant) -> DAabb2 {
    let half = self.half_extents * 0.5;
    let (east, north) = quadrant.offsets();
    let sign = DVec2::new(
      if east == 1 { 1.0 } else { -1.0 },
      if north == 1 { 1.0 } else { -1.0 },
    );
    DAabb2 {
      center: self.center + sign * half,
      half_extents: half,
    }
  }
}

//! OrientedViewport - the camera's visible region as a rotatable rectangle.
//!
//! The viewport is an oriented bounding box (OBB): center, half-sizes and a
//! counter-clockwise rotation in radians. Quadtree cells are axis-aligned,
//! so visibility is an OBB vs AABB separating-axis test.

use glam::DVec2;

use super::DAabb2;
use crate::error::{check_finite, check_half_extent, GalaxyError};

/// Immutable rotated viewport. Build a new one per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedViewport {
  center: DVec2,
  half_width: f64,
  half_height: f64,
  theta: f64,
  /// Local +x in world coordinates.
  u: DVec2,
  /// Local +y in world coordinates.
  v: DVec2,
}

impl OrientedViewport {
  /// Create a viewport centered at `(cx, cy)` rotated by `theta` radians.
  ///
  /// Fails if either half-extent is not strictly positive. The angle is
  /// unrestricted; it wraps through the trigonometric functions.
  pub fn new(
    cx: f64,
    cy: f64,
    half_width: f64,
    half_height: f64,
    theta: f64,
  ) -> Result<Self, GalaxyError> {
    let half_width = check_half_extent("viewport half-width", half_width)?;
    let half_height = check_half_extent("viewport half-height", half_height)?;
    let center = DVec2::new(
      check_finite("viewport center x", cx)?,
      check_finite("viewport center y", cy)?,
    );
    let theta = check_finite("viewport rotation", theta)?;
    let (s, c) = theta.sin_cos();
    Ok(Self {
      center,
      half_width,
      half_height,
      theta,
      u: DVec2::new(c, s),
      v: DVec2::new(-s, c),
    })
  }

  /// Same as [`OrientedViewport::new`] with the angle given in degrees.
  pub fn from_degrees(
    cx: f64,
    cy: f64,
    half_width: f64,
    half_height: f64,
    degrees: f64,
  ) -> Result<Self, GalaxyError> {
    Self::new(cx, cy, half_width, half_height, degrees.to_radians())
  }

  /// A copy with both half-extents divided by `zoom` (zoom in when > 1).
  pub fn scaled(&self, zoom: f64) -> Result<Self, GalaxyError> {
    if !(zoom.is_finite() && zoom > 0.0) {
      return Err(GalaxyError::InvalidZoom(zoom));
    }
    Self::new(
      self.center.x,
      self.center.y,
      self.half_width / zoom,
      self.half_height / zoom,
      self.theta,
    )
  }

  #[inline]
  pub fn center(&self) -> DVec2 {
    self.center
  }

  #[inline]
  pub fn half_width(&self) -> f64 {
    self.half_width
  }

  #[inline]
  pub fn half_height(&self) -> f64 {
    self.half_height
  }

  /// Rotation in radians, as given.
  #[inline]
  pub fn theta(&self) -> f64 {
    self.theta
  }

  /// Smaller half-extent; the footprint the LOD policy sizes cells against.
  #[inline]
  pub fn min_half_extent(&self) -> f64 {
    self.half_width.min(self.half_height)
  }

  /// Unit vectors of the local x (u) and y (v) axes in world space.
  #[inline]
  pub fn axes(&self) -> (DVec2, DVec2) {
    (self.u, self.v)
  }

  /// The four corners in counter-clockwise order.
  pub fn corners(&self) -> [DVec2; 4] {
    let du = self.u * self.half_width;
    let dv = self.v * self.half_height;
    [
      self.center - du - dv,
      self.center + du - dv,
      self.center + du + dv,
      self.center - du + dv,
    ]
  }

  /// World point to viewport-local coordinates (translate, rotate by -theta).
  #[inline]
  pub fn to_local(&self, world: DVec2) -> DVec2 {
    let d = world - self.center;
    DVec2::new(d.dot(self.u), d.dot(self.v))
  }

  /// Viewport-local point back to world coordinates.
  #[inline]
  pub fn to_world(&self, local: DVec2) -> DVec2 {
    self.center + self.u * local.x + self.v * local.y
  }

  /// Point-in-OBB test, boundary inclusive.
  pub fn contains_point(&self, point: DVec2) -> bool {
    let local = self.to_local(point);
    local.x.abs() <= self.half_width && local.y.abs() <= self.half_height
  }

  /// True when every corner of `aabb` lies inside the viewport.
  pub fn contains_aabb(&self, aabb: &DAabb2) -> bool {
    aabb.corners().iter().all(|corner| self.contains_point(*corner))
  }

  /// Axis-aligned bounds of the rotated rectangle.
  pub fn bounding_aabb(&self) -> DAabb2 {
    let extent = DVec2::new(
      self.half_width * self.u.x.abs() + self.half_height * self.v.x.abs(),
      self.half_width * self.u.y.abs() + self.half_height * self.v.y.abs(),
    );
    DAabb2::from_center_half_extents(self.center, extent)
  }

  /// OBB vs AABB intersection via the Separating Axis Theorem.
  ///
  /// Candidate axes are the world axes (1,0), (0,1) and the viewport axes
  /// u, v. Each shape is projected to a closed interval `center ± radius`,
  /// which is exactly the span of its four projected corners. Touching
  /// intervals count as overlapping, so a cell whose edge coincides with the
  /// viewport edge is reported visible.
  pub fn intersects_aabb(&self, aabb: &DAabb2) -> bool {
    let axes = [DVec2::X, DVec2::Y, self.u, self.v];
    axes.iter().all(|axis| {
      let (a_min, a_max) = project_aabb(aabb, *axis);
      let (b_min, b_max) = self.project(*axis);
      a_max >= b_min && b_max >= a_min
    })
  }

  /// Convenience form taking a cell's center and half-extents.
  #[inline]
  pub fn intersects_box(&self, center: DVec2, half_extents: DVec2) -> bool {
    self.intersects_aabb(&DAabb2::from_center_half_extents(center, half_extents))
  }

  #[inline]
  fn project(&self, axis: DVec2) -> (f64, f64) {
    let c = self.center.dot(axis);
    let r = self.half_width * self.u.dot(axis).abs() + self.half_height * self.v.dot(axis).abs();
    (c - r, c + r)
  }
}

#[inline]
fn project_aabb(aabb: &DAabb2, axis: DVec2) -> (f64, f64) {
  let c = aabb.center.dot(axis);
  let r = aabb.half_extents.x * axis.x.abs() + aabb.half_extents.y * axis.y.abs();
  (c - r, c + r)
}

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

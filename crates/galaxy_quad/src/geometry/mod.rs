//! Plane geometry: axis-aligned cells and the rotated viewport.

pub mod aabb;
pub mod viewport;

pub use aabb::DAabb2;
pub use viewport::OrientedViewport;

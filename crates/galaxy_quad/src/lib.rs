//! galaxy_quad - viewport-driven level of detail over an unbounded galaxy plane
//!
//! This crate is the "where / when" layer between a camera and a renderer.
//! It maintains a lazily expanded quadtree over the plane and, for a rotated
//! viewport, decides which cells are visible and at what depth they should
//! be drawn. Each selected cell carries deterministic placeholder content
//! keyed by its integer grid address.
//!
//! # Features
//!
//! - **Oriented viewport culling**: OBB vs AABB separating-axis test with
//!   inclusive boundaries
//! - **Lazy expansion**: children and content are materialized once, on
//!   first use, and safely under concurrent queries
//! - **Zoom-driven LOD**: depth chosen from the viewport footprint, with a
//!   smoothstep fade weight per leaf
//! - **Deterministic content**: stubs are pure functions of the cell address
//!
//! # Example
//!
//! ```
//! use galaxy_quad::{OrientedViewport, QuadTree};
//!
//! let tree = QuadTree::from_center(0.0, 0.0, 512.0, 512.0)?;
//! let viewport = OrientedViewport::from_degrees(10.0, 96.0, 90.0, 160.0, 30.0)?;
//!
//! let frame = tree.update(&viewport);
//! for leaf in &frame.visited {
//!   assert!(!leaf.stubs.is_empty());
//! }
//! # Ok::<(), galaxy_quad::GalaxyError>(())
//! ```

pub mod content;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod quadtree;

// Re-export commonly used items
pub use content::{ContentStub, StarStubConfig, StarStubGenerator, StubGenerator};
pub use error::GalaxyError;
pub use geometry::{DAabb2, OrientedViewport};
pub use quadtree::{
  Cell, CellAddress, DepthCensus, LodConfig, QuadTree, Quadrant, TraversalOutput, TraversalStats,
  TreeId, VisitedCell,
};

//! Quadtree module for viewport-driven LOD over the galaxy plane.
//!
//! The tree is explicit: a root [`Cell`] owns lazily materialized children.
//! Each frame the caller hands an [`OrientedViewport`] to
//! [`QuadTree::update`], which prunes invisible branches, refines visible
//! ones until the LOD policy is satisfied, and returns the selected leaves.
//!
//! # Depth Convention
//!
//! Depth 0 = root (coarsest), higher depth = finer.
//!
//! ```text
//! Cell half-extent = root half-extent / 2^depth
//! ```
//!
//! # Module Structure
//!
//! - [`address`]: `CellAddress` - integer grid position, seed key for content
//! - [`cell`]: `Cell` - node with once-materialized children and stubs
//! - [`config`]: `LodConfig` - depth range and LOD thresholds
//! - [`lod`]: `LodPolicy` - resolved / refine decision with smoothstep fade,
//!   `StopRule` for caller-supplied stop tests
//! - [`traversal`]: prune / refine / collect algorithm
//! - [`stats`]: `TraversalStats`, `DepthCensus`

pub mod address;
pub mod cell;
pub mod config;
pub mod lod;
pub mod stats;
pub mod traversal;

use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec2;
use rayon::prelude::*;

// Re-exports
pub use address::{CellAddress, Quadrant};
pub use cell::Cell;
pub use config::{LodConfig, MAX_SUPPORTED_DEPTH};
pub use lod::{smoothstep, LodDecision, LodPolicy, ResolvedBy, StopRule};
pub use stats::{DepthCensus, TraversalStats};
pub use traversal::{traverse, traverse_with_rule, FadingCell, TraversalOutput, VisitedCell};

use crate::content::{StarStubConfig, StarStubGenerator, StubGenerator};
use crate::error::{check_finite, check_half_extent, GalaxyError};
use crate::geometry::{DAabb2, OrientedViewport};

// =============================================================================
// TreeId - unique identifier
// =============================================================================

/// Atomic counter for generating unique TreeIds.
static TREE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque tree identifier, unique within the process lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TreeId(u64);

impl TreeId {
  fn next() -> Self {
    Self(TREE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  /// Get the raw ID value.
  pub fn raw(&self) -> u64 {
    self.0
  }
}

// =============================================================================
// QuadTree<G> - per-session spatial index
// =============================================================================

/// Spatial index over one galaxy plane, generic over its content source.
///
/// Cells and stub caches accumulate for the lifetime of the tree and are
/// never evicted. All queries take `&self`; concurrent queries against the
/// same tree are safe and materialize each cell at most once.
pub struct QuadTree<G: StubGenerator = StarStubGenerator> {
  id: TreeId,
  root: Cell,
  config: LodConfig,
  generator: G,
  #[cfg(feature = "metrics")]
  metrics: std::sync::Mutex<crate::metrics::TraversalMetrics>,
}

impl QuadTree<StarStubGenerator> {
  /// Tree covering `(cx, cy) ± (half_width, half_height)` with default LOD
  /// settings and the built-in star generator.
  pub fn from_center(cx: f64, cy: f64, half_width: f64, half_height: f64) -> Result<Self, GalaxyError> {
    let root = root_bounds(cx, cy, half_width, half_height)?;
    Self::with_config(root, LodConfig::default(), StarStubGenerator::default())
  }

  /// Same as [`QuadTree::from_center`] with explicit LOD and star settings.
  pub fn from_center_with(
    cx: f64,
    cy: f64,
    half_width: f64,
    half_height: f64,
    config: LodConfig,
    stars: StarStubConfig,
  ) -> Result<Self, GalaxyError> {
    let root = root_bounds(cx, cy, half_width, half_height)?;
    Self::with_config(root, config, StarStubGenerator::new(stars)?)
  }
}

impl<G: StubGenerator> QuadTree<G> {
  /// Create a tree over `root` with a custom content generator.
  pub fn with_config(root: DAabb2, config: LodConfig, generator: G) -> Result<Self, GalaxyError> {
    check_half_extent("root half-width", root.half_extents.x)?;
    check_half_extent("root half-height", root.half_extents.y)?;
    check_finite("root center x", root.center.x)?;
    check_finite("root center y", root.center.y)?;
    config.validate()?;

    Ok(Self {
      id: TreeId::next(),
      root: Cell::new(CellAddress::ROOT, root),
      config,
      generator,
      #[cfg(feature = "metrics")]
      metrics: std::sync::Mutex::new(crate::metrics::TraversalMetrics::new()),
    })
  }

  #[inline]
  pub fn id(&self) -> TreeId {
    self.id
  }

  #[inline]
  pub fn root(&self) -> &Cell {
    &self.root
  }

  /// Bounding region of the whole tree.
  #[inline]
  pub fn bounds(&self) -> &DAabb2 {
    self.root.bounds()
  }

  #[inline]
  pub fn config(&self) -> &LodConfig {
    &self.config
  }

  #[inline]
  pub fn generator(&self) -> &G {
    &self.generator
  }

  /// Select the leaves to render for `viewport`.
  pub fn update(&self, viewport: &OrientedViewport) -> TraversalOutput<'_> {
    #[cfg(feature = "metrics")]
    let start = web_time::Instant::now();

    let output = traverse(&self.root, viewport, &self.config, &self.generator);

    #[cfg(feature = "metrics")]
    self.record_metrics(&output, start);

    output
  }

  /// Like [`QuadTree::update`], but `stop_rule` replaces the LOD policy for
  /// this query. `max_depth` and `min_cell_half_extent` still bound it.
  pub fn update_with(&self, viewport: &OrientedViewport, stop_rule: &dyn StopRule) -> TraversalOutput<'_> {
    #[cfg(feature = "metrics")]
    let start = web_time::Instant::now();

    let output = traverse_with_rule(&self.root, viewport, &self.config, stop_rule, &self.generator);

    #[cfg(feature = "metrics")]
    self.record_metrics(&output, start);

    output
  }

  #[cfg(feature = "metrics")]
  fn record_metrics(&self, output: &TraversalOutput<'_>, start: web_time::Instant) {
    if let Ok(mut metrics) = self.metrics.lock() {
      let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
      metrics.record_update(output, elapsed_us);
    }
  }

  /// Run independent queries in parallel on the rayon pool.
  ///
  /// Outputs are in the same order as `viewports`.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "quadtree::update_batch", fields(count = viewports.len())))]
  pub fn update_batch(&self, viewports: &[OrientedViewport]) -> Vec<TraversalOutput<'_>> {
    viewports.par_iter().map(|vp| self.update(vp)).collect()
  }

  /// Continuous target depth for the whole tree under `viewport`.
  pub fn pseudo_depth(&self, viewport: &OrientedViewport) -> f64 {
    LodPolicy::new(&self.config).pseudo_depth(
      self.root.bounds().max_half_extent(),
      0,
      viewport.min_half_extent(),
    )
  }

  /// Leaf depth the LOD policy aims for under `viewport`, clamped.
  pub fn desired_depth(&self, viewport: &OrientedViewport) -> u32 {
    let policy = LodPolicy::new(&self.config);
    policy.desired_depth(self.pseudo_depth(viewport))
  }

  /// Materialized cells per depth, optionally ignoring cells deeper than
  /// `max_depth`.
  pub fn census(&self, max_depth: Option<u32>) -> DepthCensus {
    let mut census = DepthCensus::default();
    self.root.for_each_materialized(&mut |cell| {
      if max_depth.map_or(true, |max| cell.depth() <= max) {
        census.record(cell.depth());
      }
    });
    census
  }

  /// Total cells created so far, including the root.
  pub fn materialized_cells(&self) -> usize {
    self.root.materialized_count()
  }

  /// Look up an existing cell. Never materializes anything.
  pub fn find(&self, address: &CellAddress) -> Option<&Cell> {
    if address.depth > MAX_SUPPORTED_DEPTH {
      return None;
    }
    let side = 1u64 << address.depth;
    if u64::from(address.x) >= side || u64::from(address.y) >= side {
      return None;
    }

    let mut cell = &self.root;
    for level in (0..address.depth).rev() {
      let quadrant = Quadrant::from_offsets((address.x >> level) & 1, (address.y >> level) & 1);
      cell = cell.child(quadrant)?;
    }
    Some(cell)
  }

  /// World-space center of the cell at `address`, whether or not it exists.
  ///
  /// None when the address is deeper than [`MAX_SUPPORTED_DEPTH`] or
  /// outside the grid of its depth.
  pub fn cell_center(&self, address: &CellAddress) -> Option<DVec2> {
    if address.depth > MAX_SUPPORTED_DEPTH {
      return None;
    }
    let side = 1u64 << address.depth;
    if u64::from(address.x) >= side || u64::from(address.y) >= side {
      return None;
    }
    let root = self.root.bounds();
    let size = root.size() / side as f64;
    Some(root.min() + DVec2::new(f64::from(address.x) + 0.5, f64::from(address.y) + 0.5) * size)
  }

  /// Snapshot of accumulated traversal metrics.
  #[cfg(feature = "metrics")]
  pub fn metrics(&self) -> crate::metrics::TraversalMetrics {
    self
      .metrics
      .lock()
      .map(|m| m.clone())
      .unwrap_or_default()
  }
}

fn root_bounds(cx: f64, cy: f64, half_width: f64, half_height: f64) -> Result<DAabb2, GalaxyError> {
  let half = DVec2::new(
    check_half_extent("root half-width", half_width)?,
    check_half_extent("root half-height", half_height)?,
  );
  let center = DVec2::new(check_finite("root center x", cx)?, check_finite("root center y", cy)?);
  Ok(DAabb2::from_center_half_extents(center, half))
}

//! Engine-agnostic metrics for quadtree traversal.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use galaxy_quad::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let output = tree.update(&viewport);
//! println!("avg update: {:.1}us", tree.metrics().avg_update_timing_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

use crate::quadtree::TraversalOutput;

/// Depth slots tracked per frame; deeper leaves land in the last slot.
pub const TRACKED_DEPTHS: usize = 32;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  /// Create a new rolling window with the given capacity.
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Iterate over values (oldest to newest).
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  /// Get the most recent value.
  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  /// Average of all values, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.buffer.iter().sum::<u64>() as f64 / self.buffer.len() as f64
    }
  }

  /// Get min and max values.
  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.buffer.iter().min()?;
    let max = self.buffer.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds at 60fps
  }
}

/// Traversal statistics accumulated across frames.
#[derive(Debug, Clone)]
pub struct TraversalMetrics {
  /// Leaves per depth in the most recent frame (index = depth).
  pub leaves_per_depth: [u32; TRACKED_DEPTHS],
  /// Leaves returned by the most recent frame.
  pub visible_leaves: u32,
  /// Stubs carried by the most recent frame's leaves.
  pub visible_stubs: u64,
  /// Rolling window of update times in microseconds.
  pub update_timings: RollingWindow<u64>,
  /// Last update time in microseconds.
  pub last_update_us: u64,
  /// Updates recorded this session.
  pub total_updates: u64,
  /// Cells materialized this session.
  pub total_cells_expanded: u64,
  /// Stub lists generated this session.
  pub total_stub_lists_generated: u64,
}

impl Default for TraversalMetrics {
  fn default() -> Self {
    Self {
      leaves_per_depth: [0; TRACKED_DEPTHS],
      visible_leaves: 0,
      visible_stubs: 0,
      update_timings: RollingWindow::new(128),
      last_update_us: 0,
      total_updates: 0,
      total_cells_expanded: 0,
      total_stub_lists_generated: 0,
    }
  }
}

impl TraversalMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one frame's output and timing.
  pub fn record_update(&mut self, output: &TraversalOutput<'_>, timing_us: u64) {
    if !is_enabled() {
      return;
    }

    self.leaves_per_depth.fill(0);
    for leaf in &output.visited {
      let idx = (leaf.depth() as usize).min(TRACKED_DEPTHS - 1);
      self.leaves_per_depth[idx] += 1;
    }
    self.visible_leaves = u32::try_from(output.len()).unwrap_or(u32::MAX);
    self.visible_stubs = output.stub_count() as u64;

    self.update_timings.push(timing_us);
    self.last_update_us = timing_us;
    self.total_updates += 1;
    // Each expansion creates four cells.
    self.total_cells_expanded += 4 * output.stats.cells_expanded as u64;
    self.total_stub_lists_generated += output.stats.stubs_generated as u64;
  }

  /// Reset per-frame values and timings; session totals are kept.
  pub fn reset(&mut self) {
    self.leaves_per_depth.fill(0);
    self.visible_leaves = 0;
    self.visible_stubs = 0;
    self.update_timings.clear();
    self.last_update_us = 0;
  }

  /// Average update time in microseconds.
  pub fn avg_update_timing_us(&self) -> f64 {
    self.update_timings.average()
  }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
  use super::*;
  use crate::geometry::OrientedViewport;
  use crate::quadtree::QuadTree;

  #[test]
  fn test_rolling_window() {
    let mut window = RollingWindow::new(3);
    assert!(window.is_empty());

    window.push(10u64);
    window.push(20);
    window.push(30);
    assert_eq!(window.len(), 3);
    assert_eq!(window.average(), 20.0);

    // Push one more, oldest should be evicted
    window.push(40);
    assert_eq!(window.len(), 3);
    assert_eq!(window.average(), 30.0);
    assert_eq!(window.min_max(), Some((20, 40)));
    assert_eq!(window.last(), Some(&40));
  }

  #[test]
  fn test_record_update() {
    let tree = QuadTree::from_center(0.0, 0.0, 512.0, 512.0).unwrap();
    let viewport = OrientedViewport::from_degrees(10.0, 96.0, 90.0, 160.0, 30.0).unwrap();
    let output = tree.update(&viewport);

    let mut metrics = TraversalMetrics::new();
    metrics.record_update(&output, 250);

    assert_eq!(metrics.visible_leaves as usize, output.len());
    assert_eq!(metrics.leaves_per_depth[5] as usize, output.len());
    assert_eq!(metrics.visible_stubs as usize, output.stub_count());
    assert_eq!(metrics.last_update_us, 250);
    assert_eq!(metrics.total_updates, 1);

    metrics.reset();
    assert_eq!(metrics.visible_leaves, 0);
    assert_eq!(metrics.total_updates, 1);
  }

  #[test]
  fn test_tree_accumulates_metrics() {
    let tree = QuadTree::from_center(0.0, 0.0, 512.0, 512.0).unwrap();
    let viewport = OrientedViewport::new(0.0, 0.0, 100.0, 100.0, 0.0).unwrap();
    tree.update(&viewport);
    tree.update(&viewport);
    let metrics = tree.metrics();
    assert_eq!(metrics.total_updates, 2);
    assert!(metrics.total_cells_expanded > 0);
  }
}

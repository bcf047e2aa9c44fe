//! Per-query statistics and a per-depth census of materialized cells.

use std::collections::BTreeMap;
use std::fmt;

/// Statistics from one traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
  /// Cells whose bounds were tested against the viewport.
  pub cells_tested: usize,
  /// Cells rejected by the intersection test (subtrees skipped).
  pub cells_pruned: usize,
  /// Leaves returned.
  pub leaves_visited: usize,
  /// Cells whose children were created by this query.
  pub cells_expanded: usize,
  /// Stub lists generated by this query, for leaves and fading parents.
  pub stubs_generated: usize,
  /// Leaves that wanted more detail but hit `max_depth`.
  pub clamped_by_max_depth: usize,
  /// Leaves that wanted more detail but hit `min_cell_half_extent`.
  pub clamped_by_min_size: usize,
  /// Deepest leaf returned (0 when nothing was visible).
  pub max_leaf_depth: u32,
}

impl TraversalStats {
  /// True when the query created no cells and generated no content.
  #[inline]
  pub fn is_cache_hit(&self) -> bool {
    self.cells_expanded == 0 && self.stubs_generated == 0
  }

  /// Leaves that were clamped rather than resolved by the LOD test.
  #[inline]
  pub fn total_clamped(&self) -> usize {
    self.clamped_by_max_depth + self.clamped_by_min_size
  }
}

/// Number of materialized cells at each depth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthCensus {
  counts: BTreeMap<u32, usize>,
}

impl DepthCensus {
  pub(crate) fn record(&mut self, depth: u32) {
    *self.counts.entry(depth).or_insert(0) += 1;
  }

  /// Cells recorded at `depth`.
  pub fn at(&self, depth: u32) -> usize {
    self.counts.get(&depth).copied().unwrap_or(0)
  }

  /// Total cells recorded.
  pub fn total(&self) -> usize {
    self.counts.values().sum()
  }

  /// Deepest depth with any cell.
  pub fn max_depth(&self) -> Option<u32> {
    self.counts.keys().next_back().copied()
  }

  /// `(depth, count)` pairs in increasing depth.
  pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
    self.counts.iter().map(|(d, c)| (*d, *c))
  }
}

impl fmt::Display for DepthCensus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (depth, count) in self.iter() {
      writeln!(f, "L{depth:02} = {count:>5}")?;
    }
    Ok(())
  }
}

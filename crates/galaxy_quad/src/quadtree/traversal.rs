//! Viewport traversal: prune, refine, and collect leaves for one frame.
//!
//! Recursive top-down descent from the root:
//!
//! 1. **Prune**: a cell the viewport does not touch is skipped together
//!    with its whole subtree. Its children and stubs are left untouched.
//! 2. **LOD**: the policy decides whether the cell is detailed enough.
//! 3. **Resolve**: terminal cells are returned with their stub list (filled
//!    on first use). A leaf still fading in also carries its parent's stubs
//!    so the renderer can cross-fade the two levels.
//! 4. **Refine**: otherwise children are materialized if needed and visited
//!    in quadrant order. The parent itself is structural and not returned.
//!
//! Every query walks from the root; nothing is carried over between frames
//! except the cells and stub caches already materialized.

use std::collections::HashSet;

use super::lod::{LodDecision, LodPolicy, ResolvedBy, StopRule};
use super::stats::TraversalStats;
use super::{Cell, CellAddress, LodConfig};
use crate::content::{ContentStub, StubGenerator};
use crate::geometry::{DAabb2, OrientedViewport};

/// A leaf selected for rendering this frame.
#[derive(Clone, Copy, Debug)]
pub struct VisitedCell<'a> {
  /// The selected cell.
  pub cell: &'a Cell,
  /// Its cached content.
  pub stubs: &'a [ContentStub],
  /// Smoothstep blend weight in `[0, 1]` for fading this level in.
  pub fade: f64,
  /// Parent cell, None for the root.
  pub parent: Option<&'a Cell>,
  /// Parent content to draw at weight `1 - fade`. Empty once `fade` is 1.
  pub parent_stubs: &'a [ContentStub],
}

impl VisitedCell<'_> {
  #[inline]
  pub fn address(&self) -> CellAddress {
    self.cell.address()
  }

  #[inline]
  pub fn bounds(&self) -> &DAabb2 {
    self.cell.bounds()
  }

  #[inline]
  pub fn depth(&self) -> u32 {
    self.cell.depth()
  }

  /// Weight of the parent content still on screen.
  #[inline]
  pub fn parent_weight(&self) -> f64 {
    if self.parent_stubs.is_empty() {
      0.0
    } else {
      1.0 - self.fade
    }
  }
}

/// A coarser cell whose content is fading out under its visible children.
#[derive(Clone, Copy, Debug)]
pub struct FadingCell<'a> {
  pub cell: &'a Cell,
  pub stubs: &'a [ContentStub],
  /// Blend weight in `[0, 1]`, `1 - fade` of its children.
  pub weight: f64,
}

/// Output from one traversal.
#[derive(Debug, Default)]
pub struct TraversalOutput<'a> {
  /// Leaves selected for rendering, in depth-first quadrant order.
  pub visited: Vec<VisitedCell<'a>>,
  /// Statistics from traversal execution.
  pub stats: TraversalStats,
}

impl<'a> TraversalOutput<'a> {
  /// Number of selected leaves.
  #[inline]
  pub fn len(&self) -> usize {
    self.visited.len()
  }

  /// True when nothing is visible.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.visited.is_empty()
  }

  /// Addresses of the selected leaves, in output order.
  pub fn addresses(&self) -> Vec<CellAddress> {
    self.visited.iter().map(VisitedCell::address).collect()
  }

  /// Total stubs across all selected leaves.
  pub fn stub_count(&self) -> usize {
    self.visited.iter().map(|v| v.stubs.len()).sum()
  }

  /// Parents still fading out, each listed once, in first-seen order.
  pub fn fading_parents(&self) -> Vec<FadingCell<'a>> {
    let mut seen = HashSet::new();
    self
      .visited
      .iter()
      .filter(|leaf| !leaf.parent_stubs.is_empty())
      .filter_map(|leaf| {
        let parent = leaf.parent?;
        seen.insert(parent.address()).then_some(FadingCell {
          cell: parent,
          stubs: leaf.parent_stubs,
          weight: leaf.parent_weight(),
        })
      })
      .collect()
  }
}

/// Shared, read-only state of one traversal.
struct Traversal<'q> {
  viewport: &'q OrientedViewport,
  policy: LodPolicy<'q>,
  stop_rule: Option<&'q dyn StopRule>,
  generator: &'q dyn StubGenerator,
  viewport_min_half_extent: f64,
}

impl Traversal<'_> {
  fn decide(&self, cell: &Cell) -> LodDecision {
    let half = cell.bounds().max_half_extent();
    match self.stop_rule {
      Some(rule) => {
        let stop = rule.should_stop(cell, self.viewport);
        self.policy.evaluate_rule(stop, half, cell.depth())
      }
      None => self
        .policy
        .evaluate(half, cell.depth(), self.viewport_min_half_extent),
    }
  }

  fn visit<'a>(&self, cell: &'a Cell, parent: Option<&'a Cell>, out: &mut TraversalOutput<'a>) {
    out.stats.cells_tested += 1;

    // Step 1: prune branches the viewport does not touch
    if !self.viewport.intersects_aabb(cell.bounds()) {
      out.stats.cells_pruned += 1;
      return;
    }

    // Step 2: LOD decision
    match self.decide(cell) {
      // Step 3: terminal for this query
      LodDecision::Resolved { by, fade } => {
        match by {
          ResolvedBy::DesiredDepth | ResolvedBy::StopRule => {}
          ResolvedBy::MaxDepth => {
            out.stats.clamped_by_max_depth += 1;
            #[cfg(feature = "tracing")]
            tracing::trace!(address = ?cell.address(), "clamped at max depth");
          }
          ResolvedBy::MinCellSize => {
            out.stats.clamped_by_min_size += 1;
            #[cfg(feature = "tracing")]
            tracing::trace!(address = ?cell.address(), "clamped at min cell size");
          }
        }

        let (stubs, generated) = cell.materialize_stubs(self.generator);
        if generated {
          out.stats.stubs_generated += 1;
        }

        let parent_stubs: &'a [ContentStub] = match parent {
          Some(parent) if fade < 1.0 => {
            let (stubs, generated) = parent.materialize_stubs(self.generator);
            if generated {
              out.stats.stubs_generated += 1;
            }
            stubs
          }
          _ => &[],
        };

        out.stats.leaves_visited += 1;
        out.stats.max_leaf_depth = out.stats.max_leaf_depth.max(cell.depth());
        out.visited.push(VisitedCell {
          cell,
          stubs,
          fade,
          parent,
          parent_stubs,
        });
      }

      // Step 4: refine into children
      LodDecision::Refine => {
        let (children, created) = cell.materialize_children();
        if created {
          out.stats.cells_expanded += 1;
        }
        for child in children.iter() {
          self.visit(child, Some(cell), out);
        }
      }
    }
  }
}

/// Run one traversal from `root` with the LOD policy of `config`.
///
/// Returns the union of all leaves reached. A viewport that misses the root
/// yields an empty output, not an error.
pub fn traverse<'a>(
  root: &'a Cell,
  viewport: &OrientedViewport,
  config: &LodConfig,
  generator: &dyn StubGenerator,
) -> TraversalOutput<'a> {
  run(root, viewport, config, None, generator)
}

/// Like [`traverse`], with `stop_rule` deciding where refinement ends.
/// `config` still bounds depth and cell size.
pub fn traverse_with_rule<'a>(
  root: &'a Cell,
  viewport: &OrientedViewport,
  config: &LodConfig,
  stop_rule: &dyn StopRule,
  generator: &dyn StubGenerator,
) -> TraversalOutput<'a> {
  run(root, viewport, config, Some(stop_rule), generator)
}

#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "quadtree::traverse", fields(custom_rule = stop_rule.is_some())))]
fn run<'a>(
  root: &'a Cell,
  viewport: &OrientedViewport,
  config: &LodConfig,
  stop_rule: Option<&dyn StopRule>,
  generator: &dyn StubGenerator,
) -> TraversalOutput<'a> {
  let traversal = Traversal {
    viewport,
    policy: LodPolicy::new(config),
    stop_rule,
    generator,
    viewport_min_half_extent: viewport.min_half_extent(),
  };

  let mut out = TraversalOutput::default();
  traversal.visit(root, None, &mut out);

  #[cfg(feature = "tracing")]
  tracing::debug!(
    leaves = out.stats.leaves_visited,
    pruned = out.stats.cells_pruned,
    expanded = out.stats.cells_expanded,
    generated = out.stats.stubs_generated,
    max_depth = out.stats.max_leaf_depth,
    "traversal complete"
  );

  out
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;

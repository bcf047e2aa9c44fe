use glam::DVec2;

use super::*;
use crate::content::StarStubGenerator;
use crate::quadtree::{Quadrant, ResolvedBy};

fn root() -> Cell {
  Cell::new(
    CellAddress::ROOT,
    DAabb2::from_center_half_extents(DVec2::ZERO, DVec2::splat(512.0)),
  )
}

fn viewport(cx: f64, cy: f64, hw: f64, hh: f64, deg: f64) -> OrientedViewport {
  OrientedViewport::from_degrees(cx, cy, hw, hh, deg).unwrap()
}

// =========================================================================
// Pruning
// =========================================================================

/// A viewport outside the root returns nothing and touches nothing.
#[test]
fn test_viewport_outside_root_is_empty() {
  let root = root();
  let generator = StarStubGenerator::default();
  let out = traverse(&root, &viewport(5000.0, 5000.0, 10.0, 10.0, 0.0), &LodConfig::default(), &generator);

  assert!(out.is_empty());
  assert_eq!(out.stats.cells_tested, 1);
  assert_eq!(out.stats.cells_pruned, 1);
  assert!(root.is_frontier());
  assert!(root.cached_stubs().is_none());
}

/// Subtrees the viewport misses are never expanded or populated.
#[test]
fn test_pruned_quadrants_stay_unmaterialized() {
  let root = root();
  let generator = StarStubGenerator::default();
  // Small viewport deep inside the NE quadrant.
  let out = traverse(&root, &viewport(400.0, 400.0, 40.0, 40.0, 0.0), &LodConfig::default(), &generator);

  assert!(!out.is_empty());
  for q in [Quadrant::NorthWest, Quadrant::SouthWest, Quadrant::SouthEast] {
    let child = root.child(q).unwrap();
    assert!(child.is_frontier(), "{q:?} should not be expanded");
    assert!(child.cached_stubs().is_none(), "{q:?} should have no stubs");
  }
  let ne = root.child(Quadrant::NorthEast).unwrap().bounds();
  for leaf in &out.visited {
    assert!(ne.overlaps(leaf.bounds()));
  }
}

// =========================================================================
// Leaves
// =========================================================================

/// Only leaves are returned; internal cells are structural.
#[test]
fn test_only_leaves_are_returned() {
  let root = root();
  let generator = StarStubGenerator::default();
  let out = traverse(&root, &viewport(0.0, 0.0, 100.0, 100.0, 15.0), &LodConfig::default(), &generator);

  assert!(!out.is_empty());
  for leaf in &out.visited {
    assert!(leaf.cell.is_frontier());
    assert!(leaf.cell.cached_stubs().is_some());
  }
  assert!(root.cached_stubs().is_none(), "internal root carries no stubs");
}

/// Leaves of a square tree all sit at the desired depth.
#[test]
fn test_leaves_at_desired_depth() {
  let root = root();
  let generator = StarStubGenerator::default();
  let config = LodConfig::default();
  // log2(512 * 4 / 64) = 5
  let out = traverse(&root, &viewport(0.0, 0.0, 64.0, 64.0, 0.0), &config, &generator);

  assert!(out.visited.iter().all(|leaf| leaf.depth() == 5));
  assert_eq!(out.stats.max_leaf_depth, 5);
  assert_eq!(out.stats.leaves_visited, out.len());
}

/// A root already at the desired depth is itself the only leaf.
#[test]
fn test_zoomed_out_returns_root() {
  let root = root();
  let generator = StarStubGenerator::default();
  let out = traverse(&root, &viewport(0.0, 0.0, 5000.0, 5000.0, 0.0), &LodConfig::default(), &generator);

  assert_eq!(out.addresses(), vec![CellAddress::ROOT]);
  assert!(root.is_frontier());
}

// =========================================================================
// Clamping
// =========================================================================

/// Pathological zoom stops at max_depth instead of recursing forever.
#[test]
fn test_max_depth_clamps_recursion() {
  let root = root();
  let generator = StarStubGenerator::default();
  let config = LodConfig {
    max_depth: 8,
    ..Default::default()
  };
  let out = traverse(&root, &viewport(1.0, 1.0, 1e-9, 1e-9, 0.0), &config, &generator);

  assert!(!out.is_empty());
  assert!(out.visited.iter().all(|leaf| leaf.depth() == 8));
  assert_eq!(out.stats.clamped_by_max_depth, out.len());
}

#[test]
fn test_min_cell_size_stops_refinement() {
  let root = root();
  let generator = StarStubGenerator::default();
  let config = LodConfig {
    min_cell_half_extent: 32.0,
    ..Default::default()
  };
  let out = traverse(&root, &viewport(1.0, 1.0, 0.5, 0.5, 0.0), &config, &generator);

  assert!(!out.is_empty());
  for leaf in &out.visited {
    assert_eq!(leaf.bounds().max_half_extent(), 32.0);
  }
  assert_eq!(out.stats.clamped_by_min_size, out.len());
}

// =========================================================================
// Caching
// =========================================================================

#[test]
fn test_second_identical_query_is_cache_hit() {
  let root = root();
  let generator = StarStubGenerator::default();
  let config = LodConfig::default();
  let vp = viewport(10.0, 96.0, 90.0, 160.0, 30.0);

  let first = traverse(&root, &vp, &config, &generator);
  assert!(first.stats.cells_expanded > 0);
  // Leaves plus the parents they are fading in over.
  assert!(first.stats.stubs_generated >= first.len());

  let second = traverse(&root, &vp, &config, &generator);
  assert!(second.stats.is_cache_hit());
  assert_eq!(first.addresses(), second.addresses());
}

#[test]
fn test_fade_within_unit_range() {
  let root = root();
  let generator = StarStubGenerator::default();
  let out = traverse(&root, &viewport(10.0, 96.0, 90.0, 160.0, 30.0), &LodConfig::default(), &generator);
  for leaf in &out.visited {
    assert!((0.0..=1.0).contains(&leaf.fade));
  }
}

// =========================================================================
// Cross-fade
// =========================================================================

/// A leaf that is still fading in carries its parent's content.
#[test]
fn test_fading_leaf_carries_parent_stubs() {
  let root = root();
  let generator = StarStubGenerator::default();
  // pseudo = log2(2048 / 90) = 4.508: depth 5 leaves, halfway faded in
  let out = traverse(&root, &viewport(10.0, 96.0, 90.0, 160.0, 30.0), &LodConfig::default(), &generator);

  assert!(!out.is_empty());
  for leaf in &out.visited {
    assert!(leaf.fade > 0.0 && leaf.fade < 1.0);
    let parent = leaf.parent.unwrap();
    assert_eq!(Some(parent.address()), leaf.address().parent());
    assert_eq!(Some(leaf.parent_stubs), parent.cached_stubs());
    assert!((leaf.parent_weight() + leaf.fade - 1.0).abs() < 1e-12);
  }
}

#[test]
fn test_fading_parents_listed_once() {
  let root = root();
  let generator = StarStubGenerator::default();
  let out = traverse(&root, &viewport(10.0, 96.0, 90.0, 160.0, 30.0), &LodConfig::default(), &generator);

  let parents = out.fading_parents();
  assert!(!parents.is_empty());
  let mut addresses: Vec<_> = parents.iter().map(|p| p.cell.address()).collect();
  let total = addresses.len();
  addresses.sort();
  addresses.dedup();
  assert_eq!(addresses.len(), total);

  let expected: std::collections::HashSet<_> =
    out.visited.iter().filter_map(|leaf| leaf.address().parent()).collect();
  assert_eq!(expected.len(), total);
}

/// Fully faded-in leaves carry no parent content.
#[test]
fn test_settled_leaves_have_no_parent_stubs() {
  let root = root();
  let generator = StarStubGenerator::default();
  // pseudo exactly 5: depth 5 leaves at fade 1
  let out = traverse(&root, &viewport(0.0, 0.0, 64.0, 64.0, 0.0), &LodConfig::default(), &generator);

  assert!(!out.is_empty());
  for leaf in &out.visited {
    assert_eq!(leaf.fade, 1.0);
    assert!(leaf.parent_stubs.is_empty());
    assert_eq!(leaf.parent_weight(), 0.0);
  }
  assert!(out.fading_parents().is_empty());
  assert_eq!(out.stats.stubs_generated, out.len());
}

// =========================================================================
// Stop rules
// =========================================================================

#[test]
fn test_stop_rule_replaces_lod() {
  let root = root();
  let generator = StarStubGenerator::default();
  let vp = viewport(10.0, 96.0, 90.0, 160.0, 30.0);
  let stop_at_two = |cell: &Cell, _: &OrientedViewport| cell.depth() >= 2;

  let out = traverse_with_rule(&root, &vp, &LodConfig::default(), &stop_at_two, &generator);

  assert!(!out.is_empty());
  for leaf in &out.visited {
    assert_eq!(leaf.depth(), 2);
    assert_eq!(leaf.fade, 1.0);
    assert!(leaf.parent_stubs.is_empty());
    assert!(vp.intersects_aabb(leaf.bounds()));
  }
  assert_eq!(out.stats.total_clamped(), 0);
}

#[test]
fn test_stop_rule_still_bounded_by_max_depth() {
  let root = root();
  let generator = StarStubGenerator::default();
  let config = LodConfig {
    max_depth: 6,
    ..Default::default()
  };
  let never = |_: &Cell, _: &OrientedViewport| false;

  let out = traverse_with_rule(&root, &viewport(300.0, 300.0, 20.0, 20.0, 0.0), &config, &never, &generator);

  assert!(!out.is_empty());
  assert!(out.visited.iter().all(|leaf| leaf.depth() == 6));
  assert_eq!(out.stats.clamped_by_max_depth, out.len());
}

#[test]
fn test_stop_rule_decisions() {
  let config = LodConfig {
    max_depth: 4,
    min_cell_half_extent: 8.0,
    ..Default::default()
  };
  let policy = LodPolicy::new(&config);
  assert_eq!(
    policy.evaluate_rule(true, 512.0, 0),
    LodDecision::Resolved {
      by: ResolvedBy::StopRule,
      fade: 1.0
    }
  );
  assert_eq!(policy.evaluate_rule(false, 512.0, 0), LodDecision::Refine);
  assert!(matches!(
    policy.evaluate_rule(false, 32.0, 4),
    LodDecision::Resolved {
      by: ResolvedBy::MaxDepth,
      ..
    }
  ));
  assert!(matches!(
    policy.evaluate_rule(false, 8.0, 2),
    LodDecision::Resolved {
      by: ResolvedBy::MinCellSize,
      ..
    }
  ));
}

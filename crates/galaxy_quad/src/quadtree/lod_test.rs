use super::*;

fn config() -> LodConfig {
  LodConfig::default()
}

#[test]
fn test_smoothstep_endpoints() {
  assert_eq!(smoothstep(-1.0), 0.0);
  assert_eq!(smoothstep(0.0), 0.0);
  assert_eq!(smoothstep(0.5), 0.5);
  assert_eq!(smoothstep(1.0), 1.0);
  assert_eq!(smoothstep(3.0), 1.0);
}

#[test]
fn test_smoothstep_is_monotonic() {
  let mut prev = 0.0;
  for i in 0..=100 {
    let v = smoothstep(f64::from(i) / 100.0);
    assert!(v >= prev);
    prev = v;
  }
}

/// Root 512, viewport min half-extent 90, 4 cells across:
/// log2(512 * 4 / 90) = 4.508...
#[test]
fn test_pseudo_depth_scenario_values() {
  let config = config();
  let policy = LodPolicy::new(&config);
  let pseudo = policy.pseudo_depth(512.0, 0, 90.0);
  assert!((pseudo - 4.5084).abs() < 1e-3, "got {pseudo}");
  assert_eq!(policy.desired_depth(pseudo), 5);
}

#[test]
fn test_pseudo_depth_independent_of_level_for_square_tree() {
  let config = config();
  let policy = LodPolicy::new(&config);
  let root = policy.pseudo_depth(512.0, 0, 37.0);
  for depth in 1..8 {
    let half = 512.0 / f64::from(1u32 << depth);
    let p = policy.pseudo_depth(half, depth, 37.0);
    assert!((p - root).abs() < 1e-9);
  }
}

#[test]
fn test_threshold_snaps_to_integer() {
  let config = config();
  let policy = LodPolicy::new(&config);
  // 512 * 4 / 128 = 16 -> exactly depth 4
  let p = policy.pseudo_depth(512.0, 0, 128.0);
  assert_eq!(p, 4.0);
  assert_eq!(policy.desired_depth(p), 4);
  // A hair of float noise commits to the same depth
  let p = policy.pseudo_depth(512.0, 0, 128.0 * (1.0 - 1e-12));
  assert_eq!(policy.desired_depth(p), 4);
}

#[test]
fn test_desired_depth_clamped() {
  let config = LodConfig {
    min_depth: 2,
    max_depth: 6,
    ..Default::default()
  };
  let policy = LodPolicy::new(&config);
  assert_eq!(policy.desired_depth(-3.0), 2);
  assert_eq!(policy.desired_depth(0.2), 2);
  assert_eq!(policy.desired_depth(4.1), 5);
  assert_eq!(policy.desired_depth(40.0), 6);
}

#[test]
fn test_evaluate_refines_shallow_cells() {
  let config = config();
  let policy = LodPolicy::new(&config);
  assert_eq!(policy.evaluate(512.0, 0, 90.0), LodDecision::Refine);
  assert_eq!(policy.evaluate(32.0, 4, 90.0), LodDecision::Refine);
  assert!(matches!(
    policy.evaluate(16.0, 5, 90.0),
    LodDecision::Resolved {
      by: ResolvedBy::DesiredDepth,
      ..
    }
  ));
}

#[test]
fn test_evaluate_stops_at_min_cell_size() {
  let config = LodConfig {
    min_cell_half_extent: 64.0,
    ..Default::default()
  };
  let policy = LodPolicy::new(&config);
  assert!(matches!(
    policy.evaluate(64.0, 3, 1.0),
    LodDecision::Resolved {
      by: ResolvedBy::MinCellSize,
      fade
    } if fade == 1.0
  ));
}

#[test]
fn test_evaluate_clamps_at_max_depth() {
  let config = LodConfig {
    max_depth: 3,
    ..Default::default()
  };
  let policy = LodPolicy::new(&config);
  // Pathological zoom: desired depth is far beyond 3.
  assert!(matches!(
    policy.evaluate(64.0, 3, 1e-6),
    LodDecision::Resolved {
      by: ResolvedBy::MaxDepth,
      fade
    } if fade == 1.0
  ));
}

#[test]
fn test_fade_ramps_across_band() {
  let config = config();
  let policy = LodPolicy::new(&config);
  // Just refined into depth 5 (pseudo barely above 4): almost invisible.
  assert!(policy.fade(4.01, 5) < 0.01);
  // Halfway through the band.
  assert_eq!(policy.fade(4.5, 5), 0.5);
  // Fully committed at the threshold.
  assert_eq!(policy.fade(5.0, 5), 1.0);
}

#[test]
fn test_zero_band_disables_fade() {
  let config = LodConfig {
    transition_band: 0.0,
    ..Default::default()
  };
  let policy = LodPolicy::new(&config);
  assert_eq!(policy.fade(4.01, 5), 1.0);
}

#[test]
fn test_fade_is_full_when_forced_by_min_depth() {
  let config = LodConfig {
    min_depth: 6,
    ..Default::default()
  };
  let policy = LodPolicy::new(&config);
  assert_eq!(policy.fade(1.5, 6), 1.0);
}

/// Across a threshold the new level's weight picks up where its parent's
/// leaves off, so the blended content is continuous in zoom.
#[test]
fn test_fade_is_continuous_across_threshold() {
  for band in [1.0, 0.5, 0.25] {
    let config = LodConfig {
      transition_band: band,
      ..Default::default()
    };
    let policy = LodPolicy::new(&config);
    let eps = 1e-7;
    let coarse_before = policy.fade(5.0 - eps, 5);
    let coarse_after = 1.0 - policy.fade(5.0 + eps, 6);
    assert!((coarse_before - coarse_after).abs() < 1e-6, "band {band}");
  }
}

#[test]
fn test_band_wider_than_one_level_is_capped() {
  let config = LodConfig {
    transition_band: 1.5,
    min_cell_half_extent: 64.0,
    ..Default::default()
  };
  assert!(config.validate().is_err());

  let policy = LodPolicy::new(&config);
  // Fully faded in by the next threshold.
  assert_eq!(policy.fade(5.0, 5), 1.0);
  // Clamped leaves sit past their own threshold.
  assert_eq!(policy.fade(5.2, 5), 1.0);
  assert!(matches!(
    policy.evaluate(64.0, 3, 1.0),
    LodDecision::Resolved {
      by: ResolvedBy::MinCellSize,
      fade
    } if fade == 1.0
  ));
}

#[test]
fn test_shallowest_level_never_fades() {
  let config = config();
  let policy = LodPolicy::new(&config);
  assert_eq!(policy.fade(-0.5, 0), 1.0);

  let config = LodConfig {
    min_depth: 3,
    ..Default::default()
  };
  let policy = LodPolicy::new(&config);
  assert_eq!(policy.fade(2.1, 3), 1.0);
}

//! Level-of-detail policy: how deep should a cell be for this viewport?
//!
//! The continuous "pseudo depth" of a cell is its depth plus the number of
//! halvings still needed before the cell's footprint drops below
//! `1 / cells_across` of the smallest viewport dimension:
//!
//! ```text
//! pseudo = depth + log2(cell_size * cells_across / viewport_min_size)
//! desired = clamp(ceil(pseudo), min_depth, max_depth)
//! ```
//!
//! The desired depth is a monotone step function of zoom. Each resolved
//! leaf also carries a smoothstep fade weight: right after a threshold
//! crossing the new level is drawn at weight ~0 over its parent's content
//! at ~1, and the two swap across `transition_band`, so the rendered
//! content is continuous in zoom.

use super::{Cell, LodConfig};
use crate::geometry::OrientedViewport;

/// Pseudo depths this close to an integer snap onto it, so a cell sitting
/// on a threshold commits to one depth despite float noise.
const THRESHOLD_SNAP: f64 = 1e-9;

/// Cubic Hermite ramp: 0 below 0, 1 above 1, smooth in between.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
  let t = t.clamp(0.0, 1.0);
  t * t * (3.0 - 2.0 * t)
}

/// Why a cell stopped refining.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedBy {
  /// Cell depth reached the desired depth for this viewport.
  DesiredDepth,
  /// Cell half-extent is at or below the configured minimum.
  MinCellSize,
  /// Desired depth exceeded the configured maximum and was clamped.
  MaxDepth,
  /// A caller-supplied [`StopRule`] accepted the cell.
  StopRule,
}

/// Caller-supplied replacement for the LOD stop test.
///
/// Returning `true` makes the cell a leaf for this query. The `max_depth`
/// and `min_cell_half_extent` bounds still apply when the rule keeps
/// refining. Any `Fn(&Cell, &OrientedViewport) -> bool` is a rule.
pub trait StopRule {
  fn should_stop(&self, cell: &Cell, viewport: &OrientedViewport) -> bool;
}

impl<F> StopRule for F
where
  F: Fn(&Cell, &OrientedViewport) -> bool,
{
  #[inline]
  fn should_stop(&self, cell: &Cell, viewport: &OrientedViewport) -> bool {
    self(cell, viewport)
  }
}

/// Outcome of the LOD test for one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LodDecision {
  /// Terminal for this query: render it.
  Resolved {
    /// Which stop condition fired.
    by: ResolvedBy,
    /// Blend weight in `[0, 1]` for fading the level in.
    fade: f64,
  },
  /// Needs finer detail: expand children and recurse.
  Refine,
}

/// Pure mapping (cell size, viewport footprint, depth) -> decision.
#[derive(Clone, Copy, Debug)]
pub struct LodPolicy<'a> {
  config: &'a LodConfig,
}

impl<'a> LodPolicy<'a> {
  pub fn new(config: &'a LodConfig) -> Self {
    Self { config }
  }

  /// Continuous target depth for a cell of `cell_half_extent` at `depth`.
  pub fn pseudo_depth(&self, cell_half_extent: f64, depth: u32, viewport_min_half_extent: f64) -> f64 {
    let ratio =
      cell_half_extent * self.config.cells_across / viewport_min_half_extent.max(f64::MIN_POSITIVE);
    let pseudo = f64::from(depth) + ratio.log2();
    let nearest = pseudo.round();
    if (pseudo - nearest).abs() < THRESHOLD_SNAP {
      nearest
    } else {
      pseudo
    }
  }

  /// `ceil(pseudo)` clamped into the configured depth range.
  pub fn desired_depth(&self, pseudo_depth: f64) -> u32 {
    self.config.clamp_depth(ceil_to_depth(pseudo_depth))
  }

  /// Cross-fade weight for a leaf at `depth` given its pseudo depth.
  ///
  /// A level appears when `pseudo` crosses `depth - 1` and ramps from 0 to
  /// 1 over `transition_band` (capped at one level), while its parent's
  /// content fades out with weight `1 - fade`. The band therefore ends no
  /// later than the next threshold, where the ramp restarts one level down
  /// and the leaf's own content becomes the fading parent.
  pub fn fade(&self, pseudo_depth: f64, depth: u32) -> f64 {
    let band = self.config.transition_band.min(1.0);
    // No coarser leaf exists to fade against: the shallowest allowed level
    // and levels forced deeper by min_depth.
    if band <= 0.0 || depth <= self.config.min_depth || f64::from(depth) > pseudo_depth.ceil() {
      return 1.0;
    }
    smoothstep((pseudo_depth - f64::from(depth) + 1.0) / band)
  }

  /// Decide whether the cell is resolved or needs refinement.
  pub fn evaluate(&self, cell_half_extent: f64, depth: u32, viewport_min_half_extent: f64) -> LodDecision {
    let pseudo = self.pseudo_depth(cell_half_extent, depth, viewport_min_half_extent);
    let desired = self.desired_depth(pseudo);

    let by = if depth >= desired {
      if depth >= self.config.max_depth && ceil_to_depth(pseudo) > depth {
        ResolvedBy::MaxDepth
      } else {
        ResolvedBy::DesiredDepth
      }
    } else if cell_half_extent <= self.config.min_cell_half_extent {
      ResolvedBy::MinCellSize
    } else {
      return LodDecision::Refine;
    };

    LodDecision::Resolved {
      by,
      fade: self.fade(pseudo, depth),
    }
  }

  /// Decision for a cell once a [`StopRule`] answered `stop`. Leaves
  /// resolved this way always have fade 1.
  pub fn evaluate_rule(&self, stop: bool, cell_half_extent: f64, depth: u32) -> LodDecision {
    let by = if stop {
      ResolvedBy::StopRule
    } else if depth >= self.config.max_depth {
      ResolvedBy::MaxDepth
    } else if cell_half_extent <= self.config.min_cell_half_extent {
      ResolvedBy::MinCellSize
    } else {
      return LodDecision::Refine;
    };
    LodDecision::Resolved { by, fade: 1.0 }
  }
}

/// Non-negative integer ceiling, saturating at `u32::MAX`.
fn ceil_to_depth(pseudo_depth: f64) -> u32 {
  let ceil = pseudo_depth.ceil();
  if ceil <= 0.0 {
    0
  } else if ceil >= f64::from(u32::MAX) {
    u32::MAX
  } else {
    ceil as u32
  }
}

#[cfg(test)]
#[path = "lod_test.rs"]
mod lod_test;

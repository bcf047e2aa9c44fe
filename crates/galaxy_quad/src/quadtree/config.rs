//! LodConfig - knobs for depth selection and recursion bounds.

use serde::{Deserialize, Serialize};

use crate::error::GalaxyError;

/// Deepest level the grid address scheme supports (x, y fit in `u32`).
pub const MAX_SUPPORTED_DEPTH: u32 = 30;

/// Configuration for level-of-detail selection during traversal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
  /// Target footprint: aim for about this many cells across the smallest
  /// viewport dimension. Larger values refine deeper.
  pub cells_across: f64,

  /// Width of the smoothstep cross-fade after a level appears, in depth
  /// units within `[0, 1]`. 0 disables fading.
  pub transition_band: f64,

  /// Shallowest depth a leaf may have.
  pub min_depth: u32,

  /// Deepest depth a leaf may have. Hard bound on recursion and growth.
  pub max_depth: u32,

  /// Cells with a half-extent at or below this size are never split.
  pub min_cell_half_extent: f64,
}

impl LodConfig {
  /// Check that every knob is usable.
  pub fn validate(&self) -> Result<(), GalaxyError> {
    if !(self.cells_across.is_finite() && self.cells_across > 0.0) {
      return Err(GalaxyError::InvalidConfig(format!(
        "cells_across must be positive, got {}",
        self.cells_across
      )));
    }
    if !(0.0..=1.0).contains(&self.transition_band) {
      return Err(GalaxyError::InvalidConfig(format!(
        "transition_band must be within [0, 1], got {}",
        self.transition_band
      )));
    }
    if !(self.min_cell_half_extent.is_finite() && self.min_cell_half_extent >= 0.0) {
      return Err(GalaxyError::InvalidConfig(format!(
        "min_cell_half_extent must be >= 0, got {}",
        self.min_cell_half_extent
      )));
    }
    if self.max_depth > MAX_SUPPORTED_DEPTH {
      return Err(GalaxyError::InvalidConfig(format!(
        "max_depth {} exceeds supported maximum {MAX_SUPPORTED_DEPTH}",
        self.max_depth
      )));
    }
    if self.min_depth > self.max_depth {
      return Err(GalaxyError::InvalidConfig(format!(
        "min_depth {} is greater than max_depth {}",
        self.min_depth, self.max_depth
      )));
    }
    Ok(())
  }

  /// Clamp a depth into `[min_depth, max_depth]`.
  #[inline]
  pub fn clamp_depth(&self, depth: u32) -> u32 {
    depth.clamp(self.min_depth, self.max_depth)
  }
}

impl Default for LodConfig {
  fn default() -> Self {
    Self {
      cells_across: 4.0,
      transition_band: 1.0,
      min_depth: 0,
      // Roughly matches web map tile pyramids
      max_depth: 20,
      min_cell_half_extent: 1e-6,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

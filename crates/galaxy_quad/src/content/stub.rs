//! Content stubs - minimal per-cell point content for rendering.
//!
//! A generator is handed a cell address and its bounds and returns a small
//! list of stubs. Seeding uses the address only; the bounds merely place
//! unit-square samples into world space.

use glam::DVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use serde::{Deserialize, Serialize};

use super::hash::{stub_id, tile_key};
use crate::error::GalaxyError;
use crate::geometry::DAabb2;
use crate::quadtree::CellAddress;

/// Placeholder point content of a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentStub {
  /// Stable identity derived from (world seed, address, index).
  pub id: u64,
  /// World-space position inside the owning cell.
  pub position: DVec2,
  /// Brightness in `[0, 1)`.
  pub brightness: f64,
}

impl ContentStub {
  /// Squared distance from the world origin.
  #[inline]
  pub fn radius_squared(&self) -> f64 {
    self.position.length_squared()
  }
}

/// Deterministic per-cell content source.
///
/// Implementations must be pure functions of `address`: the same address
/// always yields an identical list. `bounds` is the cell's rectangle and may
/// only be used to map samples into world space.
pub trait StubGenerator: Send + Sync {
  fn generate(&self, address: &CellAddress, bounds: &DAabb2) -> Vec<ContentStub>;
}

/// Configuration of the built-in star field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarStubConfig {
  /// Global seed mixed into every cell key.
  pub world_seed: u64,
  /// Expected stubs per cell grow as `growth^depth`.
  pub growth: f64,
  /// Relative spread of the per-cell count around the expectation.
  pub variation: f64,
  /// Hard cap on stubs in one cell.
  pub max_per_cell: usize,
}

impl StarStubConfig {
  pub fn validate(&self) -> Result<(), GalaxyError> {
    if !(self.growth.is_finite() && self.growth > 0.0) {
      return Err(GalaxyError::InvalidConfig(format!(
        "growth must be positive, got {}",
        self.growth
      )));
    }
    if !(self.variation.is_finite() && (0.0..=2.0).contains(&self.variation)) {
      return Err(GalaxyError::InvalidConfig(format!(
        "variation must be within [0, 2], got {}",
        self.variation
      )));
    }
    if self.max_per_cell == 0 {
      return Err(GalaxyError::InvalidConfig(
        "max_per_cell must be at least 1".into(),
      ));
    }
    Ok(())
  }
}

impl Default for StarStubConfig {
  fn default() -> Self {
    Self {
      world_seed: 8675309,
      growth: 1.25,
      variation: 0.3,
      max_per_cell: 64,
    }
  }
}

/// Built-in generator: uniformly scattered stars with random brightness.
#[derive(Clone, Debug, Default)]
pub struct StarStubGenerator {
  config: StarStubConfig,
}

impl StarStubGenerator {
  pub fn new(config: StarStubConfig) -> Result<Self, GalaxyError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn config(&self) -> &StarStubConfig {
    &self.config
  }

  /// Number of stubs for a cell, drawn from the cell's own stream.
  fn count(&self, depth: u32, rng: &mut ChaCha8Rng) -> usize {
    let expected = self.config.growth.powf(f64::from(depth)).floor();
    let jitter = ((rng.random::<f64>() - 0.5) * expected * self.config.variation).trunc();
    let n = (expected + jitter).max(1.0);
    // Saturating float -> usize cast, then cap.
    (n as usize).min(self.config.max_per_cell)
  }
}

impl StubGenerator for StarStubGenerator {
  fn generate(&self, address: &CellAddress, bounds: &DAabb2) -> Vec<ContentStub> {
    let key = tile_key(self.config.world_seed, address);
    let mut rng = ChaCha8Rng::seed_from_u64(key);
    let n = self.count(address.depth, &mut rng);

    let size = bounds.size();
    (0..n)
      .map(|i| {
        let offset = DVec2::new(rng.random::<f64>() - 0.5, rng.random::<f64>() - 0.5);
        ContentStub {
          id: stub_id(key, i as u64),
          position: bounds.center + offset * size,
          brightness: rng.random::<f64>(),
        }
      })
      .collect()
  }
}

#[cfg(test)]
#[path = "stub_test.rs"]
mod stub_test;

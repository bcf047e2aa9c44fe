//! Configuration parsing for the galaxy driver.

use std::path::Path;

use anyhow::{Context, Result};
use galaxy_quad::{GalaxyError, LodConfig, OrientedViewport, QuadTree, StarStubConfig};
use serde::{Deserialize, Serialize};

/// Root configuration. Every table is optional and falls back to defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Extent of the galaxy plane.
  pub root: RootConfig,
  /// Camera rectangle for single-frame runs and the sweep's starting frame.
  pub viewport: ViewportConfig,
  /// Depth selection knobs.
  pub lod: LodConfig,
  /// Star placeholder content.
  pub stars: StarStubConfig,
}

/// Root rectangle, given as center and half extents.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
  pub cx: f64,
  pub cy: f64,
  pub half_width: f64,
  pub half_height: f64,
}

impl Default for RootConfig {
  fn default() -> Self {
    Self {
      cx: 0.0,
      cy: 0.0,
      half_width: 512.0,
      half_height: 512.0,
    }
  }
}

/// Oriented viewport. The angle is in degrees, counter-clockwise.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
  pub cx: f64,
  pub cy: f64,
  pub hw: f64,
  pub hh: f64,
  pub theta_deg: f64,
}

impl Default for ViewportConfig {
  fn default() -> Self {
    Self {
      cx: 10.0,
      cy: 96.0,
      hw: 90.0,
      hh: 160.0,
      theta_deg: 30.0,
    }
  }
}

impl ViewportConfig {
  pub fn build(&self) -> Result<OrientedViewport, GalaxyError> {
    OrientedViewport::from_degrees(self.cx, self.cy, self.hw, self.hh, self.theta_deg)
  }
}

impl Config {
  /// Load configuration from a TOML file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;

    config.lod.validate().context("Invalid [lod] table")?;
    config.stars.validate().context("Invalid [stars] table")?;
    config.viewport.build().context("Invalid [viewport] table")?;

    Ok(config)
  }

  /// Load from `path` when given, otherwise use defaults.
  pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
    match path {
      Some(path) => Self::load(path),
      None => Ok(Self::default()),
    }
  }

  pub fn build_tree(&self) -> Result<QuadTree> {
    let root = &self.root;
    QuadTree::from_center_with(
      root.cx,
      root.cy,
      root.half_width,
      root.half_height,
      self.lod.clone(),
      self.stars.clone(),
    )
    .context("Invalid [root] table")
  }

  pub fn to_toml(&self) -> Result<String> {
    toml::to_string_pretty(self).context("Failed to serialize config")
  }
}

//! Error type for construction-time argument validation.
//!
//! Per-frame queries never fail: an empty visited set is a normal outcome.

use thiserror::Error;

/// Invalid arguments rejected when a viewport, tree or config is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GalaxyError {
  /// A half-extent was zero, negative or not finite.
  #[error("{what} must be a positive finite half-extent, got {value}")]
  InvalidHalfExtent {
    /// Which extent was rejected (e.g. "viewport half-width").
    what: &'static str,
    /// The offending value.
    value: f64,
  },

  /// A zoom factor was zero, negative or not finite.
  #[error("zoom factor must be positive and finite, got {0}")]
  InvalidZoom(f64),

  /// A coordinate or angle was NaN or infinite.
  #[error("{what} must be finite, got {value}")]
  NonFinite {
    /// Which value was rejected.
    what: &'static str,
    /// The offending value.
    value: f64,
  },

  /// LOD or content configuration is inconsistent.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

/// Reject non-positive or non-finite half-extents.
pub(crate) fn check_half_extent(what: &'static str, value: f64) -> Result<f64, GalaxyError> {
  if value.is_finite() && value > 0.0 {
    Ok(value)
  } else {
    Err(GalaxyError::InvalidHalfExtent { what, value })
  }
}

/// Reject NaN and infinities.
pub(crate) fn check_finite(what: &'static str, value: f64) -> Result<f64, GalaxyError> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(GalaxyError::NonFinite { what, value })
  }
}

//! ScanConfig - how a navigable region is turned into a scan cube and split.

use super::ScanBudget;
use crate::error::VoxelizeError;

/// Largest accepted split factor per axis.
pub const MAX_SUBDIVISIONS: u32 = 16;

/// Configuration for scan volume planning and subdivision.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ScanConfig {
  /// Coarse step size in multiples of the resolution.
  /// S0 = resolution * coarse_step_factor
  pub coarse_step_factor: f64,

  /// Extra coarse steps added to each axis before rounding up.
  /// extent = ceil(size / S0 + padding_steps) * S0
  pub padding_steps: u32,

  /// Children per axis when a region is split (subdivisions^3 children).
  pub subdivisions: u32,

  /// Resource limits applied to every pass.
  pub budget: ScanBudget,
}

impl ScanConfig {
  pub fn with_coarse_step_factor(mut self, factor: f64) -> Self {
    self.coarse_step_factor = factor;
    self
  }

  pub fn with_padding_steps(mut self, steps: u32) -> Self {
    self.padding_steps = steps;
    self
  }

  pub fn with_subdivisions(mut self, subdivisions: u32) -> Self {
    self.subdivisions = subdivisions;
    self
  }

  pub fn with_budget(mut self, budget: ScanBudget) -> Self {
    self.budget = budget;
    self
  }

  /// Children produced by one split.
  #[inline]
  pub fn children_per_split(&self) -> u32 {
    self.subdivisions * self.subdivisions * self.subdivisions
  }

  /// Reject values the planner cannot work with.
  pub fn validate(&self) -> Result<(), VoxelizeError> {
    if !self.coarse_step_factor.is_finite() || self.coarse_step_factor <= 0.0 {
      return Err(VoxelizeError::InvalidConfig(format!(
        "coarse_step_factor must be finite and positive, got {}",
        self.coarse_step_factor
      )));
    }
    if !(2..=MAX_SUBDIVISIONS).contains(&self.subdivisions) {
      return Err(VoxelizeError::InvalidConfig(format!(
        "subdivisions must be in 2..={}, got {}",
        MAX_SUBDIVISIONS, self.subdivisions
      )));
    }
    Ok(())
  }

  /// Parse and validate a configuration from TOML. Missing keys keep their
  /// defaults.
  #[cfg(feature = "serde")]
  pub fn from_toml_str(source: &str) -> Result<Self, VoxelizeError> {
    let config: Self =
      toml::from_str(source).map_err(|err| VoxelizeError::InvalidConfig(err.to_string()))?;
    config.validate()?;
    Ok(config)
  }
}

impl Default for ScanConfig {
  fn default() -> Self {
    Self {
      coarse_step_factor: 8.0,
      padding_steps: 2,
      subdivisions: 2,
      budget: ScanBudget::DEFAULT,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

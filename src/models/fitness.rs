use serde::{Deserialize, Serialize};

/// Chronic/acute training load for a single calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessState {
  pub ctl: f64,
  pub atl: f64,
}

impl FitnessState {
  pub fn new(ctl: f64, atl: f64) -> Self {
    Self { ctl, atl }
  }

  /// Training stress balance (freshness): CTL - ATL
  pub fn tsb(&self) -> f64 {
    self.ctl - self.atl
  }
}

/// Training goals from the `training_goals` config block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
  /// TSB we want to land on tomorrow
  pub target_tsb: f64,
  /// ATL must not drop below this (avoids detraining)
  pub alb_lower_bound: f64,
  #[serde(default = "default_ctl_days")]
  pub ctl_days: u32,
  #[serde(default = "default_atl_days")]
  pub atl_days: u32,
}

fn default_ctl_days() -> u32 {
  42
}

fn default_atl_days() -> u32 {
  7
}

impl GoalConfig {
  pub fn new(target_tsb: f64, alb_lower_bound: f64) -> Self {
    Self {
      target_tsb,
      alb_lower_bound,
      ctl_days: default_ctl_days(),
      atl_days: default_atl_days(),
    }
  }
}

pub mod plan;

use crate::config::ConfigError;
use crate::intervals::IntervalsError;

pub use plan::{execute, plan_day, upload_workouts, PlannedDay, RunSummary};

/// Anything that aborts a run before uploads start
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Intervals(#[from] IntervalsError),
}

pub mod commands;
pub mod config;
pub mod intervals;
pub mod load;
pub mod models;
pub mod rationale;
pub mod schedule;
pub mod steps;
pub mod template;

#[cfg(test)]
mod test_utils;

use chrono::NaiveDate;
use std::path::PathBuf;

use commands::{PlannerError, RunSummary};
use config::PlannerConfig;
use intervals::{IntervalsClient, IntervalsCredentials};

/// Per-invocation overrides from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
  pub config_path: PathBuf,
  /// Plan as if today were this date
  pub date: Option<NaiveDate>,
  /// Never upload, whatever `live_mode` says
  pub force_dry_run: bool,
}

/// Load config and secrets, then plan tomorrow and (in live mode) upload it
pub async fn run(options: RunOptions) -> Result<RunSummary, PlannerError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = PlannerConfig::load(&options.config_path)?;
  tracing::info!(
    path = %options.config_path.display(),
    templates = config.templates.len(),
    "Configuration loaded"
  );

  let credentials = IntervalsCredentials::from_env()?;
  let client = IntervalsClient::new(&credentials)?;

  let tz = config.operational.resolve_timezone();
  let today = options
    .date
    .unwrap_or_else(|| commands::plan::today_in(tz));
  let live = config.operational.is_live(options.force_dry_run);

  commands::execute(&config, &client, today, live).await
}

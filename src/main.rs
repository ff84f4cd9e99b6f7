use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tss_planner::config::DEFAULT_CONFIG_PATH;
use tss_planner::RunOptions;

#[derive(Debug, Parser)]
#[command(version, about = "Plan tomorrow's training stress and push it to Intervals.icu")]
struct Args {
  /// Path to the planner config document
  #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
  config: PathBuf,

  /// Plan as if today were this date (YYYY-MM-DD)
  #[arg(long)]
  date: Option<chrono::NaiveDate>,

  /// Log the plan without uploading, even if live_mode is on
  #[arg(long)]
  dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let args = Args::parse();
  tracing::info!("Starting tss-planner v{}", env!("CARGO_PKG_VERSION"));

  let options = RunOptions {
    config_path: args.config,
    date: args.date,
    force_dry_run: args.dry_run,
  };

  match tss_planner::run(options).await {
    Ok(summary) => {
      tracing::info!(
        planned = summary.planned,
        uploaded = summary.uploaded,
        failed = summary.failed,
        "Run finished"
      );
      ExitCode::SUCCESS
    }
    Err(e) => {
      tracing::error!("Halting: {}", e);
      ExitCode::FAILURE
    }
  }
}

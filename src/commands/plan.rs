use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::commands::PlannerError;
use crate::config::PlannerConfig;
use crate::intervals::IntervalsClient;
use crate::load::TargetComputation;
use crate::models::{FitnessState, WorkoutObject};
use crate::schedule;
use crate::template::PlanContext;

/// ---------------------------------------------------------------------------
/// Planning
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PlannedDay {
  pub workout_date: NaiveDate,
  pub target: TargetComputation,
  pub workouts: Vec<WorkoutObject>,
}

/// Compute the target from `state` and lay out the workouts for `workout_date`
pub fn plan_day(
  config: &PlannerConfig,
  state: &FitnessState,
  workout_date: NaiveDate,
) -> PlannedDay {
  let target = TargetComputation::compute(state, &config.goals);
  tracing::info!(
    tsb_bound = target.tsb_bound_target,
    alb_bound = target.alb_bound_target,
    binding = %target.bounding_reason,
    "Target TSS for {}: {:.2}",
    workout_date,
    target.final_target
  );

  let ctx = PlanContext {
    date: workout_date,
    target: &target,
    goals: &config.goals,
    state,
    name_prefix: &config.operational.name_prefix,
  };

  let plan = config.schedule.plan_for(workout_date);
  let workouts = schedule::distribute(target.final_target, plan, &config.templates, &ctx);

  PlannedDay {
    workout_date,
    target,
    workouts,
  }
}

/// Current calendar date in `tz`
pub fn today_in(tz: Tz) -> NaiveDate {
  Utc::now().with_timezone(&tz).date_naive()
}

/// ---------------------------------------------------------------------------
/// Uploading
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
  pub planned: usize,
  pub uploaded: usize,
  pub failed: usize,
}

/// Upload each workout in order. A failed upload is logged and does not stop
/// the rest. Returns (uploaded, failed).
pub async fn upload_workouts(
  client: &IntervalsClient,
  workouts: &[WorkoutObject],
) -> (usize, usize) {
  let mut uploaded = 0;
  let mut failed = 0;

  for workout in workouts {
    match client.create_workout(workout).await {
      Ok(_) => {
        uploaded += 1;
        tracing::info!(name = %workout.name, "Workout created on Intervals.icu calendar");
      }
      Err(e) => {
        failed += 1;
        tracing::error!(name = %workout.name, error = %e, "Failed to create workout");
        if let Some(body) = e.response_body() {
          tracing::error!("Server response: {}", body);
        }
      }
    }
  }

  (uploaded, failed)
}

/// ---------------------------------------------------------------------------
/// Full Run
/// ---------------------------------------------------------------------------

/// Fetch today's state, plan tomorrow, and upload when `live` is set.
/// A failed state fetch aborts before anything is uploaded.
pub async fn execute(
  config: &PlannerConfig,
  client: &IntervalsClient,
  today: NaiveDate,
  live: bool,
) -> Result<RunSummary, PlannerError> {
  tracing::info!("Fetching current state for {}", today);
  let state = client.fetch_fitness_state(today).await?;
  tracing::info!(
    "Current state -> CTL: {:.2}, ATL: {:.2}, TSB: {:.2}",
    state.ctl,
    state.atl,
    state.tsb()
  );

  let workout_date = today.checked_add_days(Days::new(1)).unwrap_or(today);
  let planned = plan_day(config, &state, workout_date);

  for workout in &planned.workouts {
    tracing::info!(name = %workout.name, load = ?workout.load, "Generated workout");
    tracing::debug!("{}", workout.to_json_pretty());
  }

  let mut summary = RunSummary {
    planned: planned.workouts.len(),
    ..Default::default()
  };

  if !live {
    tracing::info!("Dry run - {} workout(s) not uploaded", summary.planned);
    return Ok(summary);
  }

  if planned.workouts.is_empty() {
    tracing::warn!("Live mode is on, but no workouts were generated for {}", workout_date);
    return Ok(summary);
  }

  tracing::info!("Live mode - uploading {} workout(s)", summary.planned);
  let (uploaded, failed) = upload_workouts(client, &planned.workouts).await;
  summary.uploaded = uploaded;
  summary.failed = failed;

  Ok(summary)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

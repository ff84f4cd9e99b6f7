//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - A sample config document
//! - Mock data factories
//! - Helper assertions

use chrono::NaiveDate;

use crate::intervals::IntervalsCredentials;
use crate::load::{BoundingReason, TargetComputation};
use crate::models::workout::WORKOUT_CATEGORY;
use crate::models::{FitnessState, GoalConfig, WorkoutObject};
use crate::schedule::TemplateLibrary;
use crate::template::WorkoutTemplate;

/// ---------------------------------------------------------------------------
/// Sample Config
/// ---------------------------------------------------------------------------

/// Saturday splits endurance in two, Sunday pairs openers with endurance
pub const SAMPLE_CONFIG: &str = r#"{
  "training_goals": {
    "target_tsb": -10.0,
    "alb_lower_bound": 35.0
  },
  "workout_templates": {
    "endurance": {
      "steps": [
        "- 10m ramp 50%-65% FTP",
        "- {{ DURATION }} 65% FTP"
      ]
    },
    "openers": {
      "type": "Ride",
      "steps": [
        "- spin easy, high cadence",
        "- 15m ramp 50%-70% FTP",
        "- 20m 60% FTP"
      ]
    },
    "run_easy": {
      "type": "Run",
      "steps": [
        "- {{ DURATION }} 70% threshold pace"
      ]
    }
  },
  "weekly_schedule": {
    "saturday": "endurance*2",
    "sunday": ["openers", "endurance"],
    "default": ["endurance"]
  },
  "operational_settings": {
    "timezone": "Europe/Berlin",
    "live_mode": false,
    "name_prefix": "Auto-Plan: "
  }
}"#;

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_template(name: &str, lines: &[&str]) -> WorkoutTemplate {
  let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
  WorkoutTemplate::parse(name, "Ride", &lines).expect("Failed to parse mock template")
}

/// `endurance`: one variable step at 60% FTP, no fixed steps.
/// `commute`: a single fixed 72m @ 50% step worth exactly 30 TSS.
pub fn mock_library() -> TemplateLibrary {
  let mut library = TemplateLibrary::new();
  library.insert(
    "endurance".to_string(),
    mock_template("endurance", &["- {{ DURATION }} 60% FTP"]),
  );
  library.insert(
    "commute".to_string(),
    mock_template("commute", &["- ride to work, no target", "- 72m 50% FTP"]),
  );
  library
}

/// Target, goals and state for a day whose final target is `day_total`
pub fn mock_context_parts(day_total: f64) -> (TargetComputation, GoalConfig, FitnessState) {
  let target = TargetComputation {
    final_target: day_total,
    tsb_bound_target: day_total,
    alb_bound_target: day_total + 20.0,
    bounding_reason: BoundingReason::TsbDriven,
  };
  (target, GoalConfig::new(-10.0, 40.0), FitnessState::new(55.0, 60.0))
}

pub fn mock_credentials() -> IntervalsCredentials {
  IntervalsCredentials {
    athlete_id: "i12345".to_string(),
    api_key: "secret".to_string(),
  }
}

pub fn mock_workout(load: Option<i64>) -> WorkoutObject {
  WorkoutObject {
    category: WORKOUT_CATEGORY.to_string(),
    workout_type: "Ride".to_string(),
    name: "Auto-Plan: endurance".to_string(),
    start_date_local: NaiveDate::from_ymd_opt(2026, 10, 15)
      .and_then(|d| d.and_hms_opt(7, 0, 0))
      .expect("valid date"),
    description: "- 67m 60% FTP".to_string(),
    load,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_library_stress() {
    let library = mock_library();
    assert_eq!(library["endurance"].intrinsic_stress(), 0.0);
    assert_approx_eq!(library["commute"].intrinsic_stress(), 30.0, 1e-9);
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let (target, goals, state) = mock_context_parts(80.0);
    assert_eq!(target.final_target, 80.0);
    assert_eq!(goals.ctl_days, 42);
    assert_eq!(state.tsb(), -5.0);

    let workout = mock_workout(Some(40));
    assert_eq!(workout.load, Some(40));
    assert!(!workout.is_rest());
  }
}

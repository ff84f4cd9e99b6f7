use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const WORKOUT_CATEGORY: &str = "WORKOUT";
pub const REST_TYPE: &str = "Rest";

/// Planned calendar event, shaped like the Intervals.icu `events` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutObject {
  pub category: String,
  #[serde(rename = "type")]
  pub workout_type: String,
  pub name: String,
  /// Local wall-clock time, serialized as `YYYY-MM-DDTHH:MM:SS`
  pub start_date_local: NaiveDateTime,
  pub description: String,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub load: Option<i64>,
}

impl WorkoutObject {
  pub fn is_rest(&self) -> bool {
    self.workout_type == REST_TYPE
  }

  pub fn to_json_pretty(&self) -> String {
    serde_json::to_string_pretty(self).unwrap_or_default()
  }
}

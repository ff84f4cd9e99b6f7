//! Planner configuration (`config.json`)
//!
//! Loaded once per run and passed down explicitly. Templates and the weekly
//! schedule are validated here so the planning code never sees a template
//! with two variable segments or a schedule without a default.

use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::models::GoalConfig;
use crate::schedule::{DayPlan, RawDayPlan, TemplateLibrary, WeeklySchedule};
use crate::template::{WorkoutTemplate, DEFAULT_WORKOUT_TYPE, DURATION_PLACEHOLDER};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_NAME_PREFIX: &str = "Auto-Plan: ";
pub const DEFAULT_TIMEZONE: Tz = Tz::UTC;

/// Template name used when converting a legacy `workout_settings` block
pub const LEGACY_TEMPLATE_NAME: &str = "Z2";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid config JSON: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("Invalid training goals: {0}")]
  Goals(String),

  #[error("Invalid template '{name}': {reason}")]
  Template { name: String, reason: String },

  #[error("Invalid weekly schedule: {0}")]
  Schedule(String),

  #[error("Weekly schedule has no 'default' entry")]
  MissingDefaultSchedule,

  #[error("Config defines no workout templates")]
  NoTemplates,
}

/// ---------------------------------------------------------------------------
/// Raw Config Document
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawConfig {
  training_goals: GoalConfig,
  #[serde(default)]
  workout_templates: Option<HashMap<String, RawTemplate>>,
  #[serde(default)]
  workout_settings: Option<LegacyWorkoutSettings>,
  #[serde(default)]
  weekly_schedule: Option<HashMap<String, RawDayPlan>>,
  #[serde(default)]
  operational_settings: RawOperationalSettings,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
  #[serde(rename = "type", default = "default_workout_type")]
  workout_type: String,
  steps: Vec<String>,
}

fn default_workout_type() -> String {
  DEFAULT_WORKOUT_TYPE.to_string()
}

/// Single-workout settings from the first generation of the config format
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyWorkoutSettings {
  pub ramp_duration_min: u32,
  /// Fraction of FTP (0.5 = 50%)
  pub ramp_start_pct: f64,
  /// Fraction of FTP
  pub power_target_pct: f64,
  #[serde(default)]
  pub name_prefix: Option<String>,
}

impl LegacyWorkoutSettings {
  pub fn to_template_lines(&self) -> Vec<String> {
    vec![
      format!(
        "- {}m ramp {:.0}%-{:.0}% FTP",
        self.ramp_duration_min,
        self.ramp_start_pct * 100.0,
        self.power_target_pct * 100.0
      ),
      format!(
        "- {} {:.0}% FTP",
        DURATION_PLACEHOLDER,
        self.power_target_pct * 100.0
      ),
    ]
  }
}

#[derive(Debug, Default, Deserialize)]
struct RawOperationalSettings {
  #[serde(default)]
  timezone: Option<String>,
  #[serde(default)]
  live_mode: bool,
  #[serde(default)]
  name_prefix: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Validated Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OperationalSettings {
  /// IANA zone name; resolved lazily so a typo only warns
  pub timezone: String,
  pub live_mode: bool,
  pub name_prefix: String,
}

impl Default for OperationalSettings {
  fn default() -> Self {
    Self {
      timezone: DEFAULT_TIMEZONE.name().to_string(),
      live_mode: false,
      name_prefix: DEFAULT_NAME_PREFIX.to_string(),
    }
  }
}

impl OperationalSettings {
  /// Whether this run uploads; a command-line dry run always wins
  pub fn is_live(&self, force_dry_run: bool) -> bool {
    self.live_mode && !force_dry_run
  }

  /// Configured timezone, falling back to UTC when the name is unknown
  pub fn resolve_timezone(&self) -> Tz {
    match self.timezone.parse::<Tz>() {
      Ok(tz) => tz,
      Err(_) => {
        tracing::warn!(
          timezone = %self.timezone,
          fallback = DEFAULT_TIMEZONE.name(),
          "Unknown timezone, using fallback"
        );
        DEFAULT_TIMEZONE
      }
    }
  }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
  pub goals: GoalConfig,
  pub templates: TemplateLibrary,
  pub schedule: WeeklySchedule,
  pub operational: OperationalSettings,
}

impl PlannerConfig {
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.display().to_string(),
      source,
    })?;
    Self::from_json(&contents)
  }

  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let raw: RawConfig = serde_json::from_str(json)?;
    Self::from_raw(raw)
  }

  fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
    validate_goals(&raw.training_goals)?;

    let mut templates = TemplateLibrary::new();
    let mut legacy_prefix = None;

    match (&raw.workout_templates, &raw.workout_settings) {
      (Some(defined), _) => {
        for (name, tpl) in defined {
          let parsed = WorkoutTemplate::parse(name, &tpl.workout_type, &tpl.steps)?;
          templates.insert(name.clone(), parsed);
        }
      }
      (None, Some(legacy)) => {
        let lines = legacy.to_template_lines();
        let parsed = WorkoutTemplate::parse(LEGACY_TEMPLATE_NAME, DEFAULT_WORKOUT_TYPE, &lines)?;
        templates.insert(LEGACY_TEMPLATE_NAME.to_string(), parsed);
        // Legacy prefixes had no trailing separator ("Auto-Plan:")
        legacy_prefix = legacy.name_prefix.as_ref().map(|p| format!("{} ", p.trim_end()));
      }
      (None, None) => return Err(ConfigError::NoTemplates),
    }

    let schedule = match &raw.weekly_schedule {
      Some(entries) => WeeklySchedule::from_raw(entries)?,
      None if raw.workout_templates.is_none() => {
        WeeklySchedule::new(DayPlan::Single(LEGACY_TEMPLATE_NAME.to_string()))
      }
      None => return Err(ConfigError::MissingDefaultSchedule),
    };

    warn_unknown_templates(&schedule, &templates);

    let defaults = OperationalSettings::default();
    let operational = OperationalSettings {
      timezone: raw.operational_settings.timezone.unwrap_or(defaults.timezone),
      live_mode: raw.operational_settings.live_mode,
      name_prefix: raw
        .operational_settings
        .name_prefix
        .or(legacy_prefix)
        .unwrap_or(defaults.name_prefix),
    };

    Ok(Self {
      goals: raw.training_goals,
      templates,
      schedule,
      operational,
    })
  }
}

fn validate_goals(goals: &GoalConfig) -> Result<(), ConfigError> {
  if goals.ctl_days == 0 || goals.atl_days == 0 {
    return Err(ConfigError::Goals(format!(
      "day constants must be positive (ctl_days={}, atl_days={})",
      goals.ctl_days, goals.atl_days
    )));
  }
  Ok(())
}

/// Unknown names are tolerated at run time (the slot is skipped); flag them early
fn warn_unknown_templates(schedule: &WeeklySchedule, templates: &TemplateLibrary) {
  for plan in schedule.plans() {
    for name in plan.template_names() {
      if !templates.contains_key(name) {
        tracing::warn!(template = name, "Weekly schedule references an undefined template");
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

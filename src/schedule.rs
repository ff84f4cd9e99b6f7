//! Weekly schedule and distribution of a day's TSS across workouts

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::ConfigError;
use crate::models::WorkoutObject;
use crate::rationale::Part;
use crate::template::{self, PlanContext, WorkoutTemplate};

pub type TemplateLibrary = HashMap<String, WorkoutTemplate>;

/// ---------------------------------------------------------------------------
/// Day Plans
/// ---------------------------------------------------------------------------

/// How a day's workouts are laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayPlan {
  /// One workout takes the whole day target
  Single(String),
  /// `count` copies of one template share the target evenly
  EvenSplit { template: String, count: u32 },
  /// The first template runs at its own intrinsic stress, the second takes the rest
  FixedPlusVariable { fixed: String, variable: String },
}

/// Schedule entry as written in config: `"name"`, `"name*N"` or `["a", "b"]`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDayPlan {
  Text(String),
  Templates(Vec<String>),
}

impl DayPlan {
  pub fn from_raw(key: &str, raw: &RawDayPlan) -> Result<Self, ConfigError> {
    match raw {
      RawDayPlan::Text(text) => Self::from_text(key, text),
      RawDayPlan::Templates(names) => match names.as_slice() {
        [single] => Ok(DayPlan::Single(single.trim().to_string())),
        [fixed, variable] => Ok(DayPlan::FixedPlusVariable {
          fixed: fixed.trim().to_string(),
          variable: variable.trim().to_string(),
        }),
        _ => Err(ConfigError::Schedule(format!(
          "'{}' lists {} templates; expected 1 or 2",
          key,
          names.len()
        ))),
      },
    }
  }

  fn from_text(key: &str, text: &str) -> Result<Self, ConfigError> {
    let Some((name, count)) = text.rsplit_once('*') else {
      return Ok(DayPlan::Single(text.trim().to_string()));
    };

    let count: u32 = count.trim().parse().map_err(|_| {
      ConfigError::Schedule(format!("'{}' has an invalid split count: {}", key, text))
    })?;
    if count == 0 {
      return Err(ConfigError::Schedule(format!(
        "'{}' splits into zero workouts: {}",
        key, text
      )));
    }

    Ok(DayPlan::EvenSplit {
      template: name.trim().to_string(),
      count,
    })
  }

  /// Template names this plan refers to
  pub fn template_names(&self) -> Vec<&str> {
    match self {
      DayPlan::Single(name) => vec![name.as_str()],
      DayPlan::EvenSplit { template, .. } => vec![template.as_str()],
      DayPlan::FixedPlusVariable { fixed, variable } => vec![fixed.as_str(), variable.as_str()],
    }
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Schedule
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySchedule {
  days: HashMap<Weekday, DayPlan>,
  default: DayPlan,
}

impl WeeklySchedule {
  pub fn new(default: DayPlan) -> Self {
    Self {
      days: HashMap::new(),
      default,
    }
  }

  /// Build from the `weekly_schedule` block. Keys are English weekday names
  /// (any case) plus a mandatory `default`.
  pub fn from_raw(raw: &HashMap<String, RawDayPlan>) -> Result<Self, ConfigError> {
    let mut default = None;
    let mut days = HashMap::new();

    for (key, entry) in raw {
      let plan = DayPlan::from_raw(key, entry)?;
      let normalized = key.trim().to_lowercase();

      if normalized == "default" {
        default = Some(plan);
        continue;
      }

      let day: Weekday = normalized
        .parse()
        .map_err(|_| ConfigError::Schedule(format!("unknown weekday '{}'", key)))?;
      days.insert(day, plan);
    }

    let default = default.ok_or(ConfigError::MissingDefaultSchedule)?;
    Ok(Self { days, default })
  }

  pub fn plan_for(&self, date: NaiveDate) -> &DayPlan {
    self.days.get(&date.weekday()).unwrap_or(&self.default)
  }

  pub fn plans(&self) -> impl Iterator<Item = &DayPlan> {
    self.days.values().chain(std::iter::once(&self.default))
  }
}

/// ---------------------------------------------------------------------------
/// Distributor
/// ---------------------------------------------------------------------------

fn lookup<'t>(templates: &'t TemplateLibrary, name: &str) -> Option<&'t WorkoutTemplate> {
  let found = templates.get(name);
  if found.is_none() {
    tracing::warn!(template = name, "Schedule references unknown template - skipping slot");
  }
  found
}

/// Turn a day's total TSS into workouts according to `plan`.
///
/// A day with no budget yields a single rest event whatever the plan.
/// Slots naming an unknown template are skipped.
pub fn distribute(
  day_total: f64,
  plan: &DayPlan,
  templates: &TemplateLibrary,
  ctx: &PlanContext<'_>,
) -> Vec<WorkoutObject> {
  if day_total <= 0.0 {
    return vec![template::rest_day(ctx)];
  }

  match plan {
    DayPlan::Single(name) => lookup(templates, name)
      .map(|t| template::instantiate(t, day_total, None, ctx))
      .into_iter()
      .collect(),

    DayPlan::EvenSplit {
      template: name,
      count,
    } => {
      let Some(tpl) = lookup(templates, name) else {
        return Vec::new();
      };
      let share = day_total / *count as f64;
      (1..=*count)
        .map(|index| template::instantiate(tpl, share, Some(Part::new(index, *count)), ctx))
        .collect()
    }

    DayPlan::FixedPlusVariable { fixed, variable } => {
      let mut workouts = Vec::with_capacity(2);
      let mut remainder = day_total;

      if let Some(tpl) = lookup(templates, fixed) {
        let intrinsic = tpl.intrinsic_stress();
        workouts.push(template::instantiate(tpl, intrinsic, Some(Part::new(1, 2)), ctx));
        remainder -= intrinsic;
      }

      if let Some(tpl) = lookup(templates, variable) {
        workouts.push(template::instantiate(tpl, remainder, Some(Part::new(2, 2)), ctx));
      }

      workouts
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

//! Workout templates and their instantiation for a TSS budget
//!
//! A template is an ordered list of step lines. At most one line carries the
//! `{{ DURATION }}` placeholder: that is the variable segment, sized so the
//! whole workout hits its budget. Every other line is fixed and contributes
//! its own intrinsic stress. Templates are parsed once at config load.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::ConfigError;
use crate::load::TargetComputation;
use crate::models::workout::{REST_TYPE, WORKOUT_CATEGORY};
use crate::models::{FitnessState, GoalConfig, WorkoutObject};
use crate::rationale::{self, Part};
use crate::steps::{self, IntensityProfile, StepStress};

pub const DURATION_PLACEHOLDER: &str = "{{ DURATION }}";
pub const DEFAULT_WORKOUT_TYPE: &str = "Ride";

const FIRST_PART_START_HOUR: u32 = 7;
const LATER_PART_OFFSET_HOURS: i64 = 10;

static PLACEHOLDER_PATTERN: LazyLock<Option<Regex>> =
  LazyLock::new(|| Regex::new(r"\{\{\s*DURATION\s*\}\}").ok());

/// ---------------------------------------------------------------------------
/// Segments
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FixedSegment {
  pub text: String,
  pub stress: StepStress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSegment {
  /// Line with the placeholder still in it
  pub line: String,
  pub intensity: IntensityProfile,
  /// Index among the template's lines
  position: usize,
}

impl VariableSegment {
  pub fn render(&self, minutes: u32) -> String {
    match PLACEHOLDER_PATTERN.as_ref() {
      Some(pattern) => pattern
        .replace(&self.line, format!("{}m", minutes).as_str())
        .into_owned(),
      None => self.line.replace(DURATION_PLACEHOLDER, &format!("{}m", minutes)),
    }
  }
}

/// Borrowed view of one template line, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
  Fixed(&'a FixedSegment),
  Variable(&'a VariableSegment),
}

/// ---------------------------------------------------------------------------
/// Template
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutTemplate {
  pub name: String,
  /// Intervals.icu activity type ("Ride", "Run", ...)
  pub workout_type: String,
  fixed: Vec<FixedSegment>,
  variable: Option<VariableSegment>,
}

impl WorkoutTemplate {
  /// Parse template lines, rejecting more than one placeholder or a
  /// placeholder line without an intensity to size it by.
  pub fn parse(name: &str, workout_type: &str, lines: &[String]) -> Result<Self, ConfigError> {
    let mut fixed = Vec::with_capacity(lines.len());
    let mut variable: Option<VariableSegment> = None;

    for (position, line) in lines.iter().enumerate() {
      let placeholders = count_placeholders(line);
      if placeholders == 0 {
        let stress = steps::parse_step(line);
        if stress.is_defaulted() {
          tracing::warn!(template = name, line = %line, "Step has no readable stress, scoring 0");
        }
        fixed.push(FixedSegment {
          text: line.clone(),
          stress,
        });
        continue;
      }

      if placeholders > 1 || variable.is_some() {
        return Err(ConfigError::Template {
          name: name.to_string(),
          reason: format!("more than one {} placeholder", DURATION_PLACEHOLDER),
        });
      }

      let intensity = steps::parse_intensity_profile(line).ok_or_else(|| ConfigError::Template {
        name: name.to_string(),
        reason: format!("variable step has no intensity: {}", line),
      })?;

      variable = Some(VariableSegment {
        line: line.clone(),
        intensity,
        position,
      });
    }

    Ok(Self {
      name: name.to_string(),
      workout_type: workout_type.to_string(),
      fixed,
      variable,
    })
  }

  /// Sum of the fixed segments' stress, independent of any budget
  pub fn intrinsic_stress(&self) -> f64 {
    self.fixed.iter().map(|s| s.stress.tss()).sum()
  }

  pub fn variable_segment(&self) -> Option<&VariableSegment> {
    self.variable.as_ref()
  }

  /// All lines in their original order
  pub fn segments(&self) -> Vec<Segment<'_>> {
    let mut segments: Vec<Segment<'_>> = self.fixed.iter().map(Segment::Fixed).collect();
    if let Some(variable) = &self.variable {
      let at = variable.position.min(segments.len());
      segments.insert(at, Segment::Variable(variable));
    }
    segments
  }

  /// Step text with the variable segment sized for `budget` TSS
  pub fn render_steps(&self, budget: f64) -> String {
    let minutes = self
      .variable
      .as_ref()
      .map(|v| steps::solve_profile_minutes(budget - self.intrinsic_stress(), &v.intensity))
      .unwrap_or(0);

    self
      .segments()
      .into_iter()
      .map(|segment| match segment {
        Segment::Fixed(fixed) => fixed.text.clone(),
        Segment::Variable(variable) => variable.render(minutes),
      })
      .collect::<Vec<_>>()
      .join("\n")
  }
}

fn count_placeholders(line: &str) -> usize {
  match PLACEHOLDER_PATTERN.as_ref() {
    Some(pattern) => pattern.find_iter(line).count(),
    None => line.matches(DURATION_PLACEHOLDER).count(),
  }
}

/// ---------------------------------------------------------------------------
/// Instantiation
/// ---------------------------------------------------------------------------

/// Everything an instance needs besides its own budget, passed explicitly
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
  pub date: NaiveDate,
  pub target: &'a TargetComputation,
  pub goals: &'a GoalConfig,
  pub state: &'a FitnessState,
  pub name_prefix: &'a str,
}

impl PlanContext<'_> {
  fn rationale(&self, part: Option<Part>) -> String {
    rationale::render(self.target, self.goals, self.state, part)
  }
}

/// 07:00 on the workout date; second and later parts start 10 hours later
pub fn start_time(date: NaiveDate, part: Option<Part>) -> NaiveDateTime {
  let start = NaiveTime::from_hms_opt(FIRST_PART_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
  let first = date.and_time(start);
  match part {
    Some(part) if part.index > 1 => first + Duration::hours(LATER_PART_OFFSET_HOURS),
    _ => first,
  }
}

/// Build one workout for `budget` TSS from a template
pub fn instantiate(
  template: &WorkoutTemplate,
  budget: f64,
  part: Option<Part>,
  ctx: &PlanContext<'_>,
) -> WorkoutObject {
  let part = part.filter(Part::is_multi);

  let mut name = format!("{}{}", ctx.name_prefix, template.name);
  if let Some(part) = part {
    name.push_str(&format!(" ({}/{})", part.index, part.total));
  }

  let description = format!("{}\n\n{}", template.render_steps(budget), ctx.rationale(part));

  WorkoutObject {
    category: WORKOUT_CATEGORY.to_string(),
    workout_type: template.workout_type.clone(),
    name,
    start_date_local: start_time(ctx.date, part),
    description,
    load: Some(budget.max(0.0).round() as i64),
  }
}

/// Rest-day placeholder event for a day with no stress budget
pub fn rest_day(ctx: &PlanContext<'_>) -> WorkoutObject {
  WorkoutObject {
    category: WORKOUT_CATEGORY.to_string(),
    workout_type: REST_TYPE.to_string(),
    name: format!("{}Rest Day", ctx.name_prefix),
    start_date_local: start_time(ctx.date, None),
    description: format!("Rest Day\n\n{}", ctx.rationale(None)),
    load: None,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

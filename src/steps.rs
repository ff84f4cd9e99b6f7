//! Workout step text: stress scoring and segment sizing
//!
//! A step line is free text such as `- 30m ramp 50%-75% FTP` or
//! `- 45m 65% FTP`. Stress follows the work-based TSS formula
//! `IF^2 x hours x 100`, with intensities expressed as fractions of FTP.
//! Text we cannot read scores zero rather than failing, so informational
//! lines ("- easy spin, stay relaxed") never break aggregation.

use regex::Regex;
use std::sync::LazyLock;

/// ---------------------------------------------------------------------------
/// Token Patterns
/// ---------------------------------------------------------------------------

static DURATION_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
  // Matches: 30m, 5m (not 30min, not 30ms, not 1.5m)
  Regex::new(r"(?:^|[^\d.])(\d+)m\b").ok()
});

static INTENSITY_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
  // Matches: 65%, 50%-75% (two tokens), 87.5%
  Regex::new(r"(\d+(?:\.\d+)?)\s*%").ok()
});

static RAMP_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\bramp\b").ok());

/// ---------------------------------------------------------------------------
/// Intensity Profile
/// ---------------------------------------------------------------------------

/// Intensity over a segment, as fractions of FTP (0.65 = 65%)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityProfile {
  pub start: f64,
  pub end: f64,
  pub is_ramp: bool,
}

impl IntensityProfile {
  pub fn steady(intensity: f64) -> Self {
    Self {
      start: intensity,
      end: intensity,
      is_ramp: false,
    }
  }

  pub fn ramp(start: f64, end: f64) -> Self {
    Self {
      start,
      end,
      is_ramp: true,
    }
  }

  /// Mean squared intensity factor over the segment
  pub fn if_squared(&self) -> f64 {
    if self.is_ramp {
      (self.start.powi(2) + self.end.powi(2)) / 2.0
    } else {
      self.start.powi(2)
    }
  }
}

/// A step line we could read: duration plus intensity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSegment {
  pub duration_minutes: u32,
  pub intensity: IntensityProfile,
}

impl StepSegment {
  pub fn tss(&self) -> f64 {
    segment_tss(self.intensity.if_squared(), self.duration_minutes as f64 / 60.0)
  }
}

/// Result of scoring one step line
///
/// `Defaulted` keeps the zero-stress leniency explicit, so a line that
/// legitimately scores zero (`- 0m 60% FTP`) is distinguishable from one
/// that could not be read at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStress {
  Parsed(StepSegment),
  Defaulted,
}

impl StepStress {
  pub fn tss(&self) -> f64 {
    match self {
      StepStress::Parsed(segment) => segment.tss(),
      StepStress::Defaulted => 0.0,
    }
  }

  pub fn is_defaulted(&self) -> bool {
    matches!(self, StepStress::Defaulted)
  }
}

fn segment_tss(if_squared: f64, duration_hours: f64) -> f64 {
  if_squared * duration_hours * 100.0
}

/// ---------------------------------------------------------------------------
/// Step Parser
/// ---------------------------------------------------------------------------

/// Extract every `NN%` token as a fraction of FTP, in order of appearance.
/// Returns None if any token fails to parse.
pub fn parse_intensities(line: &str) -> Option<Vec<f64>> {
  let pattern = INTENSITY_PATTERN.as_ref()?;
  pattern
    .captures_iter(line)
    .map(|cap| {
      cap
        .get(1)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|pct| pct / 100.0)
    })
    .collect()
}

/// Read intensity from a line: one token is steady, two tokens with the
/// word "ramp" is a ramp. Two tokens without "ramp" hold the first value.
pub fn parse_intensity_profile(line: &str) -> Option<IntensityProfile> {
  let intensities = parse_intensities(line)?;
  let start = *intensities.first()?;
  let end = intensities.get(1).copied().unwrap_or(start);

  let is_ramp = RAMP_PATTERN
    .as_ref()
    .map(|p| p.is_match(line))
    .unwrap_or(false);

  if is_ramp {
    Some(IntensityProfile::ramp(start, end))
  } else {
    Some(IntensityProfile::steady(start))
  }
}

fn parse_duration_minutes(line: &str) -> Option<u32> {
  let pattern = DURATION_PATTERN.as_ref()?;
  let cap = pattern.captures(line)?;
  cap.get(1)?.as_str().parse().ok()
}

/// Parse a step line into its segment, if it has both a duration and an intensity
pub fn parse_step(line: &str) -> StepStress {
  let duration_minutes = parse_duration_minutes(line);
  let intensity = parse_intensity_profile(line);

  match (duration_minutes, intensity) {
    (Some(duration_minutes), Some(intensity)) => StepStress::Parsed(StepSegment {
      duration_minutes,
      intensity,
    }),
    _ => StepStress::Defaulted,
  }
}

/// Intrinsic TSS of a step line (0.0 when the line cannot be read)
pub fn step_tss(line: &str) -> f64 {
  parse_step(line).tss()
}

/// ---------------------------------------------------------------------------
/// Segment Duration Solver
/// ---------------------------------------------------------------------------

/// Whole minutes at `intensity` (fraction of FTP) that produce `budget` TSS.
///
/// Rounds half away from zero (`f64::round`), so 66.5 min becomes 67.
pub fn solve_duration_minutes(budget: f64, intensity: f64) -> u32 {
  solve_profile_minutes(budget, &IntensityProfile::steady(intensity))
}

/// Same as [`solve_duration_minutes`] for an arbitrary intensity profile
pub fn solve_profile_minutes(budget: f64, profile: &IntensityProfile) -> u32 {
  let if_squared = profile.if_squared();
  let peak = profile.start.max(profile.end);
  if !budget.is_finite() || budget <= 0.0 || peak <= 0.0 || if_squared <= 0.0 {
    return 0;
  }

  let duration_hours = budget / (if_squared * 100.0);
  (duration_hours * 60.0).round() as u32
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

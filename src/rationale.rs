//! Human-readable trace of why a workout got its load
//!
//! Appended to every event description so the calendar entry explains
//! itself without access to this tool's logs.

use crate::load::TargetComputation;
use crate::models::{FitnessState, GoalConfig};

pub const RATIONALE_HEADER: &str = "--- Plan Rationale ---";

/// Position of a workout within a multi-workout day (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
  pub index: u32,
  pub total: u32,
}

impl Part {
  pub fn new(index: u32, total: u32) -> Self {
    Self { index, total }
  }

  pub fn is_multi(&self) -> bool {
    self.total > 1
  }
}

pub fn render(
  target: &TargetComputation,
  goals: &GoalConfig,
  state: &FitnessState,
  part: Option<Part>,
) -> String {
  let mut lines = vec![
    RATIONALE_HEADER.to_string(),
    format!(
      "Goal: TSB {:.1}, ALB floor {:.1}",
      goals.target_tsb, goals.alb_lower_bound
    ),
    format!(
      "Current: CTL {:.1}, ATL {:.1}, TSB {:.1}",
      state.ctl,
      state.atl,
      state.tsb()
    ),
    format!("TSB-driven target: {:.1} TSS", target.tsb_bound_target),
    format!("ALB cap: {:.1} TSS", target.alb_bound_target),
    format!("Binding: {}", target.bounding_reason),
    format!("Day total: {:.1} TSS", target.final_target),
  ];

  if let Some(part) = part.filter(Part::is_multi) {
    lines.push(format!("Part {} of {}", part.index, part.total));
  }

  lines.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::load::BoundingReason;

  fn sample_target() -> TargetComputation {
    TargetComputation {
      final_target: 45.0,
      tsb_bound_target: 108.0,
      alb_bound_target: 45.0,
      bounding_reason: BoundingReason::AlbCapped,
    }
  }

  #[test]
  fn test_renders_fixed_structure() {
    let text = render(
      &sample_target(),
      &GoalConfig::new(-10.0, 20.0),
      &FitnessState::new(60.0, 65.0),
      None,
    );

    let expected = "--- Plan Rationale ---\n\
                    Goal: TSB -10.0, ALB floor 20.0\n\
                    Current: CTL 60.0, ATL 65.0, TSB -5.0\n\
                    TSB-driven target: 108.0 TSS\n\
                    ALB cap: 45.0 TSS\n\
                    Binding: ALB cap\n\
                    Day total: 45.0 TSS";
    assert_eq!(text, expected);
  }

  #[test]
  fn test_multi_part_line() {
    let text = render(
      &sample_target(),
      &GoalConfig::new(-10.0, 20.0),
      &FitnessState::new(60.0, 65.0),
      Some(Part::new(2, 2)),
    );
    assert!(text.ends_with("Part 2 of 2"));
  }

  #[test]
  fn test_single_part_is_not_tagged() {
    let text = render(
      &sample_target(),
      &GoalConfig::new(-10.0, 20.0),
      &FitnessState::new(60.0, 65.0),
      Some(Part::new(1, 1)),
    );
    assert!(!text.contains("Part "));
  }
}

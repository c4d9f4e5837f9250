//! Movement plan model
//!
//! A plan is a named, ordered list of steps. Step order is execution order on
//! the device and is never changed by anything in this workspace.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::CoreError;

/// Maximum number of steps a single plan may carry
pub const MAX_STEPS: usize = 50;

/// Accepted step distance in meters (closed interval)
pub const DISTANCE_RANGE: RangeInclusive<f64> = 1.0..=100.0;

fn default_persist() -> bool {
    true
}

/// Desired movement plan, as declared by the operator and tracked by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementPlan {
    /// Plan identifier. The device has no rename operation, so a changed name
    /// means a new plan.
    pub name: String,
    /// Whether the device writes the plan to durable storage
    #[serde(default = "default_persist")]
    pub persist: bool,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl MovementPlan {
    /// Create a persisted plan with no steps
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persist: default_persist(),
            steps: Vec::new(),
        }
    }

    /// Set the persistence flag
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Append a step
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Check the plan against its declared constraints.
    ///
    /// Every violation is reported, in step order, as a `validation`
    /// diagnostic carrying the offending attribute path. An empty result
    /// means the plan may be sent to the device.
    pub fn validate(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        if self.steps.len() > MAX_STEPS {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::Validation,
                    "Invalid Attribute Value",
                    format!(
                        "steps must contain at most {} elements, got {}",
                        MAX_STEPS,
                        self.steps.len()
                    ),
                )
                .with_attribute("steps"),
            );
        }

        for (index, step) in self.steps.iter().enumerate() {
            diagnostics.extend(step.validate(index));
        }

        diagnostics
    }
}

/// A single movement instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Heading change in degrees
    pub angle: i64,
    /// Travel direction, `forward` or `backward`
    pub direction: String,
    /// Distance in meters
    pub distance: f64,
}

impl Step {
    pub fn new(angle: i64, direction: impl Into<String>, distance: f64) -> Self {
        Self {
            angle,
            direction: direction.into(),
            distance,
        }
    }

    /// Parsed travel direction
    pub fn direction(&self) -> Result<Direction, CoreError> {
        self.direction.parse()
    }

    fn validate(&self, index: usize) -> Vec<Diagnostic> {
        let mut issues = Vec::new();

        if let Err(e) = self.direction() {
            issues.push(
                Diagnostic::new(
                    DiagnosticKind::Validation,
                    "Invalid Attribute Value Match",
                    e.to_string(),
                )
                .with_attribute(format!("steps[{}].direction", index)),
            );
        }

        // NaN fails the range check as well
        if !DISTANCE_RANGE.contains(&self.distance) {
            issues.push(
                Diagnostic::new(
                    DiagnosticKind::Validation,
                    "Invalid Attribute Value",
                    format!(
                        "distance must be between {:.6} and {:.6}, got: {}",
                        DISTANCE_RANGE.start(),
                        DISTANCE_RANGE.end(),
                        self.distance
                    ),
                )
                .with_attribute(format!("steps[{}].distance", index)),
            );
        }

        issues
    }
}

/// Travel direction understood by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            other => Err(CoreError::UnknownDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with(steps: Vec<Step>) -> MovementPlan {
        MovementPlan {
            name: "example".to_string(),
            persist: true,
            steps,
        }
    }

    #[test]
    fn test_valid_plan_has_no_diagnostics() {
        let plan = plan_with(vec![
            Step::new(0, "forward", 1.0),
            Step::new(-90, "backward", 100.0),
            Step::new(45, "forward", 37.5),
        ]);
        assert!(plan.validate().is_empty());
    }

    #[test]
    fn test_empty_plan_is_valid() {
        assert!(plan_with(vec![]).validate().is_empty());
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        let plan = plan_with(vec![
            Step::new(0, "forward", 1.0),
            Step::new(90, "right", 1.0),
        ]);
        let diagnostics = plan.validate();
        assert_eq!(diagnostics.len(), 1);

        let issue = diagnostics.iter().next().unwrap();
        assert_eq!(issue.kind, DiagnosticKind::Validation);
        assert_eq!(issue.attribute.as_deref(), Some("steps[1].direction"));
        assert!(issue.detail.contains("right"));
    }

    #[test]
    fn test_distance_bounds_are_inclusive() {
        assert!(plan_with(vec![Step::new(0, "forward", 1.0)])
            .validate()
            .is_empty());
        assert!(plan_with(vec![Step::new(0, "forward", 100.0)])
            .validate()
            .is_empty());

        for distance in [0.99, 100.01, -5.0, f64::NAN, f64::INFINITY] {
            let diagnostics = plan_with(vec![Step::new(0, "forward", distance)]).validate();
            assert_eq!(diagnostics.len(), 1, "distance {} accepted", distance);
            assert_eq!(
                diagnostics.iter().next().unwrap().attribute.as_deref(),
                Some("steps[0].distance")
            );
        }
    }

    #[test]
    fn test_too_many_steps() {
        let steps = (0..=MAX_STEPS as i64)
            .map(|i| Step::new(i, "forward", 2.0))
            .collect();
        let diagnostics = plan_with(steps).validate();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().attribute.as_deref(),
            Some("steps")
        );

        let steps = (0..MAX_STEPS as i64)
            .map(|i| Step::new(i, "backward", 2.0))
            .collect();
        assert!(plan_with(steps).validate().is_empty());
    }

    #[test]
    fn test_all_issues_reported_in_step_order() {
        let plan = plan_with(vec![
            Step::new(0, "up", 0.5),
            Step::new(0, "forward", 3.0),
            Step::new(0, "down", 2.0),
        ]);
        let attributes: Vec<_> = plan
            .validate()
            .iter()
            .filter_map(|d| d.attribute.clone())
            .collect();
        assert_eq!(
            attributes,
            vec![
                "steps[0].direction",
                "steps[0].distance",
                "steps[2].direction"
            ]
        );
    }

    #[test]
    fn test_persist_defaults_to_true() {
        let plan: MovementPlan = serde_json::from_str(
            r#"{"name":"example","steps":[{"angle":0,"direction":"forward","distance":1}]}"#,
        )
        .unwrap();
        assert!(plan.persist);
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].distance, 1.0);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("forward".parse::<Direction>(), Ok(Direction::Forward));
        assert_eq!("backward".parse::<Direction>(), Ok(Direction::Backward));
        assert_eq!(
            "Forward".parse::<Direction>(),
            Err(CoreError::UnknownDirection("Forward".to_string()))
        );
        assert_eq!(Direction::Backward.to_string(), "backward");
    }
}

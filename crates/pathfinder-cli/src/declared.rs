//! Declared configuration file
//!
//! ```toml
//! [movement]
//! name = "example"
//! persist = true
//!
//! [[movement.steps]]
//! angle = 0
//! direction = "forward"
//! distance = 1.0
//! ```
//!
//! An absent `[movement]` table declares that no plan should exist. Unknown
//! keys are rejected at every level.

use std::path::Path;

use anyhow::{Context, Result};
use pathfinder_core::{MovementPlan, Step};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "DeclaredFile")]
pub struct Declared {
    pub movement: Option<MovementPlan>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclaredFile {
    #[serde(default)]
    movement: Option<DeclaredPlan>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclaredPlan {
    name: String,
    persist: Option<bool>,
    #[serde(default)]
    steps: Vec<DeclaredStep>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclaredStep {
    angle: i64,
    direction: String,
    distance: f64,
}

impl From<DeclaredFile> for Declared {
    fn from(file: DeclaredFile) -> Self {
        let movement = file.movement.map(|declared| {
            let plan = MovementPlan::new(declared.name);
            let plan = match declared.persist {
                Some(persist) => plan.with_persist(persist),
                None => plan,
            };
            declared.steps.into_iter().fold(plan, |plan, step| {
                plan.with_step(Step::new(step.angle, step.direction, step.distance))
            })
        });
        Self { movement }
    }
}

impl Declared {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read declared configuration: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse declared configuration: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_movement_block() {
        let declared = Declared::parse(
            r#"
            [movement]
            name = "example"

            [[movement.steps]]
            angle = 0
            direction = "forward"
            distance = 1.0

            [[movement.steps]]
            angle = -90
            direction = "backward"
            distance = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(
            declared.movement,
            Some(
                MovementPlan::new("example")
                    .with_step(Step::new(0, "forward", 1.0))
                    .with_step(Step::new(-90, "backward", 2.5))
            )
        );
    }

    #[test]
    fn test_unknown_direction_is_left_to_validation() {
        let declared = Declared::parse(
            r#"
            [movement]
            name = "example"
            persist = false
            steps = [{ angle = 0, direction = "right", distance = 1.0 }]
            "#,
        )
        .unwrap();

        let plan = declared.movement.unwrap();
        assert!(!plan.persist);
        assert!(plan.validate().has_error());
    }

    #[test]
    fn test_empty_file_declares_nothing() {
        assert_eq!(Declared::parse("").unwrap(), Declared::default());
    }

    #[test]
    fn test_unknown_tables_rejected() {
        assert!(Declared::parse("[moverment]\nname = \"typo\"").is_err());
    }

    #[test]
    fn test_misspelled_plan_keys_rejected() {
        let err = Declared::parse("[movement]\nname = \"example\"\npersits = false").unwrap_err();
        assert!(err.to_string().contains("persits"));

        let err = Declared::parse(
            r#"
            [movement]
            name = "example"
            steps = [{ angle = 0, direction = "forward", distnace = 1.0 }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("distnace"));
    }

    #[test]
    fn test_persist_defaults_to_true() {
        let declared = Declared::parse("[movement]\nname = \"example\"").unwrap();
        assert_eq!(declared.movement, Some(MovementPlan::new("example")));
        assert!(declared.movement.unwrap().persist);
    }
}

//! Tracked state file
//!
//! The CLI plays the host role: it remembers what the provider reported
//! between runs. The file holds the last tracked movement plan as JSON and
//! is removed once nothing is tracked.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pathfinder_core::MovementPlan;
use serde::{Deserialize, Serialize};

const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    version: u32,
    movement: Option<MovementPlan>,
}

pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tracked plan, or `None` when no state file exists
    pub fn load(&self) -> Result<Option<MovementPlan>> {
        if !self.path.exists() {
            tracing::debug!("State file does not exist, nothing tracked");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        let document: StateDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        if document.version != STATE_VERSION {
            anyhow::bail!(
                "Unsupported state file version {} in {}",
                document.version,
                self.path.display()
            );
        }
        tracing::debug!("Loaded state from {}", self.path.display());
        Ok(document.movement)
    }

    /// Persist `tracked`; `None` removes the file
    pub fn save(&self, tracked: Option<&MovementPlan>) -> Result<()> {
        let Some(plan) = tracked else {
            if self.path.exists() {
                std::fs::remove_file(&self.path).with_context(|| {
                    format!("Failed to remove state file: {}", self.path.display())
                })?;
            }
            return Ok(());
        };

        let document = StateDocument {
            version: STATE_VERSION,
            movement: Some(plan.clone()),
        };
        let content = serde_json::to_string_pretty(&document)?;

        // Write next to the target, then rename over it
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        tracing::debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinder_core::Step;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_tracks_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("pathfinder.state.json"));
        assert_eq!(state.load().unwrap(), None);
    }

    #[test]
    fn test_save_load_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::new(dir.path().join("pathfinder.state.json"));
        let plan = MovementPlan::new("example").with_step(Step::new(0, "forward", 1.0));

        state.save(Some(&plan)).unwrap();
        assert_eq!(state.load().unwrap(), Some(plan));

        state.save(None).unwrap();
        assert!(!state.path().exists());
        assert_eq!(state.load().unwrap(), None);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathfinder.state.json");
        std::fs::write(&path, r#"{"version":9,"movement":null}"#).unwrap();

        let err = StateFile::new(path).load().unwrap_err();
        assert!(err.to_string().contains("Unsupported state file version 9"));
    }
}

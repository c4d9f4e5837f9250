//! Movement commands - plan, apply, refresh, destroy

use std::path::Path;

use anyhow::Result;
use pathfinder_core::{Diagnostics, MovementPlan, Response};
use pathfinder_provider::{plan_change, Change, Provider};
use serde::Serialize;

use crate::declared::Declared;
use crate::output::{OutputContext, OutputFormat, StepRow};
use crate::state::StateFile;

#[derive(Serialize)]
struct PlanSummary<'a> {
    change: String,
    tracked: Option<&'a MovementPlan>,
    declared: Option<&'a MovementPlan>,
}

fn print_plan(plan: &MovementPlan, ctx: &OutputContext) {
    ctx.print_kv(
        &[
            ("Name", plan.name.clone()),
            ("Persist", plan.persist.to_string()),
            ("Steps", plan.steps.len().to_string()),
        ],
        plan,
    );
    if !plan.steps.is_empty() && ctx.format == OutputFormat::Table {
        ctx.print(&StepRow::rows(&plan.steps));
    }
}

/// Store the outcome and print what is now tracked
fn finish(
    response: Response<MovementPlan>,
    state: &StateFile,
    ctx: &OutputContext,
) -> Result<Diagnostics> {
    state.save(response.state.as_ref())?;

    match &response.state {
        Some(plan) => print_plan(plan, ctx),
        None => ctx.info("No movement plan tracked"),
    }
    Ok(response.diagnostics)
}

/// Show the change `apply` would make
pub fn plan(declared: &Path, state: &StateFile, ctx: &OutputContext) -> Result<Diagnostics> {
    let desired = Declared::load(declared)?.movement;
    let prior = state.load()?;
    let change = plan_change(prior.as_ref(), desired.as_ref());

    // Surface validation problems before anything is applied
    let diagnostics = match (change, &desired) {
        (Change::Create | Change::Update | Change::Replace, Some(desired)) => desired.validate(),
        _ => Diagnostics::new(),
    };

    match ctx.format {
        OutputFormat::Json => ctx.print_kv(
            &[],
            &PlanSummary {
                change: change.to_string(),
                tracked: prior.as_ref(),
                declared: desired.as_ref(),
            },
        ),
        OutputFormat::Table => {
            println!("movement: {}", change);
            if let Some(desired) = desired.as_ref().filter(|_| change != Change::NoOp) {
                print_plan(desired, ctx);
            }
        }
    }

    Ok(diagnostics)
}

/// Converge the device on the declared plan
pub async fn apply(
    provider: &Provider,
    declared: &Path,
    state: &StateFile,
    ctx: &OutputContext,
) -> Result<Diagnostics> {
    let desired = Declared::load(declared)?.movement;
    let prior = state.load()?;
    let change = plan_change(prior.as_ref(), desired.as_ref());

    if change == Change::NoOp {
        ctx.info("No changes. The device matches the declared configuration.");
        return Ok(Diagnostics::new());
    }

    ctx.info(&format!("movement: {}", change));
    let response = provider.movement().apply(prior, desired).await;
    if !response.has_error() {
        ctx.success(&format!("Apply complete. State saved to {}", state.path().display()));
    }
    finish(response, state, ctx)
}

/// Confirm the tracked plan still exists on the device
pub async fn refresh(provider: &Provider, state: &StateFile, ctx: &OutputContext) -> Result<Diagnostics> {
    let Some(tracked) = state.load()? else {
        ctx.info("No movement plan tracked");
        return Ok(Diagnostics::new());
    };

    let response = provider.movement().read(tracked).await;
    finish(response, state, ctx)
}

/// Remove the tracked plan from the device
pub async fn destroy(provider: &Provider, state: &StateFile, ctx: &OutputContext) -> Result<Diagnostics> {
    let Some(tracked) = state.load()? else {
        ctx.info("No movement plan tracked");
        return Ok(Diagnostics::new());
    };

    let response = provider.movement().delete(tracked).await;
    if response.is_removed() {
        ctx.success("Movement plan destroyed");
    }
    finish(response, state, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pathfinder_client::testing::TestServer;
    use pathfinder_client::Transport;
    use pathfinder_core::DiagnosticKind;
    use pathfinder_mock::{create_router, DeviceState};
    use pretty_assertions::assert_eq;

    const DECLARED: &str = r#"
[movement]
name = "example"

[[movement.steps]]
angle = 0
direction = "forward"
distance = 1.0
"#;

    struct Fixture {
        device: DeviceState,
        provider: Provider,
        dir: tempfile::TempDir,
        _server: TestServer,
    }

    impl Fixture {
        async fn new() -> Self {
            let device = DeviceState::default();
            let server = TestServer::start(create_router(device.clone())).await.unwrap();
            let provider = Provider::new(Arc::new(server.client.clone()) as Arc<dyn Transport>);
            Self {
                device,
                provider,
                dir: tempfile::tempdir().unwrap(),
                _server: server,
            }
        }

        fn declare(&self, content: &str) -> std::path::PathBuf {
            let path = self.dir.path().join("pathfinder.toml");
            std::fs::write(&path, content).unwrap();
            path
        }

        fn state(&self) -> StateFile {
            StateFile::new(self.dir.path().join("pathfinder.state.json"))
        }
    }

    fn quiet() -> OutputContext {
        OutputContext::new(OutputFormat::Json, true, true)
    }

    #[tokio::test]
    async fn test_apply_then_destroy() {
        let fx = Fixture::new().await;
        let declared = fx.declare(DECLARED);
        let state = fx.state();

        let diagnostics = apply(&fx.provider, &declared, &state, &quiet()).await.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(state.load().unwrap().map(|p| p.name), Some("example".to_string()));
        assert!(fx.device.moving());

        // Second apply is a no-op and sends nothing
        let before = fx.device.request_count();
        apply(&fx.provider, &declared, &state, &quiet()).await.unwrap();
        assert_eq!(fx.device.request_count(), before);

        let diagnostics = destroy(&fx.provider, &state, &quiet()).await.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(state.load().unwrap(), None);
        assert!(!fx.device.moving());
    }

    #[tokio::test]
    async fn test_apply_invalid_plan_keeps_state_empty() {
        let fx = Fixture::new().await;
        let declared = fx.declare(&DECLARED.replace("forward", "right"));
        let state = fx.state();

        let diagnostics = apply(&fx.provider, &declared, &state, &quiet()).await.unwrap();

        assert_eq!(diagnostics.kinds(), vec![DiagnosticKind::Validation]);
        assert_eq!(state.load().unwrap(), None);
        assert_eq!(fx.device.request_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_invalid_rename_keeps_state_file() {
        let fx = Fixture::new().await;
        let state = fx.state();
        apply(&fx.provider, &fx.declare(DECLARED), &state, &quiet()).await.unwrap();
        let saved = std::fs::read_to_string(state.path()).unwrap();
        let before = fx.device.request_count();

        let renamed = DECLARED
            .replace("\"example\"", "\"patrol\"")
            .replace("forward", "right");
        let diagnostics = apply(&fx.provider, &fx.declare(&renamed), &state, &quiet())
            .await
            .unwrap();

        assert_eq!(diagnostics.kinds(), vec![DiagnosticKind::Validation]);
        assert_eq!(std::fs::read_to_string(state.path()).unwrap(), saved);
        assert_eq!(fx.device.request_count(), before);
        assert_eq!(fx.device.plan().map(|p| p.name), Some("example".to_string()));
    }

    #[tokio::test]
    async fn test_refresh_drops_plan_removed_out_of_band() {
        let fx = Fixture::new().await;
        let declared = fx.declare(DECLARED);
        let state = fx.state();
        apply(&fx.provider, &declared, &state, &quiet()).await.unwrap();

        fx.device.remove();
        let diagnostics = refresh(&fx.provider, &state, &quiet()).await.unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(state.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_plan_reports_validation_without_contacting_device() {
        let fx = Fixture::new().await;
        let declared = fx.declare(&DECLARED.replace("1.0", "0.1"));

        let diagnostics = plan(&declared, &fx.state(), &quiet()).unwrap();

        assert_eq!(diagnostics.kinds(), vec![DiagnosticKind::Validation]);
        assert_eq!(fx.device.request_count(), 0);
    }
}

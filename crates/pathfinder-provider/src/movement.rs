//! Movement plan reconciler
//!
//! Owns the create/read/update/delete lifecycle of the single movement plan a
//! device can hold. The device never echoes the installed plan: every
//! `/v1/movement` call answers only `{"moving": bool}`. Tracked attributes
//! therefore always come from the declared value; responses only confirm
//! that a call was accepted or that the plan still exists.

use std::sync::Arc;

use pathfinder_client::{codec, endpoints, Method, MovementRequest, MovementResponse, Transport};
use pathfinder_core::{Diagnostics, MovementPlan, Response};
use tracing::{debug, info, instrument, warn};

use crate::diagnostics::{self, Action};
use crate::exchange::{exchange, Reply};
use crate::planner::{plan_change, Change};

/// Lifecycle entry points for a movement plan
///
/// The host serializes calls per tracked plan; nothing here locks.
#[derive(Clone)]
pub struct MovementResource {
    transport: Arc<dyn Transport>,
}

impl MovementResource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Install `desired` on the device.
    ///
    /// The plan is validated and encoded before anything is sent. On success
    /// the declared value becomes the tracked snapshot. A failed create
    /// leaves nothing tracked.
    #[instrument(skip_all, fields(plan = %desired.name, steps = desired.steps.len()))]
    pub async fn create(&self, desired: MovementPlan) -> Response<MovementPlan> {
        match prepare(&desired) {
            Ok(body) => self.install(desired, body).await,
            Err(issues) => Response::failed(None, issues),
        }
    }

    /// POST an already validated and encoded plan
    async fn install(&self, desired: MovementPlan, body: Vec<u8>) -> Response<MovementPlan> {
        match exchange::<MovementResponse>(
            self.transport.as_ref(),
            Action::Create,
            Method::POST,
            endpoints::MOVEMENT,
            Some(body),
        )
        .await
        {
            Ok(Reply::Decoded(status)) => {
                info!(moving = status.moving, "Movement plan created");
                Response::tracked(desired)
            }
            Ok(Reply::Absent) => {
                warn!("Device answered 404 to create; plan is not tracked");
                Response::removed()
            }
            Err(diagnostic) => Response::failed(None, diagnostic),
        }
    }

    /// Confirm the tracked plan still exists.
    ///
    /// Tracked attributes are returned unchanged on success. A 404 means the
    /// plan was removed out of band and drops it from tracked state.
    #[instrument(skip_all, fields(plan = %tracked.name))]
    pub async fn read(&self, tracked: MovementPlan) -> Response<MovementPlan> {
        match exchange::<MovementResponse>(
            self.transport.as_ref(),
            Action::Read,
            Method::GET,
            endpoints::MOVEMENT,
            None,
        )
        .await
        {
            Ok(Reply::Decoded(status)) => {
                debug!(moving = status.moving, "Movement plan present");
                Response::tracked(tracked)
            }
            Ok(Reply::Absent) => {
                info!("Movement plan no longer on device");
                Response::removed()
            }
            Err(diagnostic) => Response::failed(Some(tracked), diagnostic),
        }
    }

    /// Record a new declared value.
    ///
    /// The device has no update operation and is not contacted: only the
    /// tracked snapshot changes. The declared value is still validated, and
    /// an invalid one leaves `tracked` in place.
    #[instrument(skip_all, fields(plan = %desired.name))]
    pub fn update(&self, tracked: MovementPlan, desired: MovementPlan) -> Response<MovementPlan> {
        let issues = desired.validate();
        if issues.has_error() {
            return Response::failed(Some(tracked), issues);
        }

        debug!("Tracked plan updated without contacting the device");
        Response::tracked(desired)
    }

    /// Remove the plan from the device.
    ///
    /// Success and 404 both drop the tracked plan. Any other failure keeps
    /// it so the delete can be retried.
    #[instrument(skip_all, fields(plan = %tracked.name))]
    pub async fn delete(&self, tracked: MovementPlan) -> Response<MovementPlan> {
        match exchange::<MovementResponse>(
            self.transport.as_ref(),
            Action::Delete,
            Method::DELETE,
            endpoints::MOVEMENT,
            None,
        )
        .await
        {
            Ok(Reply::Decoded(status)) => {
                info!(moving = status.moving, "Movement plan deleted");
                Response::removed()
            }
            Ok(Reply::Absent) => {
                debug!("Movement plan already absent");
                Response::removed()
            }
            Err(diagnostic) => Response::failed(Some(tracked), diagnostic),
        }
    }

    /// Run whichever lifecycle call [`plan_change`] selects.
    ///
    /// A replacement checks the new plan before deleting the old one, and
    /// stops after the delete if the delete failed.
    pub async fn apply(
        &self,
        prior: Option<MovementPlan>,
        desired: Option<MovementPlan>,
    ) -> Response<MovementPlan> {
        let change = plan_change(prior.as_ref(), desired.as_ref());
        debug!(%change, "Applying movement plan");

        match (change, prior, desired) {
            (Change::Create, _, Some(desired)) => self.create(desired).await,
            (Change::Update, Some(prior), Some(desired)) => self.update(prior, desired),
            (Change::Delete, Some(prior), _) => self.delete(prior).await,
            (Change::Replace, Some(prior), Some(desired)) => {
                // The old plan stays installed unless the new one can be sent
                let body = match prepare(&desired) {
                    Ok(body) => body,
                    Err(issues) => return Response::failed(Some(prior), issues),
                };
                let deleted = self.delete(prior).await;
                if deleted.has_error() {
                    return deleted;
                }
                self.install(desired, body).await
            }
            (_, prior, _) => Response {
                state: prior,
                diagnostics: Diagnostics::new(),
            },
        }
    }
}

/// Validate and encode `desired` without touching the device
fn prepare(desired: &MovementPlan) -> Result<Vec<u8>, Diagnostics> {
    let issues = desired.validate();
    if issues.has_error() {
        debug!(issues = issues.len(), "Declared plan rejected");
        return Err(issues);
    }

    MovementRequest::from_plan(desired)
        .and_then(|r| codec::encode(&r))
        .map_err(|e| diagnostics::codec_error(Action::Create, &e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinder_client::testing::RecordingTransport;
    use pathfinder_client::ClientError;
    use pathfinder_core::{DiagnosticKind, Step};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resource(transport: &Arc<RecordingTransport>) -> MovementResource {
        MovementResource::new(transport.clone() as Arc<dyn Transport>)
    }

    fn example() -> MovementPlan {
        MovementPlan::new("example").with_step(Step::new(0, "forward", 1.0))
    }

    // =========================================================================
    // Create
    // =========================================================================

    #[tokio::test]
    async fn test_create_tracks_declared_plan() {
        let transport = Arc::new(RecordingTransport::new().respond(201, r#"{"moving":true}"#));
        let movement = resource(&transport);

        let response = movement.create(example()).await;

        assert!(!response.has_error());
        assert_eq!(response.state, Some(example()));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/v1/movement");
        assert_eq!(
            request.json().unwrap(),
            json!({
                "name": "example",
                "persist": true,
                "steps": [{"angle": 0, "direction": "forward", "distance": 1.0}]
            })
        );
    }

    #[tokio::test]
    async fn test_create_sends_steps_in_declared_order() {
        let transport = Arc::new(RecordingTransport::new().respond(200, r#"{"moving":false}"#));
        let plan = MovementPlan::new("square")
            .with_persist(false)
            .with_step(Step::new(0, "forward", 5.0))
            .with_step(Step::new(90, "forward", 5.0))
            .with_step(Step::new(180, "backward", 2.5))
            .with_step(Step::new(-90, "forward", 99.0));

        let response = resource(&transport).create(plan.clone()).await;
        assert_eq!(response.state, Some(plan));

        let body = transport.last_request().unwrap().json().unwrap();
        let angles: Vec<i64> = body["steps"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["angle"].as_i64().unwrap())
            .collect();
        assert_eq!(angles, vec![0, 90, 180, -90]);
        assert_eq!(body["persist"], false);
    }

    #[tokio::test]
    async fn test_create_invalid_direction_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let plan = MovementPlan::new("example")
            .with_step(Step::new(0, "forward", 1.0))
            .with_step(Step::new(90, "right", 1.0));

        let response = resource(&transport).create(plan).await;

        assert!(response.is_removed());
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Validation]);
        assert_eq!(
            response.diagnostics.iter().next().unwrap().attribute.as_deref(),
            Some("steps[1].direction")
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_out_of_range_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let movement = resource(&transport);

        for distance in [0.5, 100.5, f64::NAN] {
            let plan = MovementPlan::new("example").with_step(Step::new(0, "forward", distance));
            let response = movement.create(plan).await;
            assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Validation]);
            assert!(response.is_removed());
        }

        let too_long = (0..51).fold(MovementPlan::new("long"), |plan, i| {
            plan.with_step(Step::new(i, "forward", 1.0))
        });
        let response = movement.create(too_long).await;
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Validation]);

        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_not_found_clears_without_error() {
        let transport = Arc::new(RecordingTransport::new().respond(404, ""));
        let response = resource(&transport).create(example()).await;

        assert!(response.is_removed());
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_create_failures_leave_nothing_tracked() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(500, r#"{"message":"motor fault","status":500}"#)
                .respond(201, "<html>")
                .fail(ClientError::ConnectionFailed("refused".into())),
        );
        let movement = resource(&transport);

        let response = movement.create(example()).await;
        assert!(response.is_removed());
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::UnexpectedStatus]);
        assert!(response.diagnostics.iter().next().unwrap().detail.contains("motor fault"));

        let response = movement.create(example()).await;
        assert!(response.is_removed());
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Decode]);

        let response = movement.create(example()).await;
        assert!(response.is_removed());
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Transport]);
    }

    // =========================================================================
    // Read
    // =========================================================================

    #[tokio::test]
    async fn test_read_keeps_tracked_values() {
        let transport = Arc::new(RecordingTransport::new().respond(200, r#"{"moving":false}"#));
        let response = resource(&transport).read(example()).await;

        assert_eq!(response.state, Some(example()));
        assert!(response.diagnostics.is_empty());

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/v1/movement");
    }

    #[tokio::test]
    async fn test_read_not_found_drops_plan() {
        let transport = Arc::new(RecordingTransport::new().respond(404, ""));
        let response = resource(&transport).read(example()).await;

        assert!(response.is_removed());
        assert!(response.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_keeps_plan() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(502, "")
                .respond(200, r#"{"moving":"maybe"}"#),
        );
        let movement = resource(&transport);

        let response = movement.read(example()).await;
        assert_eq!(response.state, Some(example()));
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::UnexpectedStatus]);

        let response = movement.read(example()).await;
        assert_eq!(response.state, Some(example()));
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Decode]);
    }

    // =========================================================================
    // Update
    // =========================================================================

    #[tokio::test]
    async fn test_update_never_contacts_device() {
        let transport = Arc::new(RecordingTransport::new());
        let desired = example()
            .with_persist(false)
            .with_step(Step::new(45, "backward", 3.0));

        let response = resource(&transport).update(example(), desired.clone());

        assert_eq!(response.state, Some(desired));
        assert!(response.diagnostics.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_tracked() {
        let transport = Arc::new(RecordingTransport::new());
        let desired = example().with_step(Step::new(0, "sideways", 3.0));

        let response = resource(&transport).update(example(), desired);

        assert_eq!(response.state, Some(example()));
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Validation]);
        assert_eq!(transport.call_count(), 0);
    }

    // =========================================================================
    // Delete
    // =========================================================================

    #[tokio::test]
    async fn test_delete_success_and_not_found_both_clear() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, r#"{"moving":false}"#)
                .respond(404, r#"{"message":"no movement plan","status":404}"#),
        );
        let movement = resource(&transport);

        let deleted = movement.delete(example()).await;
        assert!(deleted.is_removed());
        assert!(!deleted.has_error());

        let already_gone = movement.delete(example()).await;
        assert!(already_gone.is_removed());
        assert!(!already_gone.has_error());

        assert!(transport
            .requests()
            .iter()
            .all(|r| r.method == Method::DELETE && r.path == "/v1/movement"));
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_plan() {
        let transport = Arc::new(RecordingTransport::new().fail(ClientError::Timeout));
        let response = resource(&transport).delete(example()).await;

        assert_eq!(response.state, Some(example()));
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Transport]);
    }

    // =========================================================================
    // Apply
    // =========================================================================

    #[tokio::test]
    async fn test_apply_noop_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let movement = resource(&transport);

        let response = movement.apply(Some(example()), Some(example())).await;
        assert_eq!(response.state, Some(example()));

        let response = movement.apply(None, None).await;
        assert!(response.is_removed());

        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_replace_deletes_then_creates() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, r#"{"moving":false}"#)
                .respond(201, r#"{"moving":true}"#),
        );
        let renamed = MovementPlan {
            name: "renamed".into(),
            ..example()
        };

        let response = resource(&transport)
            .apply(Some(example()), Some(renamed.clone()))
            .await;

        assert_eq!(response.state, Some(renamed));
        let methods: Vec<Method> = transport.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![Method::DELETE, Method::POST]);
    }

    #[tokio::test]
    async fn test_apply_replace_stops_when_delete_fails() {
        let transport = Arc::new(RecordingTransport::new().respond(500, ""));
        let renamed = MovementPlan {
            name: "renamed".into(),
            ..example()
        };

        let response = resource(&transport)
            .apply(Some(example()), Some(renamed))
            .await;

        assert_eq!(response.state, Some(example()));
        assert!(response.has_error());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_apply_invalid_replacement_keeps_prior_installed() {
        let transport = Arc::new(RecordingTransport::new().respond(200, r#"{"moving":false}"#));
        let renamed = MovementPlan::new("renamed").with_step(Step::new(0, "right", 1.0));

        let response = resource(&transport)
            .apply(Some(example()), Some(renamed))
            .await;

        assert_eq!(response.state, Some(example()));
        assert_eq!(response.diagnostics.kinds(), vec![DiagnosticKind::Validation]);
        assert_eq!(transport.call_count(), 0);
    }
}

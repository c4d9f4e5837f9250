//! One request, one classified reply

use pathfinder_client::{Envelope, Method, StatusCode, Transport};
use pathfinder_core::Diagnostic;
use tracing::debug;

use crate::diagnostics::{self, Action};

/// Successful outcome of a round trip
#[derive(Debug)]
pub(crate) enum Reply<T> {
    /// 2xx with a body that decoded cleanly
    Decoded(T),
    /// 404: the remote object does not exist
    Absent,
}

/// Send one request and classify the response.
///
/// 404 is `Absent`, any other non-2xx is an `unexpected-status` diagnostic,
/// and a 2xx body must decode as `T`.
pub(crate) async fn exchange<T: Envelope>(
    transport: &dyn Transport,
    action: Action,
    method: Method,
    path: &str,
    body: Option<Vec<u8>>,
) -> Result<Reply<T>, Diagnostic> {
    let response = transport
        .send(method.clone(), path, body)
        .await
        .map_err(|e| diagnostics::client_error(action, &e))?;

    if response.status == StatusCode::NOT_FOUND {
        debug!(%method, path, "Remote object absent");
        return Ok(Reply::Absent);
    }

    if !response.status.is_success() {
        return Err(diagnostics::unexpected_status(
            action, &method, path, &response,
        ));
    }

    response
        .decode::<T>()
        .map(Reply::Decoded)
        .map_err(|e| diagnostics::codec_error(action, &e))
}

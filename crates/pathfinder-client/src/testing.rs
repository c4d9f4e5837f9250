//! Test utilities for pathfinder-client
//!
//! Provides an in-process HTTP server for integration tests and a scripted
//! [`Transport`] for unit tests that need to count or inspect requests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use tokio::net::TcpListener;

use crate::client::{ClientConfig, PathfinderClient};
use crate::error::{ClientError, Result};
use crate::transport::{RawResponse, Transport};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: PathfinderClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on an ephemeral local port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use pathfinder_client::testing::TestServer;
    ///
    /// let server = TestServer::start(pathfinder_mock::create_router(state)).await?;
    /// let response = server.client.send(Method::GET, "/v1/healthz", None).await?;
    /// ```
    pub async fn start(router: axum::Router) -> Result<Self> {
        Self::start_with(router, |config| config).await
    }

    /// Serve `router` and build the client from an adjusted configuration
    pub async fn start_with<F>(router: axum::Router, configure: F) -> Result<Self>
    where
        F: FnOnce(ClientConfig) -> ClientConfig,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let config = configure(
            ClientConfig::new(format!("http://{}", addr))
                .timeouts(Duration::from_secs(5), Duration::from_secs(2)),
        );
        let client = PathfinderClient::with_config(config)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A request captured by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    /// Body parsed as JSON, if any
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }
}

/// Transport that replays scripted responses and records every request
///
/// Responses are consumed in order. Once the script is exhausted every call
/// fails with [`ClientError::ConnectionFailed`].
#[derive(Default)]
pub struct RecordingTransport {
    script: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body`
    pub fn respond(self, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.script
            .lock()
            .push_back(Ok(RawResponse::new(status, body.to_string())));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, error: ClientError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Number of requests sent so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// All requests sent so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        self.requests.lock().push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });

        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::ConnectionFailed("no scripted response".into())))
    }
}

//! Mock Teletype API server.
//!
//! Provides an axum-based HTTP server that simulates the Teletype public API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// Path prefix of the public API.
pub const API_PREFIX: &str = "/public/api/v1";

/// A mock Teletype API server for testing.
///
/// The server runs in the background and can be used to test the Teletype
/// client against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `api_url()` to get the base URL for a `ClientConnection`.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Root URL of the server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Base URL of the API, suitable for `ClientConnection::with_api_base_url`.
    pub fn api_url(&self) -> String {
        format!("{}{}", self.url, API_PREFIX)
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Requests received so far by `endpoint` (e.g. "project/operators").
    pub async fn hit_count(&self, endpoint: &str) -> usize {
        self.state.read().await.hit_count(endpoint)
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        let DefaultScenario { project, operators } = Fixtures::default_scenario();
        operators
            .into_iter()
            .fold(MockState::new().with_project(project), MockState::with_operator)
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api: Router<Arc<RwLock<MockState>>> = Router::new()
            .route("/project/details", get(handlers::project_details))
            .route("/project/operators", get(handlers::project_operators));

        Router::new()
            .nest(API_PREFIX, api)
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

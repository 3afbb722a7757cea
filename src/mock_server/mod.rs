//! Mock Teletype API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Teletype
//! public API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server keeps state and hit counters
//! across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use teletype_api::mock_server::MockServer;
//! use teletype_api::{ClientConnection, TeletypeServices};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let connection = ClientConnection::new().with_api_base_url(server.api_url());
//!     let teletype = TeletypeServices::create("test-token", None, Some(connection));
//!
//!     // Server comes with default fixtures
//!     let project = teletype.project_service().unwrap().get_project().await.unwrap();
//!     assert_eq!(project.name(), Some("Test Project"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::{MockServer, API_PREFIX};
pub use state::MockState;

//! Teletype App API client library.
//!
//! A Rust library for the [Teletype App](https://teletype.app) public REST
//! API. A [`TeletypeServices`] factory owns the connection settings and hands
//! out endpoint services; responses are wrapped in attribute-mapped models
//! implementing [`ApiModel`].
//!
//! # Quick Start
//!
//! ```no_run
//! use teletype_api::{ApiModel, TeletypeServices};
//!
//! #[tokio::main]
//! async fn main() -> teletype_api::Result<()> {
//!     let teletype = TeletypeServices::create("your-token", None, None);
//!     let projects = teletype.project_service()?;
//!
//!     match projects.get_project().await {
//!         Ok(project) => println!("{}", project.as_json()?),
//!         Err(e) => {
//!             if let Some(context) = e.context() {
//!                 eprintln!("API error: {:?}", context.fields());
//!             }
//!             return Err(e);
//!         }
//!     }
//!
//!     let operators = projects.get_operators(false).await?;
//!     println!("Found {} operators", operators.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every failure is a [`TeletypeError`]. Failed API calls carry an
//! [`ErrorContext`] with the request payload, response status, truncated
//! body and the API's own error code and message.
//!
//! # Configuration
//!
//! [`TeletypeServices::from_env`] reads:
//!
//! - `TELETYPE_API_TOKEN` (required) - Your public API token
//! - `TELETYPE_API_URL` (optional) - Base URL (defaults to `https://api.teletype.app/public/api/v1`)
//! - `TELETYPE_APP_NAME` (optional) - Value of the `X-App-Name` header

mod client;
mod connection;
mod error;
mod models;
mod services;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{RequestMethod, RequestParams, ResponseContent, TeletypeClient, APP_NAME_HEADER};
pub use connection::{
    ClientConnection, ClientOptions, ClientOptionsPatch, DEFAULT_API_URL, DEFAULT_APP_NAME,
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
};
pub use error::{ErrorContext, Result, TeletypeError, MAX_CONTENT_LENGTH_IN_CONTEXT};

// Re-export traits
pub use traits::ApiModel;

// Re-export services
pub use services::{ProjectService, TeletypeServices};

// Re-export models
pub use models::{ModelAttributes, Operator, OperatorRole, OperatorStatus, Project};

//! HTTP request handlers for the mock server.

pub mod project;

pub use project::*;

//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Teletype API server.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

/// Shared state for the mock server.
///
/// Records are raw wire-format JSON, exactly as the real API would send them.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// The project returned by `project/details`. `None` answers with an API error.
    pub project: Option<Value>,

    /// Operators returned by `project/operators`.
    pub operators: Vec<Value>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// When set, every API endpoint answers with this HTTP status and a plain body.
    pub forced_status: Option<u16>,

    /// Number of requests received per endpoint (e.g. "project/operators").
    pub hits: HashMap<String, usize>,

    /// `X-App-Name` header of the most recent request.
    pub last_app_name: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Set the project record.
    pub fn with_project(mut self, project: Value) -> Self {
        self.project = Some(project);
        self
    }

    /// Add an operator record.
    pub fn with_operator(mut self, operator: Value) -> Self {
        self.operators.push(operator);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Answer every API request with `status`.
    pub fn with_forced_status(mut self, status: u16) -> Self {
        self.forced_status = Some(status);
        self
    }

    /// Record one request to `endpoint`.
    pub fn record_hit(&mut self, endpoint: &str, app_name: Option<String>) {
        *self.hits.entry(endpoint.to_string()).or_default() += 1;
        self.last_app_name = app_name;
    }

    /// Number of requests received by `endpoint`.
    pub fn hit_count(&self, endpoint: &str) -> usize {
        self.hits.get(endpoint).copied().unwrap_or(0)
    }

    /// Whether `token` is accepted.
    pub fn accepts_token(&self, token: Option<&str>) -> bool {
        match (&self.required_token, token) {
            (Some(required), Some(given)) => required == given,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_builders() {
        let state = MockState::new()
            .with_project(json!({"id": "p1"}))
            .with_operator(json!({"id": "op1"}))
            .with_operator(json!({"id": "op2"}));

        assert_eq!(state.project.as_ref().unwrap()["id"], "p1");
        assert_eq!(state.operators.len(), 2);
        assert!(state.forced_status.is_none());
    }

    #[test]
    fn test_state_hit_counting() {
        let mut state = MockState::new();
        state.record_hit("project/operators", None);
        state.record_hit("project/operators", Some("crm".to_string()));

        assert_eq!(state.hit_count("project/operators"), 2);
        assert_eq!(state.hit_count("project/details"), 0);
        assert_eq!(state.last_app_name.as_deref(), Some("crm"));
    }

    #[test]
    fn test_state_token_check() {
        let open = MockState::new();
        assert!(open.accepts_token(None));

        let locked = MockState::new().with_required_token("secret");
        assert!(locked.accepts_token(Some("secret")));
        assert!(!locked.accepts_token(Some("wrong")));
        assert!(!locked.accepts_token(None));
    }
}

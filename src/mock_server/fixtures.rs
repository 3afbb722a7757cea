//! Test data fixtures for the mock server.
//!
//! Provides factory functions for realistic wire-format records.

use serde_json::{json, Value};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Default data set served by [`crate::mock_server::MockServer::start`].
pub struct DefaultScenario {
    pub project: Value,
    pub operators: Vec<Value>,
}

impl Fixtures {
    /// Create a project record.
    pub fn project(id: &str, name: &str, owner_id: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "domain": format!("{id}.teletype.app"),
            "owner_id": owner_id,
            "url": format!("https://{id}.teletype.app"),
            "createdAt": "2023-05-01T10:00:00+00:00"
        })
    }

    /// Create an operator record with the given status code and roles.
    pub fn operator(id: &str, name: &str, status: i64, roles: &[&str]) -> Value {
        json!({
            "id": id,
            "email": format!("{}@example.com", name.to_lowercase()),
            "status": status,
            "name": name,
            "last_name": "Tester",
            "timezone": "Europe/Moscow",
            "language": "ru",
            "roles": roles
        })
    }

    /// A project owned by `op2`, with two operators.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            project: Self::project("test-project", "Test Project", "op2"),
            operators: vec![
                Self::operator("op1", "Alice", 20, &["operator"]),
                Self::operator("op2", "Bob", 30, &["owner", "admin"]),
            ],
        }
    }
}

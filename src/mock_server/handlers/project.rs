//! Project endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::client::APP_NAME_HEADER;
use crate::mock_server::state::MockState;

/// Query parameters every endpoint accepts.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub token: Option<String>,
}

/// GET /project/details
pub async fn project_details(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<AuthQuery>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = admit(&mut state, "project/details", &headers, &query) {
        return rejection;
    }

    match &state.project {
        Some(project) => success(project.clone()),
        None => failure("project_not_found", "Project not found"),
    }
}

/// GET /project/operators
pub async fn project_operators(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<AuthQuery>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = admit(&mut state, "project/operators", &headers, &query) {
        return rejection;
    }

    success(Value::Array(state.operators.clone()))
}

/// Count the hit, then apply forced status and token checks.
fn admit(
    state: &mut MockState,
    endpoint: &str,
    headers: &HeaderMap,
    query: &AuthQuery,
) -> Option<Response> {
    let app_name = headers
        .get(APP_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.record_hit(endpoint, app_name);

    if let Some(status) = state.forced_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Some((status, "Internal Server Error").into_response());
    }

    if !state.accepts_token(query.token.as_deref()) {
        return Some(failure("invalid_token", "Invalid API token"));
    }

    None
}

fn success(data: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": data
        })),
    )
        .into_response()
}

fn failure(code: &str, message: &str) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message
            }
        })),
    )
        .into_response()
}

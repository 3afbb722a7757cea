//! Request executor tests against a wiremock server.

use std::time::Duration;

use serde_json::json;
use teletype_api::{
    ClientConnection, ClientOptions, RequestParams, ResponseContent, TeletypeClient, TeletypeError,
    MAX_CONTENT_LENGTH_IN_CONTEXT,
};
use wiremock::matchers::{any, body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TeletypeClient {
    let connection = ClientConnection::new()
        .with_api_base_url(format!("{}/public/api/v1", server.uri()))
        .with_api_token("test-token")
        .with_app_name("test-app");
    TeletypeClient::new(connection).unwrap()
}

#[tokio::test]
async fn test_get_sends_token_params_and_app_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/public/api/v1/project/details"))
        .and(query_param("token", "test-token"))
        .and(query_param("lang", "ru"))
        .and(header("X-App-Name", "test-app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": "p1", "name": "Support"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut params = RequestParams::new();
    params.insert("lang".to_string(), "ru".to_string());

    let content = client_for(&mock_server)
        .request("project/details", &params, "get", true, true)
        .await
        .unwrap();

    assert_eq!(
        content,
        Some(ResponseContent::Decoded(json!({"id": "p1", "name": "Support"})))
    );
}

#[tokio::test]
async fn test_post_sends_params_as_multipart_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/public/api/v1/message/send"))
        .and(query_param("token", "test-token"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"chat_id\""))
        .and(body_string_contains("hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"sent": true}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut params = RequestParams::new();
    params.insert("chat_id".to_string(), "42".to_string());
    params.insert("text".to_string(), "hello".to_string());

    let content = client_for(&mock_server)
        .request("message/send", &params, "POST", true, true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(content.into_value(), json!({"sent": true}));
}

#[tokio::test]
async fn test_empty_app_name_omits_header() {
    let mock_server = MockServer::start().await;

    Mock::given(header_regex("X-App-Name", ".*"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let connection = ClientConnection::new()
        .with_api_base_url(mock_server.uri())
        .with_api_token("test-token")
        .with_app_name("");
    let client = TeletypeClient::new(connection).unwrap();

    assert_eq!(client.get("project/operators").await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_unsupported_method_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .request("project/details", &RequestParams::new(), "PUT", true, false)
        .await
        .unwrap_err();

    assert!(matches!(err, TeletypeError::BadRequest(_)));
    assert!(err.context().is_none());
}

#[tokio::test]
async fn test_empty_token_is_forbidden_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let connection = ClientConnection::new().with_api_base_url(mock_server.uri());
    let client = TeletypeClient::new(connection).unwrap();

    let err = client
        .request("project/details", &RequestParams::new(), "GET", true, false)
        .await
        .unwrap_err();

    assert!(matches!(err, TeletypeError::Forbidden(_)));
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn test_empty_base_url_is_forbidden() {
    let connection = ClientConnection::new()
        .with_api_base_url("")
        .with_api_token("test-token");
    let client = TeletypeClient::new(connection).unwrap();

    let err = client.get("project/details").await.unwrap_err();
    assert!(matches!(err, TeletypeError::Forbidden(ref m) if m.contains("base url")));
}

#[tokio::test]
async fn test_api_error_envelope_populates_context() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": {"code": "X", "message": "Y"}
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get("project/details")
        .await
        .unwrap_err();

    assert!(err.is_bad_request());
    assert_eq!(err.to_string(), "Error on calling function \"project/details\"");

    let context = err.context().expect("executor errors carry context");
    assert_eq!(context.error_code(), Some("X"));
    assert_eq!(context.error_message(), Some("Y"));
    assert_eq!(context.error_text(), Some("Y"));
    assert_eq!(context.response_http_status(), Some(200));
    assert!(context.response_time().is_some());
    assert_eq!(context.request_payload()["token"], "***");
    assert!(context
        .request_url()
        .unwrap()
        .ends_with("/public/api/v1/project/details"));
}

#[tokio::test]
async fn test_non_200_status_is_failure_regardless_of_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"success": true, "data": []})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get("project/operators")
        .await
        .unwrap_err();

    let context = err.context().unwrap();
    assert_eq!(context.response_http_status(), Some(500));
    assert_eq!(context.error_text(), Some("Bad instance http response status"));
    assert!(context.error_code().is_none());

    let fields = context.fields();
    assert_eq!(fields["response_http_status"], 500);
    assert!(!fields.contains_key("error_code"));
}

#[tokio::test]
async fn test_long_body_truncated_in_context() {
    let mock_server = MockServer::start().await;
    let body = "e".repeat(MAX_CONTENT_LENGTH_IN_CONTEXT * 2);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string(body))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get("project/details")
        .await
        .unwrap_err();

    let context = err.context().unwrap();
    let content = context.response_content().unwrap();
    assert_eq!(content.len(), MAX_CONTENT_LENGTH_IN_CONTEXT + 3);
    assert!(content.ends_with("..."));
    assert_eq!(context.response_http_status(), Some(502));
    assert_eq!(context.error_text(), Some("Bad instance http response status"));
}

#[tokio::test]
async fn test_invalid_json_is_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get("project/details")
        .await
        .unwrap_err();

    let context = err.context().unwrap();
    assert!(context.error_text().unwrap().contains("decode"));
    assert_eq!(context.response_content(), Some("<html>oops</html>"));
}

#[tokio::test]
async fn test_raw_body_returned_without_decoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let content = client_for(&mock_server)
        .request("project/details", &RequestParams::new(), "GET", false, true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(content.as_raw(), Some("not json at all"));
}

#[tokio::test]
async fn test_suppressed_failure_returns_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let content = client_for(&mock_server)
        .request("project/details", &RequestParams::new(), "GET", true, false)
        .await
        .unwrap();

    assert!(content.is_none());
}

#[tokio::test]
async fn test_timeout_is_connection_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let connection = ClientConnection::new()
        .with_api_base_url(mock_server.uri())
        .with_api_token("test-token")
        .with_client_options(ClientOptions {
            timeout_secs: 1,
            ..Default::default()
        });
    let client = TeletypeClient::new(connection).unwrap();

    let err = client.get("project/operators").await.unwrap_err();
    let context = err.context().unwrap();
    assert_eq!(context.error_text(), Some("Error connecting with Teletype App API"));
    assert!(context.response_http_status().is_none());
}

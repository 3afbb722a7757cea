//! Teletype API client.
//!
//! Low-level HTTP executor that handles authentication, the response
//! envelope and failure diagnostics. Endpoint-specific operations live in
//! the services built on top of it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use reqwest::multipart::Form;
use reqwest::Client;
use serde_json::{Map, Value};
use url::Url;

use crate::connection::ClientConnection;
use crate::error::{ErrorContext, Result, TeletypeError};

const USER_AGENT: &str = concat!("teletype-api/", env!("CARGO_PKG_VERSION"));

/// Header carrying the calling application's name.
pub const APP_NAME_HEADER: &str = "X-App-Name";

const MASKED_TOKEN: &str = "***";

const ERROR_BAD_STATUS: &str = "Bad instance http response status";
const ERROR_BAD_BODY: &str = "Bad instance response body. Impossible to decode json";
const ERROR_API_CALL: &str = "Teletype API call error";
const ERROR_CONNECTING: &str = "Error connecting with Teletype App API";
const ERROR_INVALID_URL: &str = "Invalid request url";

/// Request parameters: query string for GET, form fields for POST.
pub type RequestParams = BTreeMap<String, String>;

/// HTTP methods accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = TeletypeError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(TeletypeError::BadRequest(format!(
                "Unsupported request type {normalized}"
            ))),
        }
    }
}

/// What a successful request returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    /// The envelope's `data` field.
    Decoded(Value),
    /// The raw body, when decoding was not requested.
    Raw(String),
}

impl ResponseContent {
    /// Convert into a JSON value. Raw bodies become JSON strings.
    pub fn into_value(self) -> Value {
        match self {
            Self::Decoded(value) => value,
            Self::Raw(body) => Value::String(body),
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(body) => Some(body),
            Self::Decoded(_) => None,
        }
    }
}

/// Low-level Teletype API client.
///
/// Holds a snapshot of the [`ClientConnection`] it was built from and an HTTP
/// client configured with its transport options. Cheap to clone.
///
/// # Example
///
/// ```no_run
/// use teletype_api::{ClientConnection, RequestParams, TeletypeClient};
///
/// # async fn example() -> teletype_api::Result<()> {
/// let client = TeletypeClient::new(ClientConnection::new().with_api_token("secret"))?;
/// let data = client.get("project/details").await?;
/// println!("{data}");
///
/// // Raw body, failures suppressed
/// let raw = client
///     .request("project/operators", &RequestParams::new(), "GET", false, false)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TeletypeClient {
    http: Client,
    connection: Arc<ClientConnection>,
}

impl fmt::Debug for TeletypeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeletypeClient")
            .field("base_url", &self.connection.api_base_url())
            .finish_non_exhaustive()
    }
}

impl TeletypeClient {
    /// Create a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn new(connection: ClientConnection) -> Result<Self> {
        let options = connection.client_options();

        // Host name checks cannot be toggled apart from peer verification.
        let accept_invalid_certs = !options.verify_peer || !options.verify_host;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .connect_timeout(options.connect_timeout())
            .timeout(options.timeout())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .connection_verbose(options.verbose)
            .build()
            .map_err(TeletypeError::HttpError)?;

        Ok(Self {
            http,
            connection: Arc::new(connection),
        })
    }

    pub fn connection(&self) -> &ClientConnection {
        &self.connection
    }

    /// GET an endpoint without parameters and return the envelope's `data`.
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        let content = self
            .request(endpoint, &RequestParams::new(), "GET", true, true)
            .await?;
        Ok(content.map(ResponseContent::into_value).unwrap_or_default())
    }

    /// Perform one API call.
    ///
    /// * `endpoint` - path relative to the base URL, e.g. `project/details`
    /// * `params` - query parameters for GET, multipart form fields for POST
    /// * `method` - `GET` or `POST`, case-insensitive
    /// * `decode` - unwrap the JSON envelope instead of returning the raw body
    /// * `raise_on_error` - when false, request failures yield `Ok(None)`
    ///
    /// # Errors
    ///
    /// [`TeletypeError::BadRequest`] for an unsupported method and
    /// [`TeletypeError::Forbidden`] for missing credentials, whatever
    /// `raise_on_error` says. Every other failure is a
    /// [`TeletypeError::BadRequestWithContext`].
    #[tracing::instrument(skip(self, params))]
    pub async fn request(
        &self,
        endpoint: &str,
        params: &RequestParams,
        method: &str,
        decode: bool,
        raise_on_error: bool,
    ) -> Result<Option<ResponseContent>> {
        let method: RequestMethod = method.parse()?;

        if self.connection.api_token().is_empty() {
            return Err(TeletypeError::Forbidden(
                "Please setup API token properly".to_string(),
            ));
        }
        if self.connection.api_base_url().is_empty() {
            return Err(TeletypeError::Forbidden(
                "Please setup API base url properly".to_string(),
            ));
        }

        let endpoint_url = join_endpoint(self.connection.api_base_url(), endpoint);
        let context = ErrorContext::new()
            .with_request_url(endpoint_url.clone())
            .with_request_payload(recorded_payload(params));

        match self
            .transfer(&endpoint_url, params, method, decode, context)
            .await
        {
            Ok(content) => Ok(Some(content)),
            Err(context) if raise_on_error => {
                Err(context.into_error(format!("Error on calling function \"{endpoint}\"")))
            }
            Err(context) => {
                tracing::warn!(
                    error_text = context.error_text().unwrap_or_default(),
                    "request failed, error suppressed"
                );
                Ok(None)
            }
        }
    }

    /// Send the request and interpret the response. Failures hand back the
    /// context filled in so far.
    async fn transfer(
        &self,
        endpoint_url: &str,
        params: &RequestParams,
        method: RequestMethod,
        decode: bool,
        context: ErrorContext,
    ) -> core::result::Result<ResponseContent, ErrorContext> {
        let mut url = match Url::parse(endpoint_url) {
            Ok(url) => url,
            Err(_) => return Err(context.with_error_text(ERROR_INVALID_URL)),
        };

        {
            let mut query = url.query_pairs_mut();
            if method == RequestMethod::Get {
                query.extend_pairs(params.iter());
            }
            query.append_pair("token", self.connection.api_token());
        }

        let mut request = match method {
            RequestMethod::Get => self.http.get(url),
            RequestMethod::Post => {
                let form = params
                    .iter()
                    .fold(Form::new(), |form, (k, v)| form.text(k.clone(), v.clone()));
                self.http.post(url).multipart(form)
            }
        };

        let app_name = self.connection.app_name();
        if !app_name.is_empty() {
            request = request.header(APP_NAME_HEADER, app_name);
        }

        tracing::debug!(%method, url = endpoint_url, "sending request");
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "transport failure");
                return Err(context
                    .with_response_time(started.elapsed().as_secs_f64())
                    .with_error_text(ERROR_CONNECTING));
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read response body");
                return Err(context
                    .with_response_time(started.elapsed().as_secs_f64())
                    .with_response_http_status(status)
                    .with_error_text(ERROR_CONNECTING));
            }
        };

        let elapsed = started.elapsed().as_secs_f64();
        tracing::debug!(status, elapsed, "received response");

        let context = context
            .with_response_time(elapsed)
            .with_response_http_status(status)
            .with_response_content(&body);

        if status != 200 {
            return Err(context.with_error_text(ERROR_BAD_STATUS));
        }

        if !decode {
            return Ok(ResponseContent::Raw(body));
        }

        let envelope: Value = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) => return Err(context.with_error_text(ERROR_BAD_BODY)),
        };

        unwrap_envelope(envelope, context).map(ResponseContent::Decoded)
    }
}

/// Join base URL and endpoint with a single `/`.
fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Parameters as they are recorded for diagnostics, token masked.
fn recorded_payload(params: &RequestParams) -> Map<String, Value> {
    let mut payload: Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    payload.insert("token".to_string(), Value::String(MASKED_TOKEN.to_string()));
    payload
}

/// Extract `data` from a `{success, data, error}` envelope.
fn unwrap_envelope(
    envelope: Value,
    context: ErrorContext,
) -> core::result::Result<Value, ErrorContext> {
    let success = envelope.get("success").is_some_and(is_truthy);

    if !success {
        let error = envelope.get("error");
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(scalar_to_string);
        let code = error.and_then(|e| e.get("code")).and_then(scalar_to_string);

        let mut context =
            context.with_error_text(message.clone().unwrap_or_else(|| ERROR_API_CALL.to_string()));
        if let Some(code) = code {
            context = context.with_error_code(code);
        }
        if let Some(message) = message {
            context = context.with_error_message(message);
        }
        return Err(context);
    }

    match envelope {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => Ok(Value::Array(Vec::new())),
            Some(data) => Ok(data),
        },
        _ => Ok(Value::Array(Vec::new())),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose truthiness used by the API's JSON: null, false, 0, "" and "0" are empty.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_debug() {
        let client =
            TeletypeClient::new(ClientConnection::new().with_api_token("test-token")).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("TeletypeClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(" get ".parse::<RequestMethod>().unwrap(), RequestMethod::Get);
        assert_eq!("Post".parse::<RequestMethod>().unwrap(), RequestMethod::Post);

        let err = "delete".parse::<RequestMethod>().unwrap_err();
        assert!(matches!(err, TeletypeError::BadRequest(ref m) if m.contains("DELETE")));
    }

    #[test]
    fn test_join_endpoint() {
        assert_eq!(
            join_endpoint("https://api.teletype.app/public/api/v1", "project/details"),
            "https://api.teletype.app/public/api/v1/project/details"
        );
        assert_eq!(
            join_endpoint("https://api.teletype.app/public/api/v1/", "/project/details"),
            "https://api.teletype.app/public/api/v1/project/details"
        );
    }

    #[test]
    fn test_recorded_payload_masks_token() {
        let mut params = RequestParams::new();
        params.insert("page".to_string(), "2".to_string());

        let payload = recorded_payload(&params);
        assert_eq!(payload["page"], "2");
        assert_eq!(payload["token"], MASKED_TOKEN);
    }

    #[test]
    fn test_unwrap_envelope_returns_data() {
        let data = unwrap_envelope(
            json!({"success": true, "data": {"id": "p1"}}),
            ErrorContext::new(),
        )
        .unwrap();
        assert_eq!(data, json!({"id": "p1"}));
    }

    #[test]
    fn test_unwrap_envelope_missing_data_is_empty() {
        let data = unwrap_envelope(json!({"success": true}), ErrorContext::new()).unwrap();
        assert_eq!(data, json!([]));
    }

    #[test]
    fn test_unwrap_envelope_api_error() {
        let context = unwrap_envelope(
            json!({"success": false, "error": {"code": 42, "message": "Token expired"}}),
            ErrorContext::new(),
        )
        .unwrap_err();

        assert_eq!(context.error_code(), Some("42"));
        assert_eq!(context.error_message(), Some("Token expired"));
        assert_eq!(context.error_text(), Some("Token expired"));
    }

    #[test]
    fn test_unwrap_envelope_without_success_flag() {
        let context = unwrap_envelope(json!({"data": []}), ErrorContext::new()).unwrap_err();
        assert_eq!(context.error_text(), Some(ERROR_API_CALL));
        assert!(context.error_code().is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("op2")));
        assert!(is_truthy(&json!(7)));
        assert!(is_truthy(&json!(1)));
    }
}

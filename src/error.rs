//! Error types for Teletype API operations.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum number of response characters kept in an [`ErrorContext`].
pub const MAX_CONTENT_LENGTH_IN_CONTEXT: usize = 2048;

/// Errors that can occur during Teletype API operations.
#[derive(Debug, Error)]
pub enum TeletypeError {
    /// The call itself is malformed (e.g. unsupported HTTP method).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A request reached the executor and failed. Carries request/response diagnostics.
    #[error("{message}")]
    BadRequestWithContext {
        message: String,
        context: Box<ErrorContext>,
    },

    /// Token or base URL is not configured.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Library misuse: undefined attribute, detached model, and similar.
    #[error("Teletype library error: {0}")]
    Library(String),

    /// Input validation failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Configuration is missing or incomplete.
    #[error("Teletype configuration required: {0}")]
    ConfigMissing(String),

    /// HTTP transport could not be built.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON encoding error.
    #[error("Failed to encode JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl TeletypeError {
    /// Status code class of this error, mirroring the API semantics.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::BadRequestWithContext { .. } => 400,
            Self::Forbidden(_) => 403,
            _ => 500,
        }
    }

    /// Returns true for both bad request variants.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_) | Self::BadRequestWithContext { .. }
        )
    }

    /// Diagnostic context, if this error came out of the request executor.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::BadRequestWithContext { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Result type alias for Teletype operations.
pub type Result<T> = core::result::Result<T, TeletypeError>;

/// Request/response diagnostics attached to a failed API call.
///
/// The executor fills the fields in as it learns them and then freezes the
/// context inside [`TeletypeError::BadRequestWithContext`]. Only non-empty
/// fields show up in [`ErrorContext::fields`] and in the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorContext {
    #[serde(skip_serializing_if = "is_empty_str")]
    api_version: Option<String>,
    #[serde(skip_serializing_if = "is_empty_str")]
    request_id: Option<String>,
    #[serde(skip_serializing_if = "is_empty_str")]
    request_url: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    request_payload: Map<String, Value>,
    #[serde(skip_serializing_if = "is_empty_time")]
    response_time: Option<f64>,
    #[serde(skip_serializing_if = "is_empty_str")]
    response_content: Option<String>,
    #[serde(skip_serializing_if = "is_empty_status")]
    response_http_status: Option<u16>,
    #[serde(skip_serializing_if = "is_empty_str")]
    error_text: Option<String>,
    #[serde(skip_serializing_if = "is_empty_str")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "is_empty_str")]
    error_code: Option<String>,
    #[serde(skip_serializing_if = "is_empty_str")]
    error_type: Option<String>,
}

fn is_empty_str(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn is_empty_time(value: &Option<f64>) -> bool {
    value.map_or(true, |t| t == 0.0)
}

fn is_empty_status(value: &Option<u16>) -> bool {
    value.map_or(true, |s| s == 0)
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_request_url(mut self, request_url: impl Into<String>) -> Self {
        self.request_url = Some(request_url.into());
        self
    }

    pub fn with_request_payload(mut self, payload: Map<String, Value>) -> Self {
        self.request_payload = payload;
        self
    }

    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time = Some(seconds);
        self
    }

    /// Record the response body, truncated to [`MAX_CONTENT_LENGTH_IN_CONTEXT`] characters.
    pub fn with_response_content(mut self, content: &str) -> Self {
        self.response_content = Some(truncate_content(content));
        self
    }

    pub fn with_response_http_status(mut self, status: u16) -> Self {
        self.response_http_status = Some(status);
        self
    }

    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn request_url(&self) -> Option<&str> {
        self.request_url.as_deref()
    }

    pub fn request_payload(&self) -> &Map<String, Value> {
        &self.request_payload
    }

    /// Wall-clock duration of the transfer, in seconds.
    pub fn response_time(&self) -> Option<f64> {
        self.response_time
    }

    pub fn response_content(&self) -> Option<&str> {
        self.response_content.as_deref()
    }

    pub fn response_http_status(&self) -> Option<u16> {
        self.response_http_status
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    /// The non-empty fields as an ordered map.
    pub fn fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Freeze this context into an error.
    pub fn into_error(self, message: impl Into<String>) -> TeletypeError {
        TeletypeError::BadRequestWithContext {
            message: message.into(),
            context: Box::new(self),
        }
    }
}

fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(MAX_CONTENT_LENGTH_IN_CONTEXT) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

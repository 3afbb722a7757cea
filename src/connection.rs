//! Connection settings for the Teletype App API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default `X-App-Name` header value.
pub const DEFAULT_APP_NAME: &str = "teletype-api-rs";

/// Base URL of the public API.
pub const DEFAULT_API_URL: &str = "https://api.teletype.app/public/api/v1";

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default total request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Low-level transport options.
///
/// Bodies are always read back as strings, and the request URL and method are
/// chosen by the executor, so neither can be configured here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    pub timeout_secs: u64,
    /// Verify the TLS peer certificate.
    pub verify_peer: bool,
    /// Verify that the certificate matches the host name.
    pub verify_host: bool,
    /// Log connection-level details.
    pub verbose: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_peer: false,
            verify_host: false,
            verbose: false,
        }
    }
}

impl ClientOptions {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Apply the fields set in `patch`, keeping the rest.
    #[must_use]
    pub fn merged(mut self, patch: &ClientOptionsPatch) -> Self {
        if let Some(v) = patch.connect_timeout_secs {
            self.connect_timeout_secs = v;
        }
        if let Some(v) = patch.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = patch.verify_peer {
            self.verify_peer = v;
        }
        if let Some(v) = patch.verify_host {
            self.verify_host = v;
        }
        if let Some(v) = patch.verbose {
            self.verbose = v;
        }
        self
    }
}

/// A partial set of [`ClientOptions`] overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientOptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_peer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_host: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Settings used to reach the API: base URL, token, app name and transport options.
///
/// # Example
///
/// ```
/// use teletype_api::ClientConnection;
///
/// let connection = ClientConnection::new()
///     .with_api_token("secret")
///     .with_app_name("my-crm");
/// assert_eq!(connection.api_base_url(), "https://api.teletype.app/public/api/v1");
/// ```
#[derive(Clone, PartialEq)]
pub struct ClientConnection {
    api_base_url: String,
    api_token: String,
    app_name: String,
    client_options: ClientOptions,
}

impl std::fmt::Debug for ClientConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConnection")
            .field("api_base_url", &self.api_base_url)
            .field("app_name", &self.app_name)
            .field("client_options", &self.client_options)
            .finish_non_exhaustive()
    }
}

impl Default for ClientConnection {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_token: String::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
            client_options: ClientOptions::default(),
        }
    }
}

impl ClientConnection {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.set_api_base_url(base_url);
        self
    }

    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.set_api_token(token);
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.set_app_name(app_name);
        self
    }

    #[must_use]
    pub fn with_client_options(mut self, options: ClientOptions) -> Self {
        self.set_client_options(options);
        self
    }

    pub fn set_api_base_url(&mut self, base_url: impl Into<String>) {
        self.api_base_url = base_url.into();
    }

    pub fn set_api_token(&mut self, token: impl Into<String>) {
        self.api_token = token.into();
    }

    /// Set the `X-App-Name` header. An empty name disables the header.
    pub fn set_app_name(&mut self, app_name: impl Into<String>) {
        self.app_name = app_name.into();
    }

    /// Replace all transport options.
    pub fn set_client_options(&mut self, options: ClientOptions) {
        self.client_options = options;
    }

    /// Merge overrides onto the current transport options.
    pub fn update_client_options(&mut self, patch: &ClientOptionsPatch) {
        self.client_options = self.client_options.clone().merged(patch);
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn client_options(&self) -> &ClientOptions {
        &self.client_options
    }
}

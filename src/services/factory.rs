//! Service factory: owns connection settings and lazily created services.

use std::env;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use crate::connection::{ClientConnection, DEFAULT_APP_NAME};
use crate::error::{Result, TeletypeError};
use crate::services::ProjectService;

/// Entry point of the library.
///
/// Holds the [`ClientConnection`] and memoizes one instance of each service.
/// Services read the settings on every request, so changes reach handles
/// already handed out. Changing any setting also drops the memoized services
/// and their caches. Clones share the same settings and services.
///
/// # Example
///
/// ```no_run
/// use teletype_api::{ApiModel, TeletypeServices};
///
/// # async fn example() -> teletype_api::Result<()> {
/// let teletype = TeletypeServices::create("your-token", None, None);
///
/// let project = teletype.project_service()?.get_project().await?;
/// println!("{}", project.as_json()?);
///
/// if let Some(owner) = project.owner().await? {
///     println!("Owner: {:?}", owner.full_name());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TeletypeServices {
    inner: Arc<ServicesInner>,
}

pub(crate) struct ServicesInner {
    connection: RwLock<ClientConnection>,
    project_service: Mutex<Option<Arc<ProjectService>>>,
}

impl fmt::Debug for TeletypeServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeletypeServices")
            .field("connection", &self.client_connection())
            .finish_non_exhaustive()
    }
}

impl TeletypeServices {
    /// Create a factory for `api_token` with default settings.
    pub fn new(api_token: &str) -> Self {
        Self::create(api_token, None, None)
    }

    /// Create a factory.
    ///
    /// When a token is given, the app name is set to `app_name`, or to
    /// [`DEFAULT_APP_NAME`] when `app_name` is missing or empty, overriding
    /// whatever `connection` carried.
    pub fn create(
        api_token: &str,
        app_name: Option<&str>,
        connection: Option<ClientConnection>,
    ) -> Self {
        let services = Self {
            inner: Arc::new(ServicesInner {
                connection: RwLock::new(connection.unwrap_or_default()),
                project_service: Mutex::new(None),
            }),
        };

        if !api_token.is_empty() {
            services.update_api_token(api_token);
            services.update_app_name(app_name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_APP_NAME));
        }

        services
    }

    /// Create a factory from environment variables.
    ///
    /// Uses `TELETYPE_API_TOKEN` for authentication, and optionally
    /// `TELETYPE_API_URL` for the base URL and `TELETYPE_APP_NAME` for the
    /// `X-App-Name` header.
    ///
    /// # Errors
    ///
    /// Returns an error if `TELETYPE_API_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELETYPE_API_TOKEN").map_err(|_| {
            TeletypeError::ConfigMissing(
                "TELETYPE_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let mut connection = ClientConnection::new();
        if let Ok(base_url) = env::var("TELETYPE_API_URL") {
            connection.set_api_base_url(base_url);
        }
        let app_name = env::var("TELETYPE_APP_NAME").ok();

        Ok(Self::create(&token, app_name.as_deref(), Some(connection)))
    }

    /// Snapshot of the current connection settings.
    pub fn client_connection(&self) -> ClientConnection {
        self.inner
            .connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update_api_token(&self, api_token: &str) -> &Self {
        self.update_connection(|c| c.set_api_token(api_token))
    }

    pub fn update_app_name(&self, app_name: &str) -> &Self {
        self.update_connection(|c| c.set_app_name(app_name))
    }

    /// Replace the connection settings wholesale.
    pub fn set_client_connection(&self, connection: ClientConnection) -> &Self {
        self.update_connection(|c| *c = connection)
    }

    /// Modify the connection settings in place.
    pub fn update_connection<F>(&self, f: F) -> &Self
    where
        F: FnOnce(&mut ClientConnection),
    {
        {
            let mut connection = self
                .inner
                .connection
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut connection);
        }
        self.reset_services();
        self
    }

    /// The project service, created on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built from the
    /// current settings.
    pub fn project_service(&self) -> Result<Arc<ProjectService>> {
        let mut slot = self
            .inner
            .project_service
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(service) = slot.as_ref() {
            return Ok(Arc::clone(service));
        }

        let service = Arc::new(ProjectService::new(self)?);
        tracing::debug!("created project service");
        *slot = Some(Arc::clone(&service));
        Ok(service)
    }

    fn reset_services(&self) {
        *self
            .inner
            .project_service
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn downgrade(&self) -> FactoryRef {
        FactoryRef(Arc::downgrade(&self.inner))
    }
}

/// Non-owning link from services and models back to their factory.
#[derive(Clone, Default)]
pub(crate) struct FactoryRef(Weak<ServicesInner>);

impl FactoryRef {
    pub(crate) fn upgrade(&self) -> Result<TeletypeServices> {
        self.0
            .upgrade()
            .map(|inner| TeletypeServices { inner })
            .ok_or_else(|| TeletypeError::Library("Teletype service is not configured".to_string()))
    }
}

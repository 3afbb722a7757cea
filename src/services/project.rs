//! Project endpoints.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::client::TeletypeClient;
use crate::error::Result;
use crate::models::{Operator, Project};
use crate::services::{FactoryRef, TeletypeServices};
use crate::traits::ApiModel;

const PROJECT_DETAILS: &str = "project/details";
const PROJECT_OPERATORS: &str = "project/operators";

/// Project details and the project's operator list.
///
/// Obtained from [`TeletypeServices::project_service`]. The operator list is
/// cached after the first fetch until [`get_operators`](Self::get_operators)
/// is called with `refresh = true`.
///
/// Every request uses the factory's current connection settings, so a held
/// service picks up a new token or base URL as soon as it is set.
pub struct ProjectService {
    client: RwLock<Arc<TeletypeClient>>,
    factory: FactoryRef,
    operators: Mutex<Option<Vec<Operator>>>,
}

impl std::fmt::Debug for ProjectService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectService")
            .field("client", &*self.client.read().unwrap_or_else(PoisonError::into_inner))
            .finish_non_exhaustive()
    }
}

impl ProjectService {
    pub(crate) fn new(services: &TeletypeServices) -> Result<Self> {
        Ok(Self {
            client: RwLock::new(Arc::new(TeletypeClient::new(services.client_connection())?)),
            factory: services.downgrade(),
            operators: Mutex::new(None),
        })
    }

    /// The executor for the factory's current connection settings.
    ///
    /// The executor is rebuilt only when the settings differ from the ones it
    /// was built with.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TeletypeError::Library`] if the factory has been
    /// dropped, or an error if the HTTP transport cannot be built.
    pub fn client(&self) -> Result<Arc<TeletypeClient>> {
        let connection = self.services()?.client_connection();

        {
            let client = self.client.read().unwrap_or_else(PoisonError::into_inner);
            if *client.connection() == connection {
                return Ok(Arc::clone(&*client));
            }
        }

        let client = Arc::new(TeletypeClient::new(connection)?);
        tracing::debug!("connection settings changed, rebuilt client");
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&client);
        Ok(client)
    }

    /// The factory that created this service.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TeletypeError::Library`] if the factory has been dropped.
    pub fn services(&self) -> Result<TeletypeServices> {
        self.factory.upgrade()
    }

    /// Fetch the project the token belongs to.
    #[tracing::instrument(skip(self))]
    pub async fn get_project(&self) -> Result<Project> {
        let data = self.client()?.get(PROJECT_DETAILS).await?;
        Ok(Project::instantiate(&self.services()?, &data))
    }

    /// List the project's operators.
    ///
    /// The first call fetches and caches the list; later calls return the
    /// cache unless `refresh` is true, in which case the list is fetched again
    /// and replaces the cache.
    #[tracing::instrument(skip(self))]
    pub async fn get_operators(&self, refresh: bool) -> Result<Vec<Operator>> {
        let mut cache = self.operators.lock().await;

        if !refresh {
            if let Some(operators) = cache.as_ref() {
                tracing::debug!(count = operators.len(), "operators served from cache");
                return Ok(operators.clone());
            }
        }

        let data = self.client()?.get(PROJECT_OPERATORS).await?;
        let operators = Operator::instantiate_many(&self.services()?, &data)?;
        tracing::debug!(count = operators.len(), "operators fetched");

        *cache = Some(operators.clone());
        Ok(operators)
    }
}

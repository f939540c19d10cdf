use crate::database::{validate_db_name, Database};
use crate::transport::Transport;
use crate::{ClientError, Result};
use cloudant_core::{Config, Credentials, OkResponse};
use reqwest::Method;
use serde::de::IgnoredAny;
use std::sync::Arc;

/// Cloudant REST API Client
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    transport: Arc<Transport>,
}

impl Client {
    /// Create a client for the account named in `credentials`.
    ///
    /// Only checks that the credentials are well formed; no request is made.
    pub fn connect(credentials: Credentials) -> Result<Self> {
        Self::with_config(Config::new(credentials))
    }

    /// Create a client with full configuration (endpoint, timeouts, TLS)
    pub fn with_config(config: Config) -> Result<Self> {
        validate_credentials(&config.credentials)?;
        let transport = Transport::new(&config)?;
        tracing::debug!(
            url = %transport.base_url(),
            user = %config.credentials.auth_user(),
            timeout_secs = config.timeout_secs,
            "Client configured"
        );
        Ok(Self {
            transport: Arc::new(transport),
        })
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url().as_str()
    }

    /// Round trip to the service root to confirm it is reachable and
    /// accepts the credentials
    #[tracing::instrument(skip(self))]
    pub async fn is_alive(&self) -> Result<()> {
        let req = self.transport.request(Method::GET, &[])?;
        let _: IgnoredAny = self.transport.send(req).await?;
        Ok(())
    }

    /// Create a database; fails with `Conflict` if it already exists
    #[tracing::instrument(skip(self))]
    pub async fn create_database(&self, name: &str) -> Result<OkResponse> {
        validate_db_name(name)?;
        let req = self.transport.request(Method::PUT, &[name])?;
        let response: OkResponse = self.transport.send(req).await?;
        tracing::info!(db = %name, "Database created");
        Ok(response)
    }

    /// Delete a database; fails with `NotFound` if it does not exist
    #[tracing::instrument(skip(self))]
    pub async fn delete_database(&self, name: &str) -> Result<()> {
        validate_db_name(name)?;
        let req = self.transport.request(Method::DELETE, &[name])?;
        let _: OkResponse = self.transport.send(req).await?;
        tracing::info!(db = %name, "Database deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn database_exists(&self, name: &str) -> Result<bool> {
        validate_db_name(name)?;
        match self.database(name).info().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        let req = self.transport.request(Method::GET, &["_all_dbs"])?;
        self.transport.send(req).await
    }

    /// Handle for the named database. No I/O.
    pub fn database(&self, name: impl Into<String>) -> Database {
        Database::new(name.into(), self.transport.clone())
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<()> {
    if credentials.username.trim().is_empty() {
        return Err(ClientError::Auth("username is required".to_string()));
    }
    if credentials.password.is_empty() {
        return Err(ClientError::Auth("password is required".to_string()));
    }
    Ok(())
}

//! Cloudant Client Library
//!
//! HTTP client for IBM Cloudant and other CouchDB-compatible document stores.
//!
//! ```rust,no_run
//! use cloudant_rs::{Client, Credentials, Options};
//! use std::collections::HashMap;
//!
//! # async fn run() -> cloudant_rs::Result<()> {
//! let client = Client::connect(Credentials::with_api_key("acme", "key", "secret"))?;
//! client.is_alive().await?;
//!
//! let db = client.database("inventory");
//! let doc = db.create_document(&HashMap::from([("name", "widget")])).await?;
//! let stored: HashMap<String, String> = db.get_document(&doc.id, &Options::default()).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod database;
mod design;
mod transport;

pub use client::Client;
pub use cloudant_core::config::{Config, Credentials};
pub use cloudant_core::models::*;
pub use database::Database;
pub use design::DesignDocument;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Conflict: {error} - {reason}")]
    Conflict { error: String, reason: String },

    #[error("Not found: {error} - {reason}")]
    NotFound { error: String, reason: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {error}: {reason}")]
    Server {
        status: u16,
        error: String,
        reason: String,
    },

    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else {
            ClientError::Request(err)
        }
    }
}

impl ClientError {
    /// Map a non-2xx response to an error, using the CouchDB
    /// `{"error", "reason"}` body when the server sent one.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let ErrorBody { error, reason } =
            serde_json::from_str(body).unwrap_or_else(|_| ErrorBody {
                error: String::new(),
                reason: body.trim().to_string(),
            });

        match status {
            401 | 403 => ClientError::Auth(if reason.is_empty() { error } else { reason }),
            404 => ClientError::NotFound { error, reason },
            // 412 is how CouchDB reports `file_exists` on database create
            409 | 412 => ClientError::Conflict { error, reason },
            400 => ClientError::Validation(if reason.is_empty() { error } else { reason }),
            _ => ClientError::Server {
                status,
                error,
                reason,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

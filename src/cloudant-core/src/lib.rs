//! Cloudant Core Library
//!
//! Shared types for the Cloudant client, including:
//! - Account credentials and client configuration
//! - Request models (Mango queries, index specs, read options)
//! - Response models (documents, views, search results)

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use models::*;

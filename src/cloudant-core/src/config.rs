use serde::{Deserialize, Serialize};
use std::fmt;

/// Account credentials.
///
/// Cloudant accepts either the account owner's `username` + `password`, or an
/// API key + its password. When `api_key` is set it is used as the basic-auth
/// user, while `username` still selects the account URL.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: None,
            password: password.into(),
        }
    }

    pub fn with_api_key(
        username: impl Into<String>,
        api_key: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            api_key: Some(api_key.into()),
            password: password.into(),
        }
    }

    /// User name sent in the basic-auth header
    pub fn auth_user(&self) -> &str {
        match &self.api_key {
            Some(key) if !key.is_empty() => key,
            _ => &self.username,
        }
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &self.api_key)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Service endpoint. Defaults to `https://{username}.cloudant.com`.
    #[serde(default)]
    pub url: Option<String>,
    pub credentials: Credentials,

    /// Whole-request timeout applied to every call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("cloudant-rs/{}", env!("CARGO_PKG_VERSION"))
}

pub const ENV_USER_NAME: &str = "CLOUDANT_USER_NAME";
pub const ENV_API_KEY: &str = "CLOUDANT_API_KEY";
pub const ENV_PASSWORD: &str = "CLOUDANT_PASSWORD";
pub const ENV_URL: &str = "CLOUDANT_URL";

impl Config {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            url: None,
            credentials,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            insecure_skip_verify: false,
            user_agent: default_user_agent(),
        }
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Build a config from `CLOUDANT_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let username = lookup(ENV_USER_NAME)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} is not set", ENV_USER_NAME))?;
        let credentials = Credentials {
            username,
            api_key: lookup(ENV_API_KEY).filter(|v| !v.is_empty()),
            password: lookup(ENV_PASSWORD).unwrap_or_default(),
        };

        let mut config = Self::new(credentials);
        config.url = lookup(ENV_URL).filter(|v| !v.is_empty());
        tracing::debug!(
            username = %config.credentials.username,
            url = %config.base_url(),
            "Loaded config from environment"
        );
        Ok(config)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Resolved service endpoint, without a trailing slash
    pub fn base_url(&self) -> String {
        match &self.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.cloudant.com", self.credentials.username),
        }
    }
}

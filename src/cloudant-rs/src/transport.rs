use crate::{ClientError, Result};
use cloudant_core::Config;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authenticated HTTP access to one service endpoint.
///
/// The inner `reqwest::Client` pools connections and is shared by every
/// handle built from the same `Client`.
pub(crate) struct Transport {
    base_url: Url,
    http: HttpClient,
    auth_user: String,
    auth_password: String,
}

impl Transport {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url())
            .map_err(|e| ClientError::Validation(format!("invalid service url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Validation(format!(
                "invalid service url: {}",
                base_url
            )));
        }

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url,
            http,
            auth_user: config.credentials.auth_user().to_string(),
            auth_password: config.credentials.password.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Validation(format!("invalid service url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start an authenticated request for the given path
    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        Ok(self
            .http
            .request(method, url)
            .basic_auth(&self.auth_user, Some(&self.auth_password)))
    }

    /// Execute a request and decode a 2xx JSON body into `T`
    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "Sending request");

        let response = self.http.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ClientError::from_response(status.as_u16(), &body);
            tracing::warn!(%method, %path, status = status.as_u16(), "Request failed: {}", err);
            return Err(err);
        }

        let bytes = response.bytes().await?;
        tracing::debug!(
            %method,
            %path,
            status = status.as_u16(),
            bytes = bytes.len(),
            "Request completed"
        );
        Ok(serde_json::from_slice(&bytes)?)
    }
}

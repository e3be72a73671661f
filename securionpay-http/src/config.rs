//! Client configuration.

use std::time::Duration;

use reqwest_middleware::ClientWithMiddleware;

use crate::constants::{API_KEY_ENV, DEFAULT_BASE_URL};
use crate::credentials::ApiKey;
use crate::error::ClientError;

/// Configuration for [`SecurionPayClient`](crate::SecurionPayClient).
///
/// When no API key is set, the key is read from [`API_KEY_ENV`] at
/// construction time.
pub struct ClientConfig {
    /// Explicit API key. Blank keys are ignored.
    pub api_key: Option<ApiKey>,

    /// API base URL.
    pub base_url: String,

    /// Per-request timeout. `None` leaves timing to the transport.
    pub timeout: Option<Duration>,

    /// Custom transport. `None` uses a plain `reqwest::Client`.
    pub transport: Option<ClientWithMiddleware>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            transport: None,
        }
    }
}

impl ClientConfig {
    /// Creates a config with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API key to the first non-blank candidate.
    #[must_use]
    pub fn with_api_keys<I, K>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ApiKey>,
    {
        self.api_key = candidates
            .into_iter()
            .map(Into::into)
            .find(|key: &ApiKey| !key.is_blank());
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom transport.
    #[must_use]
    pub fn with_transport(mut self, transport: ClientWithMiddleware) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a pre-configured reqwest client as the transport.
    #[must_use]
    pub fn with_http_client(self, client: reqwest::Client) -> Self {
        self.with_transport(reqwest_middleware::ClientBuilder::new(client).build())
    }

    /// Resolves the API key: the explicit key if non-blank, else
    /// [`API_KEY_ENV`] from the environment or a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] if neither yields a
    /// non-blank key.
    pub fn resolve_api_key(&self) -> Result<ApiKey, ClientError> {
        self.resolve_api_key_with(|name| dotenvy::var(name).ok())
    }

    pub(crate) fn resolve_api_key_with(
        &self,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<ApiKey, ClientError> {
        if let Some(key) = self.api_key.as_ref().filter(|key| !key.is_blank()) {
            return Ok(key.clone());
        }
        lookup(API_KEY_ENV)
            .map(ApiKey::from)
            .filter(|key| !key.is_blank())
            .ok_or(ClientError::MissingCredential)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}

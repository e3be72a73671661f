//! Endpoint URLs of the SecurionPay API.
//!
//! Identifiers are appended as percent-encoded path segments, never spliced
//! into the URL as raw text.

use securionpay::CreditRequest;
use url::Url;

use crate::error::ClientError;

/// Resolves operation URLs against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: Url,
}

impl Endpoints {
    /// Creates a resolver for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if the URL cannot carry path
    /// segments (e.g. `mailto:`).
    pub fn try_new(base_url: Url) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint {
                context: "Base URL cannot carry path segments",
            });
        }
        Ok(Self { base_url })
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/customers/{customer_id}/cards`
    ///
    /// # Errors
    ///
    /// See [`Endpoints::try_new`].
    pub fn customer_cards(&self, customer_id: &str) -> Result<Url, ClientError> {
        self.with_segments(&["customers", customer_id, "cards"])
    }

    /// `{base}/charges`
    ///
    /// # Errors
    ///
    /// See [`Endpoints::try_new`].
    pub fn charges(&self) -> Result<Url, ClientError> {
        self.with_segments(&["charges"])
    }

    /// `{base}/tokens`
    ///
    /// # Errors
    ///
    /// See [`Endpoints::try_new`].
    pub fn tokens(&self) -> Result<Url, ClientError> {
        self.with_segments(&["tokens"])
    }

    /// `{base}/tokens/{token_id}`
    ///
    /// # Errors
    ///
    /// See [`Endpoints::try_new`].
    pub fn token(&self, token_id: &str) -> Result<Url, ClientError> {
        self.with_segments(&["tokens", token_id])
    }

    /// `{base}/credits?{query}`
    ///
    /// # Errors
    ///
    /// See [`Endpoints::try_new`].
    pub fn credits(&self, request: &CreditRequest) -> Result<Url, ClientError> {
        let mut url = self.with_segments(&["credits"])?;
        url.query_pairs_mut().extend_pairs(request.to_query_pairs());
        Ok(url)
    }

    fn with_segments(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidEndpoint {
                context: "Base URL cannot carry path segments",
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl TryFrom<&str> for Endpoints {
    type Error = ClientError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut normalized = value.trim_end_matches('/').to_owned();
        normalized.push('/');
        let url = Url::parse(&normalized).map_err(|e| ClientError::UrlParse {
            context: "Failed to parse base url",
            source: e,
        })?;
        Self::try_new(url)
    }
}

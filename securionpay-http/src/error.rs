//! Error type of the SecurionPay HTTP client.
//!
//! Failures are split by the stage that produced them:
//!
//! - local validation, which never reaches the network
//! - URL construction and request encoding
//! - the transport, before any response is received
//! - a non-2xx answer from the API
//! - decoding of a 2xx body

use http::StatusCode;
use securionpay::ValidationError;

use crate::constants::API_KEY_ENV;

/// Errors returned by [`SecurionPayClient`](crate::SecurionPayClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No API key was given and none was found in the environment.
    #[error("missing API key, please set {:?} in your environment", API_KEY_ENV)]
    MissingCredential,

    /// The request failed its pre-flight checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The configured base URL could not be parsed.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// An endpoint URL could not be built from the base URL.
    #[error("invalid endpoint: {context}")]
    InvalidEndpoint {
        /// Human-readable context.
        context: &'static str,
    },

    /// The request body could not be serialized.
    #[error("Failed to serialize JSON: {context}: {source}")]
    Encode {
        /// Human-readable context.
        context: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The request failed before a response was received.
    #[error("HTTP error: {context}: {source}")]
    Transport {
        /// Human-readable context.
        context: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest_middleware::Error,
    },

    /// The response body could not be read.
    #[error("Failed to read response body: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: &'static str,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status outside `200..=299`.
    ///
    /// Displays as `message` alone: the response body verbatim, or the
    /// status line when the body was empty.
    #[error("{message}")]
    Remote {
        /// Human-readable context.
        context: &'static str,
        /// The HTTP status code.
        status: StatusCode,
        /// Response body, or the status line if the body was empty.
        message: String,
    },

    /// A 2xx response body was not the expected JSON.
    #[error("Failed to deserialize JSON: {context}: {source}")]
    Decode {
        /// Human-readable context.
        context: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Returns `true` if the error was raised locally, before any I/O.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::Validation(_)
                | Self::UrlParse { .. }
                | Self::InvalidEndpoint { .. }
                | Self::Encode { .. }
        )
    }

    /// Returns `true` if the request failed its pre-flight checks.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the HTTP status of a [`ClientError::Remote`] error.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the validation failure, if this is one.
    #[must_use]
    pub const fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(err) => Some(*err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_displays_message_verbatim() {
        let err = ClientError::Remote {
            context: "GET /tokens/{id}",
            status: StatusCode::BAD_REQUEST,
            message: r#"{"error":"invalid customerID"}"#.to_owned(),
        };
        assert_eq!(err.to_string(), r#"{"error":"invalid customerID"}"#);
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!err.is_local());
    }

    #[test]
    fn test_missing_credential_names_env_var() {
        let msg = ClientError::MissingCredential.to_string();
        assert!(msg.contains("SECURIONPAY_API_KEY"));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = ClientError::from(ValidationError::MissingSecurityCode);
        assert_eq!(err.to_string(), ValidationError::MissingSecurityCode.to_string());
        assert_eq!(err.validation(), Some(ValidationError::MissingSecurityCode));
        assert!(err.is_validation());
        assert!(err.is_local());
    }
}

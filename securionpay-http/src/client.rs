//! Async client for the SecurionPay API.
//!
//! Every operation runs the same sequence: validate the request locally,
//! resolve the endpoint, encode the body, perform exactly one HTTP round
//! trip, then decode the response. The first failing step ends the call.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use securionpay::validate::identifier;
use securionpay::{
    AddCardRequest, Card, Charge, ChargeResponse, CreditRequest, Credits, Token, TokenRequest,
    Validate,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::config::ClientConfig;
use crate::constants::JSON_CONTENT_TYPE;
use crate::credentials::{ApiKey, CredentialStore};
use crate::endpoint::Endpoints;
use crate::error::ClientError;

/// Client for the SecurionPay payments API.
///
/// Cloning is cheap. Clones share one [`CredentialStore`], so replacing the
/// API key or transport on any clone affects all of them.
///
/// # Example
///
/// ```no_run
/// use securionpay::{Charge, Currency};
/// use securionpay_http::SecurionPayClient;
///
/// # async fn run() -> Result<(), securionpay_http::ClientError> {
/// let client = SecurionPayClient::from_env()?;
/// let charge = Charge::new(1500, Currency::usd())
///     .with_customer("cust_8Hdz9wQ2")
///     .with_description("Order #1024");
/// let response = client.create_charge(&charge).await?;
/// println!("charged {} {}", response.amount, response.currency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SecurionPayClient {
    credentials: Arc<CredentialStore>,
    endpoints: Endpoints,
    timeout: Option<Duration>,
}

impl SecurionPayClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] if no non-blank API key is
    /// configured or found in the environment, and a URL error if the base
    /// URL is unusable.
    pub fn try_new(config: ClientConfig) -> Result<Self, ClientError> {
        let api_key = config.resolve_api_key()?;
        let endpoints = Endpoints::try_from(config.base_url.as_str())?;
        Ok(Self {
            credentials: Arc::new(CredentialStore::new(api_key, config.transport)),
            endpoints,
            timeout: config.timeout,
        })
    }

    /// Creates a client whose key comes from
    /// [`API_KEY_ENV`](crate::constants::API_KEY_ENV).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] if the variable is unset or
    /// blank.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::try_new(ClientConfig::default())
    }

    /// Creates a client with an explicit key, falling back to the
    /// environment when the key is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] if no non-blank key is
    /// available.
    pub fn with_api_key(api_key: impl Into<ApiKey>) -> Result<Self, ClientError> {
        Self::try_new(ClientConfig::new(api_key))
    }

    /// Creates a client with the first non-blank key among `candidates`,
    /// falling back to the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredential`] if no non-blank key is
    /// available.
    pub fn from_api_keys<I, K>(candidates: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = K>,
        K: Into<ApiKey>,
    {
        Self::try_new(ClientConfig::default().with_api_keys(candidates))
    }

    /// Replaces the API key for all subsequent requests.
    ///
    /// Requests already in flight keep the key they were signed with.
    pub fn set_api_key(&self, api_key: impl Into<ApiKey>) {
        self.credentials.set_api_key(api_key);
    }

    /// Replaces the transport for all subsequent requests.
    pub fn set_transport(&self, transport: ClientWithMiddleware) {
        self.credentials.set_transport(transport);
    }

    /// Reverts to the default transport.
    pub fn clear_transport(&self) {
        self.credentials.clear_transport();
    }

    /// Returns the shared credential store.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Returns the endpoint resolver.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Sends a `POST /customers/{customerId}/cards` request, attaching
    /// `request.card` to the customer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the card id or customer id is
    /// blank, otherwise any transport, remote or decode error.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "securionpay.register_card",
            skip_all,
            fields(otel.status_code = tracing::field::Empty)
        )
    )]
    pub async fn register_card(&self, request: &AddCardRequest) -> Result<Card, ClientError> {
        request.validate()?;
        let url = self.endpoints.customer_cards(request.customer_id.trim())?;
        self.post_json(url, "POST /customers/{id}/cards", &request.card)
            .await
    }

    /// Sends a `POST /charges` request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the charge names neither a card
    /// nor a customer, otherwise any transport, remote or decode error.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "securionpay.create_charge",
            skip_all,
            fields(otel.status_code = tracing::field::Empty)
        )
    )]
    pub async fn create_charge(&self, charge: &Charge) -> Result<ChargeResponse, ClientError> {
        charge.validate()?;
        let url = self.endpoints.charges()?;
        self.post_json(url, "POST /charges", charge).await
    }

    /// Sends a `POST /tokens` request, exchanging card details for a
    /// single-use token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the security code is blank,
    /// otherwise any transport, remote or decode error.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "securionpay.create_token",
            skip_all,
            fields(otel.status_code = tracing::field::Empty)
        )
    )]
    pub async fn create_token(&self, request: &TokenRequest) -> Result<Token, ClientError> {
        request.validate()?;
        let url = self.endpoints.tokens()?;
        self.post_json(url, "POST /tokens", request).await
    }

    /// Sends a `GET /tokens/{tokenId}` request. The id is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the id is blank, otherwise any
    /// transport, remote or decode error.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "securionpay.retrieve_token",
            skip_all,
            fields(otel.status_code = tracing::field::Empty)
        )
    )]
    pub async fn retrieve_token(&self, token_id: &str) -> Result<Token, ClientError> {
        let token_id = identifier(token_id)?;
        let url = self.endpoints.token(token_id)?;
        self.get_json(url, "GET /tokens/{id}").await
    }

    /// Sends a `GET /credits` request for one page of credits.
    ///
    /// # Errors
    ///
    /// Returns any transport, remote or decode error.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "securionpay.list_credits",
            skip_all,
            fields(otel.status_code = tracing::field::Empty)
        )
    )]
    pub async fn list_credits(&self, request: &CreditRequest) -> Result<Credits, ClientError> {
        let url = self.endpoints.credits(request)?;
        self.get_json(url, "GET /credits").await
    }

    async fn post_json<T, R>(
        &self,
        url: Url,
        context: &'static str,
        payload: &T,
    ) -> Result<R, ClientError>
    where
        T: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let result = match serde_json::to_vec(payload) {
            Ok(body) => self
                .execute(Method::POST, url, Some(body), context)
                .await
                .and_then(|bytes| decode(&bytes, context)),
            Err(source) => Err(ClientError::Encode { context, source }),
        };
        record_result_on_span(&result);
        result
    }

    async fn get_json<R>(&self, url: Url, context: &'static str) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let result = self
            .execute(Method::GET, url, None, context)
            .await
            .and_then(|bytes| decode(&bytes, context));
        record_result_on_span(&result);
        result
    }

    /// Performs one authenticated round trip and returns the raw body of a
    /// 2xx response.
    ///
    /// The request is signed with the key current at dispatch time. A body,
    /// when given, is sent as `application/json`. The response body is always
    /// read to the end.
    ///
    /// `context` labels the request in errors and traces, e.g.
    /// `"GET /tokens/{id}"`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if no response was received,
    /// [`ClientError::ResponseBodyRead`] if the body could not be read, and
    /// [`ClientError::Remote`] for any status outside `200..=299`.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        context: &'static str,
    ) -> Result<Vec<u8>, ClientError> {
        let (api_key, transport) = self.credentials.signing_pair();

        #[cfg(feature = "telemetry")]
        tracing::debug!(%method, path = url.path(), "dispatching request");

        let mut request = transport
            .request(method, url)
            .basic_auth(api_key.expose(), Some(""));
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport { context, source: e })?;
        let status = response.status();

        #[cfg(feature = "telemetry")]
        tracing::debug!(status = status.as_u16(), "received response");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::ResponseBodyRead { context, source: e })?;

        if !status.is_success() {
            let message = if bytes.is_empty() {
                status.to_string()
            } else {
                String::from_utf8_lossy(&bytes).into_owned()
            };
            return Err(ClientError::Remote {
                context,
                status,
                message,
            });
        }

        Ok(Vec::from(bytes))
    }
}

fn decode<R: DeserializeOwned>(bytes: &[u8], context: &'static str) -> Result<R, ClientError> {
    serde_json::from_slice(bytes).map_err(|e| ClientError::Decode { context, source: e })
}

/// Records the outcome of an operation on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            tracing::debug!(error = %err, "request failed");
        }
    }
}

/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}

#[cfg(test)]
mod tests {
    use securionpay::{CardSource, Currency, CustomerId, ValidationError};
    use serde_json::json;
    use wiremock::matchers::{
        any, basic_auth, body_partial_json, header, method, path, query_param,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const KEY: &str = "sk_test_4xWq9Lz";

    fn client_for(server: &MockServer) -> SecurionPayClient {
        SecurionPayClient::try_new(ClientConfig::new(KEY).with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_register_card_posts_card_to_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers/cust_1/cards"))
            .and(basic_auth(KEY, ""))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({"id": "card_1", "objectType": "card"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "card_1",
                "created": 1_415_810_511,
                "objectType": "card",
                "first6": "424242",
                "last4": "4242",
                "expMonth": "11",
                "expYear": "2027",
                "customerId": "cust_1",
                "brand": "Visa",
                "type": "Credit Card"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = AddCardRequest::new(" cust_1 ", Card::with_id("card_1"));
        let card = client_for(&server).register_card(&request).await.unwrap();
        assert_eq!(card.id, "card_1");
        assert_eq!(card.exp_month, 11);
        assert_eq!(card.exp_year, 2027);
        assert_eq!(card.customer_id.as_str(), "cust_1");
    }

    #[tokio::test]
    async fn test_create_charge_sends_amount_as_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/charges"))
            .and(basic_auth(KEY, ""))
            .and(body_partial_json(json!({
                "amount": "1500",
                "currency": "USD",
                "card": "tok_9Kx2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "char_1",
                "amount": 1500,
                "currency": "USD",
                "objectType": "charge",
                "captured": true,
                "customerId": null
            })))
            .mount(&server)
            .await;

        let charge = Charge::new(1500, Currency::usd()).with_card(CardSource::Token("tok_9Kx2".into()));
        let response = client_for(&server).create_charge(&charge).await.unwrap();
        assert_eq!(response.id, "char_1");
        assert_eq!(response.amount, 1500);
        assert!(response.captured);
        assert_eq!(response.customer_id, CustomerId::default());
    }

    #[tokio::test]
    async fn test_retrieve_token_trims_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tokens/tok_1"))
            .and(basic_auth(KEY, ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "tok_1",
                "objectType": "token",
                "used": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server).retrieve_token("  tok_1 ").await.unwrap();
        assert_eq!(token.id, "tok_1");
    }

    #[tokio::test]
    async fn test_list_credits_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/credits"))
            .and(query_param("limit", "3"))
            .and(query_param("customerId", "cust_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [{"id": "cr_1", "amount": "250", "currency": "EUR"}],
                "hasMore": true
            })))
            .mount(&server)
            .await;

        let request = CreditRequest {
            customer_id: Some("cust_1".into()),
            ..CreditRequest::default()
        };
        let credits = client_for(&server).list_credits(&request).await.unwrap();
        assert!(credits.has_more);
        assert_eq!(credits.credits.len(), 1);
        assert_eq!(credits.credits[0].amount_minor_units, 250);
    }

    #[tokio::test]
    async fn test_remote_error_keeps_body_verbatim() {
        let server = MockServer::start().await;
        let body = r#"{"error":"invalid customerID"}"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string(body))
            .mount(&server)
            .await;

        let err = client_for(&server).retrieve_token("tok_1").await.unwrap_err();
        assert_eq!(err.to_string(), body);
        assert_eq!(err.status(), Some(http::StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_remote_error_without_body_uses_status_line() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).retrieve_token("tok_1").await.unwrap_err();
        assert_eq!(err.to_string(), "404 Not Found");
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).retrieve_token("tok_1").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { context: "GET /tokens/{id}", .. }));
    }

    #[tokio::test]
    async fn test_validation_failures_never_reach_the_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = client_for(&server);

        let err = client
            .register_card(&AddCardRequest::new("cust_1", Card::with_id(" ")))
            .await
            .unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::InvalidCard));

        let err = client
            .register_card(&AddCardRequest::new("", Card::with_id("card_1")))
            .await
            .unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::InvalidCustomer));

        let err = client
            .create_charge(&Charge::new(100, Currency::eur()))
            .await
            .unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::MissingPaymentSource));

        let err = client
            .create_token(&TokenRequest::new("4242424242424242", 12, 2030, ""))
            .await
            .unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::MissingSecurityCode));

        let err = client.retrieve_token("   ").await.unwrap_err();
        assert_eq!(err.validation(), Some(ValidationError::MissingIdentifier));
    }

    #[tokio::test]
    async fn test_set_api_key_applies_to_clones() {
        let server = MockServer::start().await;
        Mock::given(basic_auth("sk_rotated", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "tok_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let clone = client.clone();
        client.set_api_key("sk_rotated");
        assert_eq!(clone.credentials().api_key().expose(), "sk_rotated");
        clone.retrieve_token("tok_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "tok_1"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = SecurionPayClient::try_new(
            ClientConfig::new(KEY)
                .with_base_url(server.uri())
                .with_timeout(Duration::from_millis(50)),
        )
        .unwrap();
        let err = client.retrieve_token("tok_1").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client =
            SecurionPayClient::try_new(ClientConfig::new(KEY).with_base_url("http://127.0.0.1:1"))
                .unwrap();
        let err = client.retrieve_token("tok_1").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
        assert!(!err.is_local());
    }

    #[tokio::test]
    async fn test_unencodable_payload_is_never_sent() {
        struct Unencodable;

        impl Serialize for Unencodable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("unsupported payload"))
            }
        }

        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let url = client.endpoints().charges().unwrap();
        let err = client
            .post_json::<_, ChargeResponse>(url, "POST /charges", &Unencodable)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Encode { context: "POST /charges", .. }));
        assert!(err.is_local());
    }

    #[test]
    fn test_client_debug_redacts_key() {
        let client = SecurionPayClient::with_api_key(KEY).unwrap();
        assert!(!format!("{client:?}").contains(KEY));
        assert_eq!(
            client.endpoints().base_url().as_str(),
            "https://api.securionpay.com/"
        );
    }
}

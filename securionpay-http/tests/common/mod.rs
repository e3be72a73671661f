//! In-memory SecurionPay API used as a transport in integration tests.
//!
//! The middleware answers every request itself and never calls `next`, so no
//! socket is opened.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Request, Response, StatusCode};
use reqwest_middleware::{ClientWithMiddleware, Middleware, Next};
use securionpay::TokenRequest;

pub const CUSTOMER_ID: &str = "customerID1";
pub const TOKEN_ID_1: &str = "tokenID1";
pub const TOKEN_ID_2: &str = "tokenID2";

pub const TOKEN_1: &str = include_str!("../testdata/token-tokenID1.json");
pub const TOKEN_2: &str = include_str!("../testdata/token-tokenID2.json");
pub const ADD_CARD: &str = include_str!("../testdata/addcard1.json");
pub const CHARGE_RESPONSE: &str = include_str!("../testdata/chargeResp1.json");
pub const CREDITS: &str = include_str!("../testdata/credits1.json");
pub const TOKEN_REQUEST: &str = include_str!("../testdata/token-req-id1.json");
pub const TOKEN_REQUEST_NO_CVC: &str = include_str!("../testdata/token-req-no-cvc.json");

#[derive(Debug, Default)]
pub struct StubState {
    calls: AtomicUsize,
    rejected: AtomicUsize,
    accepted_keys: Vec<String>,
    last_auth: Mutex<Option<(String, String)>>,
}

impl StubState {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests signed with a key outside the accepted set.
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<(String, String)> {
        self.last_auth.lock().expect("stub lock poisoned").clone()
    }
}

#[derive(Debug, Clone)]
pub struct StubApi {
    state: Arc<StubState>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::accepting(Vec::new())
    }

    /// Only `keys` are valid; an empty list accepts any non-blank key.
    pub fn accepting(keys: Vec<String>) -> Self {
        Self {
            state: Arc::new(StubState {
                accepted_keys: keys,
                ..StubState::default()
            }),
        }
    }

    pub fn state(&self) -> Arc<StubState> {
        Arc::clone(&self.state)
    }

    pub fn transport(&self) -> ClientWithMiddleware {
        reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
            .with(self.clone())
            .build()
    }

    fn route(&self, req: &Request) -> (StatusCode, String) {
        let Some((username, password)) = basic_credentials(req) else {
            return (
                StatusCode::FORBIDDEN,
                "expecting the API key in the basic auth".to_owned(),
            );
        };
        *self.state.last_auth.lock().expect("stub lock poisoned") =
            Some((username.clone(), password.clone()));

        if username.trim().is_empty() {
            return (
                StatusCode::FORBIDDEN,
                "expecting the API key in the basic auth".to_owned(),
            );
        }
        if !password.is_empty() {
            return (
                StatusCode::FORBIDDEN,
                "no password was expected, please check the docs".to_owned(),
            );
        }
        if !self.state.accepted_keys.is_empty() && !self.state.accepted_keys.contains(&username) {
            self.state.rejected.fetch_add(1, Ordering::SeqCst);
            return (StatusCode::UNAUTHORIZED, "unknown API key".to_owned());
        }

        let segments: Vec<&str> = req
            .url()
            .path_segments()
            .map(|s| s.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match (req.method(), segments.as_slice()) {
            (&Method::GET, ["tokens", id]) => match *id {
                TOKEN_ID_1 => (StatusCode::OK, TOKEN_1.to_owned()),
                TOKEN_ID_2 => (StatusCode::OK, TOKEN_2.to_owned()),
                _ => (StatusCode::BAD_REQUEST, "invalid tokenID".to_owned()),
            },
            (&Method::POST, ["tokens"]) => {
                let parsed = body_bytes(req)
                    .and_then(|body| serde_json::from_slice::<TokenRequest>(body).ok());
                match parsed {
                    Some(request) if request != TokenRequest::default() => {
                        (StatusCode::OK, TOKEN_1.to_owned())
                    }
                    _ => (
                        StatusCode::BAD_REQUEST,
                        "expecting a token request".to_owned(),
                    ),
                }
            }
            (&Method::POST, ["charges"]) => (StatusCode::OK, CHARGE_RESPONSE.to_owned()),
            (&Method::POST, ["customers", customer, "cards"]) => {
                if *customer == CUSTOMER_ID {
                    (StatusCode::OK, ADD_CARD.to_owned())
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        "no customerID was passed in".to_owned(),
                    )
                }
            }
            (&Method::GET, ["credits"]) => (StatusCode::OK, CREDITS.to_owned()),
            _ => (StatusCode::NOT_FOUND, String::new()),
        }
    }
}

#[async_trait::async_trait]
impl Middleware for StubApi {
    async fn handle(
        &self,
        req: Request,
        _extensions: &mut http::Extensions,
        _next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        let (status, body) = self.route(&req);
        let response = http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body.into_bytes())
            .expect("valid stub response");
        Ok(Response::from(response))
    }
}

fn body_bytes(req: &Request) -> Option<&[u8]> {
    req.body().and_then(reqwest::Body::as_bytes)
}

fn basic_credentials(req: &Request) -> Option<(String, String)> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}

//! API key and transport shared by every clone of a client.
//!
//! The store holds an immutable snapshot behind a [`RwLock`]. Requests clone
//! the snapshot under the read lock and sign with that copy, so replacing the
//! key while requests are in flight never yields a request signed with a
//! partially written key.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use reqwest_middleware::ClientWithMiddleware;

/// Secret SecurionPay API key.
///
/// Sent as the Basic auth username with an empty password. `Debug` output
/// never contains the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    /// Wraps a key.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Returns the key in clear text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the key is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(Arc::from(key))
    }
}

#[derive(Clone)]
struct Snapshot {
    api_key: ApiKey,
    transport: Option<ClientWithMiddleware>,
}

/// Key and transport used to sign and send requests.
pub struct CredentialStore {
    state: RwLock<Snapshot>,
    default_transport: ClientWithMiddleware,
}

impl CredentialStore {
    /// Creates a store. Without a custom transport, requests go through a
    /// plain `reqwest::Client`.
    #[must_use]
    pub fn new(api_key: ApiKey, transport: Option<ClientWithMiddleware>) -> Self {
        let default_transport =
            reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build();
        Self {
            state: RwLock::new(Snapshot {
                api_key,
                transport,
            }),
            default_transport,
        }
    }

    // A writer only ever swaps whole snapshots, so a poisoned lock still
    // guards a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, update: impl FnOnce(&Snapshot) -> Snapshot) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = update(&guard);
        *guard = next;
    }

    /// Returns the current key.
    #[must_use]
    pub fn api_key(&self) -> ApiKey {
        self.read().api_key.clone()
    }

    /// Returns the key and transport for one request, read together.
    #[must_use]
    pub fn signing_pair(&self) -> (ApiKey, ClientWithMiddleware) {
        let snapshot = self.read().clone();
        let transport = snapshot
            .transport
            .unwrap_or_else(|| self.default_transport.clone());
        (snapshot.api_key, transport)
    }

    /// Returns `true` if a custom transport is installed.
    #[must_use]
    pub fn has_custom_transport(&self) -> bool {
        self.read().transport.is_some()
    }

    /// Replaces the key used by subsequent requests.
    pub fn set_api_key(&self, api_key: impl Into<ApiKey>) {
        let api_key = api_key.into();
        self.replace(|current| Snapshot {
            api_key,
            transport: current.transport.clone(),
        });
    }

    /// Replaces the transport used by subsequent requests.
    pub fn set_transport(&self, transport: ClientWithMiddleware) {
        self.replace(|current| Snapshot {
            api_key: current.api_key.clone(),
            transport: Some(transport),
        });
    }

    /// Reverts to the default transport.
    pub fn clear_transport(&self) {
        self.replace(|current| Snapshot {
            api_key: current.api_key.clone(),
            transport: None,
        });
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("api_key", &self.api_key())
            .field("custom_transport", &self.has_custom_transport())
            .finish_non_exhaustive()
    }
}

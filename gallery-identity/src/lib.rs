//! Anonymous identity client for the gallery.
//!
//! This crate provides:
//! - [`IdentitySource`] config enum for choosing between mock and live clients
//! - [`IdentityProvider`] trait for abstracting identity bootstrap
//! - [`AnonymousAuthClient`] production client that mints an anonymous
//!   session on first use and returns the same session afterwards
//! - [`MockIdentityProvider`] fixed-identity provider for testing

mod mock;

pub use mock::MockIdentityProvider;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tokio::sync::Mutex;

use gallery_shared::Identity;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("sign-in rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, IdentityError>;

/// One authenticated anonymous session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The identity token used to deduplicate votes.
    pub identity: Identity,
    /// Bearer token for authenticated calls to the other backend services.
    pub id_token: String,
}

/// Trait for bootstrapping an anonymous session identity.
///
/// The first call mints a new identity; subsequent calls on the same
/// provider instance return the same session without further interaction.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<Session>;
}

/// Production client for the anonymous sign-up endpoint.
///
/// The minted session is cached for the provider's lifetime; `sign_in` only
/// reaches the network once.
pub struct AnonymousAuthClient {
    api_key: String,
    client: ReqwestClient,
    session: Mutex<Option<Session>>,
}

const SIGN_UP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signUp";

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(rename = "idToken")]
    id_token: String,
}

impl AnonymousAuthClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: ReqwestClient::new(),
            session: Mutex::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for AnonymousAuthClient {
    async fn sign_in(&self) -> Result<Session> {
        let mut cached = self.session.lock().await;
        if let Some(session) = cached.as_ref() {
            return Ok(session.clone());
        }

        let response = self
            .client
            .post(format!("{}?key={}", SIGN_UP_URL, self.api_key))
            .json(&serde_json::json!({ "returnSecureToken": true }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: SignUpResponse = response.json().await?;
        let session = Session {
            identity: Identity::new(body.local_id),
            id_token: body.id_token,
        };
        *cached = Some(session.clone());
        Ok(session)
    }
}

/// Configuration for the identity backend.
#[derive(Debug, Clone)]
pub enum IdentitySource {
    /// Hand out a fixed mock identity.
    Mock,
    /// Sign in anonymously against the live endpoint.
    Live {
        /// API key for the sign-up endpoint.
        api_key: String,
    },
}

impl IdentitySource {
    /// Create a mock identity source.
    pub fn mock() -> Self {
        Self::Mock
    }

    /// Create a live identity source with the given API key.
    pub fn live(api_key: impl Into<String>) -> Self {
        Self::Live {
            api_key: api_key.into(),
        }
    }

    /// Create the appropriate IdentityProvider implementation.
    pub fn into_provider(self) -> Box<dyn IdentityProvider> {
        match self {
            Self::Mock => Box::new(MockIdentityProvider::new()),
            Self::Live { api_key } => Box::new(AnonymousAuthClient::new(api_key)),
        }
    }
}

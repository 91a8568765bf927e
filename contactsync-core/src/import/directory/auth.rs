//! Authorization for the remote contact directory.
//!
//! The provider client is loaded lazily, once, and wrapped in a reusable
//! [`TokenClient`]. Every token request gets its own one-shot responder keyed
//! by a fresh request id, so a late answer can only ever reach the invocation
//! that asked for it.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{OnceCell, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AuthorizationError;
use crate::progress::BusyFlag;

/// Read-only contacts scope requested from the provider
pub const DIRECTORY_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/contacts.readonly";

/// Bearer credential for the directory listing
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wraps a raw token value
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Returns the token for use in an `Authorization` header
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// OAuth `prompt` value forcing the consent screen on every request
pub const CONSENT_PROMPT: &str = "consent";

/// A single token request handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// Correlation id of this invocation
    pub request_id: Uuid,
    /// Scope to grant
    pub scope: String,
    /// OAuth `prompt` parameter
    pub prompt: &'static str,
}

/// One-shot handle a provider answers a [`TokenRequest`] through.
///
/// Dropping it without answering resolves the request as
/// [`AuthorizationError::NoResponse`].
#[derive(Debug)]
pub struct TokenResponder {
    request_id: Uuid,
    sender: oneshot::Sender<Result<AccessToken, AuthorizationError>>,
}

impl TokenResponder {
    /// Returns the id of the request this responder answers
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Delivers a granted token
    pub fn grant(self, token: AccessToken) {
        let _ = self.sender.send(Ok(token));
    }

    /// Delivers a provider error code such as `access_denied`
    pub fn deny(self, error: impl Into<String>) {
        let _ = self.sender.send(Err(AuthorizationError::Provider(error.into())));
    }
}

/// Host integration with the directory's OAuth provider
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Loads the provider client library.
    ///
    /// Called at most once per successful [`DirectoryAuthorizer`] setup.
    async fn load_client(&self) -> Result<(), AuthorizationError>;

    /// Starts a token request and answers it through `responder`,
    /// immediately or later from another task.
    fn request_token(&self, request: TokenRequest, responder: TokenResponder);
}

/// Reusable token requester scoped to one permission
pub struct TokenClient {
    provider: Arc<dyn AuthorizationProvider>,
    scope: String,
}

impl TokenClient {
    /// Returns the scope this client requests
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Requests a token and waits for this request's answer
    pub async fn request(&self) -> Result<AccessToken, AuthorizationError> {
        let request_id = Uuid::new_v4();
        let (sender, receiver) = oneshot::channel();
        debug!(%request_id, "Requesting directory token");

        self.provider.request_token(
            TokenRequest {
                request_id,
                scope: self.scope.clone(),
                prompt: CONSENT_PROMPT,
            },
            TokenResponder { request_id, sender },
        );

        receiver.await.unwrap_or(Err(AuthorizationError::NoResponse))
    }
}

impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Snapshot of the directory authorization state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationState {
    /// The provider client is loaded and the token client exists
    pub token_client_ready: bool,
    /// A token request or listing sweep is running
    pub in_flight: bool,
    /// Message of the last failure, cleared when a new attempt starts
    pub last_error: Option<String>,
}

/// Owns the lazily built token client and the busy/error state
pub struct DirectoryAuthorizer {
    provider: Arc<dyn AuthorizationProvider>,
    scope: String,
    client: OnceCell<TokenClient>,
    busy: BusyFlag,
    last_error: Mutex<Option<String>>,
}

impl DirectoryAuthorizer {
    /// Creates an authorizer for `scope`
    #[must_use]
    pub fn new(provider: Arc<dyn AuthorizationProvider>, scope: impl Into<String>) -> Self {
        Self {
            provider,
            scope: scope.into(),
            client: OnceCell::new(),
            busy: BusyFlag::new(),
            last_error: Mutex::new(None),
        }
    }

    /// Returns the token client, loading the provider on first use.
    ///
    /// Concurrent callers share a single load.
    pub async fn token_client(&self) -> Result<&TokenClient, AuthorizationError> {
        self.client
            .get_or_try_init(|| async {
                info!(scope = %self.scope, "Loading directory authorization client");
                self.provider.load_client().await?;
                Ok(TokenClient {
                    provider: Arc::clone(&self.provider),
                    scope: self.scope.clone(),
                })
            })
            .await
    }

    /// Requests a token with a forced consent prompt
    pub async fn authorize(&self) -> Result<AccessToken, AuthorizationError> {
        let client = self.token_client().await?;
        client.request().await.inspect_err(|e| {
            warn!(error = %e, "Directory authorization failed");
        })
    }

    /// Returns the scope requested by the token client
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub(super) fn provider(&self) -> Arc<dyn AuthorizationProvider> {
        Arc::clone(&self.provider)
    }

    /// Returns the busy flag covering token request through fetch
    #[must_use]
    pub const fn busy(&self) -> &BusyFlag {
        &self.busy
    }

    /// Returns a snapshot of the current state
    #[must_use]
    pub fn state(&self) -> AuthorizationState {
        AuthorizationState {
            token_client_ready: self.client.initialized(),
            in_flight: self.busy.is_busy(),
            last_error: self
                .last_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    pub(super) fn set_last_error(&self, error: Option<String>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }
}

impl std::fmt::Debug for DirectoryAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryAuthorizer")
            .field("scope", &self.scope)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Provider that grants a pre-obtained access token.
///
/// Without a token every request is denied with `access_denied`.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<AccessToken>,
}

impl StaticTokenProvider {
    /// Creates a provider granting `token` (or denying when `None`)
    #[must_use]
    pub fn new(token: Option<AccessToken>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl AuthorizationProvider for StaticTokenProvider {
    async fn load_client(&self) -> Result<(), AuthorizationError> {
        Ok(())
    }

    fn request_token(&self, _request: TokenRequest, responder: TokenResponder) {
        match &self.token {
            Some(token) => responder.grant(token.clone()),
            None => responder.deny("access_denied"),
        }
    }
}

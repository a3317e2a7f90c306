//! Authenticated API client.
//!
//! [`ApiClient`] is middleware over a [`Transport`]: it injects the stored
//! bearer token, intercepts 401 responses, refreshes the credential pair and
//! resubmits the request once. Refreshes are single-flight: concurrent 401s
//! share one refresh call, because the backend rotates refresh tokens and
//! parallel refreshes would invalidate each other.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::auth::{RefreshToken, TokenPair, TokenStore};
use crate::error::{AuthError, Error};
use crate::types::BaseUrl;

use super::endpoints::{self, RefreshRequest};
use super::request::ApiRequest;
use super::response::ApiResponse;
use super::transport::{ReqwestTransport, Transport};

/// How many times a request may be resubmitted after a token refresh.
pub const MAX_AUTH_RETRIES: u32 = 1;

const EVENT_CAPACITY: usize = 16;

/// What to do with a response, given how often the request was already sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Hand the response (or its error) to the caller.
    Deliver,
    /// Refresh the credentials and resubmit.
    RefreshAndRetry,
}

/// Decide whether a response warrants a refresh-and-retry.
///
/// `attempt` is 0 for the original submission and increases by one for each
/// resubmission.
pub fn retry_decision(status: StatusCode, attempt: u32) -> RetryDecision {
    if status == StatusCode::UNAUTHORIZED && attempt < MAX_AUTH_RETRIES {
        RetryDecision::RefreshAndRetry
    } else {
        RetryDecision::Deliver
    }
}

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A pair was stored after sign-in or sign-up.
    LoggedIn,
    /// The pair was rotated by a refresh.
    TokensRefreshed,
    /// Stored credentials were removed; the user has to log in again.
    LoggedOut(LogoutReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutReason {
    UserRequested,
    SessionExpired(AuthError),
}

type RefreshOutcome = std::result::Result<TokenPair, AuthError>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

#[derive(Default)]
struct RefreshSlot {
    next_generation: u64,
    pending: Option<PendingRefresh>,
}

struct PendingRefresh {
    generation: u64,
    outcome: SharedRefresh,
}

/// Client for the Instantgram backend.
///
/// Cheap to clone; clones share the token store, the event channel and the
/// pending refresh. Construct one per application instance.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use instantgram::types::DEFAULT_BASE_URL;
/// use instantgram::{ApiClient, BaseUrl, LoginCredentials, MemoryTokenStore};
///
/// # async fn example() -> Result<(), instantgram::Error> {
/// let base = BaseUrl::new(DEFAULT_BASE_URL)?;
/// let client = ApiClient::connect(base, Arc::new(MemoryTokenStore::new()))?;
/// client.auth().sign_in(&LoginCredentials::new("alice", "x")).await?;
///
/// let feed = client.posts().feed(None, None).await?;
/// println!("{} posts", feed.total_elements);
/// # Ok(())
/// # }
/// ```
pub struct ApiClient<T = ReqwestTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    transport: T,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<AuthEvent>,
    refresh: Mutex<RefreshSlot>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ApiClient<ReqwestTransport> {
    /// Create a client talking HTTP to `base`.
    pub fn connect(base: BaseUrl, store: Arc<dyn TokenStore>) -> Result<Self> {
        Ok(Self::new(ReqwestTransport::new(base)?, store))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Compose the client over an arbitrary transport.
    pub fn new(transport: T, store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(ClientInner {
                transport,
                store,
                events,
                refresh: Mutex::new(RefreshSlot::default()),
            }),
        }
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.inner.store.as_ref()
    }

    /// Receive session lifecycle events, including the logout signal.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.slot().pending.is_some()
    }

    /// Store a freshly issued pair (sign-in, sign-up).
    pub fn set_tokens(&self, pair: &TokenPair) -> Result<()> {
        self.inner.store.save(pair)?;
        self.inner.emit(AuthEvent::LoggedIn);
        Ok(())
    }

    /// Delete stored credentials.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        self.inner.store.clear()?;
        info!("Logged out");
        self.inner
            .emit(AuthEvent::LoggedOut(LogoutReason::UserRequested));
        Ok(())
    }

    /// Wipe stored credentials and announce the expired session.
    pub(crate) fn expire_session(&self, reason: AuthError) {
        self.inner.end_session(reason);
    }

    /// Send a request with bearer authentication and one transparent
    /// refresh-and-retry on 401.
    ///
    /// Non-success responses other than an intercepted 401 come back as
    /// [`Error::Protocol`]; transport failures as [`Error::Transport`].
    /// Anything that goes wrong with the resubmitted request is wrapped in
    /// [`Error::RetryFailed`].
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        if request.is_anonymous() {
            debug!("Anonymous request");
            return self.inner.transport.send(&request).await?.error_for_status();
        }

        let mut request = match self.inner.store.load()?.access_token {
            Some(token) => request.authorized(&token)?,
            None => request,
        };

        let mut attempt = 0;
        loop {
            let response = self
                .inner
                .transport
                .send(&request)
                .await
                .map_err(|e| after_attempt(e, attempt))?;

            match retry_decision(response.status(), attempt) {
                RetryDecision::Deliver => {
                    return response
                        .error_for_status()
                        .map_err(|e| after_attempt(e, attempt));
                }
                RetryDecision::RefreshAndRetry => {
                    info!("Access token rejected, attempting refresh");
                    let tokens = self.refresh().await?;
                    request = request.authorized(&tokens.access_token)?;
                    attempt += 1;
                    debug!(attempt, "Retrying request with refreshed token");
                }
            }
        }
    }

    /// [`send`](Self::send) and decode the JSON body.
    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        self.send(request).await?.json()
    }

    /// Obtain a new credential pair, joining the refresh already in flight
    /// if there is one.
    ///
    /// The new pair is persisted before this returns. If no refresh token is
    /// stored, or the backend rejects it, stored credentials are deleted and
    /// [`AuthEvent::LoggedOut`] is emitted once per failed refresh.
    pub async fn refresh(&self) -> Result<TokenPair> {
        let outcome = self.pending_refresh()?;
        Ok(outcome.await?)
    }

    fn pending_refresh(&self) -> Result<SharedRefresh> {
        let mut slot = self.inner.slot();
        if let Some(pending) = &slot.pending {
            debug!(generation = pending.generation, "Refresh already in progress, waiting");
            return Ok(pending.outcome.clone());
        }

        let Some(refresh_token) = self.inner.store.load()?.refresh_token else {
            drop(slot);
            warn!("No refresh token available");
            self.inner.end_session(AuthError::NoRefreshToken);
            return Err(AuthError::NoRefreshToken.into());
        };

        let generation = slot.next_generation;
        slot.next_generation += 1;

        let outcome = ClientInner::run_refresh(Arc::downgrade(&self.inner), generation, refresh_token)
            .boxed()
            .shared();
        slot.pending = Some(PendingRefresh {
            generation,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }
}

impl<T: Transport> ClientInner<T> {
    fn slot(&self) -> std::sync::MutexGuard<'_, RefreshSlot> {
        self.refresh.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Body of the shared refresh future. Runs once per generation no
    /// matter how many requests await it.
    async fn run_refresh(
        inner: Weak<Self>,
        generation: u64,
        refresh_token: RefreshToken,
    ) -> RefreshOutcome {
        let Some(inner) = inner.upgrade() else {
            return Err(AuthError::RefreshRejected {
                status: None,
                message: "client was dropped".to_string(),
            });
        };

        info!(generation, "Starting token refresh");
        let outcome = inner.request_tokens(&refresh_token).await;

        match &outcome {
            Ok(pair) => {
                if let Err(e) = inner.store.save(pair) {
                    warn!(error = %e, "Failed to persist refreshed tokens");
                }
                info!(generation, "Token refreshed successfully");
                inner.emit(AuthEvent::TokensRefreshed);
            }
            Err(err) => {
                warn!(generation, error = %err, "Token refresh failed");
                inner.end_session(err.clone());
            }
        }

        // Cleared before any waiter sees the outcome, so later 401s start a
        // new refresh instead of joining this one.
        let mut slot = inner.slot();
        if slot
            .pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation)
        {
            slot.pending = None;
        }
        drop(slot);

        outcome
    }

    async fn request_tokens(&self, refresh_token: &RefreshToken) -> RefreshOutcome {
        let rejected = |status: Option<u16>, message: String| AuthError::RefreshRejected {
            status,
            message,
        };

        let request = ApiRequest::post(endpoints::REFRESH)
            .anonymous()
            .json(&RefreshRequest::from(refresh_token))
            .map_err(|e| rejected(None, e.to_string()))?;

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| rejected(None, e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(rejected(Some(status), response.protocol_error().to_string()));
        }

        response
            .json::<TokenPair>()
            .map_err(|e| rejected(Some(status), e.to_string()))
    }

    fn end_session(&self, reason: AuthError) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored tokens");
        }
        info!("Session ended, login required");
        self.emit(AuthEvent::LoggedOut(LogoutReason::SessionExpired(reason)));
    }
}

fn after_attempt(err: Error, attempt: u32) -> Error {
    if attempt == 0 {
        err
    } else {
        Error::RetryFailed(Box::new(err))
    }
}

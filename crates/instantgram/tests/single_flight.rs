//! Refresh coordination tests against an in-process backend.
//!
//! The fake backend implements [`Transport`] directly, which lets the tests
//! hold a refresh open while more requests pile up behind it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use instantgram::auth::{AccessToken, RefreshToken, StoredTokens};
use instantgram::error::{AuthError, StorageError, TransportError};
use instantgram::http::{RequestBody, endpoints};
use instantgram::{
    ApiClient, ApiRequest, ApiResponse, AuthEvent, Error, LogoutReason, MemoryTokenStore,
    TokenPair, TokenStore, Transport,
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::sync::{Semaphore, broadcast};

const INFO: &str = "/api/v1/auth/info";

// ============================================================================
// Fake backend
// ============================================================================

#[derive(Default)]
struct BackendState {
    valid_access: Option<String>,
    valid_refresh: String,
    issued: u32,
    reject_all: bool,
    token_params: Vec<String>,
    stored_at_delivery: Vec<Option<String>>,
}

/// Accepts only the most recently issued access token and rotates the pair
/// on every successful refresh, like the real backend.
struct FakeBackend {
    state: Mutex<BackendState>,
    refresh_calls: AtomicUsize,
    unauthorized: AtomicUsize,
    gate: Option<Semaphore>,
    witness: Option<Arc<MemoryTokenStore>>,
}

impl FakeBackend {
    fn new(valid_refresh: &str) -> Self {
        Self {
            state: Mutex::new(BackendState {
                valid_refresh: valid_refresh.to_string(),
                issued: 1,
                ..Default::default()
            }),
            refresh_calls: AtomicUsize::new(0),
            unauthorized: AtomicUsize::new(0),
            gate: None,
            witness: None,
        }
    }

    /// Hold every refresh call until [`FakeBackend::open_gate`].
    fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Record what the client's store holds whenever a request is accepted.
    fn watching(mut self, store: Arc<MemoryTokenStore>) -> Self {
        self.witness = Some(store);
        self
    }

    fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn unauthorized(&self) -> usize {
        self.unauthorized.load(Ordering::SeqCst)
    }

    fn expire_access(&self) {
        self.state.lock().unwrap().valid_access = None;
    }

    fn reject_everything(&self) {
        self.state.lock().unwrap().reject_all = true;
    }

    async fn refresh(&self, request: &ApiRequest) -> ApiResponse {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }

        let presented = match request.body() {
            RequestBody::Json(body) => body["refreshToken"].as_str().map(str::to_string),
            _ => None,
        };

        let mut state = self.state.lock().unwrap();
        if presented.as_deref() != Some(state.valid_refresh.as_str()) {
            return respond(
                401,
                json!({"error": "InvalidToken", "message": "refresh token expired"}),
            );
        }

        state.issued += 1;
        let n = state.issued;
        state.valid_access = Some(format!("A{}", n));
        state.valid_refresh = format!("R{}", n);
        respond(
            200,
            json!({"accessToken": format!("A{}", n), "refreshToken": format!("R{}", n)}),
        )
    }

    fn protected(&self, request: &ApiRequest) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        if let Some(token) = request.query_value(endpoints::VALIDATE_TOKEN_PARAM) {
            state.token_params.push(token.to_string());
        }

        let accepted = match (&state.valid_access, request.authorization()) {
            (Some(valid), Some(header)) => !state.reject_all && header == format!("Bearer {}", valid),
            _ => false,
        };
        if !accepted {
            self.unauthorized.fetch_add(1, Ordering::SeqCst);
            return respond(401, json!({"error": "Unauthorized", "message": "token expired"}));
        }

        if let Some(store) = &self.witness {
            let stored = store.load().unwrap().access_token;
            state
                .stored_at_delivery
                .push(stored.map(|t| t.as_str().to_string()));
        }
        respond(200, json!({"id": "u1", "username": "alice", "valid": true}))
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: &ApiRequest) -> instantgram::Result<ApiResponse> {
        match request.path() {
            endpoints::REFRESH => Ok(self.refresh(request).await),
            endpoints::SIGN_IN => Ok(respond(
                401,
                json!({"error": "BadCredentials", "message": "wrong password"}),
            )),
            "/boom" => Ok(respond(500, json!({"error": "InternalError"}))),
            "/offline" => Err(TransportError::Connection {
                message: "connection refused".to_string(),
            }
            .into()),
            _ => Ok(self.protected(request)),
        }
    }
}

fn respond(status: u16, body: Value) -> ApiResponse {
    ApiResponse::json_body(StatusCode::from_u16(status).unwrap(), &body)
}

/// Store holding an expired `A1` and a valid `R1`.
fn stale_store() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_tokens(StoredTokens::from(
        TokenPair::new("A1", "R1"),
    )))
}

fn stored_pair(store: &dyn TokenStore) -> (Option<String>, Option<String>) {
    let tokens = store.load().unwrap();
    (
        tokens.access_token.map(|t| t.as_str().to_string()),
        tokens.refresh_token.map(|t| t.as_str().to_string()),
    )
}

async fn wait_for_unauthorized(backend: &FakeBackend, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while backend.unauthorized() < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("requests never reached the backend");
}

fn drain(rx: &mut broadcast::Receiver<AuthEvent>) -> Vec<AuthEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Memory store that counts how often it was wiped.
#[derive(Default)]
struct CountingStore {
    inner: MemoryTokenStore,
    clears: AtomicUsize,
}

impl TokenStore for CountingStore {
    fn load(&self) -> Result<StoredTokens, StorageError> {
        self.inner.load()
    }

    fn save(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.inner.save(pair)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

// ============================================================================
// Single-flight refresh
// ============================================================================

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
    let store = stale_store();
    let client = ApiClient::new(FakeBackend::new("R1").gated(), store.clone());

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.send(ApiRequest::get(INFO)).await })
        })
        .collect();

    wait_for_unauthorized(client.transport(), 5).await;
    assert!(client.is_refreshing());
    client.transport().open_gate();

    for task in tasks {
        let response = task.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(client.transport().refresh_calls(), 1);
    assert!(!client.is_refreshing());
    assert_eq!(
        stored_pair(store.as_ref()),
        (Some("A2".to_string()), Some("R2".to_string()))
    );
}

#[tokio::test]
async fn settled_refresh_is_not_reused() {
    let store = stale_store();
    let client = ApiClient::new(FakeBackend::new("R1"), store.clone());

    client.send(ApiRequest::get(INFO)).await.unwrap();
    assert_eq!(client.transport().refresh_calls(), 1);

    client.transport().expire_access();
    client.send(ApiRequest::get(INFO)).await.unwrap();

    assert_eq!(client.transport().refresh_calls(), 2);
    assert_eq!(
        stored_pair(store.as_ref()),
        (Some("A3".to_string()), Some("R3".to_string()))
    );
}

#[tokio::test]
async fn refreshed_pair_is_stored_before_resubmission() {
    let store = stale_store();
    let backend = FakeBackend::new("R1").watching(store.clone());
    let client = ApiClient::new(backend, store.clone());

    client.send(ApiRequest::get(INFO)).await.unwrap();

    let state = client.transport().state.lock().unwrap();
    assert_eq!(state.stored_at_delivery, vec![Some("A2".to_string())]);
}

#[tokio::test]
async fn refresh_emits_tokens_refreshed() {
    let client = ApiClient::new(FakeBackend::new("R1"), stale_store());
    let mut events = client.subscribe();

    client.send(ApiRequest::get(INFO)).await.unwrap();

    assert_eq!(drain(&mut events), vec![AuthEvent::TokensRefreshed]);
}

// ============================================================================
// Retry limit
// ============================================================================

#[tokio::test]
async fn second_unauthorized_is_not_retried() {
    let client = ApiClient::new(FakeBackend::new("R1"), stale_store());
    client.transport().reject_everything();

    let err = client.send(ApiRequest::get(INFO)).await.unwrap_err();

    assert!(matches!(err, Error::RetryFailed(_)), "got {:?}", err);
    assert_eq!(err.status(), Some(401));
    assert_eq!(client.transport().refresh_calls(), 1);
    assert_eq!(client.transport().unauthorized(), 2);
}

#[tokio::test]
async fn token_query_param_is_rewritten_on_retry() {
    let client = ApiClient::new(FakeBackend::new("R1"), stale_store());

    let validation = client.auth().validate().await.unwrap();
    assert!(validation.valid);

    let state = client.transport().state.lock().unwrap();
    assert_eq!(state.token_params, vec!["A1".to_string(), "A2".to_string()]);
}

// ============================================================================
// Unrecoverable sessions
// ============================================================================

#[tokio::test]
async fn missing_refresh_token_logs_out_without_network_call() {
    let store = Arc::new(MemoryTokenStore::with_tokens(StoredTokens {
        access_token: Some(AccessToken::new("A1")),
        refresh_token: None,
    }));
    let client = ApiClient::new(FakeBackend::new("R1"), store.clone());
    let mut events = client.subscribe();

    let err = client.send(ApiRequest::get(INFO)).await.unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::NoRefreshToken)));
    assert!(err.is_unauthenticated());
    assert_eq!(client.transport().refresh_calls(), 0);
    assert_eq!(stored_pair(store.as_ref()), (None, None));
    assert_eq!(
        drain(&mut events),
        vec![AuthEvent::LoggedOut(LogoutReason::SessionExpired(
            AuthError::NoRefreshToken
        ))]
    );
}

#[tokio::test]
async fn rejected_refresh_logs_out_once_for_all_waiters() {
    let store = Arc::new(CountingStore::default());
    store.save(&TokenPair::new("A1", "R1")).unwrap();
    let client = ApiClient::new(FakeBackend::new("R-other").gated(), store.clone());
    let mut events = client.subscribe();

    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.send(ApiRequest::get(INFO)).await })
        })
        .collect();

    wait_for_unauthorized(client.transport(), 3).await;
    client.transport().open_gate();

    for task in tasks {
        let err = task.await.unwrap().unwrap_err();
        assert!(
            matches!(
                err,
                Error::Auth(AuthError::RefreshRejected {
                    status: Some(401),
                    ..
                })
            ),
            "got {:?}",
            err
        );
    }

    assert_eq!(client.transport().refresh_calls(), 1);
    assert_eq!(store.clears.load(Ordering::SeqCst), 1);
    assert_eq!(stored_pair(store.as_ref()), (None, None));

    let logouts = drain(&mut events)
        .into_iter()
        .filter(|event| matches!(event, AuthEvent::LoggedOut(_)))
        .count();
    assert_eq!(logouts, 1);
}

// ============================================================================
// Pass-through
// ============================================================================

#[tokio::test]
async fn server_errors_are_not_intercepted() {
    let client = ApiClient::new(FakeBackend::new("R1"), stale_store());

    let err = client.send(ApiRequest::get("/boom")).await.unwrap_err();

    assert!(matches!(err, Error::Protocol(_)));
    assert_eq!(err.status(), Some(500));
    assert_eq!(client.transport().refresh_calls(), 0);
}

#[tokio::test]
async fn transport_errors_are_not_intercepted() {
    let client = ApiClient::new(FakeBackend::new("R1"), stale_store());

    let err = client.send(ApiRequest::get("/offline")).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(client.transport().refresh_calls(), 0);
}

#[tokio::test]
async fn failed_sign_in_does_not_refresh() {
    let store = stale_store();
    let client = ApiClient::new(FakeBackend::new("R1"), store.clone());

    let credentials = instantgram::LoginCredentials::new("alice", "wrong");
    let err = client.auth().sign_in(&credentials).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(client.transport().refresh_calls(), 0);
    assert_eq!(
        stored_pair(store.as_ref()),
        (Some("A1".to_string()), Some("R1".to_string()))
    );
}

#[tokio::test]
async fn refresh_without_a_pending_request() {
    let store = stale_store();
    let client = ApiClient::new(FakeBackend::new("R1"), store.clone());

    let pair = client.refresh().await.unwrap();

    assert_eq!(pair.access_token, AccessToken::new("A2"));
    assert_eq!(pair.refresh_token, RefreshToken::new("R2"));
    assert_eq!(client.transport().refresh_calls(), 1);
}

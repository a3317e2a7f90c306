//! CLI tests against a mock backend.
//!
//! Each test runs the binary with an isolated token file and points it at a
//! wiremock server.

use std::path::{Path, PathBuf};
use std::process::Output;

use instantgram::auth::{StoredTokens, TokenStore};
use instantgram::{FileTokenStore, TokenPair};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI binary against `server` with the given token file.
async fn run_cli(args: &[&str], server: &MockServer, token_file: &Path) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_instantgram"))
        .args(args)
        .env("INSTANTGRAM_API_URL", server.uri())
        .env("INSTANTGRAM_TOKEN_FILE", token_file)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn token_file(dir: &TempDir) -> PathBuf {
    dir.path().join("tokens.json")
}

fn seed_tokens(path: &Path, access: &str, refresh: &str) {
    FileTokenStore::new(path)
        .save(&TokenPair::new(access, refresh))
        .unwrap();
}

fn stored_tokens(path: &Path) -> StoredTokens {
    FileTokenStore::new(path).load().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_writes_token_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_file(&dir);

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/sign-in"))
        .and(body_json(json!({"username": "alice", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u1", "username": "alice"},
            "accessToken": "A1",
            "refreshToken": "R1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(
        &["auth", "login", "--username", "alice", "--password", "x"],
        &server,
        &tokens,
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Logged in successfully"));
    assert_eq!(
        stored_tokens(&tokens),
        StoredTokens::from(TokenPair::new("A1", "R1"))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_whoami_refreshes_expired_token() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_file(&dir);
    seed_tokens(&tokens, "A1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/info"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A2",
            "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/info"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "username": "alice",
            "email": "alice@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(&["auth", "whoami"], &server, &tokens).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("alice@example.com"));
    assert_eq!(
        stored_tokens(&tokens),
        StoredTokens::from(TokenPair::new("A2", "R2"))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rejected_refresh_asks_for_login() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_file(&dir);
    seed_tokens(&tokens, "A1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/feed"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(&["posts", "feed"], &server, &tokens).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("instantgram auth login"));
    assert!(!tokens.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_feed_without_session_fails_fast() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let output = run_cli(&["posts", "feed"], &server, &token_file(&dir)).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No active session"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_feed_prints_posts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_file(&dir);
    seed_tokens(&tokens, "A1", "R1");

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/feed"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalElements": 11,
            "totalPages": 2,
            "currentPage": 1,
            "pageSize": 10,
            "content": [{
                "id": "p11",
                "text": "sunset at the pier",
                "author": "bob",
                "authorId": "u2",
                "numberOfLikes": 3,
                "numberOfComments": 1,
                "createdAt": "2024-05-01T10:00:00Z",
                "files": []
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/images/parent/many"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalElements": 0,
            "totalPages": 0,
            "currentPage": 0,
            "pageSize": 100,
            "content": []
        })))
        .mount(&server)
        .await;

    let output = run_cli(&["posts", "feed", "--page", "1"], &server, &tokens).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("bob"));
    assert!(out.contains("sunset at the pier"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_logout_removes_token_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_file(&dir);
    seed_tokens(&tokens, "A1", "R1");

    let output = run_cli(&["auth", "logout"], &server, &tokens).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!tokens.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_send_message() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_file(&dir);
    seed_tokens(&tokens, "A1", "R1");

    Mock::given(method("POST"))
        .and(path("/api/v1/messages"))
        .and(header("Authorization", "Bearer A1"))
        .and(body_json(json!({"chatId": "chat1", "content": "see you there"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m9",
            "content": "see you there",
            "senderId": "u1",
            "senderName": "alice",
            "chatId": "chat1",
            "createdAt": "2024-05-01T10:00:00Z",
            "isRead": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(
        &["messages", "send", "chat1", "see you there"],
        &server,
        &tokens,
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("m9"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_validate_invalid_token_removes_token_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_file(&dir);
    seed_tokens(&tokens, "A1", "R1");

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/validate"))
        .and(query_param("token", "A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": false})))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(&["auth", "validate"], &server, &tokens).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not valid"));
    assert!(!tokens.exists());
}

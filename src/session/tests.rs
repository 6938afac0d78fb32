use super::*;
use crate::request::{HttpMethod, MockHttpClient};
use crate::store::MemoryCredentialStore;
use serde_json::json;
use std::rc::Rc;
use std::sync::Mutex;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://portal.test/api";

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

type TestManager = SessionManager<Rc<MockHttpClient>, MemoryCredentialStore>;

fn setup(store: MemoryCredentialStore) -> (TestManager, Rc<MockHttpClient>) {
    let client = Rc::new(MockHttpClient::new());
    let manager = SessionManager::new(ApiConfig::new(BASE, false), Rc::clone(&client), store);
    (manager, client)
}

fn mock_login_ok(client: &MockHttpClient) {
    client.mock_response(
        &url("/login/"),
        200,
        json!({ "detail": "Login successful.", "username": "jdoe", "token": "abc123" }),
    );
}

// =========================================================
// initialize
// =========================================================

#[tokio::test]
async fn test_initialize_without_token_skips_network() {
    let (manager, client) = setup(MemoryCredentialStore::new());
    assert!(manager.is_loading());

    manager.initialize().await;

    let session = manager.session();
    assert!(!session.is_loading);
    assert!(!session.is_authenticated);
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_initialize_with_valid_token() {
    let store = MemoryCredentialStore::with_token("abc123");
    let (manager, client) = setup(store);
    client.mock_response(&url("/detector/"), 200, json!([]));

    manager.initialize().await;

    assert!(manager.is_authenticated());
    assert!(!manager.is_loading());
    let check = client.last_request().unwrap();
    assert_eq!(check.method, HttpMethod::Get);
    assert_eq!(
        check.headers.get("Authorization").map(String::as_str),
        Some("Token abc123")
    );
}

#[tokio::test]
async fn test_initialize_with_rejected_token_clears_store() {
    let store = MemoryCredentialStore::with_token("expired");
    let (manager, client) = setup(store.clone());
    client.mock_response(
        &url("/detector/"),
        401,
        json!({ "detail": "Invalid token." }),
    );

    manager.initialize().await;

    assert!(!manager.is_authenticated());
    assert!(!manager.is_loading());
    assert!(manager.auth_header().is_empty());
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn test_initialize_network_failure_is_unauthenticated() {
    let store = MemoryCredentialStore::with_token("abc123");
    let (manager, client) = setup(store.clone());
    client.mock_network_error(&url("/detector/"));

    manager.initialize().await;

    assert!(!manager.is_authenticated());
    assert!(!manager.is_loading());
    // 网络失败不代表令牌失效，保留以便下次启动重试
    assert_eq!(store.load().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_initialize_resolves_exactly_once() {
    let store = MemoryCredentialStore::with_token("abc123");
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&transitions);

    let client = Rc::new(MockHttpClient::new());
    client.mock_response(&url("/detector/"), 200, json!([]));
    let manager = SessionManager::new(ApiConfig::new(BASE, false), Rc::clone(&client), store)
        .with_observer(move |s| recorded.lock().unwrap().push(s.is_loading));

    manager.initialize().await;
    manager.initialize().await;

    assert_eq!(client.request_count(), 1);
    assert_eq!(*transitions.lock().unwrap(), vec![false]);
}

// =========================================================
// login / logout
// =========================================================

#[tokio::test]
async fn test_login_success_sets_credential() {
    let store = MemoryCredentialStore::new();
    let (manager, client) = setup(store.clone());
    manager.initialize().await;
    mock_login_ok(&client);

    assert!(manager.auth_header().is_empty());
    manager.login("jdoe", "Secret123!").await.unwrap();

    assert!(manager.is_authenticated());
    assert_eq!(manager.auth_header().value(), Some("Token abc123"));
    assert_eq!(store.load().as_deref(), Some("abc123"));

    let req = client.last_request().unwrap();
    assert_eq!(req.url, url("/login/"));
    assert!(!req.headers.contains_key("Authorization"));
    let body: serde_json::Value =
        serde_json::from_str(req.body.as_ref().and_then(|b| b.as_json()).unwrap()).unwrap();
    assert_eq!(body, json!({ "username": "jdoe", "password": "Secret123!" }));
}

#[tokio::test]
async fn test_login_failure_uses_detail_and_keeps_state() {
    let (manager, client) = setup(MemoryCredentialStore::new());
    manager.initialize().await;
    client.mock_response(
        &url("/login/"),
        400,
        json!({ "detail": "Invalid credentials" }),
    );

    let err = manager.login("jdoe", "wrong").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!manager.is_authenticated());
    assert!(manager.auth_header().is_empty());
}

#[tokio::test]
async fn test_login_failure_without_detail_uses_status() {
    let (manager, client) = setup(MemoryCredentialStore::new());
    client.mock_raw(&url("/login/"), 502, "Bad Gateway");

    let err = manager.login("jdoe", "Secret123!").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 502");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let (manager, client) = setup(MemoryCredentialStore::new());

    let err = manager.login("  ", "pw").await.unwrap_err();
    assert!(matches!(err, PortalError::Validation(_)));
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_login_without_token_is_error() {
    let (manager, client) = setup(MemoryCredentialStore::new());
    client.mock_response(&url("/login/"), 200, json!({ "detail": "Login successful." }));

    let err = manager.login("jdoe", "Secret123!").await.unwrap_err();
    assert!(matches!(err, PortalError::Decode(_)));
    assert!(!manager.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_state_even_when_network_fails() {
    let store = MemoryCredentialStore::new();
    let (manager, client) = setup(store.clone());
    manager.initialize().await;
    mock_login_ok(&client);
    manager.login("jdoe", "Secret123!").await.unwrap();

    client.mock_network_error(&url("/logout/"));
    manager.logout().await;

    assert!(!manager.is_authenticated());
    assert!(manager.auth_header().is_empty());
    assert_eq!(store.load(), None);

    let req = client.last_request().unwrap();
    assert_eq!(req.url, url("/logout/"));
    assert_eq!(
        req.headers.get("Authorization").map(String::as_str),
        Some("Token abc123")
    );
}

#[tokio::test]
async fn test_logout_before_initialize_keeps_loading() {
    let store = MemoryCredentialStore::with_token("abc123");
    let (manager, client) = setup(store.clone());

    manager.logout().await;

    assert!(manager.is_loading());
    assert!(!manager.is_authenticated());
    assert_eq!(store.load(), None);
    assert_eq!(client.request_count(), 0);

    // 令牌已清除，恢复会话时不再探测
    manager.initialize().await;
    assert!(!manager.is_loading());
    assert!(!manager.is_authenticated());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_observer_sees_every_transition() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);
    let client = Rc::new(MockHttpClient::new());
    mock_login_ok(&client);
    client.mock_response(&url("/logout/"), 200, json!({ "detail": "Logged out." }));

    let manager = SessionManager::new(
        ApiConfig::new(BASE, false),
        Rc::clone(&client),
        MemoryCredentialStore::new(),
    )
    .with_observer(move |s| recorded.lock().unwrap().push(s.is_authenticated));

    manager.initialize().await;
    manager.login("jdoe", "Secret123!").await.unwrap();
    manager.logout().await;

    assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
}

// =========================================================
// signup
// =========================================================

fn signup_request() -> SignupRequest {
    SignupRequest {
        username: "jdoe".into(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jdoe@example.com".into(),
        password: "Secret123!".into(),
        password_confirm: "Secret123!".into(),
    }
}

#[tokio::test]
async fn test_signup_never_authenticates() {
    let (manager, client) = setup(MemoryCredentialStore::new());
    manager.initialize().await;
    client.mock_response(
        &url("/signup/"),
        201,
        json!({ "detail": "Account created successfully. Awaiting admin approval.", "username": "jdoe" }),
    );

    let resp = manager.signup(&signup_request()).await.unwrap();

    assert_eq!(resp.username.as_deref(), Some("jdoe"));
    assert!(!manager.is_authenticated());
    assert!(manager.auth_header().is_empty());
}

#[tokio::test]
async fn test_signup_server_error_detail() {
    let (manager, client) = setup(MemoryCredentialStore::new());
    client.mock_response(
        &url("/signup/"),
        400,
        json!({ "detail": "Username already exists." }),
    );

    let err = manager.signup(&signup_request()).await.unwrap_err();
    assert_eq!(err.to_string(), "Username already exists.");
}

#[tokio::test]
async fn test_signup_mismatch_rejected_locally() {
    let (manager, client) = setup(MemoryCredentialStore::new());
    let mut req = signup_request();
    req.password_confirm = "Different1!".into();

    let err = manager.signup(&req).await.unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match.");
    assert_eq!(client.request_count(), 0);
}

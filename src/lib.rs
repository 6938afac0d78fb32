//! DOSPORTAL 客户端核心库
//!
//! 与平台无关的业务层，浏览器端 (`frontend`) 只负责把这些能力接到 DOM 上：
//! - `config`: 构建期配置（API 地址、版本信息）
//! - `request` / `api`: HTTP 抽象与 API 调用约定
//! - `session` / `store`: 会话管理与凭据持久化
//! - `route` / `guard`: 路由表与路由守卫
//! - `fetch` / `poll`: 页面数据加载状态、过期请求丢弃、轮询策略
//! - `forms` / `table`: 表单校验与可排序表格

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod guard;
pub mod poll;
pub mod request;
pub mod route;
pub mod session;
pub mod store;
pub mod table;

pub use api::PortalApi;
pub use config::{ApiConfig, BuildInfo};
pub use error::{PortalError, PortalResult};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use route::AppRoute;
pub use session::{AuthHeader, Session, SessionManager};
pub use store::CredentialStore;

pub use dosportal_shared as shared;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchState;
    use crate::forms::{LogbookDraft, SignupForm};
    use crate::guard::{GuardDecision, evaluate};
    use crate::request::ReqwestHttpClient;
    use crate::store::MemoryCredentialStore;
    use dosportal_shared::EntryType;
    use dosportal_shared::protocol::{CreateLogbookEntryRequest, ListDetectorsRequest};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use uuid::Uuid;

    // =========================================================
    // 本地桩服务
    // =========================================================

    type Routes = Arc<Mutex<HashMap<(String, String), (u16, String)>>>;

    #[derive(Debug, Clone)]
    struct SeenRequest {
        method: String,
        target: String,
        headers: HashMap<String, String>,
        body: String,
    }

    struct StubServer {
        api_base: String,
        routes: Routes,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    impl StubServer {
        async fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let routes: Routes = Arc::default();
            let seen = Arc::new(Mutex::new(Vec::new()));

            let (accept_routes, accept_seen) = (Arc::clone(&routes), Arc::clone(&seen));
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let (routes, seen) = (Arc::clone(&accept_routes), Arc::clone(&accept_seen));
                    tokio::spawn(async move { serve(stream, routes, seen).await });
                }
            });

            Self {
                api_base: format!("http://{}/api", addr),
                routes,
                seen,
            }
        }

        fn route(&self, method: &str, path: &str, status: u16, body: Value) {
            self.routes.lock().unwrap().insert(
                (method.to_string(), format!("/api{}", path)),
                (status, body.to_string()),
            );
        }

        fn last(&self, method: &str, path: &str) -> Option<SeenRequest> {
            let target = format!("/api{}", path);
            self.seen
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|r| r.method == method && r.target == target)
                .cloned()
        }

        fn manager(&self) -> SessionManager<ReqwestHttpClient, MemoryCredentialStore> {
            self.manager_with(MemoryCredentialStore::new())
        }

        fn manager_with(
            &self,
            store: MemoryCredentialStore,
        ) -> SessionManager<ReqwestHttpClient, MemoryCredentialStore> {
            SessionManager::new(
                ApiConfig::new(&self.api_base, false),
                ReqwestHttpClient::new(),
                store,
            )
        }
    }

    async fn serve(mut stream: TcpStream, routes: Routes, seen: Arc<Mutex<Vec<SeenRequest>>>) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.lines();
        let mut request_line = lines.next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let target = request_line.next().unwrap_or_default().to_string();
        let headers: HashMap<String, String> = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let length = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + length {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

        let (status, payload) = routes
            .lock()
            .unwrap()
            .get(&(method.clone(), target.clone()))
            .cloned()
            .unwrap_or((404, json!({ "detail": "Not found." }).to_string()));
        seen.lock().unwrap().push(SeenRequest {
            method,
            target,
            headers,
            body,
        });

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            payload.len(),
            payload
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }

    // =========================================================
    // 端到端场景
    // =========================================================

    #[tokio::test]
    async fn test_unauthenticated_session_is_redirected_to_login() {
        let server = StubServer::start().await;
        let manager = server.manager();
        let route = AppRoute::Measurements;

        assert_eq!(evaluate(&manager.session(), &route), GuardDecision::Pending);
        manager.initialize().await;

        assert_eq!(
            evaluate(&manager.session(), &route),
            GuardDecision::Redirect(AppRoute::Login {
                next: Some("/measurements".into())
            })
        );
        assert_eq!(evaluate(&manager.session(), &AppRoute::Home), GuardDecision::Render);
    }

    #[tokio::test]
    async fn test_stored_token_is_verified_on_startup() {
        let server = StubServer::start().await;
        server.route("GET", "/detector/", 200, json!([]));
        let manager = server.manager_with(MemoryCredentialStore::with_token("abc123"));

        manager.initialize().await;

        assert!(manager.is_authenticated());
        assert_eq!(
            evaluate(&manager.session(), &AppRoute::Logbooks),
            GuardDecision::Render
        );
        let check = server.last("GET", "/detector/").unwrap();
        assert_eq!(
            check.headers.get("authorization").map(String::as_str),
            Some("Token abc123")
        );
    }

    #[tokio::test]
    async fn test_login_against_stub() {
        let server = StubServer::start().await;
        server.route(
            "POST",
            "/login/",
            200,
            json!({ "detail": "Login successful.", "username": "jdoe", "token": "abc123" }),
        );
        let manager = server.manager();
        manager.initialize().await;

        manager.login("jdoe", "Secret123!").await.unwrap();

        assert!(manager.is_authenticated());
        assert_eq!(manager.auth_header().value(), Some("Token abc123"));
        let req = server.last("POST", "/login/").unwrap();
        assert_eq!(
            req.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body["username"], "jdoe");

        // 登录后再访问登录页，跳转到 next 指定的页面
        let decision = evaluate(
            &manager.session(),
            &AppRoute::Login {
                next: Some("/logs".into()),
            },
        );
        assert_eq!(decision, GuardDecision::Redirect(AppRoute::Logs));
    }

    #[tokio::test]
    async fn test_invalid_login_against_stub() {
        let server = StubServer::start().await;
        server.route("POST", "/login/", 400, json!({ "detail": "Invalid credentials" }));
        let manager = server.manager();
        manager.initialize().await;

        let err = manager.login("jdoe", "nope").await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!manager.is_authenticated());
        assert!(manager.auth_header().is_empty());
    }

    #[tokio::test]
    async fn test_logout_when_backend_is_unreachable() {
        // 绑定后立即释放端口，连接会被拒绝
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = MemoryCredentialStore::with_token("abc123");
        let manager = SessionManager::new(
            ApiConfig::new(&format!("http://{}/api", addr), false),
            ReqwestHttpClient::new(),
            store.clone(),
        );
        manager.initialize().await;
        assert!(!manager.is_authenticated());
        // 网络失败不清除令牌
        assert_eq!(store.load().as_deref(), Some("abc123"));

        manager.logout().await;
        assert!(!manager.is_authenticated());
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_signup_leads_to_success_page_without_session() {
        let server = StubServer::start().await;
        server.route(
            "POST",
            "/signup/",
            201,
            json!({ "detail": "Account created. Awaiting admin approval.", "username": "jdoe" }),
        );
        let manager = server.manager();
        manager.initialize().await;

        let form = SignupForm {
            username: "jdoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jdoe@example.com".into(),
            password: "Secret123!".into(),
            password_confirm: "Secret123!".into(),
        };
        let req = form.to_request().unwrap();
        manager.signup(&req).await.unwrap();

        assert!(!manager.is_authenticated());
        assert_eq!(
            evaluate(&manager.session(), &AppRoute::SignupSuccess),
            GuardDecision::Render
        );
        let sent: Value = serde_json::from_str(&server.last("POST", "/signup/").unwrap().body).unwrap();
        assert_eq!(sent["password_confirm"], "Secret123!");
        assert_eq!(sent["email"], "jdoe@example.com");
    }

    #[tokio::test]
    async fn test_expired_token_renders_login_required() {
        let server = StubServer::start().await;
        server.route("GET", "/detector/", 401, json!({ "detail": "Invalid token." }));
        let api = PortalApi::new(
            ApiConfig::new(&server.api_base, false),
            ReqwestHttpClient::new(),
            AuthHeader::from_token(Some("expired")),
        );

        let tracker = fetch::RequestTracker::new();
        let state = fetch::load(&tracker, api.call(&ListDetectorsRequest::default()))
            .await
            .unwrap();

        assert_eq!(state, FetchState::LoginRequired);
        assert_eq!(state.error().as_deref(), Some("Login required"));
        assert!(state.data().is_none());
    }

    #[tokio::test]
    async fn test_logbook_entry_round_trip() {
        let server = StubServer::start().await;
        let detector = Uuid::new_v4();
        let entry = Uuid::new_v4();
        server.route("POST", "/logbook/add/", 201, json!({ "id": entry }));

        let draft = LogbookDraft {
            entry_type: EntryType::Note,
            text: "Checked detector".into(),
            public: true,
            ..LogbookDraft::default()
        };
        let api = PortalApi::new(
            ApiConfig::new(&server.api_base, false),
            ReqwestHttpClient::new(),
            AuthHeader::from_token(Some("abc123")),
        );
        let created = api
            .call(&CreateLogbookEntryRequest(draft.to_payload(detector).unwrap()))
            .await
            .unwrap();
        assert_eq!(created.id, Some(entry));

        // 服务端按收到的字段原样保存
        let mut stored: Value =
            serde_json::from_str(&server.last("POST", "/logbook/add/").unwrap().body).unwrap();
        assert_eq!(stored["entry_type"], "note");
        assert_eq!(stored["source"], "web");
        stored["id"] = json!(entry);
        stored["created"] = json!("2024-03-15T14:30:00Z");
        server.route(
            "GET",
            &format!("/logbook/?detector={}", detector),
            200,
            json!([stored]),
        );

        let item = api.find_logbook_entry(detector, entry).await.unwrap();
        assert_eq!(LogbookDraft::from_item(&item), draft);
    }
}

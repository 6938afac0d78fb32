//! 会话管理
//!
//! [`SessionManager`] 是"当前浏览器会话能否调用受保护接口"的唯一来源：
//! - 启动时通过 `initialize` 恢复会话（只解析一次）
//! - `login` / `logout` 是仅有的状态修改入口
//! - 其他模块只读取快照或派生出的认证头
//!
//! 认证方式为令牌：`Authorization: Token <value>`，令牌保存在 [`CredentialStore`] 中。

use crate::api::PortalApi;
use crate::config::ApiConfig;
use crate::error::{PortalError, PortalResult};
use crate::forms::check_signup;
use crate::request::HttpClient;
use crate::store::CredentialStore;
use dosportal_shared::protocol::{
    ApiRequest, ListDetectorsRequest, LoginRequest, LogoutRequest, SignupRequest, SignupResponse,
};
use dosportal_shared::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, TOKEN_SCHEME};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

// =========================================================
// 会话状态
// =========================================================

/// 会话快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    /// 启动探测完成前为 true
    pub is_loading: bool,
    pub credential: Option<String>,
}

impl Session {
    /// 应用启动时的初始状态
    pub fn loading() -> Self {
        Self {
            is_authenticated: false,
            is_loading: true,
            credential: None,
        }
    }

    pub fn auth_header(&self) -> AuthHeader {
        AuthHeader::from_token(self.credential.as_deref())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

/// 由凭据派生的认证头，无凭据时为空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthHeader(Option<String>);

impl AuthHeader {
    pub fn from_token(token: Option<&str>) -> Self {
        Self(
            token
                .filter(|t| !t.is_empty())
                .map(|t| format!("{} {}", TOKEN_SCHEME, t)),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// `Authorization` 头的值
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// 以键值对形式输出，便于合并到其他请求头
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|v| (HEADER_AUTHORIZATION.to_string(), v.clone()))
            .collect()
    }
}

// =========================================================
// 会话管理器
// =========================================================

type Observer = Arc<dyn Fn(&Session) + Send + Sync>;

pub struct SessionManager<C, S> {
    config: ApiConfig,
    client: C,
    store: S,
    state: Arc<RwLock<Session>>,
    initialized: Arc<AtomicBool>,
    on_change: Option<Observer>,
}

impl<C: Clone, S: Clone> Clone for SessionManager<C, S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            client: self.client.clone(),
            store: self.store.clone(),
            state: Arc::clone(&self.state),
            initialized: Arc::clone(&self.initialized),
            on_change: self.on_change.clone(),
        }
    }
}

impl<C, S> SessionManager<C, S>
where
    C: HttpClient + Clone,
    S: CredentialStore,
{
    pub fn new(config: ApiConfig, client: C, store: S) -> Self {
        Self {
            config,
            client,
            store,
            state: Arc::new(RwLock::new(Session::loading())),
            initialized: Arc::new(AtomicBool::new(false)),
            on_change: None,
        }
    }

    /// 注册状态变化的观察者（UI 层用它同步响应式信号）
    pub fn with_observer(mut self, observer: impl Fn(&Session) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// 当前状态的快照
    pub fn session(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.session().is_loading
    }

    pub fn auth_header(&self) -> AuthHeader {
        self.session().auth_header()
    }

    /// 绑定当前认证头的 API 客户端
    pub fn api(&self) -> PortalApi<C> {
        PortalApi::new(self.config.clone(), self.client.clone(), self.auth_header())
    }

    fn update(&self, f: impl FnOnce(&mut Session)) {
        let snapshot = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut state);
            state.clone()
        };
        if let Some(observer) = &self.on_change {
            observer(&snapshot);
        }
    }

    /// 恢复会话
    ///
    /// 没有保存的令牌时直接判定为未认证，不发请求；否则用令牌请求 `GET /detector/`，
    /// 2xx 即已认证。401/403 说明令牌失效，会从存储中删除；网络失败只判定为未认证。
    /// 无论结果如何 `is_loading` 都会变为 false，重复调用不做任何事。
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }

        let Some(token) = self.store.load().filter(|t| !t.is_empty()) else {
            log::info!("[Session] No stored credential");
            self.update(|s| s.is_loading = false);
            return;
        };

        let api = PortalApi::new(
            self.config.clone(),
            self.client.clone(),
            AuthHeader::from_token(Some(&token)),
        );
        let authenticated = match api.call(&ListDetectorsRequest::default()).await {
            Ok(_) => true,
            Err(e) if e.is_auth_required() => {
                log::info!("[Session] Stored credential rejected: {}", e);
                if self.store.load().as_deref() == Some(token.as_str()) {
                    self.store.clear();
                }
                false
            }
            Err(e) => {
                log::warn!("[Session] Session check failed: {}", e);
                false
            }
        };

        // 探测期间用户可能已经登录或登出，只有令牌未变时才采用探测结果
        let still_stored = self.store.load().as_deref() == Some(token.as_str());
        self.update(|s| {
            s.is_loading = false;
            if authenticated && still_stored && s.credential.is_none() {
                s.credential = Some(token.clone());
                s.is_authenticated = true;
            }
        });
        log::info!("[Session] Resolved, authenticated = {}", self.is_authenticated());
    }

    /// 登录，成功后保存令牌
    ///
    /// 失败时状态不变，错误消息来自响应体的 `detail`。
    pub async fn login(&self, username: &str, password: &str) -> PortalResult<()> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(PortalError::validation(
                "Username and password are required.",
            ));
        }

        let api = PortalApi::new(self.config.clone(), self.client.clone(), AuthHeader::default());
        let resp = api
            .call(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        let token = resp
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PortalError::Decode("login response has no token".into()))?;

        self.store.save(&token);
        self.update(|s| {
            s.credential = Some(token);
            s.is_authenticated = true;
        });
        log::info!("[Session] Logged in as {}", username);
        Ok(())
    }

    /// 注册新账号
    ///
    /// 注册后需要管理员审批，所以永远不会改变认证状态。
    pub async fn signup(&self, req: &SignupRequest) -> PortalResult<SignupResponse> {
        check_signup(req)?;
        let api = PortalApi::new(self.config.clone(), self.client.clone(), AuthHeader::default());
        api.call(req).await
    }

    /// 登出
    ///
    /// 服务端调用只是尽力而为，本地状态与保存的令牌总会被清除。
    /// `is_loading` 只由 `initialize` 结束。
    pub async fn logout(&self) {
        let header = self.auth_header();
        if !header.is_empty() {
            let api = PortalApi::new(self.config.clone(), self.client.clone(), header);
            let req = api
                .prepare(LogoutRequest::METHOD, &LogoutRequest::default().path())
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_json("{}".to_string());
            if let Err(e) = api.send(req).await {
                log::warn!("[Session] Logout request failed: {}", e);
            }
        }

        self.store.clear();
        self.update(|s| {
            s.credential = None;
            s.is_authenticated = false;
        });
        log::info!("[Session] Logged out");
    }
}

#[cfg(test)]
mod tests;

//! 认证模块
//!
//! 会话状态只由 [`SessionManager`] 修改；这里把它的快照同步到一个响应式信号，
//! 路由服务和页面通过 Context 读取同一份状态。

use crate::web::{BrowserStore, FetchClient};
use dosportal::api::PortalApi;
use dosportal::config::ApiConfig;
use dosportal::error::PortalResult;
use dosportal::session::{Session, SessionManager};
use dosportal::shared::protocol::{SignupRequest, SignupResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;

pub type Manager = SessionManager<FetchClient, BrowserStore>;
pub type Api = PortalApi<FetchClient>;

/// 认证上下文
///
/// 在应用根部创建一次，通过 Context 在组件间共享。
#[derive(Clone)]
pub struct AuthContext {
    manager: Manager,
    /// 会话快照（只读使用，写入只来自管理器的观察者）
    session: RwSignal<Session>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new(config: ApiConfig) -> Self {
        let session = RwSignal::new(Session::loading());
        let manager = SessionManager::new(config, FetchClient, BrowserStore)
            .with_observer(move |s| session.set(s.clone()));
        Self { manager, session }
    }

    pub fn session(&self) -> Signal<Session> {
        self.session.into()
    }

    /// 绑定当前凭据的 API 客户端
    pub fn api(&self) -> Api {
        self.manager.api()
    }

    pub fn config(&self) -> &ApiConfig {
        self.manager.config()
    }

    pub async fn login(&self, username: &str, password: &str) -> PortalResult<()> {
        self.manager.login(username, password).await
    }

    pub async fn signup(&self, req: &SignupRequest) -> PortalResult<SignupResponse> {
        self.manager.signup(req).await
    }

    /// 注销并清除状态
    ///
    /// 导航由路由服务监听认证状态变化后自动处理。
    pub fn logout(&self) {
        let manager = self.manager.clone();
        spawn_local(async move { manager.logout().await });
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 在后台探测保存的令牌，完成前 `is_loading` 保持为 true。
pub fn init_auth(ctx: &AuthContext) {
    let manager = ctx.manager.clone();
    spawn_local(async move { manager.initialize().await });
}

//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 守卫判断交给核心库的 [`guard::evaluate`]，这里只负责执行它的决定：
//! 导航、浏览器前进后退以及会话变化都会触发重新评估。

use dosportal::guard::{self, GuardDecision};
use dosportal::route::AppRoute;
use dosportal::session::Session;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器地址 (path, query)，query 不带 `?`
fn current_location() -> (String, String) {
    let location = web_sys::window().map(|w| w.location());
    let path = location
        .as_ref()
        .and_then(|l| l.pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    let query = location
        .and_then(|l| l.search().ok())
        .map(|s| s.trim_start_matches('?').to_string())
        .unwrap_or_default();
    (path, query)
}

/// 解析地址；未知路径改写为首页地址
fn resolve(path: &str, query: &str) -> AppRoute {
    match AppRoute::parse(path, query) {
        Some(route) => route,
        None => {
            log::info!("[Router] Unknown path {}, redirecting home", path);
            let fallback = AppRoute::not_found_redirect();
            replace_history_state(&fallback.to_path());
            fallback
        }
    }
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话信号由外部注入，与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前请求的路由
    route: RwSignal<AppRoute>,
    /// 会话快照（注入的信号）
    session: Signal<Session>,
}

impl RouterService {
    fn new(session: Signal<Session>) -> Self {
        let (path, query) = current_location();
        Self {
            route: RwSignal::new(resolve(&path, &query)),
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> Signal<AppRoute> {
        self.route.into()
    }

    /// 当前路由的守卫结论（响应式）
    pub fn decision(&self) -> Signal<GuardDecision> {
        let (route, session) = (self.route, self.session);
        Signal::derive(move || session.with(|s| route.with(|r| guard::evaluate(s, r))))
    }

    /// 导航到指定路由（pushState），守卫在 Effect 中执行
    pub fn navigate_to(&self, route: AppRoute) {
        push_history_state(&route.to_path());
        self.route.set(route);
    }

    /// 重定向（replaceState）
    fn redirect(&self, route: AppRoute) {
        replace_history_state(&route.to_path());
        self.route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let route = self.route;

        let closure = Closure::<dyn Fn()>::new(move || {
            let (path, query) = current_location();
            route.set(resolve(&path, &query));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 路由或会话变化时执行守卫的重定向
    fn setup_guard(&self) {
        let router = *self;
        let decision = self.decision();

        Effect::new(move |_| {
            if let GuardDecision::Redirect(target) = decision.get() {
                log::info!(
                    "[Router] {} -> {}",
                    router.route.get_untracked(),
                    target
                );
                router.redirect(target);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>) -> RouterService {
    let router = RouterService::new(session);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_guard();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 只在守卫放行时渲染匹配的页面，会话解析前与重定向途中显示加载指示。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let decision = router.decision();
    let route = router.current_route();
    let allowed = Memo::new(move |_| decision.get() == GuardDecision::Render);

    move || {
        if allowed.get() {
            matcher(route.get())
        } else {
            view! {
                <div class="flex items-center justify-center min-h-[50vh]">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any()
        }
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}

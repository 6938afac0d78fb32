//! 路由守卫
//!
//! 根据会话快照决定某个路由是渲染、暂不渲染还是重定向。
//! 路由器在启动、导航、浏览器前进后退以及会话变化时都会重新评估。

use crate::route::AppRoute;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 会话尚未解析，什么都不渲染
    Pending,
    Render,
    /// 以 replace 方式跳转到目标路由
    Redirect(AppRoute),
}

/// 评估路由
///
/// - 公开页面始终渲染
/// - 受保护页面：加载中不渲染，未认证跳转登录页（带返回路径）
/// - 登录/注册页：加载中不渲染，已认证跳转到 `next` 或首页
pub fn evaluate(session: &Session, route: &AppRoute) -> GuardDecision {
    let depends_on_auth = route.requires_auth() || route.should_redirect_when_authenticated();
    if !depends_on_auth {
        return GuardDecision::Render;
    }
    if session.is_loading {
        return GuardDecision::Pending;
    }

    if route.requires_auth() && !session.is_authenticated {
        return GuardDecision::Redirect(route.auth_failure_redirect());
    }

    if route.should_redirect_when_authenticated() && session.is_authenticated {
        let next = match route {
            AppRoute::Login { next } => next.as_deref(),
            _ => None,
        };
        return GuardDecision::Redirect(AppRoute::auth_success_redirect(next));
    }

    GuardDecision::Render
}

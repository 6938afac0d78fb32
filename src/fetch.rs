//! 页面数据加载
//!
//! 所有页面共用 [`FetchState`] 表示 `{data, loading, error}`，
//! 并通过 [`RequestTracker`] 丢弃已被新请求取代的过期响应。

use crate::error::PortalResult;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Login required";

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Ready(T),
    /// 401/403，不保留任何部分数据
    LoginRequired,
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Loading
    }
}

impl<T> FetchState<T> {
    pub fn from_result(result: PortalResult<T>) -> Self {
        match result {
            Ok(data) => FetchState::Ready(data),
            Err(e) if e.is_auth_required() => FetchState::LoginRequired,
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<String> {
        match self {
            FetchState::LoginRequired => Some(LOGIN_REQUIRED_MESSAGE.to_string()),
            FetchState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchState<U> {
        match self {
            FetchState::Loading => FetchState::Loading,
            FetchState::Ready(data) => FetchState::Ready(f(data)),
            FetchState::LoginRequired => FetchState::LoginRequired,
            FetchState::Failed(message) => FetchState::Failed(message),
        }
    }
}

// =========================================================
// 过期请求追踪
// =========================================================

/// 请求代数计数器
///
/// 每次发起加载都领取一张新票据，之前的票据随即失效。
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            generation: Arc::clone(&self.generation),
            issued,
        }
    }

    /// 使所有未完成的票据失效（页面卸载时调用）
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }
}

/// 执行一次加载，结果过期时返回 `None`
pub async fn load<T, F>(tracker: &RequestTracker, fut: F) -> Option<FetchState<T>>
where
    F: Future<Output = PortalResult<T>>,
{
    let ticket = tracker.begin();
    let result = fut.await;
    if ticket.is_current() {
        Some(FetchState::from_result(result))
    } else {
        log::debug!("[Fetch] Discarding superseded response");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortalError;

    #[test]
    fn test_auth_errors_become_login_required() {
        let state: FetchState<Vec<u32>> = FetchState::from_result(Err(PortalError::Http {
            status: 401,
            message: "Invalid token.".into(),
        }));
        assert_eq!(state, FetchState::LoginRequired);
        assert_eq!(state.error().as_deref(), Some("Login required"));
        assert!(state.data().is_none());
    }

    #[test]
    fn test_other_errors_keep_message() {
        let state: FetchState<()> = FetchState::from_result(Err(PortalError::Http {
            status: 500,
            message: "HTTP 500".into(),
        }));
        assert_eq!(state.error().as_deref(), Some("HTTP 500"));
    }

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!first.is_current());
        assert!(second.is_current());

        tracker.invalidate();
        assert!(!second.is_current());
    }

    #[tokio::test]
    async fn test_superseded_load_is_discarded() {
        let tracker = RequestTracker::new();
        let slow_tracker = tracker.clone();

        let stale = load(&slow_tracker, async {
            // 在第一个请求完成前发起第二个请求
            let fresh = load(&tracker, async { Ok::<_, PortalError>(2) }).await;
            assert_eq!(fresh, Some(FetchState::Ready(2)));
            Ok::<_, PortalError>(1)
        })
        .await;

        assert_eq!(stale, None);
    }
}

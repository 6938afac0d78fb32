//! 页面数据加载 hook
//!
//! 所有页面都通过 [`use_fetch`] 获取数据：依赖变化或手动 `reload` 时重新请求，
//! 过期的响应由 [`RequestTracker`] 丢弃，页面卸载后返回的结果也会被丢弃。

use crate::auth::{Api, use_auth};
use dosportal::error::PortalResult;
use dosportal::fetch::{self, FetchState, RequestTracker};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

/// 一次页面加载的句柄
pub struct Fetched<T: Send + Sync + 'static> {
    state: RwSignal<FetchState<T>>,
    version: RwSignal<u32>,
}

impl<T: Send + Sync + 'static> Clone for Fetched<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for Fetched<T> {}

impl<T: Clone + Send + Sync + 'static> Fetched<T> {
    pub fn get(&self) -> FetchState<T> {
        self.state.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&FetchState<T>) -> R) -> R {
        self.state.with(f)
    }

    /// 已加载的数据
    pub fn data(&self) -> Option<T> {
        self.state.with(|s| s.data().cloned())
    }

    /// 重新请求（保存成功后刷新快照）
    pub fn reload(&self) {
        self.version.update(|v| *v = v.wrapping_add(1));
    }
}

/// 依赖 `key` 加载数据
///
/// `key` 在响应式上下文中求值，其中读取的信号变化时自动重新加载。
pub fn use_fetch<T, K, F, Fut>(key: impl Fn() -> K + 'static, fetcher: F) -> Fetched<T>
where
    T: Send + Sync + 'static,
    K: 'static,
    F: Fn(Api, K) -> Fut + 'static,
    Fut: Future<Output = PortalResult<T>> + 'static,
{
    let auth = use_auth();
    let state = RwSignal::new(FetchState::Loading);
    let version = RwSignal::new(0u32);
    let tracker = RequestTracker::new();

    Effect::new({
        let tracker = tracker.clone();
        move |_| {
            version.track();
            let request = fetcher(auth.api(), key());
            let tracker = tracker.clone();
            state.set(FetchState::Loading);
            spawn_local(async move {
                if let Some(next) = fetch::load(&tracker, request).await {
                    state.set(next);
                }
            });
        }
    });

    on_cleanup(move || tracker.invalidate());

    Fetched { state, version }
}

/// 不依赖任何参数的加载
pub fn use_fetch_once<T, F, Fut>(fetcher: F) -> Fetched<T>
where
    T: Send + Sync + 'static,
    F: Fn(Api) -> Fut + 'static,
    Fut: Future<Output = PortalResult<T>> + 'static,
{
    use_fetch(|| (), move |api, ()| fetcher(api))
}

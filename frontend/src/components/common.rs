//! 通用展示组件

use crate::components::icons::AlertCircle;
use dosportal::fetch::FetchState;
use dosportal::shared::date::MISSING;
use leptos::prelude::*;

#[component]
pub fn Loader() -> impl IntoView {
    view! {
        <div class="flex justify-center py-10">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 行内错误提示
#[component]
pub fn ErrorAlert(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div role="alert" class="alert alert-error text-sm py-2">
            <AlertCircle attr:class="h-5 w-5 shrink-0" />
            <span>{message}</span>
        </div>
    }
}

#[component]
pub fn SuccessAlert(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div role="status" class="alert alert-success text-sm py-2">
            <span>{message}</span>
        </div>
    }
}

/// 可选的错误信号，有值时显示错误提示
pub fn error_slot(error: ReadSignal<Option<String>>) -> impl IntoView {
    move || error.get().map(|message| view! { <ErrorAlert message=message /> })
}

/// 按加载状态渲染：加载中、需要登录、失败或数据
///
/// 401/403 只显示 "Login required"，不渲染任何部分数据。
pub fn fetch_view<T>(state: FetchState<T>, render: impl FnOnce(T) -> AnyView) -> AnyView {
    match state {
        FetchState::Loading => view! { <Loader /> }.into_any(),
        FetchState::Ready(data) => render(data),
        other => {
            let message = other.error().unwrap_or_default();
            view! { <ErrorAlert message=message /> }.into_any()
        }
    }
}

/// 缺失值显示为 `N/A`
pub fn or_missing(value: Option<impl ToString>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| MISSING.to_string())
}

/// 页面标题栏
#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(optional, into)] subtitle: Option<String>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="flex flex-wrap items-center justify-between gap-4 mb-6">
            <div>
                <h1 class="text-3xl font-bold">{title}</h1>
                {subtitle.map(|s| view! { <p class="text-base-content/70">{s}</p> })}
            </div>
            <div class="flex gap-2">{children.map(|c| c())}</div>
        </div>
    }
}

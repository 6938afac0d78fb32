//! 处理状态页
//!
//! 状态为 pending/processing 时每隔 [`POLL_INTERVAL`] 重新获取一次，
//! 单次请求失败不会中断轮询，进入终态或页面卸载后停止。

use super::status_badge;
use crate::components::common::{ErrorAlert, PageHeader, fetch_view};
use crate::components::icons::RefreshCw;
use crate::hooks::use_fetch;
use crate::web::router::Link;
use dosportal::fetch::FetchState;
use dosportal::poll::{POLL_INTERVAL, next_poll, should_poll, status_message};
use dosportal::route::AppRoute;
use dosportal::shared::date::format_datetime;
use dosportal::shared::protocol::GetSpectralRecordRequest;
use dosportal::shared::{ProcessingStatus, SpectralRecord};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

#[component]
pub fn SpectralRecordStatusPage(id: Uuid) -> impl IntoView {
    let record = use_fetch(
        move || id,
        |api, id| async move { api.call(&GetSpectralRecordRequest::new(id)).await },
    );
    // 轮询期间保留上一次的结果，避免每次刷新都闪出加载动画
    let latest = RwSignal::new(Option::<SpectralRecord>::None);
    let alive = Arc::new(AtomicBool::new(true));

    Effect::new({
        let alive = alive.clone();
        move |_| {
            let state = record.get();
            let last = latest.with_untracked(|r| r.as_ref().map(|r| r.processing_status));
            let poll = next_poll(last, &state);

            match state {
                FetchState::Ready(current) => {
                    if !poll {
                        log::info!(
                            "Spectral record {} finished: {}",
                            id,
                            current.processing_status.as_str()
                        );
                    }
                    latest.set(Some(current));
                }
                FetchState::Failed(message) if poll => {
                    log::warn!("Spectral record {} poll failed, retrying: {}", id, message);
                }
                _ => {}
            }

            if !poll {
                return;
            }
            let alive = alive.clone();
            spawn_local(async move {
                TimeoutFuture::new(POLL_INTERVAL.as_millis() as u32).await;
                if alive.load(Ordering::Relaxed) {
                    record.reload();
                }
            });
        }
    });

    on_cleanup(move || alive.store(false, Ordering::Relaxed));

    view! {
        <PageHeader title="Processing status" />
        {move || match latest.get() {
            Some(r) => view! { <StatusCard record=r /> }.into_any(),
            None => fetch_view(record.get(), |r| view! { <StatusCard record=r /> }.into_any()),
        }}
        // 已有结果时，后续轮询的失败只作为提示
        {move || {
            latest
                .with(Option::is_some)
                .then(|| record.with(|s| s.error()))
                .flatten()
                .map(|message| view! { <div class="mt-4"><ErrorAlert message=message /></div> })
        }}
    }
}

#[component]
fn StatusCard(record: SpectralRecord) -> impl IntoView {
    let status = record.processing_status;
    let polling = should_poll(status);

    view! {
        <div class="card bg-base-100 shadow max-w-2xl">
            <div class="card-body space-y-3">
                <div class="flex items-center justify-between">
                    <h2 class="card-title">{record.name.clone()}</h2>
                    {status_badge(status)}
                </div>
                <p class="flex items-center gap-2">
                    {polling.then(|| view! { <RefreshCw attr:class="h-4 w-4 animate-spin" /> })}
                    {status_message(status)}
                </p>
                <p class="text-sm text-base-content/70">
                    "Uploaded " {format_datetime(record.created.as_ref())}
                </p>
                <div class="card-actions justify-end">
                    {match status {
                        ProcessingStatus::Completed => view! {
                            <Link to=AppRoute::SpectralRecordDetail { id: record.id } class="btn btn-primary">
                                "View results"
                            </Link>
                        }
                        .into_any(),
                        ProcessingStatus::Failed => view! {
                            <Link to=AppRoute::LogsUpload class="btn btn-outline">"Upload another file"</Link>
                        }
                        .into_any(),
                        _ => view! { <Link to=AppRoute::Logs class="btn btn-ghost">"Back to logs"</Link> }
                            .into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}

//! 探测器与日志本页面

mod detector;
mod entry_form;

pub use detector::DetectorLogbookPage;
pub use entry_form::{LogbookEntryCreatePage, LogbookEntryEditPage};

use crate::components::common::{PageHeader, fetch_view};
use crate::components::icons::Plus;
use crate::hooks::use_fetch_once;
use crate::web::router::Link;
use dosportal::route::AppRoute;
use dosportal::shared::Detector;
use dosportal::shared::date::format_date;
use dosportal::shared::protocol::ListDetectorsRequest;
use leptos::prelude::*;

/// 探测器列表，每个探测器一张卡片
#[component]
pub fn LogbooksPage() -> impl IntoView {
    let detectors = use_fetch_once(|api| async move { api.call(&ListDetectorsRequest::default()).await });

    view! {
        <PageHeader title="Logbooks" subtitle="Select a detector to open its logbook">
            <Link to=AppRoute::DetectorCreate class="btn btn-primary gap-2">
                <Plus attr:class="h-4 w-4" />
                "Add detector"
            </Link>
        </PageHeader>
        {move || fetch_view(detectors.get(), |list| {
            if list.is_empty() {
                return view! {
                    <div class="text-center py-20 bg-base-100 rounded-box shadow">
                        <p class="text-base-content/60">"No detectors yet."</p>
                    </div>
                }
                .into_any();
            }
            view! {
                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                    {list.into_iter().map(|d| view! { <DetectorCard detector=d /> }).collect_view()}
                </div>
            }
            .into_any()
        })}
    }
}

#[component]
fn DetectorCard(detector: Detector) -> impl IntoView {
    let owner = detector
        .owner
        .as_ref()
        .and_then(|o| o.name())
        .map(|name| view! { <p>"Owner: " {name.to_string()}</p> });

    view! {
        <div class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
            <div class="card-body">
                <h2 class="card-title">{detector.name.clone()}</h2>
                <div class="text-sm space-y-1 text-base-content/70">
                    <p>"SN: " {detector.sn.clone()}</p>
                    <p>"Type: " {detector.detector_type.name.clone()}</p>
                    {owner}
                    <p>"Manufactured: " {format_date(detector.manufactured_date.as_ref())}</p>
                </div>
                <div class="card-actions justify-end mt-2">
                    <Link to=AppRoute::DetectorLogbook { detector: detector.id } class="btn btn-sm btn-primary">
                        "Open logbook"
                    </Link>
                </div>
            </div>
        </div>
    }
}

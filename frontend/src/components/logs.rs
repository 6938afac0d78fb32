//! 能谱记录页面

mod detail;
mod status;

pub use detail::SpectralRecordDetailPage;
pub use status::SpectralRecordStatusPage;

use crate::components::common::{PageHeader, fetch_view, or_missing};
use crate::components::icons::Upload;
use crate::components::sortable_table::SortableTable;
use crate::hooks::use_fetch_once;
use crate::web::router::Link;
use dosportal::route::AppRoute;
use dosportal::shared::date::format_short;
use dosportal::shared::protocol::ListSpectralRecordsRequest;
use dosportal::shared::{ProcessingStatus, SpectralRecord};
use dosportal::table::{Column, SortState};
use leptos::prelude::*;

const RECORD_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("created", "Created"),
    Column::sortable("processing_status", "Status"),
    Column::sortable("author", "Author"),
    Column::sortable("artifacts_count", "Artifacts"),
];

/// 状态徽章的样式
pub(crate) fn status_badge(status: ProcessingStatus) -> impl IntoView {
    let class = match status {
        ProcessingStatus::Completed => "badge badge-success",
        ProcessingStatus::Failed => "badge badge-error",
        ProcessingStatus::Processing => "badge badge-info",
        ProcessingStatus::Pending => "badge badge-warning",
        ProcessingStatus::Other => "badge badge-ghost",
    };
    view! { <span class=class>{status.label()}</span> }
}

#[component]
pub fn LogsPage() -> impl IntoView {
    let records =
        use_fetch_once(|api| async move { api.call(&ListSpectralRecordsRequest::default()).await });

    view! {
        <PageHeader title="Logs" subtitle="Uploaded spectrometer logs and their processing status">
            <Link to=AppRoute::LogsUpload class="btn btn-primary gap-2">
                <Upload attr:class="h-4 w-4" />
                "Upload log"
            </Link>
        </PageHeader>
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                {move || fetch_view(records.get(), |list| {
                    view! {
                        <SortableTable
                            columns=RECORD_COLUMNS
                            rows=list
                            initial=SortState::new("created")
                            row=record_row
                            empty="No spectral records yet."
                        />
                    }
                    .into_any()
                })}
            </div>
        </div>
    }
}

fn record_row(record: SpectralRecord) -> AnyView {
    // 处理中的记录链接到状态页，其余链接到详情页
    let target = if record.processing_status.is_terminal() {
        AppRoute::SpectralRecordDetail { id: record.id }
    } else {
        AppRoute::SpectralRecordStatus { id: record.id }
    };
    let author = record.author.as_ref().map(|a| a.display_name());
    view! {
        <tr>
            <td><Link to=target class="link link-primary">{record.name.clone()}</Link></td>
            <td class="whitespace-nowrap">{format_short(record.created.as_ref())}</td>
            <td>{status_badge(record.processing_status)}</td>
            <td>{or_missing(author)}</td>
            <td>{record.artifacts_count}</td>
        </tr>
    }
    .into_any()
}

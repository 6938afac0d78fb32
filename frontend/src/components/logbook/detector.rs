use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, PageHeader, fetch_view, or_missing};
use crate::components::icons::{Download, Pencil, Plus};
use crate::components::sortable_table::SortableTable;
use crate::hooks::use_fetch;
use crate::web::FetchClient;
use crate::web::router::Link;
use dosportal::error::PortalError;
use dosportal::route::AppRoute;
use dosportal::shared::date::{MISSING, format_date, format_short};
use dosportal::shared::protocol::{ListDetectorsRequest, ListLogbookRequest, detector_qr_filename};
use dosportal::shared::{Detector, LogbookItem};
use dosportal::table::{Column, SortState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

const ENTRY_COLUMNS: &[Column] = &[
    Column::sortable("created", "Created"),
    Column::sortable("entry_type", "Type"),
    Column::sortable("text", "Text"),
    Column::sortable("author", "Author"),
    Column::sortable("public", "Public"),
    Column::fixed("actions", ""),
];

#[component]
pub fn DetectorLogbookPage(detector: Uuid) -> impl IntoView {
    // 后端没有单个探测器的读取端点，从列表中查找
    let header = use_fetch(
        move || detector,
        |api, id| async move {
            api.call(&ListDetectorsRequest::default())
                .await?
                .into_iter()
                .find(|d| d.id == id)
                .ok_or_else(|| PortalError::Http {
                    status: 404,
                    message: "Detector not found".into(),
                })
        },
    );
    let entries = use_fetch(
        move || detector,
        |api, detector| async move { api.call(&ListLogbookRequest { detector }).await },
    );

    view! {
        {move || fetch_view(header.get(), |d| view! { <DetectorHeader detector=d /> }.into_any())}
        <div class="card bg-base-100 shadow mt-6">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h2 class="card-title">"Logbook"</h2>
                    <Link to=AppRoute::LogbookEntryCreate { detector } class="btn btn-primary btn-sm gap-2">
                        <Plus attr:class="h-4 w-4" />
                        "New entry"
                    </Link>
                </div>
                {move || fetch_view(entries.get(), move |items| {
                    view! {
                        <SortableTable
                            columns=ENTRY_COLUMNS
                            rows=items
                            initial=SortState::new("created")
                            row=move |item: LogbookItem| entry_row(detector, item)
                            empty="No logbook entries yet."
                        />
                    }
                    .into_any()
                })}
            </div>
        </div>
    }
}

#[component]
fn DetectorHeader(detector: Detector) -> impl IntoView {
    let manufacturer = detector.detector_type.manufacturer.name.clone();
    let owner = detector.owner.as_ref().and_then(|o| o.name()).map(str::to_string);

    let (id, sn) = (detector.id, detector.sn.clone());

    view! {
        <PageHeader title=detector.name.clone() subtitle=format!("Serial number {}", detector.sn)>
            <QrLabelButton detector=id sn=sn />
        </PageHeader>
        <div class="stats stats-vertical md:stats-horizontal shadow bg-base-100 w-full">
            <div class="stat">
                <div class="stat-title">"Type"</div>
                <div class="stat-value text-lg">{detector.detector_type.name.clone()}</div>
                <div class="stat-desc">{manufacturer}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Owner"</div>
                <div class="stat-value text-lg">{or_missing(owner)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Manufactured"</div>
                <div class="stat-value text-lg">{format_date(detector.manufactured_date.as_ref())}</div>
            </div>
        </div>
    }
}

/// 下载带名称与序列号的二维码标签（PNG）
#[component]
fn QrLabelButton(detector: Uuid, sn: String) -> impl IntoView {
    let auth = use_auth();
    let filename = detector_qr_filename(&sn);
    let (downloading, set_downloading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_click = move |_| {
        let req = auth.api().detector_qr_request(detector);
        let filename = filename.clone();
        set_downloading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            let result = FetchClient.download(req, &filename).await;
            set_downloading.set(false);
            if let Err(e) = result {
                log::warn!("QR label download failed: {}", e);
                set_error_msg.set(Some(e.to_string()));
            }
        });
    };

    view! {
        <div class="flex flex-col items-end gap-2">
            <button class="btn btn-outline btn-sm gap-2" on:click=on_click disabled=move || downloading.get()>
                <Download attr:class="h-4 w-4" />
                "QR label"
            </button>
            {move || error_msg.get().map(|message| view! { <ErrorAlert message=message /> })}
        </div>
    }
}

fn entry_row(detector: Uuid, item: LogbookItem) -> AnyView {
    let author = match item.author.as_ref() {
        Some(a) => {
            let name = a.display_name();
            view! { <Link to=AppRoute::UserDetail { id: a.id } class="link">{name}</Link> }.into_any()
        }
        None => MISSING.to_string().into_any(),
    };
    view! {
        <tr>
            <td class="whitespace-nowrap">{format_short(item.created.as_ref())}</td>
            <td><span class="badge badge-outline">{item.entry_type.label()}</span></td>
            <td class="whitespace-pre-wrap">{item.text.clone()}</td>
            <td>{author}</td>
            <td>{if item.public { "Yes" } else { "No" }}</td>
            <td>
                <Link
                    to=AppRoute::LogbookEntryEdit { detector, entry: item.id }
                    class="btn btn-ghost btn-xs"
                >
                    <Pencil attr:class="h-4 w-4" />
                </Link>
            </td>
        </tr>
    }
    .into_any()
}

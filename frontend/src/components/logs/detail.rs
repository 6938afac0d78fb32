use super::status_badge;
use crate::auth::use_auth;
use crate::components::common::{PageHeader, fetch_view, or_missing};
use crate::hooks::use_fetch;
use dosportal::shared::date::{format_datetime, format_short};
use dosportal::shared::protocol::{GetSpectralRecordRequest, ListArtifactsRequest};
use dosportal::shared::{EvolutionData, SpectralArtifact, SpectralRecord, SpectrumData};
use leptos::prelude::*;
use uuid::Uuid;

/// 数据表只显示前若干行，完整数据通过产物文件下载
const PREVIEW_ROWS: usize = 50;

#[component]
pub fn SpectralRecordDetailPage(id: Uuid) -> impl IntoView {
    let record = use_fetch(
        move || id,
        |api, id| async move { api.call(&GetSpectralRecordRequest::new(id)).await },
    );
    let artifacts = use_fetch(
        move || id,
        |api, id| async move { api.call(&ListArtifactsRequest::new(id)).await },
    );
    let charts = use_fetch(move || id, |api, id| async move { api.spectral_charts(id).await });

    view! {
        {move || fetch_view(record.get(), |r| view! { <RecordSummary record=r /> }.into_any())}
        <div class="card bg-base-100 shadow mt-6">
            <div class="card-body">
                <h2 class="card-title">"Artifacts"</h2>
                {move || fetch_view(artifacts.get(), |list| view! { <ArtifactList artifacts=list /> }.into_any())}
            </div>
        </div>
        {move || fetch_view(charts.get(), |(evolution, spectrum)| {
            view! {
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mt-6">
                    <EvolutionTable data=evolution />
                    <SpectrumTable data=spectrum />
                </div>
            }
            .into_any()
        })}
    }
}

#[component]
fn RecordSummary(record: SpectralRecord) -> impl IntoView {
    let author = record.author.as_ref().map(|a| a.display_name());
    view! {
        <PageHeader title=record.name.clone()>
            {status_badge(record.processing_status)}
        </PageHeader>
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <dl class="grid grid-cols-3 gap-2 text-sm">
                    <dt class="font-semibold">"Description"</dt>
                    <dd class="col-span-2 whitespace-pre-wrap">{or_missing(record.description.clone())}</dd>
                    <dt class="font-semibold">"Uploaded"</dt>
                    <dd class="col-span-2">{format_datetime(record.created.as_ref())}</dd>
                    <dt class="font-semibold">"Author"</dt>
                    <dd class="col-span-2">{or_missing(author)}</dd>
                    <dt class="font-semibold">"Raw file"</dt>
                    <dd class="col-span-2 font-mono">{or_missing(record.raw_file_id)}</dd>
                </dl>
            </div>
        </div>
    }
}

#[component]
fn ArtifactList(artifacts: Vec<SpectralArtifact>) -> impl IntoView {
    let config = use_auth().config().clone();
    if artifacts.is_empty() {
        return view! { <p class="text-base-content/60">"No artifacts generated."</p> }.into_any();
    }
    view! {
        <ul class="menu bg-base-200 rounded-box">
            {artifacts
                .into_iter()
                .map(|a| {
                    let created = format_short(a.created_at.as_ref());
                    let label = format!("{} ({})", a.artifact_type, created);
                    match a.file.as_deref() {
                        Some(file) => {
                            let href = config.media_url(file);
                            view! { <li><a href=href target="_blank" rel="noopener">{label}</a></li> }
                                .into_any()
                        }
                        None => view! { <li><span>{label}</span></li> }.into_any(),
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

fn preview_note(total: usize) -> Option<impl IntoView> {
    (total > PREVIEW_ROWS).then(|| {
        view! {
            <p class="text-xs text-base-content/60">
                {format!("Showing the first {} of {} points.", PREVIEW_ROWS, total)}
            </p>
        }
    })
}

#[component]
fn EvolutionTable(data: EvolutionData) -> impl IntoView {
    let total = data.evolution_values.len();
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">"Time evolution"</h2>
                <p class="text-sm">"Total time: " {format!("{:.1} s", data.total_time)}</p>
                <div class="overflow-x-auto max-h-96">
                    <table class="table table-xs table-pin-rows">
                        <thead><tr><th>"Time (s)"</th><th>"Counts"</th></tr></thead>
                        <tbody>
                            {data
                                .evolution_values
                                .into_iter()
                                .take(PREVIEW_ROWS)
                                .map(|(t, counts)| view! { <tr><td>{format!("{:.1}", t)}</td><td>{counts}</td></tr> })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>
                {preview_note(total)}
            </div>
        </div>
    }
}

#[component]
fn SpectrumTable(data: SpectrumData) -> impl IntoView {
    let total = data.spectrum_values.len();
    let axis = if data.calib { "Energy (keV)" } else { "Channel" };
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">"Spectrum"</h2>
                <p class="text-sm">"Total time: " {format!("{:.1} s", data.total_time)}</p>
                <div class="overflow-x-auto max-h-96">
                    <table class="table table-xs table-pin-rows">
                        <thead><tr><th>{axis}</th><th>"Counts"</th></tr></thead>
                        <tbody>
                            {data
                                .spectrum_values
                                .into_iter()
                                .take(PREVIEW_ROWS)
                                .map(|(x, counts)| view! { <tr><td>{x}</td><td>{counts}</td></tr> })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>
                {preview_note(total)}
            </div>
        </div>
    }
}

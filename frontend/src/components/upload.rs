//! 文件上传页面
//!
//! 日志文件上传后立即创建能谱记录并跳转到处理状态页；其他类型只上传文件。

use crate::auth::use_auth;
use crate::components::common::{PageHeader, SuccessAlert, error_slot};
use crate::components::icons::Upload;
use crate::hooks::use_fetch_once;
use crate::web::file::read_selected;
use crate::web::router::use_router;
use dosportal::error::PortalError;
use dosportal::fetch::FetchState;
use dosportal::forms::{FILE_TYPES, UploadDraft};
use dosportal::route::AppRoute;
use dosportal::shared::protocol::ListUserOrganizationsRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

const ACCEPTED_EXTENSIONS: &str = ".txt,.log,.csv,.json,.bin";

#[component]
pub fn LogsUploadPage() -> impl IntoView {
    view! {
        <PageHeader title="Upload log" subtitle="Spectrometer logs are processed into spectral records" />
        <UploadForm logs_only=true />
    }
}

#[component]
pub fn FileUploadPage() -> impl IntoView {
    view! {
        <PageHeader title="Upload file" />
        <UploadForm />
    }
}

#[component]
fn UploadForm(
    /// 只允许上传日志文件（隐藏类型选择）
    #[prop(optional)]
    logs_only: bool,
) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let organizations =
        use_fetch_once(|api| async move { api.call(&ListUserOrganizationsRequest::default()).await });

    let draft = RwSignal::new(UploadDraft::default());
    let file_input = NodeRef::<leptos::html::Input>::new();
    let (is_uploading, set_is_uploading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);
        set_success_msg.set(None);

        let Some(input) = file_input.get_untracked() else {
            return;
        };
        let draft = draft.get_untracked();
        let api = auth.api();

        set_is_uploading.set(true);
        spawn_local(async move {
            let result = async {
                let file = read_selected(&input).await?;
                let upload = draft.to_upload(file)?;
                if draft.is_log() {
                    let name = draft.record_name(&upload.filename);
                    let record = api
                        .upload_log(upload, name, Some(draft.description.clone()))
                        .await?;
                    Ok::<_, PortalError>(Some(record))
                } else {
                    api.upload_file(upload).await.map(|_| None)
                }
            }
            .await;

            set_is_uploading.set(false);
            match result {
                Ok(Some(id)) => router.navigate_to(AppRoute::SpectralRecordStatus { id }),
                Ok(None) => {
                    input.set_value("");
                    set_success_msg.set(Some("File uploaded.".to_string()));
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    let owner_options = move || match organizations.get() {
        FetchState::Ready(list) => list
            .into_iter()
            .map(|o| view! { <option value=o.id.to_string()>{o.name}</option> })
            .collect_view()
            .into_any(),
        _ => ().into_any(),
    };

    view! {
        <div class="card bg-base-100 shadow max-w-2xl">
            <form class="card-body space-y-2" on:submit=on_submit novalidate>
                {error_slot(error_msg)}
                {move || success_msg.get().map(|m| view! { <SuccessAlert message=m /> })}

                <div class="form-control">
                    <label class="label" for="file">
                        <span class="label-text">"File"</span>
                    </label>
                    <input
                        id="file"
                        type="file"
                        accept=ACCEPTED_EXTENSIONS
                        class="file-input file-input-bordered w-full"
                        node_ref=file_input
                    />
                </div>

                <Show when=move || !logs_only>
                    <div class="form-control">
                        <label class="label" for="file_type">
                            <span class="label-text">"File type"</span>
                        </label>
                        <select
                            id="file_type"
                            class="select select-bordered"
                            on:change=move |ev| draft.update(|d| d.file_type = event_target_value(&ev))
                        >
                            {FILE_TYPES
                                .iter()
                                .map(|(value, label)| {
                                    let value = *value;
                                    view! {
                                        <option value=value selected=move || draft.with(|d| d.file_type == value)>
                                            {*label}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                </Show>

                <Show when=move || draft.with(|d| d.is_log())>
                    <div class="form-control">
                        <label class="label" for="record_name">
                            <span class="label-text">"Record name (defaults to the file name)"</span>
                        </label>
                        <input
                            id="record_name"
                            type="text"
                            class="input input-bordered"
                            prop:value=move || draft.with(|d| d.name.clone())
                            on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="description">
                            <span class="label-text">"Description (optional)"</span>
                        </label>
                        <textarea
                            id="description"
                            rows="3"
                            class="textarea textarea-bordered"
                            prop:value=move || draft.with(|d| d.description.clone())
                            on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                        ></textarea>
                    </div>
                </Show>

                <div class="form-control">
                    <label class="label" for="owner">
                        <span class="label-text">"Owner organization"</span>
                    </label>
                    <select
                        id="owner"
                        class="select select-bordered"
                        on:change=move |ev| draft.update(|d| d.owner = event_target_value(&ev))
                    >
                        <option value="" selected=move || draft.with(|d| d.owner.is_empty())>
                            "Select organization"
                        </option>
                        {owner_options}
                    </select>
                </div>

                <div class="card-actions justify-end mt-4">
                    <button type="submit" class="btn btn-primary gap-2" disabled=move || is_uploading.get()>
                        {move || if is_uploading.get() {
                            view! { <span class="loading loading-spinner"></span> "Uploading..." }.into_any()
                        } else {
                            view! { <Upload attr:class="h-4 w-4" /> "Upload" }.into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}

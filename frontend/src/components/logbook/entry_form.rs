//! 日志条目的新建与编辑
//!
//! 两个页面共用 [`LogbookForm`]：编辑页先加载条目并用它预填表单，
//! 提交时编辑走 `PUT`，新建走 `/logbook/add/`，成功后回到探测器日志本。

use crate::auth::use_auth;
use crate::components::common::{PageHeader, error_slot, fetch_view};
use crate::hooks::use_fetch;
use crate::web::router::{Link, use_router};
use dosportal::forms::LogbookDraft;
use dosportal::route::AppRoute;
use dosportal::shared::EntryType;
use dosportal::shared::protocol::{CreateLogbookEntryRequest, UpdateLogbookEntryRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

#[component]
pub fn LogbookEntryCreatePage(detector: Uuid) -> impl IntoView {
    view! {
        <PageHeader title="New logbook entry" />
        <LogbookForm detector=detector initial=LogbookDraft::default() />
    }
}

#[component]
pub fn LogbookEntryEditPage(detector: Uuid, entry: Uuid) -> impl IntoView {
    let item = use_fetch(
        move || (detector, entry),
        |api, (detector, entry)| async move { api.find_logbook_entry(detector, entry).await },
    );

    view! {
        <PageHeader title="Edit logbook entry" />
        {move || fetch_view(item.get(), move |item| {
            view! {
                <LogbookForm detector=detector entry=item.id initial=LogbookDraft::from_item(&item) />
            }
            .into_any()
        })}
    }
}

#[component]
fn LogbookForm(
    detector: Uuid,
    /// 编辑的条目 id，新建时为空
    #[prop(optional)]
    entry: Option<Uuid>,
    initial: LogbookDraft,
) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let draft = RwSignal::new(initial);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        let payload = match draft.with_untracked(|d| d.to_payload(detector)) {
            Ok(payload) => payload,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        let api = auth.api();
        spawn_local(async move {
            let result = match entry {
                Some(id) => api.call(&UpdateLogbookEntryRequest { id, payload }).await,
                None => api.call(&CreateLogbookEntryRequest(payload)).await,
            };
            set_is_submitting.set(false);
            match result {
                Ok(_) => router.navigate_to(AppRoute::DetectorLogbook { detector }),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    let coordinate = move |id: &'static str,
                           label: &'static str,
                           get: fn(&LogbookDraft) -> &String,
                           set: fn(&mut LogbookDraft, String)| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type="text"
                    inputmode="decimal"
                    class="input input-bordered"
                    prop:value=move || draft.with(|d| get(d).clone())
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <div class="card bg-base-100 shadow max-w-2xl">
            <form class="card-body space-y-2" on:submit=on_submit novalidate>
                {error_slot(error_msg)}

                <div class="form-control">
                    <label class="label" for="entry_type">
                        <span class="label-text">"Entry type"</span>
                    </label>
                    <select
                        id="entry_type"
                        class="select select-bordered"
                        on:change=move |ev| {
                            let value = EntryType::from_str_value(&event_target_value(&ev));
                            draft.update(|d| d.entry_type = value);
                        }
                    >
                        {EntryType::ALL
                            .iter()
                            .copied()
                            .map(|t| {
                                view! {
                                    <option
                                        value=t.as_str()
                                        selected=move || draft.with(|d| d.entry_type == t)
                                    >
                                        {t.label()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>

                <div class="form-control">
                    <label class="label" for="text">
                        <span class="label-text">"Text"</span>
                    </label>
                    <textarea
                        id="text"
                        rows="5"
                        class="textarea textarea-bordered"
                        prop:value=move || draft.with(|d| d.text.clone())
                        on:input=move |ev| draft.update(|d| d.text = event_target_value(&ev))
                        required
                    ></textarea>
                </div>

                <div class="form-control">
                    <label class="label cursor-pointer justify-start gap-4">
                        <input
                            type="checkbox"
                            class="toggle toggle-primary"
                            prop:checked=move || draft.with(|d| d.public)
                            on:change=move |ev| draft.update(|d| d.public = event_target_checked(&ev))
                        />
                        <span class="label-text">"Public entry"</span>
                    </label>
                </div>

                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    {coordinate("latitude", "Latitude", |d| &d.latitude, |d, v| d.latitude = v)}
                    {coordinate("longitude", "Longitude", |d| &d.longitude, |d, v| d.longitude = v)}
                    {coordinate("altitude", "Altitude (m)", |d| &d.altitude, |d, v| d.altitude = v)}
                </div>

                <div class="card-actions justify-end mt-4">
                    <Link to=AppRoute::DetectorLogbook { detector } class="btn btn-ghost">"Cancel"</Link>
                    <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                        } else {
                            "Save entry".into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}

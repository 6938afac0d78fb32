use crate::auth::use_auth;
use crate::components::common::{PageHeader, error_slot};
use crate::web::router::{Link, use_router};
use dosportal::error::PortalError;
use dosportal::forms::OrganizationDraft;
use dosportal::route::AppRoute;
use dosportal::shared::DataPolicy;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 新建组织
///
/// 网址没有协议时补上 `https://`，创建成功后进入组织详情页。
#[component]
pub fn OrganizationCreatePage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let draft = RwSignal::new(OrganizationDraft::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        let req = match draft.with_untracked(OrganizationDraft::to_request) {
            Ok(req) => req,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        let api = auth.api();
        spawn_local(async move {
            let result = api.call(&req).await.and_then(|created| {
                created
                    .id
                    .ok_or_else(|| PortalError::Decode("organization response has no id".into()))
            });
            set_is_submitting.set(false);
            match result {
                Ok(id) => router.navigate_to(AppRoute::OrganizationDetail { id }),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    let text_input = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           placeholder: &'static str,
                           get: fn(&OrganizationDraft) -> &String,
                           set: fn(&mut OrganizationDraft, String)| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    placeholder=placeholder
                    class="input input-bordered"
                    prop:value=move || draft.with(|d| get(d).clone())
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <PageHeader title="New organization" />
        <div class="card bg-base-100 shadow max-w-2xl">
            <form class="card-body space-y-2" on:submit=on_submit novalidate>
                {error_slot(error_msg)}
                {text_input("name", "Name", "text", "", |d| &d.name, |d, v| d.name = v)}

                <div class="form-control">
                    <label class="label" for="data_policy">
                        <span class="label-text">"Data policy"</span>
                    </label>
                    <select
                        id="data_policy"
                        class="select select-bordered"
                        on:change=move |ev| {
                            let policy = DataPolicy::from_str_value(&event_target_value(&ev));
                            draft.update(|d| d.data_policy = policy);
                        }
                    >
                        {DataPolicy::ALL
                            .iter()
                            .copied()
                            .map(|p| {
                                view! {
                                    <option value=p.as_str() selected=move || draft.with(|d| d.data_policy == p)>
                                        {p.label()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>

                {text_input("website", "Website", "text", "example.org", |d| &d.website, |d, v| d.website = v)}
                {text_input(
                    "contact_email",
                    "Contact email",
                    "email",
                    "",
                    |d| &d.contact_email,
                    |d, v| d.contact_email = v,
                )}

                <div class="form-control">
                    <label class="label" for="description">
                        <span class="label-text">"Description"</span>
                    </label>
                    <textarea
                        id="description"
                        rows="4"
                        class="textarea textarea-bordered"
                        prop:value=move || draft.with(|d| d.description.clone())
                        on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                    ></textarea>
                </div>

                <div class="card-actions justify-end mt-4">
                    <Link to=AppRoute::Profile class="btn btn-ghost">"Cancel"</Link>
                    <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() { "Creating..." } else { "Create organization" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

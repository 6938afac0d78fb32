use crate::auth::use_auth;
use crate::components::common::{PageHeader, error_slot};
use crate::hooks::{use_fetch, use_fetch_once};
use crate::web::router::{Link, use_router};
use dosportal::fetch::FetchState;
use dosportal::forms::DetectorDraft;
use dosportal::route::AppRoute;
use dosportal::shared::DetectorType;
use dosportal::shared::protocol::{
    GetDetectorTypeRequest, ListDetectorTypesRequest, ListOwnedOrganizationsRequest,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

/// 新建探测器
///
/// 类型来自 `/detector-type/`，所属组织只能选择用户担任所有者或管理员的组织。
#[component]
pub fn DetectorCreatePage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let types = use_fetch_once(|api| async move { api.call(&ListDetectorTypesRequest::default()).await });
    let owners =
        use_fetch_once(|api| async move { api.call(&ListOwnedOrganizationsRequest::default()).await });

    let draft = RwSignal::new(DetectorDraft::default());
    // 只在选中的类型变化时重新加载详情，输入其他字段不触发请求
    let selected_type = Memo::new(move |_| draft.with(|d| Uuid::parse_str(&d.type_id).ok()));
    let type_info = use_fetch(
        move || selected_type.get(),
        |api, id| async move {
            match id {
                Some(id) => api.call(&GetDetectorTypeRequest::new(id)).await.map(Some),
                None => Ok(None),
            }
        },
    );
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        let req = match draft.with_untracked(DetectorDraft::to_request) {
            Ok(req) => req,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        let api = auth.api();
        spawn_local(async move {
            let result = api.call(&req).await;
            set_is_submitting.set(false);
            match result {
                Ok(created) => {
                    log::info!("Detector created: {:?}", created.id);
                    router.navigate_to(AppRoute::Logbooks);
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    // 选项加载失败时在下拉框下方提示，不阻断整个表单
    let type_options = move || match types.get() {
        FetchState::Ready(list) => list
            .into_iter()
            .filter_map(|t| {
                let id = t.id?.to_string();
                let label = format!("{} ({})", t.name, t.manufacturer.name);
                Some(view! { <option value=id>{label}</option> })
            })
            .collect_view()
            .into_any(),
        _ => ().into_any(),
    };
    let owner_options = move || match owners.get() {
        FetchState::Ready(list) => list
            .into_iter()
            .map(|o| view! { <option value=o.id.to_string()>{o.name}</option> })
            .collect_view()
            .into_any(),
        _ => ().into_any(),
    };
    let options_error = move || {
        types
            .with(|s| s.error())
            .or_else(|| owners.with(|s| s.error()))
            .map(|e| view! { <span class="text-error text-sm">{e}</span> })
    };

    let text_input = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           get: fn(&DetectorDraft) -> &String,
                           set: fn(&mut DetectorDraft, String)| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered"
                    prop:value=move || draft.with(|d| get(d).clone())
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <PageHeader title="Add detector" />
        <div class="card bg-base-100 shadow max-w-2xl">
            <form class="card-body space-y-2" on:submit=on_submit novalidate>
                {error_slot(error_msg)}
                {text_input("name", "Name", "text", |d| &d.name, |d, v| d.name = v)}
                {text_input("sn", "Serial number", "text", |d| &d.sn, |d, v| d.sn = v)}

                <div class="form-control">
                    <label class="label" for="type">
                        <span class="label-text">"Detector type"</span>
                    </label>
                    <select
                        id="type"
                        class="select select-bordered"
                        on:change=move |ev| draft.update(|d| d.type_id = event_target_value(&ev))
                    >
                        <option value="" selected=move || draft.with(|d| d.type_id.is_empty())>
                            "Select a type"
                        </option>
                        {type_options}
                    </select>
                </div>
                {move || match type_info.get() {
                    FetchState::Ready(Some(t)) => view! { <DetectorTypeInfo detector_type=t /> }.into_any(),
                    _ => ().into_any(),
                }}

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
                            "Select an organization"
                        </option>
                        {owner_options}
                    </select>
                </div>
                {options_error}

                {text_input(
                    "manufactured_date",
                    "Manufactured date (optional)",
                    "date",
                    |d| &d.manufactured_date,
                    |d, v| d.manufactured_date = v,
                )}

                <div class="card-actions justify-end mt-4">
                    <Link to=AppRoute::Logbooks class="btn btn-ghost">"Cancel"</Link>
                    <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() { "Creating..." } else { "Create detector" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

/// 选中类型的说明卡片
#[component]
fn DetectorTypeInfo(detector_type: DetectorType) -> impl IntoView {
    let config = use_auth().config().clone();
    let t = detector_type;
    let image = t.image.as_deref().map(|path| config.media_url(path));
    let alt = format!("{} image", t.name);
    let description = t.description.filter(|d| !d.trim().is_empty());

    view! {
        <div class="flex gap-4 items-start rounded-box bg-base-200 p-4">
            {image.map(|src| view! { <img src=src alt=alt class="w-28 h-28 rounded object-cover" /> })}
            <div>
                <div class="font-bold text-lg">{t.name.clone()}</div>
                <div class="text-sm text-base-content/70">"Manufacturer: " {t.manufacturer.name.clone()}</div>
                {description.map(|d| view! { <p class="mt-2 text-sm whitespace-pre-wrap">{d}</p> })}
            </div>
        </div>
    }
}

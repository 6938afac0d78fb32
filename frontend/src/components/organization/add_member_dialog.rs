use crate::auth::use_auth;
use crate::components::common::error_slot;
use crate::components::icons::Plus;
use dosportal::forms::MemberDraft;
use dosportal::shared::MemberRole;
use dosportal::shared::protocol::AddMemberRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

/// 添加成员弹窗
///
/// 提交成功后关闭弹窗并通知父组件刷新成员列表；失败时弹窗保持打开并显示错误。
#[component]
pub fn AddMemberDialog(organization: Uuid, #[prop(into)] on_added: Callback<()>) -> impl IntoView {
    let auth = use_auth();
    let (open, set_open) = signal(false);
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let draft = RwSignal::new(MemberDraft::default());

    let reset_form = move || {
        draft.set(MemberDraft::default());
        set_error_msg.set(None);
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        let username = match draft.with_untracked(MemberDraft::validated_username) {
            Ok(username) => username,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };
        let req = AddMemberRequest {
            organization,
            username,
            user_type: draft.with_untracked(|d| d.user_type),
        };

        set_loading.set(true);
        let api = auth.api();
        spawn_local(async move {
            let result = api.call(&req).await;
            set_loading.set(false);
            match result {
                Ok(resp) => {
                    log::info!("Member added: {}", resp.detail.unwrap_or_default());
                    set_open.set(false);
                    reset_form();
                    on_added.run(());
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <button class="btn btn-primary btn-sm gap-2" on:click=move |_| set_open.set(true)>
            <Plus attr:class="h-4 w-4" />
            "Add member"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Add member"</h3>
                <p class="py-4 text-base-content/70">"Add an existing user to this organization."</p>

                <form on:submit=on_submit class="space-y-4">
                    {error_slot(error_msg)}
                    <div class="form-control">
                        <label for="member_username" class="label">
                            <span class="label-text">"Username"</span>
                        </label>
                        <input
                            id="member_username"
                            type="text"
                            required
                            class="input input-bordered w-full"
                            prop:value=move || draft.with(|d| d.username.clone())
                            on:input=move |ev| draft.update(|d| d.username = event_target_value(&ev))
                        />
                    </div>

                    <div class="form-control">
                        <label for="member_role" class="label">
                            <span class="label-text">"Role"</span>
                        </label>
                        <select
                            id="member_role"
                            class="select select-bordered w-full"
                            on:change=move |ev| {
                                let role = MemberRole::from_str_value(&event_target_value(&ev));
                                draft.update(|d| d.user_type = role);
                            }
                        >
                            {MemberRole::ALL
                                .iter()
                                .copied()
                                .map(|r| {
                                    view! {
                                        <option value=r.as_str() selected=move || draft.with(|d| d.user_type == r)>
                                            {r.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" disabled=move || loading.get() class="btn btn-primary">
                            {move || if loading.get() {
                                view! { <span class="loading loading-spinner"></span> "Adding..." }.into_any()
                            } else {
                                "Add member".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

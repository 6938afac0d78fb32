use crate::auth::use_auth;
use crate::components::common::{PageHeader, error_slot, fetch_view};
use crate::hooks::use_fetch;
use crate::web::router::{Link, use_router};
use dosportal::route::AppRoute;
use dosportal::shared::InviteDetails;
use dosportal::shared::date::format_datetime;
use dosportal::shared::protocol::{AcceptInviteRequest, GetInviteRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 组织邀请：先展示邀请内容，用户确认后加入并进入组织页
#[component]
pub fn InviteAcceptPage(token: String) -> impl IntoView {
    let token = StoredValue::new(token);
    let invite = use_fetch(
        move || token.get_value(),
        |api, token| async move { api.call(&GetInviteRequest::new(token)).await },
    );

    view! {
        <PageHeader title="Organization invite" />
        {move || fetch_view(invite.get(), move |details| {
            view! { <InviteCard token=token.get_value() details=details /> }.into_any()
        })}
    }
}

#[component]
fn InviteCard(token: String, details: InviteDetails) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_accept = move |_| {
        set_is_submitting.set(true);
        set_error_msg.set(None);
        let api = auth.api();
        let req = AcceptInviteRequest {
            token: token.clone(),
        };
        spawn_local(async move {
            let result = api.call(&req).await;
            set_is_submitting.set(false);
            match result {
                Ok(accepted) => router.navigate_to(AppRoute::OrganizationDetail {
                    id: accepted.organization_id,
                }),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    let active = details.is_active;

    view! {
        <div class="card bg-base-100 shadow max-w-xl">
            <div class="card-body space-y-2">
                {error_slot(error_msg)}
                <h2 class="card-title">{details.organization.name.clone()}</h2>
                <p>
                    "You have been invited to join as "
                    <span class="badge badge-primary">{details.user_type.label()}</span>
                </p>
                <p class="text-sm text-base-content/70">
                    "Expires: " {format_datetime(details.expires_at.as_ref())}
                </p>
                <Show
                    when=move || active
                    fallback=|| view! { <p class="text-error">"This invite is no longer active."</p> }
                >
                    <div class="card-actions justify-end mt-4">
                        <Link to=AppRoute::Home class="btn btn-ghost">"Decline"</Link>
                        <button
                            class="btn btn-primary"
                            on:click=on_accept.clone()
                            disabled=move || is_submitting.get()
                        >
                            {move || if is_submitting.get() { "Joining..." } else { "Join organization" }}
                        </button>
                    </div>
                </Show>
            </div>
        </div>
    }
}

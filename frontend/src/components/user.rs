use crate::components::common::{PageHeader, fetch_view, or_missing};
use crate::hooks::use_fetch;
use dosportal::shared::UserProfile;
use dosportal::shared::protocol::GetUserRequest;
use leptos::prelude::*;

#[component]
pub fn UserDetailPage(id: i64) -> impl IntoView {
    let user = use_fetch(move || id, |api, id| async move { api.call(&GetUserRequest::new(id)).await });

    move || fetch_view(user.get(), |u| view! { <UserCard user=u /> }.into_any())
}

#[component]
fn UserCard(user: UserProfile) -> impl IntoView {
    let full_name = format!("{} {}", user.first_name, user.last_name).trim().to_string();
    let title = if full_name.is_empty() {
        user.username.clone()
    } else {
        full_name
    };

    view! {
        <PageHeader title=title subtitle=format!("@{}", user.username) />
        <div class="card bg-base-100 shadow max-w-xl">
            <div class="card-body">
                <dl class="grid grid-cols-3 gap-2 text-sm">
                    <dt class="font-semibold">"Username"</dt>
                    <dd class="col-span-2">{user.username.clone()}</dd>
                    <dt class="font-semibold">"Email"</dt>
                    <dd class="col-span-2">{or_missing(Some(user.email.clone()))}</dd>
                </dl>
            </div>
        </div>
    }
}

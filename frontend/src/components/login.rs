use crate::auth::use_auth;
use crate::components::common::error_slot;
use crate::components::icons::ShieldCheck;
use crate::web::router::Link;
use dosportal::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 登录页
///
/// 登录成功后不手动跳转：会话变化会让路由守卫把用户送到 `next` 指定的页面。
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);
        set_error_msg.set(None);

        let auth = auth.clone();
        spawn_local(async move {
            if let Err(e) = auth.login(&username.get_untracked(), &password.get_untracked()).await {
                set_error_msg.set(Some(e.to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-[70vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Log in"</h1>
                        <p class="text-base-content/70">"Sign in to manage your detectors and data"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {error_slot(error_msg)}

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Log in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <Link to=AppRoute::Signup class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

use crate::auth::use_auth;
use crate::components::common::error_slot;
use crate::web::router::{Link, use_router};
use dosportal::forms::SignupForm;
use dosportal::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 注册页
///
/// 新账号需要管理员审批，注册成功只跳转到提示页，不会登录。
#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let form = RwSignal::new(SignupForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        // 客户端校验失败时不发请求
        let req = match form.with_untracked(SignupForm::to_request) {
            Ok(req) => req,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        let auth = auth.clone();
        spawn_local(async move {
            match auth.signup(&req).await {
                Ok(_) => router.navigate_to(AppRoute::SignupSuccess),
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    let field = move |id: &'static str,
                      label: &'static str,
                      kind: &'static str,
                      get: fn(&SignupForm) -> &String,
                      set: fn(&mut SignupForm, String)| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered"
                    prop:value=move || form.with(|f| get(f).clone())
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                    required
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-[70vh]">
            <div class="hero-content flex-col w-full max-w-lg">
                <h1 class="text-3xl font-bold">"Create an account"</h1>
                <p class="text-base-content/70 text-center">
                    "New accounts are reviewed by an administrator before you can log in."
                </p>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        {error_slot(error_msg)}
                        {field("username", "Username", "text", |f| &f.username, |f, v| f.username = v)}
                        <div class="grid grid-cols-2 gap-4">
                            {field("first_name", "First name", "text", |f| &f.first_name, |f, v| f.first_name = v)}
                            {field("last_name", "Last name", "text", |f| &f.last_name, |f, v| f.last_name = v)}
                        </div>
                        {field("email", "Email", "email", |f| &f.email, |f, v| f.email = v)}
                        {field("password", "Password", "password", |f| &f.password, |f, v| f.password = v)}
                        {field(
                            "password_confirm",
                            "Confirm password",
                            "password",
                            |f| &f.password_confirm,
                            |f, v| f.password_confirm = v,
                        )}
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Signing up..." } else { "Sign up" }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login { next: None } class="link link-primary">"Log in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn SignupSuccessPage() -> impl IntoView {
    view! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div class="max-w-md space-y-4">
                    <h1 class="text-3xl font-bold">"Registration successful"</h1>
                    <p>
                        "Your account has been created and is awaiting approval by an administrator. "
                        "You will be able to log in once it is activated."
                    </p>
                    <Link to=AppRoute::Login { next: None } class="btn btn-primary">"Go to login"</Link>
                </div>
            </div>
        </div>
    }
}

//! 页面框架：导航栏与页脚

use crate::auth::use_auth;
use crate::components::icons::{LogOut, Radiation};
use crate::hooks::use_fetch_once;
use crate::web::router::Link;
use dosportal::config::BuildInfo;
use dosportal::fetch::FetchState;
use dosportal::route::AppRoute;
use dosportal::shared::protocol::GetVersionRequest;
use leptos::prelude::*;

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col bg-base-200 font-sans">
            <Navbar />
            <main class="flex-1 w-full max-w-7xl mx-auto p-4 md:p-8">{children()}</main>
            <Footer />
        </div>
    }
}

#[component]
fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let logged_in = move || session.with(|s| s.is_authenticated);

    let on_logout = {
        let auth = auth.clone();
        move |_| auth.logout()
    };

    view! {
        <div class="navbar bg-base-100 shadow">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Home class="btn btn-ghost text-xl gap-2">
                    <Radiation attr:class="h-6 w-6 text-primary" />
                    "DOSPORTAL"
                </Link>
            </div>
            <div class="flex-none">
                <Show
                    when=logged_in
                    fallback=|| {
                        view! {
                            <ul class="menu menu-horizontal px-1">
                                <li><Link to=AppRoute::Login { next: None }>"Log in"</Link></li>
                                <li><Link to=AppRoute::Signup>"Sign up"</Link></li>
                            </ul>
                        }
                    }
                >
                    <ul class="menu menu-horizontal px-1">
                        <li><Link to=AppRoute::Logbooks>"Logbooks"</Link></li>
                        <li><Link to=AppRoute::Measurements>"Measurements"</Link></li>
                        <li><Link to=AppRoute::Logs>"Logs"</Link></li>
                        <li><Link to=AppRoute::FileUpload>"Upload"</Link></li>
                        <li><Link to=AppRoute::Profile>"Profile"</Link></li>
                    </ul>
                    <button on:click=on_logout.clone() class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" />
                        "Log out"
                    </button>
                </Show>
            </div>
        </div>
    }
}

/// 页脚：前端构建版本，登录后附带后端版本
#[component]
fn Footer() -> impl IntoView {
    let build = BuildInfo::from_build_env();

    view! {
        <footer class="footer footer-center p-4 bg-base-100 text-base-content/60 text-xs">
            <div class="flex gap-4">
                <span>"Frontend " {build.label()}</span>
                <BackendVersion />
            </div>
        </footer>
    }
}

#[component]
fn BackendVersion() -> impl IntoView {
    let session = use_auth().session();
    let ready = move || session.with(|s| !s.is_loading && s.is_authenticated);

    view! {
        <Show when=ready>
            <BackendVersionLabel />
        </Show>
    }
}

#[component]
fn BackendVersionLabel() -> impl IntoView {
    let version = use_fetch_once(|api| async move { api.call(&GetVersionRequest::default()).await });

    move || match version.get() {
        FetchState::Ready(info) => {
            let build = BuildInfo::new(Some(&info.git_commit), Some(&info.git_branch));
            Some(view! { <span>"Backend " {build.label()}</span> })
        }
        _ => None,
    }
}

use crate::auth::use_auth;
use crate::components::icons::{Radiation, Upload, Users};
use crate::web::router::Link;
use dosportal::route::AppRoute;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_auth().session();
    let logged_in = move || session.with(|s| s.is_authenticated);

    view! {
        <div class="hero min-h-[60vh] bg-base-100 rounded-box shadow">
            <div class="hero-content text-center">
                <div class="max-w-2xl space-y-6">
                    <div class="flex justify-center">
                        <div class="p-4 bg-primary/10 rounded-3xl text-primary">
                            <Radiation attr:class="h-12 w-12" />
                        </div>
                    </div>
                    <h1 class="text-5xl font-bold">"DOSPORTAL"</h1>
                    <p class="text-lg text-base-content/70">
                        "A portal for ionizing radiation dosimetry. Keep detector logbooks, "
                        "share measurements within your organization and upload spectrometer "
                        "logs for processing into spectral records."
                    </p>
                    <Show
                        when=logged_in
                        fallback=|| {
                            view! {
                                <div class="flex justify-center gap-4">
                                    <Link to=AppRoute::Login { next: None } class="btn btn-primary">
                                        "Log in"
                                    </Link>
                                    <Link to=AppRoute::Signup class="btn btn-outline">
                                        "Sign up"
                                    </Link>
                                </div>
                            }
                        }
                    >
                        <div class="flex flex-wrap justify-center gap-4">
                            <Link to=AppRoute::Logbooks class="btn btn-primary">"Logbooks"</Link>
                            <Link to=AppRoute::LogsUpload class="btn btn-outline gap-2">
                                <Upload attr:class="h-4 w-4" />
                                "Upload log"
                            </Link>
                            <Link to=AppRoute::Profile class="btn btn-ghost gap-2">
                                <Users attr:class="h-4 w-4" />
                                "My organizations"
                            </Link>
                        </div>
                    </Show>
                </div>
            </div>
        </div>
    }
}

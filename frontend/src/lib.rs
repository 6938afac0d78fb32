//! DOSPORTAL 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `dosportal::route` / `dosportal::guard`: 路由表与守卫规则（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态，唯一的跨页面共享状态
//! - `hooks`: 页面数据加载
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod airport;
    pub mod common;
    pub mod detector_create;
    pub mod form_field;
    pub mod home;
    pub mod icons;
    pub mod invite;
    pub mod layout;
    pub mod logbook;
    pub mod login;
    pub mod logs;
    pub mod measurement;
    pub mod organization;
    pub mod profile;
    pub mod signup;
    pub mod sortable_table;
    pub mod upload;
    pub mod user;
}
mod hooks;
pub(crate) mod web;

use crate::auth::{AuthContext, init_auth};
use crate::components::airport::AirportDetailPage;
use crate::components::detector_create::DetectorCreatePage;
use crate::components::home::HomePage;
use crate::components::invite::InviteAcceptPage;
use crate::components::layout::Layout;
use crate::components::logbook::{
    DetectorLogbookPage, LogbookEntryCreatePage, LogbookEntryEditPage, LogbooksPage,
};
use crate::components::login::LoginPage;
use crate::components::logs::{LogsPage, SpectralRecordDetailPage, SpectralRecordStatusPage};
use crate::components::measurement::{MeasurementDetailPage, MeasurementsPage};
use crate::components::organization::{OrganizationCreatePage, OrganizationDetailPage};
use crate::components::profile::ProfilePage;
use crate::components::signup::{SignupPage, SignupSuccessPage};
use crate::components::upload::{FileUploadPage, LogsUploadPage};
use crate::components::user::UserDetailPage;
use dosportal::config::ApiConfig;
use dosportal::route::AppRoute;
use web::router::{Router, RouterOutlet};

use leptos::prelude::*;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。守卫已在 `RouterOutlet` 中处理。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login { .. } => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::SignupSuccess => view! { <SignupSuccessPage /> }.into_any(),
        AppRoute::Logbooks => view! { <LogbooksPage /> }.into_any(),
        AppRoute::DetectorLogbook { detector } => {
            view! { <DetectorLogbookPage detector=detector /> }.into_any()
        }
        AppRoute::LogbookEntryCreate { detector } => {
            view! { <LogbookEntryCreatePage detector=detector /> }.into_any()
        }
        AppRoute::LogbookEntryEdit { detector, entry } => {
            view! { <LogbookEntryEditPage detector=detector entry=entry /> }.into_any()
        }
        AppRoute::DetectorCreate => view! { <DetectorCreatePage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::OrganizationCreate => view! { <OrganizationCreatePage /> }.into_any(),
        AppRoute::OrganizationDetail { id } => view! { <OrganizationDetailPage id=id /> }.into_any(),
        AppRoute::InviteAccept { token } => view! { <InviteAcceptPage token=token /> }.into_any(),
        AppRoute::Measurements => view! { <MeasurementsPage /> }.into_any(),
        AppRoute::MeasurementDetail { id } => view! { <MeasurementDetailPage id=id /> }.into_any(),
        AppRoute::Logs => view! { <LogsPage /> }.into_any(),
        AppRoute::LogsUpload => view! { <LogsUploadPage /> }.into_any(),
        AppRoute::SpectralRecordDetail { id } => {
            view! { <SpectralRecordDetailPage id=id /> }.into_any()
        }
        AppRoute::SpectralRecordStatus { id } => {
            view! { <SpectralRecordStatusPage id=id /> }.into_any()
        }
        AppRoute::FileUpload => view! { <FileUploadPage /> }.into_any(),
        AppRoute::UserDetail { id } => view! { <UserDetailPage id=id /> }.into_any(),
        AppRoute::AirportDetail { id } => view! { <AirportDetailPage id=id /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（API 地址在编译期注入）
    let auth_ctx = AuthContext::new(ApiConfig::from_build_env());
    provide_context(auth_ctx.clone());

    // 2. 后台探测保存的令牌，完成前守卫只显示加载指示
    init_auth(&auth_ctx);

    // 3. 会话信号注入路由服务，守卫据此放行或重定向
    let session = auth_ctx.session();

    view! {
        <Router session=session>
            <Layout>
                <RouterOutlet matcher=route_matcher />
            </Layout>
        </Router>
    }
}

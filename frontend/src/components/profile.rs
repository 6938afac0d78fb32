//! 个人资料页
//!
//! 姓名与邮箱可以逐项编辑，下方列出用户所在的组织、可见的探测器和测量。

use crate::auth::use_auth;
use crate::components::common::{PageHeader, fetch_view, or_missing};
use crate::components::form_field::{EditableField, FieldKind};
use crate::components::icons::Plus;
use crate::components::measurement::{MEASUREMENT_COLUMNS, measurement_row};
use crate::components::sortable_table::SortableTable;
use crate::hooks::use_fetch_once;
use crate::web::router::Link;
use dosportal::error::{PortalError, PortalResult};
use dosportal::forms::is_valid_email;
use dosportal::route::AppRoute;
use dosportal::shared::protocol::{
    GetProfileRequest, ListDetectorsRequest, ListMeasurementsRequest, ListUserOrganizationsRequest,
    UpdateProfileRequest,
};
use dosportal::shared::{DataPolicy, Detector, UserOrganization, UserProfile};
use dosportal::table::{Column, SortDirection, SortState};
use leptos::prelude::*;

const ORGANIZATION_COLUMNS: &[Column] = &[
    Column::sortable("name", "Organization"),
    Column::sortable("user_type", "Role"),
    Column::sortable("data_policy", "Data policy"),
];

const DETECTOR_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("sn", "Serial number"),
    Column::sortable("type", "Type"),
    Column::sortable("owner", "Owner"),
];

#[component]
pub fn ProfilePage() -> impl IntoView {
    let profile = use_fetch_once(|api| async move { api.call(&GetProfileRequest::default()).await });
    let organizations =
        use_fetch_once(|api| async move { api.call(&ListUserOrganizationsRequest::default()).await });
    let detectors = use_fetch_once(|api| async move { api.call(&ListDetectorsRequest::default()).await });
    let measurements =
        use_fetch_once(|api| async move { api.call(&ListMeasurementsRequest::default()).await });

    view! {
        <PageHeader title="Profile" />
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Account"</h2>
                    {move || fetch_view(profile.get(), |p| view! { <ProfileFields profile=p /> }.into_any())}
                </div>
            </div>
            <div class="card bg-base-100 shadow lg:col-span-2">
                <div class="card-body">
                    <div class="flex items-center justify-between">
                        <h2 class="card-title">"Organizations"</h2>
                        <Link to=AppRoute::OrganizationCreate class="btn btn-primary btn-sm gap-2">
                            <Plus attr:class="h-4 w-4" />
                            "New organization"
                        </Link>
                    </div>
                    {move || fetch_view(organizations.get(), |list| {
                        view! {
                            <SortableTable
                                columns=ORGANIZATION_COLUMNS
                                rows=list
                                initial=SortState::with_direction("name", SortDirection::Asc)
                                row=organization_row
                                empty="You are not a member of any organization."
                            />
                        }
                        .into_any()
                    })}
                </div>
            </div>
        </div>

        <div class="card bg-base-100 shadow mt-6">
            <div class="card-body">
                <h2 class="card-title">"Detectors"</h2>
                {move || fetch_view(detectors.get(), |list| {
                    view! {
                        <SortableTable
                            columns=DETECTOR_COLUMNS
                            rows=list
                            initial=SortState::with_direction("name", SortDirection::Asc)
                            row=detector_row
                            empty="No detectors found."
                        />
                    }
                    .into_any()
                })}
            </div>
        </div>

        <div class="card bg-base-100 shadow mt-6">
            <div class="card-body">
                <h2 class="card-title">"Measurements"</h2>
                {move || fetch_view(measurements.get(), |list| {
                    view! {
                        <SortableTable
                            columns=MEASUREMENT_COLUMNS
                            rows=list
                            initial=SortState::new("time_start")
                            row=measurement_row
                            empty="No measurements found."
                        />
                    }
                    .into_any()
                })}
            </div>
        </div>
    }
}

#[component]
fn ProfileFields(profile: UserProfile) -> impl IntoView {
    let api = use_auth().api();

    let save = move |req: UpdateProfileRequest| {
        let api = api.clone();
        async move { api.call(&req).await.map(|_| ()) }
    };
    let save_first = {
        let save = save.clone();
        move |value: String| {
            save(UpdateProfileRequest {
                first_name: Some(value.trim().to_string()),
                ..Default::default()
            })
        }
    };
    let save_last = {
        let save = save.clone();
        move |value: String| {
            save(UpdateProfileRequest {
                last_name: Some(value.trim().to_string()),
                ..Default::default()
            })
        }
    };
    // 邮箱格式在本地校验，不合法时不发请求
    let save_email = move |value: String| {
        let save = save.clone();
        async move {
            let email = value.trim().to_string();
            if !is_valid_email(&email) {
                return Err(PortalError::validation("Enter a valid email address."));
            }
            save(UpdateProfileRequest {
                email: Some(email),
                ..Default::default()
            })
            .await
        }
    };

    view! {
        <EditableField label="Username" value=profile.username.clone() read_only=true on_save=noop_save />
        <EditableField label="First name" value=profile.first_name.clone() on_save=save_first />
        <EditableField label="Last name" value=profile.last_name.clone() on_save=save_last />
        <EditableField label="Email" value=profile.email.clone() kind=FieldKind::Email on_save=save_email />
    }
}

async fn noop_save(_: String) -> PortalResult<()> {
    Ok(())
}

fn organization_row(org: UserOrganization) -> AnyView {
    let policy = org
        .data_policy
        .as_deref()
        .map(|p| DataPolicy::from_str_value(p).label());
    view! {
        <tr>
            <td>
                <Link to=AppRoute::OrganizationDetail { id: org.id } class="link link-primary">
                    {org.name.clone()}
                </Link>
            </td>
            <td><span class="badge badge-ghost">{org.user_type.label()}</span></td>
            <td>{or_missing(policy)}</td>
        </tr>
    }
    .into_any()
}

fn detector_row(d: Detector) -> AnyView {
    let owner = d.owner.as_ref().and_then(|o| o.name()).map(str::to_string);
    view! {
        <tr>
            <td>
                <Link to=AppRoute::DetectorLogbook { detector: d.id } class="link link-primary">
                    {d.name.clone()}
                </Link>
            </td>
            <td>{d.sn.clone()}</td>
            <td>{d.detector_type.name.clone()}</td>
            <td>{or_missing(owner)}</td>
        </tr>
    }
    .into_any()
}

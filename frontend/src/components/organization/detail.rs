use super::add_member_dialog::AddMemberDialog;
use crate::auth::{Api, use_auth};
use crate::components::common::{PageHeader, fetch_view};
use crate::components::form_field::{EditableField, FieldKind};
use crate::components::icons::Users;
use crate::components::sortable_table::SortableTable;
use crate::hooks::use_fetch;
use dosportal::error::{PortalError, PortalResult};
use dosportal::forms::{is_valid_email, normalize_website};
use dosportal::shared::date::format_datetime;
use dosportal::shared::protocol::{
    GetOrganizationRequest, ListUserOrganizationsRequest, UpdateOrganizationRequest,
};
use dosportal::shared::{DataPolicy, MemberRole, OrganizationDetail, OrganizationMember};
use dosportal::table::{Column, SortDirection, SortState};
use leptos::prelude::*;
use uuid::Uuid;

const MEMBER_COLUMNS: &[Column] = &[
    Column::sortable("username", "Username"),
    Column::sortable("name", "Name"),
    Column::sortable("user_type", "Role"),
];

/// 组织详情与当前用户在该组织中的角色
async fn load_organization(api: Api, id: Uuid) -> PortalResult<(OrganizationDetail, Option<MemberRole>)> {
    let detail = api.call(&GetOrganizationRequest::new(id)).await?;
    let role = api
        .call(&ListUserOrganizationsRequest::default())
        .await?
        .into_iter()
        .find(|o| o.id == id)
        .map(|o| o.user_type);
    Ok((detail, role))
}

#[component]
pub fn OrganizationDetailPage(id: Uuid) -> impl IntoView {
    let organization = use_fetch(move || id, load_organization);

    move || {
        fetch_view(organization.get(), move |(detail, role)| {
            let can_manage = role.is_some_and(|r| r.can_manage());
            view! {
                <OrganizationView
                    detail=detail
                    can_manage=can_manage
                    on_members_changed=move |_| organization.reload()
                />
            }
            .into_any()
        })
    }
}

#[component]
fn OrganizationView(
    detail: OrganizationDetail,
    can_manage: bool,
    #[prop(into)] on_members_changed: Callback<()>,
) -> impl IntoView {
    let api = use_auth().api();
    let id = detail.id;

    // 每个字段单独提交，只发送被修改的那一项
    let update = move |req: UpdateOrganizationRequest| {
        let api = api.clone();
        async move { api.call(&UpdateOrganizationRequest { id, ..req }).await.map(|_| ()) }
    };
    let save_name = {
        let update = update.clone();
        move |value: String| {
            let update = update.clone();
            async move {
                let name = value.trim().to_string();
                if name.is_empty() {
                    return Err(PortalError::validation("Organization name is required."));
                }
                update(UpdateOrganizationRequest {
                    name: Some(name),
                    ..Default::default()
                })
                .await
            }
        }
    };
    let save_policy = {
        let update = update.clone();
        move |value: String| {
            update(UpdateOrganizationRequest {
                data_policy: Some(DataPolicy::from_str_value(&value)),
                ..Default::default()
            })
        }
    };
    let save_website = {
        let update = update.clone();
        move |value: String| {
            update(UpdateOrganizationRequest {
                website: Some(normalize_website(&value)),
                ..Default::default()
            })
        }
    };
    let save_email = {
        let update = update.clone();
        move |value: String| {
            let update = update.clone();
            async move {
                let email = value.trim().to_string();
                if !email.is_empty() && !is_valid_email(&email) {
                    return Err(PortalError::validation("Enter a valid contact email."));
                }
                update(UpdateOrganizationRequest {
                    contact_email: Some(email),
                    ..Default::default()
                })
                .await
            }
        }
    };
    let save_description = move |value: String| {
        update(UpdateOrganizationRequest {
            description: Some(value.trim().to_string()),
            ..Default::default()
        })
    };

    let policy_options = DataPolicy::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.label().to_string()))
        .collect::<Vec<_>>();

    let subtitle = format!("Created {}", format_datetime(detail.created_at.as_ref()));
    let read_only = !can_manage;

    view! {
        <PageHeader title=detail.name.clone() subtitle=subtitle />
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Details"</h2>
                    <EditableField label="Name" value=detail.name.clone() read_only=read_only on_save=save_name />
                    <EditableField
                        label="Data policy"
                        value=detail.data_policy.as_str()
                        kind=FieldKind::Select(policy_options)
                        read_only=read_only
                        on_save=save_policy
                    />
                    <EditableField
                        label="Website"
                        value=detail.website.clone().unwrap_or_default()
                        kind=FieldKind::Url
                        read_only=read_only
                        on_save=save_website
                    />
                    <EditableField
                        label="Contact email"
                        value=detail.contact_email.clone().unwrap_or_default()
                        kind=FieldKind::Email
                        read_only=read_only
                        on_save=save_email
                    />
                    <EditableField
                        label="Description"
                        value=detail.description.clone().unwrap_or_default()
                        kind=FieldKind::Textarea
                        read_only=read_only
                        on_save=save_description
                    />
                </div>
            </div>
            <div class="card bg-base-100 shadow lg:col-span-2">
                <div class="card-body">
                    <div class="flex items-center justify-between">
                        <h2 class="card-title gap-2">
                            <Users attr:class="h-5 w-5" />
                            "Members"
                        </h2>
                        <Show when=move || can_manage>
                            <AddMemberDialog organization=id on_added=on_members_changed />
                        </Show>
                    </div>
                    <SortableTable
                        columns=MEMBER_COLUMNS
                        rows=detail.members.clone()
                        initial=SortState::with_direction("username", SortDirection::Asc)
                        row=member_row
                        empty="No members."
                    />
                </div>
            </div>
        </div>
    }
}

fn member_row(member: OrganizationMember) -> AnyView {
    let name = format!("{} {}", member.first_name, member.last_name);
    view! {
        <tr>
            <td>{member.username.clone()}</td>
            <td>{name.trim().to_string()}</td>
            <td><span class="badge badge-ghost">{member.user_type.label()}</span></td>
        </tr>
    }
    .into_any()
}

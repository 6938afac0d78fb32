//! 组织页面：新建、详情、成员管理

mod add_member_dialog;
mod create;
mod detail;

pub use create::OrganizationCreatePage;
pub use detail::OrganizationDetailPage;

//! 表单草稿与客户端校验
//!
//! 每个草稿都是纯数据：页面把输入框绑定到字段上，提交时调用 `to_request`/`to_payload`
//! 得到请求体，校验失败返回 [`PortalError::Validation`]，不发请求。

use crate::api::FileUpload;
use crate::error::{PortalError, PortalResult};
use dosportal_shared::date::parse_form_date;
use dosportal_shared::protocol::{
    CreateDetectorRequest, CreateOrganizationRequest, LogbookPayload, SignupRequest,
};
use dosportal_shared::{DataPolicy, EntrySource, EntryType, LogbookItem, MemberRole};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;

// =========================================================
// 字段工具
// =========================================================

/// 简单的邮箱格式检查：`local@domain.tld`，不含空白
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// 没有协议前缀的网址补上 `https://`，空值保持为空
pub fn normalize_website(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// 解析可选数字字段，空字符串为 `None`
pub fn parse_optional_f64(field: &str, input: &str) -> PortalResult<Option<f64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| PortalError::validation(format!("{} must be a number.", field)))
}

fn format_optional_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn require(field: &str, value: &str) -> PortalResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(PortalError::validation(format!("{} is required.", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

// =========================================================
// 注册
// =========================================================

/// 注册请求的客户端校验
pub fn check_signup(req: &SignupRequest) -> PortalResult<()> {
    require("Username", &req.username)?;
    require("First name", &req.first_name)?;
    require("Last name", &req.last_name)?;
    require("Email", &req.email)?;
    if !is_valid_email(&req.email) {
        return Err(PortalError::validation("Enter a valid email address."));
    }
    if req.password.is_empty() {
        return Err(PortalError::validation("Password is required."));
    }
    if req.password != req.password_confirm {
        return Err(PortalError::validation("Passwords do not match."));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PortalError::validation(
            "Password must be at least 8 characters long.",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl SignupForm {
    pub fn to_request(&self) -> PortalResult<SignupRequest> {
        let req = SignupRequest {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        };
        check_signup(&req)?;
        Ok(req)
    }
}

// =========================================================
// 日志条目
// =========================================================

/// 日志条目表单，数字字段以文本保存以便绑定输入框
#[derive(Debug, Clone, PartialEq)]
pub struct LogbookDraft {
    pub entry_type: EntryType,
    pub text: String,
    pub public: bool,
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
}

impl Default for LogbookDraft {
    fn default() -> Self {
        Self {
            entry_type: EntryType::Note,
            text: String::new(),
            public: true,
            latitude: String::new(),
            longitude: String::new(),
            altitude: String::new(),
        }
    }
}

impl LogbookDraft {
    /// 编辑时用已有条目预填表单
    pub fn from_item(item: &LogbookItem) -> Self {
        Self {
            entry_type: item.entry_type,
            text: item.text.clone(),
            public: item.public,
            latitude: format_optional_f64(item.latitude),
            longitude: format_optional_f64(item.longitude),
            altitude: format_optional_f64(item.altitude),
        }
    }

    /// 网页端提交的条目来源固定为 `web`
    pub fn to_payload(&self, detector: Uuid) -> PortalResult<LogbookPayload> {
        let text = require("Text", &self.text)?;
        let latitude = parse_optional_f64("Latitude", &self.latitude)?;
        let longitude = parse_optional_f64("Longitude", &self.longitude)?;
        let altitude = parse_optional_f64("Altitude", &self.altitude)?;

        if latitude.is_some_and(|v| !(-90.0..=90.0).contains(&v)) {
            return Err(PortalError::validation("Latitude must be between -90 and 90."));
        }
        if longitude.is_some_and(|v| !(-180.0..=180.0).contains(&v)) {
            return Err(PortalError::validation(
                "Longitude must be between -180 and 180.",
            ));
        }
        if latitude.is_some() != longitude.is_some() {
            return Err(PortalError::validation(
                "Latitude and longitude must be given together.",
            ));
        }

        Ok(LogbookPayload {
            detector,
            text,
            entry_type: self.entry_type,
            public: self.public,
            source: EntrySource::Web,
            latitude,
            longitude,
            altitude,
        })
    }
}

// =========================================================
// 组织
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationDraft {
    pub name: String,
    pub data_policy: DataPolicy,
    pub website: String,
    pub contact_email: String,
    pub description: String,
}

impl OrganizationDraft {
    pub fn to_request(&self) -> PortalResult<CreateOrganizationRequest> {
        let name = require("Organization name", &self.name)?;
        let contact_email = self.contact_email.trim().to_string();
        if !contact_email.is_empty() && !is_valid_email(&contact_email) {
            return Err(PortalError::validation("Enter a valid contact email."));
        }
        Ok(CreateOrganizationRequest {
            name,
            data_policy: self.data_policy,
            website: normalize_website(&self.website),
            contact_email,
            description: self.description.trim().to_string(),
        })
    }
}

/// 添加成员弹窗
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberDraft {
    pub username: String,
    pub user_type: MemberRole,
}

impl MemberDraft {
    pub fn validated_username(&self) -> PortalResult<String> {
        require("Username", &self.username)
    }
}

// =========================================================
// 探测器
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorDraft {
    pub name: String,
    pub sn: String,
    /// 选择框的值，即探测器类型 id
    pub type_id: String,
    /// 选择框的值，即组织 id
    pub owner: String,
    pub manufactured_date: String,
}

impl DetectorDraft {
    pub fn to_request(&self) -> PortalResult<CreateDetectorRequest> {
        let name = require("Name", &self.name)?;
        let sn = require("Serial number", &self.sn)?;
        let type_id = Uuid::parse_str(self.type_id.trim())
            .map_err(|_| PortalError::validation("Select a detector type."))?;
        let owner = Uuid::parse_str(self.owner.trim())
            .map_err(|_| PortalError::validation("Select an owner organization."))?;
        let manufactured_date = parse_form_date(&self.manufactured_date)
            .map_err(|_| PortalError::validation("Manufactured date must be YYYY-MM-DD."))?;

        Ok(CreateDetectorRequest {
            name,
            sn,
            type_id,
            owner: Some(owner),
            manufactured_date,
        })
    }
}

// =========================================================
// 文件上传
// =========================================================

/// 日志文件类型，上传后会为其创建能谱记录
pub const LOG_FILE_TYPE: &str = "log";

/// 上传表单中可选的文件类型 (取值, 显示名称)
pub const FILE_TYPES: &[(&str, &str)] = &[
    (LOG_FILE_TYPE, "Log file"),
    ("trajectory", "Trajectory"),
    ("document", "Document"),
    ("image", "Image"),
    ("other", "Other"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct UploadDraft {
    /// 能谱记录名称，留空时使用文件名
    pub name: String,
    pub description: String,
    pub file_type: String,
    /// 选择框的值，即组织 id；日志文件必填
    pub owner: String,
}

impl Default for UploadDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            file_type: LOG_FILE_TYPE.to_string(),
            owner: String::new(),
        }
    }
}

impl UploadDraft {
    pub fn is_log(&self) -> bool {
        self.file_type == LOG_FILE_TYPE
    }

    /// 记录名称，留空时退回文件名
    pub fn record_name(&self, filename: &str) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            filename.to_string()
        } else {
            name.to_string()
        }
    }

    /// 为选中的文件生成上传内容，`file` 为 (文件名, 内容)
    pub fn to_upload(&self, file: Option<(String, Vec<u8>)>) -> PortalResult<FileUpload> {
        let Some((filename, bytes)) = file else {
            return Err(PortalError::validation("Select a file to upload."));
        };
        let owner = match self.owner.trim() {
            "" if self.is_log() => {
                return Err(PortalError::validation(
                    "Select an owner organization for log files.",
                ));
            }
            "" => None,
            value => Some(
                Uuid::parse_str(value)
                    .map_err(|_| PortalError::validation("Select an owner organization."))?,
            ),
        };
        Ok(FileUpload {
            filename,
            file_type: self.file_type.clone(),
            owner,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_form() -> SignupForm {
        SignupForm {
            username: "jdoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jdoe@example.com".into(),
            password: "Secret123!".into(),
            password_confirm: "Secret123!".into(),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jdoe@example.com"));
        assert!(!is_valid_email("jdoe@example"));
        assert!(!is_valid_email("jdoe example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_signup_form_valid() {
        let req = signup_form().to_request().unwrap();
        assert_eq!(req.username, "jdoe");
        assert_eq!(req.password_confirm, "Secret123!");
    }

    #[test]
    fn test_signup_password_mismatch() {
        let mut form = signup_form();
        form.password_confirm = "Secret124!".into();
        assert_eq!(
            form.to_request().unwrap_err(),
            PortalError::validation("Passwords do not match.")
        );
    }

    #[test]
    fn test_signup_bad_email_rejected_before_password() {
        let mut form = signup_form();
        form.email = "not-an-email".into();
        form.password = "short".into();
        assert_eq!(
            form.to_request().unwrap_err().to_string(),
            "Enter a valid email address."
        );
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website("example.org"), "https://example.org");
        assert_eq!(normalize_website("http://example.org"), "http://example.org");
        assert_eq!(normalize_website("  "), "");
    }

    #[test]
    fn test_organization_draft() {
        let draft = OrganizationDraft {
            name: " UST ".into(),
            website: "ust.cz".into(),
            ..Default::default()
        };
        let req = draft.to_request().unwrap();
        assert_eq!(req.name, "UST");
        assert_eq!(req.website, "https://ust.cz");
        assert_eq!(req.data_policy, DataPolicy::Public);

        let missing = OrganizationDraft::default();
        assert!(missing.to_request().is_err());
    }

    #[test]
    fn test_logbook_draft_round_trip() {
        let detector = Uuid::parse_str("9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56").unwrap();
        let draft = LogbookDraft {
            entry_type: EntryType::Note,
            text: "Checked detector".into(),
            public: true,
            ..Default::default()
        };

        let payload = draft.to_payload(detector).unwrap();
        assert_eq!(payload.source, EntrySource::Web);
        assert_eq!(payload.latitude, None);

        let item = LogbookItem {
            id: Uuid::nil(),
            detector,
            text: payload.text.clone(),
            entry_type: payload.entry_type,
            source: payload.source,
            public: payload.public,
            created: None,
            author: None,
            latitude: payload.latitude,
            longitude: payload.longitude,
            altitude: payload.altitude,
        };
        assert_eq!(LogbookDraft::from_item(&item), draft);
    }

    #[test]
    fn test_logbook_draft_location() {
        let detector = Uuid::nil();
        let mut draft = LogbookDraft {
            text: "Moved to roof".into(),
            entry_type: EntryType::LocationUpdate,
            latitude: "50.08".into(),
            longitude: "14.42".into(),
            altitude: "260".into(),
            ..Default::default()
        };
        let payload = draft.to_payload(detector).unwrap();
        assert_eq!(payload.latitude, Some(50.08));
        assert_eq!(payload.altitude, Some(260.0));

        draft.longitude.clear();
        assert!(draft.to_payload(detector).is_err());

        draft.longitude = "east".into();
        assert_eq!(
            draft.to_payload(detector).unwrap_err().to_string(),
            "Longitude must be a number."
        );
    }

    #[test]
    fn test_detector_draft() {
        let draft = DetectorDraft {
            name: "AIRDOS-01".into(),
            sn: "SN-001".into(),
            type_id: "9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56".into(),
            owner: "5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a".into(),
            manufactured_date: "2023-05-01".into(),
        };
        let req = draft.to_request().unwrap();
        assert_eq!(req.sn, "SN-001");
        assert!(req.manufactured_date.is_some());

        let no_type = DetectorDraft {
            type_id: String::new(),
            ..draft
        };
        assert_eq!(
            no_type.to_request().unwrap_err().to_string(),
            "Select a detector type."
        );
    }

    #[test]
    fn test_upload_draft() {
        let file = || Some(("run-042.txt".to_string(), b"0,1,2".to_vec()));
        let mut draft = UploadDraft::default();
        assert!(draft.is_log());

        assert_eq!(
            draft.to_upload(None).unwrap_err().to_string(),
            "Select a file to upload."
        );
        assert_eq!(
            draft.to_upload(file()).unwrap_err().to_string(),
            "Select an owner organization for log files."
        );

        draft.owner = "5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a".into();
        let upload = draft.to_upload(file()).unwrap();
        assert_eq!(upload.file_type, "log");
        assert!(upload.owner.is_some());
        assert_eq!(draft.record_name(&upload.filename), "run-042.txt");

        // 其他类型不要求所属组织
        let doc = UploadDraft {
            file_type: "document".into(),
            name: " Calibration sheet ".into(),
            ..Default::default()
        };
        assert_eq!(doc.to_upload(file()).unwrap().owner, None);
        assert_eq!(doc.record_name("sheet.pdf"), "Calibration sheet");
    }
}

//! DOSPORTAL 共享数据模型
//!
//! 前端与核心库共用的传输层类型：
//! - 资源记录（探测器、日志条目、组织、测量、能谱记录等）
//! - 枚举选项及其显示名称
//! - 请求体（见 `protocol` 模块）

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// 令牌认证方案前缀，`Authorization: Token <value>`
pub const TOKEN_SCHEME: &str = "Token";

// =========================================================
// 通用引用类型
// =========================================================

/// 关联资源：服务端可能返回展开的对象，也可能只返回 ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Expanded(T),
    Id(Uuid),
}

impl<T> Ref<T> {
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Ref::Expanded(value) => Some(value),
            Ref::Id(_) => None,
        }
    }
}

impl Ref<OrganizationSummary> {
    /// 展开时的组织名称
    pub fn name(&self) -> Option<&str> {
        self.expanded().map(|o| o.name.as_str())
    }
}

// =========================================================
// 枚举选项 (Choices)
// =========================================================

/// 为选项枚举生成 `ALL`、`as_str`、`label` 以及 `from_str_value`。
///
/// 未知取值统一落到 `Other`，避免整条响应解析失败。
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => ($wire:literal, $label:literal) ),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $wire)] $variant, )+
            #[serde(other)]
            Other,
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Other => "other",
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                    $name::Other => "Other",
                }
            }

            pub fn from_str_value(value: &str) -> Self {
                match value {
                    $( $wire => $name::$variant, )+
                    _ => $name::Other,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// 日志条目类型
    pub enum EntryType {
        Reset => ("reset", "Reset"),
        Sync => ("sync", "Sync"),
        Maintenance => ("maintenance", "Maintenance"),
        Note => ("note", "Note"),
        LocationUpdate => ("location_update", "Location update"),
        Calibration => ("calibration", "Calibration"),
    }
    default = Note;
}

choice_enum! {
    /// 日志条目来源
    pub enum EntrySource {
        Web => ("web", "Web"),
        Api => ("api", "API"),
        Qr => ("qr", "QR code"),
        Auto => ("auto", "Automatic"),
    }
    default = Web;
}

choice_enum! {
    /// 组织数据策略
    pub enum DataPolicy {
        Private => ("PR", "Private"),
        Public => ("PU", "Public"),
        NonPublic => ("NV", "Non-public"),
    }
    default = Public;
}

choice_enum! {
    /// 组织成员角色
    pub enum MemberRole {
        Owner => ("OW", "Owner"),
        Admin => ("AD", "Admin"),
        Member => ("ME", "Member"),
    }
    default = Member;
}

impl MemberRole {
    /// 所有者与管理员可以编辑组织并添加成员
    pub fn can_manage(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }
}

choice_enum! {
    /// 测量类型
    pub enum MeasurementType {
        Debug => ("D", "Debug measurement"),
        Static => ("S", "Static measurement"),
        Mobile => ("M", "Mobile measurement (ground)"),
        CivilAirborne => ("C", "Civil airborne measurement"),
        SpecialAirborne => ("A", "Special airborne measurement"),
    }
    default = Static;
}

choice_enum! {
    /// 能谱记录处理状态
    pub enum ProcessingStatus {
        Pending => ("pending", "Pending"),
        Processing => ("processing", "Processing"),
        Completed => ("completed", "Completed"),
        Failed => ("failed", "Failed"),
    }
    default = Pending;
}

impl ProcessingStatus {
    /// 处理已经结束（成功或失败）
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }
}

// =========================================================
// 用户与组织 (Users & Organizations)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserSummary {
    /// "名 姓"，缺失时退回用户名
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// 当前用户所属组织（成员视角）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOrganization {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub user_type: MemberRole,
    /// 服务端返回的是显示名称，例如 "Public"
    #[serde(default)]
    pub data_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub user_type: MemberRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationDetail {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub data_policy: DataPolicy,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub members: Vec<OrganizationMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteDetails {
    pub organization: OrganizationSummary,
    pub user_type: MemberRole,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteAccepted {
    #[serde(default)]
    pub detail: Option<String>,
    pub organization_id: Uuid,
    pub user_type: MemberRole,
}

// =========================================================
// 探测器与日志 (Detectors & Logbook)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorManufacturer {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorType {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub manufacturer: DetectorManufacturer,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// 图片地址，可能是相对路径
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub id: Uuid,
    pub name: String,
    pub sn: String,
    #[serde(rename = "type")]
    pub detector_type: DetectorType,
    /// 列表接口只返回所属组织的 ID
    #[serde(default)]
    pub owner: Option<Ref<OrganizationSummary>>,
    #[serde(default)]
    pub manufactured_date: Option<NaiveDate>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogbookItem {
    pub id: Uuid,
    pub detector: Uuid,
    pub text: String,
    #[serde(default)]
    pub entry_type: EntryType,
    #[serde(default)]
    pub source: EntrySource,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<UserSummary>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
}

// =========================================================
// 测量与航班 (Measurements & Flights)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub code_iata: Option<String>,
    #[serde(default)]
    pub code_icao: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub alt: Option<f64>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub web: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    #[serde(default)]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub takeoff: Option<Ref<Airport>>,
    #[serde(default)]
    pub land: Option<Ref<Airport>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub measurement_type: MeasurementType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub time_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: Option<Ref<OrganizationSummary>>,
    #[serde(default)]
    pub flight: Option<Ref<Flight>>,
    #[serde(default)]
    pub base_location_lat: Option<f64>,
    #[serde(default)]
    pub base_location_lon: Option<f64>,
    #[serde(default)]
    pub base_location_alt: Option<f64>,
}

// =========================================================
// 文件与能谱记录 (Files & Spectral Records)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub filename: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub processing_status: ProcessingStatus,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<UserSummary>,
    #[serde(default)]
    pub owner: Option<Uuid>,
    #[serde(default)]
    pub raw_file_id: Option<Uuid>,
    #[serde(default)]
    pub artifacts_count: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralArtifact {
    pub id: Uuid,
    pub artifact_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub file: Option<String>,
}

/// 计数随时间的演化，每个点为 `[时间, 计数]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionData {
    #[serde(default)]
    pub evolution_values: Vec<(f64, f64)>,
    #[serde(default)]
    pub total_time: f64,
}

/// 能谱，每个点为 `[通道或能量, 计数]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumData {
    #[serde(default)]
    pub spectrum_values: Vec<(f64, f64)>,
    #[serde(default)]
    pub total_time: f64,
    /// 为 true 时横轴为能量 (keV)，否则为通道号
    #[serde(default)]
    pub calib: bool,
}

// =========================================================
// 其他 (Misc)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub git_commit: String,
    #[serde(default)]
    pub git_branch: String,
}

/// 服务端的通用消息响应，例如 `{"detail": "User added."}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailResponse {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_choice_falls_back_to_other() {
        let item: LogbookItem = serde_json::from_value(json!({
            "id": "0b5c4c8e-5b8e-4f7a-9d37-5b8a2c1d0e11",
            "detector": "9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56",
            "text": "Swapped battery",
            "entry_type": "battery_swap",
            "source": "qr",
            "public": false
        }))
        .unwrap();

        assert_eq!(item.entry_type, EntryType::Other);
        assert_eq!(item.source, EntrySource::Qr);
        assert!(item.created.is_none());
    }

    #[test]
    fn test_detector_type_field_renamed() {
        let detector: Detector = serde_json::from_value(json!({
            "id": "9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56",
            "name": "AIRDOS-01",
            "sn": "SN-001",
            "type": { "name": "AIRDOS04", "manufacturer": { "name": "UST" } },
            "owner": { "id": "5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a", "name": "UST", "slug": "ust" }
        }))
        .unwrap();

        assert_eq!(detector.detector_type.name, "AIRDOS04");
        assert_eq!(detector.detector_type.image, None);
        let owner = detector.owner.unwrap();
        assert_eq!(owner.name(), Some("UST"));
        assert_eq!(owner.expanded().unwrap().slug.as_deref(), Some("ust"));
    }

    #[test]
    fn test_detector_list_owner_is_plain_id() {
        let detector: Detector = serde_json::from_value(json!({
            "id": "9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56",
            "name": "AIRDOS-01",
            "sn": "SN-001",
            "type_id": "0b5c4c8e-5b8e-4f7a-9d37-5b8a2c1d0e11",
            "type": {
                "id": "0b5c4c8e-5b8e-4f7a-9d37-5b8a2c1d0e11",
                "name": "AIRDOS04",
                "manufacturer": { "id": "1a2b3c4d-1f0e-4d9c-8b7a-6f5e4d3c2b1a", "name": "UST", "url": null },
                "url": null,
                "description": "",
                "image": "/media/detector_images/airdos04.png"
            },
            "owner": "5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a"
        }))
        .unwrap();

        let owner = detector.owner.unwrap();
        assert_eq!(owner.name(), None);
        assert!(matches!(owner, Ref::Id(id) if id.to_string() == "5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a"));
        assert_eq!(
            detector.detector_type.image.as_deref(),
            Some("/media/detector_images/airdos04.png")
        );
    }

    #[test]
    fn test_ref_accepts_id_or_object() {
        let by_id: Ref<OrganizationSummary> =
            serde_json::from_value(json!("5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a")).unwrap();
        assert!(by_id.expanded().is_none());

        let expanded: Ref<OrganizationSummary> = serde_json::from_value(json!({
            "id": "5d4c3b2a-1f0e-4d9c-8b7a-6f5e4d3c2b1a",
            "name": "UST"
        }))
        .unwrap();
        assert_eq!(expanded.expanded().map(|o| o.name.as_str()), Some("UST"));
    }

    #[test]
    fn test_processing_status_terminal() {
        assert!(!ProcessingStatus::Pending.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Completed.is_terminal());
        assert!(ProcessingStatus::Failed.is_terminal());
        assert_eq!(ProcessingStatus::from_str_value("completed"), ProcessingStatus::Completed);
    }

    #[test]
    fn test_display_name() {
        let user = UserSummary {
            id: 1,
            username: "jdoe".into(),
            first_name: Some("Jane".into()),
            last_name: Some(" ".into()),
        };
        assert_eq!(user.display_name(), "Jane");

        let bare = UserSummary {
            id: 2,
            username: "anon".into(),
            first_name: None,
            last_name: None,
        };
        assert_eq!(bare.display_name(), "anon");
    }
}

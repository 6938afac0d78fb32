use crate::{
    DataPolicy, Detector, DetectorType, EntrySource, EntryType, EvolutionData, InviteAccepted,
    InviteDetails, LogbookItem, Measurement, MemberRole, OrganizationDetail, SpectralArtifact,
    SpectralRecord, SpectrumData, UserOrganization, UserProfile, VersionInfo, Airport,
    DetailResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters live on the request as `#[serde(skip)]` fields and are
/// spliced into the path by [`ApiRequest::path`]; everything else is the JSON body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base, for endpoints without parameters.
    const PATH: &'static str = "";

    /// The URL path (and query) relative to the API base.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

/// Generic reply for create endpoints. Only the new id is read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    #[serde(default)]
    pub id: Option<Uuid>,
}

macro_rules! get_collection {
    ($(#[$meta:meta])* $name:ident => $path:literal, $response:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        pub struct $name {}

        impl ApiRequest for $name {
            type Response = $response;
            const METHOD: HttpMethod = HttpMethod::Get;
            const PATH: &'static str = $path;
        }
    };
}

macro_rules! get_by_id {
    ($(#[$meta:meta])* $name:ident($id:ty) => $fmt:literal, $response:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name {
            #[serde(skip)]
            pub id: $id,
        }

        impl $name {
            pub fn new(id: $id) -> Self {
                Self { id }
            }
        }

        impl ApiRequest for $name {
            type Response = $response;
            const METHOD: HttpMethod = HttpMethod::Get;

            fn path(&self) -> String {
                format!($fmt, self.id)
            }
        }
    };
}

// =========================================================
// Session
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/login/";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl ApiRequest for SignupRequest {
    type Response = SignupResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/signup/";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {}

impl ApiRequest for LogoutRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/logout/";
}

get_collection!(
    /// Build metadata of the backend
    GetVersionRequest => "/version/", VersionInfo
);

// =========================================================
// Detectors & Logbook
// =========================================================

get_collection!(ListDetectorsRequest => "/detector/", Vec<Detector>);
get_collection!(ListDetectorTypesRequest => "/detector-type/", Vec<DetectorType>);
get_by_id!(GetDetectorTypeRequest(Uuid) => "/detector-type/{}/", DetectorType);

/// 探测器二维码图片（PNG）的路径，`label` 为 true 时图片带名称与序列号
pub fn detector_qr_path(detector: Uuid, label: bool) -> String {
    format!("/detector/{}/qr/?label={}", detector, label)
}

/// 二维码下载时使用的文件名
pub fn detector_qr_filename(sn: &str) -> String {
    format!("detector_{}_qr.png", sn)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDetectorRequest {
    pub name: String,
    pub sn: String,
    pub type_id: Uuid,
    pub owner: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufactured_date: Option<NaiveDate>,
}

impl ApiRequest for CreateDetectorRequest {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/detector/";
}

/// Logbook entries of one detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLogbookRequest {
    #[serde(skip)]
    pub detector: Uuid,
}

impl ApiRequest for ListLogbookRequest {
    type Response = Vec<LogbookItem>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/logbook/?detector={}", self.detector)
    }
}

/// Body shared by logbook create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogbookPayload {
    pub detector: Uuid,
    pub text: String,
    pub entry_type: EntryType,
    pub public: bool,
    pub source: EntrySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogbookEntryRequest(pub LogbookPayload);

impl ApiRequest for CreateLogbookEntryRequest {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/logbook/add/";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLogbookEntryRequest {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: LogbookPayload,
}

impl ApiRequest for UpdateLogbookEntryRequest {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/logbook/{}/", self.id)
    }
}

// =========================================================
// Users & Organizations
// =========================================================

get_collection!(GetProfileRequest => "/user/profile/", UserProfile);
get_collection!(ListUserOrganizationsRequest => "/user/organizations/", Vec<UserOrganization>);
get_collection!(
    /// Organizations where the user is owner or admin
    ListOwnedOrganizationsRequest => "/user/organizations/owned/", Vec<UserOrganization>
);
get_by_id!(GetUserRequest(i64) => "/user/{}/", UserProfile);
get_by_id!(GetOrganizationRequest(Uuid) => "/organizations/{}/", OrganizationDetail);

/// Partial profile update; only the set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Put;
    const PATH: &'static str = "/user/profile/";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub data_policy: DataPolicy,
    pub website: String,
    pub contact_email: String,
    pub description: String,
}

impl ApiRequest for CreateOrganizationRequest {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/organizations/";
}

/// Partial organization update; only the set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrganizationRequest {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_policy: Option<DataPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApiRequest for UpdateOrganizationRequest {
    type Response = OrganizationDetail;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/organizations/{}/", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    #[serde(skip)]
    pub organization: Uuid,
    pub username: String,
    pub user_type: MemberRole,
}

impl ApiRequest for AddMemberRequest {
    type Response = DetailResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/organizations/{}/add_member/", self.organization)
    }
}

get_by_id!(GetInviteRequest(String) => "/invites/{}/", InviteDetails);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptInviteRequest {
    #[serde(skip)]
    pub token: String,
}

impl ApiRequest for AcceptInviteRequest {
    type Response = InviteAccepted;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/invites/{}/accept/", self.token)
    }
}

// =========================================================
// Measurements, Airports
// =========================================================

get_collection!(ListMeasurementsRequest => "/measurement/", Vec<Measurement>);
get_by_id!(GetMeasurementRequest(Uuid) => "/measurement/{}/", Measurement);
get_by_id!(GetAirportRequest(Uuid) => "/airport/{}/", Airport);

// =========================================================
// Files & Spectral Records
// =========================================================

/// Path of the multipart upload endpoint. Uploads bypass [`ApiRequest`]
/// since the body is form data, not JSON.
pub const FILE_UPLOAD_PATH: &str = "/file/upload/";

get_collection!(ListSpectralRecordsRequest => "/spectral-record/", Vec<SpectralRecord>);
get_by_id!(GetSpectralRecordRequest(Uuid) => "/spectral-record/{}/", SpectralRecord);
get_by_id!(GetEvolutionRequest(Uuid) => "/spectral-record/{}/evolution/", EvolutionData);
get_by_id!(GetSpectrumRequest(Uuid) => "/spectral-record/{}/spectrum/", SpectrumData);
get_by_id!(
    ListArtifactsRequest(Uuid) => "/spectral-record-artifact/?record_id={}",
    Vec<SpectralArtifact>
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSpectralRecordRequest {
    pub raw_file_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Uuid>,
}

impl ApiRequest for CreateSpectralRecordRequest {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/spectral-record/create/";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_parameters_are_not_serialized() {
        let id = Uuid::parse_str("9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56").unwrap();
        let req = AddMemberRequest {
            organization: id,
            username: "jdoe".into(),
            user_type: MemberRole::Admin,
        };

        assert_eq!(req.path(), format!("/organizations/{}/add_member/", id));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "username": "jdoe", "user_type": "AD" })
        );
    }

    #[test]
    fn test_partial_update_sends_only_set_fields() {
        let req = UpdateProfileRequest {
            email: Some("jdoe@example.com".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "email": "jdoe@example.com" })
        );
    }

    #[test]
    fn test_update_logbook_flattens_payload() {
        let detector = Uuid::parse_str("9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56").unwrap();
        let entry = Uuid::parse_str("0b5c4c8e-5b8e-4f7a-9d37-5b8a2c1d0e11").unwrap();
        let req = UpdateLogbookEntryRequest {
            id: entry,
            payload: LogbookPayload {
                detector,
                text: "Checked detector".into(),
                entry_type: EntryType::Note,
                public: true,
                source: EntrySource::Web,
                latitude: None,
                longitude: None,
                altitude: None,
            },
        };

        assert_eq!(req.path(), format!("/logbook/{}/", entry));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "detector": detector,
                "text": "Checked detector",
                "entry_type": "note",
                "public": true,
                "source": "web"
            })
        );
    }

    #[test]
    fn test_static_paths() {
        assert_eq!(ListDetectorsRequest::default().path(), "/detector/");
        assert_eq!(LogoutRequest::default().path(), "/logout/");
        assert_eq!(
            ListLogbookRequest {
                detector: Uuid::nil()
            }
            .path(),
            format!("/logbook/?detector={}", Uuid::nil())
        );
    }

    #[test]
    fn test_detector_type_and_qr_paths() {
        let id = Uuid::parse_str("9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56").unwrap();
        assert_eq!(
            GetDetectorTypeRequest::new(id).path(),
            format!("/detector-type/{}/", id)
        );
        assert_eq!(detector_qr_path(id, true), format!("/detector/{}/qr/?label=true", id));
        assert_eq!(detector_qr_filename("SN-001"), "detector_SN-001_qr.png");
    }
}

use super::*;
use crate::fetch::FetchState;
use crate::request::{MockHttpClient, RequestBody};
use dosportal_shared::protocol::{GetProfileRequest, ListDetectorsRequest};
use serde_json::json;
use std::rc::Rc;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "http://portal.test/api";

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn api_with(token: Option<&str>, send_cookies: bool) -> (PortalApi<Rc<MockHttpClient>>, Rc<MockHttpClient>) {
    let client = Rc::new(MockHttpClient::new());
    let api = PortalApi::new(
        ApiConfig::new(BASE, send_cookies),
        Rc::clone(&client),
        AuthHeader::from_token(token),
    );
    (api, client)
}

fn api(token: Option<&str>) -> (PortalApi<Rc<MockHttpClient>>, Rc<MockHttpClient>) {
    api_with(token, false)
}

fn logbook_item(id: Uuid, detector: Uuid, text: &str) -> Value {
    json!({
        "id": id,
        "detector": detector,
        "text": text,
        "entry_type": "note",
        "source": "web",
        "public": true,
        "created": "2024-03-15T14:30:00Z",
    })
}

// =========================================================
// 错误消息提取
// =========================================================

#[test]
fn test_error_message_prefers_detail() {
    let body = json!({ "detail": "Not found.", "error": "ignored" }).to_string();
    assert_eq!(error_message(404, &body), "Not found.");
}

#[test]
fn test_error_message_falls_back_to_error() {
    let body = json!({ "error": "Invalid file type" }).to_string();
    assert_eq!(error_message(400, &body), "Invalid file type");

    let body = json!({ "error": ["Bad value.", "Try again."] }).to_string();
    assert_eq!(error_message(400, &body), "Bad value. Try again.");
}

#[test]
fn test_error_message_without_json_uses_status() {
    assert_eq!(error_message(500, "<html>Server Error</html>"), "HTTP 500");
    assert_eq!(error_message(500, ""), "HTTP 500");
    assert_eq!(error_message(400, &json!({ "name": ["required"] }).to_string()), "HTTP 400");
}

// =========================================================
// 请求构造
// =========================================================

#[tokio::test]
async fn test_json_request_merges_headers() {
    let (api, client) = api(Some("abc123"));
    client.mock_response(&url("/user/profile/"), 200, json!({ "id": 1, "username": "jdoe" }));

    let profile = api.call(&GetProfileRequest::default()).await.unwrap();
    assert_eq!(profile.username, "jdoe");

    let req = client.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.headers.get("Authorization").map(String::as_str), Some("Token abc123"));
    assert_eq!(req.headers.get("Content-Type").map(String::as_str), Some("application/json"));
    assert!(req.body.is_none());
    assert!(!req.send_cookies);
}

#[tokio::test]
async fn test_anonymous_request_has_no_auth_header() {
    let (api, client) = api(None);
    client.mock_response(&url("/detector/"), 200, json!([]));

    api.call(&ListDetectorsRequest::default()).await.unwrap();

    let req = client.last_request().unwrap();
    assert!(!req.headers.contains_key("Authorization"));
}

#[tokio::test]
async fn test_send_cookies_flag_follows_config() {
    let (api, client) = api_with(Some("abc123"), true);
    client.mock_response(&url("/detector/"), 200, json!([]));

    api.call(&ListDetectorsRequest::default()).await.unwrap();
    assert!(client.last_request().unwrap().send_cookies);
}

#[tokio::test]
async fn test_expired_token_is_login_required() {
    let (api, client) = api(Some("expired"));
    client.mock_response(&url("/detector/"), 401, json!({ "detail": "Invalid token." }));

    let result = api.call(&ListDetectorsRequest::default()).await;
    let state = FetchState::from_result(result);

    assert_eq!(state, FetchState::LoginRequired);
    assert_eq!(state.error().as_deref(), Some("Login required"));
    assert!(state.data().is_none());
}

#[tokio::test]
async fn test_server_error_without_body_message() {
    let (api, client) = api(Some("abc123"));
    client.mock_raw(&url("/detector/"), 500, "");

    let err = api.call(&ListDetectorsRequest::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP 500");
}

// =========================================================
// 文件上传
// =========================================================

fn log_upload(owner: Option<Uuid>) -> FileUpload {
    FileUpload {
        filename: "flight.txt".into(),
        file_type: "log".into(),
        owner,
        bytes: b"$HIST,1,2,3".to_vec(),
    }
}

#[tokio::test]
async fn test_upload_omits_content_type() {
    let (api, client) = api(Some("abc123"));
    let file_id = Uuid::new_v4();
    client.mock_response(&url("/file/upload/"), 201, json!({ "id": file_id }));

    let id = api.upload_file(log_upload(None)).await.unwrap();
    assert_eq!(id, file_id);

    let req = client.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    assert!(!req.headers.contains_key("Content-Type"));
    assert_eq!(req.headers.get("Authorization").map(String::as_str), Some("Token abc123"));

    let Some(RequestBody::Multipart(parts)) = req.body else {
        panic!("expected multipart body");
    };
    let names: Vec<&str> = parts
        .iter()
        .map(|p| match p {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name.as_str(),
        })
        .collect();
    assert_eq!(names, vec!["filename", "file_type", "file"]);
}

#[tokio::test]
async fn test_upload_log_creates_record() {
    let (api, client) = api(Some("abc123"));
    let owner = Uuid::new_v4();
    let file_id = Uuid::new_v4();
    let record_id = Uuid::new_v4();
    client.mock_response(&url("/file/upload/"), 201, json!({ "id": file_id }));
    client.mock_response(&url("/spectral-record/create/"), 201, json!({ "id": record_id }));

    let id = api
        .upload_log(log_upload(Some(owner)), "Flight OK123".into(), Some("  ".into()))
        .await
        .unwrap();
    assert_eq!(id, record_id);
    assert_eq!(client.request_count(), 2);

    let req = client.last_request().unwrap();
    let body: Value =
        serde_json::from_str(req.body.as_ref().and_then(RequestBody::as_json).unwrap()).unwrap();
    assert_eq!(body["raw_file_id"], json!(file_id));
    assert_eq!(body["name"], "Flight OK123");
    assert_eq!(body["owner"], json!(owner));
    assert!(body.get("description").is_none());
}

#[tokio::test]
async fn test_upload_failure_skips_record_creation() {
    let (api, client) = api(Some("abc123"));
    client.mock_response(&url("/file/upload/"), 400, json!({ "error": "Invalid file type" }));

    let err = api
        .upload_log(log_upload(None), "Flight".into(), None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid file type");
    assert_eq!(client.request_count(), 1);
}

// =========================================================
// 组合查询
// =========================================================

#[tokio::test]
async fn test_find_logbook_entry() {
    let (api, client) = api(Some("abc123"));
    let detector = Uuid::new_v4();
    let wanted = Uuid::new_v4();
    client.mock_response(
        &url(&format!("/logbook/?detector={}", detector)),
        200,
        json!([
            logbook_item(Uuid::new_v4(), detector, "Calibration"),
            logbook_item(wanted, detector, "Reset after flight"),
        ]),
    );

    let item = api.find_logbook_entry(detector, wanted).await.unwrap();
    assert_eq!(item.text, "Reset after flight");

    let err = api.find_logbook_entry(detector, Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Logbook entry not found");
}

#[tokio::test]
async fn test_spectral_charts_fail_together() {
    let (api, client) = api(Some("abc123"));
    let record = Uuid::new_v4();
    client.mock_response(
        &url(&format!("/spectral-record/{}/evolution/", record)),
        200,
        json!({ "evolution_values": [[0.0, 1.5], [10.0, 2.5]], "total_time": 10.0 }),
    );

    // 能谱端点未配置，返回 404
    let err = api.spectral_charts(record).await.unwrap_err();
    assert!(err.is_not_found());

    client.mock_response(
        &url(&format!("/spectral-record/{}/spectrum/", record)),
        200,
        json!({ "spectrum_values": [[1.0, 3.0]], "total_time": 10.0, "calib": false }),
    );
    let (evolution, spectrum) = api.spectral_charts(record).await.unwrap();
    assert_eq!(evolution.evolution_values.len(), 2);
    assert_eq!(spectrum.spectrum_values, vec![(1.0, 3.0)]);
}

#[test]
fn test_detector_qr_request_carries_credentials() {
    let (api, client) = api_with(Some("abc123"), true);
    let detector = Uuid::parse_str("9f1f0e6a-2f43-4b1d-8a34-0c1e2b3d4f56").unwrap();

    let req = api.detector_qr_request(detector);

    assert_eq!(req.url, url(&format!("/detector/{}/qr/?label=true", detector)));
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(
        req.headers.get("Authorization").map(String::as_str),
        Some("Token abc123")
    );
    assert!(!req.headers.contains_key(HEADER_CONTENT_TYPE));
    assert!(req.body.is_none());
    assert!(req.send_cookies);
    assert_eq!(client.request_count(), 0);
}

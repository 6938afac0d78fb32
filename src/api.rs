//! API 调用约定
//!
//! 所有页面请求都经过 [`PortalApi`]：
//! 1. 合并 `Content-Type: application/json`（multipart 除外）与认证头
//! 2. 按配置决定是否携带 Cookie
//! 3. 非 2xx 响应转换为 [`PortalError::Http`]，消息取自响应体的 `detail` 或 `error`

use crate::config::ApiConfig;
use crate::error::{PortalError, PortalResult};
use crate::request::{FormPart, HttpClient, HttpRequest, HttpResponse};
use crate::session::AuthHeader;
use dosportal_shared::protocol::{
    ApiRequest, CreateSpectralRecordRequest, CreatedResponse, FILE_UPLOAD_PATH, GetEvolutionRequest,
    GetSpectrumRequest, HttpMethod, ListLogbookRequest, detector_qr_path,
};
use dosportal_shared::{CONTENT_TYPE_JSON, EvolutionData, HEADER_CONTENT_TYPE, LogbookItem, SpectrumData};
use serde_json::Value;
use uuid::Uuid;

/// 文件上传表单
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub filename: String,
    /// 例如 `log`、`trajectory`、`document`
    pub file_type: String,
    pub owner: Option<Uuid>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    fn into_parts(self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::Text {
                name: "filename".into(),
                value: self.filename.clone(),
            },
            FormPart::Text {
                name: "file_type".into(),
                value: self.file_type,
            },
        ];
        if let Some(owner) = self.owner {
            parts.push(FormPart::Text {
                name: "owner".into(),
                value: owner.to_string(),
            });
        }
        parts.push(FormPart::File {
            name: "file".into(),
            filename: self.filename,
            bytes: self.bytes,
        });
        parts
    }
}

/// 从失败响应中提取展示给用户的消息
///
/// 优先 `detail`，其次 `error`，都没有时为 `HTTP <status>`。
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(message_text))
        })
        .unwrap_or_else(|| format!("HTTP {}", status))
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// 检查状态码，非 2xx 转为错误
pub fn check_response(resp: HttpResponse) -> PortalResult<HttpResponse> {
    if resp.is_success() {
        Ok(resp)
    } else {
        Err(PortalError::Http {
            status: resp.status,
            message: error_message(resp.status, &resp.body),
        })
    }
}

/// 绑定了认证头的 API 客户端
#[derive(Clone)]
pub struct PortalApi<C> {
    config: ApiConfig,
    client: C,
    auth: AuthHeader,
}

impl<C: HttpClient> PortalApi<C> {
    pub fn new(config: ApiConfig, client: C, auth: AuthHeader) -> Self {
        Self {
            config,
            client,
            auth,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn auth_header(&self) -> &AuthHeader {
        &self.auth
    }

    /// 按约定构造请求：认证头、Cookie 标志，JSON 请求额外带 Content-Type
    pub fn prepare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(&self.config.url(path), method)
            .with_headers(self.auth.pairs())
            .with_cookies(self.config.send_cookies)
    }

    fn build<R: ApiRequest>(&self, req: &R) -> PortalResult<HttpRequest> {
        let http = self
            .prepare(R::METHOD, &req.path())
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        if R::METHOD == HttpMethod::Get {
            return Ok(http);
        }
        Ok(http.with_json(serde_json::to_string(req)?))
    }

    /// 发送请求并检查状态码，不解析响应体
    pub async fn send(&self, req: HttpRequest) -> PortalResult<HttpResponse> {
        log::debug!("[Api] {} {}", req.method.as_str(), req.url);
        let resp = self.client.send(req).await?;
        check_response(resp)
    }

    /// 调用一个已声明的端点并解析响应
    pub async fn call<R: ApiRequest>(&self, req: &R) -> PortalResult<R::Response> {
        let http = self.build(req)?;
        self.send(http).await?.json()
    }

    // =========================================================
    // 组合操作
    // =========================================================

    /// multipart 上传，返回新文件的 id
    pub async fn upload_file(&self, upload: FileUpload) -> PortalResult<Uuid> {
        let http = self
            .prepare(HttpMethod::Post, FILE_UPLOAD_PATH)
            .with_multipart(upload.into_parts());
        let created: CreatedResponse = self.send(http).await?.json()?;
        created
            .id
            .ok_or_else(|| PortalError::Decode("upload response has no id".into()))
    }

    /// 上传日志文件并为其创建能谱记录，返回记录 id
    pub async fn upload_log(
        &self,
        upload: FileUpload,
        record_name: String,
        description: Option<String>,
    ) -> PortalResult<Uuid> {
        let owner = upload.owner;
        let raw_file_id = self.upload_file(upload).await?;
        let created = self
            .call(&CreateSpectralRecordRequest {
                raw_file_id,
                name: record_name,
                description: description.filter(|d| !d.trim().is_empty()),
                owner,
            })
            .await?;
        created
            .id
            .ok_or_else(|| PortalError::Decode("spectral record response has no id".into()))
    }

    /// 探测器二维码标签的下载请求
    ///
    /// 响应是 PNG 图片而不是 JSON，由调用方自行发送并保存。
    pub fn detector_qr_request(&self, detector: Uuid) -> HttpRequest {
        self.prepare(HttpMethod::Get, &detector_qr_path(detector, true))
    }

    /// 同时加载时间演化与能谱数据，任一失败即失败
    pub async fn spectral_charts(&self, record: Uuid) -> PortalResult<(EvolutionData, SpectrumData)> {
        let evolution = GetEvolutionRequest::new(record);
        let spectrum = GetSpectrumRequest::new(record);
        futures::try_join!(self.call(&evolution), self.call(&spectrum))
    }

    /// 日志条目没有单独的读取端点，从探测器的条目列表中查找
    pub async fn find_logbook_entry(&self, detector: Uuid, entry: Uuid) -> PortalResult<LogbookItem> {
        self.call(&ListLogbookRequest { detector })
            .await?
            .into_iter()
            .find(|item| item.id == entry)
            .ok_or_else(|| PortalError::Http {
                status: 404,
                message: "Logbook entry not found".into(),
            })
    }
}

#[cfg(test)]
mod tests;

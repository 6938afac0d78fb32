use crate::error::{PortalError, PortalResult};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[cfg(test)]
use std::cell::RefCell;

pub use dosportal_shared::protocol::HttpMethod;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// multipart 表单的一个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        bytes: Vec<u8>,
    },
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// 已序列化的 JSON 文本
    Json(String),
    /// multipart/form-data，由底层客户端负责生成 boundary 与 Content-Type
    Multipart(Vec<FormPart>),
}

impl RequestBody {
    pub fn as_json(&self) -> Option<&str> {
        match self {
            RequestBody::Json(text) => Some(text),
            RequestBody::Multipart(_) => None,
        }
    }
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
    /// 浏览器端对应 `credentials: include`
    pub send_cookies: bool,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
            send_cookies: false,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.extend(headers);
        self
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    pub fn with_cookies(mut self, send_cookies: bool) -> Self {
        self.send_cookies = send_cookies;
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体，空响应体按 `null` 处理（204 等）
    pub fn json<T: DeserializeOwned>(&self) -> PortalResult<T> {
        let text = self.body.trim();
        let text = if text.is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(PortalError::from)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 浏览器中的 future 不是 `Send` 的，因此使用 `?Send`。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// 只有传输层失败才返回 `Err`，任何 HTTP 状态码都作为 `Ok` 返回
    async fn send(&self, req: HttpRequest) -> PortalResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient + ?Sized> HttpClient for std::rc::Rc<C> {
    async fn send(&self, req: HttpRequest) -> PortalResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
#[derive(Debug, Clone)]
enum MockReply {
    Respond(u16, String),
    Fail(String),
}

/// 按 URL 返回预设响应，并记录所有发出的请求
#[cfg(test)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<String, MockReply>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Respond(status, body.to_string()));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Respond(status, body.to_string()));
    }

    /// 模拟网络中断
    pub fn mock_network_error(&self, url: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Fail("connection refused".into()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> PortalResult<HttpResponse> {
        let url = req.url.clone();
        self.requests.borrow_mut().push(req);

        let reply = self.responses.borrow().get(&url).cloned();
        match reply {
            Some(MockReply::Respond(status, body)) => Ok(HttpResponse { status, body }),
            Some(MockReply::Fail(reason)) => Err(PortalError::network(reason)),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

/// 基于 reqwest 的真实客户端，测试中对接本地桩服务
#[cfg(test)]
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(test)]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> PortalResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        match req.body {
            Some(RequestBody::Json(body)) => builder = builder.body(body),
            Some(RequestBody::Multipart(parts)) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match part {
                        FormPart::Text { name, value } => form.text(name, value),
                        FormPart::File {
                            name,
                            filename,
                            bytes,
                        } => form.part(
                            name,
                            reqwest::multipart::Part::bytes(bytes).file_name(filename),
                        ),
                    };
                }
                builder = builder.multipart(form);
            }
            None => {}
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| PortalError::network(format!("Reqwest Error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| PortalError::network(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_decodes_as_unit() {
        let resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.json::<()>().unwrap();
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let resp = HttpResponse {
            status: 200,
            body: "<html>".into(),
        };
        let err = resp.json::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, PortalError::Decode(_)));
    }
}

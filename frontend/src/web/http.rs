//! 浏览器 HTTP 客户端
//!
//! 基于 `gloo-net` 实现核心库的 [`HttpClient`]，multipart 请求体转换为 `FormData`，
//! 由浏览器生成 boundary 与 Content-Type。二维码等二进制文件通过 [`FetchClient::download`] 保存。

use dosportal::api::error_message;
use dosportal::error::{PortalError, PortalResult};
use dosportal::request::{FormPart, HttpClient, HttpMethod, HttpRequest, HttpResponse, RequestBody};
use gloo_net::http::{Method, Request, RequestBuilder};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, FormData, HtmlAnchorElement, RequestCredentials, Url};

/// 基于 fetch 的客户端，无状态，可随意复制
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn js_error(e: JsValue) -> PortalError {
    PortalError::network(format!("{:?}", e))
}

/// 把 multipart 字段写入 `FormData`
fn form_data(parts: Vec<FormPart>) -> PortalResult<FormData> {
    let form = FormData::new().map_err(js_error)?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => {
                form.append_with_str(&name, &value).map_err(js_error)?;
            }
            FormPart::File {
                name,
                filename,
                bytes,
            } => {
                let chunk = js_sys::Uint8Array::from(bytes.as_slice());
                let blob = Blob::new_with_u8_array_sequence(&js_sys::Array::of1(&chunk))
                    .map_err(js_error)?;
                form.append_with_blob_and_filename(&name, &blob, &filename)
                    .map_err(js_error)?;
            }
        }
    }
    Ok(form)
}

/// 把核心库的请求转换为 gloo-net 请求
fn build(req: HttpRequest) -> PortalResult<Request> {
    let mut builder = RequestBuilder::new(&req.url).method(method(req.method));

    for (k, v) in &req.headers {
        builder = builder.header(k, v);
    }
    if req.send_cookies {
        builder = builder.credentials(RequestCredentials::Include);
    }

    match req.body {
        Some(RequestBody::Json(body)) => builder.body(body),
        Some(RequestBody::Multipart(parts)) => builder.body(form_data(parts)?),
        None => builder.build(),
    }
    .map_err(|e| PortalError::network(e.to_string()))
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> PortalResult<HttpResponse> {
        let response = build(req)?
            .send()
            .await
            .map_err(|e| PortalError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PortalError::network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

impl FetchClient {
    /// 下载二进制响应并让浏览器保存为 `filename`
    ///
    /// 请求需要认证头，不能直接用 `<a download>` 链接。
    pub async fn download(&self, req: HttpRequest, filename: &str) -> PortalResult<()> {
        let response = build(req)?
            .send()
            .await
            .map_err(|e| PortalError::network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .binary()
            .await
            .map_err(|e| PortalError::network(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(PortalError::Http {
                status,
                message: error_message(status, &String::from_utf8_lossy(&bytes)),
            });
        }

        save_bytes(&bytes, filename)
    }
}

/// 通过临时的 object URL 触发浏览器下载
fn save_bytes(bytes: &[u8], filename: &str) -> PortalResult<()> {
    let chunk = js_sys::Uint8Array::from(bytes);
    let blob = Blob::new_with_u8_array_sequence(&js_sys::Array::of1(&chunk)).map_err(js_error)?;
    let href = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| PortalError::network("document is not available"))?;
    let link: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| PortalError::network("failed to create download link"))?;
    link.set_href(&href);
    link.set_download(filename);
    link.click();

    Url::revoke_object_url(&href).map_err(js_error)
}

//! 读取 `<input type="file">` 中选中的文件

use dosportal::error::{PortalError, PortalResult};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

/// 第一个选中文件的 (文件名, 内容)，未选择时为 `None`
pub async fn read_selected(input: &HtmlInputElement) -> PortalResult<Option<(String, Vec<u8>)>> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| PortalError::network(format!("Could not read file: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    log::debug!("Read {} ({} bytes)", file.name(), bytes.len());
    Ok(Some((file.name(), bytes)))
}

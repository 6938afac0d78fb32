//! LocalStorage 凭据存储
//!
//! 令牌经 gloo-storage 序列化为 JSON 字符串，保存在 `dosportal_token` 键下。

use dosportal::store::{CredentialStore, TOKEN_STORAGE_KEY};
use gloo_storage::{LocalStorage, Storage};

/// 浏览器 localStorage 实现
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl CredentialStore for BrowserStore {
    fn load(&self) -> Option<String> {
        LocalStorage::get::<String>(TOKEN_STORAGE_KEY).ok()
    }

    fn save(&self, token: &str) {
        if let Err(e) = LocalStorage::set(TOKEN_STORAGE_KEY, token) {
            log::warn!("[Storage] Failed to persist credential: {}", e);
        }
    }

    fn clear(&self) {
        LocalStorage::delete(TOKEN_STORAGE_KEY);
    }
}

//! 凭据存储
//!
//! 会话管理器只通过 [`CredentialStore`] 读写令牌，浏览器端实现为 localStorage。

use std::sync::{Arc, Mutex, PoisonError};

/// localStorage 中保存令牌的键名
pub const TOKEN_STORAGE_KEY: &str = "dosportal_token";

pub trait CredentialStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// 内存实现，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.save(token);
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

use thiserror::Error;

// =========================================================
// 错误类型
// =========================================================

/// 客户端统一错误
///
/// `Display` 的输出直接展示在页面上，因此 `Http` 只输出服务端给出的消息。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortalError {
    /// 网络或传输层失败（请求根本没有得到响应）
    #[error("Request failed: {0}")]
    Network(String),
    /// 非 2xx 响应，`message` 取自响应体的 `detail`/`error`，否则为 `HTTP <status>`
    #[error("{message}")]
    Http { status: u16, message: String },
    /// 客户端校验失败，不会发出请求
    #[error("{0}")]
    Validation(String),
    /// 响应体不是预期的 JSON
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl PortalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// HTTP 状态码（仅 `Http` 变体）
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401/403：需要重新登录或无权访问
    pub fn is_auth_required(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(e: serde_json::Error) -> Self {
        PortalError::Decode(e.to_string())
    }
}

pub type PortalResult<T> = Result<T, PortalError>;

//! 构建期配置
//!
//! 浏览器端没有运行时环境变量，所有配置都在编译时通过 `option_env!` 注入，
//! 未设置时使用下面的默认值。

// =========================================================
// 默认值 (Defaults)
// =========================================================

const DEFAULT_API_URL: &str = "http://web:8000/api";
const DEFAULT_GIT_COMMIT: &str = "dev";
const DEFAULT_GIT_BRANCH: &str = "unknown";
const SHORT_COMMIT_LEN: usize = 7;

/// API 访问配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API 基地址，不带结尾 `/`，例如 `http://web:8000/api`
    pub api_base: String,
    /// 站点根地址，即去掉结尾 `/api` 的基地址，用于拼接媒体文件链接
    pub origin_base: String,
    /// 请求是否携带浏览器 Cookie
    pub send_cookies: bool,
}

impl ApiConfig {
    pub fn new(api_base: &str, send_cookies: bool) -> Self {
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        let origin_base = api_base
            .strip_suffix("/api")
            .unwrap_or(&api_base)
            .to_string();
        Self {
            api_base,
            origin_base,
            send_cookies,
        }
    }

    /// 读取 `DOSPORTAL_API_URL` 与 `DOSPORTAL_SEND_COOKIES`
    pub fn from_build_env() -> Self {
        let base = option_env!("DOSPORTAL_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL);
        let send_cookies = option_env!("DOSPORTAL_SEND_COOKIES")
            .map(parse_flag)
            .unwrap_or(false);
        Self::new(base, send_cookies)
    }

    /// 拼接 API 路径，`path` 以 `/` 开头
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }

    /// 服务端返回的媒体路径可能是相对路径，这里补全为绝对地址
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.origin_base, path)
        } else {
            format!("{}/{}", self.origin_base, path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// 前端构建版本信息，显示在页脚
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub git_commit: String,
    pub git_branch: String,
}

impl BuildInfo {
    pub fn new(commit: Option<&str>, branch: Option<&str>) -> Self {
        let pick = |v: Option<&str>, default: &str| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            git_commit: pick(commit, DEFAULT_GIT_COMMIT),
            git_branch: pick(branch, DEFAULT_GIT_BRANCH),
        }
    }

    /// 读取 `GIT_COMMIT` 与 `GIT_BRANCH`
    pub fn from_build_env() -> Self {
        Self::new(option_env!("GIT_COMMIT"), option_env!("GIT_BRANCH"))
    }

    pub fn short_commit(&self) -> &str {
        match self.git_commit.char_indices().nth(SHORT_COMMIT_LEN) {
            Some((idx, _)) => &self.git_commit[..idx],
            None => &self.git_commit,
        }
    }

    /// `<branch>@<commit7>`
    pub fn label(&self) -> String {
        format!("{}@{}", self.git_branch, self.short_commit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_derived_from_api_base() {
        let cfg = ApiConfig::new("https://portal.example.org/api/", false);
        assert_eq!(cfg.api_base, "https://portal.example.org/api");
        assert_eq!(cfg.origin_base, "https://portal.example.org");
        assert_eq!(cfg.url("/detector/"), "https://portal.example.org/api/detector/");
        assert_eq!(
            cfg.media_url("/minio/files/a.txt"),
            "https://portal.example.org/minio/files/a.txt"
        );
    }

    #[test]
    fn test_origin_without_api_suffix() {
        let cfg = ApiConfig::new("http://localhost:8000", true);
        assert_eq!(cfg.origin_base, "http://localhost:8000");
        assert!(cfg.send_cookies);
    }

    #[test]
    fn test_build_info_defaults() {
        let info = BuildInfo::new(None, Some(" "));
        assert_eq!(info.label(), "unknown@dev");

        let info = BuildInfo::new(Some("0123456789abcdef"), Some("main"));
        assert_eq!(info.short_commit(), "0123456");
        assert_eq!(info.label(), "main@0123456");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}

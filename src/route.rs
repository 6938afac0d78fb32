//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM：定义应用的全部路由、路径解析与生成，
//! 以及每个路由的认证要求。

use std::fmt::Display;
use url::form_urlencoded;
use uuid::Uuid;

const NEXT_PARAM: &str = "next";

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由，公开)
    #[default]
    Home,
    /// 登录页，`next` 为登录成功后返回的路径
    Login { next: Option<String> },
    Signup,
    SignupSuccess,
    /// 探测器列表
    Logbooks,
    DetectorLogbook { detector: Uuid },
    LogbookEntryCreate { detector: Uuid },
    LogbookEntryEdit { detector: Uuid, entry: Uuid },
    DetectorCreate,
    Profile,
    OrganizationCreate,
    OrganizationDetail { id: Uuid },
    InviteAccept { token: String },
    Measurements,
    MeasurementDetail { id: Uuid },
    /// 能谱记录列表
    Logs,
    LogsUpload,
    SpectralRecordDetail { id: Uuid },
    SpectralRecordStatus { id: Uuid },
    FileUpload,
    UserDetail { id: i64 },
    AirportDetail { id: Uuid },
}

impl AppRoute {
    /// 解析 path 与 query，未知路径返回 `None`
    pub fn parse(path: &str, query: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login {
                next: query_param(query, NEXT_PARAM),
            },
            ["signup"] => Self::Signup,
            ["signup", "success"] => Self::SignupSuccess,
            ["logbooks"] => Self::Logbooks,
            ["logbook", id] => Self::DetectorLogbook { detector: parse_uuid(id)? },
            ["logbook", id, "create"] => Self::LogbookEntryCreate { detector: parse_uuid(id)? },
            ["logbook", id, "edit", entry] => Self::LogbookEntryEdit {
                detector: parse_uuid(id)?,
                entry: parse_uuid(entry)?,
            },
            ["detector", "create"] => Self::DetectorCreate,
            ["profile"] => Self::Profile,
            ["organization", "create"] => Self::OrganizationCreate,
            ["organization", id] => Self::OrganizationDetail { id: parse_uuid(id)? },
            ["invite", token] => Self::InviteAccept {
                token: (*token).to_string(),
            },
            ["measurements"] => Self::Measurements,
            ["measurement", id] => Self::MeasurementDetail { id: parse_uuid(id)? },
            ["logs"] => Self::Logs,
            ["logs", "upload"] => Self::LogsUpload,
            ["spectral-record", id] => Self::SpectralRecordDetail { id: parse_uuid(id)? },
            ["spectral-record-status", id] => Self::SpectralRecordStatus { id: parse_uuid(id)? },
            ["file", "upload"] => Self::FileUpload,
            ["user", id] => Self::UserDetail {
                id: id.parse().ok()?,
            },
            ["airport", id] => Self::AirportDetail { id: parse_uuid(id)? },
            _ => return None,
        };
        Some(route)
    }

    /// 获取路由对应的 URL (path + query)
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login { next: None } => "/login".into(),
            Self::Login { next: Some(next) } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(NEXT_PARAM, next)
                    .finish();
                format!("/login?{}", query)
            }
            Self::Signup => "/signup".into(),
            Self::SignupSuccess => "/signup/success".into(),
            Self::Logbooks => "/logbooks".into(),
            Self::DetectorLogbook { detector } => format!("/logbook/{}", detector),
            Self::LogbookEntryCreate { detector } => format!("/logbook/{}/create", detector),
            Self::LogbookEntryEdit { detector, entry } => {
                format!("/logbook/{}/edit/{}", detector, entry)
            }
            Self::DetectorCreate => "/detector/create".into(),
            Self::Profile => "/profile".into(),
            Self::OrganizationCreate => "/organization/create".into(),
            Self::OrganizationDetail { id } => format!("/organization/{}", id),
            Self::InviteAccept { token } => format!("/invite/{}", token),
            Self::Measurements => "/measurements".into(),
            Self::MeasurementDetail { id } => format!("/measurement/{}", id),
            Self::Logs => "/logs".into(),
            Self::LogsUpload => "/logs/upload".into(),
            Self::SpectralRecordDetail { id } => format!("/spectral-record/{}", id),
            Self::SpectralRecordStatus { id } => format!("/spectral-record-status/{}", id),
            Self::FileUpload => "/file/upload".into(),
            Self::UserDetail { id } => format!("/user/{}", id),
            Self::AirportDetail { id } => format!("/airport/{}", id),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Home | Self::Login { .. } | Self::Signup | Self::SignupSuccess
        )
    }

    /// 已认证用户应离开的路由（登录、注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::Signup)
    }

    /// 未认证访问本路由时的重定向目标，带上返回路径
    pub fn auth_failure_redirect(&self) -> Self {
        Self::Login {
            next: Some(self.to_path()),
        }
    }

    /// 登录成功后的目标：`next` 指向站内受保护页面时返回该页面，否则回首页
    pub fn auth_success_redirect(next: Option<&str>) -> Self {
        next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
            .and_then(|n| {
                let (path, query) = n.split_once('?').unwrap_or((n, ""));
                Self::parse(path, query)
            })
            .filter(Self::requires_auth)
            .unwrap_or(Self::Home)
    }

    /// 未知路径的重定向目标
    pub fn not_found_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

fn parse_uuid(segment: &str) -> Option<Uuid> {
    Uuid::parse_str(segment).ok()
}

fn query_param(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

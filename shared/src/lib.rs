use serde::{Deserialize, Serialize};
use std::fmt;

pub mod date;
pub mod protocol;

pub use protocol::{
    ApiEnvelope, ApiRequest, FieldErrors, HttpMethod, IndividualRegisterRequest, LoginRequest,
    OrgRegisterRequest, SuperAdminRegisterRequest,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const MIME_JSON_API: &str = "application/vnd.api+json";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 账户类型
///
/// 后端历史上同时使用过字符串 (`individual`) 与数字编码 (`"1"`)，两者都接受。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserType {
    Individual,
    Organisation,
    SuperAdmin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Individual => "individual",
            UserType::Organisation => "organisation",
            UserType::SuperAdmin => "superadmin",
        }
    }

    /// 解析角色字符串，未知值返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "individual" | "1" => Some(UserType::Individual),
            "organisation" | "organization" | "2" => Some(UserType::Organisation),
            "superadmin" | "super_admin" | "3" => Some(UserType::SuperAdmin),
            _ => None,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 登录接口返回的用户资料
///
/// 除已知字段外，其余字段原样保存在 `extra` 中，便于页面读取。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(
        rename = "accessToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,

    /// 原始角色值（字符串或数字），用 `role()` 解析
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// 原始角色字符串（数字编码会被转成字符串）
    pub fn role_raw(&self) -> Option<String> {
        match self.user_type.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<UserType> {
        self.role_raw().as_deref().and_then(UserType::parse)
    }

    /// 用户 ID 的路径片段形式
    pub fn user_id_segment(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
            && self.user_type.is_none()
            && self.user_id.is_none()
            && self.name.is_none()
            && self.org_name.is_none()
            && self.email.is_none()
            && self.extra.is_empty()
    }
}

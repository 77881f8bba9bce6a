use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Case-insensitive parse, e.g. `"post"` -> `Post`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    /// Only POST and PUT carry a JSON body.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The payload type found under `data` in the envelope.
    type Response: DeserializeOwned;
    /// The URL path.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Envelope
// =========================================================

/// 字段级校验错误：字段名 -> 错误消息列表
///
/// 后端有时返回 `{"email": "taken"}`，有时返回 `{"email": ["taken"]}`，两种都接受。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), vec![message.into()]);
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 某字段的第一条错误消息
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field)?.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Messages {
            Many(Vec<String>),
            One(String),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Map(BTreeMap<String, Messages>),
            Message(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Map(map) => FieldErrors(
                map.into_iter()
                    .map(|(k, v)| match v {
                        Messages::Many(list) => (k, list),
                        Messages::One(msg) => (k, vec![msg]),
                    })
                    .collect(),
            ),
            Raw::Message(msg) => FieldErrors::single("general", msg),
        })
    }
}

/// 后端统一响应外壳 `{status, data, message, errors}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T = serde_json::Value> {
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: bool,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    /// 统一的 "not ok" 结果
    pub fn failure(message: impl Into<String>, errors: Option<FieldErrors>) -> Self {
        Self {
            status: false,
            data: None,
            message: Some(message.into()),
            errors,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status
    }
}

/// `status` 兼容 `true` / `"success"` / `1` 等写法
fn deserialize_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => {
            matches!(s.to_ascii_lowercase().as_str(), "success" | "ok" | "true" | "1")
        }
        serde_json::Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        _ => false,
    })
}

// =========================================================
// Request Definitions
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

impl ApiRequest for LoginRequest {
    type Response = crate::UserProfile;
    const PATH: &'static str = "/api/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualRegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for IndividualRegisterRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/individual_register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgRegisterRequest {
    pub org_name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for OrgRegisterRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/org_register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperAdminRegisterRequest {
    pub admin_name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for SuperAdminRegisterRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/superadmin_register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

use std::fmt;

use azonation_shared::{ApiEnvelope, FieldErrors};

use crate::web::http::HttpError;

// =========================================================
// 错误类型枚举
// =========================================================

/// 后端调用失败的分类
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorKind {
    /// 请求未能到达后端（断网、CORS、超时等）
    Network,
    /// 非 2xx 响应
    Http(u16),
    /// 后端返回的字段级校验错误，原样透传给 UI
    Validation(FieldErrors),
    /// 响应体不是期望的 JSON
    Parse,
}

impl ApiErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Http(_) => "HTTP_ERROR",
            ApiErrorKind::Validation(_) => "VALIDATION_ERROR",
            ApiErrorKind::Parse => "PARSE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSpan {
    /// 操作名称，如 "session.authenticate", "logo.fetch"
    pub operation: String,
    pub detail: Option<String>,
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    spans: Vec<ErrorSpan>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            spans: Vec::new(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn http(status: u16) -> Self {
        Self::new(ApiErrorKind::Http(status), format!("HTTP {}", status))
    }

    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self::new(ApiErrorKind::Validation(errors), message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// 添加操作追踪
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match &self.kind {
            ApiErrorKind::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// 转换为统一的 "not ok" 响应
    pub fn into_envelope<T>(self) -> ApiEnvelope<T> {
        let message = self.message.clone();
        match self.kind {
            ApiErrorKind::Validation(errors) => ApiEnvelope::failure(message, Some(errors)),
            _ => ApiEnvelope::failure(message, None),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(msg) => ApiError::parse(msg),
            other => ApiError::network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_trace() {
        let err = ApiError::http(500)
            .in_op("api.call")
            .in_op_with("session.call_protected", "/api/members");
        assert_eq!(
            err.to_string(),
            "[HTTP_ERROR] HTTP 500 | trace: api.call -> session.call_protected(/api/members)"
        );
    }

    #[test]
    fn test_validation_errors_survive_envelope_conversion() {
        let errors = FieldErrors::single("email", "The email field is required.");
        let envelope: ApiEnvelope = ApiError::validation("Invalid", errors.clone()).into_envelope();
        assert!(!envelope.status);
        assert_eq!(envelope.errors, Some(errors));
        assert_eq!(envelope.message.as_deref(), Some("Invalid"));
    }

    #[test]
    fn test_network_error_has_no_field_errors() {
        let envelope: ApiEnvelope = ApiError::network("offline").into_envelope();
        assert!(!envelope.status);
        assert!(envelope.errors.is_none());
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_http_error_mapping() {
        let err: ApiError = HttpError::NetworkError("refused".into()).into();
        assert_eq!(err.kind, ApiErrorKind::Network);
        let err: ApiError = HttpError::ResponseParseFailed("bad".into()).into();
        assert_eq!(err.kind, ApiErrorKind::Parse);
    }
}

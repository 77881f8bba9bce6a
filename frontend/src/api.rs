//! 后端 REST 客户端
//!
//! 负责 URL 拼接、请求头与响应外壳解析，不持有会话状态。
//! 令牌由调用方（会话存储）传入。

use azonation_shared::{
    ApiEnvelope, ApiRequest, HEADER_ACCEPT, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
    HttpMethod, MIME_JSON_API,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiErrorKind, ApiResult};
use crate::web::http::{HttpClient, HttpRequest, HttpResponse, MultipartForm};

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient<C> {
    pub base_url: String,
    http: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// 绝对 URL 原样返回，其余拼接到 base_url 之后
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, endpoint: &str, method: HttpMethod, token: Option<&str>) -> HttpRequest {
        let req = HttpRequest::new(&self.url(endpoint), method).with_header(HEADER_ACCEPT, MIME_JSON_API);
        match token {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
            None => req,
        }
    }

    /// JSON 调用；仅 POST / PUT 携带请求体
    pub async fn call(
        &self,
        endpoint: &str,
        body: Option<&Value>,
        method: HttpMethod,
        token: Option<&str>,
    ) -> ApiResult<ApiEnvelope> {
        let mut req = self
            .request(endpoint, method, token)
            .with_header(HEADER_CONTENT_TYPE, MIME_JSON_API);
        if method.carries_body() {
            req = req.with_json(body.unwrap_or(&Value::Object(Default::default())));
        }

        let resp = self
            .http
            .send(req)
            .await
            .map_err(|e| ApiError::from(e).in_op_with("api.call", endpoint))?;
        read_envelope(&resp).map_err(|e| e.in_op_with("api.call", endpoint))
    }

    /// multipart 上传；不设置 Content-Type，由浏览器生成 boundary
    pub async fn upload(
        &self,
        endpoint: &str,
        form: MultipartForm,
        method: HttpMethod,
        token: Option<&str>,
    ) -> ApiResult<ApiEnvelope> {
        let req = self.request(endpoint, method, token).with_form(form);

        let resp = self
            .http
            .send(req)
            .await
            .map_err(|e| ApiError::from(e).in_op_with("api.upload", endpoint))?;
        read_envelope(&resp).map_err(|e| e.in_op_with("api.upload", endpoint))
    }

    /// 带类型的请求
    pub async fn send_request<R: ApiRequest>(
        &self,
        request: &R,
        token: Option<&str>,
    ) -> ApiResult<ApiEnvelope<R::Response>> {
        self.send_request_at(R::PATH, request, token).await
    }

    /// 同 `send_request`，但路径由调用方指定（如配置覆盖的登录地址）
    pub async fn send_request_at<R: ApiRequest>(
        &self,
        path: &str,
        request: &R,
        token: Option<&str>,
    ) -> ApiResult<ApiEnvelope<R::Response>> {
        let body = serde_json::to_value(request)?;
        let envelope = self.call(path, Some(&body), R::METHOD, token).await?;
        typed(envelope).map_err(|e| e.in_op_with("api.send_request", path))
    }

    /// 获取原始字节（图片等），不解析外壳
    pub async fn fetch_bytes(&self, url: &str, token: Option<&str>) -> ApiResult<HttpResponse> {
        let mut req = HttpRequest::new(&self.url(url), HttpMethod::Get);
        if let Some(token) = token {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        let resp = self
            .http
            .send(req)
            .await
            .map_err(|e| ApiError::from(e).in_op_with("api.fetch_bytes", url))?;
        if !resp.ok() {
            return Err(ApiError::http(resp.status).in_op_with("api.fetch_bytes", url));
        }
        Ok(resp)
    }
}

/// 解析响应外壳
///
/// 非 2xx：外壳带 errors 时作为校验错误透传，否则为 HTTP 错误。
fn read_envelope(resp: &HttpResponse) -> ApiResult<ApiEnvelope> {
    let parsed = resp.json::<ApiEnvelope>();

    if resp.ok() {
        return parsed.map_err(ApiError::from);
    }

    match parsed {
        Ok(ApiEnvelope {
            errors: Some(errors),
            message,
            ..
        }) if !errors.is_empty() => Err(ApiError::validation(
            message.unwrap_or_else(|| format!("HTTP {}", resp.status)),
            errors,
        )),
        Ok(ApiEnvelope {
            message: Some(message),
            ..
        }) => Err(ApiError::new(ApiErrorKind::Http(resp.status), message)),
        _ => Err(ApiError::http(resp.status)),
    }
}

/// 将 `data` 转为具体类型
fn typed<T: DeserializeOwned>(envelope: ApiEnvelope) -> ApiResult<ApiEnvelope<T>> {
    let data = envelope.data.map(serde_json::from_value).transpose()?;
    Ok(ApiEnvelope {
        status: envelope.status,
        data,
        message: envelope.message,
        errors: envelope.errors,
    })
}

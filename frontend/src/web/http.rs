//! HTTP 请求封装模块
//!
//! `HttpClient` trait 隔离浏览器 fetch，逻辑层只依赖 trait，单元测试使用 `MockHttpClient`。

use std::collections::HashMap;

use async_trait::async_trait;
use azonation_shared::HttpMethod;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应解析失败
    ResponseParseFailed(String),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "request build failed: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "network error: {}", msg),
            HttpError::ResponseParseFailed(msg) => write!(f, "response parse failed: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

// =========================================================
// 请求 / 响应
// =========================================================

/// multipart 表单的单个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// 文件上传使用的 multipart 表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, FormField)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .push((name.to_string(), FormField::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        self.fields.push((
            name.to_string(),
            FormField::File {
                file_name: file_name.to_string(),
                mime: mime.to_string(),
                bytes,
            },
        ));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body.to_string()));
        self
    }

    pub fn with_form(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| HttpError::ResponseParseFailed(e.to_string()))
    }
}

/// HTTP 客户端特性
/// (?Send) 是因为浏览器环境下 JsFuture 不是 Send 的
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: 浏览器 fetch
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build_form(form: &MultipartForm) -> Result<FormData, HttpError> {
        let data = FormData::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("FormData: {:?}", e)))?;

        for (name, field) in &form.fields {
            let appended = match field {
                FormField::Text(value) => data.append_with_str(name, value),
                FormField::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let parts = js_sys::Array::new();
                    parts.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                    let bag = BlobPropertyBag::new();
                    bag.set_type(mime);
                    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
                        .map_err(|e| HttpError::RequestBuildFailed(format!("Blob: {:?}", e)))?;
                    data.append_with_blob_and_filename(name, &blob, file_name)
                }
            };
            appended.map_err(|e| HttpError::RequestBuildFailed(format!("FormData field {}: {:?}", name, e)))?;
        }
        Ok(data)
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("Headers: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("header {}: {:?}", key, e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match &req.body {
            Some(RequestBody::Json(body)) => opts.set_body(&JsValue::from_str(body)),
            Some(RequestBody::Multipart(form)) => opts.set_body(&Self::build_form(form)?.into()),
            None => {}
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("window unavailable".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseParseFailed(format!("not a Response: {:?}", e)))?;

        let content_type = response.headers().get("content-type").ok().flatten();

        let buffer = response
            .array_buffer()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            content_type,
            body: js_sys::Uint8Array::new(&buffer).to_vec(),
        })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;

    /// 预设的响应
    #[derive(Clone)]
    pub enum MockReply {
        Respond {
            status: u16,
            content_type: Option<String>,
            body: Vec<u8>,
        },
        Fail(HttpError),
        /// 永不返回，用于测试超时
        Hang,
    }

    /// 记录的请求
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub method: HttpMethod,
        pub headers: HashMap<String, String>,
        pub body: Option<RequestBody>,
    }

    /// 按 "METHOD url"（忽略查询参数）匹配响应，未配置的返回 404
    pub struct MockHttpClient {
        replies: RefCell<HashMap<String, MockReply>>,
        pub requests: RefCell<Vec<RecordedRequest>>,
    }

    fn key(method: HttpMethod, url: &str) -> String {
        let url = url.split('?').next().unwrap_or(url);
        format!("{} {}", method.as_str(), url)
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self {
                replies: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub fn mock_json(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
            self.replies.borrow_mut().insert(
                key(method, url),
                MockReply::Respond {
                    status,
                    content_type: Some("application/json".to_string()),
                    body: body.to_string().into_bytes(),
                },
            );
        }

        pub fn mock_bytes(
            &self,
            method: HttpMethod,
            url: &str,
            status: u16,
            content_type: &str,
            body: Vec<u8>,
        ) {
            self.replies.borrow_mut().insert(
                key(method, url),
                MockReply::Respond {
                    status,
                    content_type: Some(content_type.to_string()),
                    body,
                },
            );
        }

        pub fn mock_reply(&self, method: HttpMethod, url: &str, reply: MockReply) {
            self.replies.borrow_mut().insert(key(method, url), reply);
        }

        pub fn last_request(&self) -> Option<RecordedRequest> {
            self.requests.borrow().last().cloned()
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.requests.borrow_mut().push(RecordedRequest {
                url: req.url.clone(),
                method: req.method,
                headers: req.headers.clone(),
                body: req.body.clone(),
            });

            let reply = self.replies.borrow().get(&key(req.method, &req.url)).cloned();
            match reply {
                Some(MockReply::Respond {
                    status,
                    content_type,
                    body,
                }) => Ok(HttpResponse {
                    status,
                    content_type,
                    body,
                }),
                Some(MockReply::Fail(err)) => Err(err),
                Some(MockReply::Hang) => futures::future::pending().await,
                None => Ok(HttpResponse {
                    status: 404,
                    content_type: Some("text/plain".to_string()),
                    body: b"Not Found".to_vec(),
                }),
            }
        }
    }
}

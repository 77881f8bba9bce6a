//! 文件下载封装模块
//!
//! 生成的 CSV / Excel / PDF 通过 `FileSaver` 交付。浏览器实现使用 Blob + 对象 URL +
//! 合成点击；失败时退回到在新窗口打开 data URL。

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::log::log_warn;

/// 待下载的文件
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryError(pub String);

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "download failed: {}", self.0)
    }
}

impl std::error::Error for DeliveryError {}

pub trait FileSaver {
    fn save(&self, file: &DownloadFile) -> Result<(), DeliveryError>;
}

/// 对象 URL 在点击后保留的时间
const REVOKE_DELAY_MS: i32 = 1000;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDownload;

impl BrowserDownload {
    fn anchor_download(file: &DownloadFile) -> Result<(), DeliveryError> {
        let err = |what: &str, e: wasm_bindgen::JsValue| DeliveryError(format!("{}: {:?}", what, e));

        let window = web_sys::window().ok_or_else(|| DeliveryError("window unavailable".into()))?;
        let document = window
            .document()
            .ok_or_else(|| DeliveryError("document unavailable".into()))?;
        let body = document
            .body()
            .ok_or_else(|| DeliveryError("body unavailable".into()))?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));
        let bag = BlobPropertyBag::new();
        bag.set_type(file.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
            .map_err(|e| err("blob", e))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| err("object url", e))?;

        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|e| err("create anchor", e))?
            .dyn_into()
            .map_err(|_| DeliveryError("anchor cast".into()))?;
        anchor.set_href(&url);
        anchor.set_download(&file.name);
        anchor.set_rel("noopener");
        body.append_child(&anchor).map_err(|e| err("append anchor", e))?;
        anchor.click();
        anchor.remove();

        let revoke = wasm_bindgen::closure::Closure::once_into_js(move || {
            let _ = Url::revoke_object_url(&url);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.unchecked_ref(),
            REVOKE_DELAY_MS,
        );
        Ok(())
    }

    fn open_data_url(file: &DownloadFile) -> Result<(), DeliveryError> {
        let window = web_sys::window().ok_or_else(|| DeliveryError("window unavailable".into()))?;
        window
            .open_with_url_and_target(&data_url(file.mime, &file.bytes), "_blank")
            .map_err(|e| DeliveryError(format!("window.open: {:?}", e)))?;
        Ok(())
    }
}

impl FileSaver for BrowserDownload {
    fn save(&self, file: &DownloadFile) -> Result<(), DeliveryError> {
        match Self::anchor_download(file) {
            Ok(()) => Ok(()),
            Err(e) => {
                log_warn!("[Download] {} - falling back to data URL", e);
                Self::open_data_url(file)
            }
        }
    }
}

/// `data:<mime>;base64,<payload>`
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, B64.encode(bytes))
}

/// 追加扩展名（已存在时不重复追加，大小写不敏感）
pub fn with_extension(name: &str, ext: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "export" } else { name };
    let suffix = format!(".{}", ext);
    if name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;

    /// 记录所有保存请求
    #[derive(Default)]
    pub struct RecordingSaver {
        pub saved: RefCell<Vec<DownloadFile>>,
    }

    impl RecordingSaver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self) -> usize {
            self.saved.borrow().len()
        }
    }

    impl FileSaver for RecordingSaver {
        fn save(&self, file: &DownloadFile) -> Result<(), DeliveryError> {
            self.saved.borrow_mut().push(file.clone());
            Ok(())
        }
    }
}

//! 组织 logo 获取
//!
//! logo 接口可能返回 data URL、相对路径或绝对 URL，也可能什么都没有。
//! 整个获取过程受超时约束；拿不到 logo 时使用占位图，保证导出总能完成。

use std::io::Cursor;
use std::time::Duration;

use azonation_shared::HttpMethod;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use crate::api::ApiClient;
use crate::log::log_warn;
use crate::web::http::HttpClient;
use crate::web::timer::{Timer, with_timeout};

/// 可嵌入 PDF 的图片
#[derive(Debug, Clone, PartialEq)]
pub enum LogoImage {
    /// JPEG 原样嵌入
    Jpeg {
        width: u32,
        height: u32,
        components: u8,
        data: Vec<u8>,
    },
    /// 解码后的 8 位像素，`alpha` 作为软蒙版
    Raster {
        width: u32,
        height: u32,
        gray: bool,
        pixels: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
    /// 灰色圆角方块 + 首字母
    Placeholder { initial: char },
}

/// 获取到的原始图片
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn is_absolute_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 绝对 URL 原样返回，否则与 base 以单个 `/` 拼接
pub fn safe_join_url(base: &str, path: &str) -> String {
    if is_absolute_url(path) {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// 追加 `t=<ms>` 防止缓存
pub fn cache_busted(url: &str, now_ms: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", url, sep, now_ms)
}

/// 解析 `data:<mime>[;参数][;base64],<payload>`
///
/// 没有 `;base64` 标记的 payload 按百分号编码解码。
pub fn decode_data_url(url: &str) -> Option<FetchedImage> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    let bytes = if params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        B64.decode(payload.trim()).ok()?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };
    Some(FetchedImage { mime, bytes })
}

/// 占位图使用的首字母
pub fn placeholder_initial(org_name: Option<&str>) -> char {
    org_name
        .and_then(|name| name.trim().chars().next())
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('A')
}

// =========================================================
// 解码
// =========================================================

/// 从 SOF 段读取 (宽, 高, 分量数)
pub fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32, u8)> {
    if data.get(..2)? != [0xFF, 0xD8] {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
            pos += 2;
            continue;
        }
        let len = usize::from(u16::from_be_bytes([data[pos + 2], data[pos + 3]]));
        let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            let seg = data.get(pos + 4..pos + 4 + 6)?;
            let height = u32::from(u16::from_be_bytes([seg[1], seg[2]]));
            let width = u32::from(u16::from_be_bytes([seg[3], seg[4]]));
            return Some((width, height, seg[5]));
        }
        pos += 2 + len;
    }
    None
}

fn decode_png(bytes: &[u8]) -> Option<LogoImage> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().ok()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).ok()?;
    buf.truncate(info.buffer_size());

    let split = |channels: usize| -> (Vec<u8>, Vec<u8>) {
        let mut color = Vec::with_capacity(buf.len());
        let mut alpha = Vec::with_capacity(buf.len() / channels);
        for px in buf.chunks_exact(channels) {
            color.extend_from_slice(&px[..channels - 1]);
            alpha.push(px[channels - 1]);
        }
        (color, alpha)
    };

    let (gray, pixels, alpha) = match info.color_type {
        png::ColorType::Rgb => (false, buf.clone(), None),
        png::ColorType::Grayscale => (true, buf.clone(), None),
        png::ColorType::Rgba => {
            let (c, a) = split(4);
            (false, c, Some(a))
        }
        png::ColorType::GrayscaleAlpha => {
            let (c, a) = split(2);
            (true, c, Some(a))
        }
        png::ColorType::Indexed => return None,
    };

    Some(LogoImage::Raster {
        width: info.width,
        height: info.height,
        gray,
        pixels,
        alpha,
    })
}

/// 转换为可嵌入的图片；只支持 JPEG 与 PNG，其余格式返回 None
pub fn decode_image(image: &FetchedImage) -> Option<LogoImage> {
    let is_jpeg = image.mime.contains("jpeg")
        || image.mime.contains("jpg")
        || image.bytes.starts_with(&[0xFF, 0xD8]);
    if is_jpeg {
        let (width, height, components) = jpeg_dimensions(&image.bytes)?;
        return Some(LogoImage::Jpeg {
            width,
            height,
            components,
            data: image.bytes.clone(),
        });
    }
    if image.mime.contains("png") || image.bytes.starts_with(b"\x89PNG") {
        return decode_png(&image.bytes);
    }
    None
}

// =========================================================
// 获取
// =========================================================

/// logo 获取的依赖
pub struct LogoFetcher<'a, C, T: ?Sized> {
    pub api: &'a ApiClient<C>,
    pub token: Option<&'a str>,
    pub endpoint: &'a str,
    pub timer: &'a T,
    pub timeout: Duration,
    pub now_ms: i64,
}

impl<C: HttpClient, T: Timer + ?Sized> LogoFetcher<'_, C, T> {
    /// 带超时的获取；任何失败都返回 None
    pub async fn fetch(&self) -> Option<FetchedImage> {
        match with_timeout(self.timer, self.timeout, self.fetch_inner()).await {
            Some(image) => image,
            None => {
                log_warn!("[Export] Logo fetch timed out after {:?}", self.timeout);
                None
            }
        }
    }

    async fn fetch_inner(&self) -> Option<FetchedImage> {
        let envelope = match self
            .api
            .call(self.endpoint, None, HttpMethod::Get, self.token)
            .await
        {
            Ok(envelope) => envelope,
            Err(e) => {
                log_warn!("[Export] Logo lookup failed: {}", e.in_op("export.logo"));
                return None;
            }
        };
        if !envelope.status {
            return None;
        }

        let raw = envelope
            .data
            .as_ref()
            .and_then(|d| d.get("image"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())?
            .trim()
            .to_string();

        if raw.starts_with("data:image") {
            return decode_data_url(&raw);
        }

        let url = cache_busted(&safe_join_url(&self.api.base_url, &raw), self.now_ms);
        let resp = match self.api.fetch_bytes(&url, None).await {
            Ok(resp) => resp,
            Err(e) => {
                log_warn!("[Export] Logo download failed: {}", e.in_op("export.logo"));
                return None;
            }
        };

        let mime = resp.content_type.clone().unwrap_or_default().to_ascii_lowercase();
        if !mime.starts_with("image/") {
            log_warn!("[Export] Logo is not an image: {}", mime);
            return None;
        }
        Some(FetchedImage {
            mime,
            bytes: resp.body,
        })
    }

    /// 获取并转换；拿不到图片时退回占位图，格式不支持时不绘制 logo
    pub async fn resolve(&self, org_name: Option<&str>) -> Option<LogoImage> {
        match self.fetch().await {
            Some(image) => {
                let decoded = decode_image(&image);
                if decoded.is_none() {
                    log_warn!("[Export] Logo format {} not embeddable, skipped", image.mime);
                }
                decoded
            }
            None => Some(LogoImage::Placeholder {
                initial: placeholder_initial(org_name),
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{tiny_jpeg, tiny_png};
    use super::*;
    use crate::web::http::mock::{MockHttpClient, MockReply};
    use crate::web::timer::mock::{InstantTimer, NeverTimer};
    use serde_json::json;

    const BASE: &str = "http://localhost:8000";
    const LOGO_API: &str = "http://localhost:8000/api/org-profile/logo";

    fn fetcher<'a, T: Timer + ?Sized>(
        api: &'a ApiClient<MockHttpClient>,
        timer: &'a T,
    ) -> LogoFetcher<'a, MockHttpClient, T> {
        LogoFetcher {
            api,
            token: Some("tok"),
            endpoint: "/api/org-profile/logo",
            timer,
            timeout: Duration::from_secs(8),
            now_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_safe_join_url() {
        assert_eq!(safe_join_url("http://a.test/", "/storage/logo.png"), "http://a.test/storage/logo.png");
        assert_eq!(safe_join_url("http://a.test", "storage/logo.png"), "http://a.test/storage/logo.png");
        assert_eq!(safe_join_url("http://a.test", "HTTPS://cdn.test/l.png"), "HTTPS://cdn.test/l.png");
    }

    #[test]
    fn test_cache_busted() {
        assert_eq!(cache_busted("http://a/l.png", 5), "http://a/l.png?t=5");
        assert_eq!(cache_busted("http://a/l.png?v=1", 5), "http://a/l.png?v=1&t=5");
    }

    #[test]
    fn test_decode_data_url() {
        let image = decode_data_url("data:image/PNG;base64,AQID").unwrap();
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(decode_data_url("/storage/logo.png"), None);
        assert_eq!(decode_data_url("data:image/png;base64,%%%"), None);

        let with_params = decode_data_url("data:image/png;charset=utf-8;base64,AQID").unwrap();
        assert_eq!(with_params.mime, "image/png");
        assert_eq!(with_params.bytes, vec![1, 2, 3]);

        let svg = decode_data_url("data:image/svg+xml,%3Csvg%20width%3D%221%22%2F%3E").unwrap();
        assert_eq!(svg.mime, "image/svg+xml");
        assert_eq!(svg.bytes, b"<svg width=\"1\"/>".to_vec());
        // 解码成功但格式不支持时不嵌入
        assert_eq!(decode_image(&svg), None);
    }

    #[test]
    fn test_placeholder_initial() {
        assert_eq!(placeholder_initial(Some("  acme ltd")), 'A');
        assert_eq!(placeholder_initial(Some("zenith")), 'Z');
        assert_eq!(placeholder_initial(Some("   ")), 'A');
        assert_eq!(placeholder_initial(None), 'A');
    }

    #[test]
    fn test_jpeg_dimensions() {
        assert_eq!(jpeg_dimensions(&tiny_jpeg()), Some((2, 1, 3)));
        assert_eq!(jpeg_dimensions(b"not a jpeg"), None);
    }

    #[test]
    fn test_decode_png_splits_alpha() {
        let image = FetchedImage {
            mime: "image/png".into(),
            bytes: tiny_png(),
        };
        let Some(LogoImage::Raster {
            width,
            height,
            gray,
            pixels,
            alpha,
        }) = decode_image(&image)
        else {
            panic!("expected raster");
        };
        assert_eq!((width, height, gray), (2, 1, false));
        assert_eq!(pixels, vec![255, 0, 0, 0, 0, 255]);
        assert_eq!(alpha, Some(vec![255, 128]));
    }

    #[test]
    fn test_unsupported_format_is_skipped() {
        let image = FetchedImage {
            mime: "image/webp".into(),
            bytes: b"RIFF....WEBP".to_vec(),
        };
        assert_eq!(decode_image(&image), None);
    }

    #[tokio::test]
    async fn test_data_url_logo() {
        let api = ApiClient::new(BASE, MockHttpClient::new());
        let data = format!("data:image/jpeg;base64,{}", B64.encode(tiny_jpeg()));
        api.http()
            .mock_json(HttpMethod::Get, LOGO_API, 200, json!({"status": true, "data": {"image": data}}));

        let logo = fetcher(&api, &NeverTimer).resolve(Some("Acme")).await;
        assert!(matches!(logo, Some(LogoImage::Jpeg { width: 2, height: 1, .. })));
        assert_eq!(api.http().request_count(), 1);
    }

    #[tokio::test]
    async fn test_path_logo_is_downloaded_with_cache_buster() {
        let api = ApiClient::new(BASE, MockHttpClient::new());
        api.http().mock_json(
            HttpMethod::Get,
            LOGO_API,
            200,
            json!({"status": true, "data": {"image": "/storage/logo.png"}}),
        );
        api.http().mock_bytes(
            HttpMethod::Get,
            "http://localhost:8000/storage/logo.png",
            200,
            "image/png",
            tiny_png(),
        );

        let logo = fetcher(&api, &NeverTimer).resolve(Some("Acme")).await;
        assert!(matches!(logo, Some(LogoImage::Raster { .. })));
        let last = api.http().last_request().unwrap();
        assert_eq!(last.url, "http://localhost:8000/storage/logo.png?t=1700000000000");
        assert!(last.headers.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_logo_falls_back_to_placeholder() {
        let api = ApiClient::new(BASE, MockHttpClient::new());
        let logo = fetcher(&api, &NeverTimer).resolve(Some("zenith")).await;
        assert_eq!(logo, Some(LogoImage::Placeholder { initial: 'Z' }));
    }

    #[tokio::test]
    async fn test_non_image_content_type_falls_back_to_placeholder() {
        let api = ApiClient::new(BASE, MockHttpClient::new());
        api.http().mock_json(
            HttpMethod::Get,
            LOGO_API,
            200,
            json!({"status": true, "data": {"image": "storage/logo.png"}}),
        );
        api.http().mock_bytes(
            HttpMethod::Get,
            "http://localhost:8000/storage/logo.png",
            200,
            "text/html",
            b"<html>".to_vec(),
        );
        let logo = fetcher(&api, &NeverTimer).resolve(None).await;
        assert_eq!(logo, Some(LogoImage::Placeholder { initial: 'A' }));
    }

    #[tokio::test]
    async fn test_hanging_logo_times_out() {
        let api = ApiClient::new(BASE, MockHttpClient::new());
        api.http().mock_reply(HttpMethod::Get, LOGO_API, MockReply::Hang);
        let logo = fetcher(&api, &InstantTimer).resolve(Some("Acme")).await;
        assert_eq!(logo, Some(LogoImage::Placeholder { initial: 'A' }));
    }
}

//! PDF 导出
//!
//! 报表 PDF 的流程：
//! 1. 获取组织 logo（带超时），拿不到时使用占位图
//! 2. 排版表格，每页记录已绘制的行数
//! 3. 第一页绘制完整页眉，其余页只有组织名与标题
//! 4. 每页绘制水印与页脚（"Items a–b of n" / "Page i of N"）

pub mod layout;
pub mod logo;
pub mod members;
mod writer;

use azonation_shared::date::{Timestamp, format_stamp};

use self::layout::{
    A4_PORTRAIT, Align, DrawOp, Font, Margins, Page, PageRowCounter, PageSize, Rgb, TableLayout,
    TableStyle,
};
use self::logo::{LogoFetcher, LogoImage};
use self::writer::PdfWriter;
use super::{ExportError, ExportRequest, deliver};
use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::log::{log_info, log_warn};
use crate::web::download::{DownloadFile, FileSaver, with_extension};
use crate::web::http::HttpClient;
use crate::web::timer::Timer;

pub const MIME_PDF: &str = "application/pdf";

const REPORT_PAGE: PageSize = A4_PORTRAIT;

const REPORT_MARGINS: Margins = Margins {
    top: 55.0,
    right: 40.0,
    bottom: 50.0,
    left: 40.0,
};

const REPORT_STYLE: TableStyle = TableStyle {
    font_size: 10.0,
    padding: 6.0,
    line_height: 1.15,
    head_fill: Rgb::gray(217),
    head_text: Rgb::gray(30),
    body_text: Rgb::gray(20),
    alternate_fill: Some(Rgb::gray(245)),
};

/// 第一页表格起点（页眉下方）
const FIRST_PAGE_TABLE_Y: f32 = 100.0;
const HEADER_NAME: Rgb = Rgb(30, 30, 30);
const MUTED: Rgb = Rgb::gray(100);
const FOOTER_RULE: Rgb = Rgb::gray(220);
const WATERMARK_SIZE: f32 = 200.0;
const WATERMARK_OPACITY: f32 = 0.02;

/// 页眉页脚中的文字
#[derive(Debug, Clone, Copy)]
pub struct ReportHeader<'a> {
    pub org_name: &'a str,
    pub title: &'a str,
    pub brand: &'a str,
    /// 页脚日期，`DD MMM YYYY`
    pub date: &'a str,
}

fn draw_header(page: &mut Page, number: usize, header: &ReportHeader<'_>, has_logo: bool) {
    let w = REPORT_PAGE.width;
    let (name_y, title_y) = if number == 1 {
        if has_logo {
            page.push(DrawOp::Logo {
                x: w / 2.0 - 20.0,
                y: 20.0,
                w: 40.0,
                h: 40.0,
                opacity: None,
            });
        }
        (75.0, 90.0)
    } else {
        (30.0, 45.0)
    };

    if !header.org_name.is_empty() {
        page.text(w / 2.0, name_y, header.org_name, Font::Bold, 12.0, HEADER_NAME, Align::Center);
    }
    page.text(w / 2.0, title_y, header.title, Font::Regular, 10.0, MUTED, Align::Center);
}

fn draw_footer(
    page: &mut Page,
    number: usize,
    total_pages: usize,
    rows: &PageRowCounter,
    total_rows: usize,
    header: &ReportHeader<'_>,
    has_logo: bool,
) {
    let (w, h) = (REPORT_PAGE.width, REPORT_PAGE.height);

    if has_logo {
        page.push(DrawOp::Logo {
            x: w / 2.0 - WATERMARK_SIZE / 2.0,
            y: h / 2.0 - WATERMARK_SIZE / 2.0,
            w: WATERMARK_SIZE,
            h: WATERMARK_SIZE,
            opacity: Some(WATERMARK_OPACITY),
        });
    }

    page.push(DrawOp::Line {
        x1: REPORT_MARGINS.left,
        y1: h - 40.0,
        x2: w - REPORT_MARGINS.right,
        y2: h - 40.0,
        width: 0.8,
        color: FOOTER_RULE,
    });

    let y = h - 25.0;
    page.text(
        REPORT_MARGINS.left,
        y,
        format!("Generated by {} on {}", header.brand, header.date),
        Font::Italic,
        9.0,
        MUTED,
        Align::Left,
    );
    page.text(w / 2.0, y, rows.footer(number, total_rows).to_string(), Font::Regular, 9.0, MUTED, Align::Center);
    page.text(
        w - REPORT_MARGINS.right,
        y,
        format!("Page {} of {}", number, total_pages),
        Font::Regular,
        9.0,
        MUTED,
        Align::Right,
    );
}

/// 报表页面
///
/// 先排版表格得到总页数与每页行数，再补上页眉页脚。
pub fn report_pages(req: &ExportRequest, header: &ReportHeader<'_>, has_logo: bool) -> Vec<Page> {
    let columns = req.columns();
    let head: Vec<String> = columns.iter().map(|c| c.text.clone()).collect();
    let body = req.body(&columns);

    let table = TableLayout {
        page: REPORT_PAGE,
        margins: REPORT_MARGINS,
        style: REPORT_STYLE,
        start_y: FIRST_PAGE_TABLE_Y,
        head: &head,
        body: &body,
    }
    .layout();

    let total_pages = table.pages.len();
    table
        .pages
        .into_iter()
        .enumerate()
        .map(|(i, content)| {
            let number = i + 1;
            let mut page = Page::default();
            draw_header(&mut page, number, header, has_logo);
            page.ops.extend(content.ops);
            draw_footer(&mut page, number, total_pages, &table.rows, body.len(), header, has_logo);
            page
        })
        .collect()
}

/// 生成报表 PDF 字节
///
/// logo 嵌入失败时不绘制 logo 与水印，其余内容照常输出。
pub fn build_report(
    req: &ExportRequest,
    logo: Option<&LogoImage>,
    header: &ReportHeader<'_>,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = PdfWriter::new();
    let has_logo = match logo {
        Some(logo) => match writer.embed_logo(logo) {
            Ok(()) => true,
            Err(e) => {
                log_warn!("[Export] Logo embed failed, skipped: {}", e);
                false
            }
        },
        None => false,
    };

    let pages = report_pages(req, header, has_logo);
    writer.finish(&pages, REPORT_PAGE, header.title, header.brand)
}

/// 报表 PDF 导出器
pub struct PdfExporter<'a, C, T: ?Sized> {
    pub api: &'a ApiClient<C>,
    pub token: Option<&'a str>,
    pub config: &'a AppConfig,
    pub org_name: Option<&'a str>,
    pub timer: &'a T,
    pub now: Timestamp,
}

impl<C: HttpClient, T: Timer + ?Sized> PdfExporter<'_, C, T> {
    /// 获取 logo、生成并保存 PDF
    ///
    /// logo 获取失败不会导致导出失败。
    pub async fn export<S: FileSaver + ?Sized>(
        &self,
        req: &ExportRequest,
        saver: &S,
    ) -> Result<bool, ExportError> {
        let logo = LogoFetcher {
            api: self.api,
            token: self.token,
            endpoint: &self.config.logo_endpoint,
            timer: self.timer,
            timeout: self.config.logo_timeout,
            now_ms: self.now.as_millis(),
        }
        .resolve(self.org_name)
        .await;

        let date = format_stamp(self.now);
        let header = ReportHeader {
            org_name: self.org_name.map(str::trim).unwrap_or_default(),
            title: &req.title,
            brand: &self.config.brand,
            date: &date,
        };

        let built = build_report(req, logo.as_ref(), &header).map(|bytes| DownloadFile {
            name: with_extension(&req.file_name, "pdf"),
            mime: MIME_PDF,
            bytes,
        });
        let saved = deliver(built, saver)?;
        log_info!("[Export] PDF report '{}' saved ({} rows)", req.file_name, req.rows.len());
        Ok(saved)
    }
}

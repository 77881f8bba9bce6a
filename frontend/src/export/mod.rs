//! 导出工具
//!
//! 把内存中的表格转换为 CSV / Excel / PDF 并交给 `FileSaver` 下载。
//! 空数据集的 CSV / Excel 导出直接返回，不产生文件也不报错。

pub mod csv;
pub mod excel;
pub mod pdf;
pub mod table;

use std::fmt;

use azonation_shared::date::Timestamp;

use crate::config::AppConfig;
use crate::session::SessionStore;
use crate::web::download::{DeliveryError, DownloadFile, FileSaver};
use crate::web::http::HttpClient;
use crate::web::storage::KeyValueStore;
use crate::web::timer::Timer;

pub use pdf::{MIME_PDF, PdfExporter};
pub use table::{ColumnHeader, ExportRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// 没有任何数据行
    EmptyDataset,
    Csv(String),
    Xlsx(String),
    Pdf(String),
    Delivery(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptyDataset => write!(f, "nothing to export"),
            ExportError::Csv(msg) => write!(f, "csv: {}", msg),
            ExportError::Xlsx(msg) => write!(f, "xlsx: {}", msg),
            ExportError::Pdf(msg) => write!(f, "pdf: {}", msg),
            ExportError::Delivery(msg) => write!(f, "delivery: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<DeliveryError> for ExportError {
    fn from(e: DeliveryError) -> Self {
        ExportError::Delivery(e.0)
    }
}

/// 交付文件；空数据集视为成功但不保存
///
/// 返回是否真的保存了文件。
fn deliver<S: FileSaver + ?Sized>(
    built: Result<DownloadFile, ExportError>,
    saver: &S,
) -> Result<bool, ExportError> {
    match built {
        Ok(file) => {
            saver.save(&file)?;
            Ok(true)
        }
        Err(ExportError::EmptyDataset) => Ok(false),
        Err(e) => Err(e),
    }
}

/// 导出 CSV
pub fn export_csv<S: FileSaver + ?Sized>(req: &ExportRequest, saver: &S) -> Result<bool, ExportError> {
    deliver(csv::build(req), saver)
}

/// 导出 Excel
pub fn export_excel<S: FileSaver + ?Sized>(
    req: &ExportRequest,
    saver: &S,
) -> Result<bool, ExportError> {
    deliver(excel::build(req), saver)
}

/// 导出会员列表 PDF（横向 A4，固定列）
pub fn export_members_pdf<S: FileSaver + ?Sized>(
    members: &[serde_json::Value],
    file_name: &str,
    saver: &S,
) -> Result<bool, ExportError> {
    deliver(pdf::members::build(members, file_name), saver)
}

/// 导出带页眉、水印与页脚的报表 PDF
///
/// 令牌与组织名取自当前会话；logo 获取失败时使用占位图。
pub async fn pdf_export<C, K, T, S>(
    session: &SessionStore<C, K>,
    config: &AppConfig,
    timer: &T,
    req: &ExportRequest,
    saver: &S,
) -> Result<bool, ExportError>
where
    C: HttpClient,
    K: KeyValueStore,
    T: Timer + ?Sized,
    S: FileSaver + ?Sized,
{
    let state = session.session();
    PdfExporter {
        api: session.api(),
        token: state.token(),
        config,
        org_name: state.user.org_name.as_deref(),
        timer,
        now: Timestamp::now(),
    }
    .export(req, saver)
    .await
}

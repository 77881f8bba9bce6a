//! CSV 导出

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::{ExportError, ExportRequest};
use crate::web::download::{DownloadFile, with_extension};

pub const MIME_CSV: &str = "text/csv;charset=utf-8";

/// 以 `= + - @` 开头的单元格会被表格软件当作公式
fn should_neutralize(value: &str) -> bool {
    let trimmed = value.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('\'') {
        return false;
    }
    matches!(trimmed.chars().next(), Some('=' | '+' | '-' | '@'))
}

pub fn neutralize_formula(value: &str) -> String {
    if should_neutralize(value) {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

/// 生成 CSV 字节
pub fn to_bytes(req: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    if req.rows.is_empty() {
        return Err(ExportError::EmptyDataset);
    }

    let columns = req.columns();
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|c| neutralize_formula(&c.text)))
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    for row in req.body(&columns) {
        writer
            .write_record(row.iter().map(|v| neutralize_formula(v)))
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))
}

pub fn build(req: &ExportRequest) -> Result<DownloadFile, ExportError> {
    Ok(DownloadFile {
        name: with_extension(&req.file_name, "csv"),
        mime: MIME_CSV,
        bytes: to_bytes(req)?,
    })
}

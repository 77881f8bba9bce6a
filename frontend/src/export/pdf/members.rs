//! 会员列表 PDF
//!
//! 横向 A4，固定六列，不带页眉页脚与 logo。

use serde_json::Value;

use super::layout::{A4_LANDSCAPE, Margins, Rgb, TableLayout, TableStyle};
use super::writer::PdfWriter;
use super::MIME_PDF;
use crate::export::ExportError;
use crate::export::table::{cell, cell_text};
use crate::web::download::{DownloadFile, with_extension};

const HEAD: [&str; 6] = ["Name", "Email", "Mobile", "Address", "Note", "Active"];

const STYLE: TableStyle = TableStyle {
    font_size: 9.0,
    padding: 5.0,
    line_height: 1.15,
    head_fill: Rgb(22, 160, 133),
    head_text: Rgb(255, 255, 255),
    body_text: Rgb::gray(20),
    alternate_fill: Some(Rgb::gray(245)),
};

const MARGINS: Margins = Margins {
    top: 40.0,
    right: 40.0,
    bottom: 40.0,
    left: 40.0,
};

fn is_active(member: &Value) -> bool {
    match cell(member, "is_active") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// 一行会员数据
pub fn member_row(member: &Value) -> Vec<String> {
    vec![
        format!("{} {}", cell_text(member, "first_name"), cell_text(member, "last_name")),
        cell_text(member, "email"),
        cell_text(member, "mobile"),
        cell_text(member, "address"),
        cell_text(member, "note"),
        if is_active(member) { "Yes" } else { "No" }.to_string(),
    ]
}

pub fn to_bytes(members: &[Value]) -> Result<Vec<u8>, ExportError> {
    if members.is_empty() {
        return Err(ExportError::EmptyDataset);
    }

    let head: Vec<String> = HEAD.iter().map(|h| h.to_string()).collect();
    let body: Vec<Vec<String>> = members.iter().map(member_row).collect();
    let table = TableLayout {
        page: A4_LANDSCAPE,
        margins: MARGINS,
        style: STYLE,
        start_y: MARGINS.top,
        head: &head,
        body: &body,
    }
    .layout();

    PdfWriter::new().finish(&table.pages, A4_LANDSCAPE, "Members", "")
}

pub fn build(members: &[Value], file_name: &str) -> Result<DownloadFile, ExportError> {
    Ok(DownloadFile {
        name: with_extension(file_name, "pdf"),
        mime: MIME_PDF,
        bytes: to_bytes(members)?,
    })
}

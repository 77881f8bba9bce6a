//! Excel 导出
//!
//! 生成最小的 Office Open XML 工作簿：单个 `Sheet1`，字符串用 inline string，
//! 数字写成数值单元格，表头加粗。

use std::io::{Cursor, Write};

use serde_json::Value;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::table::cell;
use super::{ExportError, ExportRequest};
use crate::web::download::{DownloadFile, with_extension};

pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// 样式 0 为默认，样式 1 为加粗表头
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs></styleSheet>"#;

/// 0 -> A, 25 -> Z, 26 -> AA
pub fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// XML 转义，并去掉 XML 1.0 不允许的控制字符
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

fn text_cell(out: &mut String, reference: &str, text: &str, style: u8) {
    out.push_str(&format!(
        r#"<c r="{}" t="inlineStr" s="{}"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        style,
        xml_escape(text)
    ));
}

fn value_cell(out: &mut String, reference: &str, value: Option<&Value>) {
    match value {
        None => {}
        Some(Value::Number(n)) => out.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)),
        Some(Value::Bool(b)) => out.push_str(&format!(
            r#"<c r="{}" t="b"><v>{}</v></c>"#,
            reference,
            u8::from(*b)
        )),
        Some(other) => text_cell(out, reference, &super::table::value_text(other), 0),
    }
}

/// 工作表 XML
pub fn sheet_xml(req: &ExportRequest) -> String {
    let columns = req.columns();
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    xml.push_str(r#"<row r="1">"#);
    for (i, column) in columns.iter().enumerate() {
        text_cell(&mut xml, &format!("{}1", column_letter(i)), &column.text, 1);
    }
    xml.push_str("</row>");

    for (r, row) in req.rows.iter().enumerate() {
        let line = r + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, line));
        for (i, column) in columns.iter().enumerate() {
            let reference = format!("{}{}", column_letter(i), line);
            value_cell(&mut xml, &reference, cell(row, &column.value));
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// 生成 xlsx 字节
pub fn to_bytes(req: &ExportRequest) -> Result<Vec<u8>, ExportError> {
    if req.rows.is_empty() {
        return Err(ExportError::EmptyDataset);
    }

    let err = |e: &dyn std::fmt::Display| ExportError::Xlsx(e.to_string());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let sheet = sheet_xml(req);
    let parts: [(&str, &str); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", WORKBOOK),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/styles.xml", STYLES),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];

    for (name, content) in parts {
        zip.start_file(name, options).map_err(|e| err(&e))?;
        zip.write_all(content.as_bytes()).map_err(|e| err(&e))?;
    }

    let cursor = zip.finish().map_err(|e| err(&e))?;
    Ok(cursor.into_inner())
}

pub fn build(req: &ExportRequest) -> Result<DownloadFile, ExportError> {
    Ok(DownloadFile {
        name: with_extension(&req.file_name, "xlsx"),
        mime: MIME_XLSX,
        bytes: to_bytes(req)?,
    })
}

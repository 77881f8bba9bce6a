//! 导出用的表格模型

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 列描述：`text` 为表头文字，`value` 为行对象中的键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub text: String,
    pub value: String,
}

impl ColumnHeader {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// 一次导出请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub headers: Vec<ColumnHeader>,
    #[serde(default)]
    pub rows: Vec<Value>,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "fileName")]
    pub file_name: String,
}

impl ExportRequest {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn column(mut self, text: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(ColumnHeader::new(text, value));
        self
    }

    pub fn rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = rows;
        self
    }

    /// 实际使用的列
    ///
    /// 未声明表头时按行对象的键出现顺序生成，键名即表头。
    pub fn columns(&self) -> Vec<ColumnHeader> {
        if !self.headers.is_empty() {
            return self.headers.clone();
        }

        let mut columns: Vec<ColumnHeader> = Vec::new();
        for row in &self.rows {
            let Some(obj) = row.as_object() else {
                continue;
            };
            for key in obj.keys() {
                if !columns.iter().any(|c| &c.value == key) {
                    columns.push(ColumnHeader::new(key.clone(), key.clone()));
                }
            }
        }
        columns
    }

    /// 表体文字矩阵
    pub fn body(&self, columns: &[ColumnHeader]) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| columns.iter().map(|c| cell_text(row, &c.value)).collect())
            .collect()
    }
}

/// 单元格值
pub fn cell<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    row.as_object()?.get(key).filter(|v| !v.is_null())
}

/// 单元格文字；缺失或 null 为空串，数字与布尔按字面输出
pub fn cell_text(row: &Value, key: &str) -> String {
    match cell(row, key) {
        None => String::new(),
        Some(v) => value_text(v),
    }
}

pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        let row = json!({"name": "Ann", "age": 0, "active": true, "note": null, "tags": ["a", "b"]});
        assert_eq!(cell_text(&row, "name"), "Ann");
        assert_eq!(cell_text(&row, "age"), "0");
        assert_eq!(cell_text(&row, "active"), "true");
        assert_eq!(cell_text(&row, "note"), "");
        assert_eq!(cell_text(&row, "missing"), "");
        assert_eq!(cell_text(&row, "tags"), "a,b");
        assert_eq!(cell_text(&json!("not an object"), "name"), "");
    }

    #[test]
    fn test_columns_from_rows_when_headerless() {
        let req = ExportRequest::new("members").rows(vec![
            json!({"name": "Ann", "email": "a@x"}),
            json!({"name": "Bob", "mobile": "1"}),
        ]);
        let values: Vec<_> = req.columns().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["email", "name", "mobile"]);
    }

    #[test]
    fn test_declared_headers_win() {
        let req = ExportRequest::new("members")
            .column("Full name", "name")
            .rows(vec![json!({"name": "Ann", "email": "a@x"})]);
        let columns = req.columns();
        assert_eq!(columns, vec![ColumnHeader::new("Full name", "name")]);
        assert_eq!(req.body(&columns), vec![vec!["Ann".to_string()]]);
    }

    #[test]
    fn test_deserialize_request() {
        let req: ExportRequest = serde_json::from_value(json!({
            "headers": [{"text": "Name", "value": "name"}],
            "rows": [{"name": "Ann"}],
            "title": "Members",
            "fileName": "members"
        }))
        .unwrap();
        assert_eq!(req.file_name, "members");
        assert_eq!(req.headers.len(), 1);
    }
}

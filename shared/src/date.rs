//! 时间类型模块
//!
//! - `Timestamp`: 可序列化的毫秒时间戳，用于传输和缓存破坏参数
//! - `format_stamp`: 报表页脚使用的 `DD MMM YYYY` 日期格式

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 当前时间
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

/// 格式化为 `18 Oct 2026`（日期补零到两位）
///
/// 超出 chrono 可表示范围的时间戳返回空字符串
pub fn format_stamp(ts: Timestamp) -> String {
    ts.to_datetime()
        .map(|dt| dt.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stamp() {
        // 2024-03-05T12:00:00Z
        let ts = Timestamp::new(1_709_640_000_000);
        assert_eq!(format_stamp(ts), "05 Mar 2024");
    }

    #[test]
    fn test_epoch() {
        assert_eq!(format_stamp(Timestamp::default()), "01 Jan 1970");
    }

    #[test]
    fn test_out_of_range_is_empty() {
        assert_eq!(format_stamp(Timestamp::new(i64::MAX)), "");
    }
}

//! 时间显示模块
//!
//! 服务端时间统一为 RFC 3339 (UTC)，这里只负责把它们格式化成页面上的文字。
//! 缺失的时间显示为 `N/A`。

use chrono::{DateTime, NaiveDate, Utc};

/// 缺失值的占位文字
pub const MISSING: &str = "N/A";

/// 完整日期时间，例如 `March 4, 2025, 09:30`
pub fn format_datetime(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(dt) => dt.format("%B %-d, %Y, %H:%M").to_string(),
        None => MISSING.to_string(),
    }
}

/// 仅日期，例如 `2025-03-04`
pub fn format_date(value: Option<&NaiveDate>) -> String {
    match value {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => MISSING.to_string(),
    }
}

/// 表格中使用的紧凑格式，例如 `2025-03-04 09:30`
pub fn format_short(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => MISSING.to_string(),
    }
}

/// 解析表单中的 `YYYY-MM-DD`，空字符串视为未填写
pub fn parse_form_date(input: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map(Some)
}

/// 文件大小，例如 `1.50 KB`
pub fn format_file_size(bytes: Option<u64>) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let Some(bytes) = bytes.filter(|b| *b > 0) else {
        return MISSING.to_string();
    };

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 4, 9, 30, 0).unwrap();
        assert_eq!(format_datetime(Some(&dt)), "March 4, 2025, 09:30");
        assert_eq!(format_short(Some(&dt)), "2025-03-04 09:30");
        assert_eq!(format_datetime(None), MISSING);
    }

    #[test]
    fn test_parse_form_date() {
        assert_eq!(parse_form_date("  ").unwrap(), None);
        assert_eq!(
            parse_form_date("2024-11-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 2)
        );
        assert!(parse_form_date("02/11/2024").is_err());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(None), MISSING);
        assert_eq!(format_file_size(Some(0)), MISSING);
        assert_eq!(format_file_size(Some(512)), "512.00 B");
        assert_eq!(format_file_size(Some(1536)), "1.50 KB");
        assert_eq!(format_file_size(Some(3 * 1024 * 1024)), "3.00 MB");
    }
}

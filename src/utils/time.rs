use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::{AppError, AppResult};

/// 从时间戳推导计划月份键（YYYY-MM，按 UTC 归一）
pub fn month_key(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m").to_string()
}

/// 验证月份键格式 YYYY-MM
pub fn validate_month(month: &str) -> AppResult<()> {
    let month_regex = Regex::new(r"^\d{4}-\d{2}$").unwrap();

    if !month_regex.is_match(month) {
        return Err(AppError::ValidationError(
            "Month must be in YYYY-MM format".to_string(),
        ));
    }

    let mm: u32 = month[5..7].parse().unwrap_or(0);
    if !(1..=12).contains(&mm) {
        return Err(AppError::ValidationError(
            "Month must be in YYYY-MM format".to_string(),
        ));
    }

    Ok(())
}

/// 课时长（小时，允许小数）
pub fn duration_hours(start: &DateTime<Utc>, end: &DateTime<Utc>) -> f64 {
    (*end - *start).num_milliseconds() as f64 / 3_600_000.0
}

/// 冲突提示里的时间段格式，如 14:00-15:00
pub fn format_time_range(start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_key() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap();
        assert_eq!(month_key(&ts), "2024-05");

        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(month_key(&ts), "2025-12");
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month("2024-05").is_ok());
        assert!(validate_month("2024-12").is_ok());
        assert!(validate_month("2024-13").is_err());
        assert!(validate_month("2024-00").is_err());
        assert!(validate_month("2024-5").is_err());
        assert!(validate_month("24-05").is_err());
        assert!(validate_month("2024/05").is_err());
        assert!(validate_month("").is_err());
    }

    #[test]
    fn test_duration_hours() {
        let start = Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 20, 11, 30, 0).unwrap();
        assert_eq!(duration_hours(&start, &end), 1.5);
    }

    #[test]
    fn test_format_time_range() {
        let start = Utc.with_ymd_and_hms(2024, 5, 20, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 20, 15, 0, 0).unwrap();
        assert_eq!(format_time_range(&start, &end), "14:00-15:00");
    }
}

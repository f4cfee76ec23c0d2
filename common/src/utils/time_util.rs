// 时间工具
//
// 业务逻辑不直接读取系统时钟, 统一由入口处取一次 UTC 时间并显式传入,
// 测试时可注入固定时间
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rbatis::rbdc::datetime::DateTime as DbDateTime;

/// chrono UTC 时间转数据库时间
pub fn to_db_time(t: DateTime<Utc>) -> DbDateTime {
    DbDateTime::from_timestamp_millis(t.timestamp_millis())
}

/// 数据库时间转 chrono UTC 时间
pub fn from_db_time(t: &DbDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(t.unix_timestamp_millis())
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp_millis(0).unwrap())
}

/// UTC 自然日
pub fn utc_date(t: DateTime<Utc>) -> NaiveDate {
    t.date_naive()
}

/// UTC 自然日字符串 (用于 SQL date() 比较)
pub fn day_key(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d").to_string()
}

/// UTC 自然月字符串 (用于 SQL date_format(.., '%Y-%m') 比较)
pub fn month_key(t: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", t.year(), t.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_and_month_keys_are_utc_anchored() {
        let t = Utc.with_ymd_and_hms(2025, 3, 7, 23, 59, 59).unwrap();
        assert_eq!(day_key(t), "2025-03-07");
        assert_eq!(month_key(t), "2025-03");
    }

    #[test]
    fn db_time_round_trip_keeps_millis() {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
        let db = to_db_time(t);
        assert_eq!(from_db_time(&db), t);
    }
}

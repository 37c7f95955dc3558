//! 日付キーの算出
//!
//! 照合実行と today/yesterday 照会で別々のタイムゾーンを使う。

use crate::config::Config;
use crate::error::{RollCallError, Result};
use chrono::{DateTime, Duration, FixedOffset, Utc};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy)]
pub struct DayClock {
    check_offset: FixedOffset,
    query_offset: FixedOffset,
}

impl DayClock {
    pub fn new(check_offset_minutes: i32, query_offset_minutes: i32) -> Result<Self> {
        Ok(Self {
            check_offset: offset(check_offset_minutes)?,
            query_offset: offset(query_offset_minutes)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.check_utc_offset_minutes, config.query_utc_offset_minutes)
    }

    /// 照合実行時の「今日」
    pub fn check_day_key(&self) -> String {
        self.check_day_key_at(Utc::now())
    }

    pub fn check_day_key_at(&self, now: DateTime<Utc>) -> String {
        day_key(now, self.check_offset)
    }

    /// 照会用の日付キー（0 = 今日, 1 = 昨日）
    pub fn query_day_key(&self, days_back: i64) -> String {
        self.query_day_key_at(Utc::now(), days_back)
    }

    pub fn query_day_key_at(&self, now: DateTime<Utc>, days_back: i64) -> String {
        day_key(now - Duration::days(days_back), self.query_offset)
    }
}

fn offset(minutes: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| RollCallError::Config(format!("UTCオフセットが不正です: {}分", minutes)))
}

fn day_key(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format(DAY_KEY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_check_day_ahead_of_utc() {
        let clock = DayClock::new(420, 0).unwrap();
        // UTC 18:00 は +07:00 で翌日 01:00
        let now = at(2025, 3, 10, 18);
        assert_eq!(clock.check_day_key_at(now), "2025-03-11");
        assert_eq!(clock.query_day_key_at(now, 0), "2025-03-10");
    }

    #[test]
    fn test_yesterday() {
        let clock = DayClock::new(420, 0).unwrap();
        let now = at(2025, 3, 1, 0);
        assert_eq!(clock.query_day_key_at(now, 1), "2025-02-28");
    }

    #[test]
    fn test_negative_offset() {
        let clock = DayClock::new(0, -300).unwrap();
        assert_eq!(clock.query_day_key_at(at(2025, 1, 1, 3), 0), "2024-12-31");
    }

    #[test]
    fn test_invalid_offset() {
        assert!(DayClock::new(24 * 60, 0).is_err());
    }
}

//! 时间工具函数
//!
//! 所有持久化时间戳统一使用 Unix millis (`i64`)，
//! repository 层不接触 `DateTime`。

use chrono::{DateTime, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → `DateTime<Utc>`，无效值 fallback 到 epoch
pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_recent() {
        // 2024-01-01 之后
        assert!(now_millis() > 1_704_067_200_000);
    }

    #[test]
    fn test_from_millis_round_trip() {
        let ms = 1_720_000_000_123;
        assert_eq!(from_millis(ms).timestamp_millis(), ms);
    }
}

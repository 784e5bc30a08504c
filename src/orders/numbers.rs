//! Business number generation
//!
//! 人类可读的业务编号：前缀 + 毫秒时间戳 + 随机大写后缀。
//! 全局唯一性由存储层唯一索引兜底，不依赖这里的随机性。

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::utils::time::now_millis;

/// e.g. `ORD1720000000000A1B2C`
pub fn order_number() -> String {
    format!("ORD{}{}", now_millis(), random_suffix(5))
}

/// e.g. `TXN1720000000000A1B2C3D4E`
pub fn transaction_id() -> String {
    format!("TXN{}{}", now_millis(), random_suffix(9))
}

/// e.g. `TRK1720000000000A1B2C3`
pub fn tracking_number() -> String {
    format!("TRK{}{}", now_millis(), random_suffix(6))
}

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert!(order_number().starts_with("ORD"));
        assert!(transaction_id().starts_with("TXN"));
        assert!(tracking_number().starts_with("TRK"));
    }

    #[test]
    fn test_suffix_is_uppercase_alphanumeric() {
        let n = order_number();
        let suffix = &n[n.len() - 5..];
        assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_numbers_differ() {
        // 同一毫秒内靠随机后缀区分
        let a = tracking_number();
        let b = tracking_number();
        assert_ne!(a, b);
    }
}

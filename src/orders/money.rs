//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;

use crate::db::models::CartItem;
use crate::orders::error::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price (₹10,000,000)
const MAX_PRICE: f64 = 10_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i64 = 99_999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line subtotal = unit_price × quantity, rounded for storage
pub fn line_subtotal(unit_price: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Sum of line subtotals for one seller partition
pub fn partition_total(items: &[CartItem]) -> f64 {
    let total: Decimal = items
        .iter()
        .map(|i| to_decimal(i.unit_price) * Decimal::from(i.quantity))
        .sum();
    to_f64(total)
}

/// Validate one cart line before any write
pub fn validate_cart_item(item: &CartItem) -> Result<(), OrderError> {
    if !item.unit_price.is_finite() {
        return Err(OrderError::Validation(format!(
            "unit_price must be a finite number, got {}",
            item.unit_price
        )));
    }
    if item.unit_price < 0.0 {
        return Err(OrderError::Validation(format!(
            "unit_price must be non-negative, got {}",
            item.unit_price
        )));
    }
    if item.unit_price > MAX_PRICE {
        return Err(OrderError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.unit_price
        )));
    }
    if item.quantity <= 0 {
        return Err(OrderError::Validation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_item(price: f64, qty: i64) -> CartItem {
        CartItem {
            cart_item_id: "c1".to_string(),
            buyer_id: "buyer-1".to_string(),
            seller_id: "seller-1".to_string(),
            product_id: "p1".to_string(),
            product_name: "Item".to_string(),
            quantity: qty,
            unit_price: price,
            created_at: 0,
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_line_subtotal_rounding() {
        assert_eq!(line_subtotal(10.99, 3), 32.97);
        assert_eq!(line_subtotal(0.01, 100), 1.0);
    }

    #[test]
    fn test_partition_total_accumulates_precisely() {
        // 1000 行 × 0.01
        let items: Vec<CartItem> = (0..1000).map(|_| cart_item(0.01, 1)).collect();
        assert_eq!(partition_total(&items), 10.0);
    }

    #[test]
    fn test_validate_rejects_nan_price() {
        assert!(validate_cart_item(&cart_item(f64::NAN, 1)).is_err());
        assert!(validate_cart_item(&cart_item(f64::INFINITY, 1)).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        assert!(validate_cart_item(&cart_item(-1.0, 1)).is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        assert!(validate_cart_item(&cart_item(10.0, 0)).is_err());
        assert!(validate_cart_item(&cart_item(10.0, -2)).is_err());
    }

    #[test]
    fn test_validate_accepts_normal_line() {
        assert!(validate_cart_item(&cart_item(99.99, 3)).is_ok());
    }
}

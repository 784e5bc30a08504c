//! Status progression tables
//!
//! Exhaustive matches over [`DeliveryStatus`]: adding a status without
//! deciding its dwell time and notification is a compile error, not a silently
//! missing map entry.

use std::time::Duration;

use crate::db::models::{DeliveryStatus, NotificationType};

/// Minimum dwell in units before a status may advance. `None` for states the
/// engine never advances.
///
/// 单位由配置决定：demo 1 unit = 60s（"分钟"），生产部署设 3600。
pub fn dwell_factor(status: DeliveryStatus) -> Option<f64> {
    match status {
        DeliveryStatus::Pending => Some(0.5),
        DeliveryStatus::Confirmed => Some(1.0),
        DeliveryStatus::Packed => Some(1.5),
        DeliveryStatus::PickedUp => Some(2.0),
        DeliveryStatus::InTransit => Some(3.0),
        DeliveryStatus::OutForDelivery => Some(2.0),
        DeliveryStatus::Delivered => None,
        DeliveryStatus::Cancelled => None,
    }
}

/// Dwell in milliseconds for the configured unit
pub fn dwell_millis(status: DeliveryStatus, unit: Duration) -> Option<i64> {
    dwell_factor(status).map(|f| (f * unit.as_millis() as f64) as i64)
}

/// Notification fired when a tracking *enters* the given status.
///
/// `in_transit` intentionally maps to no notification; the notification enum
/// has no distinct type for it.
pub fn notification_for(status: DeliveryStatus) -> Option<(NotificationType, &'static str)> {
    match status {
        DeliveryStatus::Pending => None,
        DeliveryStatus::Confirmed => {
            Some((NotificationType::OrderConfirmed, "Your order has been confirmed"))
        }
        DeliveryStatus::Packed => {
            Some((NotificationType::OrderPacked, "Your order has been packed"))
        }
        DeliveryStatus::PickedUp => {
            Some((NotificationType::OrderShipped, "Your order has been picked up"))
        }
        DeliveryStatus::InTransit => None,
        DeliveryStatus::OutForDelivery => Some((
            NotificationType::OutForDelivery,
            "Your order is out for delivery",
        )),
        DeliveryStatus::Delivered => {
            Some((NotificationType::Delivered, "Your order has been delivered"))
        }
        DeliveryStatus::Cancelled => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_advancing_status_has_a_dwell() {
        let mut status = DeliveryStatus::Pending;
        while let Some(next) = status.next() {
            assert!(
                dwell_factor(status).is_some(),
                "{} advances but has no dwell",
                status
            );
            status = next;
        }
        assert_eq!(dwell_factor(DeliveryStatus::Delivered), None);
        assert_eq!(dwell_factor(DeliveryStatus::Cancelled), None);
    }

    #[test]
    fn test_dwell_millis_scales_with_unit() {
        // pending = 0.5 units
        assert_eq!(
            dwell_millis(DeliveryStatus::Pending, Duration::from_secs(60)),
            Some(30_000)
        );
        assert_eq!(
            dwell_millis(DeliveryStatus::InTransit, Duration::from_secs(3600)),
            Some(10_800_000)
        );
    }

    #[test]
    fn test_in_transit_has_no_notification() {
        assert!(notification_for(DeliveryStatus::InTransit).is_none());
    }

    #[test]
    fn test_delivered_notification_type() {
        let (kind, _) = notification_for(DeliveryStatus::Delivered).unwrap();
        assert_eq!(kind, NotificationType::Delivered);
    }
}

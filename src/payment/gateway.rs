//! Payment gateway strategy
//!
//! The gateway is an injected trait object so the engines never depend on the
//! random outcome directly; tests supply a deterministic implementation.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::db::models::PaymentMethodType;

/// Result of one gateway charge attempt
#[derive(Debug, Clone)]
pub struct GatewayOutcome {
    pub approved: bool,
    /// Gateway-side message, surfaced in payloads and failure reasons
    pub message: String,
}

impl GatewayOutcome {
    pub fn approved() -> Self {
        Self {
            approved: true,
            message: "Payment processed successfully".to_string(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            approved: false,
            message: message.into(),
        }
    }
}

/// Charge strategy
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount: f64, method: PaymentMethodType) -> GatewayOutcome;
}

/// Mock gateway: simulated latency, then a uniform pass/fail draw.
///
/// 默认 90% 成功率 / 2s 延迟，均来自配置。
pub struct SimulatedGateway {
    success_rate: f64,
    latency: Duration,
}

impl SimulatedGateway {
    pub fn new(success_rate: f64, latency: Duration) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            latency,
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, amount: f64, method: PaymentMethodType) -> GatewayOutcome {
        // Simulate gateway latency
        tokio::time::sleep(self.latency).await;

        let draw: f64 = rand::thread_rng().gen();
        if draw < self.success_rate {
            tracing::debug!(amount, ?method, "Simulated gateway approved charge");
            GatewayOutcome::approved()
        } else {
            tracing::debug!(amount, ?method, "Simulated gateway declined charge");
            GatewayOutcome::declined("Insufficient funds or card declined")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_success_rate_always_approves() {
        let gateway = SimulatedGateway::new(1.0, Duration::ZERO);
        for _ in 0..20 {
            let outcome = gateway.charge(100.0, PaymentMethodType::Card).await;
            assert!(outcome.approved);
        }
    }

    #[tokio::test]
    async fn test_zero_success_rate_always_declines() {
        let gateway = SimulatedGateway::new(0.0, Duration::ZERO);
        for _ in 0..20 {
            let outcome = gateway.charge(100.0, PaymentMethodType::Upi).await;
            assert!(!outcome.approved);
            assert_eq!(outcome.message, "Insufficient funds or card declined");
        }
    }
}

//! Shared test harness: embedded database + deterministic payment gateway

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use tempfile::TempDir;

use mandi_server::db::models::PaymentMethodType;
use mandi_server::db::DbService;
use mandi_server::payment::{GatewayOutcome, PaymentGateway};

/// Fresh embedded database in a tempdir. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn test_db() -> (Surreal<Db>, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("test.db")).await.unwrap();
    (service.handle(), tmp)
}

/// Deterministic gateway: pops scripted outcomes in order, approves once the
/// script is exhausted.
pub struct ScriptedGateway {
    outcomes: Mutex<VecDeque<bool>>,
}

impl ScriptedGateway {
    pub fn new(outcomes: &[bool]) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.iter().copied().collect()),
        }
    }

    pub fn always(approve: bool) -> Self {
        Self {
            outcomes: Mutex::new(if approve {
                VecDeque::new()
            } else {
                // 空脚本默认通过，常拒需要显式长脚本
                (0..64).map(|_| false).collect()
            }),
        }
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn charge(&self, _amount: f64, _method: PaymentMethodType) -> GatewayOutcome {
        let approved = self.outcomes.lock().unwrap().pop_front().unwrap_or(true);
        if approved {
            GatewayOutcome::approved()
        } else {
            GatewayOutcome::declined("Insufficient funds or card declined")
        }
    }
}

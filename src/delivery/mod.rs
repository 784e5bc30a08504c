//! Delivery Progression Subsystem
//!
//! - [`progression`] - 状态推进表：下一状态 / 驻留时长 / 通知映射
//! - [`DeliveryEngine`] - 幂等批处理：provisioning + progression 两趟
//! - [`DeliveryScheduler`] - 固定间隔触发引擎的后台任务

pub mod engine;
pub mod progression;
pub mod scheduler;

pub use engine::{DeliveryConfig, DeliveryEngine, DeliveryRunReport};
pub use scheduler::DeliveryScheduler;

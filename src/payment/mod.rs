//! Payment Subsystem
//!
//! - [`PaymentGateway`] - 可注入的网关策略（测试用确定性假网关）
//! - [`SimulatedGateway`] - 模拟网关：固定延迟 + 90/10 成败抽样
//! - [`PaymentService`] - 扣款服务：交易记录 + 终态更新 + 通知

pub mod gateway;
pub mod service;

pub use gateway::{GatewayOutcome, PaymentGateway, SimulatedGateway};
pub use service::PaymentService;

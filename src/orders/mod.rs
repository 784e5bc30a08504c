//! Order Domain
//!
//! 订单生命周期引擎：
//! - [`OrderPlacementService`] - 多卖家购物车下单 + 支付补偿
//! - [`ApprovalService`] - B2B 进货单审批（库存校验/扣减/转移）
//! - [`FulfillmentService`] - 零售商确认/取消客户订单
//!
//! 以及订单号生成与金额计算工具。

pub mod approval;
pub mod error;
pub mod fulfillment;
pub mod money;
pub mod numbers;
pub mod placement;

pub use approval::{ApprovalService, B2bOrderRequest, StockCheck, StockCheckItem};
pub use error::OrderError;
pub use fulfillment::FulfillmentService;
pub use placement::{CheckoutInfo, OrderPlacementService};

//! Mandi Server - 多角色集市订单生命周期服务
//!
//! # 架构概述
//!
//! 围绕订单生命周期的三个引擎：
//!
//! - **下单引擎** (`orders::placement`): 多卖家购物车拆单 + 支付补偿
//! - **B2B 审批引擎** (`orders::approval`): 进货单校验/批准/驳回与库存转移
//! - **配送推进引擎** (`delivery`): 定时批处理推进配送状态机并发出通知
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── db/            # 嵌入式 SurrealDB：schema、模型、仓储
//! ├── orders/        # 订单号/金额工具、下单引擎、B2B 审批引擎
//! ├── payment/       # 网关策略、模拟网关、支付服务
//! ├── delivery/      # 推进表、配送引擎、调度器
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod delivery;
pub mod orders;
pub mod payment;
pub mod utils;

// Re-export 公共类型
pub use core::{BackgroundTasks, Config, Server, ServerState, TaskKind};
pub use delivery::{DeliveryConfig, DeliveryEngine, DeliveryRunReport, DeliveryScheduler};
pub use orders::{
    ApprovalService, CheckoutInfo, FulfillmentService, OrderError, OrderPlacementService,
};
pub use payment::{GatewayOutcome, PaymentGateway, PaymentService, SimulatedGateway};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);
}

pub fn print_banner() {
    println!(
        r#"
    __  ___                ___
   /  |/  /___ _____  ____/ (_)
  / /|_/ / __ `/ __ \/ __  / /
 / /  / / /_/ / / / / /_/ / /
/_/  /_/\__,_/_/ /_/\__,_/_/
    "#
    );
}

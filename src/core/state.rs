//! 服务器状态
//!
//! ServerState 持有所有服务的共享引用，使用 Arc/克隆句柄实现浅拷贝。

use std::sync::Arc;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::core::Config;
use crate::db::DbService;
use crate::delivery::{DeliveryConfig, DeliveryEngine};
use crate::orders::{ApprovalService, FulfillmentService, OrderPlacementService};
use crate::payment::{PaymentGateway, PaymentService, SimulatedGateway};

/// 服务器状态 - 持有配置、数据库句柄与注入的支付网关
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | gateway | 支付网关策略 (可注入) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 确保工作目录结构
    /// 2. 打开数据库 (work_dir/database/mandi.db)
    /// 3. 按配置构造模拟网关
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("mandi.db");
        let db_service = DbService::new(&db_path)
            .await
            .expect("Failed to initialize database");

        let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway::new(
            config.payment_success_rate,
            config.payment_latency,
        ));

        Self::with_gateway(config.clone(), db_service.handle(), gateway)
    }

    /// 使用自定义网关构造（测试注入确定性网关）
    pub fn with_gateway(
        config: Config,
        db: Surreal<Db>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            config,
            db,
            gateway,
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn payment_service(&self) -> PaymentService {
        PaymentService::new(self.db.clone(), self.gateway.clone())
    }

    pub fn placement_service(&self) -> OrderPlacementService {
        OrderPlacementService::new(self.db.clone(), self.payment_service())
    }

    pub fn approval_service(&self) -> ApprovalService {
        ApprovalService::new(self.db.clone())
    }

    pub fn fulfillment_service(&self) -> FulfillmentService {
        FulfillmentService::new(self.db.clone())
    }

    pub fn delivery_engine(&self) -> DeliveryEngine {
        DeliveryEngine::new(
            self.db.clone(),
            DeliveryConfig {
                dwell_unit: self.config.dwell_unit,
                horizon: self.config.delivery_horizon,
            },
        )
    }
}

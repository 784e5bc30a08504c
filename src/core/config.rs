use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/mandi | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | PAYMENT_SUCCESS_RATE | 0.9 | 模拟网关成功率 |
/// | PAYMENT_LATENCY_MS | 2000 | 模拟网关延迟(毫秒) |
/// | DELIVERY_POLL_SECS | 30 | 配送引擎触发间隔(秒) |
/// | DWELL_UNIT_SECS | 60 | 驻留时间单位(秒)，生产部署设 3600 |
/// | DELIVERY_HORIZON_HOURS | 24 | 预计送达时长(小时) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/mandi HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 模拟网关 ===
    /// 支付成功率 [0.0, 1.0]
    pub payment_success_rate: f64,
    /// 网关延迟
    pub payment_latency: Duration,

    // === 配送引擎 ===
    /// 配送引擎触发间隔
    pub delivery_poll_interval: Duration,
    /// 驻留时间单位（demo 按"分钟"跑，生产设 3600 按小时跑）
    pub dwell_unit: Duration,
    /// 预计送达时长
    pub delivery_horizon: Duration,
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/mandi".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            payment_success_rate: std::env::var("PAYMENT_SUCCESS_RATE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(0.9),
            payment_latency: Duration::from_millis(
                std::env::var("PAYMENT_LATENCY_MS")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(2000),
            ),

            delivery_poll_interval: Duration::from_secs(
                std::env::var("DELIVERY_POLL_SECS")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(30),
            ),
            dwell_unit: Duration::from_secs(
                std::env::var("DWELL_UNIT_SECS")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(60),
            ),
            delivery_horizon: Duration::from_secs(
                std::env::var("DELIVERY_HORIZON_HOURS")
                    .ok()
                    .and_then(|p: String| p.parse::<u64>().ok())
                    .unwrap_or(24)
                    * 3600,
            ),
        }
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

//! Delivery progression scheduler
//!
//! 注册为 `TaskKind::Periodic`，固定间隔触发一次引擎调用。
//! 引擎本身幂等，间隔只需要明显短于最短驻留时间。

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::delivery::engine::DeliveryEngine;

pub struct DeliveryScheduler {
    engine: DeliveryEngine,
    interval: Duration,
    shutdown: CancellationToken,
}

impl DeliveryScheduler {
    pub fn new(engine: DeliveryEngine, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            engine,
            interval,
            shutdown,
        }
    }

    /// 主循环：等待间隔或 shutdown 信号
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Delivery scheduler started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Delivery scheduler received shutdown signal");
                    return;
                }
            }

            let report = self.engine.run_once().await;
            if report.is_quiet() {
                tracing::debug!("Delivery run: nothing to do");
            } else {
                tracing::info!(
                    provisioned = report.provisioned,
                    advanced = report.advanced,
                    failed = report.failed,
                    "Delivery run completed"
                );
            }
        }
    }
}

//! Server Implementation
//!
//! HTTP 服务器启动和管理：注册后台任务，启动 axum，ctrl-c 优雅退出。

use crate::api;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, ServerState};
use crate::delivery::DeliveryScheduler;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests / embedded use)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // Background tasks
        let mut tasks = BackgroundTasks::new();
        let scheduler = DeliveryScheduler::new(
            state.delivery_engine(),
            self.config.delivery_poll_interval,
            tasks.shutdown_token(),
        );
        tasks.spawn("delivery_scheduler", TaskKind::Periodic, async move {
            scheduler.run().await;
        });
        tracing::info!("Background tasks registered: {}", tasks.len());

        let app = api::build_app().with_state(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Mandi server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        tasks.shutdown().await;
        Ok(())
    }
}

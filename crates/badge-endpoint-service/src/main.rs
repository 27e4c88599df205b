//! 商品详情页徽章服务
//!
//! 提供 `GET /badges` REST 端点，供店面 PDP 渲染徽章条。

use std::sync::Arc;

use axum::http::HeaderValue;
use badge_endpoint::{AppState, HttpProductApi, routes};
use badge_shared::{config::AppConfig, observability};
use rule_engine::RuleTable;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：从 config/{service_name}.toml 加载，包含可观测性配置
    let config = AppConfig::load("badge-endpoint-service").unwrap_or_else(|e| {
        eprintln!("加载配置失败，使用默认配置: {}", e);
        AppConfig::default()
    });

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!("Starting badge-endpoint-service on {}", config.server_addr());
    info!(environment = %config.environment, "Configuration loaded");

    // 规则文件有误属于启动错误，不做降级
    let rules = RuleTable::load(config.rules.path.as_deref())?;
    info!(rules = rules.len(), "徽章规则表就绪");

    let upstream = HttpProductApi::new(&config.upstream)?;
    info!(
        base_url = %config.upstream.base_url,
        timeout_ms = config.upstream.timeout_ms,
        "上游商品 API 客户端就绪"
    );

    let state = AppState::new(rules, Arc::new(upstream));

    let app = routes::app(state).layer(cors_layer(config.is_production()));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// CORS 配置：通过 BADGE_CORS_ORIGINS 环境变量控制允许的来源
fn cors_layer(production: bool) -> CorsLayer {
    let allowed_origins =
        std::env::var("BADGE_CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    if allowed_origins == "*" {
        if production {
            warn!("BADGE_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", allowed_origins);
    let origins: Vec<_> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 监听关闭信号
///
/// K8s 通过 SIGTERM 通知 Pod 停止；本地开发通过 Ctrl+C。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("注册 Ctrl+C 处理器失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("注册 SIGTERM 处理器失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;
use crate::error::{Result, SharedError};

/// Metrics 资源守卫
///
/// drop 时停止指标 HTTP 服务。
pub struct MetricsHandle {
    server_handle: tokio::task::JoinHandle<()>,
}

impl Drop for MetricsHandle {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| SharedError::Metrics(e.to_string()))?;

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle { server_handle })
}

/// 注册通用指标描述，会出现在 /metrics 端点的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "badge_evaluations_total",
        "Total number of badge rule evaluations"
    );
    metrics::describe_counter!(
        "badge_fallbacks_total",
        "Badge requests answered with the empty fallback"
    );
    metrics::describe_histogram!(
        "upstream_fetch_duration_seconds",
        "Product API fetch duration in seconds"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| SharedError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录一次徽章规则评估
#[inline]
pub fn record_badge_evaluation(badge_count: usize) {
    metrics::counter!(
        "badge_evaluations_total",
        "matched" => (badge_count > 0).to_string()
    )
    .increment(1);
}

/// 记录一次降级为空徽章的响应
///
/// reason 取值：upstream_status / upstream_transport / upstream_decode /
/// attributes_unknown / unexpected
#[inline]
pub fn record_badge_fallback(reason: &'static str) {
    metrics::counter!("badge_fallbacks_total", "reason" => reason).increment(1);
}

/// 记录上游商品 API 请求耗时
#[inline]
pub fn record_upstream_fetch(outcome: &'static str, duration_secs: f64) {
    metrics::histogram!("upstream_fetch_duration_seconds", "outcome" => outcome)
        .record(duration_secs);
}

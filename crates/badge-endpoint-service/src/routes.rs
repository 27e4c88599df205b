//! 路由配置模块

use axum::{Router, middleware, routing::get};
use badge_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

/// 徽章查询路由
///
/// 同时挂在 `/badges` 与店面使用的 `/api/pdp/badges/` 下
pub fn badge_routes() -> Router<AppState> {
    Router::new()
        .route("/badges", get(handlers::badges::get_badges))
        .route("/api/pdp/badges", get(handlers::badges::get_badges))
        .route("/api/pdp/badges/", get(handlers::badges::get_badges))
}

/// 完整应用路由（含健康检查与可观测性中间件）
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(badge_routes())
        .route("/health", get(handlers::health::health_check))
        // 可观测性中间件：request_id 在外层，http_tracing 的 span 才能拿到 ID
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

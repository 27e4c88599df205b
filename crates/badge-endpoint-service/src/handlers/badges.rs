//! 徽章查询处理器
//!
//! GET /badges?entityId=<id>&locale=<opt>
//!
//! 处理流程：解析 entityId → 拉取上游商品 → 校验形状 → 规则评估。
//! 除参数错误外一律返回 200，任何失败都降级为空徽章列表。

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::{
        HeaderMap, HeaderValue,
        header::{ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE},
    },
    response::{IntoResponse, Response},
};
use badge_shared::observability::metrics;
use futures::FutureExt;
use rule_engine::{BadgeDescriptor, Validation, validate};
use tracing::{debug, error, instrument};

use crate::{
    dto::{BadgeQuery, BadgeResponse, parse_entity_id},
    error::EndpointError,
    state::AppState,
    upstream::ProductRequest,
};

/// 原始查询键值对；重复参数不在提取阶段被拒绝
pub type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// 查询商品徽章
#[instrument(skip_all)]
pub async fn get_badges(
    State(state): State<AppState>,
    headers: HeaderMap,
    pairs: QueryPairs,
) -> Result<Response, EndpointError> {
    let query = match pairs {
        Ok(Query(pairs)) => BadgeQuery::from_pairs(pairs),
        Err(rejection) => {
            debug!(error = %rejection, "查询串无法解析，按缺少 entityId 处理");
            BadgeQuery::default()
        }
    };
    let entity_id = parse_entity_id(query.entity_id.as_deref())?;

    // 参数解析之后的全部编排都在同一个 panic 边界内，徽章不能拖垮页面
    let guarded = async {
        let request = ProductRequest::new(entity_id)
            .with_locale(query.locale())
            .with_cookie(header_str(&headers, COOKIE.as_str()))
            .with_accept_language(header_str(&headers, ACCEPT_LANGUAGE.as_str()));
        resolve_badges(&state, &request).await
    };

    let badges = match AssertUnwindSafe(guarded).catch_unwind().await {
        Ok(badges) => badges,
        Err(panic) => {
            error!(
                entity_id,
                panic = %panic_message(panic.as_ref()),
                "徽章评估异常，返回空徽章"
            );
            metrics::record_badge_fallback("unexpected");
            Vec::new()
        }
    };

    Ok(no_store(BadgeResponse { entity_id, badges }))
}

/// 拉取、校验并评估；所有失败路径都返回空列表
pub async fn resolve_badges(state: &AppState, request: &ProductRequest) -> Vec<BadgeDescriptor> {
    let entity_id = request.entity_id;

    let product = match state.upstream.fetch_product(request).await {
        Ok(product) => product,
        Err(e) => {
            debug!(entity_id, error = %e, "上游商品不可用，返回空徽章");
            metrics::record_badge_fallback(e.fallback_reason());
            return Vec::new();
        }
    };

    let ctx = match validate(&product, entity_id) {
        Validation::Known(ctx) => ctx,
        Validation::AttributesUnknown => {
            debug!(entity_id, "商品响应形状不符合预期，返回空徽章");
            metrics::record_badge_fallback("attributes_unknown");
            return Vec::new();
        }
    };

    let badges = state.rules.evaluate(&ctx);
    metrics::record_badge_evaluation(badges.len());
    debug!(entity_id, count = badges.len(), "徽章评估完成");
    badges
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn no_store(body: BadgeResponse) -> Response {
    let mut response = Json(body).into_response();
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

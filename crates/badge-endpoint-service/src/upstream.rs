//! 上游商品 API
//!
//! 通过 [`ProductApi`] trait 抽象商品数据来源，处理器只依赖 trait，
//! 测试中可以替换为 mock 或进程内桩服务。

use std::time::Instant;

use async_trait::async_trait;
use axum::http::header::{ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE, PRAGMA};
use badge_shared::config::UpstreamConfig;
use badge_shared::observability::metrics;
use serde_json::Value;
use tracing::debug;

/// 上游请求失败原因
///
/// 所有变体都会被处理器吸收为空徽章响应，区分它们只为日志与指标。
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("上游返回非成功状态码: {0}")]
    Status(u16),

    #[error("上游请求失败: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("上游响应不是合法 JSON: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// 指标中的降级原因
    pub fn fallback_reason(&self) -> &'static str {
        match self {
            Self::Status(_) => "upstream_status",
            Self::Transport(_) => "upstream_transport",
            Self::Decode(_) => "upstream_decode",
        }
    }
}

/// 一次商品查询所需的全部输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRequest {
    pub entity_id: i64,
    pub locale: Option<String>,
    /// 原样转发调用方的 cookie，用于会话相关的商品可见性
    pub cookie: Option<String>,
    pub accept_language: Option<String>,
}

impl ProductRequest {
    pub fn new(entity_id: i64) -> Self {
        Self {
            entity_id,
            ..Default::default()
        }
    }

    pub fn with_locale(mut self, locale: Option<&str>) -> Self {
        self.locale = locale.map(str::to_string);
        self
    }

    pub fn with_cookie(mut self, cookie: Option<&str>) -> Self {
        self.cookie = cookie.map(str::to_string);
        self
    }

    pub fn with_accept_language(mut self, accept_language: Option<&str>) -> Self {
        self.accept_language = accept_language.map(str::to_string);
        self
    }
}

/// 商品数据来源
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// 拉取商品 JSON；只有 2xx 且可解析的响应体才返回 Ok
    async fn fetch_product(&self, request: &ProductRequest) -> Result<Value, UpstreamError>;
}

/// 基于 reqwest 的商品 API 客户端
#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductApi {
    /// 按配置构建客户端，传输层超时是唯一的超时控制
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 商品资源地址，保留末尾斜杠
    pub fn product_url(&self, entity_id: i64) -> String {
        format!("{}/products/{}/", self.base_url, entity_id)
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn fetch_product(&self, request: &ProductRequest) -> Result<Value, UpstreamError> {
        let url = self.product_url(request.entity_id);
        let mut builder = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache");

        if let Some(locale) = &request.locale {
            builder = builder.query(&[("locale", locale)]);
        }
        if let Some(cookie) = &request.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(accept_language) = &request.accept_language {
            builder = builder.header(ACCEPT_LANGUAGE, accept_language);
        }

        let start = Instant::now();
        let result = async {
            let response = builder.send().await.map_err(UpstreamError::Transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(UpstreamError::Status(status.as_u16()));
            }

            let body = response.bytes().await.map_err(UpstreamError::Transport)?;
            serde_json::from_slice::<Value>(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
        }
        .await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.fallback_reason(),
        };
        metrics::record_upstream_fetch(outcome, start.elapsed().as_secs_f64());
        debug!(url = %url, outcome, "上游商品请求完成");

        result
    }
}

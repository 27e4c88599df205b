//! 徽章端点传输层
//!
//! [`BadgeTransport`] 负责一次 HTTP 往返并观察取消令牌；
//! [`coerce_badges`] 把任意响应体宽松地解码为徽章列表。

use std::time::Duration;

use async_trait::async_trait;
use rule_engine::{BadgeDescriptor, BadgeVariant};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// 传输失败原因，拉取器会把它们统一视为“没有徽章”
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("徽章端点返回非成功状态码: {0}")]
    Status(u16),

    #[error("徽章端点请求失败: {0}")]
    Request(#[source] reqwest::Error),

    #[error("徽章响应不是合法 JSON: {0}")]
    Decode(String),

    #[error("请求已取消")]
    Cancelled,
}

/// 徽章端点传输
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeTransport: Send + Sync {
    /// 请求端点并返回 JSON 响应体；取消令牌触发后应尽快返回 [`TransportError::Cancelled`]
    async fn fetch(&self, endpoint: &str, cancel: CancellationToken) -> Result<Value, TransportError>;
}

/// 基于 reqwest 的传输实现
///
/// 端点通常是站内相对路径（`/api/pdp/badges/?entityId=1`），按 `origin` 补全。
#[derive(Debug, Clone)]
pub struct HttpBadgeTransport {
    client: reqwest::Client,
    origin: String,
}

impl HttpBadgeTransport {
    pub fn new(origin: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Request)?;

        Ok(Self::with_client(client, origin))
    }

    pub fn with_client(client: reqwest::Client, origin: &str) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// 补全端点地址；已是绝对地址时原样返回
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.origin, endpoint)
        } else {
            format!("{}/{}", self.origin, endpoint)
        }
    }

    async fn send(&self, url: &str) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(TransportError::Request)?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BadgeTransport for HttpBadgeTransport {
    async fn fetch(&self, endpoint: &str, cancel: CancellationToken) -> Result<Value, TransportError> {
        let url = self.resolve(endpoint);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.send(&url) => result,
        }
    }
}

/// 从响应体中取出徽章列表
///
/// `badges` 不是数组时返回空列表；数组中不合法的条目逐个跳过。
pub fn coerce_badges(body: &Value) -> Vec<BadgeDescriptor> {
    body.get("badges")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(coerce_badge).collect())
        .unwrap_or_default()
}

/// 单个条目：key/label 必须是字符串，variant 必须是已知样式，href 缺失、为 null 或为字符串
fn coerce_badge(entry: &Value) -> Option<BadgeDescriptor> {
    let entry = entry.as_object()?;

    let key = entry.get("key")?.as_str()?;
    let label = entry.get("label")?.as_str()?;
    let variant = BadgeVariant::parse(entry.get("variant")?.as_str()?)?;
    let href = match entry.get("href") {
        None | Some(Value::Null) => None,
        Some(Value::String(href)) => Some(href.clone()),
        Some(_) => return None,
    };

    Some(BadgeDescriptor {
        key: key.to_string(),
        label: label.to_string(),
        variant,
        href,
    })
}

//! 徽章服务错误类型定义
//!
//! 只有客户端输入错误会暴露给调用方；上游与内部故障在处理器边界被吸收。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::dto::ErrorResponse;

/// 客户端输入错误
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Missing required query param: entityId")]
    MissingEntityId,
    #[error("entityId must be a number")]
    InvalidEntityId(String),
}

impl EndpointError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingEntityId | Self::InvalidEntityId(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        if let Self::InvalidEntityId(raw) = &self {
            tracing::debug!(entity_id = %raw, "entityId 不是合法数字");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (self.status_code(), axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, EndpointError>;

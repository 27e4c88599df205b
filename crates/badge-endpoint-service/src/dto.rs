//! 请求参数与响应体定义

use rule_engine::BadgeDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::{EndpointError, Result};

/// `GET /badges` 查询参数
///
/// entityId 先按字符串接收，数字校验在 [`parse_entity_id`] 中完成，
/// 这样非数字输入得到的是统一的 400 JSON 而不是 axum 的默认拒绝响应。
#[derive(Debug, Default)]
pub struct BadgeQuery {
    pub entity_id: Option<String>,
    pub locale: Option<String>,
}

impl BadgeQuery {
    /// 从原始键值对构造，重复参数取第一次出现的值
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "entityId" => &mut query.entity_id,
                "locale" => &mut query.locale,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// 非空的 locale
    pub fn locale(&self) -> Option<&str> {
        self.locale
            .as_deref()
            .map(str::trim)
            .filter(|locale| !locale.is_empty())
    }
}

/// 解析 entityId
///
/// 缺失或空白视为缺失；必须是有限数字，小数部分向零截断。
/// 截断后超出 i64 范围的值视为非法，不做饱和。
pub fn parse_entity_id(raw: Option<&str>) -> Result<i64> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(EndpointError::MissingEntityId),
    };

    // i64::MAX as f64 向上取整为 2^63，因此上界为开区间
    let representable = i64::MIN as f64..i64::MAX as f64;
    match raw.parse::<f64>().map(f64::trunc) {
        Ok(value) if representable.contains(&value) => Ok(value as i64),
        _ => Err(EndpointError::InvalidEntityId(raw.to_string())),
    }
}

/// 徽章响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    pub entity_id: i64,
    pub badges: Vec<BadgeDescriptor>,
}

impl BadgeResponse {
    /// 降级响应：回显 entityId，徽章为空
    pub fn empty(entity_id: i64) -> Self {
        Self {
            entity_id,
            badges: Vec::new(),
        }
    }
}

/// 400 响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

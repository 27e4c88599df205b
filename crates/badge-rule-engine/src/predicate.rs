//! 规则谓词定义
//!
//! 谓词是封闭的枚举而非任意闭包，规则表因此可以从 JSON 文件加载。

use crate::models::ProductBadgeContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 规则谓词
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// 品牌名包含子串（大小写不敏感）
    BrandContains { value: String },
    /// 品牌名完全相等（大小写不敏感）
    BrandEquals { value: String },
    /// 支持包邮
    FreeShippingEligible,
    /// 仅限 B2B 客户
    B2bOnly,
    /// 价格不低于阈值
    PriceAtLeast { value: f64 },
    /// SKU 前缀匹配（区分大小写）
    SkuStartsWith { value: String },
    /// 所有子谓词均满足，空列表视为不满足
    All { children: Vec<Predicate> },
    /// 任一子谓词满足
    Any { children: Vec<Predicate> },
}

impl Predicate {
    pub fn brand_contains(value: impl Into<String>) -> Self {
        Self::BrandContains {
            value: value.into(),
        }
    }

    pub fn brand_equals(value: impl Into<String>) -> Self {
        Self::BrandEquals {
            value: value.into(),
        }
    }

    /// 对上下文求值
    ///
    /// 缺失的属性一律视为不满足，空品牌名不会命中任何品牌谓词。
    pub fn matches(&self, ctx: &ProductBadgeContext) -> bool {
        match self {
            Self::BrandContains { value } => {
                let needle = value.trim().to_lowercase();
                !ctx.brand_name.is_empty() && !needle.is_empty() && ctx.brand_name.contains(&needle)
            }
            Self::BrandEquals { value } => {
                !ctx.brand_name.is_empty() && ctx.brand_name == value.trim().to_lowercase()
            }
            Self::FreeShippingEligible => ctx.is_free_shipping_eligible == Some(true),
            Self::B2bOnly => ctx.is_b2b_only == Some(true),
            Self::PriceAtLeast { value } => ctx.price.is_some_and(|price| price >= *value),
            Self::SkuStartsWith { value } => ctx
                .sku
                .as_deref()
                .is_some_and(|sku| !value.is_empty() && sku.starts_with(value.as_str())),
            Self::All { children } => {
                !children.is_empty() && children.iter().all(|child| child.matches(ctx))
            }
            Self::Any { children } => children.iter().any(|child| child.matches(ctx)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BrandContains { value } => write!(f, "brand contains '{}'", value),
            Self::BrandEquals { value } => write!(f, "brand == '{}'", value),
            Self::FreeShippingEligible => write!(f, "free shipping eligible"),
            Self::B2bOnly => write!(f, "b2b only"),
            Self::PriceAtLeast { value } => write!(f, "price >= {}", value),
            Self::SkuStartsWith { value } => write!(f, "sku starts with '{}'", value),
            Self::All { children } => write!(f, "ALL({})", children.len()),
            Self::Any { children } => write!(f, "ANY({})", children.len()),
        }
    }
}

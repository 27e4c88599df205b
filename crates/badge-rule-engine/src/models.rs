//! 徽章规则引擎领域模型

use crate::predicate::Predicate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 徽章样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    #[default]
    Neutral,
    Info,
    Success,
    Warning,
    Sale,
}

impl BadgeVariant {
    /// 从字符串解析，未知样式返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "neutral" => Some(Self::Neutral),
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "sale" => Some(Self::Sale),
            _ => None,
        }
    }

    /// 前端徽章胶囊使用的样式类
    pub fn css_classes(&self) -> &'static str {
        match self {
            Self::Sale => "bg-sky-600 text-white ring-sky-500/40",
            Self::Info => "bg-blue-50 text-blue-700 ring-blue-200",
            Self::Success => "bg-green-50 text-green-700 ring-green-200",
            Self::Warning => "bg-amber-50 text-amber-800 ring-amber-200",
            Self::Neutral => "bg-gray-50 text-gray-700 ring-gray-200",
        }
    }
}

impl fmt::Display for BadgeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Neutral => "neutral",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Sale => "sale",
        };
        write!(f, "{}", s)
    }
}

/// 徽章描述
///
/// `key` 在同一次响应内唯一，列表顺序即展示顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDescriptor {
    pub key: String,
    pub label: String,
    pub variant: BadgeVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl BadgeDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>, variant: BadgeVariant) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            variant,
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// 徽章模板（不含 key 的徽章描述）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeTemplate {
    pub label: String,
    pub variant: BadgeVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl BadgeTemplate {
    pub fn new(label: impl Into<String>, variant: BadgeVariant, href: Option<&str>) -> Self {
        Self {
            label: label.into(),
            variant,
            href: href.map(str::to_string),
        }
    }

    /// 补上 key 生成完整的徽章描述
    pub fn to_descriptor(&self, key: &str) -> BadgeDescriptor {
        BadgeDescriptor {
            key: key.to_string(),
            label: self.label.clone(),
            variant: self.variant,
            href: self.href.clone(),
        }
    }
}

/// 徽章规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeRule {
    pub key: String,
    pub predicate: Predicate,
    #[serde(flatten)]
    pub template: BadgeTemplate,
}

impl BadgeRule {
    pub fn new(key: impl Into<String>, predicate: Predicate, template: BadgeTemplate) -> Self {
        Self {
            key: key.into(),
            predicate,
            template,
        }
    }
}

/// 规则评估上下文 - 每次请求新建的商品属性子集
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductBadgeContext {
    pub entity_id: i64,
    /// 已去除首尾空白并转为小写，缺失时为空字符串
    pub brand_name: String,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub is_free_shipping_eligible: Option<bool>,
    pub is_b2b_only: Option<bool>,
}

impl ProductBadgeContext {
    /// 创建没有任何已知属性的上下文
    pub fn new(entity_id: i64) -> Self {
        Self {
            entity_id,
            ..Default::default()
        }
    }

    /// 设置品牌名（自动归一化）
    pub fn with_brand(mut self, brand_name: Option<&str>) -> Self {
        self.brand_name = normalize_brand(brand_name);
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_free_shipping(mut self, eligible: bool) -> Self {
        self.is_free_shipping_eligible = Some(eligible);
        self
    }

    pub fn with_b2b_only(mut self, b2b_only: bool) -> Self {
        self.is_b2b_only = Some(b2b_only);
        self
    }
}

/// 品牌名归一化：去除首尾空白并转小写
pub fn normalize_brand(brand_name: Option<&str>) -> String {
    brand_name
        .map(|name| name.trim().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_serialization_omits_missing_href() {
        let badge = BadgeDescriptor::new("planted-sale", "SALE", BadgeVariant::Sale);
        let value = serde_json::to_value(&badge).unwrap();
        assert_eq!(
            value,
            json!({"key": "planted-sale", "label": "SALE", "variant": "sale"})
        );

        let badge = badge.with_href("/sale");
        let value = serde_json::to_value(&badge).unwrap();
        assert_eq!(value["href"], json!("/sale"));
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let result: Result<BadgeDescriptor, _> =
            serde_json::from_value(json!({"key": "k", "label": "L", "variant": "loud"}));
        assert!(result.is_err());
        assert_eq!(BadgeVariant::parse("loud"), None);
        assert_eq!(BadgeVariant::parse("warning"), Some(BadgeVariant::Warning));
    }

    #[test]
    fn test_brand_normalization() {
        let ctx = ProductBadgeContext::new(7).with_brand(Some("  Planted Co. "));
        assert_eq!(ctx.brand_name, "planted co.");

        let ctx = ProductBadgeContext::new(7).with_brand(None);
        assert_eq!(ctx.brand_name, "");
    }

    #[test]
    fn test_rule_deserialization() {
        let json = r#"
        {
            "key": "free-shipping",
            "predicate": { "type": "free_shipping_eligible" },
            "label": "Ships Free Over $99",
            "variant": "info",
            "href": "/shipping"
        }
        "#;

        let rule: BadgeRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.key, "free-shipping");
        assert_eq!(rule.predicate, Predicate::FreeShippingEligible);
        assert_eq!(rule.template.variant, BadgeVariant::Info);
        assert_eq!(rule.template.href.as_deref(), Some("/shipping"));
    }

    #[test]
    fn test_variant_display_matches_wire_format() {
        for variant in [
            BadgeVariant::Neutral,
            BadgeVariant::Info,
            BadgeVariant::Success,
            BadgeVariant::Warning,
            BadgeVariant::Sale,
        ] {
            let wire = serde_json::to_value(variant).unwrap();
            assert_eq!(wire, json!(variant.to_string()));
        }
    }
}

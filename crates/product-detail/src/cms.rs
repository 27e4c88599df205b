//! 页面编辑器属性
//!
//! 编辑器以 JSON（camelCase）形式下发属性，字段缺失时取编辑器控件的默认值。

use rule_engine::{BadgeDescriptor, BadgeVariant};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::AccordionSection;

/// 编辑器插槽内容
///
/// 内容结构由渲染层决定，这里只关心是否有可渲染的东西。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(pub Value);

impl Slot {
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self(Value::String(text.into()))
    }

    /// 至少包含一段非空白文本、一个数字或一个元素
    pub fn has_renderable_content(&self) -> bool {
        renderable(&self.0)
    }
}

fn renderable(node: &Value) -> bool {
    match node {
        Value::Null | Value::Bool(_) => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Number(_) | Value::Object(_) => true,
        Value::Array(children) => children.iter().any(renderable),
    }
}

/// 描述来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DescriptionSource {
    CatalogPlainText,
    #[default]
    CatalogRichText,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionSettings {
    pub source: DescriptionSource,
    pub slot: Slot,
}

/// 徽章条位置，目前只有标题下方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BadgePlacement {
    #[default]
    UnderTitle,
}

/// 编辑器列表中的一个徽章
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeItem {
    pub label: String,
    pub variant: BadgeVariant,
    pub href: String,
}

impl Default for BadgeItem {
    fn default() -> Self {
        Self {
            label: "SALE".to_string(),
            variant: BadgeVariant::Sale,
            href: "/sale".to_string(),
        }
    }
}

impl BadgeItem {
    /// 标签为空白时返回 None；空白链接视为没有链接
    pub fn to_descriptor(&self, key: impl Into<String>) -> Option<BadgeDescriptor> {
        descriptor(key.into(), &self.label, self.variant, &self.href)
    }
}

/// 徽章条设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BadgeSettings {
    pub enabled: bool,
    pub placement: BadgePlacement,
    pub items: Vec<BadgeItem>,
    /// 单徽章写法
    pub label: String,
    pub variant: BadgeVariant,
    pub href: String,
    /// 整体覆盖徽章条的自定义内容
    pub slot: Slot,
}

impl Default for BadgeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            placement: BadgePlacement::default(),
            items: Vec::new(),
            label: String::new(),
            variant: BadgeVariant::default(),
            href: String::new(),
            slot: Slot::empty(),
        }
    }
}

impl BadgeSettings {
    /// 编辑器配置的徽章：列表项在前，单徽章写法在后
    pub fn editor_badges(&self) -> Vec<BadgeDescriptor> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| item.to_descriptor(format!("makeswift-badge-{}", index)))
            .chain(descriptor(
                "makeswift-badge".to_string(),
                &self.label,
                self.variant,
                &self.href,
            ))
            .collect()
    }
}

fn descriptor(key: String, label: &str, variant: BadgeVariant, href: &str) -> Option<BadgeDescriptor> {
    if label.trim().is_empty() {
        return None;
    }

    let href = href.trim();
    Some(BadgeDescriptor {
        key,
        label: label.to_string(),
        variant,
        href: (!href.is_empty()).then(|| href.to_string()),
    })
}

/// 商品详情组件的可编辑属性
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditableProps {
    pub summary_text: Option<String>,
    pub description: DescriptionSettings,
    pub accordions: Vec<AccordionSection<Slot>>,
    pub badges: BadgeSettings,
}

impl EditableProps {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

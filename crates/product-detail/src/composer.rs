//! 商品详情渲染模型组装
//!
//! 徽章节点优先级：关闭 → 无；自定义插槽有内容 → 插槽；
//! 编辑器配置了徽章 → 徽章条；否则交给客户端拉取器实时获取。

use rule_engine::BadgeDescriptor;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cms::{BadgePlacement, BadgeSettings, DescriptionSource, EditableProps, Slot};
use crate::merge::{AccordionSection, merge_sections};

/// 徽章条容器样式
pub const BADGE_BAR_CLASS: &str = "flex flex-wrap gap-1.5";

const PILL_BASE_CLASS: &str =
    "inline-flex items-center rounded-full px-2 py-0.5 text-[11px] font-medium leading-4 ring-1 ring-inset";

/// 商品目录提供的数据
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogProduct {
    pub entity_id: i64,
    pub title: String,
    pub plain_text_description: Option<String>,
    /// 富文本（HTML）描述
    pub description: Option<String>,
    /// None 表示目录没有提供折叠面板
    pub accordions: Option<Vec<AccordionSection<String>>>,
}

/// 最终展示的描述
#[derive(Debug, Clone, PartialEq)]
pub enum Description {
    PlainText(String),
    RichText(String),
    Custom(Slot),
}

/// 折叠面板内容：目录原文或编辑器插槽
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Catalog(String),
    Editor(Slot),
}

/// 徽章渲染节点
#[derive(Debug, Clone, PartialEq)]
pub enum BadgeNode {
    /// 编辑器自定义内容，原样渲染
    Slot(Slot),
    /// 编辑器配置的静态徽章
    Bar(Vec<BadgeDescriptor>),
    /// 由客户端拉取器请求徽章端点
    Live { endpoint: String },
}

impl BadgeNode {
    /// 实时徽章的端点地址
    pub fn live_endpoint(entity_id: i64) -> String {
        format!("/api/pdp/badges/?entityId={}", entity_id)
    }

    /// Live 节点需要挂载拉取器的端点
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Live { endpoint } => Some(endpoint),
            _ => None,
        }
    }

    /// 静态徽章条的胶囊；插槽与实时节点由各自的渲染路径处理
    pub fn render_hint(&self) -> Vec<BadgePill> {
        match self {
            Self::Bar(badges) => BadgePill::from_badges(badges),
            Self::Slot(_) | Self::Live { .. } => Vec::new(),
        }
    }
}

/// 展示层使用的徽章胶囊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgePill {
    pub key: String,
    pub label: String,
    pub href: Option<String>,
    pub class_name: String,
}

impl BadgePill {
    pub fn from_badge(badge: &BadgeDescriptor) -> Self {
        Self {
            key: badge.key.clone(),
            label: badge.label.clone(),
            href: badge.href.clone(),
            class_name: format!("{} {}", PILL_BASE_CLASS, badge.variant.css_classes()),
        }
    }

    pub fn from_badges(badges: &[BadgeDescriptor]) -> Vec<Self> {
        badges.iter().map(Self::from_badge).collect()
    }
}

/// 交给展示层的渲染模型
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetailModel {
    pub entity_id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<Description>,
    pub accordions: Option<Vec<AccordionSection<SectionContent>>>,
    pub badge: Option<BadgeNode>,
    pub badge_placement: BadgePlacement,
}

/// 组装渲染模型
pub fn compose(product: &CatalogProduct, editable: &EditableProps) -> ProductDetailModel {
    let badge = resolve_badge_node(&editable.badges, product.entity_id);
    trace!(
        entity_id = product.entity_id,
        badge = ?badge.as_ref().map(node_kind),
        "商品详情渲染模型已组装"
    );

    ProductDetailModel {
        entity_id: product.entity_id,
        title: product.title.clone(),
        summary: editable.summary_text.clone(),
        description: select_description(product, editable),
        accordions: merge_accordions(product, editable),
        badge,
        badge_placement: editable.badges.placement,
    }
}

/// 按来源选择描述
pub fn select_description(product: &CatalogProduct, editable: &EditableProps) -> Option<Description> {
    match editable.description.source {
        DescriptionSource::CatalogPlainText => product
            .plain_text_description
            .clone()
            .map(Description::PlainText),
        DescriptionSource::CatalogRichText => product.description.clone().map(Description::RichText),
        DescriptionSource::Custom => Some(Description::Custom(editable.description.slot.clone())),
    }
}

/// 目录提供折叠面板时才合并，保留目录标题，取编辑器内容
fn merge_accordions(
    product: &CatalogProduct,
    editable: &EditableProps,
) -> Option<Vec<AccordionSection<SectionContent>>> {
    let catalog = product.accordions.as_ref()?;

    Some(merge_sections(
        catalog
            .iter()
            .cloned()
            .map(|section| section.map_content(SectionContent::Catalog)),
        &editable.accordions,
        |left, right| AccordionSection {
            content: SectionContent::Editor(right.content.clone()),
            ..left
        },
    ))
}

/// 解析徽章节点：插槽 > 编辑器徽章 > 实时拉取 > 无
pub fn resolve_badge_node(settings: &BadgeSettings, entity_id: i64) -> Option<BadgeNode> {
    if !settings.enabled {
        return None;
    }

    if settings.slot.has_renderable_content() {
        return Some(BadgeNode::Slot(settings.slot.clone()));
    }

    let configured = settings.editor_badges();
    if !configured.is_empty() {
        return Some(BadgeNode::Bar(configured));
    }

    Some(BadgeNode::Live {
        endpoint: BadgeNode::live_endpoint(entity_id),
    })
}

fn node_kind(node: &BadgeNode) -> &'static str {
    match node {
        BadgeNode::Slot(_) => "slot",
        BadgeNode::Bar(_) => "bar",
        BadgeNode::Live { .. } => "live",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::BadgeItem;
    use rule_engine::BadgeVariant;
    use serde_json::json;

    fn product() -> CatalogProduct {
        CatalogProduct {
            entity_id: 42,
            title: "Planted Chunks".to_string(),
            plain_text_description: Some("Plain".to_string()),
            description: Some("<p>Rich</p>".to_string()),
            accordions: Some(vec![
                AccordionSection::new("Ingredients", "Peas".to_string()),
                AccordionSection::new("Care", "Keep cool".to_string()),
            ]),
        }
    }

    fn settings_with(slot: Slot, items: Vec<BadgeItem>) -> BadgeSettings {
        BadgeSettings {
            slot,
            items,
            ..Default::default()
        }
    }

    #[test]
    fn test_badge_precedence() {
        let item = BadgeItem::default();
        let slot = Slot::text("Custom pill");

        let node = resolve_badge_node(&settings_with(slot.clone(), vec![item.clone()]), 42);
        assert_eq!(node, Some(BadgeNode::Slot(slot)));

        let node = resolve_badge_node(&settings_with(Slot::text("  "), vec![item]), 42);
        assert!(matches!(node, Some(BadgeNode::Bar(ref badges)) if badges[0].key == "makeswift-badge-0"));

        let node = resolve_badge_node(&settings_with(Slot::empty(), Vec::new()), 42);
        assert_eq!(node.as_ref().and_then(BadgeNode::endpoint), Some("/api/pdp/badges/?entityId=42"));

        let disabled = BadgeSettings {
            enabled: false,
            slot: Slot::text("ignored"),
            ..Default::default()
        };
        assert_eq!(resolve_badge_node(&disabled, 42), None);
    }

    #[test]
    fn test_single_badge_form() {
        let settings = BadgeSettings {
            label: "Clearance".to_string(),
            variant: BadgeVariant::Warning,
            href: "/clearance".to_string(),
            ..Default::default()
        };

        let Some(BadgeNode::Bar(badges)) = resolve_badge_node(&settings, 1) else {
            panic!("expected a badge bar");
        };
        assert_eq!(
            badges,
            vec![BadgeDescriptor::new("makeswift-badge", "Clearance", BadgeVariant::Warning).with_href("/clearance")]
        );
    }

    #[test]
    fn test_description_sources() {
        let mut editable = EditableProps::default();
        assert_eq!(
            select_description(&product(), &editable),
            Some(Description::RichText("<p>Rich</p>".to_string()))
        );

        editable.description.source = DescriptionSource::CatalogPlainText;
        assert_eq!(
            select_description(&product(), &editable),
            Some(Description::PlainText("Plain".to_string()))
        );

        editable.description.source = DescriptionSource::Custom;
        editable.description.slot = Slot(json!({ "type": "video" }));
        assert_eq!(
            select_description(&product(), &editable),
            Some(Description::Custom(Slot(json!({ "type": "video" }))))
        );
    }

    #[test]
    fn test_accordions_merge_keeps_catalog_titles() {
        let editable = EditableProps {
            accordions: vec![
                AccordionSection::new("Editor title", Slot::text("Editor copy")),
                AccordionSection::new("Second", Slot::text("x")),
                AccordionSection::new("Extra", Slot::text("dropped")),
            ],
            ..Default::default()
        };

        let model = compose(&product(), &editable);
        let accordions = model.accordions.unwrap();

        assert_eq!(accordions.len(), 2);
        assert_eq!(accordions[0].title, "Ingredients");
        assert_eq!(accordions[0].content, SectionContent::Editor(Slot::text("Editor copy")));
        assert_eq!(accordions[1].title, "Care");
    }

    #[test]
    fn test_accordions_absent_without_catalog() {
        let product = CatalogProduct {
            accordions: None,
            ..product()
        };
        let editable = EditableProps {
            accordions: vec![AccordionSection::new("Editor", Slot::text("x"))],
            ..Default::default()
        };

        assert_eq!(compose(&product, &editable).accordions, None);
    }

    #[test]
    fn test_compose_model() {
        let editable = EditableProps {
            summary_text: Some("Summary".to_string()),
            ..Default::default()
        };

        let model = compose(&product(), &editable);
        assert_eq!(model.entity_id, 42);
        assert_eq!(model.title, "Planted Chunks");
        assert_eq!(model.summary.as_deref(), Some("Summary"));
        assert_eq!(model.badge_placement, BadgePlacement::UnderTitle);
        assert_eq!(
            model.accordions.unwrap()[1].content,
            SectionContent::Catalog("Keep cool".to_string())
        );
        assert!(matches!(model.badge, Some(BadgeNode::Live { .. })));
    }

    #[test]
    fn test_render_hint_classes() {
        let node = BadgeNode::Bar(vec![
            BadgeDescriptor::new("s", "SALE", BadgeVariant::Sale).with_href("/sale"),
        ]);
        let pills = node.render_hint();

        assert_eq!(pills.len(), 1);
        assert!(pills[0].class_name.starts_with("inline-flex"));
        assert!(pills[0].class_name.ends_with("bg-sky-600 text-white ring-sky-500/40"));
        assert!(BadgeNode::Slot(Slot::text("x")).render_hint().is_empty());
    }
}
